use tracing::debug;

use crate::errors::QueryResult;
use crate::graphql::resolvers::{ResolverContext, ResolverRegistry};
use crate::graphql::scalars::Timestamp;
use crate::graphql::types::{Arguments, Entity, Resolved};
use crate::store::{Photo, RecordStore};

pub(super) fn register(registry: &mut ResolverRegistry) {
    registry.register("Query", "totalPhotos", resolve_total_photos);
    registry.register("Query", "allPhotos", resolve_all_photos);
}

/// Photos in store order.
///
/// With `cursor_filter` on, only photos created strictly after `after` are
/// returned; photos whose stored date cannot be read are left out of a
/// filtered listing. With it off, the cursor is accepted and ignored.
pub fn all_photos(
    store: &RecordStore,
    after: Option<&Timestamp>,
    cursor_filter: bool,
) -> QueryResult<Vec<Photo>> {
    let cursor = match after {
        Some(after) if cursor_filter => after.to_instant()?,
        _ => return Ok(store.all_photos().to_vec()),
    };

    debug!("Filtering photos created after {}", cursor);
    Ok(store
        .photos_by(|photo| {
            photo
                .created
                .to_instant()
                .map_or(false, |created| created > cursor)
        })
        .into_iter()
        .cloned()
        .collect())
}

fn resolve_total_photos(
    _: &Entity,
    _: &Arguments,
    ctx: &ResolverContext<'_>,
) -> QueryResult<Resolved> {
    Ok(Resolved::leaf(ctx.store.total_photos() as i64))
}

fn resolve_all_photos(
    _: &Entity,
    args: &Arguments,
    ctx: &ResolverContext<'_>,
) -> QueryResult<Resolved> {
    let photos = all_photos(ctx.store, args.timestamp("after"), ctx.settings.cursor_filter)?;
    Ok(Resolved::objects(photos.into_iter().map(Entity::Photo)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::default_seed;

    fn seeded() -> RecordStore {
        RecordStore::from_seed(default_seed()).unwrap()
    }

    fn ids(photos: &[Photo]) -> Vec<&str> {
        photos.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn lists_everything_without_cursor() {
        let store = seeded();
        assert_eq!(ids(&all_photos(&store, None, true).unwrap()), vec!["1", "2", "3"]);
    }

    #[test]
    fn filters_strictly_after_cursor() {
        let store = seeded();
        let cursor = Timestamp::raw("1-2-1985");
        assert_eq!(ids(&all_photos(&store, Some(&cursor), true).unwrap()), vec!["3"]);
    }

    #[test]
    fn ignores_cursor_when_filtering_is_off() {
        let store = seeded();
        let cursor = Timestamp::raw("2100-01-01");
        assert_eq!(ids(&all_photos(&store, Some(&cursor), false).unwrap()).len(), 3);
    }

    #[test]
    fn unreadable_literal_cursor_is_an_error() {
        let store = seeded();
        let cursor = Timestamp::raw("whenever");
        let err = all_photos(&store, Some(&cursor), true).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SCALAR_INPUT");
    }
}
