use tracing::warn;

use crate::errors::{QueryError, QueryResult};
use crate::graphql::resolvers::{ResolverContext, ResolverRegistry};
use crate::graphql::types::{Arguments, Entity, Resolved};
use crate::store::{Photo, RecordStore, User};

pub(super) fn register(registry: &mut ResolverRegistry) {
    registry.register("User", "postedPhotos", resolve_posted_photos);
    registry.register("User", "inPhotos", resolve_in_photos);
}

/// Photos owned by the user, in store order
pub fn posted_photos(user: &User, store: &RecordStore) -> Vec<Photo> {
    store
        .photos_by(|photo| photo.github_user.as_deref() == Some(user.github_login.as_str()))
        .into_iter()
        .cloned()
        .collect()
}

/// Photos the user is tagged in, in tag order.
///
/// Tags carry the user's login, so the join is on `github_login`.
pub fn in_photos(user: &User, store: &RecordStore) -> Vec<Photo> {
    store
        .tags_by(|tag| tag.user_login == user.github_login)
        .into_iter()
        .map(|tag| tag.photo_id.as_str())
        .filter_map(|photo_id| {
            let photo = store.find_photo(photo_id);
            if photo.is_none() {
                warn!(
                    "Dropping tag for user '{}': {}",
                    user.github_login,
                    QueryError::not_found("Photo", photo_id)
                );
            }
            photo.cloned()
        })
        .collect()
}

fn resolve_posted_photos(
    entity: &Entity,
    _: &Arguments,
    ctx: &ResolverContext<'_>,
) -> QueryResult<Resolved> {
    Ok(entity.as_user().map_or(Resolved::Null, |user| {
        Resolved::objects(posted_photos(user, ctx.store).into_iter().map(Entity::Photo))
    }))
}

fn resolve_in_photos(
    entity: &Entity,
    _: &Arguments,
    ctx: &ResolverContext<'_>,
) -> QueryResult<Resolved> {
    Ok(entity.as_user().map_or(Resolved::Null, |user| {
        Resolved::objects(in_photos(user, ctx.store).into_iter().map(Entity::Photo))
    }))
}
