use tracing::warn;

use crate::errors::{QueryError, QueryResult};
use crate::graphql::resolvers::{ResolverContext, ResolverRegistry};
use crate::graphql::scalars::DateTimeCodec;
use crate::graphql::types::{Arguments, Entity, Resolved};
use crate::store::{Photo, RecordStore, User};

pub(super) fn register(registry: &mut ResolverRegistry) {
    registry.register("Photo", "url", resolve_url);
    registry.register("Photo", "postedBy", resolve_posted_by);
    registry.register("Photo", "taggedUsers", resolve_tagged_users);
    registry.register("Photo", "created", resolve_created);
}

/// Display URL, a pure function of the photo id
pub fn url(photo: &Photo, base_url: &str) -> String {
    format!("{}/{}.jpg", base_url.trim_end_matches('/'), photo.id)
}

/// Owner of the photo, if the owner login resolves
pub fn posted_by(photo: &Photo, store: &RecordStore) -> Option<User> {
    let login = photo.github_user.as_deref()?;
    let user = store.find_user(login).cloned();
    if user.is_none() {
        warn!(
            "Owner of photo {} unresolved: {}",
            photo.id,
            QueryError::not_found("User", login)
        );
    }
    user
}

/// Users tagged in the photo, in tag order. Tags naming unknown users are dropped.
pub fn tagged_users(photo: &Photo, store: &RecordStore) -> Vec<User> {
    store
        .tags_by(|tag| tag.photo_id == photo.id)
        .into_iter()
        .map(|tag| tag.user_login.as_str())
        .filter_map(|login| {
            let user = store.find_user(login);
            if user.is_none() {
                warn!(
                    "Dropping tag on photo {}: {}",
                    photo.id,
                    QueryError::not_found("User", login)
                );
            }
            user.cloned()
        })
        .collect()
}

pub fn created(photo: &Photo) -> QueryResult<String> {
    DateTimeCodec::serialize(&photo.created)
}

fn resolve_url(entity: &Entity, _: &Arguments, ctx: &ResolverContext<'_>) -> QueryResult<Resolved> {
    Ok(entity.as_photo().map_or(Resolved::Null, |photo| {
        Resolved::leaf(url(photo, &ctx.settings.image_base_url))
    }))
}

fn resolve_posted_by(
    entity: &Entity,
    _: &Arguments,
    ctx: &ResolverContext<'_>,
) -> QueryResult<Resolved> {
    Ok(Resolved::optional(
        entity
            .as_photo()
            .and_then(|photo| posted_by(photo, ctx.store))
            .map(Entity::User),
    ))
}

fn resolve_tagged_users(
    entity: &Entity,
    _: &Arguments,
    ctx: &ResolverContext<'_>,
) -> QueryResult<Resolved> {
    Ok(entity.as_photo().map_or(Resolved::Null, |photo| {
        Resolved::objects(tagged_users(photo, ctx.store).into_iter().map(Entity::User))
    }))
}

fn resolve_created(
    entity: &Entity,
    _: &Arguments,
    _: &ResolverContext<'_>,
) -> QueryResult<Resolved> {
    match entity.as_photo() {
        Some(photo) => created(photo).map(Resolved::leaf),
        None => Ok(Resolved::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::scalars::Timestamp;
    use crate::store::{default_seed, PhotoCategory, SeedData, Tag};

    fn seeded() -> RecordStore {
        RecordStore::from_seed(default_seed()).unwrap()
    }

    fn names(users: &[User]) -> Vec<&str> {
        users.iter().filter_map(|u| u.name.as_deref()).collect()
    }

    #[test]
    fn url_depends_only_on_id() {
        let store = seeded();
        let photo = store.find_photo("2").unwrap();
        let mut renamed = photo.clone();
        renamed.name = "something else".to_string();

        assert_eq!(url(photo, "http://yoursite.com/img"), "http://yoursite.com/img/2.jpg");
        assert_eq!(
            url(photo, "http://yoursite.com/img"),
            url(&renamed, "http://yoursite.com/img/")
        );
    }

    #[test]
    fn posted_by_resolves_owner_login() {
        let store = seeded();
        let owner = posted_by(store.find_photo("1").unwrap(), &store).unwrap();
        assert_eq!(owner.github_login, "gPlake");
    }

    #[test]
    fn posted_by_is_absent_for_unknown_or_missing_owner() {
        let store = seeded();
        let mut photo = store.find_photo("1").unwrap().clone();
        photo.github_user = Some("ghost".to_string());
        assert!(posted_by(&photo, &store).is_none());

        photo.github_user = None;
        assert!(posted_by(&photo, &store).is_none());
    }

    #[test]
    fn tagged_users_follow_tag_order() {
        let store = seeded();
        let users = tagged_users(store.find_photo("2").unwrap(), &store);
        assert_eq!(names(&users), vec!["Scot Schmidt", "Mike Hattrup", "Glen Plake"]);
    }

    #[test]
    fn tagged_users_drop_dangling_tags() {
        let mut seed = default_seed();
        seed.tags.insert(0, Tag::new("1", "ghost"));
        let store = RecordStore::from_seed(seed).unwrap();

        let users = tagged_users(store.find_photo("1").unwrap(), &store);
        assert_eq!(names(&users), vec!["Glen Plake"]);
    }

    #[test]
    fn created_serializes_seed_dates() {
        let store = RecordStore::from_seed(SeedData {
            photos: vec![Photo {
                id: "1".to_string(),
                name: "x".to_string(),
                description: None,
                category: PhotoCategory::Selfie,
                github_user: None,
                created: Timestamp::raw("3-18-1977"),
            }],
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            created(store.find_photo("1").unwrap()).unwrap(),
            "1977-03-18T00:00:00.000Z"
        );
    }
}
