//! Mutation root fields
//!
//! Mutation resolvers run under the store's write lock. Validation happens
//! before anything is allocated or appended, so a rejected call leaves the
//! store untouched.

use tracing::{info, warn};

use crate::errors::QueryResult;
use crate::graphql::scalars::Timestamp;
use crate::graphql::types::{Arguments, Entity, PostPhotoInput, Resolved};
use crate::store::{Photo, RecordStore};

pub type MutationResolver = fn(&mut RecordStore, &Arguments) -> QueryResult<Resolved>;

/// Resolver for a mutation root field
pub fn resolver(field: &str) -> Option<MutationResolver> {
    match field {
        "postPhoto" => Some(resolve_post_photo as MutationResolver),
        _ => None,
    }
}

/// Create a photo from validated input and append it to the store.
///
/// The id comes from the store's allocator and `created` is stamped here;
/// neither is client-supplied. No owner is recorded.
pub fn post_photo(store: &mut RecordStore, input: PostPhotoInput) -> QueryResult<Photo> {
    let photo = Photo {
        id: store.allocate_photo_id()?,
        name: input.name,
        description: input.description,
        category: input.category,
        github_user: None,
        created: Timestamp::now(),
    };

    store.append_photo(photo.clone())?;

    match serde_json::to_string(&photo) {
        Ok(json) => info!("newPhoto {}", json),
        Err(e) => warn!("Posted photo {} but failed to render it: {}", photo.id, e),
    }
    Ok(photo)
}

fn resolve_post_photo(store: &mut RecordStore, args: &Arguments) -> QueryResult<Resolved> {
    let input = PostPhotoInput::from_value(args.value("input"))?;
    let photo = post_photo(store, input)?;
    Ok(Resolved::Object(Entity::Photo(photo)))
}
