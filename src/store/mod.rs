//! In-memory record store
//!
//! Owns the three collections and exposes lookups, predicate filters and a
//! single append path for new photos. Missing records come back as `None`;
//! a dangling foreign key is an expected outcome, not a failure.

pub mod records;
pub mod seed_data;

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::errors::{ConfigError, ConfigResult, QueryError, QueryResult};

pub use records::{Photo, PhotoCategory, Tag, User};
pub use seed_data::{default_seed, SeedData};

#[derive(Debug, Clone)]
pub struct RecordStore {
    users: Vec<User>,
    photos: Vec<Photo>,
    tags: Vec<Tag>,
    next_photo_id: u64,
}

impl RecordStore {
    /// Build a store from seed data, rejecting duplicate keys
    pub fn from_seed(seed: SeedData) -> ConfigResult<Self> {
        let mut logins = HashSet::new();
        for user in &seed.users {
            if !logins.insert(user.github_login.as_str()) {
                return Err(ConfigError::InvalidSeed(format!(
                    "duplicate user login '{}'",
                    user.github_login
                )));
            }
        }

        let mut ids = HashSet::new();
        for photo in &seed.photos {
            if !ids.insert(photo.id.as_str()) {
                return Err(ConfigError::InvalidSeed(format!(
                    "duplicate photo id '{}'",
                    photo.id
                )));
            }
        }

        let next_photo_id = match seed
            .photos
            .iter()
            .filter_map(|photo| photo.id.parse::<u64>().ok())
            .max()
        {
            Some(max) => max.checked_add(1).ok_or_else(|| {
                ConfigError::InvalidSeed(format!("photo id '{}' leaves no id to allocate", max))
            })?,
            None => 1,
        };

        Ok(Self {
            users: seed.users,
            photos: seed.photos,
            tags: seed.tags,
            next_photo_id,
        })
    }

    pub fn find_user(&self, login: &str) -> Option<&User> {
        self.users.iter().find(|user| user.github_login == login)
    }

    pub fn find_photo(&self, id: &str) -> Option<&Photo> {
        self.photos.iter().find(|photo| photo.id == id)
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// All photos in insertion order
    pub fn all_photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn total_photos(&self) -> usize {
        self.photos.len()
    }

    pub fn photos_by<P>(&self, predicate: P) -> Vec<&Photo>
    where
        P: Fn(&Photo) -> bool,
    {
        self.photos.iter().filter(|&photo| predicate(photo)).collect()
    }

    pub fn tags_by<P>(&self, predicate: P) -> Vec<&Tag>
    where
        P: Fn(&Tag) -> bool,
    {
        self.tags.iter().filter(|&tag| predicate(tag)).collect()
    }

    /// Reserve the next photo id. Ids are never handed out twice.
    pub fn allocate_photo_id(&mut self) -> QueryResult<String> {
        let id = self.next_photo_id;
        self.next_photo_id = id
            .checked_add(1)
            .ok_or_else(|| QueryError::validation("id", "photo ids are exhausted"))?;
        Ok(id.to_string())
    }

    /// Append a photo, refusing ids that are already taken
    pub fn append_photo(&mut self, photo: Photo) -> QueryResult<()> {
        if self.find_photo(&photo.id).is_some() {
            return Err(QueryError::validation(
                "id",
                format!("photo id '{}' is already taken", photo.id),
            ));
        }

        if let Ok(numeric) = photo.id.parse::<u64>() {
            let following = numeric.checked_add(1).ok_or_else(|| {
                QueryError::validation("id", format!("photo id '{}' is out of range", photo.id))
            })?;
            self.next_photo_id = self.next_photo_id.max(following);
        }

        debug!("Appending photo {}", photo.id);
        self.photos.push(photo);
        Ok(())
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            photos: Vec::new(),
            tags: Vec::new(),
            next_photo_id: 1,
        }
    }
}

/// Store handle shared between requests. Writers are serialised by the lock.
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<RwLock<RecordStore>>,
}

impl SharedStore {
    pub fn new(store: RecordStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, RecordStore> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, RecordStore> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::scalars::Timestamp;

    fn seeded() -> RecordStore {
        RecordStore::from_seed(default_seed()).unwrap()
    }

    fn photo(id: &str) -> Photo {
        Photo {
            id: id.to_string(),
            name: format!("photo {}", id),
            description: None,
            category: PhotoCategory::default(),
            github_user: None,
            created: Timestamp::now(),
        }
    }

    #[test]
    fn finds_users_by_login() {
        let store = seeded();
        assert_eq!(
            store.find_user("gPlake").and_then(|u| u.name.as_deref()),
            Some("Glen Plake")
        );
        assert!(store.find_user("Glen Plake").is_none());
    }

    #[test]
    fn filters_preserve_insertion_order() {
        let store = seeded();
        let ids: Vec<_> = store
            .photos_by(|p| p.github_user.as_deref() == Some("sSchmidt"))
            .into_iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["2", "3"]);

        let logins: Vec<_> = store
            .tags_by(|t| t.photo_id == "2")
            .into_iter()
            .map(|t| t.user_login.as_str())
            .collect();
        assert_eq!(logins, vec!["sSchmidt", "mHattrup", "gPlake"]);
    }

    #[test]
    fn allocates_ids_after_seeded_maximum() {
        let mut store = seeded();
        assert_eq!(store.allocate_photo_id().unwrap(), "4");
        assert_eq!(store.allocate_photo_id().unwrap(), "5");
    }

    #[test]
    fn append_rejects_taken_ids() {
        let mut store = seeded();
        let err = store.append_photo(photo("2")).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(store.total_photos(), 3);
    }

    #[test]
    fn append_moves_allocator_past_explicit_ids() {
        let mut store = seeded();
        store.append_photo(photo("40")).unwrap();
        assert_eq!(store.allocate_photo_id().unwrap(), "41");
        assert_eq!(store.all_photos().last().map(|p| p.id.as_str()), Some("40"));
    }

    #[test]
    fn rejects_seed_id_without_successor() {
        let mut seed = default_seed();
        seed.photos[0].id = u64::MAX.to_string();

        let err = RecordStore::from_seed(seed).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSeed(_)));
    }

    #[test]
    fn append_rejects_id_without_successor() {
        let mut store = seeded();
        let err = store.append_photo(photo(&u64::MAX.to_string())).unwrap_err();

        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(store.total_photos(), 3);
        assert_eq!(store.allocate_photo_id().unwrap(), "4");
    }

    #[test]
    fn allocation_stops_at_the_last_id() {
        let mut seed = default_seed();
        seed.photos[0].id = (u64::MAX - 2).to_string();

        let mut store = RecordStore::from_seed(seed).unwrap();
        assert_eq!(store.allocate_photo_id().unwrap(), (u64::MAX - 1).to_string());
        assert_eq!(store.allocate_photo_id().unwrap_err().error_code(), "VALIDATION_ERROR");
        assert!(store.allocate_photo_id().is_err());
    }

    #[test]
    fn rejects_duplicate_seed_keys() {
        let mut seed = default_seed();
        seed.users.push(User::new("gPlake", "Imposter"));
        let err = RecordStore::from_seed(seed).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSeed(_)));
    }

    #[test]
    fn shared_store_sees_appends() {
        let shared = SharedStore::new(seeded());
        let before = shared.read().total_photos();
        {
            let mut store = shared.write();
            let id = store.allocate_photo_id().unwrap();
            store.append_photo(photo(&id)).unwrap();
        }
        assert_eq!(shared.read().total_photos(), before + 1);
    }
}
