//! Field resolvers
//!
//! Each entity type registers one function per derived field. Resolvers get
//! the current entity, its coerced arguments and a read view of the store;
//! they never touch the store outside of that view. Fields without a
//! registered resolver fall back to the entity's stored attribute.

pub mod introspection;
pub mod photo;
pub mod query;
pub mod user;

use std::collections::HashMap;

use crate::errors::QueryResult;
use crate::graphql::schema::SchemaDef;
use crate::graphql::types::{Arguments, Entity, Resolved};
use crate::store::RecordStore;

/// Knobs that change resolver behaviour
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverSettings {
    /// Prefix for `Photo.url`
    pub image_base_url: String,
    /// Whether `allPhotos(after:)` filters by creation instant
    pub cursor_filter: bool,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            image_base_url: "http://yoursite.com/img".to_string(),
            cursor_filter: true,
        }
    }
}

/// What a resolver may read
#[derive(Clone, Copy)]
pub struct ResolverContext<'a> {
    pub store: &'a RecordStore,
    pub settings: &'a ResolverSettings,
    pub schema: &'a SchemaDef,
}

pub type FieldResolver = fn(&Entity, &Arguments, &ResolverContext<'_>) -> QueryResult<Resolved>;

/// Resolvers keyed by type name, then field name
#[derive(Default)]
pub struct ResolverRegistry {
    resolvers: HashMap<&'static str, HashMap<&'static str, FieldResolver>>,
}

impl ResolverRegistry {
    /// Registry with every PhotoShare resolver
    pub fn photoshare() -> Self {
        let mut registry = Self::default();
        query::register(&mut registry);
        photo::register(&mut registry);
        user::register(&mut registry);
        introspection::register(&mut registry);
        registry
    }

    pub fn register(
        &mut self,
        type_name: &'static str,
        field: &'static str,
        resolver: FieldResolver,
    ) {
        self.resolvers
            .entry(type_name)
            .or_default()
            .insert(field, resolver);
    }

    pub fn get(&self, type_name: &str, field: &str) -> Option<FieldResolver> {
        self.resolvers.get(type_name)?.get(field).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_derived_fields_only() {
        let registry = ResolverRegistry::photoshare();

        assert!(registry.get("Photo", "taggedUsers").is_some());
        assert!(registry.get("User", "inPhotos").is_some());
        assert!(registry.get("Query", "allPhotos").is_some());
        assert!(registry.get("Photo", "name").is_none());
        assert!(registry.get("User", "githubLogin").is_none());
        assert!(registry.get("Query", "__schema").is_some());
        assert!(registry.get("__Type", "name").is_none());
    }
}
