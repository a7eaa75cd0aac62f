use std::sync::Arc;

use crate::errors::ConfigResult;
use crate::graphql::resolvers::{ResolverRegistry, ResolverSettings};
use crate::graphql::schema::SchemaDef;
use crate::store::{RecordStore, SeedData, SharedStore};

/// Everything an operation needs: the store handle, the schema and the resolvers
#[derive(Clone)]
pub struct GraphQLContext {
    pub store: SharedStore,
    pub schema: Arc<SchemaDef>,
    pub registry: Arc<ResolverRegistry>,
    pub settings: ResolverSettings,
}

impl GraphQLContext {
    pub fn new(store: SharedStore, settings: ResolverSettings) -> Self {
        Self {
            store,
            schema: Arc::new(SchemaDef::photoshare()),
            registry: Arc::new(ResolverRegistry::photoshare()),
            settings,
        }
    }

    /// Context over a fresh store built from seed data
    pub fn from_seed(seed: SeedData, settings: ResolverSettings) -> ConfigResult<Self> {
        let store = RecordStore::from_seed(seed)?;
        Ok(Self::new(SharedStore::new(store), settings))
    }
}
