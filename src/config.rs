use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{ConfigError, ConfigResult};
use crate::graphql::resolvers::ResolverSettings;
use crate::graphql::GraphQLContext;
use crate::store::{default_seed, SeedData};

/// Application configuration, read from an optional YAML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub port: u16,
    /// Allowed CORS origin; any origin when unset
    pub cors_origin: Option<String>,
    /// YAML seed dataset; the built-in seed when unset
    pub seed_file: Option<PathBuf>,
    /// Filter `allPhotos(after:)` by creation instant
    pub cursor_filter: bool,
    pub image_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let settings = ResolverSettings::default();
        Self {
            port: 4000,
            cors_origin: None,
            seed_file: None,
            cursor_filter: settings.cursor_filter,
            image_base_url: settings.image_base_url,
        }
    }
}

impl AppConfig {
    /// Load from `path`, or fall back to defaults when no path is given
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let Some(path) = path else {
            debug!("No config file given, using defaults");
            return Ok(Self::default());
        };

        info!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content, path)
    }

    fn from_yaml(content: &str, path: &Path) -> ConfigResult<Self> {
        // An empty file deserialises to null rather than an empty mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply command line overrides on top of file values
    pub fn with_overrides(
        mut self,
        port: Option<u16>,
        cors_origin: Option<String>,
        seed_file: Option<PathBuf>,
    ) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        if cors_origin.is_some() {
            self.cors_origin = cors_origin;
        }
        if seed_file.is_some() {
            self.seed_file = seed_file;
        }
        self
    }

    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            image_base_url: self.image_base_url.clone(),
            cursor_filter: self.cursor_filter,
        }
    }

    pub fn seed(&self) -> ConfigResult<SeedData> {
        match &self.seed_file {
            Some(path) => SeedData::from_yaml_file(path),
            None => Ok(default_seed()),
        }
    }

    /// Build the shared GraphQL context this configuration describes
    pub fn build_context(&self) -> ConfigResult<GraphQLContext> {
        GraphQLContext::from_seed(self.seed()?, self.resolver_settings())
    }
}
