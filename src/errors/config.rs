use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading configuration or seed data
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid YAML for the expected shape
    #[error("Failed to parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Seed data violates a store invariant
    #[error("Invalid seed data: {0}")]
    InvalidSeed(String),
}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "IO_ERROR",
            ConfigError::Yaml { .. } => "PARSE_ERROR",
            ConfigError::InvalidSeed(_) => "VALIDATION_ERROR",
        }
    }
}
