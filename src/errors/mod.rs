//! Domain-specific error types for the PhotoShare core
//!
//! - **QueryError**: per-field failures raised while executing an operation
//! - **ConfigError**: configuration and seed-data loading failures
//!
//! `QueryError` converts into a GraphQL error with a structured `code`
//! extension through the [`ToGraphQLError`] trait.

pub mod common;
pub mod config;
pub mod query;

pub use config::ConfigError;
pub use query::QueryError;

pub use common::ToGraphQLError;

/// Result type alias for query execution
pub type QueryResult<T> = Result<T, QueryError>;

/// Result type alias for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_result_alias() {
        let result: QueryResult<i32> = Err(QueryError::not_found("User", "x"));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_result_alias() {
        let result: ConfigResult<()> = Err(ConfigError::InvalidSeed("dup".to_string()));
        assert!(result.is_err());
    }
}
