//! Common error utilities and GraphQL conversion
//!
//! Domain errors become GraphQL errors carrying a structured `code` extension
//! plus whatever context identifies the failing input.

use async_graphql::{Error as GraphQLError, ErrorExtensions};

use super::*;

/// Convert domain errors to GraphQL errors with error codes
pub trait ToGraphQLError {
    /// Convert to GraphQL error with structured extensions
    fn to_graphql_error(&self) -> GraphQLError;
}

impl ToGraphQLError for QueryError {
    fn to_graphql_error(&self) -> GraphQLError {
        let code = self.error_code();
        let message = self.to_string();

        GraphQLError::new(message).extend_with(|_, e| {
            e.set("code", code);

            match self {
                QueryError::NotFound { entity, key } => {
                    e.set("entity", *entity);
                    e.set("key", key.as_str());
                }
                QueryError::InvalidScalarInput { scalar, value, .. } => {
                    e.set("scalar", *scalar);
                    e.set("value", value.as_str());
                }
                QueryError::ValidationError { field, .. } => {
                    e.set("field", field.as_str());
                }
                QueryError::UnknownField { type_name, field }
                | QueryError::NonNullViolation { type_name, field } => {
                    e.set("typeName", type_name.as_str());
                    e.set("field", field.as_str());
                }
                _ => {}
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of(err: &GraphQLError) -> Option<async_graphql::Value> {
        err.extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .cloned()
    }

    #[test]
    fn test_query_error_to_graphql() {
        let err = QueryError::not_found("Photo", "42");
        let graphql_err = err.to_graphql_error();

        assert!(graphql_err.message.contains("Photo '42' not found"));
        assert_eq!(
            code_of(&graphql_err),
            Some(async_graphql::Value::from("NOT_FOUND"))
        );
    }

    #[test]
    fn test_unknown_field_carries_type_and_field() {
        let err = QueryError::UnknownField {
            type_name: "User".to_string(),
            field: "email".to_string(),
        };
        let ext = err.to_graphql_error().extensions;

        assert_eq!(
            ext.as_ref().and_then(|ext| ext.get("typeName")).cloned(),
            Some(async_graphql::Value::from("User"))
        );
        assert_eq!(
            ext.as_ref().and_then(|ext| ext.get("field")).cloned(),
            Some(async_graphql::Value::from("email"))
        );
    }
}
