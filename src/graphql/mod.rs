//! GraphQL layer: schema, introspection, selection lowering, resolvers and execution

pub mod context;
pub mod executor;
pub mod introspection;
pub mod mutations;
pub mod resolvers;
pub mod scalars;
pub mod schema;
pub mod selection;
pub mod types;

use async_graphql::{Request, Response};
use tracing::warn;

pub use context::GraphQLContext;
pub use executor::{execute, execute_mutation, execute_query, ExecutionResult, FieldError};
pub use scalars::{DateTimeCodec, Timestamp};
pub use schema::SchemaDef;
pub use selection::{InputValue, Operation, OperationKind, SelectedField};

/// Run a standard GraphQL request (query text, operation name, variables).
///
/// Documents that cannot be parsed or lack the requested operation produce a
/// response with errors and no data.
pub fn execute_request(ctx: &GraphQLContext, request: Request) -> Response {
    let operation = match Operation::parse(
        &request.query,
        request.operation_name.as_deref(),
        &request.variables,
    ) {
        Ok(operation) => operation,
        Err(e) => {
            warn!("Rejected GraphQL request: {}", e);
            return Response::from_errors(vec![FieldError::request(e).to_server_error()]);
        }
    };

    execute(ctx, &operation).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::resolvers::ResolverSettings;
    use crate::store::default_seed;
    use async_graphql::Variables;
    use serde_json::json;

    fn context() -> GraphQLContext {
        GraphQLContext::from_seed(default_seed(), ResolverSettings::default()).unwrap()
    }

    #[test]
    fn executes_request_with_variables() {
        let ctx = context();
        let request = Request::new(
            "query Since($after: DateTime) { allPhotos(after: $after) { id created } }",
        )
        .variables(Variables::from_json(json!({ "after": "1980-01-01" })));

        let response = execute_request(&ctx, request);
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({ "allPhotos": [
                { "id": "2", "created": "1985-01-02T00:00:00.000Z" },
                { "id": "3", "created": "2018-04-15T19:09:57.308Z" },
            ]})
        );
    }

    #[test]
    fn parse_failures_become_request_errors() {
        let ctx = context();
        let response = execute_request(&ctx, Request::new("{ allPhotos { id "));

        assert_eq!(response.errors.len(), 1);
        assert!(response.errors[0].path.is_empty());
        assert_eq!(
            response.errors[0]
                .extensions
                .as_ref()
                .and_then(|ext| ext.get("code").cloned()),
            Some(async_graphql::Value::from("PARSE_ERROR"))
        );
    }
}
