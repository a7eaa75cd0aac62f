use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql::{Response, ServerError};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use tracing::error;

use crate::graphql::execute_request;
use crate::server::app::AppState;

pub async fn graphql_handler(
    State(state): State<AppState>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let context = state.context.clone();
    let request = req.into_inner();

    // Execution takes the store lock synchronously
    match tokio::task::spawn_blocking(move || execute_request(&context, request)).await {
        Ok(response) => response.into(),
        Err(e) => {
            error!("GraphQL execution task failed: {}", e);
            Response::from_errors(vec![ServerError::new("Internal server error", None)]).into()
        }
    }
}

pub async fn graphql_playground() -> impl IntoResponse {
    Html(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
}

pub async fn schema_sdl(State(state): State<AppState>) -> String {
    state.context.schema.sdl()
}
