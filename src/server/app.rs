use anyhow::{Context, Result};
use axum::{http::HeaderValue, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use super::handlers::{graphql, health};
use crate::graphql::GraphQLContext;

#[derive(Clone)]
pub struct AppState {
    pub context: GraphQLContext,
}

pub async fn create_app(context: GraphQLContext, cors_origin: Option<&str>) -> Result<Router> {
    let state = AppState { context };

    let cors = match cors_origin {
        Some(origin) if origin != "*" => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin '{}'", origin))?,
            )
            .allow_methods(Any)
            .allow_headers(Any),
        _ => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        .route("/", get(health::welcome))
        .route("/health", get(health::health_check))
        // GraphQL endpoint, playground and schema
        .route(
            "/graphql",
            get(graphql::graphql_handler).post(graphql::graphql_handler),
        )
        .route("/playground", get(graphql::graphql_playground))
        .route("/schema", get(graphql::schema_sdl))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state);

    Ok(app)
}
