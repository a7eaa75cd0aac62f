pub mod app;
pub mod handlers;

use anyhow::Result;
use tracing::info;

use crate::config::AppConfig;

pub async fn start_server(config: &AppConfig) -> Result<()> {
    let context = config.build_context()?;
    info!(
        "Record store ready with {} photos",
        context.store.read().total_photos()
    );

    let app = app::create_app(context, config.cors_origin.as_deref()).await?;

    log_routes(config.port);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    info!("Server running on http://0.0.0.0:{}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn log_routes(port: u16) {
    info!("API Endpoints:");
    info!("  /            - Welcome message");
    info!("  /health      - Health check");
    info!("  /graphql     - GraphQL API (GET and POST)");
    info!("  /playground  - GraphQL Playground");
    info!("  /schema      - Schema SDL");
    info!("Playground: http://localhost:{}/playground", port);
}
