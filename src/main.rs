use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use photoshare::config::AppConfig;
use photoshare::graphql::SchemaDef;
use photoshare::server;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GraphQL server
    Serve {
        #[clap(short, long)]
        port: Option<u16>,
        /// YAML configuration file
        #[clap(short, long)]
        config: Option<PathBuf>,
        #[clap(long)]
        cors_origin: Option<String>,
        /// YAML seed dataset replacing the built-in one
        #[clap(short, long)]
        seed: Option<PathBuf>,
    },
    /// Print the schema as SDL
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        Commands::Serve {
            port,
            config,
            cors_origin,
            seed,
        } => {
            let config =
                AppConfig::load(config.as_deref())?.with_overrides(port, cors_origin, seed);
            info!("Starting server on port {}", config.port);
            server::start_server(&config).await?;
        }
        Commands::Schema => {
            print!("{}", SchemaDef::photoshare().sdl());
        }
    }

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("tower_http=warn,{}", log_level)))
        .without_time()
        .init();
}
