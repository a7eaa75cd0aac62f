pub mod config;
pub mod errors;
pub mod graphql;
pub mod store;

#[cfg(feature = "server")]
pub mod server;
