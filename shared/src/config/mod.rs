//! Configuration modules for the SessionGate services.

pub mod auth;
pub mod database;
pub mod server;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use server::ServerConfig;
