//! Aggregated process configuration.

use sg_shared::config::{AuthConfig, DatabaseConfig, ServerConfig};

/// Full configuration for the API process
///
/// Built once at startup; components receive the sections they need by
/// value or reference, never through ambient global state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load every section from environment variables
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            auth: AuthConfig::from_env(),
        }
    }
}
