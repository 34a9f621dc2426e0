use h2h_shared::config::{
    auth::AuthConfig, database::DatabaseConfig, environment::Environment, server::ServerConfig,
};
use serde::{Deserialize, Serialize};

/// Process-wide configuration assembled from the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub server: ServerConfig,
    pub environment: Environment,
}

impl Config {
    /// Load `.env` if present, then read every section from the environment
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Config {
            database: DatabaseConfig::from_env(),
            auth: AuthConfig::from_env(),
            server: ServerConfig::from_env(),
            environment: Environment::from_env(),
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }

    pub fn bind_address(&self) -> String {
        self.server.bind_address()
    }
}
