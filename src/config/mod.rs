// Configuration layer - environment loading and logging setup
pub mod logging;

use std::env;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
}

/// Application configuration loaded from the environment.
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub reset_token_secret: String,
    pub bind_addr: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// `DATABASE_URL` and `PPDB_BIND_ADDR` have development defaults; the
    /// two secrets are required so a deployment can never fall back to a
    /// known signing key.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://ppdb.db?mode=rwc".to_string());

        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?;

        let reset_token_secret = env::var("RESET_TOKEN_SECRET")
            .map_err(|_| ConfigError::MissingVar("RESET_TOKEN_SECRET"))?;

        let bind_addr =
            env::var("PPDB_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        Ok(Self {
            database_url,
            jwt_secret,
            reset_token_secret,
            bind_addr,
        })
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &self.database_url)
            .field("jwt_secret", &"<redacted>")
            .field("reset_token_secret", &"<redacted>")
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}
