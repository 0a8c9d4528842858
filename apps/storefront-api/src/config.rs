//! Storefront API configuration.
//!
//! Layers, later wins:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. built-in defaults (Default impls below)                             │
//! │  2. ./dokan.toml                       (optional)                       │
//! │  3. DOKAN_* environment variables      (`.env` is loaded first)         │
//! │     DOKAN_PORT=8080                                                     │
//! │     DOKAN_JWT_SECRET=…                                                  │
//! │     DOKAN_EMAIL__API__API_KEY=…        (`__` nests into sections)       │
//! │     DOKAN_EMAIL__SMTP__HOST=smtp.example.com                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, FileFormat};
use dokan_checkout::notify::{HttpApiConfig, SmtpConfig};
use serde::Deserialize;

/// Secret used when nothing is configured. Fine for local runs only.
pub const DEV_JWT_SECRET: &str = "dokan-dev-secret-change-in-production";

/// Storefront API configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    /// Interface to bind
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub database_path: String,

    /// Pool size
    pub db_max_connections: u32,

    /// Secret key for signing admin tokens
    pub jwt_secret: String,

    /// Admin token lifetime in seconds
    pub jwt_lifetime_secs: i64,

    /// ISO currency code stamped on every order
    pub currency: String,

    /// Order confirmation channels
    pub email: EmailConfig,
}

/// Primary (HTTP API) and fallback (SMTP) email channels.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub api: HttpApiConfig,
    pub smtp: SmtpConfig,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        StorefrontConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_path: "dokan.db".to_string(),
            db_max_connections: 5,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_lifetime_secs: 8 * 3600, // one admin shift
            currency: dokan_core::DEFAULT_CURRENCY.to_string(),
            email: EmailConfig::default(),
        }
    }
}

impl StorefrontConfig {
    /// Loads `.env`, `dokan.toml` and `DOKAN_*` variables over the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        // Missing .env is normal outside development
        let _ = dotenvy::dotenv();

        Self::build(
            config::Config::builder()
                .add_source(File::with_name("dokan").required(false))
                .add_source(
                    Environment::with_prefix("DOKAN")
                        .prefix_separator("_")
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    /// Parses a TOML document over the defaults.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Self::build(config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: StorefrontConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue("port".to_string()));
        }
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingRequired("jwt_secret".to_string()));
        }
        if self.jwt_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue("jwt_lifetime_secs".to_string()));
        }
        if self.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("db_max_connections".to_string()));
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ConfigError::InvalidValue("currency".to_string()));
        }
        Ok(())
    }

    /// Whether the built-in development secret is still in use.
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
