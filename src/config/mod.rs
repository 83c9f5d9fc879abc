//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `CONTRACT_TRACKER`
//! prefix and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use contract_tracker::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! config.telemetry.init_tracing().expect("Failed to install tracing");
//! ```

mod error;
mod migration;
mod telemetry;

pub use error::{ConfigError, ValidationError};
pub use migration::MigrationDefaults;
pub use telemetry::TelemetryConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment loads successfully.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Modes for years migrated without explicit choices
    #[serde(default)]
    pub migration: MigrationDefaults,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CONTRACT_TRACKER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `CONTRACT_TRACKER__MIGRATION__MERGE=last` -> `migration.merge = last`
    /// - `CONTRACT_TRACKER__TELEMETRY__JSON=true` -> `telemetry.json = true`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CONTRACT_TRACKER")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.telemetry.validate()?;
        Ok(())
    }
}
