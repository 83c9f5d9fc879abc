//! Logging configuration

use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::{ConfigError, ValidationError};

/// Tracing subscriber settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g. `info`,
    /// `contract_tracker=debug`)
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

impl TelemetryConfig {
    /// Validate the filter directive
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.filter().map(|_| ())
    }

    /// Install the global tracing subscriber.
    ///
    /// `RUST_LOG` takes precedence over the configured level.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the level is invalid or a subscriber is
    /// already installed.
    pub fn init_tracing(&self) -> Result<(), ConfigError> {
        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => self.filter()?,
        };

        let registry = tracing_subscriber::registry().with(filter);
        let result = if self.json {
            registry.with(tracing_subscriber::fmt::layer().json()).try_init()
        } else {
            registry.with(tracing_subscriber::fmt::layer()).try_init()
        };
        result.map_err(|e| ConfigError::TracingInit(e.to_string()))
    }

    fn filter(&self) -> Result<EnvFilter, ValidationError> {
        EnvFilter::try_new(&self.level)
            .map_err(|_| ValidationError::InvalidLogLevel(self.level.clone()))
    }
}

fn default_level() -> String {
    "info".to_string()
}
