//! Configuration parsing and validation for the countdown service
//!
//! Supports TOML configuration with:
//! - Versioned schema
//! - Display settings (tick interval, retention window, celebration defaults)
//! - Event definitions with per-event style and colours
//! - Validation with clear error messages; unresolvable dates are reported
//!   but only exclude their own event

mod schema;
mod settings;
mod validation;

pub use schema::*;
pub use settings::*;
pub use validation::*;

use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation failed: {errors:?}")]
    ValidationFailed { errors: Vec<ValidationError> },

    #[error("Unsupported config version: {0}")]
    UnsupportedVersion(u32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Load and validate configuration from a TOML file
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<CountdownConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from a TOML string
pub fn parse_config(content: &str) -> ConfigResult<CountdownConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    // Check version
    if raw.config_version != CURRENT_CONFIG_VERSION {
        return Err(ConfigError::UnsupportedVersion(raw.config_version));
    }

    // Validate
    let (fatal, warnings): (Vec<_>, Vec<_>) = validate_config(&raw)
        .into_iter()
        .partition(ValidationError::is_fatal);
    if !fatal.is_empty() {
        return Err(ConfigError::ValidationFailed { errors: fatal });
    }

    for finding in &warnings {
        warn!(finding = %finding, "Event will not be displayed");
    }

    Ok(CountdownConfig::from_raw(raw, warnings))
}

/// Current supported config version
pub const CURRENT_CONFIG_VERSION: u32 = 1;
