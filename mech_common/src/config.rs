//! Configuration loading trait and error type.
//!
//! Every mechanism description is a TOML file deserialized with serde and
//! then validated explicitly. Loading happens once at startup; the resulting
//! structs are immutable for the lifetime of the controller.
//!
//! # Usage
//!
//! ```rust,no_run
//! use mech_common::config::{ConfigLoader, ConfigError};
//! use mech_common::mechanism::MechanismFile;
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let file = MechanismFile::load(Path::new("config/elevator.toml"))?;
//!     file.validate()?;
//!     println!("Mechanism: {}", file.mechanism.name);
//!     Ok(())
//! }
//! ```

use std::path::Path;
use thiserror::Error;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// A gain carries the negative "not yet characterized" sentinel.
    #[error("Gain {field} is unset (value {value}); mechanism is not characterized")]
    UnsetGains {
        /// Name of the first offending gain.
        field: &'static str,
        /// The sentinel value found.
        value: f64,
    },
}

/// Trait for loading configuration from TOML files.
///
/// Blanket-implemented for every `serde::de::DeserializeOwned` type.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
///
/// Semantic validation is the caller's job (see `MechanismFile::validate`).
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from an in-memory TOML string.
    fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

/// Check that `value` is finite and strictly positive.
pub(crate) fn require_positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "{name} must be finite and > 0 (got {value})"
        )));
    }
    Ok(())
}
