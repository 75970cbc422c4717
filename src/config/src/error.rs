//! Error types for unit configuration

use thiserror::Error;

/// Configuration errors
///
/// Every variant except the override-layer failures (which never leave the
/// store) is fatal for the caller: a required key that is absent or does not
/// parse is a deployment defect, not a runtime condition.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required key is absent from the effective map
    #[error("Missing configuration key: {0}")]
    Missing(String),

    /// Value present but not convertible to the requested type
    #[error("Invalid value for {key}: {value:?} (expected {expected})")]
    Invalid {
        /// Offending key
        key: String,
        /// Raw value
        value: String,
        /// Human readable target type
        expected: &'static str,
    },

    /// Base layer could not be read or parsed
    #[error("Failed to load base configuration from {source_name}: {reason}")]
    BaseLayer {
        /// Name of the layer source (file path or bundled resource)
        source_name: String,
        /// Underlying failure
        reason: String,
    },

    /// Layer text is not valid TOML
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Layer contains a value that has no flat string form
    #[error("Unsupported value at {key}: {kind}")]
    Unsupported {
        /// Flattened key
        key: String,
        /// TOML value kind
        kind: &'static str,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, value: &str, expected: &'static str) -> Self {
        Self::Invalid {
            key: key.to_string(),
            value: value.to_string(),
            expected,
        }
    }
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
