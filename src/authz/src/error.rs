//! Error types for the authorization engine

use thiserror::Error;

use crate::engine::decision::Challenge;

/// Authorization errors
///
/// The engine itself reports denials as [`Decision::Deny`](crate::Decision);
/// these variants exist for callers that convert a denial into an error with
/// [`Decision::into_result`](crate::Decision::into_result) and propagate it
/// with `?`.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Credential present but malformed or unverifiable
    #[error("Invalid token")]
    InvalidToken {
        /// Challenge to render
        challenge: Challenge,
    },

    /// No credential presented
    #[error("Authorization required")]
    AuthorizationRequired {
        /// Challenge to render
        challenge: Challenge,
    },

    /// Valid credential without the required privilege
    #[error("Necessary privilege lacking")]
    PrivilegeLacking,

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] cellguard_config::ConfigError),
}

impl AuthzError {
    /// HTTP status the transport layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidToken { .. } | Self::AuthorizationRequired { .. } => 401,
            Self::PrivilegeLacking => 403,
            Self::Config(_) => 500,
        }
    }

    /// Authentication challenge, if the failure carries one
    pub fn challenge(&self) -> Option<&Challenge> {
        match self {
            Self::InvalidToken { challenge } | Self::AuthorizationRequired { challenge } => {
                Some(challenge)
            }
            Self::PrivilegeLacking | Self::Config(_) => None,
        }
    }
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;
