//! Authorization decision types and challenge rendering

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AuthzError;
use crate::types::{AuthScheme, AuthSchemes};

/// Why a request was allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowBasis {
    /// Unit-level credential covering the privilege
    UnitLevelToken,
    /// Resource ACL grants the privilege
    Acl,
}

/// Why a request was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// Credential present but not usable
    InvalidToken,
    /// No credential presented
    AuthorizationRequired,
    /// Credential usable but the privilege is not granted
    PrivilegeLacking,
}

impl DenyReason {
    /// HTTP status for this reason
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidToken | Self::AuthorizationRequired => 401,
            Self::PrivilegeLacking => 403,
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken => f.write_str("invalid token"),
            Self::AuthorizationRequired => f.write_str("authorization required"),
            Self::PrivilegeLacking => f.write_str("necessary privilege lacking"),
        }
    }
}

/// Authentication challenge attached to a 401 denial
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// Realm to advertise
    pub realm: String,
    /// Schemes the resource accepts
    pub schemes: AuthSchemes,
    /// Whether the presented token was rejected
    #[serde(default)]
    pub invalid_token: bool,
}

impl Challenge {
    /// Challenge for a request that carried no credential
    pub fn new(realm: impl Into<String>, schemes: AuthSchemes) -> Self {
        Self {
            realm: realm.into(),
            schemes,
            invalid_token: false,
        }
    }

    /// Challenge for a request whose token was rejected
    pub fn invalid_token(realm: impl Into<String>, schemes: AuthSchemes) -> Self {
        Self {
            invalid_token: true,
            ..Self::new(realm, schemes)
        }
    }

    /// `WWW-Authenticate` header values, one per accepted scheme
    ///
    /// The bearer value carries `error="invalid_token"` when the token was
    /// rejected.
    pub fn header_values(&self) -> Vec<String> {
        self.schemes
            .schemes()
            .iter()
            .map(|scheme| match scheme {
                AuthScheme::Bearer if self.invalid_token => format!(
                    "{} realm=\"{}\", error=\"invalid_token\"",
                    scheme.as_str(),
                    self.realm
                ),
                _ => format!("{} realm=\"{}\"", scheme.as_str(), self.realm),
            })
            .collect()
    }
}

/// Classified denial
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Denial {
    /// Denial class
    pub reason: DenyReason,
    /// Challenge, present for 401 classes only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<Challenge>,
}

impl Denial {
    /// Denial for a rejected token
    pub fn invalid_token(challenge: Challenge) -> Self {
        Self {
            reason: DenyReason::InvalidToken,
            challenge: Some(challenge),
        }
    }

    /// Denial for a request without credentials
    pub fn authorization_required(challenge: Challenge) -> Self {
        Self {
            reason: DenyReason::AuthorizationRequired,
            challenge: Some(challenge),
        }
    }

    /// Denial for a credential lacking the privilege
    pub fn privilege_lacking() -> Self {
        Self {
            reason: DenyReason::PrivilegeLacking,
            challenge: None,
        }
    }

    /// HTTP status for this denial
    pub fn status_code(&self) -> u16 {
        self.reason.status_code()
    }
}

impl From<Denial> for AuthzError {
    fn from(denial: Denial) -> Self {
        match (denial.reason, denial.challenge) {
            (DenyReason::InvalidToken, Some(challenge)) => AuthzError::InvalidToken { challenge },
            (DenyReason::AuthorizationRequired, Some(challenge)) => {
                AuthzError::AuthorizationRequired { challenge }
            }
            _ => AuthzError::PrivilegeLacking,
        }
    }
}

/// Outcome of one authorization check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Decision {
    /// Request allowed
    Allow {
        /// Which step allowed it
        basis: AllowBasis,
    },
    /// Request denied
    Deny(Denial),
}

impl Decision {
    /// Allow on the given basis
    pub fn allow(basis: AllowBasis) -> Self {
        Self::Allow { basis }
    }

    /// Whether the request is allowed
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }

    /// Denial details, if denied
    pub fn denial(&self) -> Option<&Denial> {
        match self {
            Self::Allow { .. } => None,
            Self::Deny(denial) => Some(denial),
        }
    }

    /// Convert into a `Result` for callers that propagate with `?`
    pub fn into_result(self) -> Result<AllowBasis, AuthzError> {
        match self {
            Self::Allow { basis } => Ok(basis),
            Self::Deny(denial) => Err(denial.into()),
        }
    }
}
