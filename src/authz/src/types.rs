//! Core authorization types

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Capability required by an operation (`read`, `write`, `all`, ...)
///
/// The privilege hierarchy ("`all` implies `read`") belongs to the ACL
/// evaluator; the engine only passes privileges through.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Privilege(Cow<'static, str>);

impl Privilege {
    /// Read access
    pub const READ: Privilege = Privilege(Cow::Borrowed("read"));
    /// Write access
    pub const WRITE: Privilege = Privilege(Cow::Borrowed("write"));
    /// Every privilege
    pub const ALL: Privilege = Privilege(Cow::Borrowed("all"));

    /// Create a privilege tag
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// Tag name
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validity class assigned to the presented credential upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenClass {
    /// Verified credential
    Valid,
    /// Credential present but malformed, expired or unverifiable
    Invalid,
    /// No credential
    Anonymous,
    /// Master or unit-scoped credential that bypasses resource ACLs
    UnitLevel,
}

/// HTTP authentication scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthScheme {
    /// RFC 6750 bearer token
    Bearer,
    /// RFC 7617 basic credentials
    Basic,
}

impl AuthScheme {
    /// Scheme name as written in `WWW-Authenticate`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bearer => "Bearer",
            Self::Basic => "Basic",
        }
    }
}

/// Schemes a resource accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthSchemes {
    /// Bearer tokens only
    BearerOnly,
    /// Bearer tokens and Basic credentials
    BearerAndBasic,
}

impl AuthSchemes {
    /// Whether `scheme` is accepted
    pub fn contains(&self, scheme: AuthScheme) -> bool {
        match self {
            Self::BearerOnly => scheme == AuthScheme::Bearer,
            Self::BearerAndBasic => true,
        }
    }

    /// Accepted schemes in challenge order
    pub fn schemes(&self) -> &'static [AuthScheme] {
        match self {
            Self::BearerOnly => &[AuthScheme::Bearer],
            Self::BearerAndBasic => &[AuthScheme::Bearer, AuthScheme::Basic],
        }
    }
}

/// Classified credential state of one request
///
/// Built by the authentication layer. The only thing the engine writes is
/// the Basic-auth eligibility flag of the resource being accessed.
#[derive(Debug)]
pub struct AccessContext {
    token: TokenClass,
    issuer: Option<String>,
    subject: Option<String>,
    realm: String,
    basic_auth_eligible: AtomicBool,
}

impl AccessContext {
    /// Create a context for `token` in `realm`
    pub fn new(token: TokenClass, realm: impl Into<String>) -> Self {
        Self {
            token,
            issuer: None,
            subject: None,
            realm: realm.into(),
            basic_auth_eligible: AtomicBool::new(false),
        }
    }

    /// Context for a request without credentials
    pub fn anonymous(realm: impl Into<String>) -> Self {
        Self::new(TokenClass::Anonymous, realm)
    }

    /// Set the claimed issuer
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Set the authenticated subject
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Token validity class
    pub fn token_class(&self) -> TokenClass {
        self.token
    }

    /// Claimed issuer URL
    pub fn issuer(&self) -> Option<&str> {
        self.issuer.as_deref()
    }

    /// Authenticated subject
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Realm advertised in challenges
    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Whether the last authorized resource admits Basic challenges
    pub fn basic_auth_eligible(&self) -> bool {
        self.basic_auth_eligible.load(Ordering::Relaxed)
    }

    pub(crate) fn record_basic_auth_eligibility(&self, eligible: bool) {
        self.basic_auth_eligible.store(eligible, Ordering::Relaxed);
    }
}

impl Clone for AccessContext {
    fn clone(&self) -> Self {
        Self {
            token: self.token,
            issuer: self.issuer.clone(),
            subject: self.subject.clone(),
            realm: self.realm.clone(),
            basic_auth_eligible: AtomicBool::new(self.basic_auth_eligible()),
        }
    }
}
