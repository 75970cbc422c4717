//! # Cellguard Authorization Engine
//!
//! Per-request allow/deny decisions for cell and box resources.
//!
//! ## Features
//!
//! - **Unit-level bypass** for master and unit-scoped tokens
//! - **ACL evaluation** through a pluggable [`AclEvaluator`]
//! - **Classified denials** carrying `WWW-Authenticate` challenges
//! - **Issuer allow-lists** read from the unit [`ConfigStore`](cellguard_config::ConfigStore)
//! - **Decision metrics** with lock-free counters
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use cellguard_authz::{
//!     Acl, AccessContext, AuthorizationEngine, CellRef, EngineConfig, FullUnitScope,
//!     Privilege, ResourceBinding,
//! };
//! use cellguard_config::{ConfigSources, ConfigStore};
//!
//! let store = Arc::new(ConfigStore::load(ConfigSources::bundled())?);
//! let acl = |_: &AccessContext, _: &Acl, p: &Privilege, _: &str| *p == Privilege::READ;
//! let engine = AuthorizationEngine::new(
//!     EngineConfig::default(),
//!     store,
//!     Arc::new(acl),
//!     Arc::new(FullUnitScope),
//! );
//!
//! let cell = CellRef::new("alice", "https://unit.example.com/alice/");
//! let binding = ResourceBinding::cell(cell, Acl::empty());
//! let ac = AccessContext::anonymous("https://unit.example.com/alice/");
//!
//! assert!(engine.authorize(&ac, &Privilege::READ, &binding).is_allowed());
//! assert!(!engine.authorize(&ac, &Privilege::WRITE, &binding).is_allowed());
//! # Ok::<(), cellguard_config::ConfigError>(())
//! ```

pub mod acl;
pub mod binding;
pub mod engine;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use acl::{Acl, AclEvaluator, FullUnitScope, UnitTokenScope};
pub use binding::{BoxRef, CellRef, RequestTrace, ResourceBinding, ResourceScope};
pub use engine::{
    AllowBasis, AuthorizationEngine, Challenge, Decision, DecisionMetrics, DecisionStats, Denial,
    DenyReason, EngineConfig, IssuerVerdict,
};
pub use error::{AuthzError, Result};
pub use types::{AccessContext, AuthScheme, AuthSchemes, Privilege, TokenClass};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
