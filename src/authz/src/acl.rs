//! External collaborators consulted by the engine
//!
//! ACL storage, the privilege hierarchy and token scoping live outside this
//! crate. The engine sees them only through these traits.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{AccessContext, Privilege};

/// ACL document attached to a resource
///
/// Opaque to the engine: only an [`AclEvaluator`] interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Acl(Value);

impl Acl {
    /// Wrap an ACL document
    pub fn new(document: Value) -> Self {
        Self(document)
    }

    /// ACL with no entries
    pub fn empty() -> Self {
        Self(Value::Array(Vec::new()))
    }

    /// Underlying document
    pub fn document(&self) -> &Value {
        &self.0
    }
}

/// "ACL grants privilege to principal"
pub trait AclEvaluator: Send + Sync {
    /// Whether `acl` grants `privilege` to the principal of `ac`, with
    /// relative principals resolved against `cell_url`
    fn grants(&self, ac: &AccessContext, acl: &Acl, privilege: &Privilege, cell_url: &str) -> bool;
}

/// "Unit-level token covers privilege"
pub trait UnitTokenScope: Send + Sync {
    /// Whether the unit-level credential in `ac` covers `privilege`
    fn covers(&self, ac: &AccessContext, privilege: &Privilege) -> bool;
}

/// Unit scope where every unit-level token covers every privilege
#[derive(Debug, Clone, Copy, Default)]
pub struct FullUnitScope;

impl UnitTokenScope for FullUnitScope {
    fn covers(&self, _ac: &AccessContext, _privilege: &Privilege) -> bool {
        true
    }
}

impl<F> AclEvaluator for F
where
    F: Fn(&AccessContext, &Acl, &Privilege, &str) -> bool + Send + Sync,
{
    fn grants(&self, ac: &AccessContext, acl: &Acl, privilege: &Privilege, cell_url: &str) -> bool {
        self(ac, acl, privilege, cell_url)
    }
}
