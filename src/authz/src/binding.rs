//! Resource bindings: what a request targets and where it sits in the tree

use serde::{Deserialize, Serialize};

use crate::acl::Acl;
use crate::types::AuthSchemes;

/// Cell that owns the resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRef {
    /// Cell name
    pub name: String,
    /// Cell URL, ending in `/`
    pub url: String,
}

impl CellRef {
    /// Create a cell reference
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Box that owns a box-level resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxRef {
    /// Box name
    pub name: String,
    /// Application schema URL the box is bound to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

impl BoxRef {
    /// Create a box reference without a schema
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
        }
    }

    /// Bind the box to an application schema
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }
}

/// Position of a resource in the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum ResourceScope {
    /// Cell-level resource; there is never a box
    Cell,
    /// Resource inside a box
    Box(BoxRef),
}

impl ResourceScope {
    /// Schemes advertised in challenges for resources at this scope
    pub fn acceptable_schemes(&self) -> AuthSchemes {
        match self {
            Self::Cell => AuthSchemes::BearerOnly,
            Self::Box(b) if b.schema.is_some() => AuthSchemes::BearerOnly,
            Self::Box(_) => AuthSchemes::BearerAndBasic,
        }
    }

    /// Whether Basic credentials may be challenged for at this scope
    ///
    /// Cells carry no box-level credential material.
    pub fn basic_auth_eligible(&self) -> bool {
        self.acceptable_schemes().contains(crate::types::AuthScheme::Basic)
    }

    /// Owning box, if any
    pub fn box_ref(&self) -> Option<&BoxRef> {
        match self {
            Self::Cell => None,
            Self::Box(b) => Some(b),
        }
    }
}

/// Event propagation headers that travel with a request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestTrace {
    /// Request key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_key: Option<String>,
    /// Event id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    /// Rule chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_chain: Option<String>,
    /// Via
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
}

/// Target of one request
///
/// `acl` is `None` when the requested path does not resolve to an existing
/// resource.
#[derive(Debug, Clone)]
pub struct ResourceBinding {
    cell: CellRef,
    scope: ResourceScope,
    acl: Option<Acl>,
    trace: RequestTrace,
}

impl ResourceBinding {
    /// Existing cell-level resource
    pub fn cell(cell: CellRef, acl: Acl) -> Self {
        Self {
            cell,
            scope: ResourceScope::Cell,
            acl: Some(acl),
            trace: RequestTrace::default(),
        }
    }

    /// Existing box-level resource
    pub fn in_box(cell: CellRef, box_ref: BoxRef, acl: Acl) -> Self {
        Self {
            cell,
            scope: ResourceScope::Box(box_ref),
            acl: Some(acl),
            trace: RequestTrace::default(),
        }
    }

    /// Path that does not resolve to a resource
    pub fn unbound(cell: CellRef, scope: ResourceScope) -> Self {
        Self {
            cell,
            scope,
            acl: None,
            trace: RequestTrace::default(),
        }
    }

    /// Attach event propagation headers
    pub fn with_trace(mut self, trace: RequestTrace) -> Self {
        self.trace = trace;
        self
    }

    /// Owning cell
    pub fn cell_ref(&self) -> &CellRef {
        &self.cell
    }

    /// Scope tag
    pub fn scope(&self) -> &ResourceScope {
        &self.scope
    }

    /// Resolved ACL, `None` when unbound
    pub fn acl(&self) -> Option<&Acl> {
        self.acl.as_ref()
    }

    /// Whether the path resolved to an existing resource
    pub fn is_bound(&self) -> bool {
        self.acl.is_some()
    }

    /// Request trace headers
    pub fn trace(&self) -> &RequestTrace {
        &self.trace
    }

    /// Resource URL
    pub fn url(&self) -> String {
        match &self.scope {
            ResourceScope::Cell => self.cell.url.clone(),
            ResourceScope::Box(b) => format!("{}{}/", self.cell.url, b.name),
        }
    }

    /// Schemes advertised in challenges for this resource
    pub fn acceptable_schemes(&self) -> AuthSchemes {
        self.scope.acceptable_schemes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell() -> CellRef {
        CellRef::new("alice", "https://unit.example.com/alice/")
    }

    #[test]
    fn test_cell_scope_is_bearer_only() {
        let binding = ResourceBinding::cell(cell(), Acl::empty());
        assert_eq!(binding.acceptable_schemes(), AuthSchemes::BearerOnly);
        assert!(!binding.scope().basic_auth_eligible());
        assert!(binding.scope().box_ref().is_none());
        assert_eq!(binding.url(), "https://unit.example.com/alice/");
    }

    #[test]
    fn test_box_scope_schemes() {
        let open = ResourceScope::Box(BoxRef::new("box1"));
        assert_eq!(open.acceptable_schemes(), AuthSchemes::BearerAndBasic);
        assert!(open.basic_auth_eligible());

        let bound = ResourceScope::Box(BoxRef::new("app").with_schema("https://app.example.com/"));
        assert_eq!(bound.acceptable_schemes(), AuthSchemes::BearerOnly);
        assert!(!bound.basic_auth_eligible());
    }

    #[test]
    fn test_box_url() {
        let binding = ResourceBinding::in_box(cell(), BoxRef::new("box1"), Acl::empty());
        assert_eq!(binding.url(), "https://unit.example.com/alice/box1/");
    }

    #[test]
    fn test_unbound() {
        let binding = ResourceBinding::unbound(cell(), ResourceScope::Cell);
        assert!(!binding.is_bound());
        assert!(binding.acl().is_none());
    }

    #[test]
    fn test_scope_serde_tag() {
        let json = serde_json::to_value(ResourceScope::Box(BoxRef::new("box1"))).unwrap();
        assert_eq!(json["scope"], "box");
        assert_eq!(json["name"], "box1");
    }
}
