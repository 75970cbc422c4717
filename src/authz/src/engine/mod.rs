//! Authorization decision engine
//!
//! Turns an access context and a required privilege into an allow or a
//! classified deny for one resource binding.

pub mod decision;
pub mod metrics;

pub use decision::{AllowBasis, Challenge, Decision, Denial, DenyReason};
pub use metrics::{DecisionMetrics, DecisionStats};

use cellguard_config::ConfigStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::acl::{AclEvaluator, UnitTokenScope};
use crate::binding::ResourceBinding;
use crate::error::Result;
use crate::types::{AccessContext, Privilege, TokenClass};

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Enable metrics collection
    pub enable_metrics: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enable_metrics: true,
        }
    }
}

/// Whether an issuer may mint unit user tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssuerVerdict {
    /// Listed in `unitUser.issuers`
    Accepted,
    /// Not listed, or no allow-list configured
    Rejected,
}

impl IssuerVerdict {
    /// Whether the issuer was accepted
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Per-request authorization engine
///
/// # Pipeline
///
/// ```text
/// UNIT_LEVEL + covered ─────────────► Allow(UnitLevelToken)
///        │
///        ▼
/// record Basic eligibility on the context
///        │
///        ▼
/// bound + ACL grants ───────────────► Allow(Acl)
///        │
///        ▼
/// INVALID → InvalidToken | ANONYMOUS → AuthorizationRequired | PrivilegeLacking
/// ```
///
/// The engine only reads the config store, the ACL and the context's
/// credential fields.
pub struct AuthorizationEngine {
    /// Unit configuration
    config: Arc<ConfigStore>,

    /// ACL predicate
    acl: Arc<dyn AclEvaluator>,

    /// Unit-level token scope predicate
    unit_scope: Arc<dyn UnitTokenScope>,

    /// Decision counters
    metrics: Option<Arc<DecisionMetrics>>,
}

impl AuthorizationEngine {
    /// Create an engine over the given config store and collaborators
    pub fn new(
        engine_config: EngineConfig,
        config: Arc<ConfigStore>,
        acl: Arc<dyn AclEvaluator>,
        unit_scope: Arc<dyn UnitTokenScope>,
    ) -> Self {
        let metrics = engine_config
            .enable_metrics
            .then(|| Arc::new(DecisionMetrics::new()));

        info!(
            "AuthorizationEngine initialized with metrics={}",
            engine_config.enable_metrics
        );

        Self {
            config,
            acl,
            unit_scope,
            metrics,
        }
    }

    /// Decide whether `ac` may exercise `required` on `binding`
    ///
    /// Side effect: records on `ac` whether Basic challenges are permissible
    /// for the binding's scope, unless the unit-level bypass allowed first.
    pub fn authorize(
        &self,
        ac: &AccessContext,
        required: &Privilege,
        binding: &ResourceBinding,
    ) -> Decision {
        let decision = self.evaluate(ac, required, binding);

        let trace = binding.trace();
        match &decision {
            Decision::Allow { basis } => debug!(
                subject = ac.subject().unwrap_or("-"),
                resource = %binding.url(),
                privilege = %required,
                request_key = trace.request_key.as_deref().unwrap_or("-"),
                event_id = trace.event_id.as_deref().unwrap_or("-"),
                "Authorization allowed ({:?})",
                basis
            ),
            Decision::Deny(denial) => info!(
                subject = ac.subject().unwrap_or("-"),
                resource = %binding.url(),
                privilege = %required,
                token = ?ac.token_class(),
                request_key = trace.request_key.as_deref().unwrap_or("-"),
                event_id = trace.event_id.as_deref().unwrap_or("-"),
                rule_chain = trace.rule_chain.as_deref().unwrap_or("-"),
                via = trace.via.as_deref().unwrap_or("-"),
                "Authorization denied: {}",
                denial.reason
            ),
        }

        if let Some(metrics) = &self.metrics {
            metrics.record(&decision);
        }

        decision
    }

    fn evaluate(
        &self,
        ac: &AccessContext,
        required: &Privilege,
        binding: &ResourceBinding,
    ) -> Decision {
        // Step 1: unit-level bypass
        if ac.token_class() == TokenClass::UnitLevel && self.unit_scope.covers(ac, required) {
            return Decision::allow(AllowBasis::UnitLevelToken);
        }

        // Step 2: Basic-auth eligibility
        ac.record_basic_auth_eligibility(binding.scope().basic_auth_eligible());

        // Step 3: ACL, skipped for unbound paths
        if let Some(acl) = binding.acl() {
            if self.acl.grants(ac, acl, required, &binding.cell_ref().url) {
                return Decision::allow(AllowBasis::Acl);
            }
        } else {
            debug!(resource = %binding.url(), "Unbound resource, ACL not consulted");
        }

        // Step 4: failure classification
        let schemes = binding.acceptable_schemes();
        match ac.token_class() {
            TokenClass::Invalid => {
                Decision::Deny(Denial::invalid_token(Challenge::invalid_token(ac.realm(), schemes)))
            }
            TokenClass::Anonymous => Decision::Deny(Denial::authorization_required(
                Challenge::new(ac.realm(), schemes),
            )),
            TokenClass::Valid | TokenClass::UnitLevel => Decision::Deny(Denial::privilege_lacking()),
        }
    }

    /// Check `issuer` against the `unitUser.issuers` allow-list
    pub fn classify_issuer(&self, issuer: &str, unit_base_url: &str) -> IssuerVerdict {
        if self.config.check_unit_user_issuers(issuer, unit_base_url) {
            IssuerVerdict::Accepted
        } else {
            debug!(issuer, "Issuer not in unit user allow-list");
            IssuerVerdict::Rejected
        }
    }

    /// Check `issuer` for a request addressed to `host`
    ///
    /// The unit base URL is built from the configured scheme, port and path,
    /// so a missing `unitScheme` surfaces as
    /// [`AuthzError::Config`](crate::AuthzError::Config).
    pub fn classify_issuer_for_host(&self, issuer: &str, host: &str) -> Result<IssuerVerdict> {
        let unit_base_url = self.config.base_url(host)?;
        Ok(self.classify_issuer(issuer, &unit_base_url))
    }

    /// Unit configuration the engine reads
    pub fn config(&self) -> &Arc<ConfigStore> {
        &self.config
    }

    /// Decision counters, if enabled
    pub fn metrics(&self) -> Option<DecisionStats> {
        self.metrics.as_ref().map(|m| m.snapshot())
    }
}

impl std::fmt::Debug for AuthorizationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationEngine")
            .field("config", &self.config)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}
