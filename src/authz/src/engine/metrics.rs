//! Decision counters for engine observability

use std::sync::atomic::{AtomicU64, Ordering};

use super::decision::{AllowBasis, Decision, DenyReason};

/// Point-in-time copy of the decision counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecisionStats {
    /// Total number of decisions
    pub total: u64,

    /// Allowed through the unit-level bypass
    pub allowed_unit_level: u64,

    /// Allowed by a resource ACL
    pub allowed_acl: u64,

    /// Denied, token rejected
    pub denied_invalid_token: u64,

    /// Denied, no credential
    pub denied_authorization_required: u64,

    /// Denied, privilege not granted
    pub denied_privilege_lacking: u64,
}

impl DecisionStats {
    /// Allowed decisions
    pub fn allowed(&self) -> u64 {
        self.allowed_unit_level + self.allowed_acl
    }

    /// Denied decisions
    pub fn denied(&self) -> u64 {
        self.denied_invalid_token + self.denied_authorization_required + self.denied_privilege_lacking
    }

    /// Calculate allow rate
    pub fn allow_rate(&self) -> f64 {
        let total = self.allowed() + self.denied();
        if total == 0 {
            0.0
        } else {
            self.allowed() as f64 / total as f64
        }
    }
}

/// Lock-free decision counters
#[derive(Debug, Default)]
pub struct DecisionMetrics {
    total: AtomicU64,
    allowed_unit_level: AtomicU64,
    allowed_acl: AtomicU64,
    denied_invalid_token: AtomicU64,
    denied_authorization_required: AtomicU64,
    denied_privilege_lacking: AtomicU64,
}

impl DecisionMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an authorization decision
    pub fn record(&self, decision: &Decision) {
        self.total.fetch_add(1, Ordering::Relaxed);

        let counter = match decision {
            Decision::Allow { basis: AllowBasis::UnitLevelToken } => &self.allowed_unit_level,
            Decision::Allow { basis: AllowBasis::Acl } => &self.allowed_acl,
            Decision::Deny(denial) => match denial.reason {
                DenyReason::InvalidToken => &self.denied_invalid_token,
                DenyReason::AuthorizationRequired => &self.denied_authorization_required,
                DenyReason::PrivilegeLacking => &self.denied_privilege_lacking,
            },
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current counters
    pub fn snapshot(&self) -> DecisionStats {
        DecisionStats {
            total: self.total.load(Ordering::Relaxed),
            allowed_unit_level: self.allowed_unit_level.load(Ordering::Relaxed),
            allowed_acl: self.allowed_acl.load(Ordering::Relaxed),
            denied_invalid_token: self.denied_invalid_token.load(Ordering::Relaxed),
            denied_authorization_required: self.denied_authorization_required.load(Ordering::Relaxed),
            denied_privilege_lacking: self.denied_privilege_lacking.load(Ordering::Relaxed),
        }
    }

    /// Calculate allow rate
    pub fn allow_rate(&self) -> f64 {
        self.snapshot().allow_rate()
    }

    /// Reset all counters
    pub fn reset(&self) {
        for counter in [
            &self.total,
            &self.allowed_unit_level,
            &self.allowed_acl,
            &self.denied_invalid_token,
            &self.denied_authorization_required,
            &self.denied_privilege_lacking,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::decision::Denial;

    #[test]
    fn test_metrics_creation() {
        let metrics = DecisionMetrics::new();
        let stats = metrics.snapshot();

        assert_eq!(stats.total, 0);
        assert_eq!(stats.allow_rate(), 0.0);
    }

    #[test]
    fn test_record_decision() {
        let metrics = DecisionMetrics::new();

        metrics.record(&Decision::allow(AllowBasis::Acl));
        metrics.record(&Decision::allow(AllowBasis::UnitLevelToken));
        metrics.record(&Decision::Deny(Denial::privilege_lacking()));

        let stats = metrics.snapshot();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.allowed(), 2);
        assert_eq!(stats.allowed_unit_level, 1);
        assert_eq!(stats.denied_privilege_lacking, 1);
        assert!((metrics.allow_rate() - 0.666).abs() < 0.01);
    }

    #[test]
    fn test_reset() {
        let metrics = DecisionMetrics::new();

        metrics.record(&Decision::allow(AllowBasis::Acl));
        metrics.reset();

        assert_eq!(metrics.snapshot(), DecisionStats::default());
    }
}
