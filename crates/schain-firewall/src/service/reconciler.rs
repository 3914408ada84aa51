//! Reconciler
//!
//! Pushes the `filter/INPUT` chain towards containing (or not containing)
//! one rule per endpoint. Each rule is checked before it is touched, so a
//! repeated call after a partial failure converges. Errors are fail-fast:
//! the first binding error aborts the batch.

use crate::domain::{Endpoint, FirewallError, FirewallRule, FILTER_TABLE, INPUT_CHAIN};
use crate::ports::FirewallBinding;
use tracing::{debug, info};

/// Outcome of an add or remove pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Rules inserted or deleted.
    pub changed: usize,
    /// Rules already in the target state.
    pub unchanged: usize,
}

impl ReconcileReport {
    /// Endpoints visited.
    pub fn total(&self) -> usize {
        self.changed + self.unchanged
    }
}

/// Rule reconciler over a fixed table and chain.
pub struct Reconciler<B> {
    binding: B,
    table: &'static str,
    chain: &'static str,
}

impl<B: FirewallBinding> Reconciler<B> {
    /// Reconciler on `filter/INPUT`.
    pub fn new(binding: B) -> Self {
        Self {
            binding,
            table: FILTER_TABLE,
            chain: INPUT_CHAIN,
        }
    }

    /// Underlying binding.
    pub fn binding(&self) -> &B {
        &self.binding
    }

    /// Whether `rule` is present.
    pub fn has_rule(&self, rule: &FirewallRule) -> Result<bool, FirewallError> {
        self.binding.has_rule(self.table, self.chain, rule)
    }

    /// Insert a rule for every endpoint that does not have one yet.
    pub fn add_rules(&self, endpoints: &[Endpoint]) -> Result<ReconcileReport, FirewallError> {
        info!("[schain-fw] Adding iptables rules for {} endpoints", endpoints.len());
        let mut report = ReconcileReport::default();
        for endpoint in endpoints {
            let rule = FirewallRule::from_endpoint(endpoint);
            if self.has_rule(&rule)? {
                debug!("[schain-fw] {} already allowed", endpoint);
                report.unchanged += 1;
            } else {
                self.binding.insert_rule(self.table, self.chain, &rule)?;
                debug!("[schain-fw] allowed {}", endpoint);
                report.changed += 1;
            }
        }
        info!(
            "[schain-fw] Added {} rules ({} already present)",
            report.changed, report.unchanged
        );
        Ok(report)
    }

    /// Delete the rule of every endpoint that has one.
    pub fn remove_rules(&self, endpoints: &[Endpoint]) -> Result<ReconcileReport, FirewallError> {
        info!("[schain-fw] Removing iptables rules for {} endpoints", endpoints.len());
        let mut report = ReconcileReport::default();
        for endpoint in endpoints {
            let rule = FirewallRule::from_endpoint(endpoint);
            if self.has_rule(&rule)? {
                self.binding.delete_rule(self.table, self.chain, &rule)?;
                debug!("[schain-fw] revoked {}", endpoint);
                report.changed += 1;
            } else {
                debug!("[schain-fw] {} not allowed, nothing to revoke", endpoint);
                report.unchanged += 1;
            }
        }
        info!(
            "[schain-fw] Removed {} rules ({} already absent)",
            report.changed, report.unchanged
        );
        Ok(report)
    }

    /// Endpoints whose rule exists, in input order. Read-only.
    pub fn added_allowed_endpoints(
        &self,
        endpoints: &[Endpoint],
    ) -> Result<Vec<Endpoint>, FirewallError> {
        let mut applied = Vec::new();
        for endpoint in endpoints {
            if self.has_rule(&FirewallRule::from_endpoint(endpoint))? {
                applied.push(endpoint.clone());
            }
        }
        Ok(applied)
    }
}
