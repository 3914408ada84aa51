//! Schain Firewall Service
//!
//! Implements [`SchainFirewallApi`]: derive the schain's endpoints, then run
//! one reconciler pass over all of them.

use super::reconciler::{ReconcileReport, Reconciler};
use crate::adapters::AdvisoryLock;
use crate::algorithms::allowed_endpoints;
use crate::domain::{
    invariant_no_self_endpoints, Endpoint, FirewallError, PortOffsets, SchainConfig,
};
use crate::ports::{FirewallBinding, SchainFirewallApi};
use tracing::info;

/// Per-schain orchestration over a firewall binding.
pub struct SchainFirewallService<B> {
    reconciler: Reconciler<B>,
    offsets: PortOffsets,
    lock: Option<AdvisoryLock>,
}

impl<B: FirewallBinding> SchainFirewallService<B> {
    /// Service without an advisory lock.
    pub fn new(binding: B, offsets: PortOffsets) -> Self {
        Self {
            reconciler: Reconciler::new(binding),
            offsets,
            lock: None,
        }
    }

    /// Hold `lock` for the duration of each entry point call.
    #[must_use]
    pub fn with_lock(mut self, lock: AdvisoryLock) -> Self {
        self.lock = Some(lock);
        self
    }

    /// Underlying reconciler.
    pub fn reconciler(&self) -> &Reconciler<B> {
        &self.reconciler
    }

    /// Port offsets used for consensus endpoints.
    pub fn offsets(&self) -> &PortOffsets {
        &self.offsets
    }

    /// Endpoints of `config`, in reconciliation order.
    pub fn endpoints(&self, config: &SchainConfig) -> Result<Vec<Endpoint>, FirewallError> {
        let endpoints = allowed_endpoints(config, &self.offsets)?;
        debug_assert!(invariant_no_self_endpoints(config, &endpoints));
        Ok(endpoints)
    }

    fn locked<T>(
        &self,
        f: impl FnOnce() -> Result<T, FirewallError>,
    ) -> Result<T, FirewallError> {
        let _guard = match &self.lock {
            Some(lock) => Some(lock.acquire()?),
            None => None,
        };
        f()
    }
}

impl<B: FirewallBinding> SchainFirewallApi for SchainFirewallService<B> {
    fn apply_rules(&self, config: &SchainConfig) -> Result<ReconcileReport, FirewallError> {
        let endpoints = self.endpoints(config)?;
        info!(
            "[schain-fw] Applying rules for schain {}",
            config.schain_name().unwrap_or("<unnamed>")
        );
        self.locked(|| self.reconciler.add_rules(&endpoints))
    }

    fn revoke_rules(&self, config: &SchainConfig) -> Result<ReconcileReport, FirewallError> {
        let endpoints = self.endpoints(config)?;
        info!(
            "[schain-fw] Revoking rules for schain {}",
            config.schain_name().unwrap_or("<unnamed>")
        );
        self.locked(|| self.reconciler.remove_rules(&endpoints))
    }

    fn show_rules(&self, config: &SchainConfig) -> Result<Vec<Endpoint>, FirewallError> {
        let endpoints = self.endpoints(config)?;
        self.locked(|| self.reconciler.added_allowed_endpoints(&endpoints))
    }
}
