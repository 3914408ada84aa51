//! # Inbound Ports
//!
//! API trait defining what the schain firewall engine can do.

use crate::domain::{Endpoint, FirewallError, SchainConfig};
use crate::service::ReconcileReport;

/// Schain firewall API - inbound port.
///
/// Each call derives the full endpoint list of `config` and performs exactly
/// one reconciliation pass over it.
pub trait SchainFirewallApi {
    /// Allow every endpoint of the schain. Stops at the first failed insert.
    fn apply_rules(&self, config: &SchainConfig) -> Result<ReconcileReport, FirewallError>;

    /// Remove every endpoint of the schain. Stops at the first failed delete.
    fn revoke_rules(&self, config: &SchainConfig) -> Result<ReconcileReport, FirewallError>;

    /// Endpoints of the schain that currently have a rule, in derivation order.
    fn show_rules(&self, config: &SchainConfig) -> Result<Vec<Endpoint>, FirewallError>;
}
