//! # Service Layer
//!
//! Wires the endpoint deriver to the firewall binding.
//!
//! - [`Reconciler`]: add / remove / audit rules for an endpoint list.
//! - [`SchainFirewallService`]: the three per-schain entry points.

mod api;
mod reconciler;

#[cfg(test)]
mod tests;

pub use api::SchainFirewallService;
pub use reconciler::{ReconcileReport, Reconciler};
