//! # Algorithms Module
//!
//! Endpoint derivation from a schain config.

pub mod endpoints;

pub use endpoints::{allowed_endpoints, consensus_endpoints, rpc_endpoints, snapshot_endpoints};
