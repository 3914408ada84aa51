//! # Schain Firewall
//!
//! Derives the inbound endpoints a node must open for a schain and keeps the
//! host packet filter in sync with them.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! A node serving a schain must accept:
//! - the four consensus channels of every *other* committee member
//! - connections from anywhere to its own four RPC ports
//!
//! The engine derives that endpoint list from the schain config and pushes
//! the kernel `filter/INPUT` chain towards containing one `ACCEPT` rule per
//! endpoint. Every step re-checks rule existence, so repeating a call after a
//! partial failure converges.
//!
//! ## Module Structure
//!
//! ```text
//! schain-firewall/
//! ├── domain/          # Endpoint, FirewallRule, SchainConfig, PortOffsets, errors
//! ├── algorithms/      # Endpoint derivation (consensus, rpc, snapshot)
//! ├── ports/           # SchainFirewallApi (inbound), FirewallBinding (outbound)
//! ├── adapters/        # iptables executable, in-memory fake, advisory lock
//! └── service/         # Reconciler + orchestration entry points
//! ```
//!
//! ## Example
//!
//! ```rust
//! use schain_firewall::{
//!     InMemoryFirewall, PortOffsets, SchainConfig, SchainFirewallApi, SchainFirewallService,
//! };
//!
//! let config = SchainConfig::from_json_str(r#"{
//!     "skaleConfig": {
//!         "nodeInfo": {
//!             "nodeID": 1, "basePort": 10000,
//!             "httpRpcPort": 10003, "wsRpcPort": 10002,
//!             "httpsRpcPort": 10008, "wssRpcPort": 10007
//!         },
//!         "sChain": { "nodes": [
//!             { "nodeID": 1, "ip": "10.0.0.1" },
//!             { "nodeID": 2, "ip": "10.0.0.2" }
//!         ] }
//!     }
//! }"#).unwrap();
//!
//! let service = SchainFirewallService::new(InMemoryFirewall::new(), PortOffsets::default());
//! let report = service.apply_rules(&config).unwrap();
//! assert_eq!(report.changed, 8);
//! assert_eq!(service.show_rules(&config).unwrap().len(), 8);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{AdvisoryLock, InMemoryFirewall, IptablesFirewall};
pub use algorithms::{allowed_endpoints, consensus_endpoints, rpc_endpoints, snapshot_endpoints};
pub use domain::{
    invariant_no_self_endpoints, Endpoint, FirewallError, FirewallRule, NodeInfo, PortOffsets,
    SchainConfig, SchainInfo, SchainNode, SkaleConfig, FILTER_TABLE, INPUT_CHAIN,
};
pub use ports::{FirewallBinding, SchainFirewallApi};
pub use service::{ReconcileReport, Reconciler, SchainFirewallService};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
