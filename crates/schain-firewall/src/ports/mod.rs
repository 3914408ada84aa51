//! # Ports Layer
//!
//! - **Inbound:** [`SchainFirewallApi`], what callers can ask of the engine.
//! - **Outbound:** [`FirewallBinding`], what the engine needs from the host.

pub mod inbound;
pub mod outbound;

pub use inbound::SchainFirewallApi;
pub use outbound::FirewallBinding;
