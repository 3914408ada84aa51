//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the outbound [`FirewallBinding`](crate::ports::FirewallBinding)
//! port, plus the advisory lock used around orchestration calls.

mod iptables;
mod lock;
mod memory;

pub use iptables::IptablesFirewall;
pub use lock::AdvisoryLock;
pub use memory::InMemoryFirewall;
