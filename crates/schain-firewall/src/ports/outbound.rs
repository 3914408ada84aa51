//! # Driven Ports (Outbound SPI)
//!
//! The packet filter interface the host must provide.

use crate::domain::{FirewallError, FirewallRule};

/// Kernel packet filter, addressed by table and chain.
///
/// `has_rule` answers semantic presence: a rule with the same protocol,
/// target, source and destination port, where absent fields match any value.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the table behind them is process
/// wide shared state and check-then-act sequences are not atomic.
pub trait FirewallBinding: Send + Sync {
    /// Whether `rule` is present in `table`/`chain`.
    fn has_rule(
        &self,
        table: &str,
        chain: &str,
        rule: &FirewallRule,
    ) -> Result<bool, FirewallError>;

    /// Insert `rule` at the head of `table`/`chain`.
    fn insert_rule(
        &self,
        table: &str,
        chain: &str,
        rule: &FirewallRule,
    ) -> Result<(), FirewallError>;

    /// Delete one occurrence of `rule` from `table`/`chain`.
    fn delete_rule(
        &self,
        table: &str,
        chain: &str,
        rule: &FirewallRule,
    ) -> Result<(), FirewallError>;
}

impl<B: FirewallBinding + ?Sized> FirewallBinding for &B {
    fn has_rule(
        &self,
        table: &str,
        chain: &str,
        rule: &FirewallRule,
    ) -> Result<bool, FirewallError> {
        (**self).has_rule(table, chain, rule)
    }

    fn insert_rule(
        &self,
        table: &str,
        chain: &str,
        rule: &FirewallRule,
    ) -> Result<(), FirewallError> {
        (**self).insert_rule(table, chain, rule)
    }

    fn delete_rule(
        &self,
        table: &str,
        chain: &str,
        rule: &FirewallRule,
    ) -> Result<(), FirewallError> {
        (**self).delete_rule(table, chain, rule)
    }
}

impl<B: FirewallBinding + ?Sized> FirewallBinding for Box<B> {
    fn has_rule(
        &self,
        table: &str,
        chain: &str,
        rule: &FirewallRule,
    ) -> Result<bool, FirewallError> {
        (**self).has_rule(table, chain, rule)
    }

    fn insert_rule(
        &self,
        table: &str,
        chain: &str,
        rule: &FirewallRule,
    ) -> Result<(), FirewallError> {
        (**self).insert_rule(table, chain, rule)
    }

    fn delete_rule(
        &self,
        table: &str,
        chain: &str,
        rule: &FirewallRule,
    ) -> Result<(), FirewallError> {
        (**self).delete_rule(table, chain, rule)
    }
}
