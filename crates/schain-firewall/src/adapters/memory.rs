//! In-Memory Firewall Adapter
//!
//! Implements `FirewallBinding` over a map of chains. Behaves like iptables
//! for the three operations the engine uses: `-I` prepends, `-D` removes the
//! first match and fails when there is none, `-C` compares all fields.
//!
//! Failures can be injected per rule and per operation to exercise the
//! engine's error paths.

use crate::domain::{FirewallError, FirewallRule};
use crate::ports::FirewallBinding;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

type ChainKey = (String, String);

/// Exit status reported by injected failures.
const INJECTED_FAILURE_CODE: i32 = 4;

/// Deterministic in-memory packet filter.
///
/// Used by tests and by dry runs; never touches the kernel.
#[derive(Default)]
pub struct InMemoryFirewall {
    /// Rules per (table, chain), head first.
    chains: RwLock<HashMap<ChainKey, Vec<FirewallRule>>>,
    /// Rules whose insertion is rejected.
    rejected_inserts: RwLock<HashSet<FirewallRule>>,
    /// Rules whose deletion is rejected.
    rejected_deletes: RwLock<HashSet<FirewallRule>>,
    /// Rules whose existence check fails.
    failed_checks: RwLock<HashSet<FirewallRule>>,
    /// Successful inserts and deletes.
    mutations: AtomicUsize,
}

impl InMemoryFirewall {
    /// Create an empty firewall.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject future inserts of `rule`, as a kernel refusing it would.
    pub fn reject_inserts_of(&self, rule: FirewallRule) {
        self.rejected_inserts.write().insert(rule);
    }

    /// Reject future deletes of `rule`.
    pub fn reject_deletes_of(&self, rule: FirewallRule) {
        self.rejected_deletes.write().insert(rule);
    }

    /// Fail future existence checks of `rule`.
    pub fn fail_checks_of(&self, rule: FirewallRule) {
        self.failed_checks.write().insert(rule);
    }

    /// Drop every injected failure.
    pub fn clear_rejections(&self) {
        self.rejected_inserts.write().clear();
        self.rejected_deletes.write().clear();
        self.failed_checks.write().clear();
    }

    /// Rules of `table`/`chain`, head first.
    pub fn rules(&self, table: &str, chain: &str) -> Vec<FirewallRule> {
        self.chains
            .read()
            .get(&key(table, chain))
            .cloned()
            .unwrap_or_default()
    }

    /// Number of successful inserts and deletes so far.
    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::Relaxed)
    }
}

fn key(table: &str, chain: &str) -> ChainKey {
    (table.to_string(), chain.to_string())
}

fn injected(op: &'static str, rule: &FirewallRule) -> FirewallError {
    FirewallError::Backend {
        op,
        code: Some(INJECTED_FAILURE_CODE),
        stderr: format!("{} rejected: {}", op, rule),
    }
}

impl FirewallBinding for InMemoryFirewall {
    fn has_rule(
        &self,
        table: &str,
        chain: &str,
        rule: &FirewallRule,
    ) -> Result<bool, FirewallError> {
        if self.failed_checks.read().contains(rule) {
            return Err(injected("check", rule));
        }

        Ok(self
            .chains
            .read()
            .get(&key(table, chain))
            .is_some_and(|rules| rules.contains(rule)))
    }

    fn insert_rule(
        &self,
        table: &str,
        chain: &str,
        rule: &FirewallRule,
    ) -> Result<(), FirewallError> {
        if self.rejected_inserts.read().contains(rule) {
            return Err(injected("insert", rule));
        }

        debug!("[schain-fw] memory: -t {} -I {} {}", table, chain, rule);
        self.chains
            .write()
            .entry(key(table, chain))
            .or_default()
            .insert(0, rule.clone());
        self.mutations.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn delete_rule(
        &self,
        table: &str,
        chain: &str,
        rule: &FirewallRule,
    ) -> Result<(), FirewallError> {
        if self.rejected_deletes.read().contains(rule) {
            return Err(injected("delete", rule));
        }

        let mut chains = self.chains.write();
        let position = chains
            .get(&key(table, chain))
            .and_then(|rules| rules.iter().position(|r| r == rule));

        match position {
            Some(index) => {
                debug!("[schain-fw] memory: -t {} -D {} {}", table, chain, rule);
                if let Some(rules) = chains.get_mut(&key(table, chain)) {
                    rules.remove(index);
                }
                self.mutations.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            None => Err(FirewallError::Backend {
                op: "delete",
                code: Some(1),
                stderr: "Bad rule (does a matching rule exist in that chain?)".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Endpoint, FILTER_TABLE, INPUT_CHAIN};

    fn rule(port: u16) -> FirewallRule {
        FirewallRule::from_endpoint(&Endpoint::new("10.0.0.2", port))
    }

    #[test]
    fn test_insert_then_has_rule() {
        let fw = InMemoryFirewall::new();
        assert!(!fw.has_rule(FILTER_TABLE, INPUT_CHAIN, &rule(2001)).unwrap());
        fw.insert_rule(FILTER_TABLE, INPUT_CHAIN, &rule(2001)).unwrap();
        assert!(fw.has_rule(FILTER_TABLE, INPUT_CHAIN, &rule(2001)).unwrap());
        assert_eq!(fw.mutation_count(), 1);
    }

    #[test]
    fn test_insert_prepends() {
        let fw = InMemoryFirewall::new();
        fw.insert_rule(FILTER_TABLE, INPUT_CHAIN, &rule(2001)).unwrap();
        fw.insert_rule(FILTER_TABLE, INPUT_CHAIN, &rule(2002)).unwrap();
        assert_eq!(
            fw.rules(FILTER_TABLE, INPUT_CHAIN),
            vec![rule(2002), rule(2001)]
        );
    }

    #[test]
    fn test_chains_are_isolated() {
        let fw = InMemoryFirewall::new();
        fw.insert_rule(FILTER_TABLE, "FORWARD", &rule(2001)).unwrap();
        assert!(!fw.has_rule(FILTER_TABLE, INPUT_CHAIN, &rule(2001)).unwrap());
        assert!(fw.rules(FILTER_TABLE, INPUT_CHAIN).is_empty());
    }

    #[test]
    fn test_any_source_rule_is_distinct() {
        let fw = InMemoryFirewall::new();
        fw.insert_rule(FILTER_TABLE, INPUT_CHAIN, &rule(2001)).unwrap();
        let open = FirewallRule::from_endpoint(&Endpoint::any_source(2001));
        assert!(!fw.has_rule(FILTER_TABLE, INPUT_CHAIN, &open).unwrap());
    }

    #[test]
    fn test_delete_removes_one_occurrence() {
        let fw = InMemoryFirewall::new();
        fw.insert_rule(FILTER_TABLE, INPUT_CHAIN, &rule(2001)).unwrap();
        fw.insert_rule(FILTER_TABLE, INPUT_CHAIN, &rule(2001)).unwrap();
        fw.delete_rule(FILTER_TABLE, INPUT_CHAIN, &rule(2001)).unwrap();
        assert_eq!(fw.rules(FILTER_TABLE, INPUT_CHAIN).len(), 1);
    }

    #[test]
    fn test_delete_missing_rule_fails() {
        let fw = InMemoryFirewall::new();
        let err = fw
            .delete_rule(FILTER_TABLE, INPUT_CHAIN, &rule(2001))
            .unwrap_err();
        assert!(matches!(err, FirewallError::Backend { op: "delete", .. }));
        assert_eq!(fw.mutation_count(), 0);
    }

    #[test]
    fn test_rejected_insert() {
        let fw = InMemoryFirewall::new();
        fw.reject_inserts_of(rule(2001));
        let err = fw
            .insert_rule(FILTER_TABLE, INPUT_CHAIN, &rule(2001))
            .unwrap_err();
        assert!(matches!(err, FirewallError::Backend { op: "insert", .. }));

        fw.clear_rejections();
        fw.insert_rule(FILTER_TABLE, INPUT_CHAIN, &rule(2001)).unwrap();
        assert!(fw.has_rule(FILTER_TABLE, INPUT_CHAIN, &rule(2001)).unwrap());
    }

    #[test]
    fn test_rejected_delete_keeps_rule() {
        let fw = InMemoryFirewall::new();
        fw.insert_rule(FILTER_TABLE, INPUT_CHAIN, &rule(2001)).unwrap();
        fw.reject_deletes_of(rule(2001));

        let err = fw
            .delete_rule(FILTER_TABLE, INPUT_CHAIN, &rule(2001))
            .unwrap_err();
        assert!(matches!(
            err,
            FirewallError::Backend {
                op: "delete",
                code: Some(INJECTED_FAILURE_CODE),
                ..
            }
        ));
        assert_eq!(fw.rules(FILTER_TABLE, INPUT_CHAIN), vec![rule(2001)]);
        assert_eq!(fw.mutation_count(), 1);
    }

    #[test]
    fn test_failed_check() {
        let fw = InMemoryFirewall::new();
        fw.fail_checks_of(rule(2001));
        let err = fw
            .has_rule(FILTER_TABLE, INPUT_CHAIN, &rule(2001))
            .unwrap_err();
        assert!(matches!(err, FirewallError::Backend { op: "check", .. }));
        assert!(!fw.has_rule(FILTER_TABLE, INPUT_CHAIN, &rule(2002)).unwrap());

        fw.clear_rejections();
        assert!(!fw.has_rule(FILTER_TABLE, INPUT_CHAIN, &rule(2001)).unwrap());
    }
}
