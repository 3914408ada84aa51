use super::*;
use crate::adapters::{AdvisoryLock, InMemoryFirewall};
use crate::domain::{
    Endpoint, FirewallError, FirewallRule, PortOffsets, SchainConfig, FILTER_TABLE, INPUT_CHAIN,
};
use crate::ports::{FirewallBinding, SchainFirewallApi};

// =============================================================================
// TEST HELPERS
// =============================================================================

fn scenario_config() -> SchainConfig {
    SchainConfig::from_value(serde_json::json!({
        "skaleConfig": {
            "nodeInfo": {
                "nodeID": 1, "basePort": 2000,
                "httpRpcPort": 2010, "wsRpcPort": 2011,
                "httpsRpcPort": 2012, "wssRpcPort": 2013
            },
            "sChain": {
                "schainName": "test-schain",
                "nodes": [
                    { "nodeID": 1, "ip": "10.0.0.1" },
                    { "nodeID": 2, "ip": "10.0.0.2" }
                ]
            }
        }
    }))
    .unwrap()
}

fn scenario_offsets() -> PortOffsets {
    PortOffsets {
        proposal: 1,
        catchup: 2,
        binary_consensus: 3,
        zmq_broadcast: 4,
    }
}

fn make_service() -> SchainFirewallService<InMemoryFirewall> {
    SchainFirewallService::new(InMemoryFirewall::new(), scenario_offsets())
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

#[test]
fn test_apply_rules_scenario() {
    let service = make_service();
    let report = service.apply_rules(&scenario_config()).unwrap();
    assert_eq!(report, ReconcileReport { changed: 8, unchanged: 0 });

    let rules = service.reconciler().binding().rules(FILTER_TABLE, INPUT_CHAIN);
    assert_eq!(rules.len(), 8);
    assert!(rules.contains(&FirewallRule::from_endpoint(&Endpoint::new("10.0.0.2", 2004))));
    assert!(rules.contains(&FirewallRule::from_endpoint(&Endpoint::any_source(2013))));
    assert!(rules.iter().all(|r| r.src.as_deref() != Some("10.0.0.1")));
}

#[test]
fn test_apply_rules_twice_is_idempotent() {
    let service = make_service();
    service.apply_rules(&scenario_config()).unwrap();
    let before = service.reconciler().binding().rules(FILTER_TABLE, INPUT_CHAIN);

    let report = service.apply_rules(&scenario_config()).unwrap();
    assert_eq!(report, ReconcileReport { changed: 0, unchanged: 8 });
    assert_eq!(service.reconciler().binding().rules(FILTER_TABLE, INPUT_CHAIN), before);
}

#[test]
fn test_show_rules_in_derivation_order() {
    let service = make_service();
    service.apply_rules(&scenario_config()).unwrap();
    let shown = service.show_rules(&scenario_config()).unwrap();
    assert_eq!(shown, service.endpoints(&scenario_config()).unwrap());
}

#[test]
fn test_show_rules_on_clean_firewall_is_empty() {
    let service = make_service();
    assert!(service.show_rules(&scenario_config()).unwrap().is_empty());
}

#[test]
fn test_revoke_rules_clears_schain() {
    let service = make_service();
    service.apply_rules(&scenario_config()).unwrap();
    let report = service.revoke_rules(&scenario_config()).unwrap();
    assert_eq!(report.changed, 8);
    assert!(service.show_rules(&scenario_config()).unwrap().is_empty());
    assert!(service
        .reconciler()
        .binding()
        .rules(FILTER_TABLE, INPUT_CHAIN)
        .is_empty());
}

#[test]
fn test_revoke_keeps_foreign_rules() {
    let service = make_service();
    let foreign = FirewallRule::from_endpoint(&Endpoint::any_source(22));
    service
        .reconciler()
        .binding()
        .insert_rule(FILTER_TABLE, INPUT_CHAIN, &foreign)
        .unwrap();

    service.apply_rules(&scenario_config()).unwrap();
    service.revoke_rules(&scenario_config()).unwrap();
    assert_eq!(
        service.reconciler().binding().rules(FILTER_TABLE, INPUT_CHAIN),
        vec![foreign]
    );
}

#[test]
fn test_insert_failure_is_fail_fast() {
    let service = make_service();
    // Third endpoint in derivation order.
    let rejected = FirewallRule::from_endpoint(&Endpoint::new("10.0.0.2", 2003));
    service.reconciler().binding().reject_inserts_of(rejected);

    let err = service.apply_rules(&scenario_config()).unwrap_err();
    assert!(matches!(err, FirewallError::Backend { op: "insert", .. }));
    assert_eq!(
        service.show_rules(&scenario_config()).unwrap(),
        vec![Endpoint::new("10.0.0.2", 2001), Endpoint::new("10.0.0.2", 2002)]
    );

    service.reconciler().binding().clear_rejections();
    let report = service.apply_rules(&scenario_config()).unwrap();
    assert_eq!(report, ReconcileReport { changed: 6, unchanged: 2 });
    assert_eq!(service.show_rules(&scenario_config()).unwrap().len(), 8);
}

#[test]
fn test_delete_failure_is_fail_fast() {
    let service = make_service();
    service.apply_rules(&scenario_config()).unwrap();
    let rejected = FirewallRule::from_endpoint(&Endpoint::new("10.0.0.2", 2003));
    service.reconciler().binding().reject_deletes_of(rejected);

    let err = service.revoke_rules(&scenario_config()).unwrap_err();
    assert!(matches!(err, FirewallError::Backend { op: "delete", .. }));

    // First two revoked; the failing rule and everything after it stay.
    let remaining = service.show_rules(&scenario_config()).unwrap();
    assert_eq!(remaining, service.endpoints(&scenario_config()).unwrap()[2..].to_vec());
    assert_eq!(service.reconciler().binding().mutation_count(), 8 + 2);

    service.reconciler().binding().clear_rejections();
    let report = service.revoke_rules(&scenario_config()).unwrap();
    assert_eq!(report, ReconcileReport { changed: 6, unchanged: 2 });
    assert!(service.show_rules(&scenario_config()).unwrap().is_empty());
}

#[test]
fn test_check_failure_aborts_apply_and_show() {
    let service = make_service();
    let unreadable = FirewallRule::from_endpoint(&Endpoint::new("10.0.0.2", 2003));
    service.reconciler().binding().fail_checks_of(unreadable);

    let err = service.apply_rules(&scenario_config()).unwrap_err();
    assert!(matches!(err, FirewallError::Backend { op: "check", .. }));
    assert_eq!(service.reconciler().binding().mutation_count(), 2);

    let err = service.show_rules(&scenario_config()).unwrap_err();
    assert!(matches!(err, FirewallError::Backend { op: "check", .. }));

    let err = service.revoke_rules(&scenario_config()).unwrap_err();
    assert!(matches!(err, FirewallError::Backend { op: "check", .. }));
    assert_eq!(service.reconciler().binding().mutation_count(), 4);

    service.reconciler().binding().clear_rejections();
    let report = service.apply_rules(&scenario_config()).unwrap();
    assert_eq!(report, ReconcileReport { changed: 8, unchanged: 0 });
    assert_eq!(service.show_rules(&scenario_config()).unwrap().len(), 8);
}

#[test]
fn test_port_overflow_aborts_before_any_mutation() {
    let service = SchainFirewallService::new(InMemoryFirewall::new(), PortOffsets::default());
    let mut config = scenario_config();
    config.skale_config.node_info.base_port = u16::MAX;

    let err = service.apply_rules(&config).unwrap_err();
    assert!(matches!(err, FirewallError::PortOutOfRange { .. }));
    assert_eq!(service.reconciler().binding().mutation_count(), 0);
}

// =============================================================================
// ADVISORY LOCK
// =============================================================================

#[test]
fn test_lock_is_released_after_call() {
    let dir = tempfile::tempdir().unwrap();
    let lock = AdvisoryLock::new(dir.path().join("schain-fw.lock"));
    let service = make_service().with_lock(lock.clone());

    service.apply_rules(&scenario_config()).unwrap();
    assert!(lock.try_acquire().unwrap().is_some());
}

#[test]
fn test_lock_error_prevents_reconciliation() {
    let service = make_service().with_lock(AdvisoryLock::new("/nonexistent/dir/schain-fw.lock"));
    let err = service.apply_rules(&scenario_config()).unwrap_err();
    assert!(matches!(err, FirewallError::Lock { .. }));
    assert_eq!(service.reconciler().binding().mutation_count(), 0);
}
