//! # Domain Invariants
//!
//! Properties the derived endpoint list must always satisfy.

use super::entities::SchainConfig;
use super::value_objects::Endpoint;

/// Invariant: the local node never opens its own consensus channels.
///
/// Holds when no endpoint carries the local node's address, unless another
/// committee member (different `nodeID`) legitimately shares that address.
pub fn invariant_no_self_endpoints(config: &SchainConfig, endpoints: &[Endpoint]) -> bool {
    let local_id = config.node_info().node_id;
    let own_ips: Vec<&str> = config
        .nodes()
        .iter()
        .filter(|node| node.node_id == local_id)
        .map(|node| node.ip.as_str())
        .collect();

    endpoints.iter().all(|endpoint| match endpoint.ip.as_deref() {
        None => true,
        Some(ip) if !own_ips.contains(&ip) => true,
        Some(ip) => config
            .nodes()
            .iter()
            .any(|node| node.node_id != local_id && node.ip == ip),
    })
}
