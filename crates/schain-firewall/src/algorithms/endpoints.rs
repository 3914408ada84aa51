//! # Endpoint Derivation
//!
//! Pure functions mapping a schain config to the endpoints the local node
//! must accept connections on. Output order is deterministic: consensus,
//! then RPC, then snapshot.

use crate::domain::{Endpoint, FirewallError, PortOffsets, SchainConfig};

/// Consensus channels of every other committee member.
///
/// Four endpoints per peer, in `offsets.consensus_channels()` order, peers in
/// config order. The local node is skipped by `nodeID`, never by address.
pub fn consensus_endpoints(
    config: &SchainConfig,
    offsets: &PortOffsets,
) -> Result<Vec<Endpoint>, FirewallError> {
    let node_info = config.node_info();
    let base = node_info.base_port;

    let mut endpoints = Vec::with_capacity(config.nodes().len().saturating_sub(1) * 4);
    for node in config
        .nodes()
        .iter()
        .filter(|node| node.node_id != node_info.node_id)
    {
        for offset in offsets.consensus_channels() {
            let port = base
                .checked_add(offset)
                .ok_or(FirewallError::PortOutOfRange { base, offset })?;
            endpoints.push(Endpoint::new(node.ip.clone(), port));
        }
    }
    Ok(endpoints)
}

/// The local node's RPC ports, open to any source: http, ws, https, wss.
pub fn rpc_endpoints(config: &SchainConfig) -> Vec<Endpoint> {
    config
        .node_info()
        .rpc_ports()
        .into_iter()
        .map(Endpoint::any_source)
        .collect()
}

/// Snapshot endpoints. Not populated yet.
pub fn snapshot_endpoints(_config: &SchainConfig) -> Vec<Endpoint> {
    Vec::new()
}

/// Every endpoint the local node must accept for this schain.
pub fn allowed_endpoints(
    config: &SchainConfig,
    offsets: &PortOffsets,
) -> Result<Vec<Endpoint>, FirewallError> {
    let mut endpoints = consensus_endpoints(config, offsets)?;
    endpoints.extend(rpc_endpoints(config));
    endpoints.extend(snapshot_endpoints(config));
    Ok(endpoints)
}
