//! # Domain Entities
//!
//! Schain configuration as produced by the node's admin service.
//!
//! Only the keys the firewall needs are modelled; everything else in the
//! config document is ignored.

use super::errors::FirewallError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root of a schain config document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchainConfig {
    /// The `skaleConfig` section.
    #[serde(rename = "skaleConfig")]
    pub skale_config: SkaleConfig,
}

/// The `skaleConfig` section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkaleConfig {
    /// Identity and ports of the local node.
    #[serde(rename = "nodeInfo")]
    pub node_info: NodeInfo,
    /// Schain committee.
    #[serde(rename = "sChain")]
    pub schain: SchainInfo,
}

/// Identity and ports of the local node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    /// Local node ID.
    #[serde(rename = "nodeID")]
    pub node_id: u64,
    /// First port of the node's port range for this schain.
    pub base_port: u16,
    /// HTTP JSON-RPC port.
    pub http_rpc_port: u16,
    /// WebSocket JSON-RPC port.
    pub ws_rpc_port: u16,
    /// HTTPS JSON-RPC port.
    pub https_rpc_port: u16,
    /// Secure WebSocket JSON-RPC port.
    pub wss_rpc_port: u16,
}

impl NodeInfo {
    /// RPC ports in emission order: http, ws, https, wss.
    pub fn rpc_ports(&self) -> [u16; 4] {
        [
            self.http_rpc_port,
            self.ws_rpc_port,
            self.https_rpc_port,
            self.wss_rpc_port,
        ]
    }
}

/// The `sChain` section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchainInfo {
    /// Schain name, when the document carries it.
    #[serde(rename = "schainName", default, skip_serializing_if = "Option::is_none")]
    pub schain_name: Option<String>,
    /// Committee members, local node included.
    pub nodes: Vec<SchainNode>,
}

/// One committee member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchainNode {
    /// Node ID.
    #[serde(rename = "nodeID")]
    pub node_id: u64,
    /// Node address, kept verbatim.
    pub ip: String,
}

impl SchainConfig {
    /// Parse a config from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, FirewallError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Interpret an already-decoded JSON document (e.g. an admin API payload).
    pub fn from_value(value: serde_json::Value) -> Result<Self, FirewallError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Read and parse a config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FirewallError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Local node identity and ports.
    pub fn node_info(&self) -> &NodeInfo {
        &self.skale_config.node_info
    }

    /// Committee members in config order.
    pub fn nodes(&self) -> &[SchainNode] {
        &self.skale_config.schain.nodes
    }

    /// Schain name, if present in the document.
    pub fn schain_name(&self) -> Option<&str> {
        self.skale_config.schain.schain_name.as_deref()
    }
}
