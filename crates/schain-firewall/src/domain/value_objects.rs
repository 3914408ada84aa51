//! # Domain Value Objects
//!
//! Immutable value types: endpoints, firewall rules, port offsets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Packet filter table every schain rule lives in.
pub const FILTER_TABLE: &str = "filter";

/// Chain every schain rule lives in.
pub const INPUT_CHAIN: &str = "INPUT";

/// Protocol matched by every schain rule.
pub const RULE_PROTOCOL: &str = "tcp";

/// Verdict of every schain rule.
pub const RULE_TARGET: &str = "ACCEPT";

/// One allowed inbound endpoint.
///
/// `ip = None` means "any source". `port` is always set by the deriver but
/// stays optional so a rule can express "any port".
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    /// Source address, as written in the schain config.
    pub ip: Option<String>,
    /// Destination TCP port.
    pub port: Option<u16>,
}

impl Endpoint {
    /// Endpoint restricted to one source address.
    pub fn new(ip: impl Into<String>, port: u16) -> Self {
        Self {
            ip: Some(ip.into()),
            port: Some(port),
        }
    }

    /// Endpoint open to any source address.
    pub fn any_source(port: u16) -> Self {
        Self {
            ip: None,
            port: Some(port),
        }
    }

    /// The `(ip, port)` pair view used by audit output.
    pub fn as_pair(&self) -> (Option<&str>, Option<u16>) {
        (self.ip.as_deref(), self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ip = self.ip.as_deref().unwrap_or("*");
        match self.port {
            Some(port) => write!(f, "{}:{}", ip, port),
            None => write!(f, "{}:*", ip),
        }
    }
}

/// Canonical `ACCEPT` rule for one endpoint.
///
/// Absent `src`/`dport` mean "match any value", never "match a missing
/// field". Two rules are the same rule iff all four fields are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FirewallRule {
    /// Matched protocol (always `tcp`).
    pub protocol: String,
    /// Rule verdict (always `ACCEPT`).
    pub target: String,
    /// Source address match.
    pub src: Option<String>,
    /// Destination port match.
    pub dport: Option<u16>,
}

impl FirewallRule {
    /// Build the rule allowing traffic to `endpoint`.
    pub fn from_endpoint(endpoint: &Endpoint) -> Self {
        Self {
            protocol: RULE_PROTOCOL.to_string(),
            target: RULE_TARGET.to_string(),
            src: endpoint.ip.clone(),
            dport: endpoint.port,
        }
    }

    /// Rule specification in iptables argument form, without table/chain.
    pub fn to_iptables_args(&self) -> Vec<String> {
        let mut args = vec!["-p".to_string(), self.protocol.clone()];
        if let Some(src) = &self.src {
            args.push("-s".to_string());
            args.push(src.clone());
        }
        if let Some(dport) = self.dport {
            args.push("-m".to_string());
            args.push(self.protocol.clone());
            args.push("--dport".to_string());
            args.push(dport.to_string());
        }
        args.push("-j".to_string());
        args.push(self.target.clone());
        args
    }
}

impl fmt::Display for FirewallRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_iptables_args().join(" "))
    }
}

/// Offsets of the four consensus channels relative to a node's base port.
///
/// Defaults follow the skaled port numbering scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortOffsets {
    /// Block proposal channel.
    pub proposal: u16,
    /// Catch-up channel.
    pub catchup: u16,
    /// Binary consensus channel.
    pub binary_consensus: u16,
    /// ZMQ broadcast channel.
    pub zmq_broadcast: u16,
}

impl PortOffsets {
    /// Offsets in emission order: proposal, catchup, binary consensus, broadcast.
    pub fn consensus_channels(&self) -> [u16; 4] {
        [
            self.proposal,
            self.catchup,
            self.binary_consensus,
            self.zmq_broadcast,
        ]
    }
}

impl Default for PortOffsets {
    fn default() -> Self {
        Self {
            proposal: 0,
            catchup: 1,
            binary_consensus: 4,
            zmq_broadcast: 5,
        }
    }
}
