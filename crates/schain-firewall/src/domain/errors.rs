//! # Domain Errors
//!
//! Error types for the schain firewall engine.

use thiserror::Error;

/// Schain firewall error types.
#[derive(Debug, Error)]
pub enum FirewallError {
    /// Schain config is missing a required key or has a malformed value.
    #[error("Invalid schain config: {0}")]
    Config(#[from] serde_json::Error),

    /// `basePort + offset` does not fit a TCP port.
    #[error("Port out of range: base port {base} + offset {offset}")]
    PortOutOfRange {
        /// Node base port
        base: u16,
        /// Channel offset
        offset: u16,
    },

    /// Packet filter rejected a command.
    #[error("Firewall {op} failed (exit code {code:?}): {stderr}")]
    Backend {
        /// Operation that failed (check, insert, delete)
        op: &'static str,
        /// Process exit code, if the process exited normally
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// I/O error (reading a config file, spawning the firewall executable).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Advisory lock could not be acquired.
    #[error("Lock error on {path}: {source}")]
    Lock {
        /// Lock file path
        path: String,
        /// Underlying error
        source: std::io::Error,
    },
}
