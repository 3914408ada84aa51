//! Settings: defaults, then TOML file, then environment, then flags.
//!
//! ```toml
//! admin_url = "http://127.0.0.1:3007"
//! iptables_bin = "/usr/sbin/iptables"
//! lock_path = "/var/run/schain-fw.lock"
//!
//! [port_offsets]
//! proposal = 0
//! catchup = 1
//! binary_consensus = 4
//! zmq_broadcast = 5
//! ```

use crate::cli::Args;
use schain_firewall::PortOffsets;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings file read when `--settings` is not given, if it exists.
pub const DEFAULT_SETTINGS_PATH: &str = "/etc/schain-firewall/config.toml";

/// Env override for [`Settings::admin_url`].
pub const ENV_ADMIN_URL: &str = "SCHAIN_FW_ADMIN_URL";
/// Env override for [`Settings::iptables_bin`].
pub const ENV_IPTABLES: &str = "SCHAIN_FW_IPTABLES";
/// Env override for [`Settings::lock_path`].
pub const ENV_LOCK_PATH: &str = "SCHAIN_FW_LOCK_PATH";

/// Settings errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file could not be read.
    #[error("Failed to read settings {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
    /// Settings file is not valid.
    #[error("Invalid settings {path}: {source}")]
    Parse {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: toml::de::Error,
    },
}

/// CLI settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Admin API base URL.
    pub admin_url: String,
    /// iptables executable.
    pub iptables_bin: PathBuf,
    /// Advisory lock file; no locking when unset.
    pub lock_path: Option<PathBuf>,
    /// Consensus channel offsets.
    pub port_offsets: PortOffsets,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            admin_url: "http://127.0.0.1:3007".to_string(),
            iptables_bin: PathBuf::from("iptables"),
            lock_path: None,
            port_offsets: PortOffsets::default(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(path: &Path, text: &str) -> Result<Self, SettingsError> {
        toml::from_str(text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read `path`; a missing `path` is an error.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(path, &text)
    }

    /// Explicit file if given, else the default file if present, else defaults.
    pub fn load_file(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_SETTINGS_PATH);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_ADMIN_URL) {
            self.admin_url = url;
        }
        if let Some(bin) = lookup(ENV_IPTABLES) {
            self.iptables_bin = PathBuf::from(bin);
        }
        if let Some(path) = lookup(ENV_LOCK_PATH) {
            self.lock_path = Some(PathBuf::from(path));
        }
    }

    /// Apply command-line overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(url) = &args.admin_url {
            self.admin_url = url.clone();
        }
        if let Some(bin) = &args.iptables {
            self.iptables_bin = bin.clone();
        }
        if let Some(path) = &args.lock_file {
            self.lock_path = Some(path.clone());
        }
    }

    /// Full lookup chain for a CLI invocation.
    pub fn load(args: &Args) -> Result<Self, SettingsError> {
        let mut settings = Self::load_file(args.settings.as_deref())?;
        settings.apply_env(|key| std::env::var(key).ok());
        settings.apply_args(args);
        Ok(settings)
    }
}
