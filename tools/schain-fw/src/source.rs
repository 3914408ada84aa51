//! Schain config source resolution.

use std::path::PathBuf;

use anyhow::{Context, Result};
use schain_firewall::SchainConfig;

use crate::admin::AdminApiClient;
use crate::cli::SourceArgs;

/// Printed when a command is given neither a schain name nor a config path.
pub const MISSING_SOURCE_MESSAGE: &str =
    "You should provide schain name or path to schain config file";

/// Where a command reads its schain config from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Fetched from the admin API.
    SchainName(String),
    /// Read from a local JSON file.
    ConfigPath(PathBuf),
}

impl ConfigSource {
    /// `None` when neither source was supplied.
    pub fn from_args(args: &SourceArgs) -> Option<Self> {
        if let Some(name) = &args.schain_name {
            return Some(Self::SchainName(name.clone()));
        }
        args.config_path.clone().map(Self::ConfigPath)
    }

    /// Human-readable name for output.
    pub fn label(&self) -> String {
        match self {
            Self::SchainName(name) => name.clone(),
            Self::ConfigPath(path) => path.display().to_string(),
        }
    }

    /// Load the config. Each call reads it fresh.
    pub async fn load(&self, admin_url: &str) -> Result<SchainConfig> {
        match self {
            Self::SchainName(name) => {
                let client = AdminApiClient::new(admin_url)?;
                let config = client
                    .get_schain_config(name)
                    .await
                    .with_context(|| format!("Failed to fetch config of schain {}", name))?;
                Ok(config)
            }
            Self::ConfigPath(path) => SchainConfig::from_file(path)
                .with_context(|| format!("Failed to load schain config {}", path.display())),
        }
    }
}
