//! Admin API client: fetches a schain config by name.

use std::time::Duration;

use reqwest::Client;
use schain_firewall::{FirewallError, SchainConfig};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Route returning the config of one schain.
pub const SCHAIN_CONFIG_ROUTE: &str = "/api/schains/config";

/// Errors that can occur when communicating with the admin API.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Admin API returned an error: {0}")]
    Rejected(String),
    #[error("Schain config in admin API response is invalid: {0}")]
    Config(#[from] FirewallError),
}

/// `{"status": ..., "payload": ...}` envelope used by every admin route.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: String,
    #[serde(default)]
    payload: serde_json::Value,
}

/// Admin API client.
pub struct AdminApiClient {
    client: Client,
    base_url: String,
}

impl AdminApiClient {
    /// Create a new admin API client.
    pub fn new(base_url: impl Into<String>) -> Result<Self, AdminError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(2))
            .build()
            .map_err(AdminError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the config of `schain_name`.
    pub async fn get_schain_config(&self, schain_name: &str) -> Result<SchainConfig, AdminError> {
        let url = format!("{}{}", self.base_url, SCHAIN_CONFIG_ROUTE);
        debug!("[schain-fw] GET {} schain-name={}", url, schain_name);

        let response = self
            .client
            .get(&url)
            .query(&[("schain-name", schain_name)])
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    AdminError::Connection(format!("Cannot connect to {}", self.base_url))
                } else {
                    AdminError::Http(e)
                }
            })?;

        let body: ApiResponse = response.json().await?;
        if body.status != "ok" {
            let message = match body.payload {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            return Err(AdminError::Rejected(message));
        }
        Ok(SchainConfig::from_value(body.payload)?)
    }
}
