//! schain-fw: operator CLI for the schain firewall engine.
//!
//! Resolves a schain config (local file, or admin API by schain name),
//! builds the firewall service from [`settings::Settings`] and runs one of
//! `apply`, `revoke`, `show`.
//!
//! ```text
//! schain-fw apply  --schain-name elated-tan
//! schain-fw revoke --config-path /skale_node_data/schains/elated-tan/schain_elated-tan.json
//! schain-fw show   --schain-name elated-tan --json
//! ```

pub mod admin;
pub mod cli;
pub mod commands;
pub mod settings;
pub mod source;

pub use admin::{AdminApiClient, AdminError};
pub use cli::{Args, Command, SourceArgs};
pub use settings::Settings;
pub use source::ConfigSource;
