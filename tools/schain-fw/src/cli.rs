//! Command-line arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// schain-fw: manage iptables rules of the schains served by this node
#[derive(Parser, Debug)]
#[command(name = "schain-fw", version)]
#[command(about = "Apply, revoke and show iptables rules of a schain")]
pub struct Args {
    /// Settings file (TOML). Defaults to /etc/schain-firewall/config.toml if present.
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Admin API base URL, used to fetch a schain config by name
    #[arg(long, global = true)]
    pub admin_url: Option<String>,

    /// iptables executable
    #[arg(long, global = true)]
    pub iptables: Option<PathBuf>,

    /// Advisory lock file held while rules are reconciled
    #[arg(long, global = true)]
    pub lock_file: Option<PathBuf>,

    /// Reconcile against an empty in-memory firewall instead of the kernel
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

/// Operations.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Add iptables rules related to the specified schain
    #[command(alias = "add-rules")]
    Apply(SourceArgs),

    /// Remove iptables rules related to the specified schain
    #[command(alias = "remove-rules")]
    Revoke(SourceArgs),

    /// Show iptables rules of the specified schain that are in place
    #[command(alias = "show-rules")]
    Show {
        /// Schain config source
        #[command(flatten)]
        source: SourceArgs,

        /// Print a JSON array instead of one endpoint per line
        #[arg(long)]
        json: bool,
    },
}

impl Command {
    /// Config source arguments of the command.
    pub fn source(&self) -> &SourceArgs {
        match self {
            Command::Apply(source) | Command::Revoke(source) => source,
            Command::Show { source, .. } => source,
        }
    }
}

/// Where to read the schain config from. At most one may be given.
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
#[group(required = false, multiple = false)]
pub struct SourceArgs {
    /// Schain name, resolved through the admin API
    #[arg(long)]
    pub schain_name: Option<String>,

    /// Path to a schain config JSON file
    #[arg(long)]
    pub config_path: Option<PathBuf>,
}
