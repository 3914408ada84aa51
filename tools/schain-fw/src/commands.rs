//! Command execution and output.

use std::io::Write;

use anyhow::{Context, Result};
use schain_firewall::{
    AdvisoryLock, Endpoint, FirewallBinding, InMemoryFirewall, IptablesFirewall, SchainConfig,
    SchainFirewallApi, SchainFirewallService,
};
use tracing::{debug, info};

use crate::cli::{Args, Command};
use crate::settings::Settings;
use crate::source::{ConfigSource, MISSING_SOURCE_MESSAGE};

/// Service type used by the CLI.
pub type CliService = SchainFirewallService<Box<dyn FirewallBinding>>;

/// Build the firewall service: kernel iptables, or an empty in-memory
/// firewall for dry runs.
pub fn build_service(settings: &Settings, dry_run: bool) -> CliService {
    let binding: Box<dyn FirewallBinding> = if dry_run {
        info!("[schain-fw] Dry run: reconciling against an empty in-memory firewall");
        Box::new(InMemoryFirewall::new())
    } else {
        Box::new(IptablesFirewall::new(settings.iptables_bin.clone()))
    };

    let service = SchainFirewallService::new(binding, settings.port_offsets);
    match &settings.lock_path {
        Some(path) => service.with_lock(AdvisoryLock::new(path.clone())),
        None => service,
    }
}

/// Full invocation: resolve the config source, load settings and the schain
/// config, then execute the command.
///
/// Without a config source only the guidance message is written; settings
/// are not read and nothing fails.
pub async fn run<W: Write>(args: &Args, out: &mut W) -> Result<()> {
    let Some(source) = ConfigSource::from_args(args.command.source()) else {
        writeln!(out, "{}", MISSING_SOURCE_MESSAGE)?;
        return Ok(());
    };

    let settings = Settings::load(args)?;
    debug!("[schain-fw] Settings: {:?}", settings);

    let config = source.load(&settings.admin_url).await?;
    let label = config
        .schain_name()
        .map(str::to_string)
        .unwrap_or_else(|| source.label());
    info!("[schain-fw] Loaded config of schain {}", label);

    let service = build_service(&settings, args.dry_run);
    execute(&service, &args.command, &label, &config, out)
}

/// Run `command` for `config`, writing operator output to `out`.
pub fn execute<A: SchainFirewallApi, W: Write>(
    api: &A,
    command: &Command,
    label: &str,
    config: &SchainConfig,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Apply(_) => {
            let report = api
                .apply_rules(config)
                .with_context(|| format!("Failed to add rules for schain {}", label))?;
            writeln!(
                out,
                "Rules for schain {} were successfully added ({} new, {} already present)",
                label, report.changed, report.unchanged
            )?;
        }
        Command::Revoke(_) => {
            let report = api
                .revoke_rules(config)
                .with_context(|| format!("Failed to remove rules for schain {}", label))?;
            writeln!(
                out,
                "Rules for schain {} were successfully removed ({} removed, {} already absent)",
                label, report.changed, report.unchanged
            )?;
        }
        Command::Show { json, .. } => {
            let endpoints = api
                .show_rules(config)
                .with_context(|| format!("Failed to read rules for schain {}", label))?;
            print_endpoints(&endpoints, *json, out)?;
        }
    }
    Ok(())
}

/// One `ip:port` per line (`*` for any source), or a JSON array.
pub fn print_endpoints<W: Write>(endpoints: &[Endpoint], json: bool, out: &mut W) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, endpoints)?;
        writeln!(out)?;
    } else if endpoints.is_empty() {
        writeln!(out, "No rules found")?;
    } else {
        for endpoint in endpoints {
            writeln!(out, "{}", endpoint)?;
        }
    }
    Ok(())
}
