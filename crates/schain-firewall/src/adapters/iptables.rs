//! iptables Adapter
//!
//! Implements `FirewallBinding` by running the `iptables` executable:
//!
//! | Operation     | Command                          | Exit status             |
//! |---------------|----------------------------------|-------------------------|
//! | `has_rule`    | `iptables -t T -C CHAIN RULE`    | 0 present, 1 absent     |
//! | `insert_rule` | `iptables -t T -I CHAIN RULE`    | 0 ok                    |
//! | `delete_rule` | `iptables -t T -D CHAIN RULE`    | 0 ok                    |
//!
//! Any other status becomes [`FirewallError::Backend`] with the captured
//! stderr. Nothing is retried.

use crate::domain::{FirewallError, FirewallRule};
use crate::ports::FirewallBinding;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Output};
use tracing::{debug, trace};

/// Exit status of `iptables -C` for a rule that is not in the chain.
const CHECK_ABSENT: i32 = 1;

/// Kernel packet filter driven through the `iptables` executable.
#[derive(Clone, Debug)]
pub struct IptablesFirewall {
    program: PathBuf,
    leading_args: Vec<OsString>,
    wait_for_lock: bool,
}

impl IptablesFirewall {
    /// Use `program` (e.g. `iptables`, `iptables-legacy`, an absolute path).
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            wait_for_lock: true,
        }
    }

    /// Run iptables through a wrapper, e.g. `wrapped("sudo", ["iptables"])`.
    pub fn wrapped<I, S>(program: impl Into<PathBuf>, leading_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            leading_args: leading_args.into_iter().map(Into::into).collect(),
            wait_for_lock: true,
        }
    }

    /// Whether to pass `-w` so iptables waits for the xtables lock.
    #[must_use]
    pub fn with_wait_for_lock(mut self, wait: bool) -> Self {
        self.wait_for_lock = wait;
        self
    }

    /// Full argument vector for one operation.
    fn command_args(
        &self,
        op_flag: &str,
        table: &str,
        chain: &str,
        rule: &FirewallRule,
    ) -> Vec<OsString> {
        let mut args = self.leading_args.clone();
        if self.wait_for_lock {
            args.push("-w".into());
        }
        args.push("-t".into());
        args.push(table.into());
        args.push(op_flag.into());
        args.push(chain.into());
        args.extend(rule.to_iptables_args().into_iter().map(OsString::from));
        args
    }

    fn run(
        &self,
        op_flag: &str,
        table: &str,
        chain: &str,
        rule: &FirewallRule,
    ) -> Result<Output, FirewallError> {
        let args = self.command_args(op_flag, table, chain, rule);
        trace!("[schain-fw] exec {:?} {:?}", self.program, args);
        let output = Command::new(&self.program).args(&args).output()?;
        debug!(
            "[schain-fw] iptables -t {} {} {} {} -> {:?}",
            table,
            op_flag,
            chain,
            rule,
            output.status.code()
        );
        Ok(output)
    }
}

impl Default for IptablesFirewall {
    fn default() -> Self {
        Self::new("iptables")
    }
}

fn backend_error(op: &'static str, output: &Output) -> FirewallError {
    FirewallError::Backend {
        op,
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

impl FirewallBinding for IptablesFirewall {
    fn has_rule(
        &self,
        table: &str,
        chain: &str,
        rule: &FirewallRule,
    ) -> Result<bool, FirewallError> {
        let output = self.run("-C", table, chain, rule)?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(CHECK_ABSENT) => Ok(false),
            _ => Err(backend_error("check", &output)),
        }
    }

    fn insert_rule(
        &self,
        table: &str,
        chain: &str,
        rule: &FirewallRule,
    ) -> Result<(), FirewallError> {
        let output = self.run("-I", table, chain, rule)?;
        if output.status.success() {
            Ok(())
        } else {
            Err(backend_error("insert", &output))
        }
    }

    fn delete_rule(
        &self,
        table: &str,
        chain: &str,
        rule: &FirewallRule,
    ) -> Result<(), FirewallError> {
        let output = self.run("-D", table, chain, rule)?;
        if output.status.success() {
            Ok(())
        } else {
            Err(backend_error("delete", &output))
        }
    }
}
