//! Infrastructure implementation of the `VmDriver` port.
//!
//! `VagrantDriver<R>` routes every vagrant call through a `CommandRunner`
//! whose working directory is the one holding the `Vagrantfile`.

use std::process::Output;

use anyhow::Result;

use crate::application::ports::{CommandRunner, VmDriver};
use crate::domain::config::VmConfig;
use crate::infra::command_runner::TokioCommandRunner;

/// Drives one Vagrant environment.
///
/// Generic over `R: CommandRunner` so tests can inject a recording runner.
pub struct VagrantDriver<R: CommandRunner> {
    runner: R,
    bin: String,
    machine: Option<String>,
}

impl<R: CommandRunner> VagrantDriver<R> {
    pub fn new(runner: R, bin: impl Into<String>, machine: Option<String>) -> Self {
        Self {
            runner,
            bin: bin.into(),
            machine,
        }
    }

    #[cfg(test)]
    pub(crate) fn runner(&self) -> &R {
        &self.runner
    }

    /// Run `vagrant <subcommand> [machine] [extra...]`.
    async fn vagrant(&self, subcommand: &str, extra: &[&str]) -> Result<Output> {
        let mut args = vec![subcommand];
        if let Some(machine) = &self.machine {
            args.push(machine);
        }
        args.extend_from_slice(extra);
        self.runner.run(&self.bin, &args).await
    }
}

impl VagrantDriver<TokioCommandRunner> {
    /// Production driver rooted at `config.directory`.
    #[must_use]
    pub fn from_config(config: &VmConfig, runner: TokioCommandRunner) -> Self {
        Self::new(
            runner.in_dir(&config.directory),
            config.vagrant_bin.clone(),
            config.machine.clone(),
        )
    }
}

impl<R: CommandRunner> VmDriver for VagrantDriver<R> {
    async fn status(&self) -> Result<Output> {
        self.vagrant("status", &["--machine-readable"]).await
    }

    async fn up(&self) -> Result<Output> {
        self.vagrant("up", &[]).await
    }

    async fn halt(&self) -> Result<Output> {
        self.vagrant("halt", &[]).await
    }

    async fn ssh(&self, command: &str) -> Result<Output> {
        self.vagrant("ssh", &["-c", command]).await
    }
}
