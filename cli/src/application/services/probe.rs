//! Infrastructure probing: is the VM up, is the app container running?
//!
//! Probe failures never abort a cycle. They are reported and downgraded to
//! "not running", which at worst leads to a harmless re-provision.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::process::Output;

use serde::Serialize;

use crate::application::ports::{ContainerDriver, ProgressReporter, Stage, VmDriver};
use crate::domain::{InfraState, ObservedState, ProbeError, Strategy};

/// Probe result as shown by `lightcycle status`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProbeReport {
    pub strategy: Strategy,
    pub infra: InfraState,
    pub observed: ObservedState,
}

/// Reads the current state of the VM host and the managed app.
pub struct InfrastructureProbe<'a, V, A, R> {
    vm: Option<&'a V>,
    app: &'a A,
    machine: Option<&'a str>,
    reporter: &'a R,
}

impl<'a, V, A, R> InfrastructureProbe<'a, V, A, R>
where
    V: VmDriver,
    A: ContainerDriver,
    R: ProgressReporter,
{
    /// `vm` is `None` for deployments without a VM; `machine` narrows the
    /// status match to one machine of a multi-machine Vagrantfile.
    pub fn new(vm: Option<&'a V>, app: &'a A, machine: Option<&'a str>, reporter: &'a R) -> Self {
        Self {
            vm,
            app,
            machine,
            reporter,
        }
    }

    /// Whether the VM reports a running state. Unknown counts as not running.
    pub async fn vm_status(&self) -> bool {
        let Some(vm) = self.vm else {
            return false;
        };
        match checked("vagrant status", vm.status().await) {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let running = vm_running(&stdout, self.machine);
                self.reporter.step(
                    Stage::Probe,
                    if running { "VM is running" } else { "VM is not running" },
                );
                running
            }
            Err(e) => {
                self.reporter
                    .warn(Stage::Probe, &format!("{e}; assuming VM is not running"));
                false
            }
        }
    }

    /// Whether the managed container is listed as running.
    pub async fn app_status(&self) -> bool {
        match checked("docker ps", self.app.list_running().await) {
            Ok(output) => {
                let running = !String::from_utf8_lossy(&output.stdout).trim().is_empty();
                self.reporter.step(
                    Stage::Probe,
                    if running { "app is running" } else { "app is not running" },
                );
                running
            }
            Err(e) => {
                self.reporter
                    .warn(Stage::Probe, &format!("{e}; assuming app is not running"));
                false
            }
        }
    }

    /// Probe everything the strategy needs, live.
    ///
    /// With the `vm` strategy the app is only probed when the VM is up;
    /// there is nothing to ask otherwise.
    pub async fn observe(&self, strategy: Strategy) -> InfraState {
        if !strategy.uses_vm() {
            return InfraState {
                vm_running: false,
                app_running: self.app_status().await,
            };
        }
        let vm_running = self.vm_status().await;
        let app_running = vm_running && self.app_status().await;
        InfraState {
            vm_running,
            app_running,
        }
    }

    /// `observe` plus the state it collapses to under `strategy`.
    pub async fn report(&self, strategy: Strategy) -> ProbeReport {
        let infra = self.observe(strategy).await;
        ProbeReport {
            strategy,
            infra,
            observed: strategy.action_set().observe(infra),
        }
    }
}

/// Turn a spawn failure or non-zero exit into a `ProbeError`.
fn checked(tool: &str, result: anyhow::Result<Output>) -> Result<Output, ProbeError> {
    let output = result.map_err(|e| ProbeError::Unavailable {
        tool: tool.to_string(),
        reason: format!("{e:#}"),
    })?;
    if !output.status.success() {
        return Err(ProbeError::NonZero {
            tool: tool.to_string(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output)
}

/// Scan `vagrant status --machine-readable` lines for a running state.
///
/// Lines look like `1718950000,default,state,running`.
#[must_use]
pub fn vm_running(status: &str, machine: Option<&str>) -> bool {
    match machine {
        Some(name) => {
            let marker = format!(",{name},state,running");
            status.lines().any(|line| line.contains(&marker))
        }
        None => status.lines().any(|line| line.contains(",state,running")),
    }
}
