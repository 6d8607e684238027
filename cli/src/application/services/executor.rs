//! Action execution: one external tool invocation per plan action.
//!
//! No retries here; the next scheduled cycle is the retry.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::process::Output;

use crate::application::ports::{ContainerDriver, ProgressReporter, Stage, VmDriver};
use crate::domain::{Action, ActionResult};

/// Maps actions onto VM and container drivers.
pub struct ActionExecutor<'a, V, A, R> {
    vm: Option<&'a V>,
    app: &'a A,
    provision_command: Option<&'a str>,
    reporter: &'a R,
}

impl<'a, V, A, R> ActionExecutor<'a, V, A, R>
where
    V: VmDriver,
    A: ContainerDriver,
    R: ProgressReporter,
{
    pub fn new(
        vm: Option<&'a V>,
        app: &'a A,
        provision_command: Option<&'a str>,
        reporter: &'a R,
    ) -> Self {
        Self {
            vm,
            app,
            provision_command,
            reporter,
        }
    }

    /// Run `action` and report how it went. Never panics, never retries.
    pub async fn execute(&self, action: Action) -> ActionResult {
        self.reporter.step(Stage::Action, &format!("{action}..."));

        let outcome = match action {
            Action::BringUpVm => match self.vm {
                Some(vm) => vm.up().await,
                None => Err(anyhow::anyhow!("no VM configured")),
            },
            Action::HaltVm => match self.vm {
                Some(vm) => vm.halt().await,
                None => Err(anyhow::anyhow!("no VM configured")),
            },
            Action::Provision => match (self.vm, self.provision_command) {
                (Some(vm), Some(command)) => vm.ssh(command).await,
                (None, _) => Err(anyhow::anyhow!("no VM configured")),
                (_, None) => Err(anyhow::anyhow!("no provisioning configured")),
            },
            Action::StartApp => self.app.start().await,
            Action::StopApp => self.app.stop().await,
        };

        let result = to_result(action, outcome);
        if result.succeeded() {
            self.reporter.success(Stage::Action, &format!("{action} done"));
        } else {
            let code = result
                .exit_code
                .map_or_else(|| "no exit code".to_string(), |c| format!("exit code {c}"));
            self.reporter.error(
                Stage::Action,
                &format!("{action} failed ({code}): {}", result.stderr),
            );
        }
        result
    }
}

fn to_result(action: Action, outcome: anyhow::Result<Output>) -> ActionResult {
    match outcome {
        Ok(output) => ActionResult {
            action,
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        },
        Err(e) => ActionResult {
            action,
            exit_code: None,
            stderr: format!("{e:#}"),
        },
    }
}
