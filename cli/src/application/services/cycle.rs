//! Application service — the decision cycle use-case.
//!
//! signal → probe → decide → act, strictly in sequence. Each cycle stands
//! alone: nothing is carried over, nothing is retried, and a failed action
//! leaves the rest of the plan for the next cycle to re-derive.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use serde::Serialize;

use crate::application::ports::{
    Clock, ContainerDriver, ProgressReporter, Stage, SunTimesSource, VmDriver,
};
use crate::application::services::executor::ActionExecutor;
use crate::application::services::probe::InfrastructureProbe;
use crate::application::services::signal::DaySignalProvider;
use crate::domain::{
    ActionError, ActionPlan, ActionResult, DaySignal, GeoLocation, InfraState, ObservedState,
    SignalError, Strategy, decide,
};

/// Whether planned actions are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleMode {
    Apply,
    DryRun,
}

/// Everything one cycle saw and did.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub signal: DaySignal,
    pub strategy: Strategy,
    pub infra: InfraState,
    pub observed: ObservedState,
    pub plan: ActionPlan,
    /// Executed actions in order; stops at the first failure.
    pub results: Vec<ActionResult>,
    pub applied: bool,
}

impl CycleReport {
    /// The action that aborted the plan, if any.
    #[must_use]
    pub fn failure(&self) -> Option<ActionError> {
        self.results
            .iter()
            .find(|r| !r.succeeded())
            .map(|r| ActionError {
                action: r.action,
                exit_code: r.exit_code,
                stderr: r.stderr.clone(),
            })
    }

    /// Actions of the plan that never ran because an earlier one failed.
    #[must_use]
    pub fn skipped(&self) -> &[crate::domain::Action] {
        if self.applied {
            &self.plan.actions()[self.results.len()..]
        } else {
            &[]
        }
    }
}

/// Wires the three cycle components together.
pub struct DecisionCycle<'a, S, C, V, A, R> {
    signal: DaySignalProvider<'a, S, C, R>,
    probe: InfrastructureProbe<'a, V, A, R>,
    executor: ActionExecutor<'a, V, A, R>,
    strategy: Strategy,
    reporter: &'a R,
}

impl<'a, S, C, V, A, R> DecisionCycle<'a, S, C, V, A, R>
where
    S: SunTimesSource,
    C: Clock,
    V: VmDriver,
    A: ContainerDriver,
    R: ProgressReporter,
{
    pub fn new(
        signal: DaySignalProvider<'a, S, C, R>,
        probe: InfrastructureProbe<'a, V, A, R>,
        executor: ActionExecutor<'a, V, A, R>,
        strategy: Strategy,
        reporter: &'a R,
    ) -> Self {
        Self {
            signal,
            probe,
            executor,
            strategy,
            reporter,
        }
    }

    /// The probe this cycle uses, for status-only callers.
    pub fn probe(&self) -> &InfrastructureProbe<'a, V, A, R> {
        &self.probe
    }

    /// Run one cycle.
    ///
    /// # Errors
    ///
    /// Returns the `SignalError` when the signal cannot be derived. In that
    /// case nothing is probed and no action is attempted. Action failures are
    /// not errors here: they end the plan and show up in the report.
    pub async fn run(
        &self,
        location: &GeoLocation,
        mode: CycleMode,
    ) -> Result<CycleReport, SignalError> {
        let reading = self.signal.compute(location).await?;

        let infra = self.probe.observe(self.strategy).await;
        let set = self.strategy.action_set();
        let observed = set.observe(infra);
        let plan = decide(reading.signal, observed, set);

        self.reporter.step(
            Stage::Plan,
            &format!(
                "signal {} with {} ({} strategy): {plan}",
                reading.signal, observed, self.strategy
            ),
        );

        let mut report = CycleReport {
            signal: reading.signal,
            strategy: self.strategy,
            infra,
            observed,
            plan,
            results: Vec::new(),
            applied: mode == CycleMode::Apply,
        };

        if mode == CycleMode::DryRun || report.plan.is_empty() {
            if report.plan.is_empty() {
                self.reporter
                    .success(Stage::Plan, "environment already matches the signal");
            }
            return Ok(report);
        }

        for action in report.plan.iter() {
            let result = self.executor.execute(action).await;
            let failed = !result.succeeded();
            report.results.push(result);
            if failed {
                let remaining = report.skipped().len();
                if remaining > 0 {
                    self.reporter.warn(
                        Stage::Plan,
                        &format!("aborting plan, {remaining} action(s) left for the next cycle"),
                    );
                }
                break;
            }
        }
        Ok(report)
    }
}
