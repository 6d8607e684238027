//! The orchestration decision engine.
//!
//! One abstract state machine drives both deployment strategies: the signal
//! picks a target (up or down), the observed state is collapsed into
//! `Stopped` / `VmUp` / `VmUpAppUp`, and a pluggable [`ActionSet`] says which
//! concrete actions realize each transition.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::signal::DaySignal;

// ── Observed state ────────────────────────────────────────────────────────────

/// Raw probe results. Re-probed every cycle, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct InfraState {
    pub vm_running: bool,
    pub app_running: bool,
}

/// Infrastructure state as seen by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObservedState {
    Stopped,
    VmUp,
    VmUpAppUp,
}

impl fmt::Display for ObservedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ObservedState::Stopped => "stopped",
            ObservedState::VmUp => "vm up",
            ObservedState::VmUpAppUp => "vm up, app up",
        })
    }
}

/// Where the environment should be for a given signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Up,
    Down,
}

impl From<DaySignal> for Target {
    /// Daylight starts the workday; darkness ends it.
    fn from(signal: DaySignal) -> Self {
        match signal {
            DaySignal::Off => Target::Up,
            DaySignal::On => Target::Down,
        }
    }
}

// ── Actions ───────────────────────────────────────────────────────────────────

/// A single lifecycle operation, realized by exactly one tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    BringUpVm,
    HaltVm,
    Provision,
    StartApp,
    StopApp,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::BringUpVm => "bring-up-vm",
            Action::HaltVm => "halt-vm",
            Action::Provision => "provision",
            Action::StartApp => "start-app",
            Action::StopApp => "stop-app",
        })
    }
}

/// Ordered actions for one cycle. Built fresh every cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ActionPlan(Vec<Action>);

impl ActionPlan {
    #[must_use]
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        self.0.iter().copied()
    }
}

impl From<Vec<Action>> for ActionPlan {
    fn from(actions: Vec<Action>) -> Self {
        Self(actions)
    }
}

impl fmt::Display for ActionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(none)");
        }
        let names: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&names.join(" → "))
    }
}

/// Outcome of one executed action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResult {
    pub action: Action,
    /// `None` when the tool could not be spawned or was killed by a signal.
    pub exit_code: Option<i32>,
    pub stderr: String,
}

impl ActionResult {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

// ── Strategies ────────────────────────────────────────────────────────────────

/// Concrete actions realizing the abstract "ensure up" / "ensure down" moves.
pub trait ActionSet {
    /// Collapse raw probe results into the state machine's states.
    fn observe(&self, infra: InfraState) -> ObservedState;
    /// From `Stopped` to fully up.
    fn bring_up(&self) -> Vec<Action>;
    /// From `VmUp` (app not confirmed running) to fully up.
    fn complete_up(&self) -> Vec<Action>;
    /// From any running state to `Stopped`.
    fn tear_down(&self) -> Vec<Action>;
}

/// VM plus configuration management. Provisioning is the idempotent
/// "ensure the app runs" step, so no separate app actions are used.
#[derive(Debug, Clone, Copy, Default)]
pub struct VmProvisionActions;

impl ActionSet for VmProvisionActions {
    fn observe(&self, infra: InfraState) -> ObservedState {
        match (infra.vm_running, infra.app_running) {
            (false, _) => ObservedState::Stopped,
            (true, false) => ObservedState::VmUp,
            (true, true) => ObservedState::VmUpAppUp,
        }
    }

    fn bring_up(&self) -> Vec<Action> {
        vec![Action::BringUpVm, Action::Provision]
    }

    fn complete_up(&self) -> Vec<Action> {
        vec![Action::Provision]
    }

    fn tear_down(&self) -> Vec<Action> {
        vec![Action::HaltVm]
    }
}

/// Container only, no VM. `VmUp` collapses into "not yet started".
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerActions;

impl ActionSet for ContainerActions {
    fn observe(&self, infra: InfraState) -> ObservedState {
        if infra.app_running {
            ObservedState::VmUpAppUp
        } else {
            ObservedState::Stopped
        }
    }

    fn bring_up(&self) -> Vec<Action> {
        vec![Action::StartApp]
    }

    fn complete_up(&self) -> Vec<Action> {
        vec![Action::StartApp]
    }

    fn tear_down(&self) -> Vec<Action> {
        vec![Action::StopApp]
    }
}

/// Which action set a deployment uses; selected in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Vm,
    Container,
}

impl Strategy {
    #[must_use]
    pub fn action_set(self) -> &'static dyn ActionSet {
        match self {
            Strategy::Vm => &VmProvisionActions,
            Strategy::Container => &ContainerActions,
        }
    }

    /// Whether the VM must be probed for this strategy.
    #[must_use]
    pub fn uses_vm(self) -> bool {
        matches!(self, Strategy::Vm)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Vm => "vm",
            Strategy::Container => "container",
        })
    }
}

// ── Decision ──────────────────────────────────────────────────────────────────

/// Minimal ordered plan moving `observed` to the target implied by `signal`.
#[must_use]
pub fn decide(signal: DaySignal, observed: ObservedState, set: &dyn ActionSet) -> ActionPlan {
    let actions = match (Target::from(signal), observed) {
        (Target::Up, ObservedState::Stopped) => set.bring_up(),
        (Target::Up, ObservedState::VmUp) => set.complete_up(),
        (Target::Up, ObservedState::VmUpAppUp) | (Target::Down, ObservedState::Stopped) => {
            Vec::new()
        }
        (Target::Down, ObservedState::VmUp | ObservedState::VmUpAppUp) => set.tear_down(),
    };
    ActionPlan(actions)
}
