//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::fmt;
use std::process::Output;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{GeoLocation, SignalError, SunTimes};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program to completion and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds the
    /// runner's timeout (if it has one). A non-zero exit is not an error.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
}

// ── Signal Ports ──────────────────────────────────────────────────────────────

/// Source of sunrise/sunset instants for one UTC calendar date.
#[allow(async_fn_in_trait)]
pub trait SunTimesSource {
    /// Fetch sun times for `date` at `location`. One outbound call.
    async fn fetch(&self, location: &GeoLocation, date: NaiveDate)
    -> Result<SunTimes, SignalError>;
}

/// Wall clock, injectable so signal boundaries can be tested.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

// ── Infrastructure Ports ──────────────────────────────────────────────────────

/// VM lifecycle and shell access.
#[allow(async_fn_in_trait)]
pub trait VmDriver {
    /// Machine-readable status lines.
    async fn status(&self) -> Result<Output>;
    /// Boot the VM, creating it if needed.
    async fn up(&self) -> Result<Output>;
    /// Gracefully shut the VM down.
    async fn halt(&self) -> Result<Output>;
    /// Run a shell command inside the VM.
    async fn ssh(&self, command: &str) -> Result<Output>;
}

/// Control of the single managed application container.
#[allow(async_fn_in_trait)]
pub trait ContainerDriver {
    /// List running containers matching the managed unit (ids on stdout).
    async fn list_running(&self) -> Result<Output>;
    async fn start(&self) -> Result<Output>;
    async fn stop(&self) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Decision-cycle stage a report belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Fetch,
    Signal,
    Probe,
    Plan,
    Action,
    Lock,
}

impl Stage {
    /// Bracketed tag prefixed to every message of this stage.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Stage::Config => "[CONFIG]",
            Stage::Fetch => "[FETCH]",
            Stage::Signal => "[SIGNAL]",
            Stage::Probe => "[PROBE]",
            Stage::Plan => "[PLAN]",
            Stage::Action => "[ACTION]",
            Stage::Lock => "[LOCK]",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer or on a global logger.
/// Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, stage: Stage, message: &str);
    /// Emit a success message.
    fn success(&self, stage: Stage, message: &str);
    /// Emit a warning for a failure that was absorbed.
    fn warn(&self, stage: Stage, message: &str);
    /// Emit an error for a failure that stops work.
    fn error(&self, stage: Stage, message: &str);
}
