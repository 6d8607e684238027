//! Shared stubs for unit tests.
//!
//! `FakeHost` is a VM plus container host whose state changes when actions
//! run, so several cycles can be chained to check convergence.

#![allow(clippy::expect_used)]

use std::cell::{Cell, RefCell};
use std::process::{ExitStatus, Output};

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};

use lightcycle_cli::application::ports::{
    Clock, ContainerDriver, ProgressReporter, Stage, SunTimesSource, VmDriver,
};
use lightcycle_cli::domain::{GeoLocation, SignalError, SunTimes};

// ── Output helpers ────────────────────────────────────────────────────────────

#[cfg(unix)]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(stderr: &[u8]) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

pub fn utc(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("rfc3339 timestamp")
        .with_timezone(&Utc)
}

// ── Signal stubs ──────────────────────────────────────────────────────────────

/// Sun times source answering with a fixed result and counting calls.
pub struct SunStub {
    pub result: Result<SunTimes, SignalError>,
    pub calls: Cell<u32>,
}

impl SunStub {
    /// Summer solstice over Amsterdam.
    pub fn solstice() -> Self {
        Self::with(Ok(SunTimes {
            sunrise: utc("2024-06-21T03:18:00Z"),
            sunset: utc("2024-06-21T20:06:00Z"),
        }))
    }

    pub fn with(result: Result<SunTimes, SignalError>) -> Self {
        Self {
            result,
            calls: Cell::new(0),
        }
    }
}

impl SunTimesSource for SunStub {
    async fn fetch(&self, _: &GeoLocation, _: NaiveDate) -> Result<SunTimes, SignalError> {
        self.calls.set(self.calls.get() + 1);
        self.result.clone()
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn amsterdam() -> GeoLocation {
    GeoLocation {
        latitude: 52.37,
        longitude: 4.89,
        timezone: chrono_tz::Europe::Amsterdam,
    }
}

// ── Reporter ─────────────────────────────────────────────────────────────────

/// Keeps `(stage, message)` for warnings and errors; drops the rest.
#[derive(Default)]
pub struct ProblemReporter {
    pub problems: RefCell<Vec<(Stage, String)>>,
}

impl ProgressReporter for ProblemReporter {
    fn step(&self, _: Stage, _: &str) {}
    fn success(&self, _: Stage, _: &str) {}
    fn warn(&self, stage: Stage, message: &str) {
        self.problems.borrow_mut().push((stage, message.to_string()));
    }
    fn error(&self, stage: Stage, message: &str) {
        self.problems.borrow_mut().push((stage, message.to_string()));
    }
}

// ── Stateful host ─────────────────────────────────────────────────────────────

/// VM and app state that the actions actually change.
#[derive(Default)]
pub struct FakeHost {
    pub vm_running: Cell<bool>,
    pub app_running: Cell<bool>,
    /// `vagrant up` exits 1 while this is set.
    pub fail_up: Cell<bool>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeHost {
    pub fn new(vm_running: bool, app_running: bool) -> Self {
        let host = Self::default();
        host.vm_running.set(vm_running);
        host.app_running.set(app_running);
        host
    }

    pub fn take_calls(&self) -> Vec<String> {
        self.calls.take()
    }

    fn record(&self, call: &str) {
        self.calls.borrow_mut().push(call.to_string());
    }
}

impl VmDriver for FakeHost {
    async fn status(&self) -> Result<Output> {
        let state = if self.vm_running.get() {
            "running"
        } else {
            "poweroff"
        };
        Ok(ok_output(format!("1718950000,default,state,{state}\n").as_bytes()))
    }

    async fn up(&self) -> Result<Output> {
        self.record("up");
        if self.fail_up.get() {
            return Ok(err_output(b"VBoxManage: error: VT-x is not available"));
        }
        self.vm_running.set(true);
        Ok(ok_output(b""))
    }

    async fn halt(&self) -> Result<Output> {
        self.record("halt");
        self.vm_running.set(false);
        self.app_running.set(false);
        Ok(ok_output(b""))
    }

    async fn ssh(&self, command: &str) -> Result<Output> {
        self.record("provision");
        if !self.vm_running.get() {
            return Ok(err_output(b"VM must be running to open SSH connection"));
        }
        assert!(command.contains("ansible-playbook"), "unexpected ssh: {command}");
        self.app_running.set(true);
        Ok(ok_output(b""))
    }
}

impl ContainerDriver for FakeHost {
    async fn list_running(&self) -> Result<Output> {
        let stdout: &[u8] = if self.app_running.get() {
            b"3f2a9c1d0e11\n"
        } else {
            b""
        };
        Ok(ok_output(stdout))
    }

    async fn start(&self) -> Result<Output> {
        self.record("start");
        self.app_running.set(true);
        Ok(ok_output(b""))
    }

    async fn stop(&self) -> Result<Output> {
        self.record("stop");
        self.app_running.set(false);
        Ok(ok_output(b""))
    }
}
