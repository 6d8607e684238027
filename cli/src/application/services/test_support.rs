//! Shared test helpers for application service tests.
//!
//! Provides cross-platform `exit_status()`, canned `Output` builders, a fixed
//! clock, and a reporter that records every message it receives.

use std::cell::RefCell;

use chrono::{DateTime, Utc};

use crate::application::ports::{Clock, ProgressReporter, Stage};

/// Build an `ExitStatus` from a logical exit code (cross-platform).
#[cfg(unix)]
pub fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    std::process::ExitStatus::from_raw(code as u32)
}

pub fn ok_output(stdout: &[u8]) -> std::process::Output {
    std::process::Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn fail_output(code: i32, stderr: &[u8]) -> std::process::Output {
    std::process::Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

#[allow(clippy::expect_used)]
pub fn utc(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("rfc3339 timestamp")
        .with_timezone(&Utc)
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Step,
    Success,
    Warn,
    Error,
}

/// Reporter that keeps `(level, stage, message)` triples for assertions.
#[derive(Default)]
pub struct RecordingReporter {
    pub events: RefCell<Vec<(Level, Stage, String)>>,
}

impl RecordingReporter {
    fn push(&self, level: Level, stage: Stage, message: &str) {
        self.events
            .borrow_mut()
            .push((level, stage, message.to_string()));
    }

    /// Any event of `stage` whose message contains `needle`.
    pub fn has(&self, stage: Stage, needle: &str) -> bool {
        self.events
            .borrow()
            .iter()
            .any(|(_, s, m)| *s == stage && m.contains(needle))
    }

    pub fn has_error(&self, stage: Stage) -> bool {
        self.count(Level::Error, stage) > 0
    }

    pub fn count(&self, level: Level, stage: Stage) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|(l, s, _)| *l == level && *s == stage)
            .count()
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, stage: Stage, message: &str) {
        self.push(Level::Step, stage, message);
    }
    fn success(&self, stage: Stage, message: &str) {
        self.push(Level::Success, stage, message);
    }
    fn warn(&self, stage: Stage, message: &str) {
        self.push(Level::Warn, stage, message);
    }
    fn error(&self, stage: Stage, message: &str) {
        self.push(Level::Error, stage, message);
    }
}
