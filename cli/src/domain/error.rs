//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::plan::Action;

// ── Signal errors ─────────────────────────────────────────────────────────────

/// Failures deriving the day/night signal. Either kind aborts the cycle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// The sun times service could not be reached or answered non-2xx.
    #[error("cannot fetch sun times: {0}")]
    Fetch(String),

    /// The service answered, but the payload is unusable.
    #[error("invalid sun times data: {0}")]
    Data(String),
}

// ── Probe errors ──────────────────────────────────────────────────────────────

/// Failures querying infrastructure state. Absorbed by the probe service.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{tool} unavailable: {reason}")]
    Unavailable { tool: String, reason: String },

    #[error("{tool} exited with {}{}", exit_label(.code), stderr_suffix(.stderr))]
    NonZero {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },
}

// ── Action errors ─────────────────────────────────────────────────────────────

/// An external tool invocation backing a plan action failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{action} failed ({}): {stderr}", exit_label(.exit_code))]
pub struct ActionError {
    pub action: Action,
    pub exit_code: Option<i32>,
    pub stderr: String,
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors loading or validating the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read {}: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("cannot parse {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },

    #[error("missing required key: {0}")]
    MissingKey(&'static str),

    #[error("missing required section: {0}")]
    MissingSection(&'static str),

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    #[error("cannot determine home directory")]
    NoHomeDir,
}

// ── Lock errors ───────────────────────────────────────────────────────────────

/// Errors serializing decision cycles through the lock file.
#[derive(Debug, Error)]
pub enum LockError {
    #[error("another decision cycle holds {}", .0.display())]
    Held(PathBuf),

    #[error("cannot open lock file {}: {reason}", .path.display())]
    Io { path: PathBuf, reason: String },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}
