//! `TracingReporter` — `ProgressReporter` backed by `tracing` events.
//!
//! Severity maps one-to-one: step/success → INFO, warn → WARN,
//! error → ERROR. The stage tag leads every message.

use crate::application::ports::{ProgressReporter, Stage};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn step(&self, stage: Stage, message: &str) {
        tracing::info!("{} {message}", stage.tag());
    }

    fn success(&self, stage: Stage, message: &str) {
        tracing::info!("{} [OK] {message}", stage.tag());
    }

    fn warn(&self, stage: Stage, message: &str) {
        tracing::warn!("{} {message}", stage.tag());
    }

    fn error(&self, stage: Stage, message: &str) {
        tracing::error!("{} [FAILED] {message}", stage.tag());
    }
}
