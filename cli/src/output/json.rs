//! JSON output.
//!
//! Reports are printed pretty to stdout; failures become an error object
//! `{error, message, code}`.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::services::{CycleReport, ProbeReport};

/// Renders reports as pretty-printed JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    pub fn render_status(&self, report: &ProbeReport) -> Result<()> {
        print_json(report)
    }

    pub fn render_plan(&self, report: &CycleReport) -> Result<()> {
        print_json(report)
    }

    pub fn render_cycle(&self, report: &CycleReport) -> Result<()> {
        print_json(report)
    }

    pub fn render_version(&self, version: &str) -> Result<()> {
        print_json(&serde_json::json!({ "version": version }))
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
    println!("{text}");
    Ok(())
}

/// Format a JSON error object.
///
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}
