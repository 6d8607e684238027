//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::application::services::{CycleReport, ProbeReport};
use crate::domain::{ActionResult, DaySignal};
use crate::output::OutputContext;

/// Renders reports as terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    pub fn render_version(&self, version: &str) {
        if !self.ctx.quiet {
            println!("lightcycle {version}");
        }
    }

    /// Render probed infrastructure state.
    pub fn render_status(&self, report: &ProbeReport) {
        self.ctx
            .header(&format!("Infrastructure ({} strategy)", report.strategy));
        if report.strategy.uses_vm() {
            self.ctx.kv("VM:      ", running(report.infra.vm_running));
        }
        self.ctx.kv("App:     ", running(report.infra.app_running));
        self.ctx.kv("Observed:", &report.observed.to_string());
    }

    /// Render a plan that was derived but not executed.
    pub fn render_plan(&self, report: &CycleReport) {
        self.render_decision(report);
        if report.plan.is_empty() {
            self.ctx.success("Environment already matches the signal");
        } else {
            self.ctx.info("Dry run: no action executed");
        }
    }

    /// Render an executed cycle.
    pub fn render_cycle(&self, report: &CycleReport) {
        self.render_decision(report);
        if report.plan.is_empty() {
            self.ctx.success("Environment already matches the signal");
            return;
        }
        if !self.ctx.quiet {
            println!();
        }
        for result in &report.results {
            self.render_result(result);
        }
        for action in report.skipped() {
            self.ctx.warn(&format!("{action} skipped, left for the next cycle"));
        }
    }

    fn render_decision(&self, report: &CycleReport) {
        if self.ctx.quiet {
            return;
        }
        let style = match report.signal {
            DaySignal::On => self.ctx.styles.night,
            DaySignal::Off => self.ctx.styles.day,
        };
        let token = report.signal.as_str();
        println!(
            "  {}  {}",
            "Signal:  ".style(self.ctx.styles.dim),
            token.style(style)
        );
        self.ctx.kv("Observed:", &report.observed.to_string());
        self.ctx.kv("Plan:    ", &report.plan.to_string());
    }

    fn render_result(&self, result: &ActionResult) {
        if result.succeeded() {
            self.ctx.success(&result.action.to_string());
            return;
        }
        let code = result
            .exit_code
            .map_or_else(|| "no exit code".to_string(), |c| format!("exit code {c}"));
        let mut msg = format!("{} failed ({code})", result.action);
        if !result.stderr.is_empty() {
            msg.push_str(": ");
            msg.push_str(&result.stderr);
        }
        self.ctx.error(&msg);
    }
}

fn running(up: bool) -> &'static str {
    if up { "running" } else { "not running" }
}
