//! `lightcycle cycle`: one full decision cycle under the cycle lock.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::{self, AppContext};
use crate::application::ports::{ProgressReporter, Stage};
use crate::application::services::CycleMode;
use crate::infra::lock::CycleLock;

/// Returns `ExitCode::FAILURE` when an action failed; the report has
/// already been rendered by then.
///
/// # Errors
///
/// Config, lock, and signal failures.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let env = app::environment(app)?;

    let lock = match CycleLock::acquire(&env.lock_path) {
        Ok(lock) => lock,
        Err(e) => {
            app.reporter.error(Stage::Lock, &e.to_string());
            return Err(e.into());
        }
    };
    app.reporter
        .step(Stage::Lock, &format!("acquired {}", lock.path().display()));

    let report = env
        .cycle(&app.reporter)
        .run(&env.location, CycleMode::Apply)
        .await?;
    drop(lock);

    app.renderer().render_cycle(&report)?;

    match report.failure() {
        Some(failure) => {
            tracing::debug!(%failure, "cycle ended with a failed action");
            Ok(ExitCode::FAILURE)
        }
        None => Ok(ExitCode::SUCCESS),
    }
}
