//! Dry-run planning for `lightcycle plan`.

use anyhow::Result;

use crate::app::{self, AppContext};
use crate::application::services::CycleMode;

/// # Errors
///
/// Config and signal failures.
pub async fn run(app: &AppContext) -> Result<()> {
    let env = app::environment(app)?;
    let report = env
        .cycle(&app.reporter)
        .run(&env.location, CycleMode::DryRun)
        .await?;
    app.renderer().render_plan(&report)
}
