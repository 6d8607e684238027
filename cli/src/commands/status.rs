//! Probe-only view of the VM and app for `lightcycle status`.

use anyhow::Result;

use crate::app::{self, AppContext};

/// Probe failures are warnings here, never errors.
///
/// # Errors
///
/// Config failures only.
pub async fn run(app: &AppContext) -> Result<()> {
    let env = app::environment(app)?;
    let report = env.probe(&app.reporter).report(env.strategy).await;
    app.renderer().render_status(&report)
}
