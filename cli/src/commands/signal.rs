//! `lightcycle signal`: print the bare `ON` / `OFF` token.
//!
//! stdout carries the token and nothing else, in every output mode. On
//! failure stdout stays empty and the error goes to stderr.

use anyhow::Result;

use crate::app::{self, AppContext};

/// # Errors
///
/// Config and signal failures.
pub async fn run(app: &AppContext) -> Result<()> {
    let env = app::environment(app)?;
    let reading = env
        .signal_provider(&app.reporter)
        .compute(&env.location)
        .await?;
    println!("{}", reading.signal);
    Ok(())
}
