//! Lightcycle - start and stop a dev environment with the daylight

use std::process::ExitCode;

use clap::Parser;

use lightcycle_cli::cli::{Cli, error_code};
use lightcycle_cli::output::json::format_error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    let log_file = cli.log_file.clone();
    if let Err(e) = lightcycle_cli::logging::init(cli.verbose, cli.quiet, log_file.as_deref()) {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }

    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            match format_error(&format!("{e:#}"), error_code(&e)) {
                Ok(obj) if json => eprintln!("{obj}"),
                _ => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
