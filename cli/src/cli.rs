//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, OutputFlags};
use crate::commands;
use crate::domain::{ConfigError, LockError, SignalError};

/// Start and stop a development environment with the daylight
#[derive(Parser)]
#[command(
    name = "lightcycle",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Config file (default ~/.lightcycle/config.yaml)
    #[arg(long, global = true, env = "LIGHTCYCLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also append logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print ON (dark) or OFF (daylight) for the configured location
    Signal,

    /// Show the state of the VM and the app
    Status,

    /// Show what a cycle would do, without doing it
    Plan,

    /// Run one decision cycle
    Cycle,

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            config,
            json,
            quiet,
            no_color,
            command,
            ..
        } = self;
        let app = AppContext::new(AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            config,
        });

        match command {
            Command::Signal => commands::signal::run(&app).await?,
            Command::Status => commands::status::run(&app).await?,
            Command::Plan => commands::plan::run(&app).await?,
            Command::Cycle => return commands::cycle::run(&app).await,
            Command::Version => commands::version::run(&app)?,
        }
        Ok(ExitCode::SUCCESS)
    }
}

/// Machine-readable code for the JSON error object.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    if err.downcast_ref::<ConfigError>().is_some() {
        "config"
    } else if err.downcast_ref::<SignalError>().is_some() {
        "signal"
    } else if err.downcast_ref::<LockError>().is_some() {
        "lock"
    } else {
        "error"
    }
}
