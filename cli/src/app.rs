//! Application context — unified state passed to every command handler.
//!
//! `AppContext` carries the output settings and the config location.
//! `Environment` is built from a loaded config and owns every production
//! adapter a command needs; services borrow from it.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{ProgressReporter, Stage};
use crate::application::services::{
    ActionExecutor, DaySignalProvider, DecisionCycle, InfrastructureProbe,
};
use crate::domain::{ConfigError, GeoLocation, LightcycleConfig, Strategy};
use crate::infra::clock::SystemClock;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::docker::{DockerDriver, DockerHost};
use crate::infra::lock::default_lock_path;
use crate::infra::reporter::TracingReporter;
use crate::infra::sun_api::SunriseSunsetClient;
use crate::infra::vagrant::VagrantDriver;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    pub output: OutputFlags,
    /// `--config`; falls back to `LIGHTCYCLE_CONFIG` and the home directory.
    pub config: Option<PathBuf>,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Config loader.
    pub config_store: YamlConfigStore,
    /// Stage-tagged progress events.
    pub reporter: TracingReporter,
}

impl AppContext {
    #[must_use]
    pub fn new(flags: AppFlags) -> Self {
        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            config_store: YamlConfigStore::new(flags.config),
            reporter: TracingReporter,
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    /// Load and validate the config, reporting the outcome under `[CONFIG]`.
    ///
    /// # Errors
    ///
    /// Returns the `ConfigError` wrapped in `anyhow`.
    pub fn load_config(&self) -> Result<LightcycleConfig> {
        match self.config_store.load() {
            Ok(config) => {
                self.reporter.step(
                    Stage::Config,
                    &format!("loaded ({} strategy)", config.strategy),
                );
                Ok(config)
            }
            Err(e) => {
                self.reporter.error(Stage::Config, &e.to_string());
                Err(e.into())
            }
        }
    }
}

type Runner = TokioCommandRunner;

/// Production adapters wired from one validated config.
pub struct Environment {
    pub strategy: Strategy,
    pub location: GeoLocation,
    pub lock_path: PathBuf,
    vm: Option<VagrantDriver<Runner>>,
    machine: Option<String>,
    app: DockerDriver<Runner>,
    provision_command: Option<String>,
    sun: SunriseSunsetClient,
    clock: SystemClock,
}

impl Environment {
    /// # Errors
    ///
    /// Returns a `ConfigError` when a section the strategy needs is missing
    /// or the lock path cannot be resolved.
    pub fn from_config(config: &LightcycleConfig) -> Result<Self, ConfigError> {
        let timeout = config.command_timeout_secs.map(Duration::from_secs);
        let runner = TokioCommandRunner::new(timeout);

        let (vm, app_host, machine, provision_command) = match config.strategy {
            Strategy::Vm => {
                let vm_config = config.vm()?;
                (
                    Some(VagrantDriver::from_config(vm_config, runner.clone())),
                    DockerHost::Vagrant(VagrantDriver::from_config(vm_config, runner)),
                    vm_config.machine.clone(),
                    Some(config.provisioning()?.command()),
                )
            }
            Strategy::Container => (None, DockerHost::Local(runner), None, None),
        };

        let lock_path = match &config.lock_file {
            Some(path) => expand_home(path)?,
            None => default_lock_path()?,
        };

        Ok(Self {
            strategy: config.strategy,
            location: config.location()?,
            lock_path,
            vm,
            machine,
            app: DockerDriver::new(
                app_host,
                config.app.docker_bin.clone(),
                config.app.container.clone(),
            )
            .with_recipe(config.app.recipe()),
            provision_command,
            sun: SunriseSunsetClient::new(config.sun_api.url.clone()),
            clock: SystemClock,
        })
    }

    pub fn signal_provider<'a, R: ProgressReporter>(
        &'a self,
        reporter: &'a R,
    ) -> DaySignalProvider<'a, SunriseSunsetClient, SystemClock, R> {
        DaySignalProvider::new(&self.sun, &self.clock, reporter)
    }

    pub fn probe<'a, R: ProgressReporter>(
        &'a self,
        reporter: &'a R,
    ) -> InfrastructureProbe<'a, VagrantDriver<Runner>, DockerDriver<Runner>, R> {
        InfrastructureProbe::new(self.vm.as_ref(), &self.app, self.machine.as_deref(), reporter)
    }

    pub fn cycle<'a, R: ProgressReporter>(
        &'a self,
        reporter: &'a R,
    ) -> DecisionCycle<
        'a,
        SunriseSunsetClient,
        SystemClock,
        VagrantDriver<Runner>,
        DockerDriver<Runner>,
        R,
    > {
        DecisionCycle::new(
            self.signal_provider(reporter),
            self.probe(reporter),
            ActionExecutor::new(
                self.vm.as_ref(),
                &self.app,
                self.provision_command.as_deref(),
                reporter,
            ),
            self.strategy,
            reporter,
        )
    }
}

/// Expand a leading `~/` against the home directory.
fn expand_home(path: &std::path::Path) -> Result<PathBuf, ConfigError> {
    match path.strip_prefix("~") {
        Ok(rest) => Ok(dirs::home_dir().ok_or(ConfigError::NoHomeDir)?.join(rest)),
        Err(_) => Ok(path.to_path_buf()),
    }
}

/// Convenience for commands: load the config and build the environment.
///
/// # Errors
///
/// Any config error, with context.
pub fn environment(app: &AppContext) -> Result<Environment> {
    let config = app.load_config()?;
    Environment::from_config(&config).context("invalid configuration")
}
