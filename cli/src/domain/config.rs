//! Domain types and validators for lightcycle configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::path::PathBuf;
use std::str::FromStr;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::plan::Strategy;
use crate::domain::shell;
use crate::domain::signal::GeoLocation;

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_SUN_API_URL: &str = "https://api.sunrise-sunset.org/json";
pub const DEFAULT_PLAYBOOK: &str = "playbook.yml";

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.lightcycle/config.yaml`.
///
/// `location` and `app` have no defaults: a file without them fails to parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightcycleConfig {
    pub location: LocationConfig,
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default)]
    pub sun_api: SunApiConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm: Option<VmConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning: Option<ProvisioningConfig>,
    pub app: AppConfig,
    /// Upper bound for any single tool invocation. Unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_file: Option<PathBuf>,
}

/// Coordinates and zone. Every key is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SunApiConfig {
    #[serde(default = "default_sun_api_url")]
    pub url: String,
}

impl Default for SunApiConfig {
    fn default() -> Self {
        Self {
            url: default_sun_api_url(),
        }
    }
}

/// Vagrant settings for the `vm` strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmConfig {
    /// Directory holding the `Vagrantfile`; used as cwd for every call.
    pub directory: PathBuf,
    #[serde(default = "default_vagrant_bin")]
    pub vagrant_bin: String,
    /// Restricts status matching to one machine of a multi-machine setup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine: Option<String>,
}

/// Ansible run executed inside the VM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningConfig {
    pub project_dir: String,
    pub inventory: String,
    #[serde(default = "default_playbook")]
    pub playbook: String,
}

/// The managed application unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub container: String,
    #[serde(default = "default_docker_bin")]
    pub docker_bin: String,
    /// Image the container is created from when `docker start` finds none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// `host:container` mappings passed as `-p` on creation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
    /// Directory built into `image` before creation, as seen by the docker host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_context: Option<String>,
}

/// How to create the managed container from scratch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRecipe {
    pub image: String,
    pub ports: Vec<String>,
    pub build_context: Option<String>,
}

impl ContainerRecipe {
    /// `docker build` arguments, when a build context is configured.
    #[must_use]
    pub fn build_args(&self) -> Option<Vec<String>> {
        self.build_context.as_ref().map(|context| {
            vec![
                "build".to_string(),
                "-t".to_string(),
                self.image.clone(),
                context.clone(),
            ]
        })
    }

    /// `docker run -d` arguments creating `container` from the image.
    #[must_use]
    pub fn run_args(&self, container: &str) -> Vec<String> {
        let mut args = vec!["run".to_string(), "-d".to_string()];
        for port in &self.ports {
            args.push("-p".to_string());
            args.push(port.clone());
        }
        args.push("--name".to_string());
        args.push(container.to_string());
        args.push(self.image.clone());
        args
    }
}

impl AppConfig {
    /// The creation recipe, present only when an image is configured.
    #[must_use]
    pub fn recipe(&self) -> Option<ContainerRecipe> {
        self.image.as_ref().map(|image| ContainerRecipe {
            image: image.clone(),
            ports: self.ports.clone(),
            build_context: self.build_context.clone(),
        })
    }
}

impl ProvisioningConfig {
    /// Shell command run inside the VM to apply the playbook.
    #[must_use]
    pub fn command(&self) -> String {
        format!(
            "cd {} && {}",
            shell::quote(&self.project_dir),
            shell::join("ansible-playbook", &["-i", &self.inventory, &self.playbook])
        )
    }
}

fn default_sun_api_url() -> String {
    DEFAULT_SUN_API_URL.to_string()
}

fn default_vagrant_bin() -> String {
    "vagrant".to_string()
}

fn default_docker_bin() -> String {
    "docker".to_string()
}

fn default_playbook() -> String {
    DEFAULT_PLAYBOOK.to_string()
}

// ── Validators ───────────────────────────────────────────────────────────────

impl LightcycleConfig {
    /// Check everything a cycle needs before any signal or probe work runs.
    ///
    /// Coordinate ranges are deliberately left to the signal provider, which
    /// fails the fetch instead of substituting a default.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.location()?;
        if self.sun_api.url.trim().is_empty() {
            return Err(ConfigError::MissingKey("sun_api.url"));
        }
        if self.app.container.trim().is_empty() {
            return Err(ConfigError::MissingKey("app.container"));
        }
        match &self.app.image {
            Some(image) if image.trim().is_empty() => {
                return Err(ConfigError::MissingKey("app.image"));
            }
            None if !self.app.ports.is_empty() || self.app.build_context.is_some() => {
                return Err(ConfigError::InvalidValue {
                    key: "app.image",
                    reason: "required when app.ports or app.build_context is set".to_string(),
                });
            }
            _ => {}
        }
        if self.command_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "command_timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.strategy.uses_vm() {
            self.vm()?;
            let prov = self.provisioning()?;
            if prov.inventory.trim().is_empty() {
                return Err(ConfigError::MissingKey("provisioning.inventory"));
            }
            if prov.project_dir.trim().is_empty() {
                return Err(ConfigError::MissingKey("provisioning.project_dir"));
            }
        }
        Ok(())
    }

    /// Resolve the configured location, parsing the IANA zone name.
    ///
    /// # Errors
    ///
    /// Returns an error for non-finite coordinates or an unknown zone.
    pub fn location(&self) -> Result<GeoLocation, ConfigError> {
        let loc = &self.location;
        if !loc.latitude.is_finite() {
            return Err(ConfigError::InvalidValue {
                key: "location.latitude",
                reason: "not a number".to_string(),
            });
        }
        if !loc.longitude.is_finite() {
            return Err(ConfigError::InvalidValue {
                key: "location.longitude",
                reason: "not a number".to_string(),
            });
        }
        let timezone = Tz::from_str(loc.timezone.trim()).map_err(|_| ConfigError::InvalidValue {
            key: "location.timezone",
            reason: format!("unknown time zone '{}'", loc.timezone),
        })?;
        Ok(GeoLocation {
            latitude: loc.latitude,
            longitude: loc.longitude,
            timezone,
        })
    }

    /// # Errors
    ///
    /// Returns `MissingKey` when the `vm` section is absent.
    pub fn vm(&self) -> Result<&VmConfig, ConfigError> {
        self.vm.as_ref().ok_or(ConfigError::MissingKey("vm.directory"))
    }

    /// # Errors
    ///
    /// Returns `MissingSection` when the `provisioning` section is absent.
    pub fn provisioning(&self) -> Result<&ProvisioningConfig, ConfigError> {
        self.provisioning
            .as_ref()
            .ok_or(ConfigError::MissingSection("provisioning"))
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
