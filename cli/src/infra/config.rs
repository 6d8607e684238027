//! YAML config loading.
//!
//! Resolution order: explicit path (`--config`), then `LIGHTCYCLE_CONFIG`,
//! then `~/.lightcycle/config.yaml`.

use std::path::{Path, PathBuf};

use crate::domain::{ConfigError, LightcycleConfig};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "LIGHTCYCLE_CONFIG";

/// Loads and validates `LightcycleConfig` from a YAML file on disk.
pub struct YamlConfigStore {
    explicit: Option<PathBuf>,
}

impl YamlConfigStore {
    #[must_use]
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }

    /// The file that `load` reads.
    ///
    /// # Errors
    ///
    /// Fails only when falling back to the home directory and it is unknown.
    pub fn path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.explicit {
            return Ok(path.clone());
        }
        if let Ok(val) = std::env::var(CONFIG_ENV)
            && !val.trim().is_empty()
        {
            return Ok(PathBuf::from(val));
        }
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".lightcycle").join("config.yaml"))
    }

    /// Read, parse, and validate the config. A missing file is an error.
    ///
    /// A relative `vm.directory` is taken relative to the config file, and so
    /// is a relative `app.build_context` when docker runs on this host.
    ///
    /// # Errors
    ///
    /// Returns the `ConfigError` describing the first problem found.
    pub fn load(&self) -> Result<LightcycleConfig, ConfigError> {
        let path = self.path()?;
        tracing::debug!(path = %path.display(), "loading config");
        let mut config = read(&path)?;
        if let Some(vm) = config.vm.as_mut()
            && vm.directory.is_relative()
            && let Some(base) = path.parent()
        {
            vm.directory = base.join(&vm.directory);
        }
        if !config.strategy.uses_vm()
            && let Some(context) = config.app.build_context.as_mut()
            && Path::new(context.as_str()).is_relative()
            && let Some(base) = path.parent()
        {
            *context = base.join(context.as_str()).display().to_string();
        }
        config.validate()?;
        Ok(config)
    }
}

fn read(path: &Path) -> Result<LightcycleConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(ConfigError::Unreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
        }
    };
    serde_yaml::from_str(&content).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
