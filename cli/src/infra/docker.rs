//! Infrastructure implementation of the `ContainerDriver` port.
//!
//! The managed container runs either on this host or inside the Vagrant VM.
//! Inside the VM every docker call becomes one `vagrant ssh -c` line.
//!
//! With a `ContainerRecipe`, starting a container that does not exist yet
//! builds the image (when a build context is set) and creates it with
//! `docker run -d`.

use std::process::Output;

use anyhow::Result;

use crate::application::ports::{CommandRunner, ContainerDriver, VmDriver};
use crate::domain::config::ContainerRecipe;
use crate::domain::shell;
use crate::infra::vagrant::VagrantDriver;

/// Where docker commands are executed.
pub enum DockerHost<R: CommandRunner> {
    Local(R),
    Vagrant(VagrantDriver<R>),
}

/// Controls one named container.
pub struct DockerDriver<R: CommandRunner> {
    host: DockerHost<R>,
    bin: String,
    container: String,
    recipe: Option<ContainerRecipe>,
}

impl<R: CommandRunner> DockerDriver<R> {
    pub fn new(host: DockerHost<R>, bin: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            host,
            bin: bin.into(),
            container: container.into(),
            recipe: None,
        }
    }

    /// Create the container from `recipe` when `start` finds none.
    #[must_use]
    pub fn with_recipe(mut self, recipe: Option<ContainerRecipe>) -> Self {
        self.recipe = recipe;
        self
    }

    async fn docker(&self, args: &[&str]) -> Result<Output> {
        match &self.host {
            DockerHost::Local(runner) => runner.run(&self.bin, args).await,
            DockerHost::Vagrant(vm) => vm.ssh(&shell::join(&self.bin, args)).await,
        }
    }

    async fn docker_owned(&self, args: &[String]) -> Result<Output> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.docker(&args).await
    }

    async fn create(&self, recipe: &ContainerRecipe) -> Result<Output> {
        tracing::info!(
            container = %self.container,
            image = %recipe.image,
            "container does not exist, creating it"
        );
        if let Some(build) = recipe.build_args() {
            let built = self.docker_owned(&build).await?;
            if !built.status.success() {
                return Ok(built);
            }
        }
        self.docker_owned(&recipe.run_args(&self.container)).await
    }
}

/// `docker start` stderr for a container name the daemon does not know.
fn no_such_container(stderr: &[u8]) -> bool {
    String::from_utf8_lossy(stderr)
        .to_ascii_lowercase()
        .contains("no such container")
}

impl<R: CommandRunner> ContainerDriver for DockerDriver<R> {
    async fn list_running(&self) -> Result<Output> {
        let filter = format!("name=^{}$", self.container);
        self.docker(&["ps", "-q", "--filter", &filter]).await
    }

    async fn start(&self) -> Result<Output> {
        let started = self.docker(&["start", &self.container]).await?;
        match &self.recipe {
            Some(recipe) if !started.status.success() && no_such_container(&started.stderr) => {
                self.create(recipe).await
            }
            _ => Ok(started),
        }
    }

    async fn stop(&self) -> Result<Output> {
        self.docker(&["stop", &self.container]).await
    }
}
