//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` runs external tools through tokio with an optional
//! timeout. The child is killed explicitly when the timeout fires, since
//! dropping the wait future alone leaves the process running on Windows.

use std::path::PathBuf;
use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

use crate::application::ports::CommandRunner;

/// Production `CommandRunner`.
///
/// Without a timeout a command runs until it exits on its own, which is what
/// a slow `vagrant up` needs. Dropping the future still kills the child.
#[derive(Debug, Clone, Default)]
pub struct TokioCommandRunner {
    timeout: Option<Duration>,
    working_dir: Option<PathBuf>,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
            working_dir: None,
        }
    }

    /// Run every command from `dir` instead of the current directory.
    #[must_use]
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        let mut command = tokio::process::Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        tracing::debug!(program, ?args, cwd = ?self.working_dir, "spawning");

        let mut child = command
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        let collect = async {
            let (status, stdout, stderr) = tokio::join!(
                child.wait(),
                async {
                    let mut buf = Vec::new();
                    if let Some(ref mut h) = stdout_handle {
                        let _ = h.read_to_end(&mut buf).await;
                    }
                    buf
                },
                async {
                    let mut buf = Vec::new();
                    if let Some(ref mut h) = stderr_handle {
                        let _ = h.read_to_end(&mut buf).await;
                    }
                    buf
                },
            );
            Ok::<_, anyhow::Error>(Output {
                status: status.with_context(|| format!("waiting for {program}"))?,
                stdout,
                stderr,
            })
        };

        let Some(timeout) = self.timeout else {
            return collect.await;
        };

        let outcome = tokio::time::timeout(timeout, collect).await;
        if let Ok(result) = outcome {
            return result;
        }
        let _ = child.kill().await;
        anyhow::bail!("{program} timed out after {}s", timeout.as_secs())
    }
}
