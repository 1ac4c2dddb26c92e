//! Command execution abstraction
//!
//! The runner talks to the container runtime through this trait so tests can
//! substitute a deterministic implementation for the real docker CLI.

use async_trait::async_trait;
use dockhand_core::{CommandArguments, EnvironmentVariables, Error, Result};
use std::process::Stdio;
use std::time::Duration;

/// Trait for executing external commands
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Execute a command with additional environment variables, inheriting
    /// stdio, and return its exit code
    async fn execute(
        &self,
        cmd: &str,
        args: &CommandArguments,
        env: EnvironmentVariables,
        timeout: Duration,
    ) -> Result<i32>;
}

/// Production implementation that spawns real processes
pub struct SystemCommandExecutor;

impl SystemCommandExecutor {
    /// Create a new system command executor
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandExecutor for SystemCommandExecutor {
    async fn execute(
        &self,
        cmd: &str,
        args: &CommandArguments,
        env: EnvironmentVariables,
        timeout: Duration,
    ) -> Result<i32> {
        let mut command = tokio::process::Command::new(cmd);
        command
            .args(args.as_slice())
            // Injected variables are added on top of the inherited
            // environment: the child still needs PATH, HOME, DOCKER_HOST.
            .envs(env.into_inner())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        // New process group on unix for cleaner teardown
        #[cfg(unix)]
        command.process_group(0);

        let mut child = command.spawn().map_err(|e| {
            Error::command_execution(
                cmd,
                args.as_slice().to_vec(),
                format!("failed to spawn command: {e}"),
                None,
            )
        })?;

        let status = match tokio::time::timeout(timeout, child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => {
                return Err(Error::command_execution(
                    cmd,
                    args.as_slice().to_vec(),
                    format!("failed to wait for command: {e}"),
                    None,
                ));
            }
            Err(_) => {
                if let Err(e) = child.start_kill() {
                    tracing::warn!(command = %cmd, "failed to kill timed out process: {e}");
                }
                return Err(Error::timeout(cmd, timeout));
            }
        };

        Ok(status.code().unwrap_or(1))
    }
}

/// Factory for creating command executors
pub struct CommandExecutorFactory;

impl CommandExecutorFactory {
    /// Create a production command executor
    #[must_use]
    pub fn system() -> Box<dyn CommandExecutor> {
        Box::new(SystemCommandExecutor::new())
    }

    /// Create a test command executor
    #[cfg(test)]
    #[must_use]
    pub fn test() -> testing::TestCommandExecutor {
        testing::TestCommandExecutor::new()
    }
}
