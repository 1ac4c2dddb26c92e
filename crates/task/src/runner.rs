//! Task runner: resolve, assemble, execute
//!
//! Merges the three variable sources (task env, connection env, run context)
//! and drives the docker CLI through the executor seam. Context variables
//! are merged last and win over the other sources.

use crate::executor::CommandExecutor;
use crate::invocation::{container_name, DockerInvocation};
use dockhand_config::{AutoRemovePolicy, Config, ResolvedTask};
use dockhand_core::{
    CommandArguments, EnvironmentVariables, Error, Result, TaskName, DOCKER_BINARY,
};
use dockhand_env::{ConnectionEnv, RunContext};
use std::time::Duration;

/// How long a post-exit `docker rm` may take
const REMOVE_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of a completed task run
#[derive(Debug, Clone, PartialEq)]
pub struct TaskOutcome {
    pub task: TaskName,
    pub container_name: String,
    pub exit_code: i32,
}

impl TaskOutcome {
    /// Whether the container exited cleanly
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Collect the launch-time-independent variables for a task: the task's own
/// env overlaid with every referenced connection's env
pub fn static_env(config: &Config, task: &ResolvedTask) -> Result<EnvironmentVariables> {
    let mut env = task.env.clone();
    for id in &task.connections {
        let connection = config
            .manifest
            .get_connection(id)
            .ok_or_else(|| Error::connection(id.as_str(), "not declared in the manifest"))?;
        env.merge(ConnectionEnv::from_config(id.clone(), connection).to_env()?);
    }
    Ok(env)
}

/// Executes manifest tasks as containers
pub struct TaskRunner {
    executor: Box<dyn CommandExecutor>,
}

impl TaskRunner {
    /// Create a runner with the given executor
    #[must_use]
    pub fn new(executor: Box<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    /// Assemble the invocation for a task without executing it
    pub fn plan(
        &self,
        config: &Config,
        name: &TaskName,
        context: &RunContext,
        extra_args: &[String],
    ) -> Result<DockerInvocation> {
        let task = config.resolve_task(name)?;

        let mut env = static_env(config, &task)?;
        env.merge(context.to_env());

        let name = container_name(task.name.as_str(), &context.run_id);
        Ok(DockerInvocation::from_task(&task, name, env, extra_args))
    }

    /// Run a task to completion and report its exit code
    ///
    /// A non-zero exit code is an outcome, not an error; errors are reserved
    /// for failures to launch or wait on the container.
    pub async fn run(
        &self,
        config: &Config,
        name: &TaskName,
        context: &RunContext,
        extra_args: &[String],
    ) -> Result<TaskOutcome> {
        let invocation = self.plan(config, name, context, extra_args)?;

        tracing::info!(
            task = %name,
            image = %invocation.image,
            container = %invocation.container_name,
            "launching container"
        );

        let exit_code = self
            .executor
            .execute(
                DOCKER_BINARY,
                &invocation.args(),
                invocation.env.clone(),
                invocation.timeout,
            )
            .await?;

        if exit_code == 0 {
            tracing::info!(task = %name, "container exited cleanly");
        } else {
            tracing::warn!(task = %name, exit_code, "container exited with failure");
        }

        if invocation.auto_remove == AutoRemovePolicy::OnSuccess && exit_code == 0 {
            self.remove_container(&invocation.container_name).await;
        }

        Ok(TaskOutcome {
            task: name.clone(),
            container_name: invocation.container_name,
            exit_code,
        })
    }

    /// Best-effort container removal; failures are logged, not fatal
    async fn remove_container(&self, container: &str) {
        let args = CommandArguments::from_vec(vec!["rm".to_string(), container.to_string()]);
        match self
            .executor
            .execute(
                DOCKER_BINARY,
                &args,
                EnvironmentVariables::new(),
                REMOVE_TIMEOUT,
            )
            .await
        {
            Ok(0) => tracing::debug!(container, "container removed"),
            Ok(code) => {
                tracing::warn!(container, exit_code = code, "failed to remove container");
            }
            Err(e) => tracing::warn!(container, "failed to remove container: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::testing::TestCommandExecutor;
    use chrono::{TimeZone, Utc};
    use dockhand_config::Manifest;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    const MANIFEST: &str = r#"
[connections.warehouse]
kind = "postgres"
host = "db.internal"
port = 5432
username = "etl"
password = "s3cret"
database = "analytics"

[tasks.ingest]
image = "acme/ingest:1.4"
file = "/app/jobs/ingest.py"
connections = ["warehouse"]

[tasks.ingest.env]
INGEST_MODE = "full"
DOCKHAND_CTX__RUN__RUN_ID = "task-env-should-lose"

[tasks.keepalive]
image = "acme/keep:1"
auto_remove = "never"
"#;

    fn config() -> Config {
        let manifest = Manifest::parse(MANIFEST, Path::new("dockhand.toml")).unwrap();
        Config::new(PathBuf::from("/work"), None, manifest, HashMap::new())
    }

    fn context() -> RunContext {
        RunContext::new(
            Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 8, 2, 0, 0, 0).unwrap(),
            "run42",
            "ingest",
        )
    }

    fn runner() -> (TaskRunner, TestCommandExecutor) {
        let executor = TestCommandExecutor::new();
        (TaskRunner::new(Box::new(executor.clone())), executor)
    }

    #[test]
    fn plan_merges_env_with_context_precedence() {
        let (runner, _) = runner();
        let invocation = runner
            .plan(&config(), &TaskName::from("ingest"), &context(), &[])
            .unwrap();

        // Task env survives
        assert_eq!(
            invocation.env.get("INGEST_MODE"),
            Some(&"full".to_string())
        );
        // Connection env is injected
        assert_eq!(
            invocation.env.get("DOCKHAND_CONN__WAREHOUSE__HOST"),
            Some(&"db.internal".to_string())
        );
        // Context wins over a colliding task variable
        assert_eq!(
            invocation.env.get("DOCKHAND_CTX__RUN__RUN_ID"),
            Some(&"run42".to_string())
        );
    }

    #[test]
    fn plan_unknown_task_is_an_error() {
        let (runner, _) = runner();
        let err = runner
            .plan(&config(), &TaskName::from("nope"), &context(), &[])
            .unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[tokio::test]
    async fn run_executes_docker_and_removes_on_success() {
        let (runner, executor) = runner();
        let outcome = runner
            .run(&config(), &TaskName::from("ingest"), &context(), &[])
            .await
            .unwrap();

        assert!(outcome.success());
        assert_eq!(outcome.container_name, "ingest--run42");

        let calls = executor.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].cmd, DOCKER_BINARY);
        assert_eq!(calls[0].args[0], "run");
        // Default policy is on-success, so a rm follows the clean exit
        assert_eq!(calls[1].args, vec!["rm", "ingest--run42"]);
    }

    #[tokio::test]
    async fn run_failure_skips_removal_and_propagates_code() {
        let (runner, executor) = runner();
        executor.push_exit_code(2);

        let outcome = runner
            .run(&config(), &TaskName::from("ingest"), &context(), &[])
            .await
            .unwrap();

        assert!(!outcome.success());
        assert_eq!(outcome.exit_code, 2);
        assert_eq!(executor.calls().len(), 1);
    }

    #[tokio::test]
    async fn never_policy_skips_removal_even_on_success() {
        let (runner, executor) = runner();
        let outcome = runner
            .run(&config(), &TaskName::from("keepalive"), &context(), &[])
            .await
            .unwrap();

        assert!(outcome.success());
        assert_eq!(executor.calls().len(), 1);
    }

    #[tokio::test]
    async fn run_passes_env_values_to_executor_not_argv() {
        let (runner, executor) = runner();
        runner
            .run(&config(), &TaskName::from("ingest"), &context(), &[])
            .await
            .unwrap();

        let call = &executor.calls()[0];
        assert_eq!(
            call.env.get("DOCKHAND_CONN__WAREHOUSE__PASSWORD"),
            Some(&"s3cret".to_string())
        );
        assert!(!call.args.iter().any(|a| a.contains("s3cret")));
    }

    #[tokio::test]
    async fn removal_failure_does_not_change_outcome() {
        let (runner, executor) = runner();
        executor.push_exit_code(0); // docker run
        executor.push_exit_code(1); // docker rm fails

        let outcome = runner
            .run(&config(), &TaskName::from("ingest"), &context(), &[])
            .await
            .unwrap();
        assert!(outcome.success());
    }
}
