//! Deterministic `docker run` argument construction

use dockhand_config::{AutoRemovePolicy, ResolvedTask};
use dockhand_core::{CommandArguments, EnvironmentVariables};
use std::time::Duration;

/// A fully assembled container launch
#[derive(Debug, Clone, PartialEq)]
pub struct DockerInvocation {
    pub image: String,
    pub container_name: String,
    /// Command executed inside the container, empty to use the image default
    pub command: Vec<String>,
    /// Variables injected into the container
    pub env: EnvironmentVariables,
    pub network: String,
    pub tty: bool,
    pub auto_remove: AutoRemovePolicy,
    pub timeout: Duration,
}

impl DockerInvocation {
    /// Assemble an invocation from a resolved task
    ///
    /// The in-container command is `[entrypoint, file, args.., extra_args..]`
    /// with empty segments dropped, so a task without a file (or with an
    /// empty entrypoint) falls through to the image's own entrypoint.
    #[must_use]
    pub fn from_task(
        task: &ResolvedTask,
        container_name: impl Into<String>,
        env: EnvironmentVariables,
        extra_args: &[String],
    ) -> Self {
        let command: Vec<String> = std::iter::once(task.entrypoint.clone())
            .chain(task.file.clone())
            .chain(task.args.iter().cloned())
            .chain(extra_args.iter().cloned())
            .filter(|segment| !segment.is_empty())
            .collect();

        Self {
            image: task.image.clone(),
            container_name: container_name.into(),
            command,
            env,
            network: task.network.clone(),
            tty: task.tty,
            auto_remove: task.auto_remove,
            timeout: task.timeout,
        }
    }

    /// The `docker run` argument vector
    ///
    /// Environment variables are passed as name-only `-e` flags in sorted
    /// order; their values never enter the argv and must be present in the
    /// docker CLI's own environment instead.
    #[must_use]
    pub fn args(&self) -> CommandArguments {
        let mut args = CommandArguments::new();
        args.push("run");
        args.push("--name");
        args.push(&self.container_name);
        args.push("--network");
        args.push(&self.network);
        if self.tty {
            args.push("-t");
        }
        if self.auto_remove == AutoRemovePolicy::Always {
            args.push("--rm");
        }
        for (name, _) in self.env.to_sorted_vec() {
            args.push("-e");
            args.push(name);
        }
        args.push(&self.image);
        args.extend(self.command.iter().cloned());
        args
    }
}

/// Sanitize a string into a valid docker container name
///
/// Docker names must match `[a-zA-Z0-9][a-zA-Z0-9_.-]*`; anything else is
/// mapped to `-`, and a leading non-alphanumeric gets a `task-` prefix.
#[must_use]
pub fn container_name(task: &str, run_id: &str) -> String {
    let raw = format!("{task}--{run_id}");
    let mut name: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    if !name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric())
    {
        name = format!("task-{name}");
    }
    name
}
