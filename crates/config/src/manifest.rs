//! Environment manifest types
//!
//! The manifest is a declarative TOML file: a `[defaults]` table, a
//! `[connections.*]` table per endpoint, and a `[tasks.*]` table per
//! containerized task. Task-level settings fall back to the defaults when
//! omitted.

use dockhand_core::{
    ConnectionId, EnvironmentVariables, Error, Result, TaskName, DEFAULT_ENTRYPOINT,
    DEFAULT_NETWORK_MODE,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Default task timeout in seconds (1 hour)
pub const DEFAULT_TASK_TIMEOUT_SECS: u64 = 3600;

/// Parsed environment manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Fallback settings applied to tasks that do not override them
    #[serde(default)]
    pub defaults: TaskDefaults,

    /// Declared connections, keyed by id
    #[serde(default)]
    pub connections: IndexMap<ConnectionId, ConnectionConfig>,

    /// Declared tasks, keyed by name
    #[serde(default)]
    pub tasks: IndexMap<TaskName, TaskConfig>,
}

/// Fallback settings for task execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskDefaults {
    /// Interpreter invoked inside the container
    pub entrypoint: String,
    /// Docker network mode
    pub network: String,
    /// Allocate a pseudo-terminal
    pub tty: bool,
    /// Container removal policy
    pub auto_remove: AutoRemovePolicy,
    /// Execution timeout in seconds
    pub timeout_secs: u64,
}

impl Default for TaskDefaults {
    fn default() -> Self {
        Self {
            entrypoint: DEFAULT_ENTRYPOINT.to_string(),
            network: DEFAULT_NETWORK_MODE.to_string(),
            tty: true,
            auto_remove: AutoRemovePolicy::OnSuccess,
            timeout_secs: DEFAULT_TASK_TIMEOUT_SECS,
        }
    }
}

/// Kind of service a connection points at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    Postgres,
    Mongodb,
    Redis,
    #[default]
    Generic,
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ConnectionKind::Postgres => "postgres",
            ConnectionKind::Mongodb => "mongodb",
            ConnectionKind::Redis => "redis",
            ConnectionKind::Generic => "generic",
        };
        write!(f, "{kind}")
    }
}

impl std::str::FromStr for ConnectionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "postgres" => Ok(ConnectionKind::Postgres),
            "mongodb" => Ok(ConnectionKind::Mongodb),
            "redis" => Ok(ConnectionKind::Redis),
            "generic" => Ok(ConnectionKind::Generic),
            other => Err(Error::configuration(format!(
                "unknown connection kind '{other}'"
            ))),
        }
    }
}

/// A declared connection: endpoint fields plus optional credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default)]
    pub kind: ConnectionKind,
    pub host: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// Free-form extras, passed through as a JSON object string
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, String>,
}

/// Container removal policy after task exit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutoRemovePolicy {
    /// Keep the container around
    Never,
    /// Remove the container only after a zero exit code
    OnSuccess,
    /// Remove the container unconditionally
    Always,
}

impl fmt::Display for AutoRemovePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let policy = match self {
            AutoRemovePolicy::Never => "never",
            AutoRemovePolicy::OnSuccess => "on-success",
            AutoRemovePolicy::Always => "always",
        };
        write!(f, "{policy}")
    }
}

/// A declared containerized task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image: String,
    /// Interpreter override; empty string runs the image's own entrypoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<String>,
    /// Entry file executed by the interpreter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Connections whose variables are injected into the container
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<ConnectionId>,
    /// Extra plain variables for the container
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tty: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_remove: Option<AutoRemovePolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// A task with every setting resolved against the manifest defaults
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTask {
    pub name: TaskName,
    pub description: Option<String>,
    pub image: String,
    pub entrypoint: String,
    pub file: Option<String>,
    pub args: Vec<String>,
    pub connections: Vec<ConnectionId>,
    pub env: EnvironmentVariables,
    pub network: String,
    pub tty: bool,
    pub auto_remove: AutoRemovePolicy,
    pub timeout: Duration,
}

impl Manifest {
    /// Parse a manifest from TOML text
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let manifest: Manifest = toml::from_str(text)
            .map_err(|e| Error::manifest_with_source(path, e.to_string(), e))?;
        Ok(manifest)
    }

    /// Look up a task by name
    #[must_use]
    pub fn get_task(&self, name: &TaskName) -> Option<&TaskConfig> {
        self.tasks.get(name)
    }

    /// Look up a connection by id
    #[must_use]
    pub fn get_connection(&self, id: &ConnectionId) -> Option<&ConnectionConfig> {
        self.connections.get(id)
    }

    /// Task names in declaration order
    #[must_use]
    pub fn task_names(&self) -> Vec<&TaskName> {
        self.tasks.keys().collect()
    }

    /// Connection ids in declaration order
    #[must_use]
    pub fn connection_ids(&self) -> Vec<&ConnectionId> {
        self.connections.keys().collect()
    }

    /// Resolve a task against the manifest defaults
    pub fn resolve_task(&self, name: &TaskName) -> Result<ResolvedTask> {
        let task = self.get_task(name).ok_or_else(|| {
            Error::configuration(format!("task '{name}' is not declared in the manifest"))
        })?;

        Ok(ResolvedTask {
            name: name.clone(),
            description: task.description.clone(),
            image: task.image.clone(),
            entrypoint: task
                .entrypoint
                .clone()
                .unwrap_or_else(|| self.defaults.entrypoint.clone()),
            file: task.file.clone(),
            args: task.args.clone(),
            connections: task.connections.clone(),
            env: EnvironmentVariables::from_map(task.env.clone()),
            network: task
                .network
                .clone()
                .unwrap_or_else(|| self.defaults.network.clone()),
            tty: task.tty.unwrap_or(self.defaults.tty),
            auto_remove: task.auto_remove.unwrap_or(self.defaults.auto_remove),
            timeout: Duration::from_secs(task.timeout_secs.unwrap_or(self.defaults.timeout_secs)),
        })
    }

    /// Collect every validation problem in the manifest
    #[must_use]
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for (name, task) in &self.tasks {
            if task.image.trim().is_empty() {
                problems.push(format!("task '{name}': image must not be empty"));
            }
            if task.timeout_secs == Some(0) {
                problems.push(format!("task '{name}': timeout_secs must be greater than 0"));
            }
            for id in &task.connections {
                if !self.connections.contains_key(id) {
                    problems.push(format!(
                        "task '{name}': references undeclared connection '{id}'"
                    ));
                }
            }
        }

        for (id, connection) in &self.connections {
            if connection.host.trim().is_empty() {
                problems.push(format!("connection '{id}': host must not be empty"));
            }
        }

        problems
    }

    /// Validate the manifest, failing on the first problem
    pub fn validate(&self) -> Result<()> {
        match self.problems().into_iter().next() {
            Some(problem) => Err(Error::configuration(problem)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const FULL_MANIFEST: &str = r#"
[defaults]
entrypoint = "python3"
network = "bridge"
tty = false
auto_remove = "always"
timeout_secs = 120

[connections.warehouse]
kind = "postgres"
host = "db.internal"
port = 5432
username = "etl"
password = "s3cret"
database = "analytics"

[connections.warehouse.extra]
sslmode = "require"

[connections.queue]
kind = "redis"
host = "cache.internal"
port = 6379

[tasks.ingest]
description = "Nightly ingest"
image = "acme/ingest:1.4"
file = "/app/jobs/ingest.py"
args = ["--full"]
connections = ["warehouse", "queue"]

[tasks.ingest.env]
INGEST_MODE = "full"

[tasks.report]
image = "acme/report:2.0"
file = "/app/jobs/report.py"
connections = ["warehouse"]
tty = true
timeout_secs = 30
"#;

    fn parse(text: &str) -> Manifest {
        Manifest::parse(text, &PathBuf::from("dockhand.toml")).unwrap()
    }

    #[test]
    fn parses_full_manifest() {
        let manifest = parse(FULL_MANIFEST);
        assert_eq!(manifest.connections.len(), 2);
        assert_eq!(manifest.tasks.len(), 2);

        let warehouse = manifest
            .get_connection(&ConnectionId::new("warehouse").unwrap())
            .unwrap();
        assert_eq!(warehouse.kind, ConnectionKind::Postgres);
        assert_eq!(warehouse.port, 5432);
        assert_eq!(warehouse.extra.get("sslmode"), Some(&"require".to_string()));

        let ingest = manifest.get_task(&TaskName::from("ingest")).unwrap();
        assert_eq!(ingest.image, "acme/ingest:1.4");
        assert_eq!(ingest.args, vec!["--full"]);
    }

    #[test]
    fn empty_manifest_is_valid() {
        let manifest = parse("");
        assert!(manifest.tasks.is_empty());
        assert!(manifest.connections.is_empty());
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn malformed_manifest_reports_path() {
        let err = Manifest::parse("tasks = 3", &PathBuf::from("/work/dockhand.toml")).unwrap_err();
        assert!(err.to_string().contains("/work/dockhand.toml"));
    }

    #[test]
    fn rejects_unknown_connection_kind() {
        let text = r#"
[connections.db]
kind = "oracle"
host = "x"
port = 1521
"#;
        assert!(Manifest::parse(text, &PathBuf::from("dockhand.toml")).is_err());
    }

    #[test]
    fn rejects_invalid_connection_id() {
        let text = r#"
[connections."bad-id"]
host = "x"
port = 1
"#;
        assert!(Manifest::parse(text, &PathBuf::from("dockhand.toml")).is_err());
    }

    #[test]
    fn task_settings_fall_back_to_defaults() {
        let manifest = parse(FULL_MANIFEST);

        let ingest = manifest.resolve_task(&TaskName::from("ingest")).unwrap();
        assert_eq!(ingest.entrypoint, "python3");
        assert_eq!(ingest.network, "bridge");
        assert!(!ingest.tty);
        assert_eq!(ingest.auto_remove, AutoRemovePolicy::Always);
        assert_eq!(ingest.timeout, Duration::from_secs(120));

        let report = manifest.resolve_task(&TaskName::from("report")).unwrap();
        assert!(report.tty);
        assert_eq!(report.timeout, Duration::from_secs(30));
    }

    #[test]
    fn resolve_unknown_task_is_an_error() {
        let manifest = parse(FULL_MANIFEST);
        let err = manifest.resolve_task(&TaskName::from("missing")).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn problems_flag_undeclared_connections() {
        let text = r#"
[tasks.broken]
image = "acme/x:1"
connections = ["nowhere"]
"#;
        let manifest = parse(text);
        let problems = manifest.problems();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("nowhere"));
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn problems_flag_empty_image_and_zero_timeout() {
        let text = r#"
[tasks.blank]
image = "  "
timeout_secs = 0
"#;
        let problems = parse(text).problems();
        assert_eq!(problems.len(), 2);
    }
}
