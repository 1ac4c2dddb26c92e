//! Centralized configuration for dockhand
//!
//! The `Config` struct is the single source of truth handed to the rest of
//! the workspace. It is immutable after construction and safe to share
//! across async tasks.

use crate::manifest::{Manifest, ResolvedTask};
use dockhand_core::{ConnectionId, Result, TaskName};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Immutable configuration shared across components
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the configuration was loaded for
    pub working_directory: PathBuf,

    /// Path of the manifest file, if one was found
    pub manifest_path: Option<PathBuf>,

    /// Parsed manifest
    pub manifest: Arc<Manifest>,

    /// Process environment captured at startup
    pub original_environment: HashMap<String, String>,
}

impl Config {
    /// Create a new Config instance
    pub fn new(
        working_directory: PathBuf,
        manifest_path: Option<PathBuf>,
        manifest: Manifest,
        original_environment: HashMap<String, String>,
    ) -> Self {
        Self {
            working_directory,
            manifest_path,
            manifest: Arc::new(manifest),
            original_environment,
        }
    }

    /// Resolve a task against the manifest defaults
    pub fn resolve_task(&self, name: &TaskName) -> Result<ResolvedTask> {
        self.manifest.resolve_task(name)
    }

    /// Task names in declaration order
    #[must_use]
    pub fn task_names(&self) -> Vec<&TaskName> {
        self.manifest.task_names()
    }

    /// Connection ids in declaration order
    #[must_use]
    pub fn connection_ids(&self) -> Vec<&ConnectionId> {
        self.manifest.connection_ids()
    }

    /// Whether a manifest file was found at load time
    #[must_use]
    pub fn has_manifest(&self) -> bool {
        self.manifest_path.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn config_exposes_manifest_accessors() {
        let manifest = Manifest::parse(
            r#"
[connections.db]
host = "localhost"
port = 5432

[tasks.sync]
image = "acme/sync:1"
"#,
            Path::new("dockhand.toml"),
        )
        .unwrap();

        let config = Config::new(
            PathBuf::from("/work"),
            Some(PathBuf::from("/work/dockhand.toml")),
            manifest,
            HashMap::new(),
        );

        assert!(config.has_manifest());
        assert_eq!(config.task_names().len(), 1);
        assert_eq!(config.connection_ids().len(), 1);
        assert!(config.resolve_task(&TaskName::from("sync")).is_ok());
    }
}
