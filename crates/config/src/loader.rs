//! Configuration loader for dockhand
//!
//! Handles manifest discovery and parsing at startup: find `dockhand.toml`
//! in the working directory or one of its parents, parse it, validate it,
//! and capture the process environment.

use crate::config::Config;
use crate::manifest::Manifest;
use dockhand_core::{Error, Result, MANIFEST_FILENAME};
use std::path::{Path, PathBuf};

/// Configuration loader that handles all startup configuration
pub struct ConfigLoader {
    /// Optional directory to load from (defaults to current directory)
    directory: Option<PathBuf>,
    /// Explicit manifest path, bypassing discovery
    manifest_path: Option<PathBuf>,
    /// Whether to validate the manifest after parsing
    validate: bool,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            directory: None,
            manifest_path: None,
            validate: true,
        }
    }

    /// Set the directory to load configuration from
    pub fn directory(mut self, dir: PathBuf) -> Self {
        self.directory = Some(dir);
        self
    }

    /// Set an explicit manifest path, skipping discovery
    pub fn manifest_path(mut self, path: PathBuf) -> Self {
        self.manifest_path = Some(path);
        self
    }

    /// Set whether to validate the manifest after parsing
    pub fn validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Load the configuration
    pub async fn load(self) -> Result<Config> {
        let working_dir = self
            .directory
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .ok_or_else(|| Error::configuration("Failed to determine working directory"))?;

        let manifest_file = match self.manifest_path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::manifest(&path, "manifest file does not exist"));
                }
                Some(path)
            }
            None => find_manifest_file(&working_dir),
        };

        let manifest = if let Some(ref path) = manifest_file {
            tracing::debug!(path = %path.display(), "loading manifest");
            let text = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| Error::file_system(path, "read", e))?;
            let manifest = Manifest::parse(&text, path)?;
            if self.validate {
                manifest.validate()?;
            }
            manifest
        } else {
            tracing::debug!(dir = %working_dir.display(), "no manifest found");
            Manifest::default()
        };

        Ok(Config::new(
            working_dir,
            manifest_file,
            manifest,
            std::env::vars().collect(),
        ))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Find the manifest file in the given directory or its parents
#[must_use]
pub fn find_manifest_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let candidate = current.join(MANIFEST_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_manifest_in_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(MANIFEST_FILENAME), "").unwrap();

        let found = find_manifest_file(&nested).unwrap();
        assert_eq!(found, dir.path().join(MANIFEST_FILENAME));
    }

    #[tokio::test]
    async fn loads_manifest_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILENAME);
        fs::write(
            &path,
            r#"
[tasks.sync]
image = "acme/sync:1"
"#,
        )
        .unwrap();

        let config = ConfigLoader::new()
            .directory(dir.path().to_path_buf())
            .manifest_path(path.clone())
            .load()
            .await
            .unwrap();

        assert_eq!(config.manifest_path, Some(path));
        assert_eq!(config.task_names().len(), 1);
    }

    #[tokio::test]
    async fn explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigLoader::new()
            .directory(dir.path().to_path_buf())
            .manifest_path(dir.path().join("nope.toml"))
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Manifest { .. }));
    }

    #[tokio::test]
    async fn invalid_manifest_fails_validation_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILENAME);
        fs::write(
            &path,
            r#"
[tasks.broken]
image = "acme/x:1"
connections = ["nowhere"]
"#,
        )
        .unwrap();

        let err = ConfigLoader::new()
            .directory(dir.path().to_path_buf())
            .manifest_path(path.clone())
            .load()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("nowhere"));

        // The same manifest loads when validation is deferred (check command)
        let config = ConfigLoader::new()
            .directory(dir.path().to_path_buf())
            .manifest_path(path)
            .validate(false)
            .load()
            .await
            .unwrap();
        assert_eq!(config.manifest.problems().len(), 1);
    }
}
