//! Manifest model and configuration loading for dockhand
//!
//! The environment manifest (`dockhand.toml`) declares named connections and
//! containerized tasks. This crate parses and validates the manifest,
//! discovers it on disk, and exposes an immutable [`Config`] that the rest of
//! the workspace shares.

pub mod config;
pub mod loader;
pub mod manifest;

pub use config::Config;
pub use loader::ConfigLoader;
pub use manifest::{
    AutoRemovePolicy, ConnectionConfig, ConnectionKind, Manifest, ResolvedTask, TaskConfig,
    TaskDefaults,
};
