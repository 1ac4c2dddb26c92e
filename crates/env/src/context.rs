//! Per-run context injected into task containers
//!
//! The scheduler-facing half of the contract: the data interval being
//! processed plus identifiers for the run and the task. Timestamps travel as
//! RFC 3339 strings.

use crate::scope::EnvScope;
use chrono::{DateTime, Utc};
use dockhand_core::{
    EnvironmentVariables, Error, Result, CONTEXT_ENV_PREFIX, CONTEXT_ENV_SCOPE,
};
use std::collections::HashMap;

// Context field names
pub const DATA_INTERVAL_START: &str = "DATA_INTERVAL_START";
pub const DATA_INTERVAL_END: &str = "DATA_INTERVAL_END";
pub const RUN_ID: &str = "RUN_ID";
pub const TASK_ID: &str = "TASK_ID";

/// Run metadata passed to a task container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub data_interval_start: DateTime<Utc>,
    pub data_interval_end: DateTime<Utc>,
    pub run_id: String,
    pub task_id: String,
}

impl RunContext {
    /// Create a new run context
    #[must_use]
    pub fn new(
        data_interval_start: DateTime<Utc>,
        data_interval_end: DateTime<Utc>,
        run_id: impl Into<String>,
        task_id: impl Into<String>,
    ) -> Self {
        Self {
            data_interval_start,
            data_interval_end,
            run_id: run_id.into(),
            task_id: task_id.into(),
        }
    }

    fn scope() -> EnvScope {
        EnvScope::new(CONTEXT_ENV_PREFIX, CONTEXT_ENV_SCOPE)
    }

    /// Generate the context variables for injection
    #[must_use]
    pub fn to_env(&self) -> EnvironmentVariables {
        let scope = Self::scope();
        let mut env = EnvironmentVariables::new();
        let (k, v) = scope.entry(DATA_INTERVAL_START, self.data_interval_start.to_rfc3339());
        env.insert(k, v);
        let (k, v) = scope.entry(DATA_INTERVAL_END, self.data_interval_end.to_rfc3339());
        env.insert(k, v);
        let (k, v) = scope.entry(RUN_ID, &self.run_id);
        env.insert(k, v);
        let (k, v) = scope.entry(TASK_ID, &self.task_id);
        env.insert(k, v);
        env
    }

    /// Parse a run context from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_env_map(&std::env::vars().collect())
    }

    /// Parse a run context from a captured environment map
    pub fn from_env_map(env: &HashMap<String, String>) -> Result<Self> {
        let scope = Self::scope();
        Ok(Self {
            data_interval_start: parse_timestamp(
                &scope.var_name(DATA_INTERVAL_START),
                &scope.read_from(env, DATA_INTERVAL_START)?,
            )?,
            data_interval_end: parse_timestamp(
                &scope.var_name(DATA_INTERVAL_END),
                &scope.read_from(env, DATA_INTERVAL_END)?,
            )?,
            run_id: scope.read_from(env, RUN_ID)?,
            task_id: scope.read_from(env, TASK_ID)?,
        })
    }
}

fn parse_timestamp(variable: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::environment(variable, format!("invalid RFC 3339 timestamp: {e}")))
}
