use dockhand_core::{Error, Result, ENV_DELIMITER};
use std::collections::HashMap;

/// A namespace for related environment variables.
///
/// A scope owns the `PREFIX__SCOPE__` part of variable names and can read,
/// name, and generate variables inside it. Both segments are upper-cased so
/// a scope never produces two names differing only in case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvScope {
    prefix: String,
    scope: String,
}

impl EnvScope {
    /// Create a scope from a prefix and a scope segment
    #[must_use]
    pub fn new(prefix: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().to_ascii_uppercase(),
            scope: scope.into().to_ascii_uppercase(),
        }
    }

    /// The full variable name for a field in this scope
    #[must_use]
    pub fn var_name(&self, field: &str) -> String {
        [
            self.prefix.as_str(),
            self.scope.as_str(),
            field.to_ascii_uppercase().as_str(),
        ]
        .join(ENV_DELIMITER)
    }

    /// Read a field from the process environment
    pub fn read(&self, field: &str) -> Result<String> {
        let name = self.var_name(field);
        tracing::debug!(variable = %name, "looking up environment variable");
        match std::env::var(&name) {
            Ok(value) => Ok(value),
            Err(_) => Err(Error::environment(name, "not set")),
        }
    }

    /// Read a field from a captured environment map
    pub fn read_from(&self, env: &HashMap<String, String>, field: &str) -> Result<String> {
        let name = self.var_name(field);
        env.get(&name)
            .cloned()
            .ok_or_else(|| Error::environment(name, "not set"))
    }

    /// Read an optional field from a captured environment map
    #[must_use]
    pub fn read_opt_from(&self, env: &HashMap<String, String>, field: &str) -> Option<String> {
        env.get(&self.var_name(field)).cloned()
    }

    /// Produce a single variable entry for a field
    #[must_use]
    pub fn entry(&self, field: &str, value: impl Into<String>) -> (String, String) {
        (self.var_name(field), value.into())
    }
}

/// Whether a namespaced variable carries a credential
#[must_use]
pub fn is_sensitive_var(name: &str) -> bool {
    name.ends_with("__PASSWORD")
}
