/// Constants used throughout the dockhand codebase
// Manifest file name
pub const MANIFEST_FILENAME: &str = "dockhand.toml";

// Namespaced variable layout: PREFIX__SCOPE__FIELD
pub const ENV_DELIMITER: &str = "__";

// Prefix for connection-scoped variables
pub const CONNECTION_ENV_PREFIX: &str = "DOCKHAND_CONN";

// Prefix and fixed scope for run-context variables
pub const CONTEXT_ENV_PREFIX: &str = "DOCKHAND_CTX";
pub const CONTEXT_ENV_SCOPE: &str = "RUN";

// Environment variable names honored by the CLI
pub const DOCKHAND_MANIFEST_VAR: &str = "DOCKHAND_MANIFEST";
pub const DOCKHAND_LOG_VAR: &str = "DOCKHAND_LOG";

// Container runtime binary
pub const DOCKER_BINARY: &str = "docker";

// Default network mode for launched containers
pub const DEFAULT_NETWORK_MODE: &str = "host";

// Default interpreter inside task images
pub const DEFAULT_ENTRYPOINT: &str = "python";
