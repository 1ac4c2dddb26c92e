//! Namespaced environment variable contract for dockhand
//!
//! Variables injected into task containers follow a single layout:
//! `PREFIX__SCOPE__FIELD`. Connections use the `DOCKHAND_CONN` prefix with
//! the connection id as the scope; run context uses `DOCKHAND_CTX` with the
//! fixed `RUN` scope. The same types that generate variables on the host
//! parse them back inside the container, so the contract round-trips.

pub mod connection;
pub mod context;
pub mod scope;

pub use connection::ConnectionEnv;
pub use context::RunContext;
pub use scope::{is_sensitive_var, EnvScope};
