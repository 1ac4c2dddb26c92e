//! Core domain types, errors, and constants for the `dockhand` workspace.
//!
//! This crate establishes the foundational data structures and error handling
//! used by every other crate in the workspace.
//!
//! ## Key Components
//!
//! - **`errors`**: Defines the primary `Error` enum and `Result` type alias,
//!   centralizing all possible failure modes for predictable error handling.
//! - **`types`**: Domain-specific newtype wrappers and data structures like
//!   `EnvironmentVariables` and `ConnectionId` that enforce invariants at the
//!   type level.
//! - **`constants`**: Shared static constants such as environment variable
//!   prefixes and the manifest file name.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, Result, ResultExt},
    types::*,
};
