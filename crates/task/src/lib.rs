//! Docker invocation building and task execution for dockhand
//!
//! Turns a resolved task plus its run context into a deterministic
//! `docker run` invocation and executes it. Variable values are kept out of
//! the argument vector: the docker CLI receives name-only `-e` flags and
//! reads the values from its own environment.

pub mod executor;
pub mod invocation;
pub mod runner;

pub use executor::{CommandExecutor, CommandExecutorFactory, SystemCommandExecutor};
pub use invocation::DockerInvocation;
pub use runner::{static_env, TaskOutcome, TaskRunner};
