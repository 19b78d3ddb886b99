//! ligandmpnn-wf
//!
//! - LigandMPNN sequence design exposed as a single parameterised run.
//! - Parameters are turned into `run.py` flags by a per-flag inclusion table
//!   (see [`flags`]) and handed to a [`Runner`].
//! - CLI to handle the above.
//!
mod cli;
mod commands;
pub mod command;
pub mod context;
pub mod error;
pub mod flags;
pub mod notify;
pub mod params;
pub mod runner;

pub use cli::Cli;
pub use command::CommandLine;
pub use context::ExecutionContext;
pub use error::RunError;
pub use notify::{MemoryNotifier, Notification, Notifier, StderrNotifier};
pub use params::ParameterSet;
pub use runner::{
    invoke, notify_failure, InvocationFailure, OutputLocation, Plan, Runner,
    SubprocessRunner,
};
