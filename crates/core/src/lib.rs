//! runtests-core - run single test cases against external JavaScript interpreters
//!
//! This crate provides:
//! - Interpreter backends with their command-line conventions
//! - A static registry that turns an interpreter name into a configured backend
//! - A process runner that enforces timeouts and classifies outcomes
pub mod backends;
pub mod command;
pub mod config;
pub mod error;
pub mod registry;
pub mod runner;
pub mod timer;
pub mod types;
pub mod utils;
pub mod version;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use types::*;

// Re-export main API components
pub use backends::{Backend, BackendBase, SetupGuard};
pub use command::InterpreterCommand;
pub use config::{BackendConfig, HarnessConfig};
pub use registry::{BackendRegistry, construct};
pub use runner::ProcessRunner;
pub use timer::Timer;
pub use version::{UNKNOWN_VERSION, git_version};
