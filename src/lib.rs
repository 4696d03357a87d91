//! Workspace umbrella used by the integration tests under `tests/`
pub use runtests_core::*;
