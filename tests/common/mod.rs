//! Shared test utilities for plugin-log integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Every helper works on a fresh temporary log directory so
//! harnesses never touch `~/.opencode`.

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
