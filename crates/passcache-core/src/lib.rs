//! # passcache-core
//!
//! Configuration and utilities shared by the passcache crates.
//!
//! - **Configuration**: loading, validation, and persistence of the config file
//! - **Paths**: default locations under `~/.passcache` and tilde expansion
//! - **Environment**: typed access to the `PASSCACHE_*` overrides
//!
//! Everything environment-dependent is resolved here, once, into a
//! [`ResolvedPaths`] value that the cache layer receives explicitly.

pub mod config;
pub mod env;
pub mod error;
pub mod paths;

// Re-exports for convenience
pub use config::{Config, PathOverrides, ResolvedPaths};
pub use error::{ConfigError, Result};
