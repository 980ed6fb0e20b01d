//! CLI command handlers.
//!
//! This module provides headless, scriptable access to the exporter and the
//! placement validator for automation, testing, and CI/CD integration.

pub mod common;
pub mod config;
pub mod export;
pub mod targets;
pub mod validate;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode};
pub use config::ConfigArgs;
pub use export::ExportArgs;
pub use targets::TargetsArgs;
pub use validate::ValidateArgs;
