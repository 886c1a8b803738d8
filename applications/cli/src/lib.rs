//! Cadence CLI Library
//!
//! Headless player: configuration, command parsing and session wiring.
//!
//! This library exposes the core components for testing purposes.

pub mod config;
pub mod error;
pub mod player;
pub mod repl;

// Re-export commonly used types for convenience
pub use config::CliConfig;
pub use error::{CliError, Result};
