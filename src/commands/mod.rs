//! CLI command implementations for promsnap.
//!
//! This module provides implementations for all CLI subcommands:
//! - `check`: Configuration and server validation
//! - `config`: Example configuration generation

pub mod check;
pub mod config;

// Re-export command functions
pub use check::command_check;
pub use config::command_config;
