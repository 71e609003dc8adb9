//! CLI module for the `owlrag` binary
//!
//! This module contains all CLI-related functionality including:
//! - Command line argument parsing
//! - Command handlers (organized by domain in handlers/ subdirectory)
//! - Output formatting
//! - The interactive chat loop

pub mod commands;
pub mod handlers;
pub mod output;
pub mod shell;

pub use commands::*;
pub use handlers::*;
pub use output::*;
