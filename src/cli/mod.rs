//! CLI module
//!
//! Command-line interface for running the Box loaders and tools.
//!
//! # Commands
//!
//! - `check` - Test the credentials against Box
//! - `files`, `folder`, `search`, `metadata-query`, `ask` - Load documents
//! - `text-rep` - Print one file's text representation
//! - `tools`, `tool` - List or run the agent tools

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
