//! Pointage CLI library.
//!
//! This crate provides the CLI interface: loading exports, rendering
//! timesheets and reports, and writing export files.

mod cli;
pub mod commands;
mod config;
pub mod ingest;

pub use cli::{Cli, Commands, ExportFormat, InputArgs};
pub use config::Config;
