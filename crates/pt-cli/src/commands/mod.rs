//! CLI subcommand implementations.

pub mod export;
pub mod pair;
pub mod report;
pub mod status;
pub mod util;
