//! CLI subcommands.

pub mod build;
pub mod raw;
pub mod serve;
