//! Command implementations for the football-stats CLI
//!
//! Query handlers return their rendered output so the one-shot subcommands
//! and the interactive menu share them.

pub mod common;
pub mod documents;
pub mod graph;
pub mod init;
pub mod menu;
pub mod serve;
pub mod wide;

pub use common::CommandContext;
