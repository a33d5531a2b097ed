//! Core utilities shared by the three stores and the console:
//! - `paths`: on-disk locations of the embedded databases
//! - `time`: lenient timestamp parsing and its serde adapters

pub mod paths;
pub mod time;

pub use paths::{data_dir, StorePaths};
pub use time::{format_timestamp, parse_timestamp};
