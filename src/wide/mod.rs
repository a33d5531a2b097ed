//! Wide-column store for teams, players, stadiums and leagues.
//!
//! Every table is shaped for exactly one query: the partition key (and the
//! clustering key, when present) form the primary key, and rows with the same
//! key overwrite each other on insert. Organised like the rest of the storage
//! code:
//! - `models`: row types, one per table family
//! - `schema`: connection management and table DDL
//! - `queries`: upserts and the per-table reads

pub mod models;
pub mod queries;
pub mod schema;


pub use models::*;
pub use schema::{WideColumnStore, WideTable};
