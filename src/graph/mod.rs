//! Graph store for countries, leagues, players and player stats.
//!
//! Nodes live in one table per type and share a global uid space; edges are
//! stored once in `edges(src, predicate, dst)` and walked in either
//! direction, so `includes` is `plays_in` read backwards, `originates` is
//! `country` read backwards and `belongs_to` is `has_stats` read backwards.

pub mod models;
pub mod queries;
pub mod schema;

#[cfg(test)]
mod tests;

pub use models::*;
pub use queries::QUERY_LIMIT;
pub use schema::GraphStore;
