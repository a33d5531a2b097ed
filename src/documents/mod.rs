//! Document store for teams, matches, injuries, transfers, awards and
//! player market values.
//!
//! Documents are schemaless JSON objects grouped into collections. The typed
//! models in [`models`] describe what the REST layer accepts; the store itself
//! only requires a JSON object and assigns `_id` when it is missing.

pub mod aggregate;
pub mod models;
pub mod store;


pub use aggregate::ValueStats;
pub use models::*;
pub use store::{DocumentStore, Filter};
