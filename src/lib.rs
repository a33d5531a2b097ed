//! Football statistics over three embedded data stores.
//!
//! The same toy domain (teams, players, stadiums, leagues, matches, injuries,
//! transfers, awards and market values) is modelled three ways:
//!
//! - **Wide-column** ([`wide`]): twelve query-shaped tables keyed by
//!   partition and clustering keys, one read per table.
//! - **Document** ([`documents`]): six JSON collections served over a REST
//!   API ([`api`]) with secondary indexes and a market-value aggregation.
//! - **Graph** ([`graph`]): typed nodes joined by named, reversible edges and
//!   eight fixed query templates.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use football_stats::graph::{GraphStore, NewCountry, NewPlayer};
//!
//! # fn example() -> football_stats::Result<()> {
//! let mut graph = GraphStore::open_in_memory()?;
//! let mexico = graph.add_country(&NewCountry {
//!     country_id: "3".into(),
//!     name: "Mexico".into(),
//! })?;
//! graph.add_player(&NewPlayer {
//!     name: "Alan Mozo".into(),
//!     age: 28,
//!     country: Some(mexico),
//!     leagues: vec![],
//! })?;
//! assert_eq!(graph.stats_by_country("Mexico")?.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! ```bash
//! export FOOTBALL_STATS_DATA_DIR=~/football-data
//! export FOOTBALL_STATS_API_URL=http://127.0.0.1:8000
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod documents;
pub mod error;
pub mod graph;
pub mod wide;

pub use config::Settings;
pub use error::{Result, StatsError};
