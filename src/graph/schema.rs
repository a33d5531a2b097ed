//! Connection and schema management for the graph store

use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, info};

use super::models::NodeType;
use crate::core::paths::ensure_parent;
use crate::error::Result;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS nodes (
    uid INTEGER PRIMARY KEY AUTOINCREMENT,
    node_type TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS countries (
    uid INTEGER PRIMARY KEY REFERENCES nodes(uid) ON DELETE CASCADE,
    country_id TEXT NOT NULL,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS leagues (
    uid INTEGER PRIMARY KEY REFERENCES nodes(uid) ON DELETE CASCADE,
    league_id TEXT NOT NULL,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS players (
    uid INTEGER PRIMARY KEY REFERENCES nodes(uid) ON DELETE CASCADE,
    name TEXT NOT NULL,
    age INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS player_stats (
    uid INTEGER PRIMARY KEY REFERENCES nodes(uid) ON DELETE CASCADE,
    stats_id TEXT NOT NULL,
    matches INTEGER NOT NULL,
    assists INTEGER NOT NULL,
    goals INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS edges (
    src INTEGER NOT NULL REFERENCES nodes(uid) ON DELETE CASCADE,
    predicate TEXT NOT NULL,
    dst INTEGER NOT NULL REFERENCES nodes(uid) ON DELETE CASCADE,
    PRIMARY KEY (src, predicate, dst)
) WITHOUT ROWID;

-- Reverse traversal (originates / includes / belongs_to)
CREATE INDEX IF NOT EXISTS idx_edges_reverse ON edges(dst, predicate, src);

CREATE INDEX IF NOT EXISTS idx_countries_country_id ON countries(country_id);
CREATE INDEX IF NOT EXISTS idx_countries_name ON countries(name);
CREATE INDEX IF NOT EXISTS idx_leagues_league_id ON leagues(league_id);
CREATE INDEX IF NOT EXISTS idx_leagues_name ON leagues(name);
CREATE INDEX IF NOT EXISTS idx_players_name ON players(name);
CREATE INDEX IF NOT EXISTS idx_players_age ON players(age);
CREATE INDEX IF NOT EXISTS idx_player_stats_stats_id ON player_stats(stats_id);
CREATE INDEX IF NOT EXISTS idx_player_stats_goals ON player_stats(goals);
"#;

const DROP: &str = r#"
DROP TABLE IF EXISTS edges;
DROP TABLE IF EXISTS player_stats;
DROP TABLE IF EXISTS players;
DROP TABLE IF EXISTS leagues;
DROP TABLE IF EXISTS countries;
DROP TABLE IF EXISTS nodes;
"#;

/// Handle on the graph database.
pub struct GraphStore {
    pub(crate) conn: Connection,
}

impl GraphStore {
    /// Open (or create) the store at `path`. Existing data is kept.
    pub fn open(path: &Path) -> Result<Self> {
        ensure_parent(path)?;
        info!(path = %path.display(), "opening graph store");
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let store = Self { conn };
        store.create_schema()?;
        Ok(store)
    }

    fn create_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Drop every node and edge and recreate the schema.
    pub fn apply_schema(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(DROP)?;
        tx.execute_batch(SCHEMA)?;
        tx.commit()?;
        info!("graph schema applied");
        Ok(())
    }

    /// Number of nodes of one type.
    pub fn count(&self, node_type: NodeType) -> Result<usize> {
        let n: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", node_type.table()),
            [],
            |row| row.get(0),
        )?;
        debug!(node_type = %node_type, count = n, "counted nodes");
        Ok(n as usize)
    }

    pub fn edge_count(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM edges", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}
