//! Connection and table management for the wide-column store

use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::core::paths::ensure_parent;
use crate::error::Result;

/// The twelve query tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WideTable {
    TeamData,
    LiveMatches,
    PlayerHistory,
    TeamHistory,
    StadiumCapacity,
    PlayersByTeam,
    TeamRanking,
    TeamBudgets,
    CompareTeams,
    LeagueStanding,
    AttendanceTrends,
    JerseyHistory,
}

impl WideTable {
    pub const ALL: [WideTable; 12] = [
        WideTable::TeamData,
        WideTable::LiveMatches,
        WideTable::PlayerHistory,
        WideTable::TeamHistory,
        WideTable::StadiumCapacity,
        WideTable::PlayersByTeam,
        WideTable::TeamRanking,
        WideTable::TeamBudgets,
        WideTable::CompareTeams,
        WideTable::LeagueStanding,
        WideTable::AttendanceTrends,
        WideTable::JerseyHistory,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WideTable::TeamData => "team_data",
            WideTable::LiveMatches => "display_real_time_visualization",
            WideTable::PlayerHistory => "player_history",
            WideTable::TeamHistory => "team_history",
            WideTable::StadiumCapacity => "afition_status",
            WideTable::PlayersByTeam => "players_by_team",
            WideTable::TeamRanking => "team_ranking",
            WideTable::TeamBudgets => "team_budgets",
            WideTable::CompareTeams => "compare_teams",
            WideTable::LeagueStanding => "league_standing",
            WideTable::AttendanceTrends => "analyze_attendance_trends",
            WideTable::JerseyHistory => "player_jersey_history",
        }
    }

    /// Column list plus the primary key (partition key, then clustering key).
    /// List-typed columns hold JSON arrays.
    fn columns(&self) -> &'static str {
        match self {
            WideTable::TeamData => {
                "team_id INTEGER NOT NULL, name TEXT NOT NULL, manager TEXT NOT NULL,
                 country TEXT NOT NULL, players TEXT NOT NULL, total_wins INTEGER NOT NULL,
                 total_losses INTEGER NOT NULL, total_goals INTEGER NOT NULL,
                 last_match TEXT, next_match TEXT, gender TEXT NOT NULL,
                 ranking INTEGER NOT NULL, budget_allocated INTEGER NOT NULL,
                 budget_spent INTEGER NOT NULL,
                 PRIMARY KEY (team_id)"
            }
            WideTable::LiveMatches => {
                "match_id INTEGER NOT NULL, away_team TEXT NOT NULL, home_team TEXT NOT NULL,
                 away_score INTEGER NOT NULL, home_score INTEGER NOT NULL,
                 type TEXT NOT NULL, date TEXT,
                 PRIMARY KEY (match_id)"
            }
            WideTable::PlayerHistory => {
                "player_id INTEGER NOT NULL, name TEXT NOT NULL, goals INTEGER NOT NULL,
                 assists INTEGER NOT NULL, position TEXT NOT NULL, nationality TEXT NOT NULL,
                 minutes_played INTEGER NOT NULL, birthday TEXT, jersey_num TEXT NOT NULL,
                 PRIMARY KEY (name)"
            }
            WideTable::TeamHistory => {
                "team_id INTEGER NOT NULL, name TEXT NOT NULL, manager TEXT NOT NULL,
                 country TEXT NOT NULL, players TEXT NOT NULL, total_wins INTEGER NOT NULL,
                 total_losses INTEGER NOT NULL, total_goals INTEGER NOT NULL,
                 last_match TEXT, next_match TEXT, gender TEXT NOT NULL,
                 ranking INTEGER NOT NULL, budget_allocated INTEGER NOT NULL,
                 budget_spent INTEGER NOT NULL,
                 PRIMARY KEY (name)"
            }
            WideTable::StadiumCapacity => {
                "stadium_id INTEGER NOT NULL, name TEXT NOT NULL, country TEXT NOT NULL,
                 capacity INTEGER NOT NULL, average_assistance INTEGER NOT NULL,
                 areas TEXT NOT NULL, next_match TEXT,
                 PRIMARY KEY (country, capacity)"
            }
            WideTable::PlayersByTeam => {
                "team_id INTEGER NOT NULL, name TEXT NOT NULL, manager TEXT NOT NULL,
                 country TEXT NOT NULL, players TEXT NOT NULL, gender TEXT NOT NULL,
                 PRIMARY KEY (name)"
            }
            WideTable::TeamRanking => {
                "team_id INTEGER NOT NULL, name TEXT NOT NULL, country TEXT NOT NULL,
                 total_wins INTEGER NOT NULL, total_losses INTEGER NOT NULL,
                 total_goals INTEGER NOT NULL, gender TEXT NOT NULL, ranking INTEGER NOT NULL,
                 PRIMARY KEY (country, ranking)"
            }
            WideTable::TeamBudgets => {
                "team_id INTEGER NOT NULL, name TEXT NOT NULL, country TEXT NOT NULL,
                 manager TEXT NOT NULL, budget_allocated INTEGER NOT NULL,
                 budget_spent INTEGER NOT NULL,
                 PRIMARY KEY (country, budget_allocated)"
            }
            WideTable::CompareTeams => {
                "team_id INTEGER NOT NULL, name TEXT NOT NULL, total_wins INTEGER NOT NULL,
                 total_losses INTEGER NOT NULL, total_goals INTEGER NOT NULL,
                 gender TEXT NOT NULL, ranking INTEGER NOT NULL,
                 PRIMARY KEY (name, ranking)"
            }
            WideTable::LeagueStanding => {
                "league_id INTEGER NOT NULL, name TEXT NOT NULL, country TEXT NOT NULL,
                 seasons INTEGER NOT NULL, teams TEXT NOT NULL, date TEXT,
                 level TEXT NOT NULL, points_system TEXT NOT NULL, format TEXT NOT NULL,
                 PRIMARY KEY (league_id, level)"
            }
            WideTable::AttendanceTrends => {
                "stadium_id INTEGER NOT NULL, name TEXT NOT NULL, country TEXT NOT NULL,
                 capacity INTEGER NOT NULL, average_assistance INTEGER NOT NULL,
                 areas TEXT NOT NULL, next_match TEXT,
                 PRIMARY KEY (country, average_assistance)"
            }
            WideTable::JerseyHistory => {
                "player_id INTEGER NOT NULL, name TEXT NOT NULL, jersey_num TEXT NOT NULL,
                 PRIMARY KEY (name)"
            }
        }
    }

    fn create_sql(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({}) WITHOUT ROWID",
            self.name(),
            self.columns()
        )
    }
}

/// Handle on the wide-column database.
pub struct WideColumnStore {
    pub(crate) conn: Connection,
}

impl WideColumnStore {
    /// Open (or create) the store at `path` and ensure all tables exist.
    pub fn open(path: &Path) -> Result<Self> {
        ensure_parent(path)?;
        info!(path = %path.display(), "opening wide-column store");
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.create_schema()?;
        Ok(store)
    }

    /// In-memory store, used by tests and throwaway sessions.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut store = Self { conn };
        store.create_schema()?;
        Ok(store)
    }

    pub fn create_schema(&mut self) -> Result<()> {
        for table in WideTable::ALL {
            debug!(table = table.name(), "creating table");
            self.conn.execute(&table.create_sql(), [])?;
        }
        Ok(())
    }

    pub fn drop_schema(&mut self) -> Result<()> {
        for table in WideTable::ALL {
            debug!(table = table.name(), "dropping table");
            self.conn
                .execute(&format!("DROP TABLE IF EXISTS {}", table.name()), [])?;
        }
        Ok(())
    }

    /// Drop and recreate every table.
    pub fn reset(&mut self) -> Result<()> {
        self.drop_schema()?;
        self.create_schema()?;
        info!("wide-column schema recreated");
        Ok(())
    }

    /// Number of rows currently stored in `table`.
    pub fn row_count(&self, table: WideTable) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table.name()),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
