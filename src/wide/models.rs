//! Row types for the wide-column tables

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::core::time::option_timestamp;

/// Full team record, stored in both `team_data` (keyed by id) and
/// `team_history` (keyed by name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub team_id: i64,
    pub name: String,
    pub manager: String,
    pub country: String,
    #[serde(default)]
    pub players: Vec<String>,
    pub total_wins: i64,
    pub total_losses: i64,
    pub total_goals: i64,
    #[serde(default, with = "option_timestamp")]
    pub last_match: Option<NaiveDateTime>,
    #[serde(default, with = "option_timestamp")]
    pub next_match: Option<NaiveDateTime>,
    pub gender: String,
    pub ranking: i64,
    pub budget_allocated: i64,
    pub budget_spent: i64,
}

/// Live score line from `display_real_time_visualization`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveMatch {
    pub match_id: i64,
    pub away_team: String,
    pub home_team: String,
    pub away_score: i64,
    pub home_score: i64,
    #[serde(rename = "type")]
    pub match_type: String,
    #[serde(default, with = "option_timestamp")]
    pub date: Option<NaiveDateTime>,
}

/// Career summary from `player_history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerHistory {
    pub player_id: i64,
    pub name: String,
    pub goals: i64,
    pub assists: i64,
    pub position: String,
    pub nationality: String,
    pub minutes_played: i64,
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub jersey_num: Vec<i64>,
}

impl PlayerHistory {
    /// Goals plus assists per 90 minutes played.
    pub fn contributions_per_90(&self) -> Option<f64> {
        if self.minutes_played <= 0 {
            return None;
        }
        Some((self.goals + self.assists) as f64 * 90.0 / self.minutes_played as f64)
    }
}

/// Stadium row, stored in `afition_status` (clustered by capacity) and
/// `analyze_attendance_trends` (clustered by average attendance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stadium {
    pub stadium_id: i64,
    pub name: String,
    pub country: String,
    pub capacity: i64,
    pub average_assistance: i64,
    #[serde(default)]
    pub areas: Vec<String>,
    #[serde(default, with = "option_timestamp")]
    pub next_match: Option<NaiveDateTime>,
}

impl Stadium {
    /// Average attendance as a percentage of capacity.
    pub fn occupancy_pct(&self) -> Option<f64> {
        (self.capacity > 0).then(|| self.average_assistance as f64 * 100.0 / self.capacity as f64)
    }
}

/// Squad list from `players_by_team`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRoster {
    pub team_id: i64,
    pub name: String,
    pub manager: String,
    pub country: String,
    #[serde(default)]
    pub players: Vec<String>,
    pub gender: String,
}

/// Row from `team_ranking`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRanking {
    pub team_id: i64,
    pub name: String,
    pub country: String,
    pub total_wins: i64,
    pub total_losses: i64,
    pub total_goals: i64,
    pub gender: String,
    pub ranking: i64,
}

/// Row from `team_budgets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamBudget {
    pub team_id: i64,
    pub name: String,
    pub country: String,
    pub manager: String,
    pub budget_allocated: i64,
    pub budget_spent: i64,
}

impl TeamBudget {
    pub fn budget_remaining(&self) -> i64 {
        self.budget_allocated - self.budget_spent
    }
}

/// Row from `compare_teams`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamComparison {
    pub team_id: i64,
    pub name: String,
    pub total_wins: i64,
    pub total_losses: i64,
    pub total_goals: i64,
    pub gender: String,
    pub ranking: i64,
}

impl TeamComparison {
    /// Share of decided matches won, `None` before any result.
    pub fn win_ratio(&self) -> Option<f64> {
        let decided = self.total_wins + self.total_losses;
        (decided > 0).then(|| self.total_wins as f64 / decided as f64)
    }
}

/// Row from `league_standing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueStanding {
    pub league_id: i64,
    pub name: String,
    pub country: String,
    pub seasons: i64,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default, with = "option_timestamp")]
    pub date: Option<NaiveDateTime>,
    pub level: String,
    pub points_system: String,
    pub format: String,
}

/// Row from `player_jersey_history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JerseyHistory {
    pub player_id: i64,
    pub name: String,
    #[serde(default)]
    pub jersey_num: Vec<i64>,
}

/// Bulk load input: every table is optional.
///
/// `teams` feeds both `team_data` and `team_history`; `stadiums` feeds both
/// stadium tables; the narrower tables are filled from their own lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WideFixture {
    pub teams: Vec<TeamRecord>,
    pub live_matches: Vec<LiveMatch>,
    pub players: Vec<PlayerHistory>,
    pub stadiums: Vec<Stadium>,
    pub rosters: Vec<TeamRoster>,
    pub rankings: Vec<TeamRanking>,
    pub budgets: Vec<TeamBudget>,
    pub comparisons: Vec<TeamComparison>,
    pub leagues: Vec<LeagueStanding>,
    pub jerseys: Vec<JerseyHistory>,
}

impl WideFixture {
    /// Number of rows this fixture writes across all tables.
    pub fn row_count(&self) -> usize {
        self.teams.len() * 2
            + self.live_matches.len()
            + self.players.len()
            + self.stadiums.len() * 2
            + self.rosters.len()
            + self.rankings.len()
            + self.budgets.len()
            + self.comparisons.len()
            + self.leagues.len()
            + self.jerseys.len()
    }
}
