//! Upserts and per-table reads for the wide-column store

use rusqlite::{params, types::Type, Connection, OptionalExtension, Row};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use super::{models::*, schema::WideColumnStore, WideTable};
use crate::error::Result;

const TEAM_COLUMNS: &str = "team_id, name, manager, country, players, total_wins, total_losses,
     total_goals, last_match, next_match, gender, ranking, budget_allocated, budget_spent";
const STADIUM_COLUMNS: &str =
    "stadium_id, name, country, capacity, average_assistance, areas, next_match";

impl WideColumnStore {
    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Upsert into `team_data`.
    pub fn insert_team(&mut self, team: &TeamRecord) -> Result<()> {
        insert_team_row(&self.conn, WideTable::TeamData, team)
    }

    pub fn insert_live_match(&mut self, live: &LiveMatch) -> Result<()> {
        insert_live_match(&self.conn, live)
    }

    pub fn insert_player_history(&mut self, player: &PlayerHistory) -> Result<()> {
        insert_player_history(&self.conn, player)
    }

    /// Upsert into `team_history`.
    pub fn insert_team_history(&mut self, team: &TeamRecord) -> Result<()> {
        insert_team_row(&self.conn, WideTable::TeamHistory, team)
    }

    /// Upsert into `afition_status`.
    pub fn insert_stadium(&mut self, stadium: &Stadium) -> Result<()> {
        insert_stadium_row(&self.conn, WideTable::StadiumCapacity, stadium)
    }

    pub fn insert_team_roster(&mut self, roster: &TeamRoster) -> Result<()> {
        insert_team_roster(&self.conn, roster)
    }

    pub fn insert_team_ranking(&mut self, ranking: &TeamRanking) -> Result<()> {
        insert_team_ranking(&self.conn, ranking)
    }

    pub fn insert_team_budget(&mut self, budget: &TeamBudget) -> Result<()> {
        insert_team_budget(&self.conn, budget)
    }

    pub fn insert_team_comparison(&mut self, team: &TeamComparison) -> Result<()> {
        insert_team_comparison(&self.conn, team)
    }

    pub fn insert_league_standing(&mut self, league: &LeagueStanding) -> Result<()> {
        insert_league_standing(&self.conn, league)
    }

    /// Upsert into `analyze_attendance_trends`.
    pub fn insert_attendance(&mut self, stadium: &Stadium) -> Result<()> {
        insert_stadium_row(&self.conn, WideTable::AttendanceTrends, stadium)
    }

    pub fn insert_jersey_history(&mut self, jersey: &JerseyHistory) -> Result<()> {
        insert_jersey_history(&self.conn, jersey)
    }

    /// Write a whole fixture in one transaction. Returns the number of rows written.
    pub fn load_fixture(&mut self, fixture: &WideFixture) -> Result<usize> {
        let tx = self.conn.transaction()?;

        for team in &fixture.teams {
            insert_team_row(&tx, WideTable::TeamData, team)?;
            insert_team_row(&tx, WideTable::TeamHistory, team)?;
        }
        for live in &fixture.live_matches {
            insert_live_match(&tx, live)?;
        }
        for player in &fixture.players {
            insert_player_history(&tx, player)?;
        }
        for stadium in &fixture.stadiums {
            insert_stadium_row(&tx, WideTable::StadiumCapacity, stadium)?;
            insert_stadium_row(&tx, WideTable::AttendanceTrends, stadium)?;
        }
        for roster in &fixture.rosters {
            insert_team_roster(&tx, roster)?;
        }
        for ranking in &fixture.rankings {
            insert_team_ranking(&tx, ranking)?;
        }
        for budget in &fixture.budgets {
            insert_team_budget(&tx, budget)?;
        }
        for team in &fixture.comparisons {
            insert_team_comparison(&tx, team)?;
        }
        for league in &fixture.leagues {
            insert_league_standing(&tx, league)?;
        }
        for jersey in &fixture.jerseys {
            insert_jersey_history(&tx, jersey)?;
        }

        tx.commit()?;
        let rows = fixture.row_count();
        info!(rows, "wide-column fixture loaded");
        Ok(rows)
    }

    // ------------------------------------------------------------------
    // Reads, one per table
    // ------------------------------------------------------------------

    /// All rows of `team_data`, by team id.
    pub fn team_data(&self) -> Result<Vec<TeamRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TEAM_COLUMNS} FROM team_data ORDER BY team_id"
        ))?;
        let rows = stmt.query_map([], team_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn live_matches(&self) -> Result<Vec<LiveMatch>> {
        let mut stmt = self.conn.prepare(
            "SELECT match_id, away_team, home_team, away_score, home_score, type, date
             FROM display_real_time_visualization
             ORDER BY match_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(LiveMatch {
                match_id: row.get(0)?,
                away_team: row.get(1)?,
                home_team: row.get(2)?,
                away_score: row.get(3)?,
                home_score: row.get(4)?,
                match_type: row.get(5)?,
                date: row.get(6)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn player_history(&self, name: &str) -> Result<Option<PlayerHistory>> {
        debug!(name, "player history lookup");
        let player = self
            .conn
            .query_row(
                "SELECT player_id, name, goals, assists, position, nationality,
                        minutes_played, birthday, jersey_num
                 FROM player_history
                 WHERE name = ?",
                [name],
                |row| {
                    Ok(PlayerHistory {
                        player_id: row.get(0)?,
                        name: row.get(1)?,
                        goals: row.get(2)?,
                        assists: row.get(3)?,
                        position: row.get(4)?,
                        nationality: row.get(5)?,
                        minutes_played: row.get(6)?,
                        birthday: row.get(7)?,
                        jersey_num: json_column(row, 8)?,
                    })
                },
            )
            .optional()?;
        Ok(player)
    }

    pub fn team_history(&self, name: &str) -> Result<Option<TeamRecord>> {
        let team = self
            .conn
            .query_row(
                &format!("SELECT {TEAM_COLUMNS} FROM team_history WHERE name = ?"),
                [name],
                team_from_row,
            )
            .optional()?;
        Ok(team)
    }

    /// Stadiums in `country` holding at least `min_capacity`, largest first.
    pub fn stadiums_by_capacity(&self, country: &str, min_capacity: i64) -> Result<Vec<Stadium>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {STADIUM_COLUMNS} FROM afition_status
             WHERE country = ? AND capacity >= ?
             ORDER BY capacity DESC"
        ))?;
        let rows = stmt.query_map(params![country, min_capacity], stadium_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn players_by_team(&self, name: &str) -> Result<Option<TeamRoster>> {
        let roster = self
            .conn
            .query_row(
                "SELECT team_id, name, manager, country, players, gender
                 FROM players_by_team
                 WHERE name = ?",
                [name],
                |row| {
                    Ok(TeamRoster {
                        team_id: row.get(0)?,
                        name: row.get(1)?,
                        manager: row.get(2)?,
                        country: row.get(3)?,
                        players: json_column(row, 4)?,
                        gender: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(roster)
    }

    /// Teams in `country` whose ranking is at least `min_rank`, highest first.
    pub fn team_rankings(&self, country: &str, min_rank: i64) -> Result<Vec<TeamRanking>> {
        let mut stmt = self.conn.prepare(
            "SELECT team_id, name, country, total_wins, total_losses, total_goals, gender, ranking
             FROM team_ranking
             WHERE country = ? AND ranking >= ?
             ORDER BY ranking DESC",
        )?;
        let rows = stmt.query_map(params![country, min_rank], |row| {
            Ok(TeamRanking {
                team_id: row.get(0)?,
                name: row.get(1)?,
                country: row.get(2)?,
                total_wins: row.get(3)?,
                total_losses: row.get(4)?,
                total_goals: row.get(5)?,
                gender: row.get(6)?,
                ranking: row.get(7)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Teams in `country` with at least `min_budget` allocated, biggest first.
    pub fn team_budgets(&self, country: &str, min_budget: i64) -> Result<Vec<TeamBudget>> {
        let mut stmt = self.conn.prepare(
            "SELECT team_id, name, country, manager, budget_allocated, budget_spent
             FROM team_budgets
             WHERE country = ? AND budget_allocated >= ?
             ORDER BY budget_allocated DESC",
        )?;
        let rows = stmt.query_map(params![country, min_budget], |row| {
            Ok(TeamBudget {
                team_id: row.get(0)?,
                name: row.get(1)?,
                country: row.get(2)?,
                manager: row.get(3)?,
                budget_allocated: row.get(4)?,
                budget_spent: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Both teams side by side, best ranking first.
    pub fn compare_teams(&self, first: &str, second: &str) -> Result<Vec<TeamComparison>> {
        let mut stmt = self.conn.prepare(
            "SELECT team_id, name, total_wins, total_losses, total_goals, gender, ranking
             FROM compare_teams
             WHERE name IN (?, ?)
             ORDER BY ranking ASC",
        )?;
        let rows = stmt.query_map(params![first, second], |row| {
            Ok(TeamComparison {
                team_id: row.get(0)?,
                name: row.get(1)?,
                total_wins: row.get(2)?,
                total_losses: row.get(3)?,
                total_goals: row.get(4)?,
                gender: row.get(5)?,
                ranking: row.get(6)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn league_standings(&self) -> Result<Vec<LeagueStanding>> {
        let mut stmt = self.conn.prepare(
            "SELECT league_id, name, country, seasons, teams, date, level, points_system, format
             FROM league_standing
             ORDER BY league_id, level ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(LeagueStanding {
                league_id: row.get(0)?,
                name: row.get(1)?,
                country: row.get(2)?,
                seasons: row.get(3)?,
                teams: json_column(row, 4)?,
                date: row.get(5)?,
                level: row.get(6)?,
                points_system: row.get(7)?,
                format: row.get(8)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Stadiums in `country` averaging at least `min_average` spectators, busiest first.
    pub fn attendance_trends(&self, country: &str, min_average: i64) -> Result<Vec<Stadium>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {STADIUM_COLUMNS} FROM analyze_attendance_trends
             WHERE country = ? AND average_assistance >= ?
             ORDER BY average_assistance DESC"
        ))?;
        let rows = stmt.query_map(params![country, min_average], stadium_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn jersey_history(&self, name: &str) -> Result<Option<JerseyHistory>> {
        let jersey = self
            .conn
            .query_row(
                "SELECT player_id, name, jersey_num FROM player_jersey_history WHERE name = ?",
                [name],
                |row| {
                    Ok(JerseyHistory {
                        player_id: row.get(0)?,
                        name: row.get(1)?,
                        jersey_num: json_column(row, 2)?,
                    })
                },
            )
            .optional()?;
        Ok(jersey)
    }
}

fn insert_team_row(conn: &Connection, table: WideTable, team: &TeamRecord) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT OR REPLACE INTO {} ({TEAM_COLUMNS})
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            table.name()
        ),
        params![
            team.team_id,
            team.name,
            team.manager,
            team.country,
            to_json(&team.players)?,
            team.total_wins,
            team.total_losses,
            team.total_goals,
            team.last_match,
            team.next_match,
            team.gender,
            team.ranking,
            team.budget_allocated,
            team.budget_spent,
        ],
    )?;
    Ok(())
}

fn insert_live_match(conn: &Connection, live: &LiveMatch) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO display_real_time_visualization
         (match_id, away_team, home_team, away_score, home_score, type, date)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        params![
            live.match_id,
            live.away_team,
            live.home_team,
            live.away_score,
            live.home_score,
            live.match_type,
            live.date,
        ],
    )?;
    Ok(())
}

fn insert_player_history(conn: &Connection, player: &PlayerHistory) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO player_history
         (player_id, name, goals, assists, position, nationality, minutes_played, birthday, jersey_num)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            player.player_id,
            player.name,
            player.goals,
            player.assists,
            player.position,
            player.nationality,
            player.minutes_played,
            player.birthday,
            to_json(&player.jersey_num)?,
        ],
    )?;
    Ok(())
}

fn insert_stadium_row(conn: &Connection, table: WideTable, stadium: &Stadium) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT OR REPLACE INTO {} ({STADIUM_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?)",
            table.name()
        ),
        params![
            stadium.stadium_id,
            stadium.name,
            stadium.country,
            stadium.capacity,
            stadium.average_assistance,
            to_json(&stadium.areas)?,
            stadium.next_match,
        ],
    )?;
    Ok(())
}

fn insert_team_roster(conn: &Connection, roster: &TeamRoster) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO players_by_team (team_id, name, manager, country, players, gender)
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
            roster.team_id,
            roster.name,
            roster.manager,
            roster.country,
            to_json(&roster.players)?,
            roster.gender,
        ],
    )?;
    Ok(())
}

fn insert_team_ranking(conn: &Connection, ranking: &TeamRanking) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO team_ranking
         (team_id, name, country, total_wins, total_losses, total_goals, gender, ranking)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            ranking.team_id,
            ranking.name,
            ranking.country,
            ranking.total_wins,
            ranking.total_losses,
            ranking.total_goals,
            ranking.gender,
            ranking.ranking,
        ],
    )?;
    Ok(())
}

fn insert_team_budget(conn: &Connection, budget: &TeamBudget) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO team_budgets
         (team_id, name, country, manager, budget_allocated, budget_spent)
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
            budget.team_id,
            budget.name,
            budget.country,
            budget.manager,
            budget.budget_allocated,
            budget.budget_spent,
        ],
    )?;
    Ok(())
}

fn insert_team_comparison(conn: &Connection, team: &TeamComparison) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO compare_teams
         (team_id, name, total_wins, total_losses, total_goals, gender, ranking)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        params![
            team.team_id,
            team.name,
            team.total_wins,
            team.total_losses,
            team.total_goals,
            team.gender,
            team.ranking,
        ],
    )?;
    Ok(())
}

fn insert_league_standing(conn: &Connection, league: &LeagueStanding) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO league_standing
         (league_id, name, country, seasons, teams, date, level, points_system, format)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            league.league_id,
            league.name,
            league.country,
            league.seasons,
            to_json(&league.teams)?,
            league.date,
            league.level,
            league.points_system,
            league.format,
        ],
    )?;
    Ok(())
}

fn insert_jersey_history(conn: &Connection, jersey: &JerseyHistory) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO player_jersey_history (player_id, name, jersey_num)
         VALUES (?, ?, ?)",
        params![jersey.player_id, jersey.name, to_json(&jersey.jersey_num)?],
    )?;
    Ok(())
}

fn team_from_row(row: &Row) -> rusqlite::Result<TeamRecord> {
    Ok(TeamRecord {
        team_id: row.get(0)?,
        name: row.get(1)?,
        manager: row.get(2)?,
        country: row.get(3)?,
        players: json_column(row, 4)?,
        total_wins: row.get(5)?,
        total_losses: row.get(6)?,
        total_goals: row.get(7)?,
        last_match: row.get(8)?,
        next_match: row.get(9)?,
        gender: row.get(10)?,
        ranking: row.get(11)?,
        budget_allocated: row.get(12)?,
        budget_spent: row.get(13)?,
    })
}

fn stadium_from_row(row: &Row) -> rusqlite::Result<Stadium> {
    Ok(Stadium {
        stadium_id: row.get(0)?,
        name: row.get(1)?,
        country: row.get(2)?,
        capacity: row.get(3)?,
        average_assistance: row.get(4)?,
        areas: json_column(row, 5)?,
        next_match: row.get(6)?,
    })
}

fn to_json<T: Serialize>(items: &[T]) -> Result<String> {
    Ok(serde_json::to_string(items)?)
}

/// Decode a list column stored as a JSON array.
fn json_column<T: DeserializeOwned>(row: &Row, idx: usize) -> rusqlite::Result<Vec<T>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
