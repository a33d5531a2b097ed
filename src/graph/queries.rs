//! Mutations, traversals and the query templates for the graph store

use std::collections::{HashMap, HashSet};

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use super::models::*;
use super::schema::GraphStore;
use crate::error::{Result, StatsError};

/// Result cap for search and top-scorer queries.
pub const QUERY_LIMIT: usize = 10;

impl GraphStore {
    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    pub fn add_country(&mut self, country: &NewCountry) -> Result<Uid> {
        let tx = self.conn.transaction()?;
        let uid = insert_country(&tx, country)?;
        tx.commit()?;
        Ok(uid)
    }

    pub fn add_league(&mut self, league: &NewLeague) -> Result<Uid> {
        let tx = self.conn.transaction()?;
        let uid = insert_league(&tx, league)?;
        tx.commit()?;
        Ok(uid)
    }

    /// Add a player, linking it to an existing country and leagues.
    pub fn add_player(&mut self, player: &NewPlayer) -> Result<Uid> {
        let tx = self.conn.transaction()?;
        let uid = insert_player(&tx, player)?;
        tx.commit()?;
        Ok(uid)
    }

    /// Add a stats node and attach it to its player with `has_stats`.
    pub fn add_stats(&mut self, stats: &NewStats) -> Result<Uid> {
        let tx = self.conn.transaction()?;
        let uid = insert_stats(&tx, stats)?;
        tx.commit()?;
        Ok(uid)
    }

    /// Insert a whole fixture in one transaction, resolving labels to uids.
    /// Returns the label -> uid map. Nothing is written if any reference
    /// fails to resolve.
    pub fn load_fixture(&mut self, fixture: &GraphFixture) -> Result<HashMap<String, Uid>> {
        let tx = self.conn.transaction()?;
        let mut labels: HashMap<String, Uid> = HashMap::new();

        for country in &fixture.countries {
            let uid = insert_country(
                &tx,
                &NewCountry {
                    country_id: country.country_id.clone(),
                    name: country.name.clone(),
                },
            )?;
            bind_label(&mut labels, &country.label, uid)?;
        }
        for league in &fixture.leagues {
            let uid = insert_league(
                &tx,
                &NewLeague {
                    league_id: league.league_id.clone(),
                    name: league.name.clone(),
                },
            )?;
            bind_label(&mut labels, &league.label, uid)?;
        }
        for player in &fixture.players {
            let country = player
                .country
                .as_deref()
                .map(|label| lookup_label(&labels, label))
                .transpose()?;
            let leagues = player
                .leagues
                .iter()
                .map(|label| lookup_label(&labels, label))
                .collect::<Result<Vec<_>>>()?;
            let uid = insert_player(
                &tx,
                &NewPlayer {
                    name: player.name.clone(),
                    age: player.age,
                    country,
                    leagues,
                },
            )?;
            bind_label(&mut labels, &player.label, uid)?;
        }
        for stats in &fixture.stats {
            let uid = insert_stats(
                &tx,
                &NewStats {
                    player: lookup_label(&labels, &stats.player)?,
                    stats_id: stats.stats_id.clone(),
                    matches: stats.matches,
                    assists: stats.assists,
                    goals: stats.goals,
                },
            )?;
            if let Some(label) = &stats.label {
                bind_label(&mut labels, label, uid)?;
            }
        }

        tx.commit()?;
        info!(nodes = fixture.node_count(), "graph fixture loaded");
        Ok(labels)
    }

    // ------------------------------------------------------------------
    // Lookups and traversal
    // ------------------------------------------------------------------

    pub fn node_type(&self, uid: Uid) -> Result<Option<NodeType>> {
        node_type(&self.conn, uid)
    }

    pub fn player(&self, uid: Uid) -> Result<Option<Player>> {
        let row = self
            .conn
            .query_row(
                "SELECT uid, name, age FROM players WHERE uid = ?",
                [uid.as_i64()],
                |row| {
                    Ok((
                        Uid::from_i64(row.get(0)?),
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                },
            )
            .optional()?;
        let Some((uid, name, age)) = row else {
            return Ok(None);
        };
        let country = self.traverse(uid, "country")?.into_iter().next();
        let leagues = self.traverse(uid, "plays_in")?;
        Ok(Some(Player {
            uid,
            name,
            age,
            country,
            leagues,
        }))
    }

    pub fn countries(&self) -> Result<Vec<Country>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uid, country_id, name FROM countries ORDER BY uid")?;
        let rows = stmt.query_map([], |row| {
            Ok(Country {
                uid: Uid::from_i64(row.get(0)?),
                country_id: row.get(1)?,
                name: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn leagues(&self) -> Result<Vec<League>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uid, league_id, name FROM leagues ORDER BY uid")?;
        let rows = stmt.query_map([], |row| {
            Ok(League {
                uid: Uid::from_i64(row.get(0)?),
                league_id: row.get(1)?,
                name: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn stats_node(&self, uid: Uid) -> Result<Option<PlayerStats>> {
        let stats = self
            .conn
            .query_row(
                "SELECT uid, stats_id, matches, assists, goals FROM player_stats WHERE uid = ?",
                [uid.as_i64()],
                |row| {
                    Ok(PlayerStats {
                        uid: Uid::from_i64(row.get(0)?),
                        stats_id: row.get(1)?,
                        matches: row.get(2)?,
                        assists: row.get(3)?,
                        goals: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(stats)
    }

    /// Follow an edge by name from `uid`. Forward names (`country`,
    /// `plays_in`, `has_stats`) walk src -> dst; reverse names
    /// (`originates`, `includes`, `belongs_to`) walk dst -> src.
    pub fn traverse(&self, uid: Uid, edge: &str) -> Result<Vec<Uid>> {
        let (predicate, direction) = resolve_edge(edge)
            .ok_or_else(|| StatsError::invalid("edge", format!("unknown edge '{}'", edge)))?;
        let sql = match direction {
            Direction::Forward => "SELECT dst FROM edges WHERE src = ? AND predicate = ? ORDER BY dst",
            Direction::Reverse => "SELECT src FROM edges WHERE dst = ? AND predicate = ? ORDER BY src",
        };
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params![uid.as_i64(), predicate.name()], |row| {
            row.get::<_, i64>(0).map(Uid::from_i64)
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    // ------------------------------------------------------------------
    // Query templates
    // ------------------------------------------------------------------

    /// Player with the exact name, carrying only their first stats record.
    pub fn player_performance(&self, name: &str) -> Result<Option<PlayerWithStats>> {
        let mut player = self.basic_player_stats(name)?;
        if let Some(p) = player.as_mut() {
            p.stats.truncate(1);
        }
        Ok(player)
    }

    /// Players every league with this name `includes`, with their stats.
    /// A player in several of those leagues is listed once.
    pub fn stats_by_league(&self, league: &str) -> Result<Vec<PlayerWithStats>> {
        let league_uids = {
            let mut stmt = self.conn.prepare("SELECT uid FROM leagues WHERE name = ? ORDER BY uid")?;
            let uids = stmt
                .query_map([league], |row| row.get::<_, i64>(0).map(Uid::from_i64))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            uids
        };
        if league_uids.is_empty() {
            debug!(league, "no such league");
            return Ok(Vec::new());
        }

        let mut seen = HashSet::new();
        let mut players = Vec::new();
        for league_uid in league_uids {
            for uid in self.traverse(league_uid, "includes")? {
                if !seen.insert(uid) {
                    continue;
                }
                if let Some(player) = self.player_with_stats(uid)? {
                    players.push(player);
                }
            }
        }
        Ok(players)
    }

    /// Players whose `country` edge points at a country with this name.
    pub fn stats_by_country(&self, country: &str) -> Result<Vec<PlayerWithStats>> {
        self.players_where(
            "SELECT p.uid, p.name, p.age FROM players p
             JOIN edges e ON e.src = p.uid AND e.predicate = 'country'
             JOIN countries c ON c.uid = e.dst
             WHERE c.name = ?
             ORDER BY p.uid",
            params![country],
        )
    }

    /// Players aged `min_age` or more.
    pub fn stats_by_age(&self, min_age: i64) -> Result<Vec<PlayerWithStats>> {
        self.players_where(
            "SELECT uid, name, age FROM players WHERE age >= ? ORDER BY uid",
            params![min_age],
        )
    }

    /// Player with the exact name and every stats record they own.
    pub fn basic_player_stats(&self, name: &str) -> Result<Option<PlayerWithStats>> {
        let mut players = self.players_where(
            "SELECT uid, name, age FROM players WHERE name = ? ORDER BY uid LIMIT 1",
            params![name],
        )?;
        Ok(players.pop())
    }

    /// Case-insensitive substring search on player names. The term is
    /// matched literally.
    pub fn search_players(&self, term: &str) -> Result<Vec<PlayerMatch>> {
        let needle = term.to_lowercase();
        let mut stmt = self
            .conn
            .prepare("SELECT uid, name FROM players ORDER BY uid")?;
        let rows = stmt.query_map([], |row| {
            Ok(PlayerMatch {
                uid: Uid::from_i64(row.get(0)?),
                name: row.get(1)?,
            })
        })?;

        let mut hits = Vec::new();
        for row in rows {
            let hit = row?;
            if hit.name.to_lowercase().contains(&needle) {
                hits.push(hit);
                if hits.len() == QUERY_LIMIT {
                    break;
                }
            }
        }
        debug!(term, hits = hits.len(), "player search");
        Ok(hits)
    }

    /// Both players with their stats, in uid order. Uids that are not
    /// players are skipped.
    pub fn compare_players(&self, first: Uid, second: Uid) -> Result<Vec<PlayerWithStats>> {
        let mut uids = vec![first, second];
        uids.sort();
        uids.dedup();
        uids.into_iter()
            .filter_map(|uid| self.player_with_stats(uid).transpose())
            .collect()
    }

    /// Stats nodes by goals, highest first, with the owning player's name.
    pub fn top_scorers(&self) -> Result<Vec<TopScorer>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.uid, s.stats_id, s.goals,
                    (SELECT p.name FROM edges e JOIN players p ON p.uid = e.src
                     WHERE e.dst = s.uid AND e.predicate = 'has_stats'
                     ORDER BY p.uid LIMIT 1)
             FROM player_stats s
             ORDER BY s.goals DESC, s.uid
             LIMIT ?",
        )?;
        let rows = stmt.query_map([QUERY_LIMIT as i64], |row| {
            Ok(TopScorer {
                uid: Uid::from_i64(row.get(0)?),
                stats_id: row.get(1)?,
                goals: row.get(2)?,
                player: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn player_with_stats(&self, uid: Uid) -> Result<Option<PlayerWithStats>> {
        let mut players = self.players_where(
            "SELECT uid, name, age FROM players WHERE uid = ?",
            params![uid.as_i64()],
        )?;
        Ok(players.pop())
    }

    fn players_where(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<PlayerWithStats>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, |row| {
            Ok((Uid::from_i64(row.get(0)?), row.get::<_, String>(1)?, row.get::<_, i64>(2)?))
        })?;
        let players = rows.collect::<rusqlite::Result<Vec<_>>>()?;

        players
            .into_iter()
            .map(|(uid, name, age)| {
                Ok(PlayerWithStats {
                    stats: self.stats_of(uid)?,
                    uid,
                    name,
                    age,
                })
            })
            .collect()
    }

    fn stats_of(&self, player: Uid) -> Result<Vec<StatLine>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.stats_id, s.matches, s.assists, s.goals
             FROM edges e JOIN player_stats s ON s.uid = e.dst
             WHERE e.src = ? AND e.predicate = 'has_stats'
             ORDER BY s.uid",
        )?;
        let rows = stmt.query_map([player.as_i64()], stat_line_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

fn stat_line_from_row(row: &Row) -> rusqlite::Result<StatLine> {
    Ok(StatLine {
        stats_id: row.get(0)?,
        matches: row.get(1)?,
        assists: row.get(2)?,
        goals: row.get(3)?,
    })
}

fn bind_label(labels: &mut HashMap<String, Uid>, label: &str, uid: Uid) -> Result<()> {
    let key = normalize_label(label).to_string();
    if key.is_empty() {
        return Err(StatsError::invalid("label", "fixture labels must not be empty"));
    }
    if labels.insert(key.clone(), uid).is_some() {
        return Err(StatsError::invalid("label", format!("'{}' is used twice", key)));
    }
    Ok(())
}

fn lookup_label(labels: &HashMap<String, Uid>, label: &str) -> Result<Uid> {
    let key = normalize_label(label);
    labels
        .get(key)
        .copied()
        .ok_or_else(|| {
            StatsError::invalid(
                "label",
                format!("'{}' is not defined earlier in the fixture", key),
            )
        })
}

fn node_type(conn: &Connection, uid: Uid) -> Result<Option<NodeType>> {
    let name: Option<String> = conn
        .query_row(
            "SELECT node_type FROM nodes WHERE uid = ?",
            [uid.as_i64()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(name.as_deref().and_then(NodeType::from_name))
}

/// Fail unless `uid` exists and has the expected type.
fn expect_node(conn: &Connection, uid: Uid, expected: NodeType, field: &str) -> Result<()> {
    match node_type(conn, uid)? {
        Some(found) if found == expected => Ok(()),
        Some(found) => Err(StatsError::invalid(
            field,
            format!("{} is a {}, not a {}", uid, found, expected),
        )),
        None => Err(StatsError::not_found(format!("{} {}", expected, uid))),
    }
}

fn insert_node(conn: &Connection, node_type: NodeType) -> Result<Uid> {
    conn.execute(
        "INSERT INTO nodes (node_type) VALUES (?)",
        [node_type.name()],
    )?;
    Ok(Uid::from_i64(conn.last_insert_rowid()))
}

fn insert_edge(conn: &Connection, src: Uid, predicate: Predicate, dst: Uid) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO edges (src, predicate, dst) VALUES (?, ?, ?)",
        params![src.as_i64(), predicate.name(), dst.as_i64()],
    )?;
    Ok(())
}

fn insert_country(conn: &Connection, country: &NewCountry) -> Result<Uid> {
    let uid = insert_node(conn, NodeType::Country)?;
    conn.execute(
        "INSERT INTO countries (uid, country_id, name) VALUES (?, ?, ?)",
        params![uid.as_i64(), country.country_id, country.name],
    )?;
    debug!(%uid, name = %country.name, "country added");
    Ok(uid)
}

fn insert_league(conn: &Connection, league: &NewLeague) -> Result<Uid> {
    let uid = insert_node(conn, NodeType::League)?;
    conn.execute(
        "INSERT INTO leagues (uid, league_id, name) VALUES (?, ?, ?)",
        params![uid.as_i64(), league.league_id, league.name],
    )?;
    debug!(%uid, name = %league.name, "league added");
    Ok(uid)
}

fn insert_player(conn: &Connection, player: &NewPlayer) -> Result<Uid> {
    if player.name.trim().is_empty() {
        return Err(StatsError::invalid("name", "player name must not be empty"));
    }
    if player.age < 0 {
        return Err(StatsError::invalid("age", "must not be negative"));
    }
    if let Some(country) = player.country {
        expect_node(conn, country, NodeType::Country, "country")?;
    }
    for league in &player.leagues {
        expect_node(conn, *league, NodeType::League, "plays_in")?;
    }

    let uid = insert_node(conn, NodeType::Player)?;
    conn.execute(
        "INSERT INTO players (uid, name, age) VALUES (?, ?, ?)",
        params![uid.as_i64(), player.name, player.age],
    )?;
    if let Some(country) = player.country {
        insert_edge(conn, uid, Predicate::Country, country)?;
    }
    for league in &player.leagues {
        insert_edge(conn, uid, Predicate::PlaysIn, *league)?;
    }
    debug!(%uid, name = %player.name, "player added");
    Ok(uid)
}

fn insert_stats(conn: &Connection, stats: &NewStats) -> Result<Uid> {
    expect_node(conn, stats.player, NodeType::Player, "player")?;

    let uid = insert_node(conn, NodeType::PlayerStats)?;
    conn.execute(
        "INSERT INTO player_stats (uid, stats_id, matches, assists, goals) VALUES (?, ?, ?, ?, ?)",
        params![uid.as_i64(), stats.stats_id, stats.matches, stats.assists, stats.goals],
    )?;
    insert_edge(conn, stats.player, Predicate::HasStats, uid)?;
    debug!(%uid, player = %stats.player, "stats added");
    Ok(uid)
}
