//! Node, edge and result types for the graph store

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StatsError;

/// Node identifier. Rendered as `0x<hex>`; parses from hex (with or without
/// the prefix when it starts with `0x`) or plain decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Uid(pub u64);

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl FromStr for Uid {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => trimmed.parse::<u64>(),
        };
        match parsed {
            Ok(0) | Err(_) => Err(StatsError::invalid(
                "uid",
                format!("'{}' is not a node uid (expected e.g. 0x1a)", s),
            )),
            Ok(v) => Ok(Uid(v)),
        }
    }
}

impl TryFrom<String> for Uid {
    type Error = StatsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Uid> for String {
    fn from(uid: Uid) -> Self {
        uid.to_string()
    }
}

impl Uid {
    pub(crate) fn as_i64(self) -> i64 {
        self.0 as i64
    }

    pub(crate) fn from_i64(raw: i64) -> Self {
        Uid(raw as u64)
    }
}

/// Node types stored in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Country,
    League,
    Player,
    PlayerStats,
}

impl NodeType {
    pub const ALL: [NodeType; 4] = [
        NodeType::Country,
        NodeType::League,
        NodeType::Player,
        NodeType::PlayerStats,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NodeType::Country => "Country",
            NodeType::League => "League",
            NodeType::Player => "Player",
            NodeType::PlayerStats => "PlayerStats",
        }
    }

    pub(crate) fn table(&self) -> &'static str {
        match self {
            NodeType::Country => "countries",
            NodeType::League => "leagues",
            NodeType::Player => "players",
            NodeType::PlayerStats => "player_stats",
        }
    }

    pub(crate) fn from_name(name: &str) -> Option<Self> {
        NodeType::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named edges. Each is stored once, from the player side, and can be
/// walked backwards under its reverse name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Predicate {
    /// Player -> Country
    Country,
    /// Player -> League
    PlaysIn,
    /// Player -> PlayerStats
    HasStats,
}

impl Predicate {
    pub const ALL: [Predicate; 3] = [Predicate::Country, Predicate::PlaysIn, Predicate::HasStats];

    pub fn name(&self) -> &'static str {
        match self {
            Predicate::Country => "country",
            Predicate::PlaysIn => "plays_in",
            Predicate::HasStats => "has_stats",
        }
    }

    pub fn reverse_name(&self) -> &'static str {
        match self {
            Predicate::Country => "originates",
            Predicate::PlaysIn => "includes",
            Predicate::HasStats => "belongs_to",
        }
    }
}

/// Walk direction along a [`Predicate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

/// Resolve an edge name (forward or reverse) to its stored predicate.
pub fn resolve_edge(name: &str) -> Option<(Predicate, Direction)> {
    Predicate::ALL.into_iter().find_map(|p| {
        if p.name() == name {
            Some((p, Direction::Forward))
        } else if p.reverse_name() == name {
            Some((p, Direction::Reverse))
        } else {
            None
        }
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub uid: Uid,
    pub country_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub uid: Uid,
    pub league_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub uid: Uid,
    pub name: String,
    pub age: i64,
    pub country: Option<Uid>,
    pub leagues: Vec<Uid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub uid: Uid,
    pub stats_id: String,
    pub matches: i64,
    pub assists: i64,
    pub goals: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCountry {
    pub country_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLeague {
    pub league_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    pub age: i64,
    #[serde(default)]
    pub country: Option<Uid>,
    #[serde(default)]
    pub leagues: Vec<Uid>,
}

/// A stats record and the player it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStats {
    pub player: Uid,
    pub stats_id: String,
    pub matches: i64,
    pub assists: i64,
    pub goals: i64,
}

// ----------------------------------------------------------------------
// Query results
// ----------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
    pub stats_id: String,
    pub matches: i64,
    pub assists: i64,
    pub goals: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerWithStats {
    pub uid: Uid,
    pub name: String,
    pub age: i64,
    pub stats: Vec<StatLine>,
}

impl PlayerWithStats {
    pub fn first_stats(&self) -> Option<&StatLine> {
        self.stats.first()
    }
}

/// A search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMatch {
    pub uid: Uid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopScorer {
    pub uid: Uid,
    pub stats_id: String,
    pub goals: i64,
    /// Owning player, when the stats node is attached to one.
    pub player: Option<String>,
}

// ----------------------------------------------------------------------
// Fixtures
// ----------------------------------------------------------------------

/// A batch of nodes that refer to each other by label (`_:name` or a bare
/// name). Labels are only meaningful within one fixture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphFixture {
    pub countries: Vec<FixtureCountry>,
    pub leagues: Vec<FixtureLeague>,
    pub players: Vec<FixturePlayer>,
    pub stats: Vec<FixtureStats>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureCountry {
    pub label: String,
    pub country_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureLeague {
    pub label: String,
    pub league_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixturePlayer {
    pub label: String,
    pub name: String,
    pub age: i64,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub leagues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureStats {
    #[serde(default)]
    pub label: Option<String>,
    pub player: String,
    pub stats_id: String,
    pub matches: i64,
    pub assists: i64,
    pub goals: i64,
}

impl GraphFixture {
    pub fn node_count(&self) -> usize {
        self.countries.len() + self.leagues.len() + self.players.len() + self.stats.len()
    }
}

/// Strip the blank-node prefix from a label.
pub(crate) fn normalize_label(label: &str) -> &str {
    let trimmed = label.trim();
    trimmed.strip_prefix("_:").unwrap_or(trimmed)
}
