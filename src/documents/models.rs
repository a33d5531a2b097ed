//! Document models and collection names

use chrono::NaiveDateTime;
use serde::{
    de::{DeserializeOwned, Error as _},
    Deserialize, Deserializer, Serialize,
};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use crate::core::time::timestamp;
use crate::error::{Result, StatsError};

/// The six document collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Teams,
    Matches,
    PlayerInjuries,
    PlayerTransfers,
    Awards,
    PlayerValues,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Teams,
        Collection::Matches,
        Collection::PlayerInjuries,
        Collection::PlayerTransfers,
        Collection::Awards,
        Collection::PlayerValues,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Teams => "teams",
            Collection::Matches => "matches",
            Collection::PlayerInjuries => "player_injuries",
            Collection::PlayerTransfers => "player_transfers",
            Collection::Awards => "awards",
            Collection::PlayerValues => "player_values",
        }
    }

    /// REST path that creates documents in this collection.
    pub fn create_path(&self) -> &'static str {
        match self {
            Collection::Teams => "/team",
            Collection::Matches => "/matches",
            Collection::PlayerInjuries => "/player_injuries",
            Collection::PlayerTransfers => "/player_transfers",
            Collection::Awards => "/awards",
            Collection::PlayerValues => "/player_values",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed document bound to its collection.
pub trait Document: Serialize + DeserializeOwned + Send + 'static {
    const COLLECTION: Collection;

    fn id(&self) -> &str;
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(rename = "_id", default = "new_id")]
    pub id: String,
    pub team_name: String,
    pub email: String,
    pub password: String,
    pub owner: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInjury {
    #[serde(rename = "_id", default = "new_id")]
    pub id: String,
    pub player_name: Option<String>,
    pub team_name: String,
    pub injury_type: String,
    #[serde(with = "timestamp")]
    pub start_date: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub end_date: NaiveDateTime,
    #[serde(default)]
    pub medical_notes: String,
    pub status: String,
}

impl PlayerInjury {
    /// Length of the absence in whole days.
    pub fn days_out(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Award {
    #[serde(rename = "_id", default = "new_id")]
    pub id: String,
    pub recipient_type: String,
    pub recipient_name: String,
    pub award_name: String,
    pub season: String,
    pub category: String,
    #[serde(with = "timestamp")]
    pub date_awarded: NaiveDateTime,
}

/// Match statuses the query endpoints look for.
pub const STATUS_FINISHED: &str = "Finished";
pub const STATUS_SCHEDULED: &str = "Scheduled";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    #[serde(rename = "_id", default = "new_id")]
    pub id: String,
    pub home_team_name: String,
    pub away_team_name: String,
    #[serde(with = "timestamp")]
    pub date: NaiveDateTime,
    pub status: String,
    /// Free-form: a string like `"2-1"`, an object, or null before kick-off.
    #[serde(default)]
    pub score: Option<Value>,
    #[serde(default)]
    pub officials: Vec<String>,
    #[serde(default)]
    pub statistics: Option<Vec<String>>,
}

impl Match {
    pub fn involves(&self, team: &str) -> bool {
        self.home_team_name == team || self.away_team_name == team
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerTransfer {
    #[serde(rename = "_id", default = "new_id")]
    pub id: String,
    pub team_name: String,
    pub player_name: String,
    pub from_team_name: String,
    #[serde(with = "timestamp")]
    pub transfer_date: NaiveDateTime,
    pub fee: f64,
    pub contract_length: i64,
}

/// One entry of a value history: a number, or a numeric string.
///
/// Strings are checked when deserialised, so a body carrying `"abc"` is
/// rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MarketValue {
    Amount(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for MarketValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => n
                .as_f64()
                .map(MarketValue::Amount)
                .ok_or_else(|| D::Error::custom(format!("{} is out of range", n))),
            Value::String(raw) => match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(MarketValue::Text(raw)),
                _ => Err(D::Error::custom(format!("'{}' is not a number", raw))),
            },
            other => Err(D::Error::custom(format!(
                "expected a number or numeric string, got {}",
                other
            ))),
        }
    }
}

impl MarketValue {
    pub fn as_f64(&self) -> Result<f64> {
        match self {
            MarketValue::Amount(v) => Ok(*v),
            MarketValue::Text(raw) => raw.trim().parse::<f64>().map_err(|_| {
                StatsError::invalid("value_history", format!("'{}' is not a number", raw))
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerValue {
    #[serde(rename = "_id", default = "new_id")]
    pub id: String,
    pub player_name: String,
    #[serde(default)]
    pub value_history: Vec<MarketValue>,
}

/// Aggregated view of a [`PlayerValue`] document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerValueSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub player_name: String,
    pub value_history: Vec<MarketValue>,
    #[serde(rename = "avgValue")]
    pub avg_value: Option<f64>,
    #[serde(rename = "maxValue")]
    pub max_value: Option<f64>,
    #[serde(rename = "minValue")]
    pub min_value: Option<f64>,
}

macro_rules! impl_document {
    ($($ty:ty => $collection:expr),* $(,)?) => {
        $(
            impl Document for $ty {
                const COLLECTION: Collection = $collection;

                fn id(&self) -> &str {
                    &self.id
                }
            }
        )*
    };
}

impl_document! {
    Team => Collection::Teams,
    Match => Collection::Matches,
    PlayerInjury => Collection::PlayerInjuries,
    PlayerTransfer => Collection::PlayerTransfers,
    Award => Collection::Awards,
    PlayerValue => Collection::PlayerValues,
}
