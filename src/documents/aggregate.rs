//! Player market-value aggregation.
//!
//! Runs as a small pipeline over the `player_values` collection: match the
//! player's documents, convert each history entry to a number, then project
//! the average, maximum and minimum next to the original history.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::models::{PlayerValue, PlayerValueSummary};
use super::store::{DocumentStore, Filter};
use crate::error::Result;

/// Summary statistics over a value history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueStats {
    pub avg: f64,
    pub max: f64,
    pub min: f64,
}

impl ValueStats {
    /// `None` for an empty history.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let sum: f64 = values.iter().sum();
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        Some(Self {
            avg: sum / values.len() as f64,
            max,
            min,
        })
    }
}

impl PlayerValue {
    /// Convert every history entry to a number. Fails on the first entry
    /// that is not numeric.
    pub fn numeric_history(&self) -> Result<Vec<f64>> {
        self.value_history.iter().map(|v| v.as_f64()).collect()
    }

    pub fn summarize(self) -> Result<PlayerValueSummary> {
        let stats = ValueStats::from_values(&self.numeric_history()?);
        Ok(PlayerValueSummary {
            id: self.id,
            player_name: self.player_name,
            value_history: self.value_history,
            avg_value: stats.map(|s| s.avg),
            max_value: stats.map(|s| s.max),
            min_value: stats.map(|s| s.min),
        })
    }
}

impl DocumentStore {
    /// One summary per `player_values` document for `player_name`, in
    /// insertion order. Empty when the player has no documents.
    pub fn player_value_stats(&self, player_name: &str) -> Result<Vec<PlayerValueSummary>> {
        let matched: Vec<PlayerValue> = self.find(&Filter::eq("player_name", player_name), None)?;
        debug!(player = player_name, documents = matched.len(), "aggregating player values");
        matched.into_iter().map(PlayerValue::summarize).collect()
    }
}
