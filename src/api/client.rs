//! HTTP client for the REST service

use std::time::Duration;

use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::documents::{
    Award, Collection, Document, Match, PlayerInjury, PlayerTransfer, PlayerValueSummary, Team,
};
use crate::error::{Result, StatsError};

/// Thin typed wrapper over the REST endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        debug!(path, ?query, "GET");
        let response = self.http.get(self.url(path)).query(query).send().await?;
        Ok(check(response).await?.json::<T>().await?)
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        debug!(path, "POST");
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Ok(check(response).await?.json::<T>().await?)
    }

    pub async fn health(&self) -> Result<Value> {
        self.get("/health", &[]).await
    }

    pub async fn teams(&self) -> Result<Vec<Team>> {
        self.get("/teams", &[]).await
    }

    pub async fn team(&self, name: &str) -> Result<Team> {
        self.get("/team", &[("team", name)]).await
    }

    pub async fn player_injury(&self, player: &str) -> Result<PlayerInjury> {
        self.get("/player_injuries", &[("player_name", player)]).await
    }

    /// Injury recorded without a player name.
    pub async fn unnamed_player_injury(&self) -> Result<PlayerInjury> {
        self.get("/player_injuries", &[]).await
    }

    pub async fn awards(&self, awarded: &str) -> Result<Vec<Award>> {
        self.get("/awards", &[("awarded", awarded)]).await
    }

    pub async fn finished_matches(&self) -> Result<Vec<Match>> {
        self.get("/matches", &[]).await
    }

    pub async fn upcoming_matches(&self) -> Result<Vec<Match>> {
        self.get("/upcoming_matches", &[]).await
    }

    pub async fn scored_matches(&self) -> Result<Vec<Match>> {
        self.get("/matches_score", &[]).await
    }

    /// First few matches involving `team`.
    pub async fn recent_matches(&self, team: &str) -> Result<Vec<Match>> {
        self.get("/matches_team", &[("team_name", team)]).await
    }

    pub async fn all_matches(&self, team: &str) -> Result<Vec<Match>> {
        self.get("/matches_team_all", &[("team_name", team)]).await
    }

    pub async fn transfers(&self, player: &str) -> Result<Vec<PlayerTransfer>> {
        self.get("/player_transfers", &[("player_name", player)]).await
    }

    pub async fn player_values(&self, player: &str) -> Result<Vec<PlayerValueSummary>> {
        self.get("/player_values", &[("player_name", player)]).await
    }

    /// Create a typed document through its collection's POST route.
    pub async fn create<T: Document>(&self, document: &T) -> Result<T> {
        self.post(T::COLLECTION.create_path(), document).await
    }

    /// Create an untyped document; the service still validates it against
    /// the collection's model.
    pub async fn create_value(&self, collection: Collection, document: &Value) -> Result<Value> {
        self.post(collection.create_path(), document).await
    }

    /// Empty every collection. Returns the number of documents removed.
    pub async fn delete_all(&self) -> Result<u64> {
        let response = self.http.delete(self.url("/all")).send().await?;
        let body: Value = check(response).await?.json().await?;
        Ok(body.get("deleted").and_then(Value::as_u64).unwrap_or(0))
    }
}

/// Turn a non-success response into [`StatsError::Api`], keeping the
/// service's `detail` message when there is one.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| {
            if text.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                text
            }
        });

    Err(StatsError::Api {
        status: status.as_u16(),
        message,
    })
}
