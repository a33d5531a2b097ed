//! Route handlers, one create/read set per collection. Store calls run on
//! the blocking pool through [`DocumentStore::run`].

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::error::{ApiError, ApiResult};
use crate::documents::{
    Award, Collection, Document, DocumentStore, Filter, Match, PlayerInjury, PlayerTransfer,
    PlayerValueSummary, Team, STATUS_FINISHED, STATUS_SCHEDULED,
};

/// Matches returned by `/matches_team`.
pub const RECENT_MATCH_LIMIT: usize = 5;

#[derive(Debug, Deserialize)]
pub struct TeamQuery {
    pub team: String,
}

#[derive(Debug, Deserialize)]
pub struct TeamNameQuery {
    pub team_name: String,
}

#[derive(Debug, Deserialize)]
pub struct PlayerQuery {
    pub player_name: String,
}

#[derive(Debug, Deserialize)]
pub struct OptionalPlayerQuery {
    pub player_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AwardQuery {
    pub awarded: String,
}

/// POST for any collection: store the validated document, answer 201 with it.
pub async fn create_document<T: Document>(
    State(store): State<DocumentStore>,
    Json(document): Json<T>,
) -> ApiResult<(StatusCode, Json<T>)> {
    let created = store.run(move |s| s.insert(&document)).await?;
    info!(collection = %T::COLLECTION, id = created.id(), "document created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /health - store liveness plus per-collection counts
pub async fn health(State(store): State<DocumentStore>) -> ApiResult<Json<Value>> {
    let counts = store
        .run(|s| {
            let mut counts = serde_json::Map::new();
            for collection in Collection::ALL {
                counts.insert(collection.name().to_string(), json!(s.count(collection)?));
            }
            Ok(counts)
        })
        .await?;
    Ok(Json(json!({ "status": "ok", "documents": counts })))
}

/// GET /team?team= - team by name
pub async fn get_team(
    State(store): State<DocumentStore>,
    Query(query): Query<TeamQuery>,
) -> ApiResult<Json<Team>> {
    let filter = Filter::eq("team_name", query.team.as_str());
    store
        .run(move |s| s.find_one(&filter))
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Team {} not found", query.team)))
}

/// GET /teams - every team
pub async fn list_teams(State(store): State<DocumentStore>) -> ApiResult<Json<Vec<Team>>> {
    Ok(Json(store.run(|s| s.find(&Filter::All, None)).await?))
}

/// GET /player_injuries?player_name= - first injury on record for the player
pub async fn get_player_injury(
    State(store): State<DocumentStore>,
    Query(query): Query<OptionalPlayerQuery>,
) -> ApiResult<Json<PlayerInjury>> {
    let player = query.player_name.map(Value::String).unwrap_or(Value::Null);
    let filter = Filter::Eq("player_name".to_string(), player.clone());
    let injury: Option<PlayerInjury> = store.run(move |s| s.find_one(&filter)).await?;

    injury.map(Json).ok_or_else(|| {
        let name = player.as_str().unwrap_or("<unnamed>");
        ApiError::NotFound(format!("Player {} not found", name))
    })
}

/// GET /awards?awarded= - awards given to a team or player
pub async fn list_awards(
    State(store): State<DocumentStore>,
    Query(query): Query<AwardQuery>,
) -> ApiResult<Json<Vec<Award>>> {
    let filter = Filter::eq("recipient_name", query.awarded);
    Ok(Json(store.run(move |s| s.find(&filter, None)).await?))
}

/// GET /matches - finished matches
pub async fn finished_matches(State(store): State<DocumentStore>) -> ApiResult<Json<Vec<Match>>> {
    Ok(Json(
        store
            .run(|s| s.find(&Filter::eq("status", STATUS_FINISHED), None))
            .await?,
    ))
}

/// GET /upcoming_matches - scheduled matches
pub async fn upcoming_matches(State(store): State<DocumentStore>) -> ApiResult<Json<Vec<Match>>> {
    Ok(Json(
        store
            .run(|s| s.find(&Filter::eq("status", STATUS_SCHEDULED), None))
            .await?,
    ))
}

/// GET /matches_score - matches with a recorded score
pub async fn scored_matches(State(store): State<DocumentStore>) -> ApiResult<Json<Vec<Match>>> {
    Ok(Json(store.run(|s| s.find(&Filter::not_null("score"), None)).await?))
}

fn team_filter(team: &str) -> Filter {
    Filter::Or(vec![
        Filter::eq("home_team_name", team),
        Filter::eq("away_team_name", team),
    ])
}

/// GET /matches_team?team_name= - first matches involving a team
pub async fn recent_team_matches(
    State(store): State<DocumentStore>,
    Query(query): Query<TeamNameQuery>,
) -> ApiResult<Json<Vec<Match>>> {
    let filter = team_filter(&query.team_name);
    Ok(Json(
        store
            .run(move |s| s.find(&filter, Some(RECENT_MATCH_LIMIT)))
            .await?,
    ))
}

/// GET /matches_team_all?team_name= - every match involving a team
pub async fn all_team_matches(
    State(store): State<DocumentStore>,
    Query(query): Query<TeamNameQuery>,
) -> ApiResult<Json<Vec<Match>>> {
    let filter = team_filter(&query.team_name);
    Ok(Json(store.run(move |s| s.find(&filter, None)).await?))
}

/// GET /player_transfers?player_name=
pub async fn list_transfers(
    State(store): State<DocumentStore>,
    Query(query): Query<PlayerQuery>,
) -> ApiResult<Json<Vec<PlayerTransfer>>> {
    let filter = Filter::eq("player_name", query.player_name);
    Ok(Json(store.run(move |s| s.find(&filter, None)).await?))
}

/// GET /player_values?player_name= - value history with avg/max/min
pub async fn player_values(
    State(store): State<DocumentStore>,
    Query(query): Query<PlayerQuery>,
) -> ApiResult<Json<Vec<PlayerValueSummary>>> {
    // A non-numeric history entry is bad stored data, not a bad request
    let player = query.player_name.clone();
    let summaries = store
        .run(move |s| s.player_value_stats(&player))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    if summaries.is_empty() {
        return Err(ApiError::NotFound(format!(
            "Player {} not found",
            query.player_name
        )));
    }
    Ok(Json(summaries))
}

/// DELETE /all - empty every collection
pub async fn delete_all(State(store): State<DocumentStore>) -> ApiResult<Json<Value>> {
    let deleted = store.run(|s| s.delete_everything()).await?;
    Ok(Json(json!({ "deleted": deleted })))
}
