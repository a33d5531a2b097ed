//! Router and client tests

use super::*;
use crate::documents::{Collection, STATUS_FINISHED, STATUS_SCHEDULED};
use crate::error::StatsError;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn create_test_store() -> DocumentStore {
    let store = DocumentStore::open_in_memory().unwrap();
    store.create_indexes().unwrap();
    store
}

async fn send(store: &DocumentStore, request: Request<Body>) -> (StatusCode, Value) {
    let response = router(store.clone(), 5).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn get(store: &DocumentStore, uri: &str) -> (StatusCode, Value) {
    send(store, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post(store: &DocumentStore, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(store, request).await
}

fn match_body(home: &str, away: &str, status: &str, score: Value) -> Value {
    json!({
        "home_team_name": home,
        "away_team_name": away,
        "date": "2024-11-22T18:00:00",
        "status": status,
        "score": score,
        "officials": ["Referee"]
    })
}

#[tokio::test]
async fn test_health_reports_counts() {
    let store = create_test_store();
    post(
        &store,
        "/team",
        json!({"team_name": "Atlas", "email": "a@x.mx", "password": "p", "owner": "Atlas FC"}),
    )
    .await;

    let (status, body) = get(&store, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["documents"]["teams"], 1);
    assert_eq!(body["documents"]["matches"], 0);
}

#[tokio::test]
async fn test_create_and_get_team() {
    let store = create_test_store();
    let (status, created) = post(
        &store,
        "/team",
        json!({"team_name": "Chivas", "email": "c@x.mx", "password": "pw", "owner": "Chivas"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["_id"].as_str().is_some());

    let (status, team) = get(&store, "/team?team=Chivas").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(team["owner"], "Chivas");
    assert_eq!(team["_id"], created["_id"]);

    let (status, body) = get(&store, "/team?team=Pumas").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Team Pumas not found");

    let (status, teams) = get(&store, "/teams").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(teams.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_rejects_invalid_body() {
    let store = create_test_store();
    let (status, _) = post(&store, "/team", json!({"team_name": "No email"})).await;
    assert!(status.is_client_error());
    assert_eq!(store.count(Collection::Teams).unwrap(), 0);
}

#[tokio::test]
async fn test_duplicate_id_is_conflict() {
    let store = create_test_store();
    let body = json!({"_id": "t1", "team_name": "A", "email": "", "password": "", "owner": ""});
    let (status, _) = post(&store, "/team", body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post(&store, "/team", body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], 409);
}

#[tokio::test]
async fn test_missing_query_parameter_is_bad_request() {
    let store = create_test_store();
    let (status, _) = get(&store, "/team").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_player_injury_lookup() {
    let store = create_test_store();
    let (status, _) = post(
        &store,
        "/player_injuries",
        json!({
            "player_name": "Alvarado",
            "team_name": "Chivas",
            "injury_type": "Hamstring",
            "start_date": "2024-01-10",
            "end_date": "2024-02-10",
            "medical_notes": "Rest",
            "status": "Recovering"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, injury) = get(&store, "/player_injuries?player_name=Alvarado").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(injury["injury_type"], "Hamstring");
    assert_eq!(injury["start_date"], "2024-01-10T00:00:00");

    let (status, body) = get(&store, "/player_injuries?player_name=Nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Player Nobody not found");

    // No name looks for injuries recorded without a player
    let (status, _) = get(&store, "/player_injuries").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_awards_by_recipient() {
    let store = create_test_store();
    for (name, award) in [("Atlas", "Champion"), ("Atlas", "Fair Play"), ("Toluca", "Champion")] {
        let (status, _) = post(
            &store,
            "/awards",
            json!({
                "recipient_type": "team",
                "recipient_name": name,
                "award_name": award,
                "season": "2023",
                "category": "League",
                "date_awarded": "2023-12-17"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, awards) = get(&store, "/awards?awarded=Atlas").await;
    assert_eq!(awards.as_array().unwrap().len(), 2);

    let (status, awards) = get(&store, "/awards?awarded=Pumas").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(awards, json!([]));
}

#[tokio::test]
async fn test_match_status_and_score_routes() {
    let store = create_test_store();
    post(&store, "/matches", match_body("A", "B", STATUS_FINISHED, json!("2-1"))).await;
    post(&store, "/matches", match_body("C", "D", STATUS_SCHEDULED, Value::Null)).await;
    post(&store, "/matches", match_body("E", "F", "Postponed", json!({"home": 0, "away": 0}))).await;

    let (_, finished) = get(&store, "/matches").await;
    assert_eq!(finished.as_array().unwrap().len(), 1);
    assert_eq!(finished[0]["home_team_name"], "A");

    let (_, upcoming) = get(&store, "/upcoming_matches").await;
    assert_eq!(upcoming.as_array().unwrap().len(), 1);
    assert_eq!(upcoming[0]["home_team_name"], "C");

    let (_, scored) = get(&store, "/matches_score").await;
    let homes: Vec<_> = scored
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["home_team_name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(homes, vec!["A", "E"]);
}

#[tokio::test]
async fn test_team_matches_recent_limit_and_all() {
    let store = create_test_store();
    for i in 0..7 {
        let body = if i % 2 == 0 {
            match_body("Atlas", &format!("Rival {}", i), STATUS_FINISHED, json!("1-0"))
        } else {
            match_body(&format!("Rival {}", i), "Atlas", STATUS_SCHEDULED, Value::Null)
        };
        post(&store, "/matches", body).await;
    }
    post(&store, "/matches", match_body("Pumas", "Toluca", STATUS_FINISHED, json!("0-0"))).await;

    let (_, recent) = get(&store, "/matches_team?team_name=Atlas").await;
    let recent = recent.as_array().unwrap();
    assert_eq!(recent.len(), routes::RECENT_MATCH_LIMIT);
    assert_eq!(recent[0]["away_team_name"], "Rival 0");

    let (_, all) = get(&store, "/matches_team_all?team_name=Atlas").await;
    assert_eq!(all.as_array().unwrap().len(), 7);

    let (_, none) = get(&store, "/matches_team_all?team_name=Necaxa").await;
    assert_eq!(none, json!([]));
}

#[tokio::test]
async fn test_transfers_by_player() {
    let store = create_test_store();
    let (status, _) = post(
        &store,
        "/player_transfers",
        json!({
            "team_name": "America",
            "player_name": "Henry Martin",
            "from_team_name": "Tijuana",
            "transfer_date": "2018-06-01",
            "fee": 4500000.0,
            "contract_length": 4
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, transfers) = get(&store, "/player_transfers?player_name=Henry%20Martin").await;
    assert_eq!(transfers.as_array().unwrap().len(), 1);
    assert_eq!(transfers[0]["fee"], 4500000.0);
}

#[tokio::test]
async fn test_player_values_aggregation() {
    let store = create_test_store();
    post(
        &store,
        "/player_values",
        json!({"player_name": "Lozano", "value_history": [1000000, "2000000", 3000000]}),
    )
    .await;

    let (status, body) = get(&store, "/player_values?player_name=Lozano").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["avgValue"], 2000000.0);
    assert_eq!(body[0]["maxValue"], 3000000.0);
    assert_eq!(body[0]["minValue"], 1000000.0);

    let (status, body) = get(&store, "/player_values?player_name=Nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Player Nobody not found");
}

#[tokio::test]
async fn test_player_values_rejects_non_numeric_history() {
    let store = create_test_store();
    let (status, _) = post(
        &store,
        "/player_values",
        json!({"player_name": "Vega", "value_history": ["1000000", "abc"]}),
    )
    .await;
    assert!(status.is_client_error());
    assert_eq!(store.count(Collection::PlayerValues).unwrap(), 0);

    let (status, _) = get(&store, "/player_values?player_name=Vega").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_player_values_corrupt_stored_history_is_server_error() {
    let store = create_test_store();
    store
        .insert_value(
            Collection::PlayerValues,
            json!({"_id": "v1", "player_name": "Broken", "value_history": ["unknown"]}),
        )
        .unwrap();

    let (status, _) = get(&store, "/player_values?player_name=Broken").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_delete_all() {
    let store = create_test_store();
    post(&store, "/matches", match_body("A", "B", STATUS_FINISHED, json!("1-1"))).await;
    post(
        &store,
        "/team",
        json!({"team_name": "A", "email": "", "password": "", "owner": ""}),
    )
    .await;

    let request = Request::builder()
        .method("DELETE")
        .uri("/all")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&store, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 2);
    assert_eq!(store.count(Collection::Matches).unwrap(), 0);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let store = create_test_store();
    let (status, _) = get(&store, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn spawn_server(store: DocumentStore) -> (ApiClient, tokio::sync::oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    tokio::spawn(async move {
        let _ = serve_on(listener, store, 5, async {
            let _ = rx.await;
        })
        .await;
    });
    let client = ApiClient::new(format!("http://{}", addr), Duration::from_secs(5)).unwrap();
    (client, tx)
}

#[tokio::test]
async fn test_client_round_trip_against_server() {
    let store = create_test_store();
    let (client, shutdown) = spawn_server(store.clone()).await;

    let team = crate::documents::Team {
        id: "team-1".to_string(),
        team_name: "Monterrey".to_string(),
        email: "m@x.mx".to_string(),
        password: "pw".to_string(),
        owner: "FEMSA".to_string(),
    };
    let created = client.create(&team).await.unwrap();
    assert_eq!(created, team);

    assert_eq!(client.team("Monterrey").await.unwrap(), team);
    assert_eq!(client.teams().await.unwrap().len(), 1);

    match client.team("Tigres").await {
        Err(StatsError::Api { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Team Tigres not found");
        }
        other => panic!("Expected Api error, got {:?}", other),
    }

    let health = client.health().await.unwrap();
    assert_eq!(health["documents"]["teams"], 1);

    assert_eq!(client.delete_all().await.unwrap(), 1);
    assert!(client.teams().await.unwrap().is_empty());

    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_client_matches_and_values() {
    let store = create_test_store();
    let (client, shutdown) = spawn_server(store).await;

    client
        .create_value(
            Collection::Matches,
            &match_body("Leon", "Santos", STATUS_FINISHED, json!("3-2")),
        )
        .await
        .unwrap();
    client
        .create_value(
            Collection::Matches,
            &match_body("Santos", "Leon", STATUS_SCHEDULED, Value::Null),
        )
        .await
        .unwrap();
    client
        .create_value(
            Collection::PlayerValues,
            &json!({"player_name": "Gimenez", "value_history": [10.0, 20.0]}),
        )
        .await
        .unwrap();

    assert_eq!(client.finished_matches().await.unwrap().len(), 1);
    assert_eq!(client.upcoming_matches().await.unwrap().len(), 1);
    assert_eq!(client.scored_matches().await.unwrap().len(), 1);
    assert_eq!(client.recent_matches("Leon").await.unwrap().len(), 2);
    assert_eq!(client.all_matches("Santos").await.unwrap().len(), 2);
    assert!(client.transfers("Gimenez").await.unwrap().is_empty());

    let values = client.player_values("Gimenez").await.unwrap();
    assert_eq!(values[0].avg_value, Some(15.0));

    // Model validation still applies to untyped creates
    let rejected = client
        .create_value(Collection::Teams, &json!({"team_name": "Incomplete"}))
        .await;
    assert!(matches!(rejected, Err(StatsError::Api { status, .. }) if (400..500).contains(&status)));

    let _ = shutdown.send(());
}
