//! End-to-end tests: REST service on a local port, driven through the
//! console's document commands.

use std::path::PathBuf;
use std::time::Duration;

use football_stats::{
    api::{serve_on, ApiClient},
    cli::DocsCmd,
    commands::documents::handle_docs,
    documents::{Collection, DocumentStore},
    StatsError,
};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

async fn start() -> (ApiClient, oneshot::Sender<()>) {
    let store = DocumentStore::open_in_memory().unwrap();
    store.create_indexes().unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();
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
async fn test_import_and_query_matches() {
    let (client, shutdown) = start().await;
    let file = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/matches.json");

    let out = handle_docs(
        &client,
        &DocsCmd::Import {
            collection: Collection::Matches,
            file,
        },
        false,
    )
    .await
    .unwrap();
    assert_eq!(out, "✓ Imported 2 documents into matches");

    let finished = handle_docs(&client, &DocsCmd::Finished, false).await.unwrap();
    assert_eq!(
        finished,
        "Chivas vs Atlas - 2024-11-22T19:00:00 [Finished] score 2-1"
    );

    let upcoming = handle_docs(&client, &DocsCmd::Upcoming, true).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&upcoming).unwrap();
    assert_eq!(parsed[0]["date"], "2024-12-01T00:00:00");

    let chivas = handle_docs(
        &client,
        &DocsCmd::AllMatches {
            team: "Chivas".to_string(),
        },
        true,
    )
    .await
    .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&chivas).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 2);

    let deleted = handle_docs(&client, &DocsCmd::DeleteAll, false).await.unwrap();
    assert_eq!(deleted, "✓ Deleted 2 documents");

    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_not_found_surfaces_service_detail() {
    let (client, shutdown) = start().await;

    let err = handle_docs(
        &client,
        &DocsCmd::Values {
            player: "Nobody".to_string(),
        },
        false,
    )
    .await
    .unwrap_err();
    match err {
        StatsError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Player Nobody not found");
        }
        other => panic!("Expected Api error, got {:?}", other),
    }

    let _ = shutdown.send(());
}
