//! Unit tests for the graph store

use super::*;
use crate::error::StatsError;

fn create_test_store() -> GraphStore {
    GraphStore::open_in_memory().unwrap()
}

fn sample_fixture() -> GraphFixture {
    serde_json::from_value(serde_json::json!({
        "countries": [
            {"label": "_:France", "country_id": "1", "name": "France"},
            {"label": "_:Uruguay", "country_id": "2", "name": "Uruguay"},
            {"label": "_:Mexico", "country_id": "3", "name": "Mexico"},
            {"label": "Spain", "country_id": "4", "name": "España"}
        ],
        "leagues": [
            {"label": "_:ligaMX", "league_id": "1", "name": "ligaMX"}
        ],
        "players": [
            {"label": "_:gignac", "name": "Andre Gignac", "age": 37,
             "country": "_:France", "leagues": ["_:ligaMX"]},
            {"label": "_:gorriaran", "name": "Fernando Gorriaran", "age": 29,
             "country": "_:Uruguay", "leagues": ["_:ligaMX"]},
            {"label": "_:mozo", "name": "Alan Mozo", "age": 28,
             "country": "_:Mexico", "leagues": ["_:ligaMX"]},
            {"label": "_:fidalgo", "name": "Alvaro Fidalgo", "age": 30,
             "country": "_:Spain", "leagues": ["ligaMX"]},
            {"label": "_:free_agent", "name": "Nobody Signed", "age": 19}
        ],
        "stats": [
            {"label": "_:stats1", "player": "_:gignac", "stats_id": "1",
             "matches": 100, "assists": 50, "goals": 80},
            {"player": "_:gorriaran", "stats_id": "2",
             "matches": 150, "assists": 40, "goals": 120},
            {"player": "_:mozo", "stats_id": "3",
             "matches": 120, "assists": 30, "goals": 14},
            {"player": "_:fidalgo", "stats_id": "4",
             "matches": 200, "assists": 40, "goals": 50},
            {"player": "_:gignac", "stats_id": "1b",
             "matches": 20, "assists": 5, "goals": 9}
        ]
    }))
    .unwrap()
}

fn loaded_store() -> (GraphStore, std::collections::HashMap<String, Uid>) {
    let mut store = create_test_store();
    let labels = store.load_fixture(&sample_fixture()).unwrap();
    (store, labels)
}

#[test]
fn test_uid_display_and_parse() {
    assert_eq!(Uid(26).to_string(), "0x1a");
    assert_eq!("0x1a".parse::<Uid>().unwrap(), Uid(26));
    assert_eq!("26".parse::<Uid>().unwrap(), Uid(26));
    assert_eq!(" 0X1A ".parse::<Uid>().unwrap(), Uid(26));
    assert!("0x".parse::<Uid>().is_err());
    assert!("zz".parse::<Uid>().is_err());
    assert!("0".parse::<Uid>().is_err());

    let json = serde_json::to_value(Uid(1)).unwrap();
    assert_eq!(json, serde_json::json!("0x1"));
    let back: Uid = serde_json::from_value(json).unwrap();
    assert_eq!(back, Uid(1));
}

#[test]
fn test_resolve_edge_names() {
    assert_eq!(
        resolve_edge("includes"),
        Some((Predicate::PlaysIn, Direction::Reverse))
    );
    assert_eq!(
        resolve_edge("has_stats"),
        Some((Predicate::HasStats, Direction::Forward))
    );
    assert_eq!(
        resolve_edge("originates"),
        Some((Predicate::Country, Direction::Reverse))
    );
    assert!(resolve_edge("friends_with").is_none());
}

#[test]
fn test_load_fixture_counts_and_labels() {
    let (store, labels) = loaded_store();
    assert_eq!(store.count(NodeType::Country).unwrap(), 4);
    assert_eq!(store.count(NodeType::League).unwrap(), 1);
    assert_eq!(store.count(NodeType::Player).unwrap(), 5);
    assert_eq!(store.count(NodeType::PlayerStats).unwrap(), 5);
    // 4 country + 4 plays_in + 5 has_stats
    assert_eq!(store.edge_count().unwrap(), 13);

    assert!(labels.contains_key("France"));
    assert!(labels.contains_key("Spain"));
    assert!(labels.contains_key("stats1"));
    assert_eq!(
        store.node_type(labels["gignac"]).unwrap(),
        Some(NodeType::Player)
    );
}

#[test]
fn test_load_fixture_unknown_label_writes_nothing() {
    let mut store = create_test_store();
    let mut fixture = sample_fixture();
    fixture.players[0].country = Some("_:Atlantis".to_string());

    match store.load_fixture(&fixture) {
        Err(StatsError::InvalidInput { field, message }) => {
            assert_eq!(field, "label");
            assert!(message.contains("Atlantis"));
        }
        other => panic!("Expected InvalidInput, got {:?}", other),
    }
    assert_eq!(store.count(NodeType::Country).unwrap(), 0);
}

#[test]
fn test_load_fixture_duplicate_label_rejected() {
    let mut store = create_test_store();
    let mut fixture = sample_fixture();
    fixture.countries[1].label = "France".to_string();
    assert!(store.load_fixture(&fixture).is_err());
    assert_eq!(store.count(NodeType::Country).unwrap(), 0);
}

#[test]
fn test_traverse_both_directions() {
    let (store, labels) = loaded_store();
    let liga = labels["ligaMX"];
    let gignac = labels["gignac"];

    assert_eq!(store.traverse(gignac, "plays_in").unwrap(), vec![liga]);
    assert_eq!(store.traverse(liga, "includes").unwrap().len(), 4);
    assert_eq!(
        store.traverse(labels["France"], "originates").unwrap(),
        vec![gignac]
    );

    let stats = store.traverse(gignac, "has_stats").unwrap();
    assert_eq!(stats.len(), 2);
    assert_eq!(store.traverse(stats[0], "belongs_to").unwrap(), vec![gignac]);

    assert!(matches!(
        store.traverse(gignac, "likes"),
        Err(StatsError::InvalidInput { .. })
    ));
}

#[test]
fn test_player_lookup() {
    let (store, labels) = loaded_store();
    let player = store.player(labels["fidalgo"]).unwrap().unwrap();
    assert_eq!(player.name, "Alvaro Fidalgo");
    assert_eq!(player.country, Some(labels["Spain"]));
    assert_eq!(player.leagues, vec![labels["ligaMX"]]);

    let free = store.player(labels["free_agent"]).unwrap().unwrap();
    assert!(free.country.is_none());
    assert!(free.leagues.is_empty());

    // A country uid is not a player
    assert!(store.player(labels["France"]).unwrap().is_none());
}

#[test]
fn test_player_performance_first_stats_only() {
    let (store, _) = loaded_store();
    let gignac = store.player_performance("Andre Gignac").unwrap().unwrap();
    assert_eq!(gignac.stats.len(), 1);
    assert_eq!(gignac.first_stats().unwrap().goals, 80);

    assert!(store.player_performance("andre gignac").unwrap().is_none());
    assert!(store.player_performance("Unknown").unwrap().is_none());
}

#[test]
fn test_basic_player_stats_all_records() {
    let (store, _) = loaded_store();
    let gignac = store.basic_player_stats("Andre Gignac").unwrap().unwrap();
    let ids: Vec<_> = gignac.stats.iter().map(|s| s.stats_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "1b"]);

    let free = store.basic_player_stats("Nobody Signed").unwrap().unwrap();
    assert!(free.stats.is_empty());
}

#[test]
fn test_stats_by_league() {
    let (store, _) = loaded_store();
    let players = store.stats_by_league("ligaMX").unwrap();
    let names: Vec<_> = players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Andre Gignac", "Fernando Gorriaran", "Alan Mozo", "Alvaro Fidalgo"]
    );
    assert_eq!(players[1].first_stats().unwrap().goals, 120);

    assert!(store.stats_by_league("Premier League").unwrap().is_empty());
}

#[test]
fn test_stats_by_league_spans_leagues_sharing_a_name() {
    let mut store = create_test_store();
    let first = store
        .add_league(&NewLeague {
            league_id: "10".to_string(),
            name: "Serie A".to_string(),
        })
        .unwrap();
    let second = store
        .add_league(&NewLeague {
            league_id: "20".to_string(),
            name: "Serie A".to_string(),
        })
        .unwrap();

    let mut add = |name: &str, leagues: Vec<Uid>| {
        store
            .add_player(&NewPlayer {
                name: name.to_string(),
                age: 25,
                country: None,
                leagues,
            })
            .unwrap()
    };
    add("Italian Striker", vec![first]);
    add("Brazilian Winger", vec![second]);
    add("Two Club Keeper", vec![first, second]);

    let players = store.stats_by_league("Serie A").unwrap();
    let mut names: Vec<_> = players.iter().map(|p| p.name.as_str()).collect();
    names.sort();
    assert_eq!(
        names,
        vec!["Brazilian Winger", "Italian Striker", "Two Club Keeper"]
    );
}

#[test]
fn test_stats_by_country() {
    let (store, _) = loaded_store();
    let players = store.stats_by_country("España").unwrap();
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].name, "Alvaro Fidalgo");

    assert!(store.stats_by_country("Chile").unwrap().is_empty());
}

#[test]
fn test_stats_by_age_inclusive() {
    let (store, _) = loaded_store();
    let players = store.stats_by_age(29).unwrap();
    let names: Vec<_> = players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Andre Gignac", "Fernando Gorriaran", "Alvaro Fidalgo"]
    );
    assert!(store.stats_by_age(40).unwrap().is_empty());
}

#[test]
fn test_search_players_case_insensitive_literal() {
    let (store, _) = loaded_store();
    let hits = store.search_players("AL").unwrap();
    let names: Vec<_> = hits.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Alan Mozo", "Alvaro Fidalgo"]);

    // Regex metacharacters are plain text
    assert!(store.search_players(".*").unwrap().is_empty());
    assert_eq!(store.search_players("").unwrap().len(), 5);
}

#[test]
fn test_search_players_capped() {
    let mut store = create_test_store();
    for i in 0..15 {
        store
            .add_player(&NewPlayer {
                name: format!("Player {}", i),
                age: 20,
                country: None,
                leagues: vec![],
            })
            .unwrap();
    }
    let hits = store.search_players("player").unwrap();
    assert_eq!(hits.len(), QUERY_LIMIT);
    assert_eq!(hits[0].name, "Player 0");
}

#[test]
fn test_compare_players() {
    let (store, labels) = loaded_store();
    let both = store
        .compare_players(labels["mozo"], labels["gignac"])
        .unwrap();
    let names: Vec<_> = both.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Andre Gignac", "Alan Mozo"]);

    let one = store.compare_players(labels["mozo"], Uid(9999)).unwrap();
    assert_eq!(one.len(), 1);

    let same = store
        .compare_players(labels["mozo"], labels["mozo"])
        .unwrap();
    assert_eq!(same.len(), 1);

    // Non-player nodes are skipped
    assert!(store
        .compare_players(labels["France"], labels["ligaMX"])
        .unwrap()
        .is_empty());
}

#[test]
fn test_top_scorers() {
    let (mut store, _) = loaded_store();
    let orphan = store.conn.execute(
        "INSERT INTO nodes (node_type) VALUES ('PlayerStats')",
        [],
    );
    assert!(orphan.is_ok());
    let uid = store.conn.last_insert_rowid();
    store
        .conn
        .execute(
            "INSERT INTO player_stats VALUES (?, 'x', 1, 1, 1000)",
            [uid],
        )
        .unwrap();

    let scorers = store.top_scorers().unwrap();
    assert_eq!(scorers.len(), 6);
    assert_eq!(scorers[0].goals, 1000);
    assert!(scorers[0].player.is_none());
    assert_eq!(scorers[1].goals, 120);
    assert_eq!(scorers[1].player.as_deref(), Some("Fernando Gorriaran"));
    let goals: Vec<_> = scorers.iter().map(|s| s.goals).collect();
    assert_eq!(goals, vec![1000, 120, 80, 50, 14, 9]);

    store.apply_schema().unwrap();
    assert!(store.top_scorers().unwrap().is_empty());
}

#[test]
fn test_add_mutations_validate_references() {
    let mut store = create_test_store();
    let mexico = store
        .add_country(&NewCountry {
            country_id: "3".to_string(),
            name: "Mexico".to_string(),
        })
        .unwrap();
    let liga = store
        .add_league(&NewLeague {
            league_id: "1".to_string(),
            name: "ligaMX".to_string(),
        })
        .unwrap();

    // Country uid in the leagues slot
    let wrong = store.add_player(&NewPlayer {
        name: "Henry Martin".to_string(),
        age: 31,
        country: Some(mexico),
        leagues: vec![mexico],
    });
    match wrong {
        Err(StatsError::InvalidInput { field, .. }) => assert_eq!(field, "plays_in"),
        other => panic!("Expected InvalidInput, got {:?}", other),
    }
    assert_eq!(store.count(NodeType::Player).unwrap(), 0);

    let missing = store.add_player(&NewPlayer {
        name: "Henry Martin".to_string(),
        age: 31,
        country: Some(Uid(404)),
        leagues: vec![],
    });
    assert!(matches!(missing, Err(StatsError::NotFound { .. })));

    let player = store
        .add_player(&NewPlayer {
            name: "Henry Martin".to_string(),
            age: 31,
            country: Some(mexico),
            leagues: vec![liga],
        })
        .unwrap();
    let stats = store
        .add_stats(&NewStats {
            player,
            stats_id: "9".to_string(),
            matches: 10,
            assists: 2,
            goals: 7,
        })
        .unwrap();

    assert_eq!(store.stats_node(stats).unwrap().unwrap().goals, 7);
    assert_eq!(store.traverse(stats, "belongs_to").unwrap(), vec![player]);

    let bad_stats = store.add_stats(&NewStats {
        player: liga,
        stats_id: "10".to_string(),
        matches: 0,
        assists: 0,
        goals: 0,
    });
    assert!(bad_stats.is_err());

    let negative = store.add_player(&NewPlayer {
        name: "Kid".to_string(),
        age: -1,
        country: None,
        leagues: vec![],
    });
    assert!(negative.is_err());
}

#[test]
fn test_apply_schema_clears_everything() {
    let (mut store, _) = loaded_store();
    store.apply_schema().unwrap();
    for node_type in NodeType::ALL {
        assert_eq!(store.count(node_type).unwrap(), 0);
    }
    assert_eq!(store.edge_count().unwrap(), 0);
    assert!(store.countries().unwrap().is_empty());
}

#[test]
fn test_graph_survives_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("graph.db");
    {
        let mut store = GraphStore::open(&path).unwrap();
        store.load_fixture(&sample_fixture()).unwrap();
    }
    let reopened = GraphStore::open(&path).unwrap();
    assert_eq!(reopened.leagues().unwrap().len(), 1);
    assert_eq!(reopened.stats_by_league("ligaMX").unwrap().len(), 4);
}
