//! Wide-column store tests against the bundled demo fixture

use std::path::PathBuf;

use football_stats::{
    cli::WideCmd,
    commands::wide::handle_wide,
    wide::{WideColumnStore, WideFixture, WideTable},
};

fn demo_fixture() -> WideFixture {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/wide.json");
    let raw = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn loaded_store() -> WideColumnStore {
    let mut store = WideColumnStore::open_in_memory().unwrap();
    store.load_fixture(&demo_fixture()).unwrap();
    store
}

#[test]
fn test_demo_fixture_fills_every_table() {
    let store = loaded_store();
    for table in WideTable::ALL {
        assert!(
            store.row_count(table).unwrap() > 0,
            "{} is empty",
            table.name()
        );
    }
}

#[test]
fn test_demo_queries() {
    let store = loaded_store();

    let stadiums = store.stadiums_by_capacity("Mexico", 60000).unwrap();
    assert_eq!(stadiums.len(), 1);
    assert_eq!(stadiums[0].name, "Estadio Azteca");

    let compared = store.compare_teams("Cruz Azul", "Barcelona").unwrap();
    let names: Vec<_> = compared.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Barcelona", "Cruz Azul"]);

    let messi = store.player_history("Lionel Messi").unwrap().unwrap();
    assert_eq!(messi.jersey_num, vec![10, 30]);
    assert!(store.player_history("lionel messi").unwrap().is_none());

    let roster = store.players_by_team("Atlas").unwrap().unwrap();
    assert_eq!(roster.players.len(), 3);
}

#[test]
fn test_on_disk_store_via_command() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("nested/wide.db");
    {
        let mut store = WideColumnStore::open(&path).unwrap();
        store.load_fixture(&demo_fixture()).unwrap();
    }

    let mut reopened = WideColumnStore::open(&path).unwrap();
    let out = handle_wide(
        &mut reopened,
        &WideCmd::Budgets {
            country: "Mexico".to_string(),
            min_budget: 0,
        },
        false,
    )
    .unwrap();
    assert_eq!(
        out,
        "Cruz Azul - allocated 2000000, spent 1500000, remaining 500000 (manager Martin Anselmi)"
    );
}
