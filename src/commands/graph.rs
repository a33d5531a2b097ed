//! Graph store commands

use tracing::info;

use super::common::{read_json_file, render, render_list, render_option};
use crate::{
    cli::GraphCmd,
    graph::{
        GraphFixture, GraphStore, NewCountry, NewLeague, NewPlayer, NewStats, PlayerMatch,
        PlayerWithStats, StatLine, TopScorer, Uid,
    },
    Result,
};

fn stat_text(s: &StatLine) -> String {
    format!(
        "matches {}, assists {}, goals {}",
        s.matches, s.assists, s.goals
    )
}

fn player_block(p: &PlayerWithStats) -> String {
    let header = format!("{} [{}] age {}", p.name, p.uid, p.age);
    match p.first_stats() {
        Some(stats) => format!("{}\n  {}", header, stat_text(stats)),
        None => format!("{}\n  No stats found.", header),
    }
}

fn player_all_stats(p: &PlayerWithStats) -> String {
    let mut lines = vec![format!("{} [{}] age {}", p.name, p.uid, p.age)];
    if p.stats.is_empty() {
        lines.push("  No stats found.".to_string());
    }
    for s in &p.stats {
        lines.push(format!("  stats {}: {}", s.stats_id, stat_text(s)));
    }
    lines.join("\n")
}

fn search_line(p: &PlayerMatch) -> String {
    format!("{} [{}]", p.name, p.uid)
}

fn scorer_line(s: &TopScorer) -> String {
    format!(
        "{} - {} goals (stats {})",
        s.player.as_deref().unwrap_or("<unattached>"),
        s.goals,
        s.stats_id
    )
}

fn created(kind: &str, uid: Uid, as_json: bool) -> Result<String> {
    render(&serde_json::json!({ "uid": uid }), as_json, |_| {
        format!("✓ {} created with uid {}", kind, uid)
    })
}

/// Run one graph command and return its rendered output.
pub fn handle_graph(store: &mut GraphStore, cmd: &GraphCmd, as_json: bool) -> Result<String> {
    match cmd {
        GraphCmd::Schema => {
            store.apply_schema()?;
            render(&serde_json::json!({ "schema": "applied" }), as_json, |_| {
                "✓ Graph schema applied".to_string()
            })
        }
        GraphCmd::Load { file } => {
            let fixture: GraphFixture = read_json_file(file)?;
            let labels = store.load_fixture(&fixture)?;
            info!(nodes = labels.len(), file = %file.display(), "graph fixture loaded");
            render(&labels, as_json, |labels| {
                let mut names: Vec<_> = labels.iter().collect();
                names.sort_by_key(|(_, uid)| **uid);
                let mut lines = vec![format!(
                    "✓ Loaded {} nodes from {}",
                    fixture.node_count(),
                    file.display()
                )];
                lines.extend(names.into_iter().map(|(label, uid)| format!("  {} = {}", label, uid)));
                lines.join("\n")
            })
        }
        GraphCmd::AddCountry { country_id, name } => {
            let uid = store.add_country(&NewCountry {
                country_id: country_id.clone(),
                name: name.clone(),
            })?;
            created("Country", uid, as_json)
        }
        GraphCmd::AddLeague { league_id, name } => {
            let uid = store.add_league(&NewLeague {
                league_id: league_id.clone(),
                name: name.clone(),
            })?;
            created("League", uid, as_json)
        }
        GraphCmd::AddPlayer {
            name,
            age,
            country,
            leagues,
        } => {
            let uid = store.add_player(&NewPlayer {
                name: name.clone(),
                age: *age,
                country: *country,
                leagues: leagues.clone(),
            })?;
            created("Player", uid, as_json)
        }
        GraphCmd::AddStats {
            player,
            stats_id,
            matches,
            assists,
            goals,
        } => {
            let uid = store.add_stats(&NewStats {
                player: *player,
                stats_id: stats_id.clone(),
                matches: *matches,
                assists: *assists,
                goals: *goals,
            })?;
            created("PlayerStats", uid, as_json)
        }
        GraphCmd::Performance { name } => render_option(
            &store.player_performance(name)?,
            as_json,
            &format!("No data found for player: {}", name),
            player_block,
        ),
        GraphCmd::League { name } => render_list(
            &store.stats_by_league(name)?,
            as_json,
            &format!("No players found for league: {}", name),
            player_block,
        ),
        GraphCmd::Country { name } => render_list(
            &store.stats_by_country(name)?,
            as_json,
            &format!("No players found from {}.", name),
            player_block,
        ),
        GraphCmd::Age { min_age } => render_list(
            &store.stats_by_age(*min_age)?,
            as_json,
            &format!("No players aged {} or older.", min_age),
            player_block,
        ),
        GraphCmd::Stats { name } => render_option(
            &store.basic_player_stats(name)?,
            as_json,
            &format!("No data found for player: {}", name),
            player_all_stats,
        ),
        GraphCmd::Search { term } => render_list(
            &store.search_players(term)?,
            as_json,
            "No players found.",
            search_line,
        ),
        GraphCmd::Compare { first, second } => render_list(
            &store.compare_players(*first, *second)?,
            as_json,
            "Neither uid is a player.",
            player_block,
        ),
        GraphCmd::TopScorers => render_list(
            &store.top_scorers()?,
            as_json,
            "No top scorers found.",
            scorer_line,
        ),
    }
}
