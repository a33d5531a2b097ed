//! Wide-column store commands

use chrono::NaiveDateTime;
use tracing::info;

use super::common::{or_dash, read_json_file, render, render_list, render_option};
use crate::{
    cli::WideCmd,
    core::format_timestamp,
    wide::{
        JerseyHistory, LeagueStanding, LiveMatch, PlayerHistory, Stadium, TeamBudget,
        TeamComparison, TeamRanking, TeamRecord, TeamRoster, WideColumnStore, WideFixture,
    },
    Result,
};

fn when(ts: &Option<NaiveDateTime>) -> String {
    or_dash(ts.as_ref().map(format_timestamp))
}

fn team_line(t: &TeamRecord) -> String {
    format!(
        "{} ({}) - manager {}, W{} L{} G{}, ranking {}, last {}, next {}",
        t.name,
        t.country,
        t.manager,
        t.total_wins,
        t.total_losses,
        t.total_goals,
        t.ranking,
        when(&t.last_match),
        when(&t.next_match)
    )
}

fn live_line(m: &LiveMatch) -> String {
    format!(
        "#{} {} {} - {} {} [{}] {}",
        m.match_id,
        m.home_team,
        m.home_score,
        m.away_score,
        m.away_team,
        m.match_type,
        when(&m.date)
    )
}

fn player_text(p: &PlayerHistory) -> String {
    let per_90 = or_dash(p.contributions_per_90().map(|v| format!("{:.2}", v)));
    format!(
        "{} ({}, {})\n  goals {}, assists {}, minutes {}, per 90 {}\n  birthday {}, jerseys {:?}",
        p.name,
        p.position,
        p.nationality,
        p.goals,
        p.assists,
        p.minutes_played,
        per_90,
        or_dash(p.birthday),
        p.jersey_num
    )
}

fn stadium_line(s: &Stadium) -> String {
    let occupancy = or_dash(s.occupancy_pct().map(|v| format!("{:.1}%", v)));
    format!(
        "{} ({}) - capacity {}, average {}, occupancy {}, next {}",
        s.name,
        s.country,
        s.capacity,
        s.average_assistance,
        occupancy,
        when(&s.next_match)
    )
}

fn roster_text(r: &TeamRoster) -> String {
    format!(
        "{} ({}, {}) - manager {}\n  {}",
        r.name,
        r.country,
        r.gender,
        r.manager,
        r.players.join(", ")
    )
}

fn ranking_line(r: &TeamRanking) -> String {
    format!(
        "#{} {} ({}) - W{} L{} G{}",
        r.ranking, r.name, r.gender, r.total_wins, r.total_losses, r.total_goals
    )
}

fn budget_line(b: &TeamBudget) -> String {
    format!(
        "{} - allocated {}, spent {}, remaining {} (manager {})",
        b.name,
        b.budget_allocated,
        b.budget_spent,
        b.budget_remaining(),
        b.manager
    )
}

fn comparison_line(c: &TeamComparison) -> String {
    let ratio = or_dash(c.win_ratio().map(|v| format!("{:.3}", v)));
    format!(
        "#{} {} - W{} L{} G{}, win ratio {}",
        c.ranking, c.name, c.total_wins, c.total_losses, c.total_goals, ratio
    )
}

fn league_line(l: &LeagueStanding) -> String {
    format!(
        "{} ({}, {}) - {} seasons, {} teams, {} / {}, updated {}",
        l.name,
        l.country,
        l.level,
        l.seasons,
        l.teams.len(),
        l.format,
        l.points_system,
        when(&l.date)
    )
}

fn jersey_text(j: &JerseyHistory) -> String {
    let numbers = j
        .jersey_num
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}: {}", j.name, numbers)
}

/// Run one wide-column command and return its rendered output.
pub fn handle_wide(store: &mut WideColumnStore, cmd: &WideCmd, as_json: bool) -> Result<String> {
    match cmd {
        WideCmd::Teams => render_list(&store.team_data()?, as_json, "No teams found.", team_line),
        WideCmd::LiveMatches => render_list(
            &store.live_matches()?,
            as_json,
            "No live matches.",
            live_line,
        ),
        WideCmd::PlayerHistory { name } => render_option(
            &store.player_history(name)?,
            as_json,
            &format!("No history found for player {}.", name),
            player_text,
        ),
        WideCmd::TeamHistory { name } => render_option(
            &store.team_history(name)?,
            as_json,
            &format!("No history found for team {}.", name),
            team_line,
        ),
        WideCmd::Stadiums {
            country,
            min_capacity,
        } => render_list(
            &store.stadiums_by_capacity(country, *min_capacity)?,
            as_json,
            &format!("No stadiums in {} with capacity >= {}.", country, min_capacity),
            stadium_line,
        ),
        WideCmd::Roster { team } => render_option(
            &store.players_by_team(team)?,
            as_json,
            &format!("No roster found for team {}.", team),
            roster_text,
        ),
        WideCmd::Rankings { country, min_rank } => render_list(
            &store.team_rankings(country, *min_rank)?,
            as_json,
            &format!("No ranked teams in {}.", country),
            ranking_line,
        ),
        WideCmd::Budgets {
            country,
            min_budget,
        } => render_list(
            &store.team_budgets(country, *min_budget)?,
            as_json,
            &format!("No team budgets in {}.", country),
            budget_line,
        ),
        WideCmd::CompareTeams { first, second } => render_list(
            &store.compare_teams(first, second)?,
            as_json,
            &format!("Neither {} nor {} found.", first, second),
            comparison_line,
        ),
        WideCmd::Leagues => render_list(
            &store.league_standings()?,
            as_json,
            "No league standings.",
            league_line,
        ),
        WideCmd::Attendance {
            country,
            min_average,
        } => render_list(
            &store.attendance_trends(country, *min_average)?,
            as_json,
            &format!("No attendance data for {}.", country),
            stadium_line,
        ),
        WideCmd::Jerseys { name } => render_option(
            &store.jersey_history(name)?,
            as_json,
            &format!("No jersey history for {}.", name),
            jersey_text,
        ),
        WideCmd::Load { file } => {
            let fixture: WideFixture = read_json_file(file)?;
            let rows = store.load_fixture(&fixture)?;
            info!(rows, file = %file.display(), "wide fixture loaded");
            render(&serde_json::json!({ "rows": rows }), as_json, |_| {
                format!("✓ Loaded {} rows from {}", rows, file.display())
            })
        }
        WideCmd::Reset => {
            store.reset()?;
            render(&serde_json::json!({ "reset": true }), as_json, |_| {
                "✓ Wide-column tables recreated".to_string()
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parse_timestamp;

    fn store_with_team() -> WideColumnStore {
        let mut store = WideColumnStore::open_in_memory().unwrap();
        store
            .insert_team(&TeamRecord {
                team_id: 1,
                name: "Chivas".to_string(),
                manager: "Gago".to_string(),
                country: "Mexico".to_string(),
                players: vec!["Alvarado".to_string()],
                total_wins: 10,
                total_losses: 5,
                total_goals: 30,
                last_match: Some(parse_timestamp("2024-11-01 19:00").unwrap()),
                next_match: None,
                gender: "M".to_string(),
                ranking: 3,
                budget_allocated: 100,
                budget_spent: 40,
            })
            .unwrap();
        store
    }

    #[test]
    fn test_teams_text() {
        let mut store = store_with_team();
        let out = handle_wide(&mut store, &WideCmd::Teams, false).unwrap();
        assert!(out.starts_with("Chivas (Mexico)"));
        assert!(out.contains("last 2024-11-01T19:00:00"));
        assert!(out.contains("next -"));
    }

    #[test]
    fn test_teams_json() {
        let mut store = store_with_team();
        let out = handle_wide(&mut store, &WideCmd::Teams, true).unwrap();
        let parsed: Vec<TeamRecord> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].ranking, 3);
    }

    #[test]
    fn test_missing_records_render_messages() {
        let mut store = WideColumnStore::open_in_memory().unwrap();
        let out = handle_wide(
            &mut store,
            &WideCmd::PlayerHistory {
                name: "Nobody".to_string(),
            },
            false,
        )
        .unwrap();
        assert_eq!(out, "No history found for player Nobody.");

        let json = handle_wide(
            &mut store,
            &WideCmd::Jerseys {
                name: "Nobody".to_string(),
            },
            true,
        )
        .unwrap();
        assert_eq!(json, "null");

        let empty = handle_wide(&mut store, &WideCmd::Leagues, true).unwrap();
        assert_eq!(empty, "[]");
    }

    #[test]
    fn test_load_and_reset() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("wide.json");
        std::fs::write(
            &file,
            r#"{"jerseys": [{"player_id": 7, "name": "Chicharito", "jersey_num": [14, 7]}]}"#,
        )
        .unwrap();

        let mut store = WideColumnStore::open_in_memory().unwrap();
        let out = handle_wide(&mut store, &WideCmd::Load { file }, false).unwrap();
        assert!(out.contains("Loaded 1 rows"));

        let jerseys = handle_wide(
            &mut store,
            &WideCmd::Jerseys {
                name: "Chicharito".to_string(),
            },
            false,
        )
        .unwrap();
        assert_eq!(jerseys, "Chicharito: 14, 7");

        handle_wide(&mut store, &WideCmd::Reset, false).unwrap();
        assert!(store.jersey_history("Chicharito").unwrap().is_none());
    }
}
