//! Document store commands. Every one goes through the REST service.

use serde_json::Value;
use tracing::info;

use super::common::{or_dash, read_json_file, render, render_list};
use crate::{
    api::ApiClient,
    cli::DocsCmd,
    core::format_timestamp,
    documents::{Award, Match, PlayerInjury, PlayerTransfer, PlayerValueSummary, Team},
    error::StatsError,
    Result,
};

fn team_line(t: &Team) -> String {
    format!("{} - owner {}, contact {}", t.team_name, t.owner, t.email)
}

fn injury_text(i: &PlayerInjury) -> String {
    format!(
        "{} ({}) - {} [{}]\n  {} to {} ({} days)\n  {}",
        i.player_name.as_deref().unwrap_or("<unnamed>"),
        i.team_name,
        i.injury_type,
        i.status,
        format_timestamp(&i.start_date),
        format_timestamp(&i.end_date),
        i.days_out(),
        i.medical_notes
    )
}

fn award_line(a: &Award) -> String {
    format!(
        "{} {} ({}) - {} {}, awarded {}",
        a.season,
        a.award_name,
        a.category,
        a.recipient_type,
        a.recipient_name,
        format_timestamp(&a.date_awarded)
    )
}

fn score_text(score: &Option<Value>) -> String {
    match score {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn match_line(m: &Match) -> String {
    format!(
        "{} vs {} - {} [{}] score {}",
        m.home_team_name,
        m.away_team_name,
        format_timestamp(&m.date),
        m.status,
        score_text(&m.score)
    )
}

fn transfer_line(t: &PlayerTransfer) -> String {
    format!(
        "{}: {} -> {} on {}, fee {:.2}, {} years",
        t.player_name,
        t.from_team_name,
        t.team_name,
        format_timestamp(&t.transfer_date),
        t.fee,
        t.contract_length
    )
}

fn value_line(v: &PlayerValueSummary) -> String {
    let fmt = |x: Option<f64>| or_dash(x.map(|v| format!("{:.2}", v)));
    format!(
        "{} - {} entries, avg {}, max {}, min {}",
        v.player_name,
        v.value_history.len(),
        fmt(v.avg_value),
        fmt(v.max_value),
        fmt(v.min_value)
    )
}

/// Documents in an import file: a JSON array, or one object.
fn import_documents(raw: Value) -> Result<Vec<Value>> {
    match raw {
        Value::Array(items) => Ok(items),
        Value::Object(_) => Ok(vec![raw]),
        _ => Err(StatsError::invalid(
            "file",
            "expected a JSON array of documents or a single document",
        )),
    }
}

/// Run one document command against the REST service.
pub async fn handle_docs(client: &ApiClient, cmd: &DocsCmd, as_json: bool) -> Result<String> {
    match cmd {
        DocsCmd::Health => {
            let health = client.health().await?;
            render(&health, as_json, |h| {
                let counts = h["documents"]
                    .as_object()
                    .map(|m| {
                        m.iter()
                            .map(|(k, v)| format!("  {}: {}", k, v))
                            .collect::<Vec<_>>()
                            .join("\n")
                    })
                    .unwrap_or_default();
                format!(
                    "Service at {} is {}\n{}",
                    client.base_url(),
                    h["status"].as_str().unwrap_or("unknown"),
                    counts
                )
            })
        }
        DocsCmd::Teams => render_list(&client.teams().await?, as_json, "No teams found.", team_line),
        DocsCmd::Team { name } => render(&client.team(name).await?, as_json, team_line),
        DocsCmd::Injury { player } => {
            let injury = match player {
                Some(name) => client.player_injury(name).await?,
                None => client.unnamed_player_injury().await?,
            };
            render(&injury, as_json, injury_text)
        }
        DocsCmd::Awards { recipient } => render_list(
            &client.awards(recipient).await?,
            as_json,
            &format!("No awards for {}.", recipient),
            award_line,
        ),
        DocsCmd::Finished => render_list(
            &client.finished_matches().await?,
            as_json,
            "No finished matches.",
            match_line,
        ),
        DocsCmd::Upcoming => render_list(
            &client.upcoming_matches().await?,
            as_json,
            "No upcoming matches.",
            match_line,
        ),
        DocsCmd::Scored => render_list(
            &client.scored_matches().await?,
            as_json,
            "No matches with a score.",
            match_line,
        ),
        DocsCmd::RecentMatches { team } => render_list(
            &client.recent_matches(team).await?,
            as_json,
            &format!("No matches for {}.", team),
            match_line,
        ),
        DocsCmd::AllMatches { team } => render_list(
            &client.all_matches(team).await?,
            as_json,
            &format!("No matches for {}.", team),
            match_line,
        ),
        DocsCmd::Transfers { player } => render_list(
            &client.transfers(player).await?,
            as_json,
            &format!("No transfers for {}.", player),
            transfer_line,
        ),
        DocsCmd::Values { player } => render_list(
            &client.player_values(player).await?,
            as_json,
            &format!("No market values for {}.", player),
            value_line,
        ),
        DocsCmd::Import { collection, file } => {
            let documents = import_documents(read_json_file(file)?)?;
            let mut created = 0usize;
            for document in &documents {
                client.create_value(*collection, document).await?;
                created += 1;
            }
            info!(collection = %collection, created, "documents imported");
            render(
                &serde_json::json!({ "collection": collection, "created": created }),
                as_json,
                |_| format!("✓ Imported {} documents into {}", created, collection),
            )
        }
        DocsCmd::DeleteAll => {
            let deleted = client.delete_all().await?;
            render(&serde_json::json!({ "deleted": deleted }), as_json, |_| {
                format!("✓ Deleted {} documents", deleted)
            })
        }
    }
}
