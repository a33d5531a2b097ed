//! Interactive numbered menu over every query of the three stores.

use std::io::{BufRead, Write};
use std::str::FromStr;

use tracing::{debug, warn};

use super::{documents::handle_docs, graph::handle_graph, wide::handle_wide};
use crate::{
    api::ApiClient,
    cli::{DocsCmd, GraphCmd, WideCmd},
    error::StatsError,
    graph::{GraphStore, Uid},
    wide::WideColumnStore,
    Result,
};

/// Menu entries, numbered from 1. `0` exits.
pub const MENU_ITEMS: &[&str] = &[
    // Wide-column
    "Team data",
    "Live matches",
    "Player history",
    "Team history",
    "Stadiums by capacity",
    "Players by team",
    "Team rankings",
    "Team budgets",
    "Compare teams",
    "League standings",
    "Attendance trends",
    "Player jersey history",
    // Documents
    "Document service health",
    "All teams (documents)",
    "Team by name",
    "Player injury",
    "Awards by recipient",
    "Finished matches",
    "Upcoming matches",
    "Matches with a score",
    "Recent matches of a team",
    "All matches of a team",
    "Player transfers",
    "Player market values",
    // Graph
    "Player performance",
    "Player stats by league",
    "Player stats by country",
    "Player stats by age",
    "Basic player stats",
    "Search players by name",
    "Compare players",
    "Top scorers",
];

/// Reads answers from `input`, writes prompts to `output`.
struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// `None` at end of input.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn text(&mut self, prompt: &str) -> Result<String> {
        self.ask(prompt)?
            .ok_or_else(|| StatsError::invalid("input", "unexpected end of input"))
    }

    fn parse<T>(&mut self, prompt: &str, field: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.text(prompt)?;
        raw.parse::<T>()
            .map_err(|e| StatsError::invalid(field, format!("'{}': {}", raw, e)))
    }
}

/// Stores the menu queries.
pub struct MenuContext {
    pub wide: WideColumnStore,
    pub graph: GraphStore,
    pub client: ApiClient,
    pub as_json: bool,
}

fn menu_text() -> String {
    let mut lines = vec!["\nSelect a query:".to_string()];
    for (i, label) in MENU_ITEMS.iter().enumerate() {
        let heading = match i {
            0 => Some("-- Wide-column store --"),
            12 => Some("-- Document store --"),
            24 => Some("-- Graph store --"),
            _ => None,
        };
        if let Some(h) = heading {
            lines.push(h.to_string());
        }
        lines.push(format!("{:>2}. {}", i + 1, label));
    }
    lines.push(" 0. Exit".to_string());
    lines.join("\n")
}

/// Run the menu until `0` or end of input. Query errors are printed and the
/// loop continues.
pub async fn run_menu<R: BufRead, W: Write>(ctx: &mut MenuContext, input: R, output: W) -> Result<()> {
    let mut prompter = Prompter { input, output };

    loop {
        writeln!(prompter.output, "{}", menu_text())?;
        let Some(choice) = prompter.ask("\nEnter the number of the query")? else {
            break;
        };
        let choice = match choice.parse::<usize>() {
            Ok(0) => {
                writeln!(prompter.output, "Exiting...")?;
                break;
            }
            Ok(n) if n <= MENU_ITEMS.len() => n,
            _ => {
                writeln!(prompter.output, "Invalid choice. Please select a valid option.")?;
                continue;
            }
        };

        debug!(choice, item = MENU_ITEMS[choice - 1], "menu selection");
        match run_item(ctx, choice, &mut prompter).await {
            Ok(out) => writeln!(prompter.output, "{}", out)?,
            Err(e) => {
                warn!("menu query failed: {}", e);
                writeln!(prompter.output, "Error: {}", e)?;
            }
        }
    }
    Ok(())
}

async fn run_item<R: BufRead, W: Write>(
    ctx: &mut MenuContext,
    choice: usize,
    p: &mut Prompter<R, W>,
) -> Result<String> {
    let json = ctx.as_json;

    if choice <= 12 {
        let cmd = match choice {
            1 => WideCmd::Teams,
            2 => WideCmd::LiveMatches,
            3 => WideCmd::PlayerHistory {
                name: p.text("Player name")?,
            },
            4 => WideCmd::TeamHistory {
                name: p.text("Team name")?,
            },
            5 => WideCmd::Stadiums {
                country: p.text("Country")?,
                min_capacity: p.parse("Minimum capacity", "capacity")?,
            },
            6 => WideCmd::Roster {
                team: p.text("Team name")?,
            },
            7 => WideCmd::Rankings {
                country: p.text("Country")?,
                min_rank: p.parse("Minimum ranking", "ranking")?,
            },
            8 => WideCmd::Budgets {
                country: p.text("Country")?,
                min_budget: p.parse("Minimum budget", "budget")?,
            },
            9 => WideCmd::CompareTeams {
                first: p.text("First team")?,
                second: p.text("Second team")?,
            },
            10 => WideCmd::Leagues,
            11 => WideCmd::Attendance {
                country: p.text("Country")?,
                min_average: p.parse("Minimum average attendance", "attendance")?,
            },
            _ => WideCmd::Jerseys {
                name: p.text("Player name")?,
            },
        };
        return handle_wide(&mut ctx.wide, &cmd, json);
    }

    if choice <= 24 {
        let cmd = match choice {
            13 => DocsCmd::Health,
            14 => DocsCmd::Teams,
            15 => DocsCmd::Team {
                name: p.text("Team name")?,
            },
            16 => {
                let name = p.text("Player name (blank for unnamed)")?;
                DocsCmd::Injury {
                    player: (!name.is_empty()).then_some(name),
                }
            }
            17 => DocsCmd::Awards {
                recipient: p.text("Team or player name")?,
            },
            18 => DocsCmd::Finished,
            19 => DocsCmd::Upcoming,
            20 => DocsCmd::Scored,
            21 => DocsCmd::RecentMatches {
                team: p.text("Team name")?,
            },
            22 => DocsCmd::AllMatches {
                team: p.text("Team name")?,
            },
            23 => DocsCmd::Transfers {
                player: p.text("Player name")?,
            },
            _ => DocsCmd::Values {
                player: p.text("Player name")?,
            },
        };
        return handle_docs(&ctx.client, &cmd, json).await;
    }

    let cmd = match choice {
        25 => GraphCmd::Performance {
            name: p.text("Player name")?,
        },
        26 => GraphCmd::League {
            name: p.text("League name")?,
        },
        27 => GraphCmd::Country {
            name: p.text("Country name")?,
        },
        28 => GraphCmd::Age {
            min_age: p.parse("Minimum player age", "age")?,
        },
        29 => GraphCmd::Stats {
            name: p.text("Player name")?,
        },
        30 => GraphCmd::Search {
            term: p.text("Name or part of the name")?,
        },
        31 => GraphCmd::Compare {
            first: p.parse::<Uid>("First player uid", "uid")?,
            second: p.parse::<Uid>("Second player uid", "uid")?,
        },
        _ => GraphCmd::TopScorers,
    };
    handle_graph(&mut ctx.graph, &cmd, json)
}
