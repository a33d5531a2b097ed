//! CLI argument definitions and parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::documents::Collection;
use crate::graph::Uid;

/// Flags accepted by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Directory holding the store databases (or set `FOOTBALL_STATS_DATA_DIR`).
    #[clap(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Base URL of the REST service (or set `FOOTBALL_STATS_API_URL`).
    #[clap(long, global = true)]
    pub api_url: Option<String>,

    /// Debug-level logging on stderr.
    #[clap(long, short, global = true)]
    pub verbose: bool,

    /// Output results as JSON instead of text lines.
    #[clap(long, global = true)]
    pub json: bool,
}

#[derive(Debug, Parser)]
#[clap(
    name = "football-stats",
    about = "Football statistics over wide-column, document and graph stores",
    version
)]
pub struct Cli {
    #[clap(flatten)]
    pub global: GlobalArgs,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Query the wide-column store
    Wide {
        #[clap(subcommand)]
        cmd: WideCmd,
    },

    /// Query the document store through the REST service
    Docs {
        #[clap(subcommand)]
        cmd: DocsCmd,
    },

    /// Query or modify the graph store
    Graph {
        #[clap(subcommand)]
        cmd: GraphCmd,
    },

    /// Run the REST service over the document store
    Serve {
        /// Listen address (or set `FOOTBALL_STATS_BIND`).
        #[clap(long)]
        bind: Option<String>,

        /// Listen port (or set `FOOTBALL_STATS_PORT`).
        #[clap(long, short)]
        port: Option<u16>,

        /// Request timeout in seconds (or set `FOOTBALL_STATS_TIMEOUT_SECS`).
        #[clap(long)]
        timeout: Option<u64>,
    },

    /// Interactive numbered menu over every query
    Menu,

    /// Create the store schemas, optionally loading fixtures
    Init {
        /// Drop existing wide-column tables and graph data first.
        #[clap(long)]
        fresh: bool,

        /// JSON fixture for the wide-column store.
        #[clap(long)]
        wide_fixture: Option<PathBuf>,

        /// JSON fixture for the graph store.
        #[clap(long)]
        graph_fixture: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum WideCmd {
    /// Every row of team_data
    Teams,

    /// Live match board
    LiveMatches,

    /// A player's career numbers
    PlayerHistory { name: String },

    /// A team's historical record
    TeamHistory { name: String },

    /// Stadiums in a country, largest first
    Stadiums {
        country: String,
        #[clap(long, default_value_t = 0)]
        min_capacity: i64,
    },

    /// A team's roster
    Roster { team: String },

    /// Team rankings in a country
    Rankings {
        country: String,
        #[clap(long, default_value_t = 0)]
        min_rank: i64,
    },

    /// Team budgets in a country
    Budgets {
        country: String,
        #[clap(long, default_value_t = 0)]
        min_budget: i64,
    },

    /// Side-by-side record of two teams
    CompareTeams { first: String, second: String },

    /// League standings
    Leagues,

    /// Stadium attendance in a country
    Attendance {
        country: String,
        #[clap(long, default_value_t = 0)]
        min_average: i64,
    },

    /// A player's jersey numbers
    Jerseys { name: String },

    /// Load a JSON fixture file
    Load { file: PathBuf },

    /// Drop and recreate every table
    Reset,
}

#[derive(Debug, Clone, Subcommand)]
pub enum DocsCmd {
    /// Service status and document counts
    Health,

    /// Every team
    Teams,

    /// One team by name
    Team { name: String },

    /// First injury on record for a player (omit for unnamed entries)
    Injury { player: Option<String> },

    /// Awards given to a team or player
    Awards { recipient: String },

    /// Finished matches
    Finished,

    /// Scheduled matches
    Upcoming,

    /// Matches with a recorded score
    Scored,

    /// First few matches involving a team
    RecentMatches { team: String },

    /// Every match involving a team
    AllMatches { team: String },

    /// Transfers of a player
    Transfers { player: String },

    /// A player's market value history with avg/max/min
    Values { player: String },

    /// POST every document in a JSON file (an array or a single object)
    Import {
        #[clap(value_enum)]
        collection: Collection,
        file: PathBuf,
    },

    /// Delete every document in every collection
    DeleteAll,
}

#[derive(Debug, Clone, Subcommand)]
pub enum GraphCmd {
    /// Drop all nodes and edges and recreate the schema
    Schema,

    /// Load a JSON fixture file
    Load { file: PathBuf },

    AddCountry { country_id: String, name: String },

    AddLeague { league_id: String, name: String },

    AddPlayer {
        name: String,
        age: i64,
        /// Country uid (e.g. 0x1).
        #[clap(long)]
        country: Option<Uid>,
        /// League uid, repeatable.
        #[clap(long = "league")]
        leagues: Vec<Uid>,
    },

    AddStats {
        /// Owning player uid.
        player: Uid,
        stats_id: String,
        #[clap(long, default_value_t = 0)]
        matches: i64,
        #[clap(long, default_value_t = 0)]
        assists: i64,
        #[clap(long, default_value_t = 0)]
        goals: i64,
    },

    /// A player's performance (first stats record)
    Performance { name: String },

    /// Players in a league with their stats
    League { name: String },

    /// Players from a country with their stats
    Country { name: String },

    /// Players at or above an age
    Age { min_age: i64 },

    /// Every stats record of a player
    Stats { name: String },

    /// Case-insensitive name search
    Search { term: String },

    /// Compare two players by uid
    Compare { first: Uid, second: Uid },

    /// Top scorers by goals
    TopScorers,
}
