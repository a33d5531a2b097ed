//! Entry point: parse CLI, set up logging and dispatch to command handlers.

use clap::Parser;
use football_stats::{
    cli::{Cli, Commands},
    commands::{
        documents::handle_docs,
        graph::handle_graph,
        init::{handle_init, InitParams},
        menu::{run_menu, MenuContext},
        serve::{handle_serve, serve_settings},
        wide::handle_wide,
        CommandContext,
    },
    Settings,
};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "football_stats=debug,tower_http=debug"
    } else {
        "football_stats=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run the CLI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let settings = Settings::from_env()?.with_overrides(cli.global.data_dir, cli.global.api_url);
    let ctx = CommandContext::new(settings);
    let as_json = cli.global.json;

    let output = match cli.command {
        Commands::Wide { cmd } => {
            let mut store = ctx.open_wide()?;
            handle_wide(&mut store, &cmd, as_json)?
        }
        Commands::Docs { cmd } => handle_docs(&ctx.api_client()?, &cmd, as_json).await?,
        Commands::Graph { cmd } => {
            let mut store = ctx.open_graph()?;
            handle_graph(&mut store, &cmd, as_json)?
        }
        Commands::Serve {
            bind,
            port,
            timeout,
        } => {
            let settings = serve_settings(ctx.settings, bind, port, timeout);
            handle_serve(&settings).await?;
            return Ok(());
        }
        Commands::Menu => {
            let mut menu = MenuContext {
                wide: ctx.open_wide()?,
                graph: ctx.open_graph()?,
                client: ctx.api_client()?,
                as_json,
            };
            let stdin = std::io::stdin();
            run_menu(&mut menu, stdin.lock(), std::io::stdout()).await?;
            return Ok(());
        }
        Commands::Init {
            fresh,
            wide_fixture,
            graph_fixture,
        } => handle_init(
            &ctx.settings,
            &InitParams {
                fresh,
                wide_fixture,
                graph_fixture,
            },
            as_json,
        )?,
    };

    println!("{}", output);
    Ok(())
}
