use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use solgrid::app::AppContext;
use solgrid::cli::{commands, Cli, Commands};
use solgrid::config::Config;
use solgrid::domain::FeedQuery;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let is_tui = matches!(cli.command, None | Some(Commands::Tui { .. }));
    init_tracing(cli.log.as_deref(), is_tui)?;

    let config = Config::load()?;
    let ctx = AppContext::new(config)?;

    match cli.command {
        None => {
            let query = FeedQuery::new(ctx.config.defaults.rover, ctx.config.defaults.sol);
            solgrid::tui::run(Arc::new(ctx), query).await?;
        }
        Some(Commands::Tui { rover, sol }) => {
            let query = FeedQuery::new(
                rover.unwrap_or(ctx.config.defaults.rover),
                sol.unwrap_or(ctx.config.defaults.sol).max(1),
            );
            solgrid::tui::run(Arc::new(ctx), query).await?;
        }
        Some(Commands::Photos { rover, sol, pages }) => {
            commands::list_photos(&ctx, rover, sol.max(1), pages).await?;
        }
        Some(Commands::Manifest { rover, limit }) => {
            commands::show_manifest(&ctx, rover, limit).await?;
        }
    }

    Ok(())
}

/// Logs go to `--log` when given. Otherwise the TUI stays silent and the
/// print commands log to stdout.
fn init_tracing(log_path: Option<&Path>, is_tui: bool) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry().with(EnvFilter::from_default_env());

    match log_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            registry
                .with(fmt::layer().with_writer(Arc::new(file)).with_ansi(false))
                .init();
        }
        None if is_tui => registry.init(),
        None => registry.with(fmt::layer()).init(),
    }

    Ok(())
}
