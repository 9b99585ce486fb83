use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use almanac::app::AppContext;
use almanac::cli::{commands, Cli, Commands};
use almanac::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(tz) = cli.tz {
        config.timezone = tz;
    }

    let ctx = AppContext::new(config, cli.db)?;
    let tz = ctx.timezone;

    match cli.command {
        Commands::Today { save } => {
            commands::today(&ctx, tz, save).await?;
        }
        Commands::Refresh { save } => {
            commands::refresh(&ctx, save).await?;
        }
        Commands::Week { all } => {
            commands::week(&ctx, tz, all)?;
        }
        Commands::Sources => {
            commands::list_sources(&ctx)?;
        }
        Commands::Enable { source } => {
            commands::set_source(&ctx, source, true)?;
        }
        Commands::Disable { source } => {
            commands::set_source(&ctx, source, false)?;
        }
        Commands::Catalog { source } => {
            commands::catalog(&ctx, source).await?;
        }
        Commands::Saved => {
            commands::list_saved(&ctx)?;
        }
        Commands::Unsave { id } => {
            commands::unsave(&ctx, &id)?;
        }
    }

    Ok(())
}
