use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newswire::app::AppContext;
use newswire::cli::{commands, Cli, Commands};
use newswire::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let result = run(Cli::parse()).await;
    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Init { force } => {
            commands::init_config(&cli.config, force)?;
        }
        Commands::Serve => {
            let ctx = load_context(&cli.config)?;
            commands::serve(ctx).await.context("Server stopped with an error")?;
        }
        Commands::Fetch { url } => {
            let ctx = load_context(&cli.config)?;
            commands::fetch_feed(&ctx, &url).await?;
        }
        Commands::Recent { count } => {
            let ctx = load_context(&cli.config)?;
            commands::list_recent(&ctx, count)?;
        }
    }

    Ok(())
}

fn load_context(path: &std::path::Path) -> anyhow::Result<AppContext> {
    let config = Config::load(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    AppContext::new(config).context("Failed to initialize storage")
}
