use std::path::PathBuf;

use clap::Parser;
use np_core::{DashboardConfig, PayoutService};
use tracing::info;

mod cli;
mod logging;

use cli::{handle_command, Commands, Context};
use logging::init_logging;

#[derive(Parser, Debug)]
#[command(author, version, about = "Author payouts for a news dashboard", long_about = None)]
pub struct Cli {
    /// JSON array of articles to report on
    #[arg(long, global = true)]
    articles: Option<PathBuf>,
    /// Where payout rates are kept: memory or file
    #[arg(long, global = true, default_value = "file")]
    store: String,
    /// Rate file used by the file store
    #[arg(long, global = true, default_value = "np_rates.json")]
    store_path: PathBuf,
    /// Dashboard settings (JSON); defaults apply to anything left out
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let logger = init_logging(cli.verbose).with_prefix("[np]");

    let config = match &cli.config {
        Some(path) => DashboardConfig::from_file(path).await?,
        None => DashboardConfig::default(),
    };

    let store = np_storage::create_store(&cli.store, Some(cli.store_path.as_path())).await?;
    info!("🏦 Rate store initialized (using {})", cli.store);
    if cli.articles.is_none() {
        logger.warn("No --articles file given, reporting on an empty collection");
    }
    let source = np_storage::create_source(cli.articles.as_deref());

    let service = PayoutService::new(
        source,
        store,
        config.access.clone(),
        config.default_rates.clone(),
    );
    let ctx = Context {
        service,
        config,
        logger,
    };

    handle_command(cli.command, &ctx).await?;
    Ok(())
}
