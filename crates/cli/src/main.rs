use clap::{Parser, Subcommand};

mod commands;

use commands::{CrawlArgs, DashboardArgs, HistoryArgs, MigrateAccountsArgs};

#[derive(Parser)]
#[command(name = "playwatch")]
#[command(about = "Creator play-count monitor", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run scheduled ingestion with the web API until interrupted
    Run {
        /// Config file path
        #[arg(short, long, default_value = "config/Config.toml")]
        config: String,
    },
    /// Run one ingestion cycle now
    Crawl(CrawlArgs),
    /// Resolve display names for accounts listed by id only
    MigrateAccounts(MigrateAccountsArgs),
    /// Print growth figures as JSON
    Dashboard(DashboardArgs),
    /// Print the play-count history of one video
    History(HistoryArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run { config } => {
            commands::run_daemon(&config).await?;
        }
        Commands::Crawl(args) => {
            commands::run_crawl(args).await?;
        }
        Commands::MigrateAccounts(args) => {
            commands::run_migrate_accounts(args).await?;
        }
        Commands::Dashboard(args) => {
            commands::run_dashboard(args)?;
        }
        Commands::History(args) => {
            commands::run_history(args)?;
        }
    }

    Ok(())
}
