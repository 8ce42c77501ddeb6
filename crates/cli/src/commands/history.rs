use super::{print_json, DEFAULT_CONFIG_PATH};
use anyhow::Result;
use chrono::SecondsFormat;
use clap::Args;
use playwatch_core::ConfigLoader;
use playwatch_growth::StatsQueries;

/// Arguments for the history command.
#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    /// Video id or title
    pub key: String,

    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Prints every recorded play count of one video, oldest first.
///
/// # Errors
/// Returns an error if the configuration cannot be loaded.
pub fn run_history(args: HistoryArgs) -> Result<()> {
    let config = ConfigLoader::load_from(&args.config)?;
    let history = StatsQueries::from_config(&config.storage).video_history(&args.key);

    if args.json {
        return print_json(&history);
    }
    if history.is_empty() {
        println!("No snapshots recorded for '{}'", args.key);
        return Ok(());
    }

    println!("{:<22} {:>14}  {}", "Captured", "Plays", "Display");
    println!("{}", "-".repeat(52));
    for point in &history {
        println!(
            "{:<22} {:>14}  {}",
            point.captured_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            point.play_count,
            point.display_text
        );
    }
    Ok(())
}
