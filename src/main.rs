mod config;
mod epg;
mod error;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::Config;
use crate::epg::pipeline::run_guide;
use crate::epg::rules::load_rules;
use crate::epg::sinks::ScheduleSink;
use crate::epg::sinks::directory::DirectorySink;
use crate::epg::sinks::log::LogSink;
use crate::epg::time::CivilDay;

#[derive(Parser)]
#[command(name = "epg-merge", about = "Merge XMLTV guides into per-channel daily schedules")]
enum Cli {
    /// Fetch, merge and write schedules (default when no subcommand is given)
    Run {
        /// Config file, falls back to $EPG_CONFIG and then ./epg.toml
        #[arg(long)]
        config: Option<PathBuf>,
        /// Log what would be written instead of touching the output directories
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the rules parsed from a filter file
    Rules { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("epg_merge=info,reqwest=warn,hyper=warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true).with_bracketed_fields(false))
        .init();

    // Default to Run when no subcommand is given, but keep --help working.
    let args: Vec<String> = std::env::args().collect();
    let cli = if args.len() <= 1 {
        Cli::Run {
            config: None,
            dry_run: false,
        }
    } else {
        Cli::parse()
    };

    match cli {
        Cli::Run { config, dry_run } => run(config, dry_run).await,
        Cli::Rules { path } => {
            for rule in load_rules(&path)? {
                println!("{} -> {}", rule.requested_name, rule.output_name);
            }
            Ok(())
        }
    }
}

async fn run(config_path: Option<PathBuf>, dry_run: bool) -> Result<()> {
    let config_path = config_path.or_else(|| {
        std::env::var("EPG_CONFIG")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    });
    let config = Config::load_or_default(config_path.as_deref())?;

    let http_client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()
        .context("failed to build HTTP client")?;
    let timeout = Duration::from_secs(config.request_timeout_secs);

    let today = CivilDay::today(config.timezone);
    tracing::info!(
        date = %today.label(),
        timezone = %config.timezone,
        guides = config.guides.len(),
        dry_run,
        "Starting EPG run"
    );

    for guide in &config.guides {
        let sink: Box<dyn ScheduleSink> = if dry_run {
            Box::new(LogSink)
        } else {
            Box::new(DirectorySink::new(
                guide.today_dir.clone(),
                guide.tomorrow_dir.clone(),
            ))
        };

        let report = run_guide(guide, &http_client, timeout, today, sink.as_ref()).await?;
        report.log_summary();
    }

    Ok(())
}
