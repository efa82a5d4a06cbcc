use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sports_webcast::{
    config::Config,
    playlist::EntryNormalizer,
    scheduler::RefreshScheduler,
    service::{FeedInputs, RefreshService},
};

#[derive(Parser)]
#[command(name = "sports-webcast")]
#[command(version)]
#[command(about = "Sports event playlist generator with same-day status history")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Playlist output path (overrides config file)
    #[arg(short, long, value_name = "PATH", global = true)]
    output: Option<PathBuf>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Refresh the playlist once
    Run {
        #[command(flatten)]
        inputs: InputArgs,
    },
    /// Refresh the playlist on a cron schedule until interrupted
    Schedule {
        #[command(flatten)]
        inputs: InputArgs,

        /// Cron expression (overrides config file)
        #[arg(long, value_name = "EXPR")]
        cron: Option<String>,
    },
    /// Print the identity key of a playlist title or header line
    Normalize { title: String },
}

#[derive(clap::Args)]
struct InputArgs {
    /// Feed snapshot JSON
    #[arg(long, value_name = "PATH")]
    feed: PathBuf,

    /// Resolved stream URLs JSON
    #[arg(long, value_name = "PATH")]
    resolved: Option<PathBuf>,
}

impl From<InputArgs> for FeedInputs {
    fn from(args: InputArgs) -> Self {
        FeedInputs {
            snapshot: args.feed,
            resolved: args.resolved,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("sports_webcast={}", cli.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    if let Some(output) = cli.output {
        config.playlist.output_path = output;
    }

    match cli.command {
        Command::Run { inputs } => {
            info!("Starting sports-webcast v{}", env!("CARGO_PKG_VERSION"));
            let service = RefreshService::new(&config, inputs.into())?;
            let summary = service.run_once(Utc::now())?;
            println!("{summary}");
        }
        Command::Schedule { inputs, cron } => {
            info!("Starting sports-webcast v{}", env!("CARGO_PKG_VERSION"));
            let cron = cron.unwrap_or_else(|| config.schedule.cron.clone());
            let service = Arc::new(RefreshService::new(&config, inputs.into())?);
            info!(
                "Writing playlist to {}",
                service.store().path().display()
            );
            RefreshScheduler::new(service, &cron, config.schedule.run_on_start)?
                .run()
                .await?;
        }
        Command::Normalize { title } => {
            let normalizer = EntryNormalizer::new(&config.normalizer)?;
            println!("{}", normalizer.normalize(&title));
        }
    }

    Ok(())
}
