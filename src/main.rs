use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use live_commentary::{
    config::Config,
    engine::LiveCommentaryEngine,
    services::HttpCommentaryBackend,
    sources::SubjectResolver,
    utils::format_timestamp,
};

#[derive(Parser)]
#[command(name = "live-commentary")]
#[command(version)]
#[command(about = "Follow a video and print live commentary as it plays")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Backend base URL (overrides config file)
    #[arg(short = 'b', long, global = true, value_name = "URL")]
    backend_url: Option<String>,

    /// Log level
    #[arg(short = 'v', long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Simulate playback of a video and print commentary as it arrives
    Watch {
        url: String,

        /// Playback position to start from, in seconds
        #[arg(short, long, default_value_t = 0.0)]
        start: f64,

        /// Stop after this much playback, e.g. "90s" or "5m" (runs until Ctrl-C if omitted)
        #[arg(short, long, value_parser = humantime::parse_duration)]
        duration: Option<Duration>,
    },
    /// Print the subject a URL resolves to as JSON
    Resolve { url: String },
    /// Write the default configuration file
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!("live_commentary={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Resolve { url } => {
            let subject = SubjectResolver::with_default_recognizers()
                .resolve(&url)
                .with_context(|| format!("Unsupported video URL: '{url}'"))?;
            println!("{}", serde_json::to_string_pretty(&subject)?);
            Ok(())
        }
        Command::InitConfig => {
            Config::write_default(&cli.config)?;
            Ok(())
        }
        Command::Watch {
            url,
            start,
            duration,
        } => {
            let mut config = Config::load(Some(cli.config.as_path()))?;
            if let Some(base_url) = cli.backend_url {
                config.backend.base_url = base_url;
                config.validate()?;
            }
            watch(config, &url, start, duration).await
        }
    }
}

async fn watch(config: Config, url: &str, start: f64, duration: Option<Duration>) -> Result<()> {
    info!("Starting live commentary v{}", env!("CARGO_PKG_VERSION"));
    let start = start.max(0.0);

    let backend = HttpCommentaryBackend::new(&config.backend)?;
    info!("Using commentary backend {}", backend.endpoint());

    let engine = LiveCommentaryEngine::new(Arc::new(backend), config.engine)?;

    let mut snapshots = engine.subscribe();
    let printer = tokio::spawn(async move {
        let mut last_seen = None;
        while snapshots.changed().await.is_ok() {
            let current = snapshots.borrow_and_update().current.clone();
            if let Some(item) = current
                && last_seen.as_ref() != Some(&item)
            {
                println!("[{}] {}", format_timestamp(item.timestamp()), item.text());
                last_seen = Some(item);
            }
        }
    });

    let subject = engine.watch_url(url, start).await?;
    info!(
        "Resolved {} as {} subject '{}', playing from {}",
        url,
        subject.kind,
        subject.id,
        format_timestamp(start)
    );

    // Playback clock at real-time rate
    let started = Instant::now();
    let mut clock = interval(Duration::from_secs(1));
    clock.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted, stopping playback");
                break;
            }
            _ = clock.tick() => {
                let elapsed = started.elapsed();
                if duration.is_some_and(|limit| elapsed >= limit) {
                    info!("Reached end of requested playback");
                    break;
                }
                engine.set_playback_time(start + elapsed.as_secs_f64()).await;
            }
        }
    }

    engine.set_playing(false).await;
    engine.shutdown().await;

    let snapshot = engine.snapshot();
    info!(
        "Collected {} commentary item(s) for '{}'",
        snapshot.history.len(),
        snapshot.subject_id().unwrap_or_default()
    );

    drop(engine);
    let _ = printer.await;
    Ok(())
}
