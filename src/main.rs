//! triviad - console driver for the trivia engine.
//!
//! Reads chat lines from stdin as `name: text`, prints every outbound
//! notification as one JSON object per line. `/players N` sets the number of
//! connected participants.

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use trivia_ng::config::{LogFormat, validation};
use trivia_ng::{BroadcastFanout, Config, GameHandle, GameRules, MemoryStore, StaticDirectory, TriviaActor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "trivia.toml".to_string());

    let config = Config::load(&config_path)?;
    init_tracing(&config);

    if let Err(errors) = validation::validate(&config) {
        for e in &errors {
            error!(path = %config_path, error = %e, "Invalid configuration");
        }
        anyhow::bail!("{} configuration error(s) in {}", errors.len(), config_path);
    }

    trivia_ng::metrics::init();

    let store = MemoryStore::load(&config.questions.path).map_err(|e| {
        error!(path = %config.questions.path, error = %e, "Failed to load questions");
        e
    })?;
    info!(
        questions = store.question_count(),
        admins = config.admin.len(),
        "Starting triviad"
    );

    let directory = Arc::new(StaticDirectory::from_blocks(&config.admin));
    let fanout = BroadcastFanout::new(256);
    let mut outbound = fanout.subscribe();

    let handle = TriviaActor::spawn(
        GameRules::from(&config.game),
        Arc::new(store),
        directory.clone(),
        Arc::new(fanout),
    );
    handle.set_player_count(1)?;

    tokio::spawn(async move {
        loop {
            match outbound.recv().await {
                Ok(msg) => match serde_json::to_string(&msg) {
                    Ok(line) => println!("{line}"),
                    Err(e) => warn!(error = %e, "Failed to encode outbound message"),
                },
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    warn!(skipped = n, "Console output lagging");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => handle_line(&handle, &directory, &line)?,
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                break;
            }
        }
    }

    handle.shutdown()?;
    handle.closed().await;
    info!(metrics = %trivia_ng::metrics::gather_metrics(), "Final metrics");
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match config.log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn handle_line(handle: &GameHandle, directory: &StaticDirectory, line: &str) -> anyhow::Result<()> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(());
    }

    if let Some(count) = line.strip_prefix("/players") {
        match count.trim().parse::<usize>() {
            Ok(n) => handle.set_player_count(n)?,
            Err(_) => warn!(input = %line, "Usage: /players N"),
        }
        return Ok(());
    }

    match line.split_once(':') {
        Some((name, text)) if !name.trim().is_empty() => {
            let player = directory.resolve(name.trim());
            handle.submit_chat(player, text.trim())?;
        }
        _ => warn!(input = %line, "Expected `name: text`"),
    }
    Ok(())
}
