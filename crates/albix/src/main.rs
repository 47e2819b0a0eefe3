mod action;
mod app;
mod app_state;
mod component;
mod components;
mod core;
mod engine;
mod focus;
mod mpv;
mod theme;
mod widgets;

use std::path::PathBuf;
use std::time::Duration;

use albix_core::config::{Config, ThemeName};
use albix_core::platform;
use albix_core::protocol::{Broadcast, Command};
use albix_core::stations::{load_stations_from_toml, StationTable};
use clap::Parser;
use tokio::sync::{broadcast, mpsc};

/// Terminal media player for local audio/video files and internet radio.
#[derive(Debug, Parser)]
#[command(name = "albix", version, about)]
struct Cli {
    /// Files or folders to add to the playlist on start.
    paths: Vec<PathBuf>,

    /// Playlist JSON file to open on start.
    #[arg(long)]
    playlist: Option<PathBuf>,

    /// Config file to use instead of the default one.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start with the light theme.
    #[arg(long)]
    light: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = platform::log_file();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // RUST_LOG wins; default to debug for our own crates only.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info,albix=debug,albix_core=debug".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    eprintln!("albix log: {}", log_path.display());
    tracing::info!("albix starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("config {:?} unreadable, using defaults: {}", config_path, e);
            Config::default()
        }
    };
    theme::set_theme(if cli.light {
        ThemeName::Light
    } else {
        config.ui.theme
    });

    // ── Stations: built-ins plus the user's own ─────────────────────────────
    let mut stations = StationTable::builtin();
    let stations_toml = &config.paths.stations_toml;
    if stations_toml.exists() {
        match load_stations_from_toml(stations_toml) {
            Ok(custom) => {
                let n = stations.extend(custom);
                tracing::info!("loaded {} custom station(s) from {:?}", n, stations_toml);
            }
            Err(e) => tracing::warn!("stations file {:?} skipped: {}", stations_toml, e),
        }
    }

    // ── Broadcast channel (PlayerCore → TUI) ────────────────────────────────
    let (broadcast_tx, broadcast_rx) = broadcast::channel::<Broadcast>(1024);

    // ── CoreEvent channel (TUI → PlayerCore) ────────────────────────────────
    let (event_tx, event_rx) = mpsc::channel::<core::CoreEvent>(1024);

    let playlist_file = config.paths.playlist_file.clone();
    let show_lyrics = config.ui.show_lyrics;
    let player_core = core::PlayerCore::new(
        config,
        config_path,
        stations,
        broadcast_tx.clone(),
        event_tx.clone(),
    );
    let snapshot = player_core.snapshot();

    // ── Start-up commands from the command line ─────────────────────────────
    if let Some(path) = cli.playlist {
        event_tx
            .send(core::CoreEvent::Command(Command::LoadPlaylist { path }))
            .await?;
    }
    if !cli.paths.is_empty() {
        event_tx
            .send(core::CoreEvent::Command(Command::AddPaths { paths: cli.paths }))
            .await?;
    }

    let core_task = tokio::spawn(async move {
        if let Err(e) = player_core.run(event_rx).await {
            tracing::error!("PlayerCore exited with error: {}", e);
        }
    });

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let app = app::App::new(event_tx, snapshot, playlist_file, show_lyrics);
    app.run(broadcast_rx).await?;

    // the core saves preferences and stops mpv after Shutdown
    if tokio::time::timeout(Duration::from_secs(3), core_task).await.is_err() {
        tracing::warn!("PlayerCore did not stop in time");
    }
    tracing::info!("albix exited");
    Ok(())
}
