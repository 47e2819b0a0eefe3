/// PlayerCore: single-owner event loop for all mutable player state.
///
/// Every task that wants to change playback sends a `CoreEvent` here.
/// PlayerCore owns the `Player` and the `MpvDriver` exclusively. After each
/// event it republishes a `Snapshot` and broadcasts `Broadcast::StateUpdated`
/// plus any notices the player produced.
///
/// mpv is started lazily by the first command that needs it and is checked
/// for liveness on a 10 second heartbeat.
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use albix_core::config::{Config, ThemeName};
use albix_core::protocol::{dispatch, Broadcast, Command, EngineHealth, Snapshot};
use albix_core::{EngineEvent, Notice, Phase, Player, StationTable};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::engine::MpvEngine;
use crate::mpv::{MpvDriver, MpvEvent};

pub type SharedSnapshot = Arc<RwLock<Snapshot>>;

/// All inputs into the PlayerCore loop.
#[derive(Debug)]
pub enum CoreEvent {
    Command(Command),
    /// Check mpv process liveness.
    HeartbeatTick,
    /// Unsolicited mpv event forwarded from the reader task.
    Mpv(MpvEvent),
    /// UI preferences to write back with the rest of the config on exit.
    UiPrefs { theme: ThemeName, show_lyrics: bool },
    Shutdown,
}

pub struct PlayerCore {
    player: Player<MpvEngine>,
    driver: MpvDriver,
    config: Config,
    config_path: PathBuf,
    /// Loops mpv events back into our own queue.
    event_tx: mpsc::Sender<CoreEvent>,
    broadcast_tx: broadcast::Sender<Broadcast>,
    snapshot: SharedSnapshot,
    health: EngineHealth,
    rev: u64,
}

impl PlayerCore {
    pub fn new(
        config: Config,
        config_path: PathBuf,
        stations: StationTable,
        broadcast_tx: broadcast::Sender<Broadcast>,
        event_tx: mpsc::Sender<CoreEvent>,
    ) -> Self {
        let mut player = Player::new(MpvEngine::new(), stations);
        let playback = &config.playback;
        player.restore_preferences(
            playback.default_volume,
            playback.start_muted,
            playback.shuffle,
            playback.repeat,
        );
        let snapshot = Arc::new(RwLock::new(Snapshot::capture(
            &player,
            0,
            EngineHealth::Absent,
        )));

        Self {
            driver: MpvDriver::new(playback.default_volume),
            player,
            config,
            config_path,
            event_tx,
            broadcast_tx,
            snapshot,
            health: EngineHealth::Absent,
            rev: 0,
        }
    }

    /// Handle for readers. Always holds the latest published state.
    pub fn snapshot(&self) -> SharedSnapshot {
        Arc::clone(&self.snapshot)
    }

    /// Run until `Shutdown` arrives or every sender is dropped.
    pub async fn run(mut self, mut event_rx: mpsc::Receiver<CoreEvent>) -> anyhow::Result<()> {
        info!("PlayerCore: starting event loop");

        let heartbeat_tx = self.event_tx.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(tokio::time::Duration::from_secs(10)).await;
                if heartbeat_tx.send(CoreEvent::HeartbeatTick).await.is_err() {
                    break;
                }
            }
        });

        while let Some(evt) = event_rx.recv().await {
            match evt {
                CoreEvent::Shutdown => {
                    info!("PlayerCore: shutdown requested");
                    break;
                }
                CoreEvent::Command(cmd) => {
                    info!("PlayerCore: command {:?}", cmd);
                    let notices = self.handle_command(cmd).await;
                    self.publish(notices);
                }
                CoreEvent::Mpv(evt) => {
                    let translated = self.player.engine_mut().translate(&evt);
                    if let Some(engine_evt) = translated {
                        let notices = self.player.handle_event(engine_evt);
                        self.publish(notices);
                    }
                }
                CoreEvent::UiPrefs { theme, show_lyrics } => {
                    self.config.ui.theme = theme;
                    self.config.ui.show_lyrics = show_lyrics;
                }
                CoreEvent::HeartbeatTick => {
                    if self.player.engine().is_attached() && !self.driver.process_alive() {
                        warn!("PlayerCore: heartbeat: mpv process died");
                        let notices = self.engine_lost();
                        self.publish(notices);
                    }
                }
            }
        }

        self.cleanup().await
    }

    async fn handle_command(&mut self, cmd: Command) -> Vec<Notice> {
        if needs_engine(&cmd) && !self.ensure_engine().await {
            return vec![Notice::error(
                "Playback Error",
                "The media engine (mpv) could not be started.",
            )];
        }

        let persist_stations = matches!(
            cmd,
            Command::AddStation { .. } | Command::RemoveStation { .. } | Command::ImportStations { .. }
        );
        let mut notices = dispatch(&mut self.player, cmd);

        if persist_stations {
            let path = &self.config.paths.stations_toml;
            if let Err(e) = self.player.stations().save_custom(path) {
                warn!("PlayerCore: saving stations to {:?} failed: {}", path, e);
                notices.push(Notice::warning("Stations", e.to_string()));
            }
        }
        notices
    }

    /// Drop the engine connection and report the loss if something was playing.
    fn engine_lost(&mut self) -> Vec<Notice> {
        self.player.engine_mut().detach();
        self.set_health(EngineHealth::Dead);
        if self.player.session().phase == Phase::Stopped {
            return Vec::new();
        }
        self.player
            .handle_event(EngineEvent::Error("media engine exited".to_string()))
    }

    fn set_health(&mut self, health: EngineHealth) {
        if self.health != health {
            info!("PlayerCore: mpv health {:?} → {:?}", self.health, health);
            self.health = health;
        }
    }

    /// Make sure a live mpv connection is attached. Returns false if mpv
    /// could not be started.
    async fn ensure_engine(&mut self) -> bool {
        if self.player.engine().is_attached() {
            if self.driver.process_alive() {
                return true;
            }
            warn!("PlayerCore: mpv process died, dropping handle");
            self.player.engine_mut().detach();
            self.set_health(EngineHealth::Dead);
        }

        // One forwarder per connection.
        let (mpv_tx, mut mpv_rx) = mpsc::channel::<MpvEvent>(64);
        let core_tx = self.event_tx.clone();
        tokio::spawn(async move {
            while let Some(evt) = mpv_rx.recv().await {
                if core_tx.send(CoreEvent::Mpv(evt)).await.is_err() {
                    break;
                }
            }
        });

        self.driver.last_volume = self.player.session().volume;
        self.set_health(EngineHealth::Starting);
        self.publish(Vec::new());
        let handle = match self.driver.spawn_and_connect(mpv_tx).await {
            Ok(h) => h,
            Err(e) => {
                warn!("PlayerCore: failed to start mpv: {}", e);
                self.set_health(EngineHealth::Dead);
                return false;
            }
        };
        self.set_health(EngineHealth::Running);

        let observer = handle.clone();
        tokio::spawn(async move {
            observer.observe_all_properties().await;
        });
        self.player.engine_mut().attach(handle);
        true
    }

    fn publish(&mut self, notices: Vec<Notice>) {
        self.rev += 1;
        let snap = Snapshot::capture(&self.player, self.rev, self.health.clone());
        match self.snapshot.write() {
            Ok(mut guard) => *guard = snap,
            Err(poisoned) => *poisoned.into_inner() = snap,
        }
        for notice in notices {
            debug!("PlayerCore: notice {}: {}", notice.title, notice.message);
            let _ = self.broadcast_tx.send(Broadcast::Notice(notice));
        }
        let _ = self.broadcast_tx.send(Broadcast::StateUpdated);
    }

    async fn cleanup(&mut self) -> anyhow::Result<()> {
        info!("PlayerCore: cleanup, killing mpv");
        let session = self.player.session();
        let playback = &mut self.config.playback;
        playback.default_volume = session.volume;
        playback.start_muted = session.muted;
        playback.shuffle = session.shuffle;
        playback.repeat = session.repeat;
        if let Err(e) = self.config.save_to(&self.config_path) {
            warn!("PlayerCore: saving preferences failed: {}", e);
        }

        if let Some(handle) = self.player.engine().handle() {
            let _ = handle.send(serde_json::json!(["quit"])).await;
        }
        self.player.engine_mut().detach();
        self.driver.kill().await;
        Ok(())
    }
}

/// Commands that talk to mpv and so need it running first.
pub fn needs_engine(cmd: &Command) -> bool {
    matches!(
        cmd,
        Command::PlayIndex { .. }
            | Command::TogglePlayPause
            | Command::Next
            | Command::Previous
            | Command::PlayStation { .. }
    )
}
