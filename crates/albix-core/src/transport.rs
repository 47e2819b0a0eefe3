//! Transport controller: the single owner of playlist, stations, session
//! state and the playback engine.
//!
//! Every operation mutates state synchronously and returns the notices the
//! user should see. Engine notifications come back through
//! [`Player::handle_event`].
//!
//! End-of-track handling is guarded. A load disarms the guard, the engine's
//! `Loaded` status for the new media arms it and the first `EndOfMedia`
//! disarms it again. Repeated end notifications for one track, including
//! stale ones that arrive after the next load, advance the playlist once.

use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::engine::{EngineEvent, MediaStatus, PlaybackEngine};
use crate::error::PlaylistError;
use crate::playlist::Playlist;
use crate::session::{clock_label, Phase, SessionState, MAX_VOLUME};
use crate::stations::{self, StationTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Something the user should be told about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub at: DateTime<Local>,
}

impl Notice {
    fn new(severity: Severity, title: &str, message: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.to_string(),
            message: message.into(),
            at: Local::now(),
        }
    }

    pub fn info(title: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, title, message)
    }

    pub fn warning(title: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, title, message)
    }

    pub fn error(title: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, title, message)
    }
}

pub const END_OF_PLAYLIST: &str = "End of playlist.";
pub const START_OF_PLAYLIST: &str = "Start of playlist.";

pub struct Player<E: PlaybackEngine> {
    playlist: Playlist,
    stations: StationTable,
    session: SessionState,
    engine: E,
    rng: StdRng,
    /// Armed once a local track reports `Loaded`, consumed by the first
    /// end-of-media.
    end_armed: bool,
}

impl<E: PlaybackEngine> Player<E> {
    pub fn new(engine: E, stations: StationTable) -> Self {
        Self::with_rng(engine, stations, StdRng::from_entropy())
    }

    pub fn with_rng(engine: E, stations: StationTable, rng: StdRng) -> Self {
        Self {
            playlist: Playlist::new(),
            stations,
            session: SessionState::default(),
            engine,
            rng,
            end_armed: false,
        }
    }

    /// Apply startup preferences without touching the status line.
    pub fn restore_preferences(&mut self, volume: u8, muted: bool, shuffle: bool, repeat: bool) {
        let volume = volume.min(MAX_VOLUME);
        if let Err(e) = self.engine.set_volume(volume) {
            debug!("initial volume not applied: {e:#}");
        }
        if let Err(e) = self.engine.set_muted(muted) {
            debug!("initial mute not applied: {e:#}");
        }
        self.session.volume = volume;
        self.session.muted = muted;
        self.session.shuffle = shuffle;
        self.session.repeat = repeat;
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn stations(&self) -> &StationTable {
        &self.stations
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    // ── Playback ────────────────────────────────────────────────────────────

    /// Load and play playlist entry `index`.
    pub fn play_index(&mut self, index: usize) -> Vec<Notice> {
        let Some(entry) = self.playlist.get(index).cloned() else {
            return vec![Notice::warning(
                "No Track",
                format!("There is no track at position {}.", index + 1),
            )];
        };

        if !entry.path.exists() {
            warn!("missing file {}", entry.path.display());
            let mut notices = vec![Notice::warning(
                "File Not Found",
                PlaylistError::NotFound(entry.path.clone()).to_string(),
            )];
            self.session.current = Some(index);
            notices.extend(self.remove_indices(&[index]));
            if !self.session.is_stopped() {
                notices.extend(self.stop());
            }
            return notices;
        }

        if let Err(e) = self.engine.load_file(&entry.path, entry.kind) {
            return self.fail(&e.to_string());
        }
        if let Err(e) = self.engine.play() {
            return self.fail(&e.to_string());
        }

        let name = entry.display_name();
        info!("playing {} ({})", entry.path.display(), entry.kind.label());
        self.session.current = Some(index);
        self.session.radio = None;
        self.session.phase = Phase::Playing;
        self.session.reset_timeline();
        self.session.video_visible = entry.kind.is_video();
        if !self.session.video_visible && self.session.fullscreen {
            self.session.fullscreen = false;
        }
        self.session.status = format!("Playing: {name}");
        self.end_armed = false;
        Vec::new()
    }

    pub fn toggle_play_pause(&mut self) -> Vec<Notice> {
        match self.session.phase {
            Phase::Playing => {
                if let Err(e) = self.engine.pause() {
                    return self.fail(&e.to_string());
                }
                self.session.phase = Phase::Paused;
                self.session.status = "Paused.".to_string();
                Vec::new()
            }
            Phase::Paused => {
                if let Err(e) = self.engine.play() {
                    return self.fail(&e.to_string());
                }
                self.session.phase = Phase::Playing;
                self.session.status = self.now_playing_label();
                Vec::new()
            }
            Phase::Stopped => {
                if self.playlist.is_empty() {
                    return vec![Notice::info("Playlist", "The playlist is empty.")];
                }
                let index = self
                    .session
                    .current
                    .filter(|&i| i < self.playlist.len())
                    .unwrap_or(0);
                self.play_index(index)
            }
        }
    }

    pub fn stop(&mut self) -> Vec<Notice> {
        if let Err(e) = self.engine.stop() {
            warn!("engine stop failed: {e:#}");
        }
        if self.session.fullscreen {
            if let Err(e) = self.engine.set_fullscreen(false) {
                debug!("leaving fullscreen failed: {e:#}");
            }
        }
        self.session.phase = Phase::Stopped;
        self.session.reset_timeline();
        self.session.video_visible = false;
        self.session.fullscreen = false;
        self.session.radio = None;
        self.session.status = "Playback stopped.".to_string();
        self.end_armed = false;
        Vec::new()
    }

    pub fn next(&mut self) -> Vec<Notice> {
        self.advance()
    }

    pub fn previous(&mut self) -> Vec<Notice> {
        let len = self.playlist.len();
        if len == 0 {
            return vec![Notice::info("Playlist", "The playlist is empty.")];
        }
        let current = self.session.current.filter(|&i| i < len);
        match current {
            Some(cur) if self.session.shuffle && len > 1 => {
                let target = self.random_index_except(cur, len);
                self.play_index(target)
            }
            Some(cur) if cur > 0 => self.play_index(cur - 1),
            _ => {
                let mut notices = self.play_index(0);
                notices.insert(0, Notice::info("Playlist", START_OF_PLAYLIST));
                if self.session.phase == Phase::Playing {
                    self.session.status = START_OF_PLAYLIST.to_string();
                }
                notices
            }
        }
    }

    /// Shared by "next" and end-of-track.
    fn advance(&mut self) -> Vec<Notice> {
        let len = self.playlist.len();
        if len == 0 {
            let mut notices = self.stop();
            notices.push(Notice::info("Playlist", END_OF_PLAYLIST));
            self.session.status = END_OF_PLAYLIST.to_string();
            return notices;
        }

        let Some(cur) = self.session.current.filter(|&i| i < len) else {
            return self.play_index(0);
        };

        if self.session.repeat {
            return self.play_index(cur);
        }

        if self.session.shuffle && len > 1 {
            let target = self.random_index_except(cur, len);
            return self.play_index(target);
        }

        if cur + 1 < len {
            self.play_index(cur + 1)
        } else {
            let mut notices = self.stop();
            notices.push(Notice::info("Playlist", END_OF_PLAYLIST));
            self.session.status = END_OF_PLAYLIST.to_string();
            notices
        }
    }

    /// Uniform over `0..len` without `exclude`. Needs `len > 1`.
    fn random_index_except(&mut self, exclude: usize, len: usize) -> usize {
        let pick = self.rng.gen_range(0..len - 1);
        if pick >= exclude {
            pick + 1
        } else {
            pick
        }
    }

    pub fn play_station(&mut self, name: &str) -> Vec<Notice> {
        let Some(url) = self.stations.url_of(name).map(str::to_string) else {
            return vec![Notice::warning(
                "Station Not Found",
                format!("No station named \"{name}\"."),
            )];
        };
        if let Err(e) = self.engine.load_url(&url) {
            return self.fail(&e.to_string());
        }
        if let Err(e) = self.engine.play() {
            return self.fail(&e.to_string());
        }
        info!("streaming {name} from {url}");
        self.session.current = None;
        self.session.radio = Some(name.to_string());
        self.session.phase = Phase::Playing;
        self.session.reset_timeline();
        self.session.video_visible = false;
        self.session.fullscreen = false;
        self.session.status = format!("Streaming Radio: {name}");
        self.end_armed = false;
        Vec::new()
    }

    pub fn seek(&mut self, position_ms: u64) -> Vec<Notice> {
        if !self.session.seekable() {
            return Vec::new();
        }
        let duration = self.session.duration_ms.max(self.engine.duration());
        let target = if duration > 0 {
            position_ms.min(duration)
        } else {
            position_ms
        };
        if let Err(e) = self.engine.seek(target) {
            return self.fail(&e.to_string());
        }
        self.session.position_ms = target;
        self.session.status = format!("Seeked to: {}", clock_label(target));
        Vec::new()
    }

    pub fn seek_relative(&mut self, delta_ms: i64) -> Vec<Notice> {
        let target = (self.session.position_ms as i64).saturating_add(delta_ms).max(0);
        self.seek(target as u64)
    }

    pub fn set_volume(&mut self, volume: u8) -> Vec<Notice> {
        let volume = volume.min(MAX_VOLUME);
        if let Err(e) = self.engine.set_volume(volume) {
            warn!("engine volume failed: {e:#}");
        }
        self.session.volume = volume;
        self.session.status = format!("Volume: {volume}%");
        Vec::new()
    }

    pub fn adjust_volume(&mut self, delta: i16) -> Vec<Notice> {
        let volume = (self.session.volume as i16 + delta).clamp(0, MAX_VOLUME as i16);
        self.set_volume(volume as u8)
    }

    pub fn toggle_mute(&mut self) -> Vec<Notice> {
        let muted = !self.session.muted;
        if let Err(e) = self.engine.set_muted(muted) {
            warn!("engine mute failed: {e:#}");
        }
        self.session.muted = muted;
        self.session.status = if muted { "Muted." } else { "Unmuted." }.to_string();
        Vec::new()
    }

    pub fn toggle_shuffle(&mut self) -> Vec<Notice> {
        self.session.shuffle = !self.session.shuffle;
        self.session.status = format!("Shuffle {}.", on_off(self.session.shuffle));
        Vec::new()
    }

    pub fn toggle_repeat(&mut self) -> Vec<Notice> {
        self.session.repeat = !self.session.repeat;
        self.session.status = format!("Repeat {}.", on_off(self.session.repeat));
        Vec::new()
    }

    pub fn toggle_fullscreen(&mut self) -> Vec<Notice> {
        if !self.session.fullscreen && !self.session.video_visible {
            return vec![Notice::info(
                "Fullscreen",
                "Fullscreen is available while a video is playing.",
            )];
        }
        self.set_fullscreen(!self.session.fullscreen)
    }

    pub fn exit_fullscreen(&mut self) -> Vec<Notice> {
        if !self.session.fullscreen {
            return Vec::new();
        }
        self.set_fullscreen(false)
    }

    fn set_fullscreen(&mut self, on: bool) -> Vec<Notice> {
        if let Err(e) = self.engine.set_fullscreen(on) {
            return vec![Notice::warning("Fullscreen", e.to_string())];
        }
        self.session.fullscreen = on;
        Vec::new()
    }

    // ── Playlist editing ────────────────────────────────────────────────────

    pub fn add_paths<I, P>(&mut self, paths: I) -> Vec<Notice>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let report = self.playlist.add_batch(paths);
        let mut notices = Vec::new();
        if !report.unsupported.is_empty() {
            let names: Vec<String> = report
                .unsupported
                .iter()
                .map(|p| {
                    p.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| p.display().to_string())
                })
                .collect();
            notices.push(Notice::warning(
                "Unsupported File",
                format!("Skipped unsupported file(s): {}", names.join(", ")),
            ));
        }
        self.session.status = match (report.added.len(), report.duplicates.len()) {
            (0, 0) => "No files added.".to_string(),
            (n, 0) => format!("Added {n} file(s) to the playlist."),
            (n, d) => format!("Added {n} file(s), {d} already in the playlist."),
        };
        notices
    }

    /// Remove entries. Removing the playing entry stops playback.
    pub fn remove_indices(&mut self, indices: &[usize]) -> Vec<Notice> {
        let removed = self.playlist.remove_many(indices);
        if removed.is_empty() {
            return Vec::new();
        }
        let mut notices = Vec::new();
        if let Some(cur) = self.session.current {
            let removed_current = removed.contains(&cur);
            if removed_current && self.session.radio.is_none() && !self.session.is_stopped() {
                notices.extend(self.stop());
            }
            let shift = removed.iter().filter(|&&i| i < cur).count();
            let adjusted = cur - shift;
            self.session.current = if self.playlist.is_empty() {
                None
            } else {
                Some(adjusted.min(self.playlist.len() - 1))
            };
        }
        self.session.status = format!("Removed {} file(s) from the playlist.", removed.len());
        notices
    }

    /// Reorder; the current index follows the entry it pointed at.
    pub fn move_entry(&mut self, from: usize, to: usize) -> Vec<Notice> {
        if let Err(e) = self.playlist.move_entry(from, to) {
            return vec![Notice::warning("Reorder", e.to_string())];
        }
        if let Some(cur) = self.session.current {
            self.session.current = Some(if cur == from {
                to
            } else if from < cur && cur <= to {
                cur - 1
            } else if to <= cur && cur < from {
                cur + 1
            } else {
                cur
            });
        }
        Vec::new()
    }

    pub fn clear_playlist(&mut self) -> Vec<Notice> {
        let notices = if self.session.current.is_some() && !self.session.is_stopped() {
            self.stop()
        } else {
            Vec::new()
        };
        self.playlist.clear();
        self.session.current = None;
        self.session.status = "Playlist cleared.".to_string();
        notices
    }

    pub fn save_playlist(&mut self, path: &Path) -> Vec<Notice> {
        match self.playlist.save(path) {
            Ok(()) => {
                info!("saved playlist to {}", path.display());
                self.session.status = format!("Playlist saved to {}", path.display());
                Vec::new()
            }
            Err(e) => vec![Notice::error("Save Playlist", e.to_string())],
        }
    }

    /// Replace the playlist with the file's contents. A bad file leaves the
    /// current playlist untouched.
    pub fn load_playlist(&mut self, path: &Path) -> Vec<Notice> {
        let loaded = match Playlist::load(path) {
            Ok(p) => p,
            Err(e @ PlaylistError::Malformed(_)) => {
                warn!("rejected playlist {}: {e}", path.display());
                return vec![Notice::warning("Invalid Playlist", e.to_string())];
            }
            Err(e) => return vec![Notice::error("Load Playlist", e.to_string())],
        };
        let mut notices = Vec::new();
        if !self.session.is_stopped() {
            notices.extend(self.stop());
        }
        self.playlist = loaded;
        self.session.current = None;
        self.session.status = format!("Loaded {} track(s).", self.playlist.len());
        notices
    }

    // ── Stations ────────────────────────────────────────────────────────────

    pub fn add_station(&mut self, name: &str, url: &str) -> Vec<Notice> {
        match self.stations.insert(name, url) {
            Ok(()) => {
                self.session.status = format!("Station added: {}", name.trim());
                Vec::new()
            }
            Err(e) => vec![Notice::warning("Add Station", e.to_string())],
        }
    }

    pub fn remove_station(&mut self, name: &str) -> Vec<Notice> {
        match self.stations.remove(name) {
            Ok(_) => {
                let mut notices = Vec::new();
                if self.session.radio.as_deref() == Some(name) {
                    notices.extend(self.stop());
                }
                self.session.status = format!("Station removed: {name}");
                notices
            }
            Err(e) => vec![Notice::warning("Remove Station", e.to_string())],
        }
    }

    /// Merge stations from an `.m3u` or `stations.toml` style file.
    pub fn import_stations(&mut self, path: &Path) -> Vec<Notice> {
        let is_toml = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
        let loaded = if is_toml {
            stations::load_stations_from_toml(path)
        } else {
            stations::load_stations_from_m3u(path)
        };
        match loaded {
            Ok(list) => {
                let total = list.len();
                let merged = self.stations.extend(list);
                self.session.status = format!("Imported {merged} station(s).");
                if merged < total {
                    vec![Notice::warning(
                        "Import Stations",
                        format!("Skipped {} invalid station(s).", total - merged),
                    )]
                } else {
                    Vec::new()
                }
            }
            Err(e) => vec![Notice::warning("Import Stations", e.to_string())],
        }
    }

    // ── Engine notifications ────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: EngineEvent) -> Vec<Notice> {
        match event {
            EngineEvent::PositionChanged(ms) => {
                if !self.session.is_stopped() {
                    self.session.position_ms = ms;
                }
                Vec::new()
            }
            EngineEvent::DurationChanged(ms) => {
                if !self.session.is_stopped() {
                    self.session.duration_ms = ms;
                }
                Vec::new()
            }
            EngineEvent::StatusChanged(MediaStatus::Loaded) => {
                self.session.buffering = false;
                if !self.session.is_stopped() && !self.session.is_radio() {
                    self.end_armed = true;
                }
                Vec::new()
            }
            EngineEvent::StatusChanged(MediaStatus::Buffering) => {
                self.session.buffering = true;
                Vec::new()
            }
            EngineEvent::StatusChanged(MediaStatus::EndOfMedia) => {
                if !self.end_armed || self.session.is_stopped() || self.session.is_radio() {
                    debug!("ignoring end-of-media");
                    return Vec::new();
                }
                self.end_armed = false;
                self.advance()
            }
            EngineEvent::Error(text) => self.fail(&text),
        }
    }

    fn fail(&mut self, text: &str) -> Vec<Notice> {
        warn!("playback error: {text}");
        let mut notices = vec![Notice::error(
            "Playback Error",
            format!("An error occurred during playback: {text}"),
        )];
        notices.extend(self.stop());
        self.session.status = format!("Error: {text}");
        notices
    }

    fn now_playing_label(&self) -> String {
        if let Some(name) = &self.session.radio {
            return format!("Streaming Radio: {name}");
        }
        self.session
            .current
            .and_then(|i| self.playlist.get(i))
            .map(|e| format!("Playing: {}", e.display_name()))
            .unwrap_or_default()
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}
