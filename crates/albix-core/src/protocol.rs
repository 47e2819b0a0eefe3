use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::engine::PlaybackEngine;
use crate::playlist::PlaylistEntry;
use crate::session::SessionState;
use crate::stations::Station;
use crate::transport::{Notice, Player};

/// Requests from the UI to the player core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd")]
pub enum Command {
    PlayIndex { index: usize },
    TogglePlayPause,
    Stop,
    Next,
    Previous,
    PlayStation { name: String },
    Seek { position_ms: u64 },
    SeekRelative { delta_ms: i64 },
    SetVolume { volume: u8 },
    AdjustVolume { delta: i16 },
    ToggleMute,
    ToggleShuffle,
    ToggleRepeat,
    ToggleFullscreen,
    ExitFullscreen,
    AddPaths { paths: Vec<PathBuf> },
    Remove { indices: Vec<usize> },
    Move { from: usize, to: usize },
    ClearPlaylist,
    SavePlaylist { path: PathBuf },
    LoadPlaylist { path: PathBuf },
    AddStation { name: String, url: String },
    RemoveStation { name: String },
    ImportStations { path: PathBuf },
}

/// Health of the media engine process as observed by the core.
///
/// Transitions:
///   Absent -> Starting -> Running -> Dead -> Starting ...
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub enum EngineHealth {
    #[default]
    Absent,
    Starting,
    Running,
    Dead,
}

impl EngineHealth {
    /// Short label for the header badge.
    pub fn badge_label(&self) -> Option<&str> {
        match self {
            EngineHealth::Absent | EngineHealth::Running => None,
            EngineHealth::Starting => Some("INIT"),
            EngineHealth::Dead => Some("DEAD"),
        }
    }
}

/// Read-only copy of the player published after every change. `rev` grows
/// on each publish so readers can skip redraws.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub rev: u64,
    pub session: SessionState,
    pub playlist: Vec<PlaylistEntry>,
    pub stations: Vec<Station>,
    #[serde(default)]
    pub engine_health: EngineHealth,
}

impl Snapshot {
    pub fn capture<E: PlaybackEngine>(player: &Player<E>, rev: u64, health: EngineHealth) -> Self {
        Self {
            rev,
            session: player.session().clone(),
            playlist: player.playlist().entries().to_vec(),
            stations: player.stations().as_slice().to_vec(),
            engine_health: health,
        }
    }

    pub fn current_entry(&self) -> Option<&PlaylistEntry> {
        self.session.current.and_then(|i| self.playlist.get(i))
    }
}

/// Core → UI messages.
#[derive(Debug, Clone)]
pub enum Broadcast {
    StateUpdated,
    Notice(Notice),
}

/// Route a command to the matching player operation.
pub fn dispatch<E: PlaybackEngine>(player: &mut Player<E>, cmd: Command) -> Vec<Notice> {
    match cmd {
        Command::PlayIndex { index } => player.play_index(index),
        Command::TogglePlayPause => player.toggle_play_pause(),
        Command::Stop => player.stop(),
        Command::Next => player.next(),
        Command::Previous => player.previous(),
        Command::PlayStation { name } => player.play_station(&name),
        Command::Seek { position_ms } => player.seek(position_ms),
        Command::SeekRelative { delta_ms } => player.seek_relative(delta_ms),
        Command::SetVolume { volume } => player.set_volume(volume),
        Command::AdjustVolume { delta } => player.adjust_volume(delta),
        Command::ToggleMute => player.toggle_mute(),
        Command::ToggleShuffle => player.toggle_shuffle(),
        Command::ToggleRepeat => player.toggle_repeat(),
        Command::ToggleFullscreen => player.toggle_fullscreen(),
        Command::ExitFullscreen => player.exit_fullscreen(),
        Command::AddPaths { paths } => player.add_paths(paths),
        Command::Remove { indices } => player.remove_indices(&indices),
        Command::Move { from, to } => player.move_entry(from, to),
        Command::ClearPlaylist => player.clear_playlist(),
        Command::SavePlaylist { path } => player.save_playlist(&path),
        Command::LoadPlaylist { path } => player.load_playlist(&path),
        Command::AddStation { name, url } => player.add_station(&name, &url),
        Command::RemoveStation { name } => player.remove_station(&name),
        Command::ImportStations { path } => player.import_stations(&path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RecordingEngine;
    use crate::stations::StationTable;

    #[test]
    fn command_json_is_tagged() {
        let cmd = Command::Move { from: 2, to: 0 };
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(json, r#"{"cmd":"Move","from":2,"to":0}"#);
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }

    #[test]
    fn snapshot_captures_player() {
        let mut player = Player::new(RecordingEngine::new(), StationTable::builtin());
        dispatch(
            &mut player,
            Command::AddPaths {
                paths: vec!["/m/a.mp3".into(), "/m/b.mkv".into()],
            },
        );
        dispatch(&mut player, Command::ToggleShuffle);

        let snap = Snapshot::capture(&player, 7, EngineHealth::Running);
        assert_eq!(snap.rev, 7);
        assert_eq!(snap.playlist.len(), 2);
        assert_eq!(snap.stations.len(), 8);
        assert!(snap.session.shuffle);
        assert!(snap.current_entry().is_none());
    }
}
