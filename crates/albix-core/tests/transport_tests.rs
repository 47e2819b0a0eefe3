//! Drives `Player` end to end against the recording engine.

use std::path::{Path, PathBuf};

use albix_core::engine::{EngineCall, RecordingEngine};
use albix_core::transport::{END_OF_PLAYLIST, START_OF_PLAYLIST};
use albix_core::{
    EngineEvent, MediaKind, MediaStatus, Notice, Phase, Player, Severity, StationTable,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    paths: Vec<PathBuf>,
    player: Player<RecordingEngine>,
}

/// Creates empty media files with the given names and a player whose
/// playlist holds them in order.
fn fixture(names: &[&str]) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let paths: Vec<PathBuf> = names
        .iter()
        .map(|n| {
            let p = dir.path().join(n);
            std::fs::write(&p, b"").unwrap();
            p
        })
        .collect();
    let mut player = Player::with_rng(
        RecordingEngine::new(),
        StationTable::builtin(),
        StdRng::seed_from_u64(7),
    );
    let notices = player.add_paths(paths.clone());
    assert!(notices.is_empty());
    Fixture {
        _dir: dir,
        paths,
        player,
    }
}

fn has_notice(notices: &[Notice], severity: Severity, needle: &str) -> bool {
    notices
        .iter()
        .any(|n| n.severity == severity && (n.message.contains(needle) || n.title.contains(needle)))
}

fn load_calls(engine: &RecordingEngine) -> usize {
    engine
        .calls
        .iter()
        .filter(|c| matches!(c, EngineCall::LoadFile(..) | EngineCall::LoadUrl(_)))
        .count()
}

fn loaded_file(engine: &RecordingEngine) -> Option<(&Path, MediaKind)> {
    match engine.last_load() {
        Some(EngineCall::LoadFile(p, k)) => Some((p.as_path(), *k)),
        _ => None,
    }
}

#[test]
fn next_from_audio_to_video_shows_video_surface() {
    let mut f = fixture(&["a.mp3", "b.mp4", "c.ogg"]);
    f.player.play_index(0);
    assert!(!f.player.session().video_visible);

    let notices = f.player.next();
    assert!(notices.is_empty());
    let s = f.player.session();
    assert_eq!(s.current, Some(1));
    assert_eq!(s.phase, Phase::Playing);
    assert!(s.video_visible);
    assert_eq!(
        loaded_file(f.player.engine()),
        Some((f.paths[1].as_path(), MediaKind::Video))
    );
    assert_eq!(s.status, "Playing: b.mp4");
}

#[test]
fn next_on_single_track_ends_playlist_and_resets_timeline() {
    let mut f = fixture(&["a.mp3"]);
    f.player.play_index(0);
    f.player.handle_event(EngineEvent::DurationChanged(180_000));
    f.player.handle_event(EngineEvent::PositionChanged(42_000));
    assert_eq!(f.player.session().position_label(), "00:42");

    let notices = f.player.next();
    assert!(has_notice(&notices, Severity::Info, END_OF_PLAYLIST));
    let s = f.player.session();
    assert_eq!(s.phase, Phase::Stopped);
    assert_eq!(s.position_ms, 0);
    assert_eq!(s.position_label(), "00:00");
    assert!(!s.seekable());
    assert_eq!(s.status, END_OF_PLAYLIST);
    assert_eq!(f.player.engine().calls.last(), Some(&EngineCall::Stop));
}

#[test]
fn next_at_last_index_with_repeat_restarts_same_track() {
    let mut f = fixture(&["a.mp3", "b.mp4", "c.ogg"]);
    f.player.play_index(2);
    f.player.toggle_repeat();
    f.player.handle_event(EngineEvent::PositionChanged(95_000));

    let notices = f.player.next();
    assert!(notices.is_empty());
    let s = f.player.session();
    assert_eq!(s.current, Some(2));
    assert_eq!(s.phase, Phase::Playing);
    assert_eq!(s.position_ms, 0);
    assert_eq!(load_calls(f.player.engine()), 2);
    assert_eq!(
        loaded_file(f.player.engine()),
        Some((f.paths[2].as_path(), MediaKind::Audio))
    );
}

#[test]
fn shuffle_never_reselects_current_track() {
    let mut f = fixture(&["a.mp3", "b.mp4", "c.ogg", "d.flac"]);
    f.player.play_index(0);
    f.player.toggle_shuffle();

    let mut visited = [false; 4];
    for _ in 0..200 {
        let before = f.player.session().current.unwrap();
        f.player.next();
        let after = f.player.session().current.unwrap();
        assert_ne!(before, after);
        assert_eq!(f.player.session().phase, Phase::Playing);
        visited[after] = true;
    }
    assert!(visited.iter().all(|&v| v));
}

#[test]
fn shuffled_previous_never_reselects_current_track() {
    let mut f = fixture(&["a.mp3", "b.mp4", "c.ogg", "d.flac"]);
    f.player.play_index(2);
    f.player.toggle_shuffle();

    let mut visited = [false; 4];
    for _ in 0..200 {
        let before = f.player.session().current.unwrap();
        let notices = f.player.previous();
        let after = f.player.session().current.unwrap();
        assert_ne!(before, after);
        assert!(!has_notice(&notices, Severity::Info, START_OF_PLAYLIST));
        assert_eq!(f.player.session().phase, Phase::Playing);
        visited[after] = true;
    }
    assert!(visited.iter().all(|&v| v));
}

#[test]
fn shuffle_with_one_track_falls_back_to_sequential() {
    let mut f = fixture(&["a.mp3"]);
    f.player.play_index(0);
    f.player.toggle_shuffle();
    let notices = f.player.next();
    assert!(has_notice(&notices, Severity::Info, END_OF_PLAYLIST));
    assert_eq!(f.player.session().phase, Phase::Stopped);
}

#[test]
fn duplicate_end_of_media_advances_once() {
    let mut f = fixture(&["a.mp3", "b.mp4", "c.ogg"]);
    f.player.play_index(0);
    f.player
        .handle_event(EngineEvent::StatusChanged(MediaStatus::Loaded));

    f.player
        .handle_event(EngineEvent::StatusChanged(MediaStatus::EndOfMedia));
    f.player
        .handle_event(EngineEvent::StatusChanged(MediaStatus::EndOfMedia));
    assert_eq!(f.player.session().current, Some(1));
    assert_eq!(load_calls(f.player.engine()), 2);

    // b.mp4 reports Loaded; its own end advances again
    f.player
        .handle_event(EngineEvent::StatusChanged(MediaStatus::Loaded));
    f.player
        .handle_event(EngineEvent::StatusChanged(MediaStatus::EndOfMedia));
    assert_eq!(f.player.session().current, Some(2));
    assert_eq!(load_calls(f.player.engine()), 3);
}

#[test]
fn end_of_last_track_stops_once() {
    let mut f = fixture(&["a.mp3"]);
    f.player.play_index(0);
    f.player
        .handle_event(EngineEvent::StatusChanged(MediaStatus::Loaded));
    let first = f
        .player
        .handle_event(EngineEvent::StatusChanged(MediaStatus::EndOfMedia));
    let second = f
        .player
        .handle_event(EngineEvent::StatusChanged(MediaStatus::EndOfMedia));
    assert!(has_notice(&first, Severity::Info, END_OF_PLAYLIST));
    assert!(second.is_empty());
    assert_eq!(f.player.session().phase, Phase::Stopped);
}

#[test]
fn end_of_media_ignored_when_stopped_or_streaming() {
    let mut f = fixture(&["a.mp3", "b.mp4"]);
    f.player.play_index(0);
    f.player.stop();
    let notices = f
        .player
        .handle_event(EngineEvent::StatusChanged(MediaStatus::EndOfMedia));
    assert!(notices.is_empty());
    assert_eq!(f.player.session().phase, Phase::Stopped);
    assert_eq!(f.player.session().current, Some(0));

    f.player.play_station("FIP (France)");
    f.player
        .handle_event(EngineEvent::StatusChanged(MediaStatus::Loaded));
    f.player
        .handle_event(EngineEvent::StatusChanged(MediaStatus::EndOfMedia));
    assert_eq!(f.player.session().radio.as_deref(), Some("FIP (France)"));
    assert_eq!(f.player.session().phase, Phase::Playing);
}

#[test]
fn removing_current_track_stops_and_clamps_index() {
    let mut f = fixture(&["a.mp3", "b.mp4", "c.ogg"]);
    f.player.play_index(2);

    f.player.remove_indices(&[2]);
    let s = f.player.session();
    assert_eq!(s.phase, Phase::Stopped);
    assert_eq!(s.current, Some(1));
    assert_eq!(f.player.playlist().len(), 2);

    f.player.remove_indices(&[0, 1]);
    assert_eq!(f.player.session().current, None);
    assert!(f.player.playlist().is_empty());
}

#[test]
fn removing_earlier_track_keeps_playing_and_shifts_index() {
    let mut f = fixture(&["a.mp3", "b.mp4", "c.ogg"]);
    f.player.play_index(2);
    f.player.remove_indices(&[0]);
    let s = f.player.session();
    assert_eq!(s.phase, Phase::Playing);
    assert_eq!(s.current, Some(1));
    assert_eq!(
        f.player.playlist().get(1).unwrap().path,
        f.paths[2]
    );
}

#[test]
fn moving_entries_keeps_current_on_same_track() {
    let mut f = fixture(&["a.mp3", "b.mp4", "c.ogg"]);
    f.player.play_index(1);

    f.player.move_entry(1, 0);
    assert_eq!(f.player.session().current, Some(0));

    f.player.move_entry(2, 0);
    assert_eq!(f.player.session().current, Some(1));
    assert_eq!(f.player.playlist().get(1).unwrap().path, f.paths[1]);
}

#[test]
fn missing_file_is_reported_removed_and_stops() {
    let mut f = fixture(&["a.mp3", "b.mp4"]);
    f.player.play_index(1);
    std::fs::remove_file(&f.paths[0]).unwrap();

    let notices = f.player.play_index(0);
    assert!(has_notice(&notices, Severity::Warning, "File Not Found"));
    assert!(has_notice(
        &notices,
        Severity::Warning,
        &format!("File not found: {}", f.paths[0].display())
    ));
    assert_eq!(f.player.playlist().len(), 1);
    assert_eq!(f.player.session().phase, Phase::Stopped);
    assert_eq!(f.player.session().current, Some(0));
}

#[test]
fn engine_error_reports_and_stops() {
    let mut f = fixture(&["a.mp3", "b.mp4"]);
    f.player.play_index(1);
    let notices = f
        .player
        .handle_event(EngineEvent::Error("file_error".to_string()));
    assert!(has_notice(&notices, Severity::Error, "file_error"));
    let s = f.player.session();
    assert_eq!(s.phase, Phase::Stopped);
    assert!(!s.video_visible);
    assert_eq!(s.position_ms, 0);
}

#[test]
fn failed_load_reports_error() {
    let mut f = fixture(&["a.mp3"]);
    f.player.engine_mut().fail_next_load = Some("mpv is not running".to_string());
    let notices = f.player.play_index(0);
    assert!(has_notice(&notices, Severity::Error, "mpv is not running"));
    assert_eq!(f.player.session().phase, Phase::Stopped);
}

#[test]
fn play_pause_cycle() {
    let mut f = fixture(&["a.mp3", "b.mp4"]);
    assert_eq!(f.player.session().current, None);

    f.player.toggle_play_pause();
    assert_eq!(f.player.session().current, Some(0));
    assert_eq!(f.player.session().phase, Phase::Playing);

    f.player.toggle_play_pause();
    assert_eq!(f.player.session().phase, Phase::Paused);
    assert_eq!(f.player.session().phase.button_label(), "Play");
    assert_eq!(f.player.engine().calls.last(), Some(&EngineCall::Pause));

    f.player.toggle_play_pause();
    assert_eq!(f.player.session().phase, Phase::Playing);
    assert_eq!(f.player.session().status, "Playing: a.mp3");
}

#[test]
fn play_pause_on_empty_playlist_only_informs() {
    let mut player = Player::new(RecordingEngine::new(), StationTable::builtin());
    let notices = player.toggle_play_pause();
    assert!(has_notice(&notices, Severity::Info, "empty"));
    assert!(player.engine().calls.is_empty());
}

#[test]
fn previous_moves_back_and_reports_start() {
    let mut f = fixture(&["a.mp3", "b.mp4", "c.ogg"]);
    f.player.play_index(1);
    assert!(f.player.previous().is_empty());
    assert_eq!(f.player.session().current, Some(0));

    let notices = f.player.previous();
    assert!(has_notice(&notices, Severity::Info, START_OF_PLAYLIST));
    assert_eq!(f.player.session().current, Some(0));
    assert_eq!(f.player.session().phase, Phase::Playing);
}

#[test]
fn radio_streams_by_name() {
    let mut f = fixture(&["a.mp3"]);
    f.player.play_index(0);

    let notices = f.player.play_station("Radio Paradise (USA)");
    assert!(notices.is_empty());
    let s = f.player.session();
    assert_eq!(s.current, None);
    assert_eq!(s.status, "Streaming Radio: Radio Paradise (USA)");
    assert!(!s.seekable());
    assert_eq!(
        f.player.engine().last_load(),
        Some(&EngineCall::LoadUrl(
            "http://stream.radioparadise.com/mp3-192".to_string()
        ))
    );

    f.player.stop();
    assert_eq!(f.player.session().radio, None);

    let notices = f.player.play_station("Nowhere FM");
    assert!(has_notice(&notices, Severity::Warning, "Station Not Found"));
}

#[test]
fn custom_station_overwrites_by_name() {
    let mut player = Player::new(RecordingEngine::new(), StationTable::builtin());
    assert!(player
        .add_station("FIP (France)", "https://example.org/fip")
        .is_empty());
    assert_eq!(player.stations().len(), 8);
    player.play_station("FIP (France)");
    assert_eq!(
        player.engine().last_load(),
        Some(&EngineCall::LoadUrl("https://example.org/fip".to_string()))
    );

    let notices = player.add_station("Bad", "not a url");
    assert!(has_notice(&notices, Severity::Warning, "Invalid stream URL"));
}

#[test]
fn seek_and_volume_clamp() {
    let mut f = fixture(&["a.mp3"]);
    assert!(f.player.seek(1_000).is_empty());
    assert!(!f
        .player
        .engine()
        .calls
        .iter()
        .any(|c| matches!(c, EngineCall::Seek(_))));

    f.player.play_index(0);
    f.player.handle_event(EngineEvent::DurationChanged(30_000));
    f.player.seek(90_000);
    assert_eq!(f.player.session().position_ms, 30_000);
    assert_eq!(f.player.session().status, "Seeked to: 00:30");

    f.player.seek_relative(-45_000);
    assert_eq!(f.player.session().position_ms, 0);

    f.player.set_volume(150);
    assert_eq!(f.player.session().volume, 100);
    assert_eq!(f.player.session().status, "Volume: 100%");
    f.player.adjust_volume(-5);
    assert_eq!(f.player.engine().volume, 95);

    f.player.toggle_mute();
    assert!(f.player.session().muted);
    assert!(f.player.engine().muted);
}

#[test]
fn fullscreen_follows_video() {
    let mut f = fixture(&["a.mp3", "b.mp4"]);
    f.player.play_index(0);
    let notices = f.player.toggle_fullscreen();
    assert!(has_notice(&notices, Severity::Info, "Fullscreen"));
    assert!(!f.player.session().fullscreen);

    f.player.play_index(1);
    f.player.toggle_fullscreen();
    assert!(f.player.session().fullscreen);
    f.player.exit_fullscreen();
    assert!(!f.player.session().fullscreen);

    f.player.toggle_fullscreen();
    f.player.stop();
    assert!(!f.player.session().fullscreen);
    assert!(f
        .player
        .engine()
        .calls
        .ends_with(&[EngineCall::Stop, EngineCall::SetFullscreen(false)]));
}

#[test]
fn playlist_file_round_trip_through_player() {
    let mut f = fixture(&["a.mp3", "b.mp4", "c.ogg"]);
    let file = f._dir.path().join("saved.json");
    assert!(f.player.save_playlist(&file).is_empty());

    f.player.play_index(1);
    let mut other = Player::new(RecordingEngine::new(), StationTable::builtin());
    assert!(other.load_playlist(&file).is_empty());
    assert_eq!(other.playlist(), f.player.playlist());
    assert_eq!(other.session().current, None);

    let bad = f._dir.path().join("bad.json");
    std::fs::write(&bad, r#"[{"path": "/x.mp3", "type": "podcast"}]"#).unwrap();
    let notices = f.player.load_playlist(&bad);
    assert!(has_notice(&notices, Severity::Warning, "Invalid Playlist"));
    assert_eq!(f.player.playlist().len(), 3);
    assert_eq!(f.player.session().phase, Phase::Playing);
}

#[test]
fn unsupported_files_are_reported_and_skipped() {
    let mut player = Player::new(RecordingEngine::new(), StationTable::builtin());
    let notices = player.add_paths(["/m/a.mp3", "/m/cover.png", "/m/b.webm"]);
    assert!(has_notice(&notices, Severity::Warning, "cover.png"));
    assert_eq!(player.playlist().len(), 2);
    assert_eq!(player.playlist().get(1).unwrap().kind, MediaKind::Video);
}
