//! The seam between the transport and whatever actually decodes media.

use std::path::{Path, PathBuf};

use crate::media::MediaKind;

/// Engine state changes that matter to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaStatus {
    Loaded,
    Buffering,
    EndOfMedia,
}

/// Everything an engine reports back. One handler consumes all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    PositionChanged(u64),
    DurationChanged(u64),
    StatusChanged(MediaStatus),
    Error(String),
}

/// Playback primitives. Calls return once the request is queued; results
/// arrive later as [`EngineEvent`]s.
pub trait PlaybackEngine {
    fn load_file(&mut self, path: &Path, kind: MediaKind) -> anyhow::Result<()>;
    fn load_url(&mut self, url: &str) -> anyhow::Result<()>;
    fn play(&mut self) -> anyhow::Result<()>;
    fn pause(&mut self) -> anyhow::Result<()>;
    fn stop(&mut self) -> anyhow::Result<()>;
    fn seek(&mut self, position_ms: u64) -> anyhow::Result<()>;
    fn set_volume(&mut self, volume: u8) -> anyhow::Result<()>;
    fn volume(&self) -> u8;
    fn set_muted(&mut self, muted: bool) -> anyhow::Result<()>;
    fn is_muted(&self) -> bool;
    /// Last known duration of the loaded media, 0 when unknown.
    fn duration(&self) -> u64;

    fn set_fullscreen(&mut self, _on: bool) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    LoadFile(PathBuf, MediaKind),
    LoadUrl(String),
    Play,
    Pause,
    Stop,
    Seek(u64),
    SetVolume(u8),
    SetMuted(bool),
    SetFullscreen(bool),
}

/// In-memory engine that records every call. Used to drive the transport
/// without a media backend.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    pub calls: Vec<EngineCall>,
    pub volume: u8,
    pub muted: bool,
    pub duration_ms: u64,
    /// Make the next load fail with this message.
    pub fail_next_load: Option<String>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_load(&self) -> Option<&EngineCall> {
        self.calls
            .iter()
            .rev()
            .find(|c| matches!(c, EngineCall::LoadFile(..) | EngineCall::LoadUrl(_)))
    }

    fn check_load(&mut self) -> anyhow::Result<()> {
        match self.fail_next_load.take() {
            Some(msg) => Err(anyhow::anyhow!(msg)),
            None => Ok(()),
        }
    }
}

impl PlaybackEngine for RecordingEngine {
    fn load_file(&mut self, path: &Path, kind: MediaKind) -> anyhow::Result<()> {
        self.check_load()?;
        self.duration_ms = 0;
        self.calls.push(EngineCall::LoadFile(path.to_path_buf(), kind));
        Ok(())
    }

    fn load_url(&mut self, url: &str) -> anyhow::Result<()> {
        self.check_load()?;
        self.duration_ms = 0;
        self.calls.push(EngineCall::LoadUrl(url.to_string()));
        Ok(())
    }

    fn play(&mut self) -> anyhow::Result<()> {
        self.calls.push(EngineCall::Play);
        Ok(())
    }

    fn pause(&mut self) -> anyhow::Result<()> {
        self.calls.push(EngineCall::Pause);
        Ok(())
    }

    fn stop(&mut self) -> anyhow::Result<()> {
        self.calls.push(EngineCall::Stop);
        Ok(())
    }

    fn seek(&mut self, position_ms: u64) -> anyhow::Result<()> {
        self.calls.push(EngineCall::Seek(position_ms));
        Ok(())
    }

    fn set_volume(&mut self, volume: u8) -> anyhow::Result<()> {
        self.volume = volume;
        self.calls.push(EngineCall::SetVolume(volume));
        Ok(())
    }

    fn volume(&self) -> u8 {
        self.volume
    }

    fn set_muted(&mut self, muted: bool) -> anyhow::Result<()> {
        self.muted = muted;
        self.calls.push(EngineCall::SetMuted(muted));
        Ok(())
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn duration(&self) -> u64 {
        self.duration_ms
    }

    fn set_fullscreen(&mut self, on: bool) -> anyhow::Result<()> {
        self.calls.push(EngineCall::SetFullscreen(on));
        Ok(())
    }
}
