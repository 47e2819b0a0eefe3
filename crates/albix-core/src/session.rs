use serde::{Deserialize, Serialize};

pub const DEFAULT_VOLUME: u8 = 70;
pub const MAX_VOLUME: u8 = 100;

/// Transport phase as the user sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl Phase {
    /// Label for the play/pause control: what pressing it would do.
    pub fn button_label(self) -> &'static str {
        match self {
            Phase::Playing => "Pause",
            Phase::Paused | Phase::Stopped => "Play",
        }
    }
}

/// Everything about the current playback session. Lives only in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub current: Option<usize>,
    pub radio: Option<String>,
    pub phase: Phase,
    pub shuffle: bool,
    pub repeat: bool,
    pub volume: u8,
    pub muted: bool,
    pub duration_ms: u64,
    pub position_ms: u64,
    /// The engine is rendering video in its own window.
    pub video_visible: bool,
    pub fullscreen: bool,
    /// Engine reported buffering after the last load.
    pub buffering: bool,
    pub status: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            current: None,
            radio: None,
            phase: Phase::Stopped,
            shuffle: false,
            repeat: false,
            volume: DEFAULT_VOLUME,
            muted: false,
            duration_ms: 0,
            position_ms: 0,
            video_visible: false,
            fullscreen: false,
            buffering: false,
            status: String::new(),
        }
    }
}

impl SessionState {
    pub fn is_stopped(&self) -> bool {
        self.phase == Phase::Stopped
    }

    pub fn is_radio(&self) -> bool {
        self.radio.is_some()
    }

    /// Seek bar enabled: a local track is loaded.
    pub fn seekable(&self) -> bool {
        !self.is_stopped() && !self.is_radio() && self.current.is_some()
    }

    pub fn position_label(&self) -> String {
        clock_label(self.position_ms)
    }

    pub fn duration_label(&self) -> String {
        clock_label(self.duration_ms)
    }

    /// Reset the timeline to the stopped state.
    pub fn reset_timeline(&mut self) {
        self.position_ms = 0;
        self.duration_ms = 0;
        self.buffering = false;
    }
}

/// `MM:SS`; minutes keep counting past 59.
pub fn clock_label(ms: u64) -> String {
    let total = ms / 1000;
    format!("{:02}:{:02}", total / 60, total % 60)
}
