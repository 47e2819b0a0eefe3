//! AppState: read-only data handed to every component.
//!
//! Only the App event loop writes to it.

use std::collections::VecDeque;

use albix_core::lyrics::Lyrics;
use albix_core::protocol::Snapshot;
use albix_core::{Notice, PlaylistEntry};

use crate::action::Workspace;
use crate::widgets::status_bar::InputMode;

/// How many notices the history keeps.
pub const HISTORY_LEN: usize = 50;

pub struct AppState {
    /// Latest published player state.
    pub snapshot: Snapshot,
    /// Sidecar lyrics for the current track, if any were found.
    pub lyrics: Option<Lyrics>,

    pub workspace: Workspace,
    pub input_mode: InputMode,
    pub show_lyrics: bool,

    /// Most recent notices, newest last.
    pub history: VecDeque<Notice>,
}

impl AppState {
    pub fn new(show_lyrics: bool) -> Self {
        Self {
            snapshot: Snapshot::default(),
            lyrics: None,
            workspace: Workspace::Music,
            input_mode: InputMode::Normal,
            show_lyrics,
            history: VecDeque::new(),
        }
    }

    pub fn current_entry(&self) -> Option<&PlaylistEntry> {
        self.snapshot.current_entry()
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.history.push_back(notice);
        while self.history.len() > HISTORY_LEN {
            self.history.pop_front();
        }
    }
}
