//! Action enum: all user-initiated intents and internal events.

use albix_core::protocol::Command;

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    NowPlaying,
    Playlist,
    Stations,
    Lyrics,
    HelpOverlay,
}

/// What the bottom prompt is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Live filter for the focused list.
    Filter,
    /// One or more file or directory paths.
    AddPaths,
    SavePlaylist,
    LoadPlaylist,
    /// `name = url`
    AddStation,
    ImportStations,
}

impl PromptKind {
    pub fn label(self) -> &'static str {
        match self {
            PromptKind::Filter => "/",
            PromptKind::AddPaths => "add",
            PromptKind::SavePlaylist => "save playlist",
            PromptKind::LoadPlaylist => "open playlist",
            PromptKind::AddStation => "station (name = url)",
            PromptKind::ImportStations => "import stations",
        }
    }
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Player ───────────────────────────────────────────────────────────────
    SendCommand(Command),

    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    FocusPane(ComponentId),
    SwitchWorkspace(Workspace),
    JumpToCurrent,

    // ── Prompt ───────────────────────────────────────────────────────────────
    OpenPrompt(PromptKind),
    PromptSubmitted(PromptKind, String),
    FilterChanged(String),

    // ── UI toggles ───────────────────────────────────────────────────────────
    ToggleLyrics,
    ToggleHelp,
    ToggleKeys,
    ToggleTheme,
    CopyToClipboard(String),

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
    Resize(u16, u16),
}

/// Which workspace (tab) is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workspace {
    Music,
    Radio,
}

impl Workspace {
    pub fn title(self) -> &'static str {
        match self {
            Workspace::Music => "Local Music",
            Workspace::Radio => "Radio Stations",
        }
    }

    pub fn other(self) -> Self {
        match self {
            Workspace::Music => Workspace::Radio,
            Workspace::Radio => Workspace::Music,
        }
    }
}
