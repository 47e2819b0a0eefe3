//! App: component-based terminal event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background tasks.
//! - The event loop draws each frame, then awaits the next message.
//! - Components return `Vec<Action>`; App dispatches each Action.
//! - Commands to the player flow out through the `CoreEvent` channel.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use albix_core::lyrics;
use albix_core::playlist::parse_dropped_paths;
use albix_core::protocol::{Broadcast, Command, EngineHealth, Snapshot};
use albix_core::Notice;
use ratatui::crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste,
        EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame, Terminal,
};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::{
    action::{Action, ComponentId, PromptKind, Workspace},
    app_state::AppState,
    component::Component,
    components::{
        help_overlay::HelpOverlay, lyrics_panel::LyricsPanel, now_playing::NowPlaying,
        playlist_view::PlaylistView, station_list::StationList,
    },
    core::{CoreEvent, SharedSnapshot},
    focus::FocusRing,
    theme::{self, palette, style_base},
    widgets::{
        prompt_input::{parse_station_entry, PromptAction, PromptInput},
        status_bar::{self, InputMode},
        toast::ToastManager,
    },
};

/// Seek step for `,` / `.`; `<` / `>` jump further.
const SEEK_STEP_MS: i64 = 10_000;
const SEEK_LONG_STEP_MS: i64 = 60_000;
const VOLUME_STEP: i16 = 5;

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    StateUpdated(Snapshot),
    Notice(Notice),
}

/// Last-drawn layout rects, for mouse hit-testing.
#[derive(Default, Clone)]
struct PaneAreas {
    now_playing: Rect,
    list: Rect,
    lyrics: Rect,
}

pub struct App {
    pub state: AppState,

    // ── Components ────────────────────────────────────────────────────────────
    now_playing: NowPlaying,
    playlist_view: PlaylistView,
    station_list: StationList,
    lyrics_panel: LyricsPanel,
    help_overlay: HelpOverlay,

    focus: FocusRing,
    prompt: PromptInput,
    toast: ToastManager,
    show_keys_bar: bool,

    cmd_tx: mpsc::Sender<CoreEvent>,
    snapshot: SharedSnapshot,
    /// Default target for the save/open prompts.
    playlist_file: PathBuf,
    /// Track the loaded lyrics belong to.
    lyrics_track: Option<PathBuf>,
    pane_areas: PaneAreas,
    should_quit: bool,
}

fn focus_items(workspace: Workspace, show_lyrics: bool) -> Vec<ComponentId> {
    match workspace {
        Workspace::Music if show_lyrics => vec![ComponentId::Playlist, ComponentId::Lyrics],
        Workspace::Music => vec![ComponentId::Playlist],
        Workspace::Radio => vec![ComponentId::Stations],
    }
}

fn hit(r: Rect, col: u16, row: u16) -> bool {
    r.width > 0
        && r.height > 0
        && col >= r.x
        && col < r.x + r.width
        && row >= r.y
        && row < r.y + r.height
}

fn read_snapshot(shared: &SharedSnapshot) -> Snapshot {
    match shared.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

impl App {
    pub fn new(
        cmd_tx: mpsc::Sender<CoreEvent>,
        snapshot: SharedSnapshot,
        playlist_file: PathBuf,
        show_lyrics: bool,
    ) -> Self {
        let mut state = AppState::new(show_lyrics);
        state.snapshot = read_snapshot(&snapshot);
        let focus = FocusRing::new(focus_items(state.workspace, show_lyrics));

        let mut app = Self {
            state,
            now_playing: NowPlaying::new(),
            playlist_view: PlaylistView::new(),
            station_list: StationList::new(),
            lyrics_panel: LyricsPanel::new(),
            help_overlay: HelpOverlay::new(),
            focus,
            prompt: PromptInput::default(),
            toast: ToastManager::new(),
            show_keys_bar: true,
            cmd_tx,
            snapshot,
            playlist_file,
            lyrics_track: None,
            pane_areas: PaneAreas::default(),
            should_quit: false,
        };
        app.sync_components();
        app
    }

    pub async fn run(mut self, mut broadcast_rx: broadcast::Receiver<Broadcast>) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste
        )?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppMessage>(1024);

        // ── Background task: keyboard/mouse/paste events ──────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Background task: broadcast receiver (PlayerCore → AppMessage) ──────
        let bc_tx = tx.clone();
        let bc_snapshot = self.snapshot.clone();
        tokio::spawn(async move {
            loop {
                match broadcast_rx.recv().await {
                    Ok(msg) => {
                        let app_msg = match msg {
                            Broadcast::StateUpdated => {
                                AppMessage::StateUpdated(read_snapshot(&bc_snapshot))
                            }
                            Broadcast::Notice(n) => AppMessage::Notice(n),
                        };
                        if bc_tx.send(app_msg).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("broadcast receiver lagged by {} messages", n);
                        let _ = bc_tx
                            .send(AppMessage::StateUpdated(read_snapshot(&bc_snapshot)))
                            .await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        // Toast expiry + spinner animation.
        let mut toast_tick = tokio::time::interval(Duration::from_millis(100));
        toast_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    const MAX_DRAIN: usize = 256;
                    let mut redraw = self.handle_message(msg).await;
                    let mut drained = 0usize;
                    // coalesce position ticks: only the newest snapshot matters
                    let mut latest_state: Option<Snapshot> = None;
                    while drained < MAX_DRAIN {
                        let Ok(next) = rx.try_recv() else { break };
                        drained += 1;
                        match next {
                            AppMessage::StateUpdated(snap) => latest_state = Some(snap),
                            other => {
                                if let Some(snap) = latest_state.take() {
                                    redraw |= self.handle_message(AppMessage::StateUpdated(snap)).await;
                                }
                                redraw |= self.handle_message(other).await;
                            }
                        }
                    }
                    if let Some(snap) = latest_state {
                        redraw |= self.handle_message(AppMessage::StateUpdated(snap)).await;
                    }
                    needs_redraw = redraw;
                }

                _ = toast_tick.tick() => {
                    if !self.toast.is_empty() {
                        self.toast.tick();
                        needs_redraw = true;
                    }
                }
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        info!("tui shutting down");
        let _ = self.cmd_tx.send(CoreEvent::Shutdown).await;
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        )?;
        terminal.show_cursor()?;
        Ok(())
    }

    /// Returns whether a redraw is needed.
    async fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(ev) => match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        return false;
                    }
                    for a in self.handle_key(key) {
                        self.dispatch(a).await;
                    }
                }
                Event::Mouse(mouse) => {
                    if matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
                        return false;
                    }
                    for a in self.handle_mouse(mouse) {
                        self.dispatch(a).await;
                    }
                }
                Event::Paste(text) => {
                    for a in self.handle_paste(&text) {
                        self.dispatch(a).await;
                    }
                }
                Event::Resize(w, h) => self.dispatch(Action::Resize(w, h)).await,
                _ => return false,
            },
            AppMessage::StateUpdated(snap) => {
                if snap.rev != 0 && snap.rev == self.state.snapshot.rev {
                    return false;
                }
                self.on_state_updated(snap);
            }
            AppMessage::Notice(notice) => {
                self.toast.notice(&notice);
                self.state.push_notice(notice);
            }
        }
        true
    }

    fn on_state_updated(&mut self, snap: Snapshot) {
        let starting = snap.engine_health == EngineHealth::Starting;
        if starting && !self.toast.has_spinner() {
            self.toast.spinner("starting mpv");
        } else if !starting && self.toast.has_spinner() {
            self.toast.dismiss_spinner();
        }
        self.state.snapshot = snap;
        self.refresh_lyrics();
        self.sync_components();
    }

    fn sync_components(&mut self) {
        let s = &self.state;
        self.now_playing.on_state(s);
        self.playlist_view.on_state(s);
        self.station_list.on_state(s);
        self.lyrics_panel.on_state(s);
    }

    /// Load sidecar lyrics when the current local track changes.
    fn refresh_lyrics(&mut self) {
        let track = if self.state.snapshot.session.is_radio() {
            None
        } else {
            self.state.current_entry().map(|e| e.path.clone())
        };
        if track == self.lyrics_track {
            return;
        }
        self.state.lyrics = track.as_deref().and_then(|path| match lyrics::load_for_track(path) {
            Ok(l) => {
                debug!("lyrics loaded from {:?}", l.source);
                Some(l)
            }
            Err(e) => {
                debug!("no lyrics for {:?}: {}", path, e);
                None
            }
        });
        self.lyrics_track = track;
    }

    // ── Keyboard ──────────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Action::Quit];
        }

        if self.prompt.is_active() {
            let kind = self.prompt.kind();
            let actions = match self.prompt.handle_key(key) {
                PromptAction::Changed(PromptKind::Filter, q) => vec![Action::FilterChanged(q)],
                PromptAction::Changed(..) => vec![],
                // the filter stays applied after Enter
                PromptAction::Submitted(PromptKind::Filter, _) => vec![],
                PromptAction::Submitted(kind, text) => vec![Action::PromptSubmitted(kind, text)],
                PromptAction::Cancelled if kind == Some(PromptKind::Filter) => {
                    vec![Action::FilterChanged(String::new())]
                }
                PromptAction::Cancelled => vec![],
            };
            self.sync_input_mode();
            return actions;
        }

        if self.help_overlay.visible {
            return self.help_overlay.handle_key(key, &self.state);
        }

        let session = &self.state.snapshot.session;
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        let cmd = |c: Command| vec![Action::SendCommand(c)];
        match key.code {
            KeyCode::Char('q') => return vec![Action::Quit],
            KeyCode::Char('?') => return vec![Action::ToggleHelp],
            KeyCode::Tab => return vec![Action::SwitchWorkspace(self.state.workspace.other())],
            KeyCode::BackTab | KeyCode::Char(']') => return vec![Action::FocusNext],
            KeyCode::Char('[') => return vec![Action::FocusPrev],
            KeyCode::Char('1') => return vec![Action::FocusPane(self.focus_items()[0])],
            KeyCode::Char('2') if self.state.workspace == Workspace::Music => {
                return vec![Action::FocusPane(ComponentId::Lyrics)];
            }

            KeyCode::F(11) | KeyCode::Char('f') => return cmd(Command::ToggleFullscreen),
            KeyCode::Esc if session.fullscreen => return cmd(Command::ExitFullscreen),
            KeyCode::Char(' ') => return cmd(Command::TogglePlayPause),
            KeyCode::Char('s') => return cmd(Command::Stop),
            KeyCode::Char('n') => return cmd(Command::Next),
            KeyCode::Char('p') => return cmd(Command::Previous),
            KeyCode::Char(',') => return cmd(Command::SeekRelative { delta_ms: -SEEK_STEP_MS }),
            KeyCode::Char('.') => return cmd(Command::SeekRelative { delta_ms: SEEK_STEP_MS }),
            KeyCode::Char('<') => {
                return cmd(Command::SeekRelative { delta_ms: -SEEK_LONG_STEP_MS })
            }
            KeyCode::Char('>') => return cmd(Command::SeekRelative { delta_ms: SEEK_LONG_STEP_MS }),
            KeyCode::Left | KeyCode::Char('-') => {
                let delta = if shift { -4 * VOLUME_STEP } else { -VOLUME_STEP };
                return cmd(Command::AdjustVolume { delta });
            }
            KeyCode::Right | KeyCode::Char('=') => {
                let delta = if shift { 4 * VOLUME_STEP } else { VOLUME_STEP };
                return cmd(Command::AdjustVolume { delta });
            }
            KeyCode::Char('m') => return cmd(Command::ToggleMute),
            KeyCode::Char('z') => return cmd(Command::ToggleShuffle),
            KeyCode::Char('x') => return cmd(Command::ToggleRepeat),

            KeyCode::Char('a') => return vec![Action::OpenPrompt(PromptKind::AddPaths)],
            KeyCode::Char('w') => return vec![Action::OpenPrompt(PromptKind::SavePlaylist)],
            KeyCode::Char('o') => return vec![Action::OpenPrompt(PromptKind::LoadPlaylist)],
            KeyCode::Char('+') => return vec![Action::OpenPrompt(PromptKind::AddStation)],
            KeyCode::Char('i') => return vec![Action::OpenPrompt(PromptKind::ImportStations)],

            KeyCode::Char('L') => return vec![Action::ToggleLyrics],
            KeyCode::Char('t') => return vec![Action::ToggleTheme],
            KeyCode::Char('b') => return vec![Action::ToggleKeys],
            _ => {}
        }

        let s = &self.state;
        match self.focus.current() {
            Some(ComponentId::Playlist) => self.playlist_view.handle_key(key, s),
            Some(ComponentId::Stations) => self.station_list.handle_key(key, s),
            Some(ComponentId::Lyrics) => self.lyrics_panel.handle_key(key, s),
            _ => vec![],
        }
    }

    fn focus_items(&self) -> Vec<ComponentId> {
        focus_items(self.state.workspace, self.state.show_lyrics)
    }

    // ── Mouse ─────────────────────────────────────────────────────────────────

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        if self.help_overlay.visible || self.prompt.is_active() {
            return vec![];
        }
        let (col, row) = (event.column, event.row);
        let areas = self.pane_areas.clone();
        let s = &self.state;

        if hit(areas.now_playing, col, row) {
            return self.now_playing.handle_mouse(event, areas.now_playing, s);
        }

        let (id, mut actions) = if hit(areas.list, col, row) {
            match s.workspace {
                Workspace::Music => (
                    ComponentId::Playlist,
                    self.playlist_view.handle_mouse(event, areas.list, s),
                ),
                Workspace::Radio => (
                    ComponentId::Stations,
                    self.station_list.handle_mouse(event, areas.list, s),
                ),
            }
        } else if hit(areas.lyrics, col, row) {
            (
                ComponentId::Lyrics,
                self.lyrics_panel.handle_mouse(event, areas.lyrics, s),
            )
        } else {
            return vec![];
        };
        if !self.focus.is_focused(id) && matches!(event.kind, MouseEventKind::Down(_)) {
            actions.insert(0, Action::FocusPane(id));
        }
        actions
    }

    // ── Paste / drop ──────────────────────────────────────────────────────────

    /// Terminals deliver dropped files as pasted text.
    fn handle_paste(&mut self, text: &str) -> Vec<Action> {
        if self.prompt.is_active() {
            self.prompt.paste(text);
            if self.prompt.kind() == Some(PromptKind::Filter) {
                return vec![Action::FilterChanged(self.prompt.text().to_string())];
            }
            return vec![];
        }
        let paths = parse_dropped_paths(text);
        if paths.is_empty() {
            self.toast.warning("nothing to add from the dropped text");
            return vec![];
        }
        info!("drop: {} path(s)", paths.len());
        vec![
            Action::SwitchWorkspace(Workspace::Music),
            Action::SendCommand(Command::AddPaths { paths }),
        ]
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    async fn dispatch(&mut self, action: Action) {
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.playlist_view.on_action(&action, s));
            out.extend(self.station_list.on_action(&action, s));
            out.extend(self.lyrics_panel.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out
        };

        self.apply_action(action).await;

        for a in secondary {
            self.apply_action(a).await;
        }
    }

    async fn apply_action(&mut self, action: Action) {
        debug!("apply_action: {:?}", action);
        match action {
            Action::SendCommand(cmd) => self.send_cmd(cmd).await,

            Action::FocusNext => {
                self.focus.next();
            }
            Action::FocusPrev => {
                self.focus.prev();
            }
            Action::FocusPane(id) => {
                if id == ComponentId::Lyrics && !self.state.show_lyrics {
                    self.toggle_lyrics().await;
                }
                self.focus.set(id);
            }
            Action::SwitchWorkspace(ws) => {
                if ws != self.state.workspace {
                    if self.prompt.kind() == Some(PromptKind::Filter) {
                        self.prompt.close();
                        self.sync_input_mode();
                    }
                    self.state.workspace = ws;
                    self.focus.set_items(self.focus_items());
                }
            }
            Action::JumpToCurrent | Action::FilterChanged(_) | Action::Resize(..) => {}

            Action::OpenPrompt(kind) => {
                let initial = match kind {
                    PromptKind::SavePlaylist | PromptKind::LoadPlaylist => {
                        self.playlist_file.display().to_string()
                    }
                    _ => String::new(),
                };
                self.prompt.open(kind, &initial);
                self.sync_input_mode();
            }
            Action::PromptSubmitted(kind, text) => self.on_prompt_submitted(kind, text).await,

            Action::ToggleLyrics => self.toggle_lyrics().await,
            Action::ToggleHelp => {}
            Action::ToggleKeys => self.show_keys_bar = !self.show_keys_bar,
            Action::ToggleTheme => {
                let name = theme::toggle_theme();
                info!("theme switched to {:?}", name);
                self.send_ui_prefs().await;
            }
            Action::CopyToClipboard(text) => {
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
                    Ok(()) => {
                        let display = if text.chars().count() > 40 {
                            format!("{}…", text.chars().take(40).collect::<String>())
                        } else {
                            text
                        };
                        self.toast.info(format!("copied: {}", display));
                    }
                    Err(e) => {
                        warn!("clipboard error: {}", e);
                        self.toast.error(format!("clipboard error: {}", e));
                    }
                }
            }

            Action::Quit => self.should_quit = true,
        }
    }

    async fn on_prompt_submitted(&mut self, kind: PromptKind, text: String) {
        let path_or_default = |text: &str, default: &PathBuf| {
            if text.is_empty() {
                default.clone()
            } else {
                PathBuf::from(text)
            }
        };
        match kind {
            PromptKind::Filter => {}
            PromptKind::AddPaths => {
                let paths = parse_dropped_paths(&text);
                if paths.is_empty() {
                    return;
                }
                self.send_cmd(Command::AddPaths { paths }).await;
            }
            PromptKind::SavePlaylist => {
                let path = path_or_default(&text, &self.playlist_file);
                self.send_cmd(Command::SavePlaylist { path }).await;
            }
            PromptKind::LoadPlaylist => {
                let path = path_or_default(&text, &self.playlist_file);
                self.send_cmd(Command::LoadPlaylist { path }).await;
            }
            PromptKind::AddStation => match parse_station_entry(&text) {
                Some((name, url)) => self.send_cmd(Command::AddStation { name, url }).await,
                None => self.toast.warning("expected: name = url"),
            },
            PromptKind::ImportStations => {
                if !text.is_empty() {
                    let path = PathBuf::from(text);
                    self.send_cmd(Command::ImportStations { path }).await;
                }
            }
        }
    }

    async fn toggle_lyrics(&mut self) {
        self.state.show_lyrics = !self.state.show_lyrics;
        self.focus.set_items(self.focus_items());
        self.send_ui_prefs().await;
    }

    async fn send_ui_prefs(&self) {
        let _ = self
            .cmd_tx
            .send(CoreEvent::UiPrefs {
                theme: theme::current_theme(),
                show_lyrics: self.state.show_lyrics,
            })
            .await;
    }

    async fn send_cmd(&self, cmd: Command) {
        let _ = self.cmd_tx.send(CoreEvent::Command(cmd)).await;
    }

    fn sync_input_mode(&mut self) {
        self.state.input_mode = if self.prompt.is_active() {
            InputMode::Prompt
        } else {
            InputMode::Normal
        };
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(style_base()), area);

        let prompt_h = u16::from(self.prompt.is_active());
        let keys_h = u16::from(self.show_keys_bar);
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(NowPlaying::HEIGHT),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(prompt_h),
                Constraint::Length(1),
                Constraint::Length(keys_h),
            ])
            .split(area);

        self.now_playing.draw(frame, outer[0], false, &self.state);
        self.pane_areas.now_playing = outer[0];

        draw_tabs(frame, outer[1], self.state.workspace);

        match self.state.workspace {
            Workspace::Music => self.draw_music(frame, outer[2]),
            Workspace::Radio => {
                let focused = self.focus.is_focused(ComponentId::Stations);
                self.station_list.draw(frame, outer[2], focused, &self.state);
                self.pane_areas.list = outer[2];
                self.pane_areas.lyrics = Rect::default();
            }
        }

        if self.prompt.is_active() {
            self.prompt.draw(frame, outer[3]);
        }
        status_bar::draw_status_line(
            frame,
            outer[4],
            &self.state.snapshot.session.status,
            &self.state.snapshot.engine_health,
            self.state.history.back(),
        );
        if self.show_keys_bar {
            status_bar::draw_keys_bar(frame, outer[5], self.state.input_mode, self.state.workspace);
        }

        self.help_overlay.draw(frame, area, false, &self.state);
        self.toast.draw(frame, area);
    }

    fn draw_music(&mut self, frame: &mut Frame, area: Rect) {
        let playlist_focused = self.focus.is_focused(ComponentId::Playlist);
        if !self.state.show_lyrics {
            self.playlist_view.draw(frame, area, playlist_focused, &self.state);
            self.pane_areas.list = area;
            self.pane_areas.lyrics = Rect::default();
            return;
        }
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);
        self.playlist_view.draw(frame, cols[0], playlist_focused, &self.state);
        let lyrics_focused = self.focus.is_focused(ComponentId::Lyrics);
        self.lyrics_panel.draw(frame, cols[1], lyrics_focused, &self.state);
        self.pane_areas.list = cols[0];
        self.pane_areas.lyrics = cols[1];
    }
}

/// One-row workspace switcher: `Local Music | Radio Stations`.
fn draw_tabs(frame: &mut Frame, area: Rect, active: Workspace) {
    let p = palette();
    let tab = |ws: Workspace| {
        if ws == active {
            Span::styled(
                format!(" {} ", ws.title()),
                Style::default()
                    .fg(p.accent)
                    .bg(p.selection_bg)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(format!(" {} ", ws.title()), Style::default().fg(p.muted))
        }
    };
    let line = Line::from(vec![
        Span::raw(" "),
        tab(Workspace::Music),
        Span::styled(" │ ", Style::default().fg(p.separator)),
        tab(Workspace::Radio),
        Span::styled("   tab to switch", Style::default().fg(p.muted)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, RwLock};

    fn app() -> (App, mpsc::Receiver<CoreEvent>) {
        let (tx, rx) = mpsc::channel(16);
        let snapshot = Arc::new(RwLock::new(Snapshot::default()));
        (App::new(tx, snapshot, PathBuf::from("/tmp/list.json"), false), rx)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn global_keys_map_to_transport_commands() {
        let (mut app, _rx) = app();
        assert!(matches!(
            app.handle_key(key(KeyCode::Char(' '))).as_slice(),
            [Action::SendCommand(Command::TogglePlayPause)]
        ));
        assert!(matches!(
            app.handle_key(key(KeyCode::F(11))).as_slice(),
            [Action::SendCommand(Command::ToggleFullscreen)]
        ));
        // Esc only leaves fullscreen when it is on
        assert!(app.handle_key(key(KeyCode::Esc)).is_empty());
        app.state.snapshot.session.fullscreen = true;
        assert!(matches!(
            app.handle_key(key(KeyCode::Esc)).as_slice(),
            [Action::SendCommand(Command::ExitFullscreen)]
        ));
        assert!(matches!(
            app.handle_key(key(KeyCode::Char(','))).as_slice(),
            [Action::SendCommand(Command::SeekRelative { delta_ms: -10_000 })]
        ));
    }

    #[test]
    fn dropped_text_adds_paths_and_shows_music() {
        let (mut app, _rx) = app();
        app.state.workspace = Workspace::Radio;
        let actions = app.handle_paste("'/music/a song.mp3' /music/b.ogg");
        match actions.as_slice() {
            [Action::SwitchWorkspace(Workspace::Music), Action::SendCommand(Command::AddPaths { paths })] => {
                assert_eq!(
                    paths,
                    &vec![PathBuf::from("/music/a song.mp3"), PathBuf::from("/music/b.ogg")]
                );
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_save_prompt_uses_default_playlist_file() {
        let (mut app, mut rx) = app();
        app.dispatch(Action::PromptSubmitted(PromptKind::SavePlaylist, String::new()))
            .await;
        match rx.try_recv() {
            Ok(CoreEvent::Command(Command::SavePlaylist { path })) => {
                assert_eq!(path, PathBuf::from("/tmp/list.json"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn filter_prompt_escape_clears_filter() {
        let (mut app, _rx) = app();
        app.dispatch(Action::OpenPrompt(PromptKind::Filter)).await;
        assert_eq!(app.state.input_mode, InputMode::Prompt);
        assert!(matches!(
            app.handle_key(key(KeyCode::Char('x'))).as_slice(),
            [Action::FilterChanged(q)] if q == "x"
        ));
        assert!(matches!(
            app.handle_key(key(KeyCode::Esc)).as_slice(),
            [Action::FilterChanged(q)] if q.is_empty()
        ));
        assert_eq!(app.state.input_mode, InputMode::Normal);
    }
}
