//! Playlist pane for the Local Music workspace.
//!
//! Mirrors the player's playlist. Rows can be marked for batch removal and
//! moved up or down; the cursor follows a moved row once the new snapshot
//! arrives.

use std::collections::BTreeSet;
use std::time::Instant;

use albix_core::protocol::Command;
use albix_core::{Phase, PlaylistEntry};
use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::{
    action::{Action, ComponentId, PromptKind, Workspace},
    app_state::AppState,
    component::Component,
    theme::palette,
    widgets::pane_chrome::{pane_chrome, Badge},
    widgets::scrollable_list::ScrollableList,
};

pub struct PlaylistView {
    list: ScrollableList<PlaylistEntry>,
    list_state: ListState,
    /// Original indices marked for batch removal.
    marked: BTreeSet<usize>,
    /// Row to select once the next snapshot lands (after a move).
    follow: Option<usize>,
    last_click: Option<(usize, Instant)>,
}

fn entry_matches(entry: &PlaylistEntry, q: &str) -> bool {
    let text = entry.path.to_string_lossy().to_lowercase();
    q.to_lowercase()
        .split_whitespace()
        .all(|term| text.contains(term))
}

impl PlaylistView {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(entry_matches),
            list_state: ListState::default(),
            marked: BTreeSet::new(),
            follow: None,
            last_click: None,
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.list.selected_original_index()
    }

    /// Marked rows, or the cursor row when nothing is marked.
    fn removal_targets(&self) -> Vec<usize> {
        if self.marked.is_empty() {
            self.selected_index().into_iter().collect()
        } else {
            self.marked.iter().copied().collect()
        }
    }

    fn move_selected(&mut self, down: bool) -> Vec<Action> {
        let Some(from) = self.selected_index() else {
            return Vec::new();
        };
        let to = if down {
            from + 1
        } else {
            match from.checked_sub(1) {
                Some(to) => to,
                None => return Vec::new(),
            }
        };
        if to >= self.list.total_len() {
            return Vec::new();
        }
        self.follow = Some(to);
        self.marked.clear();
        vec![Action::SendCommand(Command::Move { from, to })]
    }

    fn play_selected(&self, state: &AppState) -> Vec<Action> {
        let Some(index) = self.selected_index() else {
            return Vec::new();
        };
        let session = &state.snapshot.session;
        if session.current == Some(index)
            && session.radio.is_none()
            && session.phase != Phase::Stopped
        {
            return vec![Action::SendCommand(Command::TogglePlayPause)];
        }
        vec![Action::SendCommand(Command::PlayIndex { index })]
    }

    fn render_item(
        &self,
        entry: &PlaylistEntry,
        orig_idx: usize,
        is_selected: bool,
        focused: bool,
        state: &AppState,
    ) -> ListItem<'static> {
        let p = palette();
        let session = &state.snapshot.session;
        let is_current = session.current == Some(orig_idx) && session.radio.is_none();

        let (icon, icon_color) = if is_current {
            match session.phase {
                Phase::Playing => ("▶", p.playing),
                Phase::Paused => ("⏸", p.paused),
                Phase::Stopped => ("■", p.muted),
            }
        } else {
            (" ", p.muted)
        };
        let mark = if self.marked.contains(&orig_idx) { "●" } else { " " };

        let name_color = if is_current {
            icon_color
        } else if is_selected {
            p.primary
        } else {
            p.secondary
        };
        let mut name_style = Style::default().fg(name_color);
        if is_current || (is_selected && focused) {
            name_style = name_style.add_modifier(Modifier::BOLD);
        }

        let mut spans = vec![
            Span::styled(mark, Style::default().fg(p.accent)),
            Span::styled(icon, Style::default().fg(icon_color)),
            Span::styled(
                format!(" {:>3}  ", orig_idx + 1),
                Style::default().fg(p.number_hint),
            ),
            Span::styled(entry.display_name(), name_style),
        ];
        if entry.kind.is_video() {
            spans.push(Span::styled("  video", Style::default().fg(p.video)));
        }
        if is_selected {
            if let Some(dir) = entry.path.parent() {
                spans.push(Span::styled(
                    format!("  {}", dir.display()),
                    Style::default().fg(p.muted),
                ));
            }
        }

        let bg = if is_selected {
            Style::default().bg(p.selection_bg)
        } else {
            Style::default()
        };
        ListItem::new(Line::from(spans)).style(bg)
    }
}

impl Default for PlaylistView {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for PlaylistView {
    fn id(&self) -> ComponentId {
        ComponentId::Playlist
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        let step = if key.modifiers.contains(KeyModifiers::SHIFT) { 5 } else { 1 };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(step),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(step),
            KeyCode::PageUp => self.list.select_up(10),
            KeyCode::PageDown => self.list.select_down(10),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),

            KeyCode::Enter => return self.play_selected(state),

            KeyCode::Char('v') | KeyCode::Insert => {
                if let Some(idx) = self.selected_index() {
                    if !self.marked.remove(&idx) {
                        self.marked.insert(idx);
                    }
                    self.list.select_down(1);
                }
            }
            KeyCode::Char('V') => self.marked.clear(),

            KeyCode::Char('d') | KeyCode::Delete => {
                let indices = self.removal_targets();
                self.marked.clear();
                if !indices.is_empty() {
                    return vec![Action::SendCommand(Command::Remove { indices })];
                }
            }
            KeyCode::Char('J') => return self.move_selected(true),
            KeyCode::Char('K') => return self.move_selected(false),
            KeyCode::Char('D') => {
                self.marked.clear();
                return vec![Action::SendCommand(Command::ClearPlaylist)];
            }

            KeyCode::Char('/') => return vec![Action::OpenPrompt(PromptKind::Filter)],
            KeyCode::Char('c') => return vec![Action::JumpToCurrent],
            KeyCode::Char('y') => {
                if let Some(entry) = self.list.selected_item() {
                    return vec![Action::CopyToClipboard(entry.path.display().to_string())];
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, _state: &AppState) -> Vec<Action> {
        let rel_row = event.row.saturating_sub(area.y + 1) as usize; // +1 for border
        match event.kind {
            MouseEventKind::ScrollUp => self.list.select_up(1),
            MouseEventKind::ScrollDown => self.list.select_down(1),
            MouseEventKind::Down(MouseButton::Left) => {
                let now = Instant::now();
                let is_double = self
                    .last_click
                    .is_some_and(|(row, t)| row == rel_row && t.elapsed().as_millis() < 400);
                if self.list.handle_click(rel_row) && is_double {
                    self.last_click = None;
                    if let Some(index) = self.selected_index() {
                        return vec![Action::SendCommand(Command::PlayIndex { index })];
                    }
                } else {
                    self.last_click = Some((rel_row, now));
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action> {
        match action {
            Action::FilterChanged(q) if state.workspace == Workspace::Music => {
                self.list.set_filter(q);
            }
            Action::JumpToCurrent => {
                if let Some(i) = state.snapshot.session.current {
                    self.list.set_filter("");
                    self.list.set_selected_by_original(i);
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn on_state(&mut self, state: &AppState) {
        let entries = &state.snapshot.playlist;
        if entries.as_slice() != self.list.items.as_slice() {
            self.list.set_items(entries.clone());
            self.marked.retain(|&i| i < entries.len());
        }
        if let Some(target) = self.follow.take() {
            self.list.set_selected_by_original(target);
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let p = palette();
        let count = if self.list.filter.is_empty() {
            format!("{}", self.list.total_len())
        } else {
            format!("{}/{}", self.list.len(), self.list.total_len())
        };
        let badge = Badge {
            text: &count,
            color: p.secondary,
        };
        let block = pane_chrome("playlist", Some('1'), focused, Some(badge));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.list.total_len() == 0 {
            let hint = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  playlist is empty",
                    Style::default().fg(p.secondary),
                )),
                Line::from(Span::styled(
                    "  drop or paste files here, or press a to add a path",
                    Style::default().fg(p.muted),
                )),
            ]);
            frame.render_widget(hint, inner);
            return;
        }
        if self.list.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  no entries match filter",
                    Style::default().fg(p.muted),
                )),
                inner,
            );
            return;
        }

        let height = inner.height as usize;
        self.list.ensure_visible(height);
        let sel_in_view = self.list.selected_in_view(height);
        let items: Vec<ListItem> = self
            .list
            .visible_items(height)
            .into_iter()
            .enumerate()
            .map(|(row, (orig_idx, entry))| {
                self.render_item(entry, orig_idx, row == sel_in_view, focused, state)
            })
            .collect();

        self.list_state.select(Some(sel_in_view));
        frame.render_stateful_widget(List::new(items), inner, &mut self.list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use albix_core::MediaKind;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn state_with(n: usize) -> AppState {
        let mut state = AppState::new(false);
        state.snapshot.playlist = (0..n)
            .map(|i| PlaylistEntry::new(format!("/m/{i}.mp3"), MediaKind::Audio))
            .collect();
        state
    }

    #[test]
    fn remove_uses_marks_before_cursor() {
        let mut view = PlaylistView::new();
        let state = state_with(4);
        view.on_state(&state);

        view.handle_key(key(KeyCode::Char('v')), &state); // mark 0, cursor → 1
        view.handle_key(key(KeyCode::Char('j')), &state); // cursor → 2
        view.handle_key(key(KeyCode::Char('v')), &state); // mark 2
        let actions = view.handle_key(key(KeyCode::Char('d')), &state);
        match actions.as_slice() {
            [Action::SendCommand(Command::Remove { indices })] => assert_eq!(indices, &vec![0, 2]),
            other => panic!("unexpected {other:?}"),
        }

        let actions = view.handle_key(key(KeyCode::Delete), &state);
        assert!(matches!(
            actions.as_slice(),
            [Action::SendCommand(Command::Remove { indices })] if indices == &vec![3]
        ));
    }

    #[test]
    fn moving_follows_the_row() {
        let mut view = PlaylistView::new();
        let mut state = state_with(3);
        view.on_state(&state);

        let actions = view.handle_key(key(KeyCode::Char('J')), &state);
        assert!(matches!(
            actions.as_slice(),
            [Action::SendCommand(Command::Move { from: 0, to: 1 })]
        ));
        state.snapshot.playlist.swap(0, 1);
        view.on_state(&state);
        assert_eq!(view.selected_index(), Some(1));

        view.handle_key(key(KeyCode::Char('G')), &state);
        assert!(view.handle_key(key(KeyCode::Char('J')), &state).is_empty());
    }

    #[test]
    fn enter_on_playing_row_toggles_pause() {
        let mut view = PlaylistView::new();
        let mut state = state_with(2);
        view.on_state(&state);
        assert!(matches!(
            view.handle_key(key(KeyCode::Enter), &state).as_slice(),
            [Action::SendCommand(Command::PlayIndex { index: 0 })]
        ));

        state.snapshot.session.current = Some(0);
        state.snapshot.session.phase = Phase::Playing;
        assert!(matches!(
            view.handle_key(key(KeyCode::Enter), &state).as_slice(),
            [Action::SendCommand(Command::TogglePlayPause)]
        ));
    }
}
