//! StationList component, the main pane of the Radio workspace.

use std::time::Instant;

use albix_core::protocol::Command;
use albix_core::{Phase, Station};
use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
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

/// Sort order for the station list.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SortOrder {
    #[default]
    Default,
    Name,
    CustomFirst,
}

impl SortOrder {
    pub fn next(self) -> Self {
        match self {
            Self::Default => Self::Name,
            Self::Name => Self::CustomFirst,
            Self::CustomFirst => Self::Default,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Name => "name",
            Self::CustomFirst => "custom first",
        }
    }
}

pub struct StationList {
    list: ScrollableList<Station>,
    sort_order: SortOrder,
    list_state: ListState,
    last_click: Option<(usize, Instant)>,
}

fn station_matches(station: &Station, q: &str) -> bool {
    if q.trim().is_empty() {
        return true;
    }
    let text = format!("{} {}", station.name, station.url).to_lowercase();
    q.to_lowercase()
        .split_whitespace()
        .all(|term| text.contains(term))
}

impl StationList {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(station_matches),
            sort_order: SortOrder::Default,
            list_state: ListState::default(),
            last_click: None,
        }
    }

    pub fn selected_station(&self) -> Option<&Station> {
        self.list.selected_item()
    }

    fn sync_stations(&mut self, stations: &[Station]) {
        let selected = self.selected_station().map(|s| s.name.clone());
        let mut items = stations.to_vec();
        match self.sort_order {
            SortOrder::Default => {}
            SortOrder::Name => {
                items.sort_by_key(|s| s.name.to_lowercase());
            }
            SortOrder::CustomFirst => {
                // stable: keeps table order inside each group
                items.sort_by_key(|s| !s.custom);
            }
        }
        self.list.set_items(items);
        if let Some(name) = selected {
            if let Some(i) = self.list.items.iter().position(|s| s.name == name) {
                self.list.set_selected_by_original(i);
            }
        }
    }

    /// Enter on the station that is already on air stops it.
    fn activate_selected(&self, state: &AppState) -> Vec<Action> {
        let Some(station) = self.selected_station() else {
            return Vec::new();
        };
        let session = &state.snapshot.session;
        if session.radio.as_deref() == Some(station.name.as_str()) && !session.is_stopped() {
            return vec![Action::SendCommand(Command::Stop)];
        }
        vec![Action::SendCommand(Command::PlayStation {
            name: station.name.clone(),
        })]
    }

    fn render_item(
        &self,
        station: &Station,
        is_selected: bool,
        focused: bool,
        state: &AppState,
    ) -> ListItem<'static> {
        let p = palette();
        let session = &state.snapshot.session;
        let is_current = session.radio.as_deref() == Some(station.name.as_str());

        let (icon, icon_color): (&'static str, Color) = if is_current {
            match session.phase {
                Phase::Playing if session.buffering => ("⋯", p.paused),
                Phase::Playing => ("▶", p.playing),
                Phase::Paused => ("⏸", p.paused),
                Phase::Stopped => ("■", p.muted),
            }
        } else {
            (" ", p.muted)
        };

        let name_color = if is_current {
            icon_color
        } else if station.custom {
            p.custom
        } else if is_selected {
            p.primary
        } else {
            p.secondary
        };
        let name_style = if is_current || (is_selected && focused) {
            Style::default().fg(name_color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(name_color)
        };

        let mut spans = vec![
            Span::raw(" "),
            Span::styled(icon, Style::default().fg(icon_color)),
            Span::raw("  "),
            Span::styled(station.name.clone(), name_style),
        ];
        if station.custom {
            spans.push(Span::styled("  custom", Style::default().fg(p.muted)));
        }
        if is_selected {
            spans.push(Span::styled(
                format!("  {}", station.url),
                Style::default().fg(p.muted),
            ));
        }

        let item_bg = if is_selected {
            Style::default().bg(p.selection_bg)
        } else {
            Style::default()
        };
        ListItem::new(Line::from(spans)).style(item_bg)
    }
}

impl Default for StationList {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for StationList {
    fn id(&self) -> ComponentId {
        ComponentId::Stations
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(1),
            KeyCode::PageUp => self.list.select_up(10),
            KeyCode::PageDown => self.list.select_down(10),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),

            KeyCode::Enter => return self.activate_selected(state),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(station) = self.selected_station() {
                    return vec![Action::SendCommand(Command::RemoveStation {
                        name: station.name.clone(),
                    })];
                }
            }
            KeyCode::Char('y') => {
                if let Some(station) = self.selected_station() {
                    return vec![Action::CopyToClipboard(station.url.clone())];
                }
            }
            KeyCode::Char('S') => {
                self.sort_order = self.sort_order.next();
                self.sync_stations(&state.snapshot.stations);
            }
            KeyCode::Char('/') => return vec![Action::OpenPrompt(PromptKind::Filter)],
            KeyCode::Char('c') => return vec![Action::JumpToCurrent],
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, _state: &AppState) -> Vec<Action> {
        let rel_row = event.row.saturating_sub(area.y + 1) as usize;
        match event.kind {
            MouseEventKind::ScrollUp => self.list.select_up(1),
            MouseEventKind::ScrollDown => self.list.select_down(1),
            MouseEventKind::Down(MouseButton::Left) => {
                let is_double = self
                    .last_click
                    .is_some_and(|(row, t)| row == rel_row && t.elapsed().as_millis() < 400);
                if self.list.handle_click(rel_row) && is_double {
                    self.last_click = None;
                    if let Some(station) = self.selected_station() {
                        return vec![Action::SendCommand(Command::PlayStation {
                            name: station.name.clone(),
                        })];
                    }
                } else {
                    self.last_click = Some((rel_row, Instant::now()));
                }
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action> {
        match action {
            Action::FilterChanged(q) if state.workspace == Workspace::Radio => {
                self.list.set_filter(q);
            }
            Action::JumpToCurrent => {
                if let Some(name) = &state.snapshot.session.radio {
                    self.list.set_filter("");
                    if let Some(i) = self.list.items.iter().position(|s| &s.name == name) {
                        self.list.set_selected_by_original(i);
                    }
                }
            }
            _ => {}
        }
        vec![]
    }

    fn on_state(&mut self, state: &AppState) {
        let mut incoming = state.snapshot.stations.clone();
        let mut current = self.list.items.clone();
        incoming.sort_by(|a, b| a.name.cmp(&b.name));
        current.sort_by(|a, b| a.name.cmp(&b.name));
        if incoming != current {
            self.sync_stations(&state.snapshot.stations);
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let p = palette();
        let mut badge_text = if self.list.filter.is_empty() {
            format!("{}", self.list.total_len())
        } else {
            format!("{}/{}", self.list.len(), self.list.total_len())
        };
        if self.sort_order != SortOrder::Default {
            badge_text = format!("{} · {}", self.sort_order.label(), badge_text);
        }
        let badge = Badge {
            text: &badge_text,
            color: p.secondary,
        };
        let block = pane_chrome("stations", Some('1'), focused, Some(badge));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.list.is_empty() {
            let msg = if self.list.total_len() == 0 {
                "  no stations, press + to add one"
            } else {
                "  no stations match filter"
            };
            frame.render_widget(
                Paragraph::new(Span::styled(msg, Style::default().fg(p.muted))),
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
            .map(|(row, (_, station))| {
                self.render_item(station, row == sel_in_view, focused, state)
            })
            .collect();

        self.list_state.select(Some(sel_in_view));
        frame.render_stateful_widget(List::new(items), inner, &mut self.list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn station(name: &str, custom: bool) -> Station {
        Station {
            name: name.to_string(),
            url: format!("http://{}.example/stream", name.to_lowercase()),
            custom,
        }
    }

    fn radio_state() -> AppState {
        let mut state = AppState::new(false);
        state.workspace = Workspace::Radio;
        state.snapshot.stations = vec![
            station("Zeta", false),
            station("Alpha", true),
            station("Mid", false),
        ];
        state
    }

    #[test]
    fn enter_plays_then_stops_the_live_station() {
        let mut list = StationList::new();
        let mut state = radio_state();
        list.on_state(&state);

        let actions = list.handle_key(key(KeyCode::Enter), &state);
        assert!(matches!(
            actions.as_slice(),
            [Action::SendCommand(Command::PlayStation { name })] if name == "Zeta"
        ));

        state.snapshot.session.radio = Some("Zeta".into());
        state.snapshot.session.phase = Phase::Playing;
        let actions = list.handle_key(key(KeyCode::Enter), &state);
        assert!(matches!(
            actions.as_slice(),
            [Action::SendCommand(Command::Stop)]
        ));
    }

    #[test]
    fn sorting_keeps_the_selected_station() {
        let mut list = StationList::new();
        let state = radio_state();
        list.on_state(&state);
        list.handle_key(key(KeyCode::Char('j')), &state); // Alpha

        list.handle_key(key(KeyCode::Char('S')), &state);
        assert_eq!(list.sort_order, SortOrder::Name);
        let names: Vec<_> = list.list.items.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Mid", "Zeta"]);
        assert_eq!(list.selected_station().map(|s| s.name.as_str()), Some("Alpha"));

        // a snapshot with the same stations does not reset the order
        list.on_state(&state);
        assert_eq!(list.list.items[0].name, "Alpha");
    }

    #[test]
    fn filter_only_applies_in_radio_workspace() {
        let mut list = StationList::new();
        let mut state = radio_state();
        list.on_state(&state);

        list.on_action(&Action::FilterChanged("mid".into()), &state);
        assert_eq!(list.list.len(), 1);

        state.workspace = Workspace::Music;
        list.on_action(&Action::FilterChanged(String::new()), &state);
        assert_eq!(list.list.len(), 1);
    }
}
