//! Now-playing panel at the top of the screen.
//!
//! Row 1: phase icon, title, media tag, engine badge.
//! Row 2: seek bar (local media) or a LIVE marker (radio).
//! Row 3: play/pause button label, volume, mode flags.
//!
//! Not focusable. Clicking the seek bar seeks.

use albix_core::protocol::{Command, EngineHealth};
use albix_core::session::MAX_VOLUME;
use albix_core::Phase;
use ratatui::crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::palette,
    widgets::pane_chrome::{pane_chrome, Badge},
    widgets::progress_bar::{draw_progress, seek_target},
};

const VOLUME_CELLS: usize = 10;

#[derive(Default)]
pub struct NowPlaying {
    /// Where the seek bar was last drawn, for click hit-testing.
    bar_area: Rect,
}

impl NowPlaying {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outer height including borders.
    pub const HEIGHT: u16 = 5;
}

impl Component for NowPlaying {
    fn id(&self) -> ComponentId {
        ComponentId::NowPlaying
    }

    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) || event.row != self.bar_area.y {
            return Vec::new();
        }
        let session = &state.snapshot.session;
        if !session.seekable() {
            return Vec::new();
        }
        match seek_target(self.bar_area, event.column, session.duration_ms) {
            Some(position_ms) => vec![Action::SendCommand(Command::Seek { position_ms })],
            None => Vec::new(),
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        let p = palette();
        let health = &state.snapshot.engine_health;
        let badge = health.badge_label().map(|text| Badge {
            text,
            color: match health {
                EngineHealth::Starting => p.badge_pending,
                _ => p.badge_err,
            },
        });
        let block = pane_chrome("albix", None, false, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 {
            return;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        frame.render_widget(Paragraph::new(title_line(state)), rows[0]);

        let session = &state.snapshot.session;
        let bar = Rect {
            x: rows[1].x + 1,
            width: rows[1].width.saturating_sub(2),
            ..rows[1]
        };
        self.bar_area = bar;
        if session.is_radio() {
            let live = Line::from(vec![
                Span::styled(
                    "● LIVE ",
                    Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
                ),
                Span::styled(session.position_label(), Style::default().fg(p.secondary)),
            ]);
            frame.render_widget(Paragraph::new(live), bar);
        } else {
            draw_progress(frame, bar, session.position_ms, session.duration_ms);
        }

        frame.render_widget(Paragraph::new(controls_line(state)), rows[2]);
    }
}

fn title_line(state: &AppState) -> Line<'static> {
    let p = palette();
    let session = &state.snapshot.session;
    let (icon, color) = match session.phase {
        Phase::Playing if session.buffering => ("◔", p.paused),
        Phase::Playing => ("▶", p.playing),
        Phase::Paused => ("⏸", p.paused),
        Phase::Stopped => ("■", p.muted),
    };

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(icon, Style::default().fg(color)),
        Span::raw(" "),
    ];

    if let Some(name) = &session.radio {
        spans.push(Span::styled(
            name.clone(),
            Style::default().fg(p.primary).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled("  radio", Style::default().fg(p.custom)));
    } else if let Some(entry) = state.current_entry() {
        spans.push(Span::styled(
            entry.display_name(),
            Style::default().fg(p.primary).add_modifier(Modifier::BOLD),
        ));
        let tag_color = if entry.kind.is_video() { p.video } else { p.secondary };
        spans.push(Span::styled(
            format!("  {}", entry.kind.label()),
            Style::default().fg(tag_color),
        ));
        if let Some(i) = session.current {
            spans.push(Span::styled(
                format!("  {}/{}", i + 1, state.snapshot.playlist.len()),
                Style::default().fg(p.muted),
            ));
        }
    } else {
        spans.push(Span::styled("Nothing playing", Style::default().fg(p.muted)));
    }

    if session.buffering {
        spans.push(Span::styled("  buffering…", Style::default().fg(p.paused)));
    }
    Line::from(spans)
}

fn controls_line(state: &AppState) -> Line<'static> {
    let p = palette();
    let session = &state.snapshot.session;

    let filled = session.volume as usize * VOLUME_CELLS / MAX_VOLUME as usize;
    let vol_color = if session.muted { p.muted } else { p.playing };
    let flag = |on: bool, label: &'static str| {
        let style = if on {
            Style::default().fg(p.primary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(p.muted)
        };
        Span::styled(format!("  {}", label), style)
    };

    let mut spans = vec![
        Span::styled(
            format!(" [{}]", session.phase.button_label()),
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  vol ", Style::default().fg(p.secondary)),
        Span::styled("▮".repeat(filled), Style::default().fg(vol_color)),
        Span::styled(
            "·".repeat(VOLUME_CELLS - filled),
            Style::default().fg(p.muted),
        ),
        Span::styled(
            format!(" {:>3}%", session.volume),
            Style::default().fg(p.secondary),
        ),
        flag(session.muted, "muted"),
        flag(session.shuffle, "shuffle"),
        flag(session.repeat, "repeat"),
    ];
    if session.video_visible {
        spans.push(flag(session.fullscreen, "fullscreen"));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use albix_core::{MediaKind, PlaylistEntry};
    use ratatui::crossterm::event::KeyModifiers;

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn clicking_the_bar_seeks_local_media_only() {
        let mut panel = NowPlaying::new();
        panel.bar_area = Rect::new(2, 2, 32, 1);
        let mut state = AppState::new(false);
        state.snapshot.playlist = vec![PlaylistEntry::new("/m/a.mp3", MediaKind::Audio)];
        state.snapshot.session.current = Some(0);
        state.snapshot.session.phase = Phase::Playing;
        state.snapshot.session.duration_ms = 60_000;

        let actions = panel.handle_mouse(click(8, 2), Rect::default(), &state);
        assert!(matches!(
            actions.as_slice(),
            [Action::SendCommand(Command::Seek { position_ms: 0 })]
        ));
        assert!(panel.handle_mouse(click(8, 3), Rect::default(), &state).is_empty());

        state.snapshot.session.radio = Some("Jazz".into());
        state.snapshot.session.current = None;
        assert!(panel.handle_mouse(click(8, 2), Rect::default(), &state).is_empty());
    }
}
