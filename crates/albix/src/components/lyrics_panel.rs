//! Lyrics side panel.
//!
//! Timed (`.lrc`) lyrics follow the playback position and keep the sung line
//! centred. Plain lyrics scroll by hand.

use std::path::PathBuf;

use ratatui::crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::palette,
    widgets::pane_chrome::{pane_chrome, Badge},
};

#[derive(Default)]
pub struct LyricsPanel {
    /// Manual scroll offset for untimed lyrics.
    scroll: usize,
    /// Lyrics file the scroll offset belongs to.
    source: Option<PathBuf>,
}

impl LyricsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    fn scroll_by(&mut self, delta: isize, state: &AppState) {
        let len = state.lyrics.as_ref().map_or(0, |l| l.lines.len());
        let next = self.scroll.saturating_add_signed(delta);
        self.scroll = next.min(len.saturating_sub(1));
    }
}

/// First visible line so that `current` sits in the middle of `height` rows.
fn centred_offset(current: usize, len: usize, height: usize) -> usize {
    let max_offset = len.saturating_sub(height);
    current.saturating_sub(height / 2).min(max_offset)
}

impl Component for LyricsPanel {
    fn id(&self) -> ComponentId {
        ComponentId::Lyrics
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1, state),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1, state),
            KeyCode::PageUp => self.scroll_by(-10, state),
            KeyCode::PageDown => self.scroll_by(10, state),
            KeyCode::Home | KeyCode::Char('g') => self.scroll = 0,
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollUp => self.scroll_by(-3, state),
            MouseEventKind::ScrollDown => self.scroll_by(3, state),
            _ => {}
        }
        Vec::new()
    }

    fn on_state(&mut self, state: &AppState) {
        let source = state.lyrics.as_ref().map(|l| l.source.clone());
        if source != self.source {
            self.source = source;
            self.scroll = 0;
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let p = palette();
        let badge = state.lyrics.as_ref().map(|l| Badge {
            text: if l.is_timed() { "TIMED" } else { "TEXT" },
            color: p.secondary,
        });
        let block = pane_chrome("lyrics", Some('2'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(lyrics) = state.lyrics.as_ref().filter(|l| !l.lines.is_empty()) else {
            let msg = if state.current_entry().is_some() && !state.snapshot.session.is_radio() {
                "  no lyrics found next to this track"
            } else {
                "  nothing to show"
            };
            frame.render_widget(
                Paragraph::new(Span::styled(msg, Style::default().fg(p.muted))),
                inner,
            );
            return;
        };

        let height = inner.height as usize;
        let current = lyrics.current_line(state.snapshot.session.position_ms);
        let offset = match current {
            Some(i) => centred_offset(i, lyrics.lines.len(), height),
            None => self.scroll,
        };

        let lines: Vec<Line> = lyrics
            .lines
            .iter()
            .enumerate()
            .skip(offset)
            .take(height)
            .map(|(i, line)| {
                let style = if Some(i) == current {
                    Style::default()
                        .fg(p.lyric_current)
                        .add_modifier(Modifier::BOLD)
                } else if current.is_some_and(|c| i < c) {
                    Style::default().fg(p.muted)
                } else {
                    Style::default().fg(p.secondary)
                };
                Line::from(Span::styled(format!(" {}", line.text), style))
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use albix_core::lyrics::Lyrics;
    use ratatui::crossterm::event::KeyModifiers;

    #[test]
    fn centred_offset_clamps_at_both_ends() {
        assert_eq!(centred_offset(0, 40, 10), 0);
        assert_eq!(centred_offset(20, 40, 10), 15);
        assert_eq!(centred_offset(39, 40, 10), 30);
        assert_eq!(centred_offset(3, 5, 10), 0);
    }

    #[test]
    fn manual_scroll_resets_when_lyrics_change() {
        let mut panel = LyricsPanel::new();
        let mut state = AppState::new(true);
        state.lyrics = Some(Lyrics::parse("/m/a.txt".into(), "one\ntwo\nthree\n"));
        panel.on_state(&state);

        let down = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        for _ in 0..5 {
            panel.handle_key(down, &state);
        }
        assert_eq!(panel.scroll, 2);

        state.lyrics = Some(Lyrics::parse("/m/b.txt".into(), "other\n"));
        panel.on_state(&state);
        assert_eq!(panel.scroll, 0);
    }
}
