//! One-line prompt on top of tui-input, used for paths and station entries.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};
use unicode_width::UnicodeWidthStr;

use crate::action::PromptKind;
use crate::theme::{palette, style_prompt};

pub enum PromptAction {
    Changed(PromptKind, String),
    Submitted(PromptKind, String),
    Cancelled,
}

#[derive(Default)]
pub struct PromptInput {
    input: Input,
    kind: Option<PromptKind>,
}

impl PromptInput {
    pub fn open(&mut self, kind: PromptKind, initial: &str) {
        self.input = Input::new(initial.to_string());
        self.kind = Some(kind);
    }

    pub fn close(&mut self) {
        self.input = Input::default();
        self.kind = None;
    }

    pub fn is_active(&self) -> bool {
        self.kind.is_some()
    }

    pub fn kind(&self) -> Option<PromptKind> {
        self.kind
    }

    pub fn text(&self) -> &str {
        self.input.value()
    }

    /// Insert pasted text at the cursor.
    pub fn paste(&mut self, text: &str) {
        let mut value = self.input.value().to_string();
        let byte_pos = value
            .char_indices()
            .nth(self.input.cursor())
            .map_or(value.len(), |(i, _)| i);
        let text = text.replace(['\r', '\n'], " ");
        value.insert_str(byte_pos, &text);
        let cursor = self.input.cursor() + text.chars().count();
        self.input = Input::new(value).with_cursor(cursor);
    }

    /// Esc cancels, Enter submits the trimmed text, anything else edits.
    pub fn handle_key(&mut self, key: KeyEvent) -> PromptAction {
        let Some(kind) = self.kind else {
            return PromptAction::Cancelled;
        };
        match key.code {
            KeyCode::Esc => {
                self.close();
                PromptAction::Cancelled
            }
            KeyCode::Enter => {
                let text = self.input.value().trim().to_string();
                self.close();
                PromptAction::Submitted(kind, text)
            }
            _ => {
                self.input.handle_event(&Event::Key(key));
                PromptAction::Changed(kind, self.input.value().to_string())
            }
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let Some(kind) = self.kind else {
            return;
        };
        let p = palette();
        let label = format!(" {}: ", kind.label());
        let label_w = label.width() as u16;
        let field_w = area.width.saturating_sub(label_w + 1) as usize;
        let scroll = self.input.visual_scroll(field_w);
        let value: String = self.input.value().chars().skip(scroll).collect();

        let line = Line::from(vec![
            Span::styled(
                label,
                Style::default().fg(p.mode_prompt).add_modifier(Modifier::BOLD),
            ),
            Span::styled(value, style_prompt()),
        ]);
        frame.render_widget(Paragraph::new(line).style(style_prompt()), area);

        let cursor_x = area.x + label_w + (self.input.visual_cursor().saturating_sub(scroll)) as u16;
        frame.set_cursor_position((cursor_x.min(area.x + area.width.saturating_sub(1)), area.y));
    }
}

/// Split a `name = url` station entry. Both halves must be non-empty.
pub fn parse_station_entry(text: &str) -> Option<(String, String)> {
    let (name, url) = text.split_once('=')?;
    let (name, url) = (name.trim(), url.trim());
    (!name.is_empty() && !url.is_empty()).then(|| (name.to_string(), url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_then_enter_submits_trimmed_text() {
        let mut prompt = PromptInput::default();
        prompt.open(PromptKind::SavePlaylist, "");
        for c in " /tmp/list.json ".chars() {
            prompt.handle_key(key(KeyCode::Char(c)));
        }
        match prompt.handle_key(key(KeyCode::Enter)) {
            PromptAction::Submitted(kind, text) => {
                assert_eq!(kind, PromptKind::SavePlaylist);
                assert_eq!(text, "/tmp/list.json");
            }
            _ => panic!("expected submit"),
        }
        assert!(!prompt.is_active());
    }

    #[test]
    fn escape_cancels_and_paste_inserts_at_cursor() {
        let mut prompt = PromptInput::default();
        prompt.open(PromptKind::AddPaths, "/music/");
        prompt.paste("a.mp3\n");
        assert_eq!(prompt.text(), "/music/a.mp3 ");
        assert!(matches!(
            prompt.handle_key(key(KeyCode::Esc)),
            PromptAction::Cancelled
        ));
        assert!(prompt.kind().is_none());
    }

    #[test]
    fn station_entries_need_both_halves() {
        assert_eq!(
            parse_station_entry(" Jazz FM = http://jazz.example/stream "),
            Some(("Jazz FM".to_string(), "http://jazz.example/stream".to_string()))
        );
        assert_eq!(parse_station_entry("no separator"), None);
        assert_eq!(parse_station_entry(" = http://x"), None);
    }
}
