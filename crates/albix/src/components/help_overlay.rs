//! HelpOverlay component: centered popup with keyboard shortcut reference.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{palette, style_base},
};

#[derive(Default)]
pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}

impl Component for HelpOverlay {
    fn id(&self) -> ComponentId {
        ComponentId::HelpOverlay
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.visible {
            return vec![];
        }
        match key.code {
            KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc => vec![Action::ToggleHelp],
            // swallow everything else while open
            _ => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::ToggleHelp = action {
            self.toggle();
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, _state: &AppState) {
        if !self.visible {
            return;
        }
        let p = palette();
        let section = |title: &'static str| {
            Line::from(Span::styled(
                title,
                Style::default().fg(p.muted).add_modifier(Modifier::BOLD),
            ))
        };

        let help_lines: Vec<Line> = vec![
            Line::from(Span::styled(
                " keyboard shortcuts",
                Style::default().fg(p.primary).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            section(" playback"),
            help_row("enter", "play selected track or station"),
            help_row("space", "play / pause"),
            help_row("s", "stop"),
            help_row("n / p", "next / previous track"),
            help_row(", / .", "seek -/+ 10s (Shift = 60s)"),
            help_row("← / →  or  - / =", "volume down / up"),
            help_row("m", "mute"),
            help_row("z / x", "shuffle / repeat"),
            help_row("f  or  F11", "toggle fullscreen video"),
            help_row("esc", "leave fullscreen"),
            Line::from(""),
            section(" playlist"),
            help_row("a", "add files or folders (paste or drop works too)"),
            help_row("d / del", "remove marked or selected entries"),
            help_row("v / V", "mark entry / clear marks"),
            help_row("J / K", "move entry down / up"),
            help_row("D", "clear playlist"),
            help_row("w / o", "save / open playlist file"),
            Line::from(""),
            section(" radio"),
            help_row("+", "add station (name = url)"),
            help_row("i", "import stations from .m3u or .toml"),
            help_row("d", "remove custom station"),
            help_row("S", "cycle sort order"),
            Line::from(""),
            section(" navigation & ui"),
            help_row("↑ / ↓  or  j / k", "move selection"),
            help_row("g / G", "jump first / last"),
            help_row("tab", "switch Local Music / Radio Stations"),
            help_row("[ / ]  or  1 / 2", "focus previous / next pane"),
            help_row("/", "filter list (esc clears)"),
            help_row("c", "jump to current item"),
            help_row("y", "copy selected path or url"),
            help_row("L", "toggle lyrics panel"),
            help_row("t", "toggle dark / light theme"),
            help_row("b", "toggle keys bar"),
            help_row("?", "toggle this help"),
            help_row("q / Ctrl+C", "quit"),
            Line::from(""),
            Line::from(Span::styled(
                " press ? or esc to close",
                Style::default().fg(p.muted),
            )),
        ];

        let popup = centered_rect(68, help_lines.len() as u16 + 2, area);
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(help_lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(p.panel_border_focused))
                        .style(style_base()),
                )
                .wrap(Wrap { trim: false }),
            popup,
        );
    }
}

fn help_row(key: &'static str, desc: &'static str) -> Line<'static> {
    let p = palette();
    Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!("{:<18}", key),
            Style::default().fg(p.primary).add_modifier(Modifier::BOLD),
        ),
        Span::styled(desc, Style::default().fg(p.secondary)),
    ])
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height.min(r.height)),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1])[1]
}
