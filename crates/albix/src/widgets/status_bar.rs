//! Bottom rows: status line with the last notice, and the keybindings bar.

use albix_core::protocol::EngineHealth;
use albix_core::{Notice, Severity};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::Workspace;
use crate::theme::palette;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Prompt,
}

/// Player status on the left, newest notice with its time on the right.
pub fn draw_status_line(
    frame: &mut Frame,
    area: Rect,
    status: &str,
    health: &EngineHealth,
    last_notice: Option<&Notice>,
) {
    let p = palette();
    let engine_span = match health {
        EngineHealth::Running => Span::styled("●", Style::default().fg(p.badge_ok)),
        EngineHealth::Starting => Span::styled("◔", Style::default().fg(p.badge_pending)),
        EngineHealth::Dead => Span::styled("○", Style::default().fg(p.badge_err)),
        EngineHealth::Absent => Span::styled("○", Style::default().fg(p.muted)),
    };

    let mut spans = vec![
        Span::raw(" "),
        engine_span,
        Span::raw(" "),
        Span::styled(status.to_string(), Style::default().fg(p.secondary)),
    ];

    if let Some(n) = last_notice {
        let color = match n.severity {
            Severity::Info => p.toast_info,
            Severity::Warning => p.toast_warning,
            Severity::Error => p.toast_error,
        };
        spans.push(Span::styled("   ", Style::default()));
        spans.push(Span::styled(
            n.at.format("%H:%M:%S ").to_string(),
            Style::default().fg(p.muted),
        ));
        spans.push(Span::styled(n.title.clone(), Style::default().fg(color)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}


pub fn keys_hint(mode: InputMode, workspace: Workspace) -> &'static str {
    match mode {
        InputMode::Prompt => " type a value  Enter confirm  Esc cancel  paste/drop paths to insert",
        InputMode::Normal => match workspace {
            Workspace::Music => {
                " Enter play  Space pause  s stop  n/p next/prev  ,/. seek  ←→ vol  m mute  z shuffle  x repeat  a add  d remove  J/K move  w/o save/open  L lyrics  Tab radio  ? help  q quit"
            }
            Workspace::Radio => {
                " Enter play/stop  Space pause  s stop  ←→ vol  m mute  + add station  i import  d remove  / filter  y copy url  Tab music  ? help  q quit"
            }
        },
    }
}

/// Mode label plus the key reference for the active workspace.
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, workspace: Workspace) {
    let p = palette();
    let (label, color) = match mode {
        InputMode::Prompt => ("INPUT", p.mode_prompt),
        InputMode::Normal => match workspace {
            Workspace::Music => ("MUSIC", p.mode_normal),
            Workspace::Radio => ("RADIO", p.mode_normal),
        },
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", label),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(keys_hint(mode, workspace), Style::default().fg(p.muted)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
