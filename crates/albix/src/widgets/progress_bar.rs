//! Seek bar: smooth Unicode fill between two `MM:SS` labels.

use albix_core::session::clock_label;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::palette;

const LABEL_W: u16 = 6; // "MM:SS " / " MM:SS"

/// Render the bar. Both labels are always shown so a stopped player reads
/// `00:00`.
pub fn draw_progress(frame: &mut Frame, area: Rect, position_ms: u64, duration_ms: u64) {
    if area.width < 4 || area.height == 0 {
        return;
    }
    let p = palette();
    let bar_w = bar_width(area.width) as usize;
    let progress = if duration_ms == 0 {
        0.0
    } else {
        (position_ms as f64 / duration_ms as f64).clamp(0.0, 1.0)
    };

    // 8 eighths per cell
    const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];
    let eighths = (progress * bar_w as f64 * 8.0) as usize;
    let full_blocks = eighths / 8;

    let mut bar = String::with_capacity(bar_w * 3);
    bar.extend(std::iter::repeat('█').take(full_blocks));
    if full_blocks < bar_w {
        bar.push(BLOCKS[eighths % 8]);
        bar.extend(std::iter::repeat('·').take(bar_w - full_blocks - 1));
    }

    let spans = vec![
        Span::styled(
            format!("{} ", clock_label(position_ms)),
            Style::default().fg(p.secondary),
        ),
        Span::styled(bar, Style::default().fg(p.playing)),
        Span::styled(
            format!(" {}", clock_label(duration_ms)),
            Style::default().fg(p.muted),
        ),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn bar_width(total: u16) -> u16 {
    total.saturating_sub(LABEL_W * 2).max(4)
}

/// Map a click at `column` to a position inside the media. `None` when the
/// click misses the bar or nothing seekable is loaded.
pub fn seek_target(area: Rect, column: u16, duration_ms: u64) -> Option<u64> {
    if duration_ms == 0 || area.width < 4 {
        return None;
    }
    let bar_x = area.x + LABEL_W;
    let bar_w = bar_width(area.width);
    if column < bar_x || column >= bar_x + bar_w {
        return None;
    }
    let fraction = (column - bar_x) as f64 / bar_w.saturating_sub(1).max(1) as f64;
    Some((fraction * duration_ms as f64).round() as u64)
}
