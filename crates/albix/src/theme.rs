//! Color palettes and style helpers.
//!
//! Two palettes, dark and light, switched at runtime with [`set_theme`].
//! Components always go through [`palette`] or the `style_*` helpers so a
//! switch takes effect on the next frame.

use std::sync::atomic::{AtomicBool, Ordering};

use albix_core::config::ThemeName;
use ratatui::style::{Color, Style};

static LIGHT: AtomicBool = AtomicBool::new(false);

#[derive(Debug)]
pub struct Palette {
    pub bg: Color,
    pub accent: Color,
    pub playing: Color,
    pub paused: Color,
    pub muted: Color,
    pub separator: Color,
    pub secondary: Color,
    pub primary: Color,
    pub selection_bg: Color,
    pub panel_border: Color,
    pub panel_border_focused: Color,
    pub number_hint: Color,
    pub prompt_bg: Color,
    pub prompt_fg: Color,
    pub video: Color,
    pub custom: Color,
    pub lyric_current: Color,
    pub toast_info: Color,
    pub toast_warning: Color,
    pub toast_error: Color,
    pub badge_ok: Color,
    pub badge_err: Color,
    pub badge_pending: Color,
    pub mode_normal: Color,
    pub mode_prompt: Color,
}

pub const DARK: Palette = Palette {
    bg: Color::Rgb(18, 18, 18),
    accent: Color::Rgb(255, 95, 95),
    playing: Color::Rgb(80, 200, 120),
    paused: Color::Rgb(255, 184, 80),
    muted: Color::Rgb(72, 72, 88),
    separator: Color::Rgb(40, 40, 52),
    secondary: Color::Rgb(115, 115, 138),
    primary: Color::Rgb(210, 210, 225),
    selection_bg: Color::Rgb(28, 28, 40),
    panel_border: Color::Rgb(40, 40, 52),
    panel_border_focused: Color::Rgb(120, 100, 200),
    number_hint: Color::Rgb(90, 90, 115),
    prompt_bg: Color::Rgb(20, 20, 32),
    prompt_fg: Color::Rgb(255, 200, 80),
    video: Color::Rgb(80, 140, 200),
    custom: Color::Rgb(180, 120, 220),
    lyric_current: Color::Rgb(255, 210, 50),
    toast_info: Color::Rgb(80, 160, 220),
    toast_warning: Color::Rgb(255, 184, 80),
    toast_error: Color::Rgb(255, 95, 95),
    badge_ok: Color::Rgb(80, 200, 120),
    badge_err: Color::Rgb(255, 95, 95),
    badge_pending: Color::Rgb(255, 184, 80),
    mode_normal: Color::Rgb(115, 115, 138),
    mode_prompt: Color::Rgb(255, 200, 80),
};

pub const LIGHT_PALETTE: Palette = Palette {
    bg: Color::Rgb(246, 246, 242),
    accent: Color::Rgb(200, 40, 60),
    playing: Color::Rgb(20, 130, 70),
    paused: Color::Rgb(190, 110, 0),
    muted: Color::Rgb(160, 160, 170),
    separator: Color::Rgb(210, 210, 215),
    secondary: Color::Rgb(95, 95, 110),
    primary: Color::Rgb(30, 30, 40),
    selection_bg: Color::Rgb(222, 222, 235),
    panel_border: Color::Rgb(200, 200, 210),
    panel_border_focused: Color::Rgb(90, 60, 180),
    number_hint: Color::Rgb(140, 140, 160),
    prompt_bg: Color::Rgb(235, 235, 225),
    prompt_fg: Color::Rgb(150, 90, 0),
    video: Color::Rgb(30, 100, 170),
    custom: Color::Rgb(130, 60, 170),
    lyric_current: Color::Rgb(170, 110, 0),
    toast_info: Color::Rgb(30, 110, 180),
    toast_warning: Color::Rgb(180, 110, 0),
    toast_error: Color::Rgb(200, 40, 60),
    badge_ok: Color::Rgb(20, 130, 70),
    badge_err: Color::Rgb(200, 40, 60),
    badge_pending: Color::Rgb(180, 110, 0),
    mode_normal: Color::Rgb(95, 95, 110),
    mode_prompt: Color::Rgb(150, 90, 0),
};

pub fn set_theme(name: ThemeName) {
    LIGHT.store(name == ThemeName::Light, Ordering::Relaxed);
}

pub fn current_theme() -> ThemeName {
    if LIGHT.load(Ordering::Relaxed) {
        ThemeName::Light
    } else {
        ThemeName::Dark
    }
}

/// Flip between dark and light; returns the new theme.
pub fn toggle_theme() -> ThemeName {
    let next = match current_theme() {
        ThemeName::Dark => ThemeName::Light,
        ThemeName::Light => ThemeName::Dark,
    };
    set_theme(next);
    next
}

pub fn palette() -> &'static Palette {
    match current_theme() {
        ThemeName::Dark => &DARK,
        ThemeName::Light => &LIGHT_PALETTE,
    }
}

// ── Predefined styles ─────────────────────────────────────────────────────────

/// Full-screen background.
pub fn style_base() -> Style {
    let p = palette();
    Style::default().fg(p.primary).bg(p.bg)
}

pub fn style_focused_border() -> Style {
    Style::default().fg(palette().panel_border_focused)
}

pub fn style_unfocused_border() -> Style {
    Style::default().fg(palette().panel_border)
}

pub fn style_prompt() -> Style {
    let p = palette();
    Style::default().fg(p.prompt_fg).bg(p.prompt_bg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_switches_palette() {
        set_theme(ThemeName::Dark);
        assert_eq!(palette().bg, DARK.bg);
        assert_eq!(toggle_theme(), ThemeName::Light);
        assert_eq!(palette().bg, LIGHT_PALETTE.bg);
        assert_eq!(style_base().bg, Some(LIGHT_PALETTE.bg));
        assert_eq!(toggle_theme(), ThemeName::Dark);
    }
}
