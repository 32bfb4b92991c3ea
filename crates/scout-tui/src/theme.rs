//! Color palette and style constants.

use ratatui::style::{Color, Modifier, Style};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_PRIMARY: Color = Color::Rgb(214, 210, 225);
pub const C_SECONDARY: Color = Color::Rgb(120, 118, 142);
pub const C_MUTED: Color = Color::Rgb(78, 76, 94);
pub const C_ACCENT: Color = Color::Rgb(178, 120, 255);
pub const C_SELECTION_BG: Color = Color::Rgb(32, 28, 46);
pub const C_PANEL_BORDER: Color = Color::Rgb(44, 40, 58);
pub const C_PANEL_BORDER_FOCUSED: Color = Color::Rgb(150, 110, 230);
pub const C_LIKE: Color = Color::Rgb(84, 200, 124);
pub const C_DISLIKE: Color = Color::Rgb(255, 92, 92);
pub const C_SCORE: Color = Color::Rgb(196, 150, 255);
pub const C_TREND: Color = Color::Rgb(255, 186, 84);
pub const C_TOAST_INFO: Color = Color::Rgb(84, 160, 222);
pub const C_TOAST_SUCCESS: Color = Color::Rgb(84, 200, 124);
pub const C_TOAST_WARNING: Color = Color::Rgb(255, 186, 84);
pub const C_TOAST_ERROR: Color = Color::Rgb(255, 92, 92);

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_default() -> Style {
    Style::default().fg(C_PRIMARY)
}

pub fn style_secondary() -> Style {
    Style::default().fg(C_SECONDARY)
}

pub fn style_accent() -> Style {
    Style::default().fg(C_ACCENT)
}

pub fn style_selected() -> Style {
    Style::default()
        .bg(C_SELECTION_BG)
        .fg(C_PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn style_focused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER_FOCUSED)
}

pub fn style_unfocused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}
