//! Bottom status bar: view tabs, active dataset, profile indicator, and
//! key hints.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::View;
use crate::app_state::AppState;
use crate::theme::{C_ACCENT, C_MUTED, C_PRIMARY, C_SECONDARY, C_TREND};

const TABS: &[(View, &str)] = &[
    (View::Home, "1 Home"),
    (View::Form, "2 Preferences"),
    (View::Results, "3 Results"),
    (View::Dashboard, "4 Dashboard"),
];

pub fn draw(frame: &mut Frame, area: Rect, active: View, state: &AppState, hint: &str) {
    let mut spans: Vec<Span> = Vec::new();

    for (view, label) in TABS {
        let style = if *view == active {
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_SECONDARY)
        };
        spans.push(Span::styled(format!(" {} ", label), style));
        spans.push(Span::styled("│", Style::default().fg(C_MUTED)));
    }

    spans.push(Span::styled(
        format!(" data:{} ", state.dataset.label()),
        Style::default().fg(C_TREND),
    ));
    let profile_label = if state.has_profile() { "profile:set" } else { "profile:none" };
    spans.push(Span::styled(
        format!(" {} ", profile_label),
        Style::default().fg(C_SECONDARY),
    ));

    if !hint.is_empty() {
        spans.push(Span::styled("│ ", Style::default().fg(C_MUTED)));
        spans.push(Span::styled(hint.to_string(), Style::default().fg(C_PRIMARY)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
