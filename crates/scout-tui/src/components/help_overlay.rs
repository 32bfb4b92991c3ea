//! HelpOverlay — centered popup with keyboard shortcut reference.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::theme::{C_MUTED, C_PANEL_BORDER, C_PRIMARY, C_SECONDARY};

/// Drawn over whichever view is active; drains all key events while open.
pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Returns true if the key was consumed by the overlay.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press || !self.visible {
            return false;
        }
        if matches!(
            key.code,
            KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc
        ) {
            self.visible = false;
        }
        true
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let popup = centered_rect(64, 26, area);

        let help_lines: Vec<Line> = vec![
            Line::from(Span::styled(
                " keyboard shortcuts",
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                " views",
                Style::default().fg(C_MUTED).add_modifier(Modifier::BOLD),
            )),
            help_row("1 / 2 / 3 / 4", "home / preferences / results / dashboard"),
            help_row("r", "refresh current view"),
            Line::from(""),
            Line::from(Span::styled(
                " song lists",
                Style::default().fg(C_MUTED).add_modifier(Modifier::BOLD),
            )),
            help_row("↑ / ↓  or  j / k", "move selection"),
            help_row("l / x", "like / dislike selected song"),
            help_row("s", "show similar songs"),
            help_row("o", "cycle sort order (results)"),
            Line::from(""),
            Line::from(Span::styled(
                " datasets (home)",
                Style::default().fg(C_MUTED).add_modifier(Modifier::BOLD),
            )),
            help_row("d / U", "switch to demo / uploaded catalog"),
            help_row("u", "upload a CSV catalog"),
            help_row("D", "download the demo CSV"),
            Line::from(""),
            Line::from(Span::styled(
                " preference form",
                Style::default().fg(C_MUTED).add_modifier(Modifier::BOLD),
            )),
            help_row("tab / shift-tab", "next / previous field"),
            help_row("enter", "choose option, advance (submits on last)"),
            help_row("ctrl+s", "submit from any field"),
            Line::from(""),
            Line::from(Span::styled(
                " dashboard",
                Style::default().fg(C_MUTED).add_modifier(Modifier::BOLD),
            )),
            help_row("R", "retrain the recommendation model"),
            Line::from(""),
            help_row("?", "toggle this help overlay"),
            help_row("q / Ctrl+C", "quit"),
            Line::from(""),
            Line::from(Span::styled(
                " press ? or esc to close",
                Style::default().fg(C_MUTED),
            )),
        ];

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(help_lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(C_PANEL_BORDER))
                        .style(Style::default().bg(ratatui::style::Color::Rgb(18, 18, 26))),
                )
                .wrap(Wrap { trim: false }),
            popup,
        );
    }
}

fn help_row<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!("{:<18}", key),
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        ),
        Span::styled(desc, Style::default().fg(C_SECONDARY)),
    ])
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
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
