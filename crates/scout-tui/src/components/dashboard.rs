//! Dashboard view — feedback totals, most-liked songs, recent sessions,
//! and the model retrain trigger.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::action::Action;
use crate::app_state::AppState;
use crate::component::Component;
use crate::theme::{
    style_default, style_secondary, style_unfocused_border, C_ACCENT, C_DISLIKE, C_LIKE, C_MUTED,
    C_TREND,
};
use crate::widgets::select_list::ListCursor;

/// Ellipsize `text` to at most `max` characters.
fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

pub struct Dashboard {
    sessions_cursor: ListCursor,
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            sessions_cursor: ListCursor::new(),
        }
    }

    fn draw_stats(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(style_unfocused_border())
            .title(Span::styled(" Feedback ", style_default()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let stats = &state.stats;
        let lines = vec![
            Line::from(vec![
                Span::styled("  likes    ", style_secondary()),
                Span::styled(
                    stats.likes.to_string(),
                    Style::default().fg(C_LIKE).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("  dislikes ", style_secondary()),
                Span::styled(
                    stats.dislikes.to_string(),
                    Style::default().fg(C_DISLIKE).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("  total    ", style_secondary()),
                Span::styled(stats.total.to_string(), style_default()),
            ]),
            Line::from(vec![
                Span::styled("  positive ", style_secondary()),
                Span::styled(
                    format!("{:.0}%", stats.positive_pct()),
                    Style::default().fg(C_ACCENT),
                ),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn draw_top_songs(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(style_unfocused_border())
            .title(Span::styled(" Most Liked ", style_default()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if state.top_songs.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  no feedback yet", style_secondary())),
                inner,
            );
            return;
        }
        let lines: Vec<Line> = state
            .top_songs
            .iter()
            .take(inner.height as usize)
            .enumerate()
            .map(|(i, (title, likes))| {
                Line::from(vec![
                    Span::styled(format!("  {:>2}. ", i + 1), Style::default().fg(C_MUTED)),
                    Span::styled(title.clone(), style_default()),
                    Span::styled(
                        format!("  {} likes", likes),
                        Style::default().fg(C_TREND),
                    ),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn draw_sessions(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(style_unfocused_border())
            .title(Span::styled(" Recent Sessions ", style_default()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if state.sessions.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  no recorded sessions", style_secondary())),
                inner,
            );
            return;
        }

        let selected = self.sessions_cursor.selected(state.sessions.len());
        // Each session takes two rows.
        let visible = ((inner.height as usize) / 2).max(1);
        let mut lines: Vec<Line> = Vec::new();
        for i in self.sessions_cursor.window(state.sessions.len(), visible) {
            let session = &state.sessions[i];
            let marker = if selected == Some(i) { "▸" } else { " " };
            lines.push(Line::from(vec![
                Span::styled(format!(" {} ", marker), Style::default().fg(C_ACCENT)),
                Span::styled(session.local_time(), style_default()),
                Span::styled(
                    format!(
                        "  {} songs · {} feedback",
                        session.recommended_songs.len(),
                        session.feedback.len()
                    ),
                    style_secondary(),
                ),
            ]));
            lines.push(Line::from(Span::styled(
                format!("     {}", preview(&session.preferences.summary(), 64)),
                Style::default().fg(C_MUTED),
            )));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Component for Dashboard {
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind != KeyEventKind::Press {
            return Vec::new();
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.sessions_cursor.up();
                Vec::new()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.sessions_cursor.down(state.sessions.len());
                Vec::new()
            }
            KeyCode::Char('R') => vec![Action::Retrain],
            KeyCode::Char('r') => vec![Action::Refresh],
            _ => Vec::new(),
        }
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if matches!(action, Action::Refresh) {
            self.sessions_cursor.reset();
        }
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(7),
                Constraint::Min(5),
            ])
            .split(area);

        let retrain_hint = if state.retraining {
            Span::styled("   retraining…", Style::default().fg(C_TREND))
        } else {
            Span::styled("   R: retrain model · r: refresh", Style::default().fg(C_MUTED))
        };
        let header = Line::from(vec![
            Span::styled(
                " Admin Dashboard",
                style_default().add_modifier(Modifier::BOLD),
            ),
            retrain_hint,
        ]);
        frame.render_widget(Paragraph::new(header), rows[0]);

        if state.loading_dashboard {
            frame.render_widget(
                Paragraph::new(Span::styled("  loading dashboard…", style_secondary())),
                rows[1],
            );
            return;
        }

        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows[1]);
        self.draw_stats(frame, cards[0], state);
        self.draw_top_songs(frame, cards[1], state);
        self.draw_sessions(frame, rows[2], state);
    }
}
