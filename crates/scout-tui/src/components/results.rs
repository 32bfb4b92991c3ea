//! Results view — the ranked recommendation list with sorting, per-song
//! like/dislike, and similar-song lookups.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use scout_proto::model::{Song, Verdict};

use crate::action::{Action, SongList, View};
use crate::app_state::AppState;
use crate::component::Component;
use crate::theme::{
    style_default, style_focused_border, style_secondary, C_ACCENT, C_MUTED, C_SECONDARY,
};
use crate::widgets::select_list::ListCursor;

use super::{song_detail_line, song_line};

/// Sort order for the results list. Popularity keeps the service's ranked
/// order; the rest sort descending on the named metric.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SortOrder {
    #[default]
    Popularity,
    Bpm,
    Year,
    Energy,
}

impl SortOrder {
    pub fn next(self) -> Self {
        match self {
            Self::Popularity => Self::Bpm,
            Self::Bpm => Self::Year,
            Self::Year => Self::Energy,
            Self::Energy => Self::Popularity,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Popularity => "popularity",
            Self::Bpm => "bpm",
            Self::Year => "year",
            Self::Energy => "energy",
        }
    }

    /// Indices of `songs` in display order. The underlying list stays in
    /// service order so feedback toggles target stable entries.
    pub fn sorted_indices(self, songs: &[Song]) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..songs.len()).collect();
        match self {
            Self::Popularity => {}
            Self::Bpm => indices.sort_by(|&a, &b| songs[b].bpm.cmp(&songs[a].bpm)),
            Self::Year => indices.sort_by(|&a, &b| songs[b].year.cmp(&songs[a].year)),
            Self::Energy => indices.sort_by(|&a, &b| songs[b].energy.cmp(&songs[a].energy)),
        }
        indices
    }
}

pub struct ResultsList {
    cursor: ListCursor,
    sort_order: SortOrder,
}

impl ResultsList {
    pub fn new() -> Self {
        Self {
            cursor: ListCursor::new(),
            sort_order: SortOrder::default(),
        }
    }

    fn selected_song_id(&self, state: &AppState) -> Option<String> {
        let order = self.sort_order.sorted_indices(&state.results);
        self.cursor
            .selected(order.len())
            .map(|i| state.results[order[i]].id.clone())
    }
}

impl Component for ResultsList {
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind != KeyEventKind::Press {
            return Vec::new();
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor.up();
                Vec::new()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor.down(state.results.len());
                Vec::new()
            }
            KeyCode::Home => {
                self.cursor.first();
                Vec::new()
            }
            KeyCode::End => {
                self.cursor.last(state.results.len());
                Vec::new()
            }
            KeyCode::Char('o') => {
                self.sort_order = self.sort_order.next();
                Vec::new()
            }
            KeyCode::Char('l') => self
                .selected_song_id(state)
                .map(|song_id| {
                    vec![Action::ToggleFeedback {
                        list: SongList::Results,
                        song_id,
                        verdict: Verdict::Like,
                    }]
                })
                .unwrap_or_default(),
            KeyCode::Char('x') => self
                .selected_song_id(state)
                .map(|song_id| {
                    vec![Action::ToggleFeedback {
                        list: SongList::Results,
                        song_id,
                        verdict: Verdict::Dislike,
                    }]
                })
                .unwrap_or_default(),
            KeyCode::Char('s') => self
                .selected_song_id(state)
                .map(|song_id| vec![Action::ShowSimilar { song_id }])
                .unwrap_or_default(),
            KeyCode::Char('b') => vec![Action::ShowView(View::Form)],
            KeyCode::Char('r') => vec![Action::Refresh],
            _ => Vec::new(),
        }
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if matches!(
            action,
            Action::Refresh | Action::SubmitPreferences(_) | Action::SwitchDataset(_)
        ) {
            self.cursor.reset();
        }
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(4)])
            .split(area);

        let header = Line::from(vec![
            Span::styled(" Your Recommendations", style_default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("  ({} songs)", state.results.len()),
                style_secondary(),
            ),
            Span::styled(
                format!("   sort: {} (o to cycle)", self.sort_order.label()),
                Style::default().fg(C_ACCENT),
            ),
            Span::styled(
                "   l: like · x: dislike · s: similar · b: back to form",
                Style::default().fg(C_MUTED),
            ),
        ]);
        frame.render_widget(Paragraph::new(header), rows[0]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(style_focused_border());
        let inner = block.inner(rows[1]);
        frame.render_widget(block, rows[1]);

        if state.loading_results {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  finding your perfect songs…",
                    style_secondary(),
                )),
                inner,
            );
            return;
        }
        if state.results.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  no recommendations — submit the preference form first (b)",
                    style_secondary(),
                )),
                inner,
            );
            return;
        }

        let order = self.sort_order.sorted_indices(&state.results);
        let selected = self.cursor.selected(order.len());
        let mut lines: Vec<Line> = Vec::new();
        let visible = (inner.height as usize).max(1);
        for i in self.cursor.window(order.len(), visible.saturating_sub(2).max(1)) {
            let song = &state.results[order[i]];
            let is_selected = selected == Some(i);
            lines.push(song_line(song, is_selected));
            if is_selected {
                lines.push(song_detail_line(song));
                if let Some(similar) = state.similar.get(&song.id) {
                    for sim in similar.iter().take(4) {
                        lines.push(Line::from(Span::styled(
                            format!("      ~ {} ({})", sim.title, sim.artist),
                            Style::default().fg(C_SECONDARY),
                        )));
                    }
                }
            }
            if lines.len() >= visible {
                break;
            }
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testutil::sample_songs;

    #[test]
    fn test_popularity_keeps_service_order() {
        let songs = sample_songs(4);
        assert_eq!(SortOrder::Popularity.sorted_indices(&songs), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_metric_sorts_descend() {
        let mut songs = sample_songs(3);
        songs[0].bpm = 90;
        songs[1].bpm = 140;
        songs[2].bpm = 120;
        assert_eq!(SortOrder::Bpm.sorted_indices(&songs), vec![1, 2, 0]);

        songs[0].year = 2020;
        songs[1].year = 1999;
        songs[2].year = 2005;
        assert_eq!(SortOrder::Year.sorted_indices(&songs), vec![0, 2, 1]);
    }

    #[test]
    fn test_sort_cycle_wraps() {
        let mut order = SortOrder::default();
        for _ in 0..4 {
            order = order.next();
        }
        assert_eq!(order, SortOrder::Popularity);
    }
}
