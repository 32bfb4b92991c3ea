//! Home view — personalized recommendations, trending songs, and the
//! dataset controls (switch, upload, demo download).

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use scout_proto::model::{DatasetSource, Verdict};

use crate::action::{Action, SongList};
use crate::app_state::AppState;
use crate::component::Component;
use crate::theme::{
    style_accent, style_default, style_focused_border, style_secondary, style_unfocused_border,
    C_ACCENT, C_MUTED, C_SECONDARY,
};
use crate::widgets::select_list::ListCursor;

use super::{song_detail_line, song_line};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Personalized,
    Trending,
}

pub struct HomePanel {
    section: Section,
    recs_cursor: ListCursor,
    trending_cursor: ListCursor,
    /// Path prompt for a dataset upload; `Some` while the user is typing.
    upload_input: Option<Input>,
}

impl HomePanel {
    pub fn new() -> Self {
        Self {
            section: Section::Personalized,
            recs_cursor: ListCursor::new(),
            trending_cursor: ListCursor::new(),
            upload_input: None,
        }
    }

    fn selected_rec_id(&self, state: &AppState) -> Option<String> {
        self.recs_cursor
            .selected(state.home_recs.len())
            .map(|i| state.home_recs[i].id.clone())
    }

    fn handle_upload_input(&mut self, key: KeyEvent) -> Vec<Action> {
        let input = match self.upload_input.as_mut() {
            Some(input) => input,
            None => return Vec::new(),
        };
        match key.code {
            KeyCode::Esc => {
                self.upload_input = None;
                Vec::new()
            }
            KeyCode::Enter => {
                let path = input.value().trim().to_string();
                self.upload_input = None;
                if path.is_empty() {
                    Vec::new()
                } else {
                    vec![Action::UploadDataset(path)]
                }
            }
            _ => {
                input.handle_event(&ratatui::crossterm::event::Event::Key(key));
                Vec::new()
            }
        }
    }
}

impl Component for HomePanel {
    fn wants_text_input(&self, _state: &AppState) -> bool {
        self.upload_input.is_some()
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind != KeyEventKind::Press {
            return Vec::new();
        }
        if self.upload_input.is_some() {
            return self.handle_upload_input(key);
        }

        match key.code {
            KeyCode::Tab => {
                self.section = match self.section {
                    Section::Personalized => Section::Trending,
                    Section::Trending => Section::Personalized,
                };
                Vec::new()
            }
            KeyCode::Up | KeyCode::Char('k') => {
                match self.section {
                    Section::Personalized => self.recs_cursor.up(),
                    Section::Trending => self.trending_cursor.up(),
                }
                Vec::new()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                match self.section {
                    Section::Personalized => self.recs_cursor.down(state.home_recs.len()),
                    Section::Trending => self.trending_cursor.down(state.trending.len()),
                }
                Vec::new()
            }
            KeyCode::Char('s') if self.section == Section::Personalized => self
                .selected_rec_id(state)
                .map(|song_id| vec![Action::ShowSimilar { song_id }])
                .unwrap_or_default(),
            KeyCode::Char('l') if self.section == Section::Personalized => self
                .selected_rec_id(state)
                .map(|song_id| {
                    vec![Action::ToggleFeedback {
                        list: SongList::HomeRecs,
                        song_id,
                        verdict: Verdict::Like,
                    }]
                })
                .unwrap_or_default(),
            KeyCode::Char('x') if self.section == Section::Personalized => self
                .selected_rec_id(state)
                .map(|song_id| {
                    vec![Action::ToggleFeedback {
                        list: SongList::HomeRecs,
                        song_id,
                        verdict: Verdict::Dislike,
                    }]
                })
                .unwrap_or_default(),
            KeyCode::Char('d') => vec![Action::SwitchDataset(DatasetSource::Demo)],
            KeyCode::Char('U') => vec![Action::SwitchDataset(DatasetSource::Uploaded)],
            KeyCode::Char('u') => {
                self.upload_input = Some(Input::default());
                Vec::new()
            }
            KeyCode::Char('D') => vec![Action::DownloadDemo],
            KeyCode::Char('r') => vec![Action::Refresh],
            _ => Vec::new(),
        }
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        // Fresh data after a refresh or dataset switch: reset the cursors so
        // the selection never points into the previous catalog's rows.
        if matches!(action, Action::Refresh | Action::SwitchDataset(_)) {
            self.recs_cursor.reset();
            self.trending_cursor.reset();
        }
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Percentage(55),
                Constraint::Min(4),
            ])
            .split(area);

        self.draw_controls(frame, rows[0], state);
        self.draw_personalized(frame, rows[1], state);
        self.draw_trending(frame, rows[2], state);
    }
}

impl HomePanel {
    fn draw_controls(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        if let Some(input) = &self.upload_input {
            let line = Line::from(vec![
                Span::styled(" upload csv path: ", style_accent()),
                Span::styled(input.value().to_string(), style_default()),
                Span::styled("█", style_accent()),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            return;
        }

        let uploaded_style = if state.upload_ok {
            style_default()
        } else {
            Style::default().fg(C_MUTED)
        };
        let line = Line::from(vec![
            Span::styled(" catalog: ", style_secondary()),
            Span::styled(
                "[d]emo",
                if state.dataset == DatasetSource::Demo {
                    style_accent().add_modifier(Modifier::BOLD)
                } else {
                    style_default()
                },
            ),
            Span::raw("  "),
            Span::styled(
                "[U]ploaded",
                if state.dataset == DatasetSource::Uploaded {
                    style_accent().add_modifier(Modifier::BOLD)
                } else {
                    uploaded_style
                },
            ),
            Span::styled("   [u]pload csv   [D]ownload demo csv", style_secondary()),
        ]);
        let meta_line = Line::from(Span::styled(
            format!(
                " catalog meta: {} genres · {} artists · {} moods",
                state.meta.genres.len(),
                state.meta.artists.len(),
                state.meta.moods.len()
            ),
            Style::default().fg(C_MUTED),
        ));
        frame.render_widget(Paragraph::new(vec![line, meta_line]), area);
    }

    fn draw_personalized(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let focused = self.section == Section::Personalized;
        let block = Block::default()
            .title(" Your Personalized Recommendations ")
            .borders(Borders::ALL)
            .border_style(if focused {
                style_focused_border()
            } else {
                style_unfocused_border()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if state.loading_home {
            frame.render_widget(
                Paragraph::new(Span::styled("  loading…", style_secondary())),
                inner,
            );
            return;
        }
        if !state.has_profile() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  no preferences yet — press 2 to tell us your taste",
                    style_secondary(),
                )),
                inner,
            );
            return;
        }
        if state.home_recs.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  nothing to recommend yet", style_secondary())),
                inner,
            );
            return;
        }

        let selected = self.recs_cursor.selected(state.home_recs.len());
        let mut lines: Vec<Line> = Vec::new();
        // Rough budget: each selected row expands with detail + similar list.
        let visible = inner.height as usize;
        for i in self.recs_cursor.window(state.home_recs.len(), visible.saturating_sub(2).max(1)) {
            let song = &state.home_recs[i];
            let is_selected = focused && selected == Some(i);
            lines.push(song_line(song, is_selected));
            if is_selected {
                lines.push(song_detail_line(song));
                if let Some(similar) = state.similar.get(&song.id) {
                    lines.push(Line::from(Span::styled(
                        "    similar:",
                        Style::default().fg(C_ACCENT),
                    )));
                    for sim in similar.iter().take(4) {
                        lines.push(Line::from(Span::styled(
                            format!("      {} ({})", sim.title, sim.artist),
                            Style::default().fg(C_SECONDARY),
                        )));
                    }
                } else {
                    lines.push(Line::from(Span::styled(
                        "    s: show similar songs",
                        Style::default().fg(C_MUTED),
                    )));
                }
            }
            if lines.len() >= visible {
                break;
            }
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn draw_trending(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let focused = self.section == Section::Trending;
        let block = Block::default()
            .title(" Trending Songs ")
            .borders(Borders::ALL)
            .border_style(if focused {
                style_focused_border()
            } else {
                style_unfocused_border()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if state.trending.is_empty() {
            let message = if state.loading_home {
                "  loading…"
            } else {
                "  no trending songs yet"
            };
            frame.render_widget(Paragraph::new(Span::styled(message, style_secondary())), inner);
            return;
        }

        let selected = self.trending_cursor.selected(state.trending.len());
        let mut lines: Vec<Line> = Vec::new();
        for i in self
            .trending_cursor
            .window(state.trending.len(), inner.height as usize)
        {
            let song = &state.trending[i];
            lines.push(song_line(song, focused && selected == Some(i)));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }
}
