//! Preference form — genre/artist/mood pickers driven by the catalog
//! metadata, with type-to-filter. Submitting overwrites the saved profile
//! wholesale and moves to the results view.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use scout_proto::model::PreferenceProfile;

use crate::action::{Action, View};
use crate::app_state::AppState;
use crate::component::Component;
use crate::theme::{
    style_accent, style_default, style_focused_border, style_secondary, style_selected,
    style_unfocused_border, C_MUTED,
};
use crate::widgets::select_list::ListCursor;

const FIELD_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Genre = 0,
    Artist = 1,
    Mood = 2,
}

impl Field {
    fn from_index(i: usize) -> Self {
        match i {
            0 => Self::Genre,
            1 => Self::Artist,
            _ => Self::Mood,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Genre => "Preferred genre",
            Self::Artist => "Favorite artist",
            Self::Mood => "Current mood",
        }
    }

    fn key(self) -> &'static str {
        match self {
            Self::Genre => "genre",
            Self::Artist => "artist",
            Self::Mood => "mood",
        }
    }
}

struct FieldState {
    filter: Input,
    cursor: ListCursor,
    chosen: Option<String>,
}

impl FieldState {
    fn new() -> Self {
        Self {
            filter: Input::default(),
            cursor: ListCursor::new(),
            chosen: None,
        }
    }

    fn options<'a>(&self, all: &'a [String]) -> Vec<&'a String> {
        let needle = self.filter.value().to_lowercase();
        all.iter()
            .filter(|o| needle.is_empty() || o.to_lowercase().contains(&needle))
            .collect()
    }
}

pub struct PrefForm {
    fields: [FieldState; FIELD_COUNT],
    active: usize,
}

impl PrefForm {
    pub fn new() -> Self {
        Self {
            fields: [FieldState::new(), FieldState::new(), FieldState::new()],
            active: 0,
        }
    }

    fn options_for(&self, field: Field, state: &AppState) -> Vec<String> {
        let all = match field {
            Field::Genre => &state.meta.genres,
            Field::Artist => &state.meta.artists,
            Field::Mood => &state.meta.moods,
        };
        self.fields[field as usize]
            .options(all)
            .into_iter()
            .cloned()
            .collect()
    }

    fn build_profile(&self) -> PreferenceProfile {
        let mut profile = PreferenceProfile::new();
        for i in 0..FIELD_COUNT {
            if let Some(value) = &self.fields[i].chosen {
                profile.set(Field::from_index(i).key(), value.as_str());
            }
        }
        profile
    }
}

impl Component for PrefForm {
    // The whole form is typeable; the App keeps only Ctrl+C global here.
    fn wants_text_input(&self, _state: &AppState) -> bool {
        true
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind != KeyEventKind::Press {
            return Vec::new();
        }

        // Submit from any field.
        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Action::SubmitPreferences(self.build_profile())];
        }

        let field = Field::from_index(self.active);
        match key.code {
            KeyCode::Tab => {
                self.active = (self.active + 1) % FIELD_COUNT;
                Vec::new()
            }
            KeyCode::BackTab => {
                self.active = (self.active + FIELD_COUNT - 1) % FIELD_COUNT;
                Vec::new()
            }
            KeyCode::Up => {
                self.fields[self.active].cursor.up();
                Vec::new()
            }
            KeyCode::Down => {
                let len = self.options_for(field, state).len();
                self.fields[self.active].cursor.down(len);
                Vec::new()
            }
            KeyCode::Enter => {
                let options = self.options_for(field, state);
                let slot = &mut self.fields[self.active];
                if let Some(i) = slot.cursor.selected(options.len()) {
                    slot.chosen = Some(options[i].clone());
                }
                // Convenience: choosing the last field submits.
                if self.active + 1 < FIELD_COUNT {
                    self.active += 1;
                    Vec::new()
                } else {
                    vec![Action::SubmitPreferences(self.build_profile())]
                }
            }
            KeyCode::Esc => {
                // Esc backs out one layer: filter, then choice, then the form.
                let slot = &mut self.fields[self.active];
                if !slot.filter.value().is_empty() {
                    slot.filter = Input::default();
                    slot.cursor.reset();
                    Vec::new()
                } else if slot.chosen.is_some() {
                    slot.chosen = None;
                    Vec::new()
                } else {
                    vec![Action::ShowView(View::Home)]
                }
            }
            _ => {
                let slot = &mut self.fields[self.active];
                slot.filter
                    .handle_event(&ratatui::crossterm::event::Event::Key(key));
                slot.cursor.reset();
                Vec::new()
            }
        }
    }

    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action> {
        // Prefill the pickers from the saved profile when the form opens,
        // so "get more recommendations" keeps the previous answers.
        if let Action::ShowView(View::Form) = action {
            if let Some(profile) = &state.profile {
                for i in 0..FIELD_COUNT {
                    let key = Field::from_index(i).key();
                    self.fields[i].chosen = profile.get_str(key).map(str::to_string);
                }
            }
        }
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(6),
                Constraint::Length(1),
            ])
            .split(area);

        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(
                    " Tell us your music preferences",
                    style_default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    " the more detail you give, the better the recommendations",
                    style_secondary(),
                )),
            ]),
            rows[0],
        );

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(33),
                Constraint::Percentage(33),
                Constraint::Percentage(34),
            ])
            .split(rows[1]);

        for i in 0..FIELD_COUNT {
            self.draw_field(frame, columns[i], Field::from_index(i), state);
        }

        frame.render_widget(
            Paragraph::new(Span::styled(
                " Tab: next field · type to filter · ↑↓ + Enter: choose · Ctrl-S: get recommendations · Esc: back",
                Style::default().fg(C_MUTED),
            )),
            rows[2],
        );
    }
}

impl PrefForm {
    fn draw_field(&mut self, frame: &mut Frame, area: Rect, field: Field, state: &AppState) {
        let focused = self.active == field as usize;
        let slot = &self.fields[field as usize];
        let title = match &slot.chosen {
            Some(value) => format!(" {} — {} ", field.label(), value),
            None => format!(" {} ", field.label()),
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(if focused {
                style_focused_border()
            } else {
                style_unfocused_border()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let options = self.options_for(field, state);
        let slot = &mut self.fields[field as usize];

        let mut lines = vec![Line::from(vec![
            Span::styled("filter: ", style_secondary()),
            Span::styled(slot.filter.value().to_string(), style_accent()),
            Span::styled(if focused { "█" } else { "" }, style_accent()),
        ])];

        let height = (inner.height as usize).saturating_sub(1);
        let selected = slot.cursor.selected(options.len());
        for i in slot.cursor.window(options.len(), height) {
            let style = if focused && selected == Some(i) {
                style_selected()
            } else if slot.chosen.as_deref() == Some(options[i].as_str()) {
                style_accent()
            } else {
                style_default()
            };
            lines.push(Line::from(Span::styled(format!(" {}", options[i]), style)));
        }
        if options.is_empty() {
            lines.push(Line::from(Span::styled(" (no matches)", style_secondary())));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }
}
