//! Component trait — the interface every view implements.
//!
//! Components own their cursor/input state and render themselves from the
//! shared `AppState`, which they never mutate. They express everything else
//! as `Action`s for the app event loop to dispatch.

use ratatui::crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::action::Action;
use crate::app_state::AppState;

pub trait Component {
    /// Handle a key event. Only called while this view is active.
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action>;

    /// Whether keystrokes currently feed a text input. While true the App
    /// suspends its global bindings (quit, view numbers, help) so typing
    /// wins.
    fn wants_text_input(&self, _state: &AppState) -> bool {
        false
    }

    /// Receive an action dispatched by the App (e.g. to prefill inputs when
    /// the view is entered).
    fn on_action(&mut self, _action: &Action, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    /// Render into `area`.
    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState);
}
