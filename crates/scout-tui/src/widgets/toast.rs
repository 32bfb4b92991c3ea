//! Toast notifications — transient status messages in the bottom-right
//! corner, plus a persistent spinner for long-running remote work
//! (retraining, uploads).

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use unicode_width::UnicodeWidthStr;

use crate::theme::{C_TOAST_ERROR, C_TOAST_INFO, C_TOAST_SUCCESS, C_TOAST_WARNING};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    fn color(self) -> ratatui::style::Color {
        match self {
            Self::Info => C_TOAST_INFO,
            Self::Success => C_TOAST_SUCCESS,
            Self::Warning => C_TOAST_WARNING,
            Self::Error => C_TOAST_ERROR,
        }
    }

    fn marker(self) -> &'static str {
        match self {
            Self::Info => "·",
            Self::Success => "✓",
            Self::Warning => "!",
            Self::Error => "✗",
        }
    }
}

struct Toast {
    message: String,
    severity: Severity,
    expires: Instant,
}

const SPINNER_FRAMES: &[&str] = &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];
const MAX_VISIBLE: usize = 4;

#[derive(Default)]
pub struct ToastManager {
    toasts: VecDeque<Toast>,
    spinner: Option<(String, usize)>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity, duration: Duration) {
        let message = message.into();
        self.toasts.retain(|t| t.message != message);
        self.toasts.push_back(Toast {
            message,
            severity,
            expires: Instant::now() + duration,
        });
        while self.toasts.len() > MAX_VISIBLE * 2 {
            self.toasts.pop_front();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Info, Duration::from_secs(3));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Success, Duration::from_secs(3));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Warning, Duration::from_secs(4));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Error, Duration::from_secs(5));
    }

    /// Start (or replace) the persistent spinner; it animates each tick
    /// until resolved or dismissed.
    pub fn spinner(&mut self, message: impl Into<String>) {
        self.spinner = Some((message.into(), 0));
    }

    /// Replace the spinner with a normal expiring toast.
    pub fn resolve_spinner(&mut self, severity: Severity, message: impl Into<String>) {
        self.spinner = None;
        let duration = match severity {
            Severity::Error => Duration::from_secs(5),
            _ => Duration::from_secs(3),
        };
        self.push(message, severity, duration);
    }

    /// Drop expired toasts and advance the spinner. Call each tick.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.toasts.retain(|t| t.expires > now);
        if let Some((_, frame)) = &mut self.spinner {
            *frame = (*frame + 1) % SPINNER_FRAMES.len();
        }
    }

    /// Render toasts stacked above the bottom-right corner of `area`.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let mut lines: Vec<(String, ratatui::style::Color)> = Vec::new();
        if let Some((message, spin_frame)) = &self.spinner {
            lines.push((
                format!("{} {}", SPINNER_FRAMES[*spin_frame], message),
                C_TOAST_INFO,
            ));
        }
        for toast in self.toasts.iter().rev().take(MAX_VISIBLE) {
            lines.push((
                format!("{} {}", toast.severity.marker(), toast.message),
                toast.severity.color(),
            ));
        }
        if lines.is_empty() {
            return;
        }

        for (i, (text, color)) in lines.iter().enumerate() {
            let width = (text.width() as u16 + 2).min(area.width.saturating_sub(2));
            let y = area.bottom().saturating_sub(2 + i as u16);
            if y <= area.top() {
                break;
            }
            let rect = Rect {
                x: area.right().saturating_sub(width + 1),
                y,
                width,
                height: 1,
            };
            frame.render_widget(Clear, rect);
            let para = Paragraph::new(Line::from(Span::styled(
                format!(" {} ", text),
                Style::default().fg(*color).add_modifier(Modifier::BOLD),
            )));
            frame.render_widget(para, rect);
        }
    }
}
