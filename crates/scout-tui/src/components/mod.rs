//! View components — one per navigable screen.

pub mod dashboard;
pub mod help_overlay;
pub mod home;
pub mod pref_form;
pub mod results;

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use scout_proto::model::Song;

use crate::theme::{
    style_selected, C_DISLIKE, C_LIKE, C_MUTED, C_PRIMARY, C_SCORE, C_SECONDARY, C_TREND,
};

/// One song row: feedback marker, title — artist, and a right-hand detail
/// (confidence, likes, or nothing).
pub fn song_line(song: &Song, selected: bool) -> Line<'static> {
    let mut spans: Vec<Span> = Vec::new();

    let marker = if song.liked {
        Span::styled("▲ ", Style::default().fg(C_LIKE))
    } else if song.disliked {
        Span::styled("▼ ", Style::default().fg(C_DISLIKE))
    } else {
        Span::styled("  ", Style::default())
    };
    spans.push(marker);

    spans.push(Span::styled(
        song.title.clone(),
        Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::styled(
        format!("  {}", song.artist),
        Style::default().fg(C_SECONDARY),
    ));
    if !song.genre.is_empty() {
        spans.push(Span::styled(
            format!("  [{}]", song.genre),
            Style::default().fg(C_MUTED),
        ));
    }

    if let Some(score) = song.score {
        spans.push(Span::styled(
            format!("  {:.1}%", score * 100.0),
            Style::default().fg(C_SCORE),
        ));
    }
    if let Some(likes) = song.likes {
        spans.push(Span::styled(
            format!("  {} likes", likes),
            Style::default().fg(C_TREND),
        ));
    }

    let mut line = Line::from(spans);
    if selected {
        line = line.style(style_selected());
    }
    line
}

/// The metric detail line shown for a highlighted song.
pub fn song_detail_line(song: &Song) -> Line<'static> {
    Line::from(vec![
        Span::styled("    ", Style::default()),
        Span::styled(
            format!(
                "year {}  ·  {} bpm  ·  energy {}%  ·  dance {}%  ·  {}",
                song.year, song.bpm, song.energy, song.danceability, song.duration
            ),
            Style::default().fg(C_SECONDARY),
        ),
    ])
}
