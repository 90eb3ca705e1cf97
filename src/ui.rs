//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`: the
//! tracks screen in `tracks` and the playback screen in `playback`.

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::{App, PlaybackView};
use crate::config::Settings;

mod playback;
mod tracks;

/// Glyph drawn next to every track and in the middle of the gradient.
pub const MUSIC_GLYPH: &str = "♪";

/// Keys shown in the footer of the tracks screen.
const TRACKS_CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("enter", "play selected song"),
    ("q", "quit"),
];

/// Render the controls help text for the playback screen, incorporating
/// scrub seconds.
fn playback_controls(scrub_seconds: u64) -> Vec<(String, String)> {
    let mut keys: Vec<(String, String)> = [
        ("space/p", "play/pause"),
        ("h/l", "prev/next song"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    keys.push(("H/L".to_string(), format!("scrub -/+{scrub_seconds}s")));
    keys.extend(
        [
            ("enter", "seek"),
            ("+/-", "volume"),
            ("m", "mute"),
            ("esc", "back"),
            ("q", "quit"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string())),
    );
    keys
}

fn controls_text<K: AsRef<str>, V: AsRef<str>>(keys: &[(K, V)]) -> String {
    keys.iter()
        .map(|(k, v)| format!("[{}] {}", k.as_ref(), v.as_ref()))
        .collect::<Vec<String>>()
        .join(" | ")
}

fn padded_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

fn render_footer(frame: &mut Frame, area: Rect, text: String) {
    let footer = Paragraph::new(text)
        .block(padded_block(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, area);
}

fn render_header(frame: &mut Frame, area: Rect, text: &str) {
    let header = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" encore ")
            .title_alignment(Alignment::Center),
    );
    frame.render_widget(header, area);
}

/// Render the entire UI: the playback screen when one is mounted, the track
/// list otherwise.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    playback: Option<&PlaybackView>,
    settings: &Settings,
    now: Instant,
) {
    let notice = app.notice(now);
    match playback {
        Some(view) => playback::draw(frame, view, notice, settings),
        None => tracks::draw(frame, app, notice, settings),
    }
}

#[cfg(test)]
mod tests;
