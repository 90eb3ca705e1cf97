use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, LineGauge, Paragraph, Widget, Wrap},
};

use crate::app::PlaybackView;
use crate::config::Settings;
use crate::session::{SessionSnapshot, SessionState, format_time};
use crate::visualizer::Rgb;

use super::{MUSIC_GLYPH, controls_text, padded_block, playback_controls, render_footer};

/// Horizontal two-colour gradient with the music glyph in the middle.
pub struct Gradient {
    pub left: Rgb,
    pub right: Rgb,
}

impl Widget for Gradient {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let span = area.width.saturating_sub(1).max(1) as f32;
        for x in 0..area.width {
            let color: Color = self.left.lerp(self.right, x as f32 / span).into();
            for y in 0..area.height {
                buf[(area.x + x, area.y + y)].set_bg(color);
            }
        }
        let center = (area.x + area.width / 2, area.y + area.height / 2);
        buf[center].set_symbol(MUSIC_GLYPH).set_fg(Color::White);
    }
}

/// `1:05 / 3:20`, or a loading label until the engine reports times.
pub(super) fn time_text(snapshot: &SessionSnapshot) -> String {
    if snapshot.state == SessionState::Idle {
        return "Not loaded".to_string();
    }
    if snapshot.is_loading() {
        return "Loading…".to_string();
    }
    let position = snapshot.position.map(format_time).unwrap_or_default();
    let total = snapshot
        .duration
        .map(format_time)
        .unwrap_or_else(|| "?:??".to_string());
    format!("{position} / {total}")
}

fn transport_line(snapshot: &SessionSnapshot) -> Line<'static> {
    let enabled = Style::default().add_modifier(Modifier::BOLD);
    let disabled = Style::default().fg(Color::DarkGray);
    let side = |on: bool| if on { enabled } else { disabled };

    let play = if snapshot.is_playing { "⏸" } else { "▶" };
    let play_style = if snapshot.state == SessionState::Idle {
        disabled
    } else {
        enabled
    };

    Line::from(vec![
        Span::styled("⏮", side(snapshot.has_previous())),
        Span::raw("   "),
        Span::styled(play, play_style),
        Span::raw("   "),
        Span::styled("⏭", side(snapshot.has_next())),
    ])
}

fn volume_label(snapshot: &SessionSnapshot) -> String {
    let pct = (snapshot.volume * 100.0).round() as u32;
    if snapshot.muted {
        format!("muted ({pct}%)")
    } else {
        format!("vol {pct}%")
    }
}

fn status_text(snapshot: &SessionSnapshot, notice: Option<&str>) -> String {
    if let Some(notice) = notice {
        return notice.to_string();
    }

    let mut parts: Vec<String> = Vec::new();
    parts.push(match (snapshot.state, snapshot.is_playing) {
        (SessionState::Idle, _) => "Stopped".to_string(),
        (SessionState::Loading, _) => "Loading".to_string(),
        (SessionState::Ready, true) => "Playing".to_string(),
        (SessionState::Ready, false) => "Paused".to_string(),
    });
    if snapshot.seeking {
        if let Some(target) = snapshot.position {
            parts.push(format!("Seek to {} (enter)", format_time(target)));
        }
    }
    parts.join(" • ")
}

pub(super) fn draw(
    frame: &mut Frame,
    view: &PlaybackView,
    notice: Option<&str>,
    settings: &Settings,
) {
    let snapshot = &view.snapshot;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let title = Paragraph::new(snapshot.title.as_str())
        .alignment(Alignment::Center)
        .bold()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} / {} ", snapshot.index + 1, snapshot.len))
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(title, chunks[0]);

    match view.colors {
        Some((left, right)) => frame.render_widget(Gradient { left, right }, chunks[1]),
        None => {
            let plain = Paragraph::new(MUSIC_GLYPH)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(plain, chunks[1]);
        }
    }

    let time_style = if snapshot.is_loading() {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };
    let time = Paragraph::new(time_text(snapshot))
        .alignment(Alignment::Center)
        .style(time_style);
    frame.render_widget(time, chunks[2]);

    let progress = Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta).bg(Color::DarkGray))
        .ratio(snapshot.progress)
        .label("");
    frame.render_widget(progress, chunks[3]);

    let transport = Paragraph::new(transport_line(snapshot)).alignment(Alignment::Center);
    frame.render_widget(transport, chunks[4]);

    let volume_ratio = if snapshot.muted {
        0.0
    } else {
        f64::from(snapshot.volume).clamp(0.0, 1.0)
    };
    let volume = LineGauge::default()
        .filled_style(Style::default().fg(Color::Cyan))
        .unfilled_style(Style::default().fg(Color::DarkGray))
        .label(volume_label(snapshot))
        .ratio(volume_ratio);
    frame.render_widget(volume, chunks[5]);

    let status = Paragraph::new(status_text(snapshot, notice))
        .block(padded_block(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[6]);

    let keys = playback_controls(settings.controls.scrub_seconds);
    render_footer(frame, chunks[7], controls_text(&keys));
}
