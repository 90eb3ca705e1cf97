use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style, Stylize},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::App;
use crate::config::Settings;
use crate::library::Permission;

use super::{MUSIC_GLYPH, TRACKS_CONTROLS, controls_text, padded_block, render_footer, render_header};

const ROW_BG: Color = Color::Rgb(0x28, 0x21, 0x53);
const SELECTED_BG: Color = Color::Rgb(0x3d, 0x34, 0x7c);

fn status_text(app: &App, notice: Option<&str>) -> String {
    if let Some(notice) = notice {
        return notice.to_string();
    }

    let mut parts: Vec<String> = Vec::new();
    parts.push(format!("{} tracks", app.tracks.len()));
    if let Some(dir) = &app.current_dir {
        parts.push(format!("Dir: {dir}"));
    }
    parts.join(" • ")
}

fn empty_text(app: &App) -> String {
    match app.permission {
        Permission::Denied => {
            let dir = app.current_dir.as_deref().unwrap_or("the library directory");
            format!("Cannot read {dir}: permission denied")
        }
        Permission::Granted => "No audio files found".to_string(),
    }
}

pub(super) fn draw(frame: &mut Frame, app: &App, notice: Option<&str>, settings: &Settings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], &settings.ui.header_text);

    let status = Paragraph::new(status_text(app, notice))
        .block(padded_block(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    let list_block = Block::default().borders(Borders::ALL).title(" tracks ");
    if app.tracks.is_empty() {
        let empty = Paragraph::new(empty_text(app))
            .alignment(Alignment::Center)
            .italic()
            .block(list_block);
        frame.render_widget(empty, chunks[2]);
    } else {
        // Center the selected item when possible by creating a visible window.
        // Only build ListItems for the visible window.
        let total = app.tracks.len();
        let list_height = chunks[2].height.saturating_sub(2) as usize;
        let sel = app.selected.min(total - 1);
        let (start, end) = if total <= list_height || list_height == 0 {
            (0, total)
        } else {
            let half = list_height / 2;
            let mut start = sel.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height)
        };

        let items: Vec<ListItem> = app.tracks[start..end]
            .iter()
            .map(|asset| ListItem::new(format!("{MUSIC_GLYPH} {}", asset.filename)))
            .collect();

        let list = List::new(items)
            .block(list_block)
            .style(Style::default().bg(ROW_BG).fg(Color::White))
            .highlight_style(
                Style::default()
                    .bg(SELECTED_BG)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut state = ListState::default();
        state.select(Some(sel - start));
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    render_footer(frame, chunks[3], controls_text(TRACKS_CONTROLS));
}
