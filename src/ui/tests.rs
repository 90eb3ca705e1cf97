use std::path::Path;
use std::time::{Duration, Instant};

use ratatui::{Terminal, backend::TestBackend, buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

use super::playback::{Gradient, time_text};
use super::*;
use crate::library::{AudioAsset, Permission};
use crate::session::{SessionSnapshot, SessionState};
use crate::visualizer::Rgb;

fn app(names: &[&str], permission: Permission) -> App {
    let tracks = names
        .iter()
        .map(|n| AudioAsset::from_path(Path::new(&format!("/music/{n}"))))
        .collect();
    let mut app = App::new(tracks, permission);
    app.set_current_dir("/music".to_string());
    app
}

fn snapshot() -> SessionSnapshot {
    SessionSnapshot {
        title: "song.mp3".to_string(),
        index: 1,
        len: 3,
        state: SessionState::Ready,
        is_playing: true,
        position: Some(Duration::from_secs(65)),
        duration: Some(Duration::from_secs(200)),
        progress: 0.325,
        volume: 0.8,
        muted: false,
        seeking: false,
    }
}

fn render(app: &App, view: Option<&PlaybackView>, now: Instant) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal
        .draw(|f| draw(f, app, view, &Settings::default(), now))
        .unwrap();
    buffer_text(terminal.backend().buffer())
}

fn buffer_text(buf: &Buffer) -> String {
    let mut out = String::new();
    for y in 0..buf.area.height {
        for x in 0..buf.area.width {
            out.push_str(buf[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

#[test]
fn tracks_screen_lists_files_with_cursor() {
    let mut app = app(&["a.mp3", "b.flac"], Permission::Granted);
    app.next();
    let screen = render(&app, None, Instant::now());
    assert!(screen.contains("♪ a.mp3"));
    assert!(screen.contains("> ♪ b.flac"));
    assert!(screen.contains("2 tracks"));
    assert!(screen.contains("Dir: /music"));
}

#[test]
fn tracks_screen_explains_an_empty_list() {
    let denied = render(&app(&[], Permission::Denied), None, Instant::now());
    assert!(denied.contains("permission denied"));

    let empty = render(&app(&[], Permission::Granted), None, Instant::now());
    assert!(empty.contains("No audio files found"));
}

#[test]
fn notice_takes_over_the_status_line() {
    let mut app = app(&["a.mp3"], Permission::Granted);
    let now = Instant::now();
    app.set_notice("could not play a.mp3", now, Duration::from_secs(3));
    let screen = render(&app, None, now);
    assert!(screen.contains("could not play a.mp3"));
    assert!(!screen.contains("1 tracks"));

    let later = render(&app, None, now + Duration::from_secs(4));
    assert!(!later.contains("could not play"));
}

#[test]
fn playback_screen_shows_title_times_and_volume() {
    let app = app(&["a.mp3"], Permission::Granted);
    let view = PlaybackView {
        snapshot: snapshot(),
        colors: Some((Rgb(10, 20, 30), Rgb(200, 100, 0))),
    };
    let screen = render(&app, Some(&view), Instant::now());
    assert!(screen.contains("song.mp3"));
    assert!(screen.contains("2 / 3"));
    assert!(screen.contains("1:05 / 3:20"));
    assert!(screen.contains("vol 80%"));
    assert!(screen.contains("Playing"));
    assert!(screen.contains("scrub -/+5s"));
}

#[test]
fn playback_screen_shows_mute_and_seek_preview() {
    let app = app(&["a.mp3"], Permission::Granted);
    let mut snap = snapshot();
    snap.muted = true;
    snap.seeking = true;
    let view = PlaybackView {
        snapshot: snap,
        colors: None,
    };
    let screen = render(&app, Some(&view), Instant::now());
    assert!(screen.contains("muted (80%)"));
    assert!(screen.contains("Seek to 1:05"));
}

#[test]
fn time_label_waits_for_the_first_status() {
    let mut snap = snapshot();
    snap.position = None;
    snap.duration = None;
    assert_eq!(time_text(&snap), "Loading…");

    snap.state = SessionState::Loading;
    assert_eq!(time_text(&snap), "Loading…");

    snap.state = SessionState::Idle;
    assert_eq!(time_text(&snap), "Not loaded");

    snap.state = SessionState::Ready;
    snap.position = Some(Duration::from_secs(5));
    assert_eq!(time_text(&snap), "0:05 / ?:??");
}

#[test]
fn gradient_runs_from_left_to_right_colour() {
    let area = Rect::new(0, 0, 10, 3);
    let mut buf = Buffer::empty(area);
    Gradient {
        left: Rgb(0, 0, 0),
        right: Rgb(90, 0, 0),
    }
    .render(area, &mut buf);

    assert_eq!(buf[(0, 0)].bg, Color::Rgb(0, 0, 0));
    assert_eq!(buf[(9, 2)].bg, Color::Rgb(90, 0, 0));
    assert_eq!(buf[(3, 1)].bg, Color::Rgb(30, 0, 0));
    assert_eq!(buf[(5, 1)].symbol(), MUSIC_GLYPH);
}
