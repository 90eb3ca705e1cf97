use super::*;
use crate::config::Settings;
use crate::library::{AudioAsset, Permission};
use crate::session::fake::{Call, FakeEngine};
use std::path::Path;
use std::time::{Duration, Instant};

fn a(name: &str) -> AudioAsset {
    AudioAsset::from_path(Path::new(&format!("/music/{name}")))
}

fn app(names: &[&str]) -> App {
    App::new(names.iter().map(|n| a(n)).collect(), Permission::Granted)
}

fn screen(n: usize, index: usize, settings: &Settings) -> (FakeEngine, PlaybackScreen<FakeEngine>) {
    let engine = FakeEngine::new();
    let tracks = app(&["a.mp3", "b.mp3", "c.mp3", "d.mp3"][..n]).tracks;
    let (screen, loaded) = PlaybackScreen::mount(engine.clone(), tracks, index, settings, Instant::now());
    loaded.unwrap();
    (engine, screen)
}

#[test]
fn cursor_is_clamped_at_both_ends() {
    let mut app = app(&["a.mp3", "b.mp3", "c.mp3"]);
    app.prev();
    assert_eq!(app.selected, 0);
    app.next();
    app.next();
    app.next();
    assert_eq!(app.selected, 2);
    app.first();
    assert_eq!(app.selected, 0);
    app.last();
    assert_eq!(app.selected, 2);
    app.set_selected(99);
    assert_eq!(app.selected, 2);
}

#[test]
fn select_track_routes_to_playback() {
    let mut app = app(&["a.mp3", "b.mp3"]);
    app.next();
    assert_eq!(app.select_track(), Some(Route::Playback { track_index: 1 }));
}

#[test]
fn empty_library_has_nothing_to_select() {
    let mut app = App::new(Vec::new(), Permission::Denied);
    app.next();
    app.last();
    assert_eq!(app.selected, 0);
    assert!(!app.has_tracks());
    assert_eq!(app.select_track(), None);
}

#[test]
fn notices_expire() {
    let mut app = app(&["a.mp3"]);
    let t0 = Instant::now();
    app.set_notice("could not play a.mp3", t0, Duration::from_secs(3));
    assert_eq!(app.notice(t0), Some("could not play a.mp3"));
    assert_eq!(app.notice(t0 + Duration::from_secs(3)), None);

    app.expire_notice(t0 + Duration::from_secs(1));
    assert!(app.notice(t0 + Duration::from_secs(1)).is_some());
    app.expire_notice(t0 + Duration::from_secs(5));
    assert_eq!(app.notice(t0), None);
}

#[test]
fn mount_applies_configured_volume_and_mute() {
    let mut settings = Settings::default();
    settings.audio.initial_volume = 0.5;
    settings.audio.start_muted = true;
    let (engine, screen) = screen(2, 1, &settings);

    let h = screen.session().handle().unwrap();
    let calls = engine.calls();
    assert_eq!(calls[0], Call::Create("file:///music/b.mp3".to_string()));
    assert!(calls.contains(&Call::SetVolume(h, 0.5)));
    assert!(calls.contains(&Call::SetMuted(h, true)));
    assert_eq!(screen.playback_state(), PlaybackState::Playing);
}

#[test]
fn dropping_the_screen_releases_audio() {
    let (engine, screen) = screen(2, 0, &Settings::default());
    assert_eq!(engine.live_count(), 1);
    drop(screen);
    assert_eq!(engine.live_count(), 0);
}

#[test]
fn scrub_commits_after_idle_time() {
    let mut settings = Settings::default();
    settings.controls.scrub_seconds = 5;
    settings.controls.seek_commit_ms = 700;
    let (engine, mut screen) = screen(2, 0, &settings);
    let h = screen.session().handle().unwrap();
    engine.emit(h, 10_000, 100_000, false);

    let t0 = Instant::now();
    screen.tick(t0).unwrap();
    for i in 0..4 {
        screen
            .handle(Intent::ScrubForward, t0 + Duration::from_millis(i * 100))
            .unwrap();
    }
    screen.handle(Intent::ScrubBack, t0 + Duration::from_millis(400)).unwrap();
    assert!(screen.is_dragging());

    screen.tick(t0 + Duration::from_millis(1000)).unwrap();
    assert!(engine.set_position_calls().is_empty());

    screen.tick(t0 + Duration::from_millis(1100)).unwrap();
    assert_eq!(engine.set_position_calls(), vec![Duration::from_secs(25)]);
    assert!(!screen.is_dragging());
}

#[test]
fn commit_and_cancel_intents() {
    let (engine, mut screen) = screen(2, 0, &Settings::default());
    let now = Instant::now();

    screen.handle(Intent::ScrubForward, now).unwrap();
    screen.handle(Intent::CancelSeek, now).unwrap();
    screen.tick(now + Duration::from_secs(5)).unwrap();
    assert!(engine.set_position_calls().is_empty());

    screen.handle(Intent::ScrubForward, now).unwrap();
    screen.handle(Intent::ScrubForward, now).unwrap();
    screen.handle(Intent::CommitSeek, now).unwrap();
    assert_eq!(engine.set_position_calls(), vec![Duration::from_secs(10)]);
}

#[test]
fn volume_intents_step_and_clamp() {
    let mut settings = Settings::default();
    settings.audio.initial_volume = 0.9;
    settings.controls.volume_step = 0.25;
    let (engine, mut screen) = screen(1, 0, &settings);
    let now = Instant::now();

    screen.handle(Intent::VolumeUp, now).unwrap();
    assert_eq!(engine.last_volume(), Some(1.0));
    screen.handle(Intent::VolumeDown, now).unwrap();
    assert_eq!(engine.last_volume(), Some(0.75));

    screen.handle(Intent::ToggleMute, now).unwrap();
    assert!(screen.view(now).snapshot.muted);
}

#[test]
fn transport_intents_drive_the_session() {
    let (engine, mut screen) = screen(3, 0, &Settings::default());
    let now = Instant::now();

    screen.handle(Intent::Previous, now).unwrap();
    assert_eq!(screen.session().current_index(), 0);

    screen.handle(Intent::Next, now).unwrap();
    screen.handle(Intent::Next, now).unwrap();
    screen.handle(Intent::Next, now).unwrap();
    assert_eq!(screen.session().current_index(), 2);
    assert_eq!(engine.state().max_live, 1);

    screen.handle(Intent::TogglePlayback, now).unwrap();
    assert_eq!(screen.playback_state(), PlaybackState::Paused);
}

#[test]
fn failed_mount_still_returns_a_screen() {
    let engine = FakeEngine::new();
    engine.fail_uri("file:///music/a.mp3");
    let tracks = app(&["a.mp3", "b.mp3"]).tracks;
    let (mut screen, loaded) =
        PlaybackScreen::mount(engine.clone(), tracks, 0, &Settings::default(), Instant::now());

    assert!(loaded.is_err());
    assert_eq!(screen.playback_state(), PlaybackState::Stopped);

    screen.handle(Intent::Next, Instant::now()).unwrap();
    assert_eq!(screen.playback_state(), PlaybackState::Playing);
}

#[test]
fn visualizer_follows_settings_and_track_changes() {
    let mut settings = Settings::default();
    settings.ui.show_visualizer = false;
    let (_engine, screen) = screen(2, 0, &settings);
    assert_eq!(screen.view(Instant::now()).colors, None);

    let (_engine, mut screen) = screen_with_visualizer();
    let t0 = Instant::now();
    assert!(screen.view(t0).colors.is_some());
    screen.handle(Intent::Next, t0).unwrap();
    screen.tick(t0).unwrap();
    assert!(screen.view(t0).colors.is_some());
}

fn screen_with_visualizer() -> (FakeEngine, PlaybackScreen<FakeEngine>) {
    screen(2, 0, &Settings::default())
}
