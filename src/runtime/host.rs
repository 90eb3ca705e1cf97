use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;

use crate::app::{App, Intent, PlaybackScreen, PlaybackState, PlaybackView, Route};
use crate::audio::AudioEngine;
use crate::config::Settings;
use crate::mpris::ControlCmd;
use crate::session::SessionError;

use super::keys::{Action, playback_action, tracks_action};

/// Navigation host: the tracks screen plus, while a track is open, the
/// mounted playback screen. Key presses and media-key commands both end up
/// here.
pub struct Host<E: AudioEngine + Clone> {
    engine: E,
    pub app: App,
    screen: Option<PlaybackScreen<E>>,
    settings: Settings,
    pending_gg: bool,
}

impl<E: AudioEngine + Clone> Host<E> {
    pub fn new(engine: E, app: App, settings: Settings) -> Self {
        Self {
            engine,
            app,
            screen: None,
            settings,
            pending_gg: false,
        }
    }

    pub fn route(&self) -> Route {
        match &self.screen {
            Some(screen) => Route::Playback {
                track_index: screen.session().current_index(),
            },
            None => Route::Tracks,
        }
    }

    pub fn screen(&self) -> Option<&PlaybackScreen<E>> {
        self.screen.as_ref()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.screen
            .as_ref()
            .map_or(PlaybackState::Stopped, |s| s.playback_state())
    }

    /// Show `route`. Leaving the playback screen unmounts it; the cursor
    /// lands on the track that was playing.
    pub fn navigate(&mut self, route: Route, now: Instant) {
        // Unmount first so the old session's handle is released before a new
        // one is created.
        if let Some(screen) = self.screen.take() {
            self.app.set_selected(screen.session().current_index());
        }

        if let Route::Playback { track_index } = route {
            if !self.app.has_tracks() {
                return;
            }
            tracing::debug!(track_index, "mounting playback screen");
            let (screen, loaded) = PlaybackScreen::mount(
                self.engine.clone(),
                self.app.tracks.clone(),
                track_index,
                &self.settings,
                now,
            );
            self.screen = Some(screen);
            self.report(loaded, now);
        }
    }

    /// Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        let action = match &self.screen {
            Some(screen) => playback_action(key, screen.is_dragging()),
            None => tracks_action(key, &mut self.pending_gg),
        };
        match action {
            Some(action) => self.apply(action, now),
            None => false,
        }
    }

    fn apply(&mut self, action: Action, now: Instant) -> bool {
        match action {
            Action::Quit => return true,
            Action::Back => self.navigate(Route::Tracks, now),
            Action::Select => {
                if let Some(route) = self.app.select_track() {
                    self.navigate(route, now);
                }
            }
            Action::CursorDown => self.app.next(),
            Action::CursorUp => self.app.prev(),
            Action::CursorTop => self.app.first(),
            Action::CursorBottom => self.app.last(),
            Action::Playback(intent) => self.intent(intent, now),
        }
        false
    }

    fn intent(&mut self, intent: Intent, now: Instant) {
        if let Some(screen) = self.screen.as_mut() {
            let result = screen.handle(intent, now);
            self.report(result, now);
        }
    }

    /// Returns `true` when the command asks the player to quit.
    pub fn handle_control(&mut self, cmd: ControlCmd, now: Instant) -> bool {
        match cmd {
            ControlCmd::Quit => return true,
            ControlCmd::Play => match self.playback_state() {
                PlaybackState::Playing => {}
                PlaybackState::Paused => self.intent(Intent::TogglePlayback, now),
                PlaybackState::Stopped => self.play_selected(now),
            },
            ControlCmd::Pause => {
                if self.playback_state() == PlaybackState::Playing {
                    self.intent(Intent::TogglePlayback, now);
                }
            }
            ControlCmd::PlayPause => match self.playback_state() {
                PlaybackState::Stopped => self.play_selected(now),
                _ => self.intent(Intent::TogglePlayback, now),
            },
            ControlCmd::Stop => self.navigate(Route::Tracks, now),
            ControlCmd::Next if self.screen.is_some() => self.intent(Intent::Next, now),
            ControlCmd::Next => self.app.next(),
            ControlCmd::Prev if self.screen.is_some() => self.intent(Intent::Previous, now),
            ControlCmd::Prev => self.app.prev(),
        }
        false
    }

    /// Mount the track under the cursor, or reload the open one after a
    /// failed load.
    fn play_selected(&mut self, now: Instant) {
        let route = match &self.screen {
            Some(screen) => Route::Playback {
                track_index: screen.session().current_index(),
            },
            None => match self.app.select_track() {
                Some(route) => route,
                None => return,
            },
        };
        self.navigate(route, now);
    }

    pub fn tick(&mut self, now: Instant) {
        self.app.expire_notice(now);
        if let Some(screen) = self.screen.as_mut() {
            let result = screen.tick(now);
            self.report(result, now);
        }
    }

    pub fn view(&self, now: Instant) -> Option<PlaybackView> {
        self.screen.as_ref().map(|s| s.view(now))
    }

    fn report(&mut self, result: Result<(), SessionError>, now: Instant) {
        if let Err(e) = result {
            tracing::warn!(error = %e, "playback command failed");
            let ttl = Duration::from_millis(self.settings.ui.notice_ms);
            self.app.set_notice(e.to_string(), now, ttl);
        }
    }
}
