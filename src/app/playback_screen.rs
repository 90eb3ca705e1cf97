use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::audio::AudioEngine;
use crate::config::Settings;
use crate::library::AudioAsset;
use crate::session::{PlaybackSession, SessionError, SessionOptions, SessionSnapshot, SessionState};
use crate::visualizer::{GradientVisualizer, Rgb};

use super::model::PlaybackState;

/// What the user asked the playback screen to do.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    TogglePlayback,
    Next,
    Previous,
    ScrubForward,
    ScrubBack,
    CommitSeek,
    CancelSeek,
    VolumeUp,
    VolumeDown,
    ToggleMute,
}

/// Everything the renderer needs for one frame of the playback screen.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackView {
    pub snapshot: SessionSnapshot,
    pub colors: Option<(Rgb, Rgb)>,
}

/// The mounted playback screen: one session plus the visualizer.
///
/// Dropping the screen drops the session, which releases its engine handle.
pub struct PlaybackScreen<E: AudioEngine> {
    session: PlaybackSession<E>,
    visualizer: Option<GradientVisualizer>,
    visual_index: usize,
    scrub_seconds: i64,
    volume_step: f32,
    seek_commit: Duration,
    last_scrub: Option<Instant>,
}

impl<E: AudioEngine> PlaybackScreen<E> {
    /// Mount the screen on `track_index` and start playing it.
    ///
    /// The screen is returned even when the first load fails, so the user can
    /// still move to another track.
    pub fn mount(
        engine: E,
        tracks: Arc<[AudioAsset]>,
        track_index: usize,
        settings: &Settings,
        now: Instant,
    ) -> (Self, Result<(), SessionError>) {
        let options = SessionOptions {
            volume: settings.audio.initial_volume,
            muted: settings.audio.start_muted,
            auto_advance: settings.playback.auto_advance,
        };
        let session = PlaybackSession::new(engine, tracks, track_index, options);
        let visualizer = settings
            .ui
            .show_visualizer
            .then(|| GradientVisualizer::new(&settings.visualizer, now));

        let mut screen = Self {
            visual_index: session.current_index(),
            session,
            visualizer,
            scrub_seconds: settings.controls.scrub_seconds.min(i64::MAX as u64) as i64,
            volume_step: settings.controls.volume_step,
            seek_commit: Duration::from_millis(settings.controls.seek_commit_ms),
            last_scrub: None,
        };
        let loaded = screen.session.load(track_index);
        (screen, loaded)
    }

    pub fn session(&self) -> &PlaybackSession<E> {
        &self.session
    }

    pub fn handle(&mut self, intent: Intent, now: Instant) -> Result<(), SessionError> {
        match intent {
            Intent::TogglePlayback => self.session.toggle_playback(),
            Intent::Next => self.session.next(),
            Intent::Previous => self.session.previous(),
            Intent::ScrubForward => {
                self.scrub(self.scrub_seconds, now);
                Ok(())
            }
            Intent::ScrubBack => {
                self.scrub(-self.scrub_seconds, now);
                Ok(())
            }
            Intent::CommitSeek => {
                self.last_scrub = None;
                self.session.release_seek()
            }
            Intent::CancelSeek => {
                self.last_scrub = None;
                self.session.cancel_seek();
                Ok(())
            }
            Intent::VolumeUp => self.session.change_volume(self.volume_step),
            Intent::VolumeDown => self.session.change_volume(-self.volume_step),
            Intent::ToggleMute => self.session.toggle_mute(),
        }
    }

    fn scrub(&mut self, delta_secs: i64, now: Instant) {
        self.session.drag_seek_by(delta_secs);
        if self.session.is_dragging() {
            self.last_scrub = Some(now);
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_dragging()
    }

    /// Apply status ticks, commit an idle scrub and animate the gradient.
    pub fn tick(&mut self, now: Instant) -> Result<(), SessionError> {
        let polled = self.session.poll_status();

        // A scrub key that has not been pressed again for a while is a release.
        let committed = match self.last_scrub {
            Some(at) if now.saturating_duration_since(at) >= self.seek_commit => {
                self.last_scrub = None;
                self.session.release_seek()
            }
            _ => Ok(()),
        };

        if let Some(visualizer) = self.visualizer.as_mut() {
            let index = self.session.current_index();
            if index != self.visual_index {
                self.visual_index = index;
                visualizer.reset(now);
            } else {
                visualizer.tick(now);
            }
        }

        polled.and(committed)
    }

    pub fn playback_state(&self) -> PlaybackState {
        match (self.session.state(), self.session.is_playing()) {
            (SessionState::Idle, _) => PlaybackState::Stopped,
            (_, true) => PlaybackState::Playing,
            (_, false) => PlaybackState::Paused,
        }
    }

    pub fn view(&self, now: Instant) -> PlaybackView {
        PlaybackView {
            snapshot: self.session.snapshot(),
            colors: self.visualizer.as_ref().map(|v| v.colors(now)),
        }
    }
}
