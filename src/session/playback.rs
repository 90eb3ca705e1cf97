use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use crate::audio::{AudioEngine, EngineError, EngineHandle, StatusTick, Subscription};
use crate::library::AudioAsset;

use super::error::SessionError;
use super::state::{SessionOptions, SessionSnapshot, SessionState, UNKNOWN_TRACK};

/// Ticks further than this from a fresh seek target are taken to predate it.
const SEEK_SETTLE_WINDOW: Duration = Duration::from_secs(1);
/// Stop waiting for the engine to catch up with a seek after this many ticks.
const MAX_STALE_TICKS: u8 = 10;

/// A seek the engine has been told about but has not reported yet.
#[derive(Clone, Copy, Debug)]
struct PendingSeek {
    target: Duration,
    stale_left: u8,
}

impl PendingSeek {
    fn new(target: Duration) -> Self {
        Self {
            target,
            stale_left: MAX_STALE_TICKS,
        }
    }

    fn reached_by(&self, position: Duration) -> bool {
        let gap = if position > self.target {
            position - self.target
        } else {
            self.target - position
        };
        gap <= SEEK_SETTLE_WINDOW
    }
}

/// The live binding between a playback screen and one engine handle.
///
/// The session owns at most one handle at a time: `load` releases the
/// previous handle before creating the next one, and `dispose` (also run on
/// drop) releases it for good. Status ticks arrive through a subscription
/// and are applied by `poll_status` on the caller's thread.
pub struct PlaybackSession<E: AudioEngine> {
    engine: E,
    tracks: Arc<[AudioAsset]>,
    current_index: usize,
    state: SessionState,
    is_playing: bool,
    ended: bool,
    position: Option<Duration>,
    duration: Option<Duration>,
    volume: f32,
    muted: bool,
    auto_advance: bool,
    handle: Option<EngineHandle>,
    subscription: Option<Subscription>,
    seek_preview: Option<Duration>,
    pending_seek: Option<PendingSeek>,
    status_tx: Sender<StatusTick>,
    status_rx: Receiver<StatusTick>,
}

impl<E: AudioEngine> PlaybackSession<E> {
    /// Create an idle session positioned at `start_index` (clamped).
    pub fn new(
        engine: E,
        tracks: Arc<[AudioAsset]>,
        start_index: usize,
        options: SessionOptions,
    ) -> Self {
        let (status_tx, status_rx) = mpsc::channel();
        let current_index = start_index.min(tracks.len().saturating_sub(1));
        Self {
            engine,
            tracks,
            current_index,
            state: SessionState::Idle,
            is_playing: false,
            ended: false,
            position: None,
            duration: None,
            volume: clamp_volume(options.volume).unwrap_or(1.0),
            muted: options.muted,
            auto_advance: options.auto_advance,
            handle: None,
            subscription: None,
            seek_preview: None,
            pending_seek: None,
            status_tx,
            status_rx,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn position(&self) -> Option<Duration> {
        self.position
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn handle(&self) -> Option<EngineHandle> {
        self.handle
    }

    pub fn current_asset(&self) -> Option<&AudioAsset> {
        self.tracks.get(self.current_index)
    }

    /// Filename of the current asset, or `"Unknown Track"`.
    pub fn title(&self) -> &str {
        self.current_asset()
            .map(|a| a.filename.as_str())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(UNKNOWN_TRACK)
    }

    /// Bind the session to the track at `index` and start playing it.
    ///
    /// The previous handle is released first. On failure the session is left
    /// `Idle` at `index`.
    pub fn load(&mut self, index: usize) -> Result<(), SessionError> {
        if self.tracks.is_empty() {
            return Err(SessionError::NoTracks);
        }
        let index = index.min(self.tracks.len() - 1);

        self.dispose();
        self.current_index = index;
        self.state = SessionState::Loading;

        let asset = self.tracks[index].clone();
        let handle = match self.engine.create(&asset.uri) {
            Ok(h) => h,
            Err(source) => {
                self.state = SessionState::Idle;
                tracing::warn!(uri = %asset.uri, error = %source, "track load failed");
                return Err(SessionError::Load {
                    filename: asset.filename,
                    source,
                });
            }
        };
        tracing::info!(index, %handle, file = %asset.filename, "track loaded");

        self.handle = Some(handle);
        self.is_playing = true;

        // Volume and mute belong to the session, not to the handle.
        let mut deferred = self.engine.set_volume(handle, self.volume).err();
        if self.muted {
            if let Err(e) = self.engine.set_muted(handle, true) {
                deferred.get_or_insert(e);
            }
        }

        let tx = self.status_tx.clone();
        let callback = Box::new(move |tick: StatusTick| {
            let _ = tx.send(tick);
        });
        match self.engine.subscribe_status(handle, callback) {
            Ok(sub) => self.subscription = Some(sub),
            Err(e) => {
                deferred.get_or_insert(e);
            }
        }

        self.state = SessionState::Ready;
        match deferred {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    /// Pause when playing, resume when paused. No-op without a handle.
    ///
    /// The flag flips even when the engine call fails; the error is handed
    /// back for display only.
    pub fn toggle_playback(&mut self) -> Result<(), SessionError> {
        let Some(handle) = self.handle else {
            return Ok(());
        };

        let result = if self.is_playing {
            self.engine.pause(handle)
        } else if self.ended {
            // Replay from the top once the track ran out.
            self.ended = false;
            self.position = Some(Duration::ZERO);
            self.expect_position(Duration::ZERO);
            self.engine
                .set_position(handle, Duration::ZERO)
                .and_then(|()| self.engine.play(handle))
        } else {
            self.engine.play(handle)
        };

        self.is_playing = !self.is_playing;
        result.map_err(SessionError::from)
    }

    /// Move the engine to `target` (clamped to the known duration).
    pub fn seek(&mut self, target: Duration) -> Result<(), SessionError> {
        let Some(handle) = self.handle else {
            return Ok(());
        };
        let target = self.clamp_to_duration(target);
        self.position = Some(target);
        self.ended = false;
        self.expect_position(target);
        self.engine.set_position(handle, target)?;
        Ok(())
    }

    /// Discard queued ticks and ignore those still in flight until the
    /// engine reports a position near `target`.
    fn expect_position(&mut self, target: Duration) {
        while self.status_rx.try_recv().is_ok() {}
        self.pending_seek = Some(PendingSeek::new(target));
    }

    /// Whether a tick from the current handle was sent before the last seek.
    fn is_stale(&mut self, tick: &StatusTick) -> bool {
        let Some(pending) = self.pending_seek.as_mut() else {
            return false;
        };
        if pending.reached_by(tick.position) || pending.stale_left == 0 {
            self.pending_seek = None;
            return false;
        }
        pending.stale_left -= 1;
        true
    }

    /// Update the seek preview during a drag. The engine is not touched until
    /// `release_seek`.
    pub fn drag_seek(&mut self, target: Duration) {
        if self.handle.is_some() {
            self.seek_preview = Some(self.clamp_to_duration(target));
        }
    }

    /// Move the seek preview by `delta_secs` from wherever it (or playback) is.
    pub fn drag_seek_by(&mut self, delta_secs: i64) {
        let base = self
            .seek_preview
            .or(self.position)
            .unwrap_or(Duration::ZERO);
        let delta = Duration::from_secs(delta_secs.unsigned_abs());
        let target = if delta_secs >= 0 {
            base.saturating_add(delta)
        } else {
            base.saturating_sub(delta)
        };
        self.drag_seek(target);
    }

    /// Finish a drag: seek once to the last previewed position.
    pub fn release_seek(&mut self) -> Result<(), SessionError> {
        match self.seek_preview.take() {
            Some(target) => self.seek(target),
            None => Ok(()),
        }
    }

    pub fn cancel_seek(&mut self) {
        self.seek_preview = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.seek_preview.is_some()
    }

    /// Set the volume, clamped to `[0, 1]`, and forward it right away.
    /// NaN is ignored.
    pub fn set_volume(&mut self, volume: f32) -> Result<(), SessionError> {
        let Some(volume) = clamp_volume(volume) else {
            return Ok(());
        };
        self.volume = volume;
        if let Some(handle) = self.handle {
            self.engine.set_volume(handle, volume)?;
        }
        Ok(())
    }

    pub fn change_volume(&mut self, delta: f32) -> Result<(), SessionError> {
        self.set_volume(self.volume + delta)
    }

    pub fn toggle_mute(&mut self) -> Result<(), SessionError> {
        self.muted = !self.muted;
        if let Some(handle) = self.handle {
            self.engine.set_muted(handle, self.muted)?;
        }
        Ok(())
    }

    /// Load the following track. Silent no-op on the last one.
    pub fn next(&mut self) -> Result<(), SessionError> {
        if self.current_index + 1 >= self.tracks.len() {
            return Ok(());
        }
        self.load(self.current_index + 1)
    }

    /// Load the preceding track. Silent no-op on the first one.
    pub fn previous(&mut self) -> Result<(), SessionError> {
        if self.current_index == 0 || self.tracks.is_empty() {
            return Ok(());
        }
        self.load(self.current_index - 1)
    }

    /// Apply every status tick received since the last call.
    ///
    /// Ticks from a handle other than the current one are dropped, as are
    /// ticks the engine sent before it applied the last seek.
    pub fn poll_status(&mut self) -> Result<(), SessionError> {
        while let Ok(tick) = self.status_rx.try_recv() {
            if Some(tick.handle) != self.handle || self.is_stale(&tick) {
                continue;
            }

            self.position = Some(tick.position);
            if tick.duration.is_some() {
                self.duration = tick.duration;
            }

            if tick.finished && self.is_playing && !self.ended {
                self.ended = true;
                if self.auto_advance && self.current_index + 1 < self.tracks.len() {
                    tracing::debug!(index = self.current_index, "track ended, advancing");
                    return self.next();
                }
                self.is_playing = false;
                if let Some(total) = self.duration {
                    self.position = Some(total);
                }
            }
        }
        Ok(())
    }

    /// `position / duration` in `[0, 1]`, `0` while either is unknown.
    pub fn progress(&self) -> f64 {
        match (self.displayed_position(), self.duration) {
            (Some(pos), Some(total)) if !total.is_zero() => {
                (pos.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    fn displayed_position(&self) -> Option<Duration> {
        self.seek_preview.or(self.position)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            title: self.title().to_string(),
            index: self.current_index,
            len: self.tracks.len(),
            state: self.state,
            is_playing: self.is_playing,
            position: self.displayed_position(),
            duration: self.duration,
            progress: self.progress(),
            volume: self.volume,
            muted: self.muted,
            seeking: self.seek_preview.is_some(),
        }
    }

    /// Cancel the status subscription and release the handle. Idempotent.
    pub fn dispose(&mut self) {
        if let Some(sub) = self.subscription.take() {
            self.engine.unsubscribe(sub);
        }
        if let Some(handle) = self.handle.take() {
            match self.engine.release(handle) {
                // The engine already stopped every voice on its way out.
                Ok(()) | Err(EngineError::Disconnected) => {}
                Err(e) => tracing::warn!(%handle, error = %e, "release failed"),
            }
        }

        self.state = SessionState::Idle;
        self.is_playing = false;
        self.ended = false;
        self.position = None;
        self.duration = None;
        self.seek_preview = None;
        self.pending_seek = None;
        while self.status_rx.try_recv().is_ok() {}
    }

    fn clamp_to_duration(&self, target: Duration) -> Duration {
        match self.duration {
            Some(total) => target.min(total),
            None => target,
        }
    }
}

impl<E: AudioEngine> Drop for PlaybackSession<E> {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn clamp_volume(volume: f32) -> Option<f32> {
    if volume.is_nan() {
        None
    } else {
        Some(volume.clamp(0.0, 1.0))
    }
}
