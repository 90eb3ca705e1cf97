use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::library::path_from_uri;

use super::sink::{create_sink_at, probe_duration};
use super::types::{EngineError, EngineHandle, StatusCallback, StatusTick, Subscription};

/// Commands understood by the audio thread.
pub(super) enum EngineCmd {
    Create {
        handle: EngineHandle,
        uri: String,
        reply: Sender<Result<EngineHandle, EngineError>>,
    },
    Play(EngineHandle),
    Pause(EngineHandle),
    SetPosition(EngineHandle, Duration),
    SetVolume(EngineHandle, f32),
    SetMuted(EngineHandle, bool),
    Release(EngineHandle),
    Subscribe(Subscription, StatusCallback),
    Unsubscribe(Subscription),
    /// Stop every voice, fading out over `fade_out_ms`, and exit the thread.
    Quit { fade_out_ms: u64 },
}

/// Volume and mute as last set by the session, carried over to new voices
/// so a fresh sink never starts at the wrong level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Level {
    pub(super) volume: f32,
    pub(super) muted: bool,
}

/// One open track: a sink plus the bookkeeping rodio does not keep for us.
pub(super) struct Voice {
    pub(super) sink: Sink,
    path: PathBuf,
    duration: Option<Duration>,
    /// Position the current sink started from (non-zero after a rebuild seek).
    offset: Duration,
    pub(super) volume: f32,
    pub(super) muted: bool,
}

impl Voice {
    pub(super) fn new(sink: Sink, path: PathBuf, duration: Option<Duration>) -> Self {
        Self {
            sink,
            path,
            duration,
            offset: Duration::ZERO,
            volume: 1.0,
            muted: false,
        }
    }

    /// Apply `level` and start playing.
    pub(super) fn start(&mut self, level: Level) {
        self.volume = level.volume;
        self.muted = level.muted;
        self.apply_volume();
        self.sink.play();
    }

    pub(super) fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    pub(super) fn apply_volume(&self) {
        self.sink.set_volume(self.effective_volume());
    }

    pub(super) fn status(&self, handle: EngineHandle) -> StatusTick {
        let mut position = self.offset + self.sink.get_pos();
        if let Some(total) = self.duration {
            position = position.min(total);
        }
        StatusTick {
            handle,
            position,
            duration: self.duration,
            finished: self.sink.empty(),
        }
    }
}

fn open_voice(stream: &OutputStream, uri: &str) -> Result<Voice, EngineError> {
    let path = path_from_uri(uri).ok_or_else(|| EngineError::UnsupportedUri(uri.to_string()))?;
    let (sink, total) = create_sink_at(stream, &path, Duration::ZERO)?;
    let duration = total.or_else(|| probe_duration(&path));
    Ok(Voice::new(sink, path, duration))
}

fn seek_voice(stream: &OutputStream, voice: &mut Voice, position: Duration) {
    let position = match voice.duration {
        Some(total) => position.min(total),
        None => position,
    };

    if !voice.sink.empty() {
        match voice.sink.try_seek(position) {
            Ok(()) => {
                voice.offset = Duration::ZERO;
                return;
            }
            Err(e) => {
                tracing::debug!(error = %e, "try_seek unsupported, rebuilding sink");
            }
        }
    }

    // Scrubbing fallback: rebuild the sink and skip into the file.
    let was_paused = voice.sink.is_paused() || voice.sink.empty();
    match create_sink_at(stream, &voice.path, position) {
        Ok((sink, _)) => {
            voice.sink.stop();
            voice.sink = sink;
            voice.offset = position;
            voice.apply_volume();
            if !was_paused {
                voice.sink.play();
            }
        }
        Err(e) => tracing::warn!(error = %e, "seek failed"),
    }
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<EngineCmd>,
    status_interval: Duration,
    initial_level: Level,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let (stream, stream_error) = match OutputStreamBuilder::open_default_stream() {
            Ok(mut s) => {
                // rodio logs to stderr when OutputStream is dropped. That's useful in
                // debugging, but noisy for a TUI app.
                s.log_on_drop(false);
                (Some(s), None)
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot open default audio output");
                (None, Some(e.to_string()))
            }
        };

        let mut voices: HashMap<EngineHandle, Voice> = HashMap::new();
        let mut subscribers: Vec<(Subscription, StatusCallback)> = Vec::new();
        let mut last_tick = Instant::now();
        let mut level = initial_level;

        loop {
            match rx.recv_timeout(status_interval) {
                Ok(cmd) => match cmd {
                    EngineCmd::Create { handle, uri, reply } => {
                        let result = match stream.as_ref() {
                            Some(stream) => open_voice(stream, &uri),
                            None => Err(EngineError::NoOutputDevice(
                                stream_error.clone().unwrap_or_default(),
                            )),
                        };
                        let result = result.map(|mut voice| {
                            voice.start(level);
                            voices.insert(handle, voice);
                            tracing::debug!(%handle, %uri, live = voices.len(), "voice created");
                            handle
                        });
                        let _ = reply.send(result);
                    }
                    EngineCmd::Play(handle) => match voices.get(&handle) {
                        Some(v) => v.sink.play(),
                        None => tracing::warn!(%handle, "play on unknown handle"),
                    },
                    EngineCmd::Pause(handle) => match voices.get(&handle) {
                        Some(v) => v.sink.pause(),
                        None => tracing::warn!(%handle, "pause on unknown handle"),
                    },
                    EngineCmd::SetPosition(handle, position) => {
                        match (stream.as_ref(), voices.get_mut(&handle)) {
                            (Some(stream), Some(v)) => seek_voice(stream, v, position),
                            _ => tracing::warn!(%handle, "seek on unknown handle"),
                        }
                    }
                    EngineCmd::SetVolume(handle, volume) => {
                        level.volume = volume;
                        if let Some(v) = voices.get_mut(&handle) {
                            v.volume = volume;
                            v.apply_volume();
                        }
                    }
                    EngineCmd::SetMuted(handle, muted) => {
                        level.muted = muted;
                        if let Some(v) = voices.get_mut(&handle) {
                            v.muted = muted;
                            v.apply_volume();
                        }
                    }
                    EngineCmd::Release(handle) => {
                        if let Some(v) = voices.remove(&handle) {
                            v.sink.stop();
                        }
                        subscribers.retain(|(sub, _)| sub.handle != handle);
                        tracing::debug!(%handle, live = voices.len(), "voice released");
                    }
                    EngineCmd::Subscribe(sub, callback) => {
                        if voices.contains_key(&sub.handle) {
                            subscribers.push((sub, callback));
                        } else {
                            tracing::warn!(handle = %sub.handle, "subscribe on unknown handle");
                        }
                    }
                    EngineCmd::Unsubscribe(sub) => {
                        subscribers.retain(|(s, _)| *s != sub);
                    }
                    EngineCmd::Quit { fade_out_ms } => {
                        for v in voices.values() {
                            if !v.sink.is_paused() {
                                fade_out_sink(&v.sink, v.effective_volume(), fade_out_ms);
                            }
                            v.sink.stop();
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if last_tick.elapsed() >= status_interval {
                last_tick = Instant::now();
                for (sub, callback) in subscribers.iter_mut() {
                    if let Some(v) = voices.get(&sub.handle) {
                        callback(v.status(sub.handle));
                    }
                }
            }
        }

        for v in voices.values() {
            v.sink.stop();
        }
    })
}
