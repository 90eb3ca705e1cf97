use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::AudioSettings;

use super::engine::AudioEngine;
use super::thread::{EngineCmd, Level, spawn_audio_thread};
use super::types::{EngineError, EngineHandle, StatusCallback, Subscription};

/// `AudioEngine` backed by rodio on a dedicated audio thread.
///
/// Cheap to clone; all clones talk to the same thread.
#[derive(Clone)]
pub struct RodioEngine {
    tx: Sender<EngineCmd>,
    next_id: Arc<AtomicU64>,
    join: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl RodioEngine {
    pub fn new(settings: &AudioSettings) -> Self {
        let (tx, rx) = mpsc::channel::<EngineCmd>();
        let interval = Duration::from_millis(settings.status_interval_ms.max(1));
        let level = Level {
            volume: settings.initial_volume.clamp(0.0, 1.0),
            muted: settings.start_muted,
        };
        let audio_handle = spawn_audio_thread(rx, interval, level);

        Self {
            tx,
            next_id: Arc::new(AtomicU64::new(1)),
            join: Arc::new(Mutex::new(Some(audio_handle))),
        }
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn send(&self, cmd: EngineCmd) -> Result<(), EngineError> {
        self.tx.send(cmd).map_err(|_| EngineError::Disconnected)
    }

    /// Fade out whatever is playing, stop the audio thread and wait for it.
    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(EngineCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl AudioEngine for RodioEngine {
    fn create(&mut self, uri: &str) -> Result<EngineHandle, EngineError> {
        let handle = EngineHandle(self.next_id());
        let (reply_tx, reply_rx) = mpsc::channel();
        self.send(EngineCmd::Create {
            handle,
            uri: uri.to_string(),
            reply: reply_tx,
        })?;
        reply_rx.recv().map_err(|_| EngineError::Disconnected)?
    }

    fn play(&mut self, handle: EngineHandle) -> Result<(), EngineError> {
        self.send(EngineCmd::Play(handle))
    }

    fn pause(&mut self, handle: EngineHandle) -> Result<(), EngineError> {
        self.send(EngineCmd::Pause(handle))
    }

    fn set_position(
        &mut self,
        handle: EngineHandle,
        position: Duration,
    ) -> Result<(), EngineError> {
        self.send(EngineCmd::SetPosition(handle, position))
    }

    fn set_volume(&mut self, handle: EngineHandle, volume: f32) -> Result<(), EngineError> {
        self.send(EngineCmd::SetVolume(handle, volume))
    }

    fn set_muted(&mut self, handle: EngineHandle, muted: bool) -> Result<(), EngineError> {
        self.send(EngineCmd::SetMuted(handle, muted))
    }

    fn release(&mut self, handle: EngineHandle) -> Result<(), EngineError> {
        self.send(EngineCmd::Release(handle))
    }

    fn subscribe_status(
        &mut self,
        handle: EngineHandle,
        callback: StatusCallback,
    ) -> Result<Subscription, EngineError> {
        let sub = Subscription {
            id: self.next_id(),
            handle,
        };
        self.send(EngineCmd::Subscribe(sub, callback))?;
        Ok(sub)
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        let _ = self.send(EngineCmd::Unsubscribe(subscription));
    }
}

#[cfg(test)]
impl RodioEngine {
    /// An engine whose audio thread already exited.
    pub(super) fn disconnected() -> Self {
        let (tx, rx) = mpsc::channel::<EngineCmd>();
        drop(rx);
        Self {
            tx,
            next_id: Arc::new(AtomicU64::new(1)),
            join: Arc::new(Mutex::new(None)),
        }
    }
}
