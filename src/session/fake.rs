//! Recording `AudioEngine` for tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::audio::{AudioEngine, EngineError, EngineHandle, StatusCallback, StatusTick, Subscription};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Create(String),
    Play(EngineHandle),
    Pause(EngineHandle),
    SetPosition(EngineHandle, Duration),
    SetVolume(EngineHandle, f32),
    SetMuted(EngineHandle, bool),
    Release(EngineHandle),
    Subscribe(EngineHandle),
    Unsubscribe(EngineHandle),
}

#[derive(Default)]
pub struct FakeState {
    next_id: u64,
    pub calls: Vec<Call>,
    pub live: HashSet<EngineHandle>,
    pub max_live: usize,
    pub failing_uris: HashSet<String>,
    pub fail_pause: bool,
    active: Vec<(Subscription, StatusCallback)>,
    retired: Vec<(Subscription, StatusCallback)>,
}

#[derive(Clone, Default)]
pub struct FakeEngine {
    state: Arc<Mutex<FakeState>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn fail_uri(&self, uri: &str) {
        self.state().failing_uris.insert(uri.to_string());
    }

    pub fn live_count(&self) -> usize {
        self.state().live.len()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    pub fn set_position_calls(&self) -> Vec<Duration> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SetPosition(_, d) => Some(d),
                _ => None,
            })
            .collect()
    }

    pub fn last_volume(&self) -> Option<f32> {
        self.calls().into_iter().rev().find_map(|c| match c {
            Call::SetVolume(_, v) => Some(v),
            _ => None,
        })
    }

    /// Deliver a tick to the current subscribers of `handle`.
    pub fn emit(&self, handle: EngineHandle, position_ms: u64, duration_ms: u64, finished: bool) {
        let tick = tick(handle, position_ms, duration_ms, finished);
        for (sub, callback) in self.state().active.iter_mut() {
            if sub.handle == handle {
                callback(tick);
            }
        }
    }

    /// Deliver a tick through every callback ever registered for `handle`,
    /// including cancelled ones, as if it had been in flight.
    pub fn emit_in_flight(&self, handle: EngineHandle, position_ms: u64, duration_ms: u64) {
        let tick = tick(handle, position_ms, duration_ms, false);
        let mut state = self.state();
        let FakeState {
            active, retired, ..
        } = &mut *state;
        for (sub, callback) in active.iter_mut().chain(retired.iter_mut()) {
            if sub.handle == handle {
                callback(tick);
            }
        }
    }
}

fn tick(handle: EngineHandle, position_ms: u64, duration_ms: u64, finished: bool) -> StatusTick {
    StatusTick {
        handle,
        position: Duration::from_millis(position_ms),
        duration: Some(Duration::from_millis(duration_ms)),
        finished,
    }
}

impl AudioEngine for FakeEngine {
    fn create(&mut self, uri: &str) -> Result<EngineHandle, EngineError> {
        let mut s = self.state();
        s.calls.push(Call::Create(uri.to_string()));
        if s.failing_uris.contains(uri) {
            return Err(EngineError::UnsupportedUri(uri.to_string()));
        }
        s.next_id += 1;
        let handle = EngineHandle(s.next_id);
        s.live.insert(handle);
        s.max_live = s.max_live.max(s.live.len());
        Ok(handle)
    }

    fn play(&mut self, handle: EngineHandle) -> Result<(), EngineError> {
        self.state().calls.push(Call::Play(handle));
        Ok(())
    }

    fn pause(&mut self, handle: EngineHandle) -> Result<(), EngineError> {
        let mut s = self.state();
        s.calls.push(Call::Pause(handle));
        if s.fail_pause {
            return Err(EngineError::UnknownHandle(handle));
        }
        Ok(())
    }

    fn set_position(
        &mut self,
        handle: EngineHandle,
        position: Duration,
    ) -> Result<(), EngineError> {
        self.state().calls.push(Call::SetPosition(handle, position));
        Ok(())
    }

    fn set_volume(&mut self, handle: EngineHandle, volume: f32) -> Result<(), EngineError> {
        self.state().calls.push(Call::SetVolume(handle, volume));
        Ok(())
    }

    fn set_muted(&mut self, handle: EngineHandle, muted: bool) -> Result<(), EngineError> {
        self.state().calls.push(Call::SetMuted(handle, muted));
        Ok(())
    }

    fn release(&mut self, handle: EngineHandle) -> Result<(), EngineError> {
        let mut s = self.state();
        s.calls.push(Call::Release(handle));
        s.live.remove(&handle);
        Ok(())
    }

    fn subscribe_status(
        &mut self,
        handle: EngineHandle,
        callback: StatusCallback,
    ) -> Result<Subscription, EngineError> {
        let mut s = self.state();
        s.calls.push(Call::Subscribe(handle));
        s.next_id += 1;
        let sub = Subscription {
            id: s.next_id,
            handle,
        };
        s.active.push((sub, callback));
        Ok(sub)
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        let mut s = self.state();
        s.calls.push(Call::Unsubscribe(subscription.handle));
        if let Some(pos) = s.active.iter().position(|(sub, _)| *sub == subscription) {
            let entry = s.active.remove(pos);
            s.retired.push(entry);
        }
    }
}
