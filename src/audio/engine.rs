use std::time::Duration;

use super::types::{EngineError, EngineHandle, StatusCallback, Subscription};

/// Playback backend driven by a `PlaybackSession`.
///
/// A handle returned by `create` stays valid until `release`. Commands on a
/// released or unknown handle are ignored by the backend; only failures the
/// caller can act on are returned.
pub trait AudioEngine {
    /// Open `uri` and start playing it immediately.
    fn create(&mut self, uri: &str) -> Result<EngineHandle, EngineError>;
    fn play(&mut self, handle: EngineHandle) -> Result<(), EngineError>;
    fn pause(&mut self, handle: EngineHandle) -> Result<(), EngineError>;
    fn set_position(&mut self, handle: EngineHandle, position: Duration)
    -> Result<(), EngineError>;
    /// `volume` is already clamped to `[0, 1]` by the caller.
    fn set_volume(&mut self, handle: EngineHandle, volume: f32) -> Result<(), EngineError>;
    fn set_muted(&mut self, handle: EngineHandle, muted: bool) -> Result<(), EngineError>;
    fn release(&mut self, handle: EngineHandle) -> Result<(), EngineError>;
    /// Call `callback` with a `StatusTick` periodically until unsubscribed or
    /// the handle is released.
    fn subscribe_status(
        &mut self,
        handle: EngineHandle,
        callback: StatusCallback,
    ) -> Result<Subscription, EngineError>;
    fn unsubscribe(&mut self, subscription: Subscription);
}
