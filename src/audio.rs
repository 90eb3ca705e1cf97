//! Audio engine: the `AudioEngine` contract and its rodio implementation.
//!
//! `RodioEngine` owns no audio state on the caller's thread. Every command is
//! forwarded to a dedicated audio thread that keeps the output stream and one
//! `Sink` per live handle, and reports progress through status callbacks.

mod engine;
mod player;
mod sink;
mod thread;
mod types;

pub use engine::AudioEngine;
pub use player::RodioEngine;
pub use types::{EngineError, EngineHandle, StatusCallback, StatusTick, Subscription};
