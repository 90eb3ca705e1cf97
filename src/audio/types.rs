//! Audio-related small types and handles.
//!
//! This module defines the ids, status ticks and errors shared by every
//! `AudioEngine` implementation and its callers.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Opaque id of one open player instance inside an engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EngineHandle(pub(crate) u64);

impl fmt::Display for EngineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A registered status callback. Pass it back to `AudioEngine::unsubscribe`
/// to stop the callbacks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Subscription {
    pub(crate) id: u64,
    pub handle: EngineHandle,
}

/// Periodic progress report for one handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StatusTick {
    pub handle: EngineHandle,
    pub position: Duration,
    /// `None` when the backend could not determine the length.
    pub duration: Option<Duration>,
    /// The source ran out of samples.
    pub finished: bool,
}

pub type StatusCallback = Box<dyn FnMut(StatusTick) + Send>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unsupported uri: {0}")]
    UnsupportedUri(String),
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
    #[error("no audio output device: {0}")]
    NoOutputDevice(String),
    #[error("unknown engine handle {0}")]
    UnknownHandle(EngineHandle),
    #[error("audio thread is not running")]
    Disconnected,
}
