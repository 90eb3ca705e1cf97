use thiserror::Error;

use crate::audio::EngineError;

/// Failures a session reports to its screen. None of them are fatal: the
/// screen shows them as a notice and keeps running.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no tracks to play")]
    NoTracks,
    #[error("could not load {filename}: {source}")]
    Load {
        filename: String,
        #[source]
        source: EngineError,
    },
    #[error(transparent)]
    Engine(#[from] EngineError),
}
