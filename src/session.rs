//! Playback session: the one stateful engine behind the playback screen.
//!
//! A `PlaybackSession` is a clamped cursor over the track list bound to at
//! most one audio engine handle. See `PlaybackSession` for the lifecycle.

mod error;
mod playback;
mod state;
mod time;

pub use error::SessionError;
pub use playback::PlaybackSession;
pub use state::{SessionOptions, SessionSnapshot, SessionState, UNKNOWN_TRACK};
pub use time::format_time;

#[cfg(test)]
pub(crate) mod fake;
