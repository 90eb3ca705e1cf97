//! Application module: the models behind the two screens.
//!
//! `App` holds the track list and the tracks-screen cursor. `PlaybackScreen`
//! is mounted when a track is selected and owns the playback session for as
//! long as the playback screen is shown.

mod model;
mod playback_screen;

pub use model::*;
pub use playback_screen::{Intent, PlaybackScreen, PlaybackView};

#[cfg(test)]
mod tests;
