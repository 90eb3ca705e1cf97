use std::time::Duration;

use crate::app::PlaybackState;
use crate::audio::AudioEngine;
use crate::mpris::MprisHandle;

use super::host::Host;

/// The parts of the host MPRIS clients can see.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NowPlaying {
    pub index: Option<usize>,
    pub playback: PlaybackState,
    pub length: Option<Duration>,
    pub has_previous: bool,
    pub has_next: bool,
}

pub fn now_playing<E: AudioEngine + Clone>(host: &Host<E>) -> NowPlaying {
    match host.screen() {
        Some(screen) => {
            let session = screen.session();
            let index = session.current_index();
            NowPlaying {
                index: Some(index),
                playback: screen.playback_state(),
                length: session.duration(),
                has_previous: index > 0,
                has_next: index + 1 < session.len(),
            }
        }
        None => NowPlaying::default(),
    }
}

pub fn update_mpris<E: AudioEngine + Clone>(mpris: &MprisHandle, host: &Host<E>, now: &NowPlaying) {
    let asset = now.index.and_then(|i| host.app.tracks.get(i));
    mpris.set_track_metadata(now.index, asset, now.length);
    mpris.set_playback(now.playback);
    mpris.set_neighbours(now.has_previous, now.has_next);
}
