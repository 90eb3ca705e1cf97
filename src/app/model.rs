//! Application model types: `App`, `Route` and `PlaybackState`.
//!
//! The `App` struct holds the enumerated track list, the tracks-screen cursor
//! and the transient notice shown on the status line.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::library::{AudioAsset, Permission};

/// The playback state reported to MPRIS and the status line.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Screens the navigation host can show.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Tracks,
    Playback { track_index: usize },
}

/// A message that disappears on its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub expires_at: Instant,
}

/// The main application model.
pub struct App {
    pub tracks: Arc<[AudioAsset]>,
    pub selected: usize,
    pub permission: Permission,
    pub current_dir: Option<String>,
    notice: Option<Notice>,
}

impl App {
    /// Create a new `App` over the result of one enumeration.
    pub fn new(tracks: Vec<AudioAsset>, permission: Permission) -> Self {
        Self {
            tracks: tracks.into(),
            selected: 0,
            permission,
            current_dir: None,
            notice: None,
        }
    }

    /// Return true if the library contains any tracks.
    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// Record the library directory shown on the status line.
    pub fn set_current_dir(&mut self, dir: String) {
        self.current_dir = Some(dir);
    }

    /// Move the cursor to `idx`, clamped to the list.
    pub fn set_selected(&mut self, idx: usize) {
        self.selected = idx.min(self.tracks.len().saturating_sub(1));
    }

    /// Move the cursor down one row. Stops at the last track.
    pub fn next(&mut self) {
        self.set_selected(self.selected.saturating_add(1));
    }

    /// Move the cursor up one row. Stops at the first track.
    pub fn prev(&mut self) {
        self.set_selected(self.selected.saturating_sub(1));
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        self.set_selected(usize::MAX);
    }

    /// The route for playing the track under the cursor, if there is one.
    pub fn select_track(&self) -> Option<Route> {
        self.has_tracks().then_some(Route::Playback {
            track_index: self.selected,
        })
    }

    /// Show `text` on the status line for `ttl`.
    pub fn set_notice(&mut self, text: impl Into<String>, now: Instant, ttl: Duration) {
        self.notice = Some(Notice {
            text: text.into(),
            expires_at: now + ttl,
        });
    }

    /// The notice still showing at `now`.
    pub fn notice(&self, now: Instant) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|n| now < n.expires_at)
            .map(|n| n.text.as_str())
    }

    /// Drop the notice once it has expired.
    pub fn expire_notice(&mut self, now: Instant) {
        if self.notice.as_ref().is_some_and(|n| now >= n.expires_at) {
            self.notice = None;
        }
    }
}
