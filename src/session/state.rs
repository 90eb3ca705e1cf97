use std::time::Duration;

/// Title shown when the current index has no asset behind it.
pub const UNKNOWN_TRACK: &str = "Unknown Track";

/// Lifecycle of a session's engine handle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No handle. Initial and terminal state, and where a failed load lands.
    #[default]
    Idle,
    /// `create` has been issued for the current index.
    Loading,
    /// A handle is live; see `is_playing` for the play/pause sub-state.
    Ready,
}

/// Initial values applied to a new session.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SessionOptions {
    pub volume: f32,
    pub muted: bool,
    pub auto_advance: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            volume: 1.0,
            muted: false,
            auto_advance: false,
        }
    }
}

/// Plain-data copy of everything the playback screen renders.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSnapshot {
    pub title: String,
    pub index: usize,
    pub len: usize,
    pub state: SessionState,
    pub is_playing: bool,
    /// Current position, or the seek preview while a drag is in progress.
    pub position: Option<Duration>,
    pub duration: Option<Duration>,
    pub progress: f64,
    pub volume: f32,
    pub muted: bool,
    pub seeking: bool,
}

impl SessionSnapshot {
    /// Times are unknown until the engine's first status tick.
    pub fn is_loading(&self) -> bool {
        match self.state {
            SessionState::Loading => true,
            SessionState::Ready => self.position.is_none(),
            SessionState::Idle => false,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.len
    }
}
