use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::audio::AudioEngine;
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::host::Host;
use crate::runtime::mpris_sync::{NowPlaying, now_playing, update_mpris};
use crate::ui;

const INPUT_POLL: Duration = Duration::from_millis(50);

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// What MPRIS clients were last told.
    pub last_mpris: Option<NowPlaying>,
}

impl EventLoopState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish to MPRIS when something a client can see has changed.
    pub fn sync_mpris<E: AudioEngine + Clone>(&mut self, mpris: &MprisHandle, host: &Host<E>) {
        let now = now_playing(host);
        if self.last_mpris.as_ref() != Some(&now) {
            update_mpris(mpris, host, &now);
            self.last_mpris = Some(now);
        }
    }
}

/// Main terminal event loop: handles input, UI drawing, status ticks and
/// MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run<E: AudioEngine + Clone>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    host: &mut Host<E>,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let now = Instant::now();
        host.tick(now);
        state.sync_mpris(mpris, host);

        let view = host.view(now);
        terminal.draw(|f| ui::draw(f, &host.app, view.as_ref(), settings, now))?;

        while let Ok(cmd) = control_rx.try_recv() {
            tracing::debug!(?cmd, "control command");
            if host.handle_control(cmd, Instant::now()) {
                return Ok(());
            }
        }

        if event::poll(INPUT_POLL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                tracing::trace!(route = ?host.route(), code = ?key.code, "key");
                if host.handle_key(key, Instant::now()) {
                    return Ok(());
                }
            }
        }
    }
}
