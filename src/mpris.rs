//! MPRIS bridge: media keys in, now-playing state out.
//!
//! The D-Bus service runs on its own thread. Incoming method calls become
//! [`ControlCmd`]s on a channel the event loop drains; the event loop pushes
//! what clients should see through [`MprisHandle`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};
use std::time::Duration;

use async_io::{Timer, block_on};
use zbus::{Connection, connection, interface};
use zvariant::{ObjectPath, OwnedValue, Value};

use crate::app::PlaybackState;
use crate::library::AudioAsset;

const BUS_NAME: &str = "org.mpris.MediaPlayer2.encore";
const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";

/// Media-key commands forwarded into the event loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackState,
    title: Option<String>,
    url: Option<String>,
    length_micros: Option<i64>,
    track_id: Option<ObjectPath<'static>>,
    has_previous: bool,
    has_next: bool,
}

impl SharedState {
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        [
            ("mpris:trackid", self.track_id.clone().and_then(owned)),
            ("xesam:title", self.title.clone().and_then(owned)),
            ("xesam:url", self.url.clone().and_then(owned)),
            ("mpris:length", self.length_micros.and_then(owned)),
        ]
        .into_iter()
        .filter_map(|(key, value)| Some((key.to_string(), value?)))
        .collect()
    }
}

fn owned<'a>(value: impl Into<Value<'a>>) -> Option<OwnedValue> {
    OwnedValue::try_from(value.into()).ok()
}

fn status_name(playback: PlaybackState) -> &'static str {
    match playback {
        PlaybackState::Stopped => "Stopped",
        PlaybackState::Playing => "Playing",
        PlaybackState::Paused => "Paused",
    }
}

/// Write side of the state the D-Bus properties read from.
pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl MprisHandle {
    fn update(&self, f: impl FnOnce(&mut SharedState)) {
        match self.state.lock() {
            Ok(mut s) => f(&mut s),
            Err(_) => tracing::warn!("MPRIS state lock poisoned; update dropped"),
        }
    }

    pub fn set_playback(&self, playback: PlaybackState) {
        self.update(|s| s.playback = playback);
    }

    /// Publish the now-playing asset, or clear it with `None`.
    pub fn set_track_metadata(
        &self,
        index: Option<usize>,
        asset: Option<&AudioAsset>,
        length: Option<Duration>,
    ) {
        let track_id =
            index.and_then(|i| ObjectPath::try_from(format!("{OBJECT_PATH}/track/{i}")).ok());
        let length_micros = asset
            .and(length)
            .map(|d| i64::try_from(d.as_micros()).unwrap_or(i64::MAX));
        self.update(|s| {
            s.title = asset.map(|a| a.filename.clone());
            s.url = asset.map(|a| a.uri.clone());
            s.length_micros = length_micros;
            s.track_id = track_id;
        });
    }

    pub fn set_neighbours(&self, has_previous: bool, has_next: bool) {
        self.update(|s| {
            s.has_previous = has_previous;
            s.has_next = has_next;
        });
    }
}

fn forward(tx: &Sender<ControlCmd>, cmd: ControlCmd) {
    if tx.send(cmd).is_err() {
        tracing::debug!("MPRIS command after event loop exit");
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {}

    fn quit(&self) {
        forward(&self.tx, ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "encore"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        Vec::new()
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

impl PlayerIface {
    fn read<T>(&self, fallback: T, f: impl FnOnce(&SharedState) -> T) -> T {
        self.state.lock().map(|s| f(&s)).unwrap_or(fallback)
    }
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        forward(&self.tx, ControlCmd::Next);
    }

    fn previous(&self) {
        forward(&self.tx, ControlCmd::Prev);
    }

    fn play(&self) {
        forward(&self.tx, ControlCmd::Play);
    }

    fn pause(&self) {
        forward(&self.tx, ControlCmd::Pause);
    }

    fn play_pause(&self) {
        forward(&self.tx, ControlCmd::PlayPause);
    }

    fn stop(&self) {
        forward(&self.tx, ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        self.read("Stopped", |s| status_name(s.playback))
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        self.read(false, |s| s.has_next)
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        self.read(false, |s| s.has_previous)
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        self.read(HashMap::new(), SharedState::metadata)
    }
}

async fn serve(tx: Sender<ControlCmd>, state: Arc<Mutex<SharedState>>) -> zbus::Result<Connection> {
    connection::Builder::session()?
        .name(BUS_NAME)?
        .serve_at(OBJECT_PATH, RootIface { tx: tx.clone() })?
        .serve_at(OBJECT_PATH, PlayerIface { tx, state })?
        .build()
        .await
}

/// Start the MPRIS service. Without a session bus the player runs on with
/// media keys disabled.
pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let shared = state.clone();

    std::thread::spawn(move || {
        block_on(async move {
            let _connection = match serve(tx, shared).await {
                Ok(connection) => connection,
                Err(e) => {
                    tracing::warn!(error = %e, "MPRIS unavailable");
                    return;
                }
            };
            tracing::info!(name = BUS_NAME, "MPRIS service registered");
            loop {
                Timer::after(Duration::from_secs(3600)).await;
            }
        });
    });

    MprisHandle { state }
}
