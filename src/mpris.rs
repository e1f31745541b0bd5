//! MPRIS service on the session bus, so desktop media keys and `playerctl`
//! can drive the player.
//!
//! D-Bus calls become `ControlCmd`s on a channel; the runtime pushes transport
//! state and now-playing metadata into the shared state through `MprisHandle`.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_io::{Timer, block_on};
use tracing::{debug, warn};
use zbus::object_server::InterfaceRef;
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedValue, Value};

use crate::catalog::{LARGE_ARTWORK_SIZE, TrackRecord};
use crate::playback::Transport;

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.teaser";

#[derive(Clone, Debug, PartialEq)]
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
    playback: Transport,
    title: Option<String>,
    artist: Vec<String>,
    album: Option<String>,
    url: Option<String>,
    art_url: Option<String>,
    length_micros: Option<i64>,
    track_id: Option<ObjectPath<'static>>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: Transport) {
        let changed = match self.state.lock() {
            Ok(mut s) if s.playback != playback => {
                s.playback = playback;
                true
            }
            _ => false,
        };
        if changed {
            let _ = self.notify.send(());
        }
    }

    /// Publish `track` (at `index` in the full list) as the current item, or
    /// clear the metadata when nothing is loaded.
    pub fn set_track_metadata(&self, index: Option<usize>, track: Option<&TrackRecord>) {
        if let Ok(mut s) = self.state.lock() {
            match (index, track) {
                (Some(i), Some(t)) => {
                    s.title = Some(t.title.clone());
                    s.artist = vec![t.artist_name.clone()];
                    s.album = Some(t.album_name.clone());
                    s.url = t.preview_url.clone();
                    s.art_url = Some(t.artwork_at(LARGE_ARTWORK_SIZE));
                    s.length_micros = None;
                    s.track_id = ObjectPath::try_from(format!("{OBJECT_PATH}/track/{i}")).ok();
                }
                _ => {
                    s.title = None;
                    s.artist.clear();
                    s.album = None;
                    s.url = None;
                    s.art_url = None;
                    s.length_micros = None;
                    s.track_id = None;
                }
            }
        }
        let _ = self.notify.send(());
    }

    /// Clip length once the audio thread knows it.
    pub fn set_length(&self, seconds: f64) {
        let micros = (seconds > 0.0).then(|| (seconds * 1_000_000.0) as i64);
        let changed = match self.state.lock() {
            Ok(mut s) if s.length_micros != micros => {
                s.length_micros = micros;
                true
            }
            _ => false,
        };
        if changed {
            let _ = self.notify.send(());
        }
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
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
        "teaser"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            Transport::Idle => "Stopped",
            Transport::Playing => "Playing",
            Transport::Paused => "Paused",
        }
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
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let mut put = |key: &str, value| {
            if let Ok(v) = OwnedValue::try_from(value) {
                map.insert(key.to_string(), v);
            }
        };

        if let Some(id) = &s.track_id {
            put("mpris:trackid", Value::ObjectPath(id.clone()));
        }
        if let Some(title) = &s.title {
            put("xesam:title", Value::from(title.clone()));
        }
        if !s.artist.is_empty() {
            put("xesam:artist", Value::from(s.artist.clone()));
        }
        if let Some(album) = &s.album {
            put("xesam:album", Value::from(album.clone()));
        }
        if let Some(url) = &s.url {
            put("xesam:url", Value::from(url.clone()));
        }
        if let Some(art) = &s.art_url {
            put("mpris:artUrl", Value::from(art.clone()));
        }
        if let Some(len) = s.length_micros {
            put("mpris:length", Value::from(len));
        }
        map
    }
}

pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    warn!("mpris: failed to connect to session bus: {e}");
                    return;
                }
            };

            if let Err(e) = connection.request_name(BUS_NAME).await {
                warn!("mpris: failed to acquire name: {e}");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server
                .at(OBJECT_PATH, RootIface { tx: tx.clone() })
                .await
            {
                warn!("mpris: failed to register root iface: {e}");
                return;
            }

            if let Err(e) = object_server
                .at(
                    OBJECT_PATH,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                warn!("mpris: failed to register player iface: {e}");
                return;
            }

            let player = match object_server
                .interface::<_, PlayerIface>(OBJECT_PATH)
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    warn!("mpris: player iface lookup failed: {e}");
                    return;
                }
            };
            debug!("mpris: registered as {BUS_NAME}");

            // Forward state changes as PropertiesChanged signals until the
            // handle is dropped.
            loop {
                Timer::after(Duration::from_millis(250)).await;
                if !drain_notifications(&notify_rx) {
                    if notify_rx_closed(&notify_rx) {
                        break;
                    }
                    continue;
                }
                emit_changes(&player).await;
            }
        });
    });

    MprisHandle {
        state,
        notify: notify_tx,
    }
}

/// Returns whether at least one notification was pending.
fn drain_notifications(rx: &Receiver<()>) -> bool {
    let mut any = false;
    while rx.try_recv().is_ok() {
        any = true;
    }
    any
}

fn notify_rx_closed(rx: &Receiver<()>) -> bool {
    matches!(rx.try_recv(), Err(TryRecvError::Disconnected))
}

async fn emit_changes(player: &InterfaceRef<PlayerIface>) {
    let iface = player.get().await;
    let emitter = player.signal_emitter();
    if let Err(e) = iface.playback_status_changed(emitter).await {
        debug!("mpris: PlaybackStatus signal failed: {e}");
    }
    if let Err(e) = iface.metadata_changed(emitter).await {
        debug!("mpris: Metadata signal failed: {e}");
    }
}

#[cfg(test)]
mod tests;
