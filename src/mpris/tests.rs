use super::*;
use std::sync::mpsc;

fn make_track() -> TrackRecord {
    TrackRecord {
        id: 99,
        title: "Test Title".to_string(),
        album_name: "Test Album".to_string(),
        artist_name: "Test Artist".to_string(),
        artwork_url: "https://img.example/1/100x100bb.jpg".to_string(),
        preview_url: Some("https://audio.example/1.m4a".to_string()),
        release_date: None,
    }
}

fn handle() -> (Arc<Mutex<SharedState>>, MprisHandle, Receiver<()>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();
    let handle = MprisHandle {
        state: state.clone(),
        notify: notify_tx,
    };
    (state, handle, notify_rx)
}

#[test]
fn set_track_metadata_sets_and_clears_shared_state() {
    let (state, handle, _rx) = handle();

    let track = make_track();
    handle.set_track_metadata(Some(7), Some(&track));
    handle.set_length(29.5);

    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert_eq!(s.artist, vec!["Test Artist".to_string()]);
        assert_eq!(s.album.as_deref(), Some("Test Album"));
        assert_eq!(s.url.as_deref(), Some("https://audio.example/1.m4a"));
        assert_eq!(
            s.art_url.as_deref(),
            Some("https://img.example/1/300x300bb.jpg")
        );
        assert_eq!(s.length_micros, Some(29_500_000));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/7")
        );
    }

    handle.set_track_metadata(None, None);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert!(s.artist.is_empty());
        assert_eq!(s.album, None);
        assert_eq!(s.url, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn unchanged_playback_does_not_notify() {
    let (_state, handle, rx) = handle();
    handle.set_playback(Transport::Playing);
    handle.set_playback(Transport::Playing);
    handle.set_length(0.0);
    assert!(drain_notifications(&rx));
    assert!(!drain_notifications(&rx));
}

#[test]
fn playback_status_maps_transport_to_mpris_strings() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    assert_eq!(iface.playback_status(), "Stopped");

    state.lock().unwrap().playback = Transport::Playing;
    assert_eq!(iface.playback_status(), "Playing");

    state.lock().unwrap().playback = Transport::Paused;
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let (state, handle, _rx) = handle();
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };

    assert!(iface.metadata().is_empty());

    handle.set_track_metadata(Some(1), Some(&make_track()));
    handle.set_length(30.0);

    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "mpris:artUrl",
        "xesam:title",
        "xesam:artist",
        "xesam:album",
        "xesam:url",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn player_methods_forward_control_commands() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };

    iface.play_pause();
    iface.next();
    iface.previous();
    iface.stop();

    let got: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            ControlCmd::PlayPause,
            ControlCmd::Next,
            ControlCmd::Prev,
            ControlCmd::Stop
        ]
    );
}
