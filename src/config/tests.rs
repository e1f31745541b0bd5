use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_teaser_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("TEASER_CONFIG_PATH", "/tmp/teaser-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/teaser-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("teaser")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("teaser")
            .join("config.toml")
    );
}

#[test]
fn defaults_are_valid() {
    let s = Settings::default();
    assert!(s.validate().is_ok());
    assert_eq!(s.catalog.section_size, 12);
    assert_eq!(s.catalog.countries.len(), 2);
    assert!(s.playback.skip_unplayable);
    assert!(s.playback.auto_advance);
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut s = Settings::default();
    s.catalog.limit = 500;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.initial_volume = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.controls.volume_step = 0.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.catalog.section_size = 0;
    assert!(s.validate().is_err());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[catalog]
base_url = "http://localhost:5173/api/itunes"
artist_id = 7
artist_name = "someone"
countries = ["SV"]
limit = 50
section_size = 6

[audio]
initial_volume = 0.4
quit_fade_out_ms = 0

[playback]
skip_unplayable = false
auto_advance = false

[controls]
scrub_seconds = 9
volume_step = 0.1

[ui]
header_text = "hello"
now_playing_track_fields = ["artist", "title", "collection"]
now_playing_track_separator = " • "
now_playing_time_fields = ["elapsed", "remaining"]
now_playing_time_separator = " | "
sidebar_albums = 10
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("TEASER_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("TEASER__CONTROLS__SCRUB_SECONDS");

    let s = Settings::load().unwrap();
    assert_eq!(s.catalog.base_url, "http://localhost:5173/api/itunes");
    assert_eq!(s.catalog.artist_id, 7);
    assert_eq!(s.catalog.artist_name, "someone");
    assert_eq!(s.catalog.countries, vec!["SV".to_string()]);
    assert_eq!(s.catalog.limit, 50);
    assert_eq!(s.catalog.section_size, 6);
    assert_eq!(s.catalog.timeout_secs, 10);
    assert!((s.audio.initial_volume - 0.4).abs() < f32::EPSILON);
    assert_eq!(s.audio.quit_fade_out_ms, 0);
    assert!(!s.playback.skip_unplayable);
    assert!(!s.playback.auto_advance);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(
        s.ui.now_playing_track_fields,
        vec![
            TrackDisplayField::Artist,
            TrackDisplayField::Title,
            TrackDisplayField::Album
        ]
    );
    assert_eq!(s.ui.now_playing_track_separator, " • ");
    assert_eq!(
        s.ui.now_playing_time_fields,
        vec![TimeField::Elapsed, TimeField::Remaining]
    );
    assert_eq!(s.ui.now_playing_time_separator, " | ");
    assert_eq!(s.ui.sidebar_albums, 10);
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[controls]
scrub_seconds = 5
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("TEASER_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("TEASER__CONTROLS__SCRUB_SECONDS", "15");

    let s = Settings::load().unwrap();
    assert_eq!(s.controls.scrub_seconds, 15);
}
