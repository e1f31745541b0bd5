use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/teaser/config.toml` or `~/.config/teaser/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `TEASER__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub audio: AudioSettings,
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Origin of the lookup/search service, or a proxy prefix in front of it
    /// (e.g. `http://localhost:5173/api/itunes`).
    pub base_url: String,
    /// Artist id used by the exact lookup variants.
    pub artist_id: u64,
    /// Search term for the search variants, and the substring every
    /// returned track's artist must contain.
    pub artist_name: String,
    /// Storefront countries; each endpoint is tried once per country.
    pub countries: Vec<String>,
    /// Result limit per request (the service caps this at 200).
    pub limit: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// How many tracks each browse section shows.
    pub section_size: usize,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: "https://itunes.apple.com".to_string(),
            artist_id: 1428259384,
            artist_name: "wos".to_string(),
            countries: vec!["US".to_string(), "MX".to_string()],
            limit: 200,
            timeout_secs: 10,
            section_size: 12,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Volume at startup, between 0.0 and 1.0.
    pub initial_volume: f32,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            initial_volume: 0.9,
            quit_fade_out_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether next/previous walk past tracks that have no preview clip.
    pub skip_unplayable: bool,
    /// Whether the next track starts when a preview finishes.
    pub auto_advance: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            skip_unplayable: true,
            auto_advance: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
    /// Volume change per `+` / `-` press.
    pub volume_step: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            scrub_seconds: 5,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,

    /// Which track fields to show in the now-playing panel, and in what order.
    ///
    /// Example: ["title", "album"]
    pub now_playing_track_fields: Vec<TrackDisplayField>,

    /// Separator used to join `now_playing_track_fields`.
    pub now_playing_track_separator: String,

    /// Which time fields to show in the now-playing panel, and in what order.
    ///
    /// Example: ["elapsed", "total", "remaining"]
    pub now_playing_time_fields: Vec<TimeField>,

    /// Separator used to join `now_playing_time_fields`.
    pub now_playing_time_separator: String,

    /// How many albums the sidebar lists.
    pub sidebar_albums: usize,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ thirty seconds at a time ~ ".to_string(),
            now_playing_track_fields: vec![
                TrackDisplayField::Title,
                TrackDisplayField::Album,
                TrackDisplayField::Artist,
            ],
            now_playing_track_separator: " - ".to_string(),
            now_playing_time_fields: vec![TimeField::Elapsed, TimeField::Total, TimeField::Remaining],
            now_playing_time_separator: " / ".to_string(),
            sidebar_albums: 50,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeField {
    Elapsed,
    Total,
    Remaining,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackDisplayField {
    Title,
    Artist,
    #[serde(alias = "collection")]
    Album,
    #[serde(alias = "release-year")]
    Year,
}
