use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

/// Resolution baked into the artwork URLs the catalog service returns.
pub const BASE_ARTWORK_SIZE: u32 = 100;
/// Used for album thumbnails.
pub const MEDIUM_ARTWORK_SIZE: u32 = 200;
/// Used for cards and the now-playing panel.
pub const LARGE_ARTWORK_SIZE: u32 = 300;

/// One normalized catalog entry.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackRecord {
    pub id: u64,
    pub title: String,
    pub album_name: String,
    pub artist_name: String,
    /// Artwork URL at `BASE_ARTWORK_SIZE`; see [`TrackRecord::artwork_at`].
    pub artwork_url: String,
    pub preview_url: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
}

impl TrackRecord {
    pub fn has_preview(&self) -> bool {
        self.preview_url.as_deref().is_some_and(|u| !u.trim().is_empty())
    }

    /// Rewrite the templated artwork URL to a `size`x`size` variant.
    pub fn artwork_at(&self, size: u32) -> String {
        rewrite_artwork(&self.artwork_url, size)
    }
}

pub(crate) fn rewrite_artwork(url: &str, size: u32) -> String {
    let base = format!("{BASE_ARTWORK_SIZE}x{BASE_ARTWORK_SIZE}");
    url.replacen(&base, &format!("{size}x{size}"), 1)
}

/// Response body of the `lookup` and `search` endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResponse {
    #[serde(default)]
    pub results: Vec<RawItem>,
}

/// A single raw result. Everything is optional: lookups mix the artist
/// wrapper in with the songs.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    pub wrapper_type: Option<String>,
    pub kind: Option<String>,
    pub track_id: Option<u64>,
    pub artist_name: Option<String>,
    pub track_name: Option<String>,
    pub collection_name: Option<String>,
    #[serde(rename = "artworkUrl100")]
    pub artwork_url_100: Option<String>,
    pub preview_url: Option<String>,
    pub release_date: Option<String>,
}

impl RawItem {
    pub fn is_playable_kind(&self) -> bool {
        self.wrapper_type.as_deref() == Some("track") || self.kind.as_deref() == Some("song")
    }

    /// Convert into a `TrackRecord`; `None` when there is no track id.
    pub fn into_record(self) -> Option<TrackRecord> {
        let id = self.track_id?;
        let release_date = self.release_date.as_deref().and_then(parse_release_date);

        Some(TrackRecord {
            id,
            title: self.track_name.unwrap_or_default(),
            album_name: self.collection_name.unwrap_or_default(),
            artist_name: self.artist_name.unwrap_or_default(),
            artwork_url: self.artwork_url_100.unwrap_or_default(),
            preview_url: self.preview_url.filter(|u| !u.trim().is_empty()),
            release_date,
        })
    }
}

/// RFC 3339 timestamps, or bare `YYYY-MM-DD` dates taken as midnight UTC.
pub(crate) fn parse_release_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Some(d.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}
