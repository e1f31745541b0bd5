use super::model::TrackRecord;

/// Tracks whose title or album contains `query`, case-insensitively.
///
/// A blank query returns every track. Order follows `tracks`.
pub fn filter(tracks: &[TrackRecord], query: &str) -> Vec<TrackRecord> {
    if query.trim().is_empty() {
        return tracks.to_vec();
    }

    let q = query.to_lowercase();
    tracks
        .iter()
        .filter(|t| matches_lower(t, &q))
        .cloned()
        .collect()
}

fn matches_lower(track: &TrackRecord, query_lower: &str) -> bool {
    track.title.to_lowercase().contains(query_lower)
        || track.album_name.to_lowercase().contains(query_lower)
}
