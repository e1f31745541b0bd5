//! Raw response -> normalized track list.

use std::collections::HashSet;

use super::model::{RawItem, TrackRecord};

/// Keep playable tracks, drop duplicate ids (first wins) and keep only the
/// records whose artist name contains `artist_filter`, case-insensitively.
pub fn normalize(items: Vec<RawItem>, artist_filter: &str) -> Vec<TrackRecord> {
    let needle = artist_filter.trim().to_lowercase();
    let mut seen_ids = HashSet::new();

    items
        .into_iter()
        .filter(RawItem::is_playable_kind)
        .filter_map(RawItem::into_record)
        .filter(|t| seen_ids.insert(t.id))
        .filter(|t| t.artist_name.to_lowercase().contains(&needle))
        .collect()
}
