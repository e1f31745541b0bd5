//! Read-only views derived from the normalized track list.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use rand::Rng;
use rand::seq::SliceRandom;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use super::model::{MEDIUM_ARTWORK_SIZE, TrackRecord};

/// Unique, non-empty album names, ordered ignoring case and accents.
pub fn album_names(tracks: &[TrackRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names: Vec<String> = tracks
        .iter()
        .map(|t| t.album_name.as_str())
        .filter(|name| !name.trim().is_empty())
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect();

    names.sort_by(|a, b| compare_names(a, b));
    names
}

fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

/// Lowercased with diacritics stripped, so "Árbol" sorts with the A's.
pub(crate) fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Album name -> medium artwork of the first track seen for that album.
pub fn album_art(tracks: &[TrackRecord]) -> BTreeMap<String, String> {
    let mut art = BTreeMap::new();
    for t in tracks {
        if t.album_name.trim().is_empty() {
            continue;
        }
        art.entry(t.album_name.clone())
            .or_insert_with(|| t.artwork_at(MEDIUM_ARTWORK_SIZE));
    }
    art
}

/// Newest first; tracks without a release date sort as the oldest.
pub fn recent_releases(tracks: &[TrackRecord], n: usize) -> Vec<TrackRecord> {
    let mut sorted = tracks.to_vec();
    // Option orders None before Some, so reversing puts undated tracks last.
    sorted.sort_by(|a, b| b.release_date.cmp(&a.release_date));
    sorted.truncate(n);
    sorted
}

/// A uniform random sample of at most `n` tracks.
pub fn random_sample<R: Rng + ?Sized>(
    tracks: &[TrackRecord],
    n: usize,
    rng: &mut R,
) -> Vec<TrackRecord> {
    let mut shuffled = tracks.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(n);
    shuffled
}

pub fn recommended<R: Rng + ?Sized>(
    tracks: &[TrackRecord],
    n: usize,
    rng: &mut R,
) -> Vec<TrackRecord> {
    random_sample(tracks, n, rng)
}

pub fn trending<R: Rng + ?Sized>(
    tracks: &[TrackRecord],
    n: usize,
    rng: &mut R,
) -> Vec<TrackRecord> {
    random_sample(tracks, n, rng)
}

/// First track of `album` that can actually be played.
pub fn first_playable_in_album<'a>(
    tracks: &'a [TrackRecord],
    album: &str,
) -> Option<&'a TrackRecord> {
    tracks
        .iter()
        .find(|t| t.album_name == album && t.has_preview())
}
