//! Commands, errors and small helpers shared by the audio thread and its handle.

use std::collections::VecDeque;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug)]
pub(super) enum AudioCmd {
    /// Download and decode a preview; it starts paused.
    Load(String),
    Play,
    Pause,
    /// Jump to an absolute position in the current clip.
    Seek(Duration),
    SetVolume(f32),
    SetMuted(bool),
    /// Drop the current clip.
    Stop,
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device")]
    NoDevice,
    #[error("http client unavailable: {0}")]
    Client(String),
    #[error("preview download failed: {0}")]
    Download(#[from] reqwest::Error),
    #[error("preview request returned HTTP {0}")]
    Status(u16),
    #[error("could not decode preview: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
}

/// Volume actually applied to the sink.
pub(super) fn applied_volume(volume: f32, muted: bool) -> f32 {
    if muted { 0.0 } else { volume.clamp(0.0, 1.0) }
}

/// Seconds from the controller as a `Duration`; negative or non-finite means zero.
pub(super) fn seek_position(seconds: f64) -> Duration {
    if seconds.is_finite() && seconds > 0.0 {
        Duration::from_secs_f64(seconds)
    } else {
        Duration::ZERO
    }
}

/// The `Load` that survives once the queue behind it has been folded in.
#[derive(Debug, PartialEq)]
pub(super) struct LatestLoad {
    pub url: String,
    /// Queued loads that were replaced before they started.
    pub superseded: u64,
}

/// Fold the commands queued behind a `Load` into it.
///
/// The last queued `Load` wins. Of the commands before it only volume, mute
/// and quit survive; everything after it stays in `pending`, in order.
pub(super) fn supersede_loads(url: String, pending: &mut VecDeque<AudioCmd>) -> LatestLoad {
    let mut latest = LatestLoad { url, superseded: 0 };
    let Some(last) = pending.iter().rposition(|c| matches!(c, AudioCmd::Load(_))) else {
        return latest;
    };

    let after = pending.split_off(last + 1);
    let mut kept = VecDeque::with_capacity(after.len());
    for cmd in pending.drain(..) {
        match cmd {
            AudioCmd::Load(next) => {
                latest.url = next;
                latest.superseded += 1;
            }
            AudioCmd::SetVolume(_) | AudioCmd::SetMuted(_) | AudioCmd::Quit { .. } => {
                kept.push_back(cmd)
            }
            _ => {}
        }
    }
    kept.extend(after);
    *pending = kept;
    latest
}
