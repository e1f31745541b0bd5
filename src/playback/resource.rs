//! The seam between the playback controller and whatever actually plays audio.

/// Something reported by the playback resource.
#[derive(Clone, Debug, PartialEq)]
pub enum ResourceEvent {
    /// Current position in seconds.
    Position(f64),
    /// Duration of the loaded clip in seconds (0.0 when unknown).
    MetadataLoaded(f64),
    /// The loaded clip played to its end.
    Ended,
    /// Loading or decoding the clip failed.
    Failed(String),
}

/// A `ResourceEvent` tagged with the load it belongs to.
///
/// Loads are numbered from 1 in the order the resource received them, so a
/// consumer can drop events that were still in flight for a previous clip.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceMsg {
    pub load_id: u64,
    pub event: ResourceEvent,
}

/// A single audio playback handle.
pub trait PlaybackResource {
    /// Replace the current source. The new clip starts paused.
    fn load(&mut self, url: &str);
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, seconds: f64);
    fn set_volume(&mut self, volume: f32);
    fn set_muted(&mut self, muted: bool);
    /// Drop the current source.
    fn stop(&mut self);
}
