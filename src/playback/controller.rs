//! Playback controller: which track is playing and what the transport shows.
//!
//! The controller drives a `PlaybackResource` and mirrors the position and
//! duration the resource reports back. Those mirrors are a display cache; the
//! resource stays the source of truth.

use tracing::{debug, warn};

use crate::catalog::TrackRecord;
use crate::config::PlaybackSettings;

use super::resource::{PlaybackResource, ResourceEvent, ResourceMsg};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Transport {
    /// Nothing loaded.
    #[default]
    Idle,
    Paused,
    Playing,
}

/// Transport state as shown to the user.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackState {
    /// Index into the full track list; only ever points at a playable track.
    pub current_index: Option<usize>,
    pub elapsed_seconds: f64,
    pub total_seconds: f64,
    /// Last volume set, kept while muted.
    pub volume: f32,
    pub muted: bool,
    pub transport: Transport,
}

impl PlaybackState {
    fn new(volume: f32) -> Self {
        Self {
            current_index: None,
            elapsed_seconds: 0.0,
            total_seconds: 0.0,
            volume,
            muted: false,
            transport: Transport::Idle,
        }
    }

    /// What the listener actually hears.
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }
}

#[derive(Copy, Clone)]
enum Step {
    Forward,
    Back,
}

pub struct PlaybackController<R: PlaybackResource> {
    resource: R,
    tracks: Vec<TrackRecord>,
    state: PlaybackState,
    policy: PlaybackSettings,
    /// Number of `load` calls issued; matches the resource's load ids.
    loads: u64,
    /// The clip played to its end without advancing.
    finished: bool,
    /// The resource reported a failure; there is nothing to resume.
    failed: bool,
}

impl<R: PlaybackResource> PlaybackController<R> {
    pub fn new(mut resource: R, initial_volume: f32, policy: PlaybackSettings) -> Self {
        let volume = initial_volume.clamp(0.0, 1.0);
        resource.set_volume(volume);
        Self {
            resource,
            tracks: Vec::new(),
            state: PlaybackState::new(volume),
            policy,
            loads: 0,
            finished: false,
            failed: false,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn current_track(&self) -> Option<&TrackRecord> {
        self.state.current_index.and_then(|i| self.tracks.get(i))
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    /// Install a new track list. Whatever was playing stops.
    pub fn replace_tracks(&mut self, tracks: Vec<TrackRecord>) {
        if self.state.transport != Transport::Idle {
            self.stop();
        }
        self.tracks = tracks;
    }

    /// Start `record`, located in the full list by id.
    ///
    /// Returns `false` (and changes nothing) when the record has no preview
    /// or is not part of the list.
    pub fn select_track(&mut self, record: &TrackRecord) -> bool {
        if !record.has_preview() {
            return false;
        }
        match self.tracks.iter().position(|t| t.id == record.id) {
            Some(index) => self.start(index),
            None => false,
        }
    }

    /// Start the track at `index`; a no-op when it has no preview.
    pub fn select_index(&mut self, index: usize) -> bool {
        match self.tracks.get(index) {
            Some(t) if t.has_preview() => self.start(index),
            _ => false,
        }
    }

    fn start(&mut self, index: usize) -> bool {
        let Some(url) = self.tracks[index].preview_url.clone() else {
            return false;
        };

        self.resource.load(&url);
        self.resource.play();
        self.loads += 1;
        self.finished = false;
        self.failed = false;

        self.state.current_index = Some(index);
        self.state.elapsed_seconds = 0.0;
        self.state.total_seconds = 0.0;
        self.state.transport = Transport::Playing;
        debug!("playback: started #{index} ({url})");
        true
    }

    pub fn toggle_play_pause(&mut self) {
        match self.state.transport {
            Transport::Idle => {}
            Transport::Playing => self.pause(),
            Transport::Paused => self.play(),
        }
    }

    /// Resume a paused clip. No-op when idle or already playing.
    ///
    /// After a failure the current track is loaded again.
    pub fn play(&mut self) {
        if self.state.transport != Transport::Paused {
            return;
        }
        if self.failed {
            if let Some(index) = self.state.current_index {
                self.start(index);
            }
            return;
        }
        if self.finished {
            self.resource.seek(0.0);
            self.state.elapsed_seconds = 0.0;
            self.finished = false;
        }
        self.resource.play();
        self.state.transport = Transport::Playing;
    }

    pub fn pause(&mut self) {
        if self.state.transport != Transport::Playing {
            return;
        }
        self.resource.pause();
        self.state.transport = Transport::Paused;
    }

    /// Jump to `seconds`, clamped to the clip. The mirror is updated before
    /// the resource confirms.
    pub fn seek(&mut self, seconds: f64) {
        if self.state.transport == Transport::Idle || self.failed || seconds.is_nan() {
            return;
        }

        let mut target = seconds.max(0.0);
        if self.state.total_seconds > 0.0 {
            target = target.min(self.state.total_seconds);
        }

        self.resource.seek(target);
        self.state.elapsed_seconds = target;
        self.finished = false;
    }

    pub fn seek_by(&mut self, delta_seconds: f64) {
        self.seek(self.state.elapsed_seconds + delta_seconds);
    }

    /// Set the volume (clamped to `[0, 1]`). Any audible volume unmutes.
    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        self.resource.set_volume(volume);
        self.state.volume = volume;

        if volume > 0.0 && self.state.muted {
            self.state.muted = false;
            self.resource.set_muted(false);
        }
    }

    pub fn change_volume(&mut self, delta: f32) {
        self.set_volume(self.state.volume + delta);
    }

    /// Flip mute; the stored volume is left alone.
    pub fn toggle_mute(&mut self) {
        self.state.muted = !self.state.muted;
        self.resource.set_muted(self.state.muted);
    }

    /// Next track, wrapping to the start. Returns whether something started.
    pub fn next(&mut self) -> bool {
        self.step(Step::Forward)
    }

    /// Previous track, wrapping to the end. Returns whether something started.
    pub fn previous(&mut self) -> bool {
        self.step(Step::Back)
    }

    fn step(&mut self, step: Step) -> bool {
        let len = self.tracks.len();
        if len == 0 {
            return false;
        }

        let advance = |i: usize| match step {
            Step::Forward => (i + 1) % len,
            Step::Back => (i + len - 1) % len,
        };

        let mut index = match (self.state.current_index, step) {
            (Some(i), _) => advance(i),
            (None, Step::Forward) => 0,
            (None, Step::Back) => len - 1,
        };

        if !self.policy.skip_unplayable {
            return self.select_index(index);
        }

        for _ in 0..len {
            if self.tracks[index].has_preview() {
                return self.start(index);
            }
            index = advance(index);
        }
        false
    }

    /// Unload everything and go back to idle.
    pub fn stop(&mut self) {
        self.resource.stop();
        self.finished = false;
        self.failed = false;
        self.state.current_index = None;
        self.state.elapsed_seconds = 0.0;
        self.state.total_seconds = 0.0;
        self.state.transport = Transport::Idle;
    }

    /// Apply a tagged resource message, dropping ones from an earlier load.
    pub fn handle_message(&mut self, msg: ResourceMsg) {
        if msg.load_id != self.loads {
            debug!(
                "playback: dropping stale event for load {} (current {})",
                msg.load_id, self.loads
            );
            return;
        }
        self.handle_event(msg.event);
    }

    /// Apply an event about the current load.
    pub fn handle_event(&mut self, event: ResourceEvent) {
        if self.state.transport == Transport::Idle {
            return;
        }

        match event {
            ResourceEvent::Position(seconds) => {
                self.state.elapsed_seconds = seconds;
            }
            ResourceEvent::MetadataLoaded(total) => {
                self.state.total_seconds = total;
            }
            ResourceEvent::Ended => {
                if self.policy.auto_advance && self.next() {
                    return;
                }
                self.finished = true;
                self.state.elapsed_seconds = self.state.total_seconds;
                self.state.transport = Transport::Paused;
            }
            ResourceEvent::Failed(reason) => {
                warn!("playback: {reason}");
                self.failed = true;
                self.state.transport = Transport::Paused;
            }
        }
    }
}
