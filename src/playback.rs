//! Playback module: the transport state machine and the resource it drives.
//!
//! `PlaybackController` owns the playing index and the mirrored transport
//! state; `PlaybackResource` is the handle it drives (the rodio-backed
//! `audio::AudioPlayer` in the binary, a recording fake in tests).

mod controller;
mod resource;

pub use controller::*;
pub use resource::*;
