//! Audio module: a `rodio` playback thread behind a command channel.
//!
//! `AudioPlayer` is the handle; it implements `PlaybackResource` by sending
//! `AudioCmd`s to the thread, which downloads previews, owns the sink and
//! reports position, duration and end-of-clip as `ResourceMsg`s.

mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
