//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the loaded catalog, its
//! projections, the search state and the cursor positions. Playback state is
//! owned by `playback::PlaybackController`.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
