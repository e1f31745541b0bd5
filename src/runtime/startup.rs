use std::sync::mpsc::Sender;

use tracing::info;

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::catalog::{CatalogMsg, spawn_fetch};
use crate::config;
use crate::playback::{PlaybackController, ResourceMsg};

/// Kick off a catalog fetch in the background. Any fetch still in flight is
/// superseded: its result will carry an older generation.
pub fn start_catalog_fetch(app: &mut App, settings: &config::Settings, tx: &Sender<CatalogMsg>) {
    let generation = app.begin_fetch();
    info!(
        "startup: fetching catalog for artist {} (generation {generation})",
        settings.catalog.artist_id
    );
    spawn_fetch(settings.catalog.clone(), generation, tx.clone());
}

pub fn build_controller(
    settings: &config::Settings,
    events: Sender<ResourceMsg>,
) -> PlaybackController<AudioPlayer> {
    let player = AudioPlayer::new(settings.audio.clone(), events);
    PlaybackController::new(
        player,
        settings.audio.initial_volume,
        settings.playback.clone(),
    )
}
