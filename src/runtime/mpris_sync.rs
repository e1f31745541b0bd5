use crate::mpris::MprisHandle;
use crate::playback::{PlaybackController, PlaybackResource};

pub fn update_mpris<R: PlaybackResource>(mpris: &MprisHandle, player: &PlaybackController<R>) {
    let state = player.state();
    mpris.set_track_metadata(state.current_index, player.current_track());
    mpris.set_length(state.total_seconds);
    mpris.set_playback(state.transport);
}
