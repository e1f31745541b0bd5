use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::{App, CatalogStatus, Pane, Section};
use crate::audio::AudioPlayer;
use crate::catalog::{self, CatalogMsg};
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::playback::{PlaybackController, PlaybackResource, ResourceMsg, Transport};
use crate::runtime::mpris_sync::update_mpris;
use crate::runtime::startup::start_catalog_fetch;
use crate::ui;

/// Channels the event loop drains every iteration.
pub struct Channels {
    pub catalog_tx: Sender<CatalogMsg>,
    pub catalog_rx: Receiver<CatalogMsg>,
    pub resource_rx: Receiver<ResourceMsg>,
    pub control_tx: Sender<ControlCmd>,
    pub control_rx: Receiver<ControlCmd>,
}

/// What the loop should do after handling an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Action {
    None,
    Quit,
    Reload,
}

/// Last transport snapshot pushed to MPRIS.
type MprisSnapshot = (Option<usize>, Transport, f64);

/// Main terminal event loop: handles input, UI drawing, catalog results,
/// audio events and MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &mut PlaybackController<AudioPlayer>,
    mpris: &MprisHandle,
    channels: &Channels,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut last_mpris: Option<MprisSnapshot> = None;

    loop {
        while let Ok(msg) = channels.catalog_rx.try_recv() {
            if app.install_catalog(msg.generation, msg.result, &mut rand::rng()) {
                player.replace_tracks(app.tracks.clone());
            }
        }

        while let Ok(msg) = channels.resource_rx.try_recv() {
            player.handle_message(msg);
        }

        // Keep MPRIS in sync even when playback changes come from media keys or auto-advance.
        let state = player.state();
        let snapshot = (state.current_index, state.transport, state.total_seconds);
        if last_mpris != Some(snapshot) {
            update_mpris(mpris, player);
            last_mpris = Some(snapshot);
        }

        terminal.draw(|f| {
            ui::draw(
                f,
                app,
                player.state(),
                player.current_track(),
                &settings.ui,
                &settings.controls,
            )
        })?;

        let mut action = Action::None;
        while let Ok(cmd) = channels.control_rx.try_recv() {
            action = handle_control_cmd(cmd, app, player);
            if action == Action::Quit {
                break;
            }
        }

        if action == Action::None && event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    action = handle_key_event(key, settings, app, player, &channels.control_tx);
                }
            }
        }

        match action {
            Action::Quit => {
                player
                    .resource()
                    .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
                return Ok(());
            }
            Action::Reload => start_catalog_fetch(app, settings, &channels.catalog_tx),
            Action::None => {}
        }
    }
}

/// Start whatever the cursor points at: a track in the browse pane, or the
/// first playable track of an album in the sidebar.
///
/// Ignored until a catalog is installed.
pub(super) fn play_selection<R: PlaybackResource>(
    app: &App,
    player: &mut PlaybackController<R>,
) -> bool {
    if app.status != CatalogStatus::Ready {
        return false;
    }
    let track = match app.focus {
        Pane::Albums => app
            .selected_album()
            .and_then(|album| catalog::first_playable_in_album(&app.tracks, album)),
        Pane::Browse => app.selected_track(),
    };
    match track {
        Some(t) => player.select_track(t),
        None => false,
    }
}

pub(super) fn handle_control_cmd<R: PlaybackResource>(
    cmd: ControlCmd,
    app: &App,
    player: &mut PlaybackController<R>,
) -> Action {
    debug!("runtime: control {cmd:?}");
    let idle = player.state().transport == Transport::Idle;
    match cmd {
        ControlCmd::Quit => return Action::Quit,
        ControlCmd::Play => {
            if idle {
                play_selection(app, player);
            } else {
                player.play();
            }
        }
        ControlCmd::Pause => player.pause(),
        ControlCmd::PlayPause => {
            if idle {
                play_selection(app, player);
            } else {
                player.toggle_play_pause();
            }
        }
        ControlCmd::Stop => player.stop(),
        ControlCmd::Next => {
            if !app.is_loading() {
                player.next();
            }
        }
        ControlCmd::Prev => {
            if !app.is_loading() {
                player.previous();
            }
        }
    }
    Action::None
}

pub(super) fn handle_key_event<R: PlaybackResource>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &mut PlaybackController<R>,
    control_tx: &Sender<ControlCmd>,
) -> Action {
    if app.filter_mode {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => app.clear_filter(),
            KeyCode::Backspace => app.pop_filter_char(),
            KeyCode::Enter => app.exit_filter_mode(),
            KeyCode::Down => app.next(),
            KeyCode::Up => app.prev(),
            KeyCode::Char('j') | KeyCode::Char('n') if ctrl => app.next(),
            KeyCode::Char('k') | KeyCode::Char('p') if ctrl => app.prev(),
            KeyCode::Char(c) => {
                if !c.is_control() {
                    app.push_filter_char(c);
                }
            }
            _ => {}
        }
        return Action::None;
    }

    let scrub = settings.controls.scrub_seconds as f64;
    let step = settings.controls.volume_step;

    match key.code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('r') => return Action::Reload,
        KeyCode::Char('/') if !app.is_loading() => app.enter_filter_mode(),
        KeyCode::Esc => {
            if app.metadata_window {
                app.toggle_metadata_window();
            } else if app.is_searching() {
                app.clear_filter();
            }
        }
        KeyCode::Tab => app.toggle_focus(),
        KeyCode::Char('1') => app.set_section(Section::Recent),
        KeyCode::Char('2') => app.set_section(Section::Recommended),
        KeyCode::Char('3') => app.set_section(Section::Trending),
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter => {
            play_selection(app, player);
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('l') => {
            let _ = control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('h') => {
            let _ = control_tx.send(ControlCmd::Prev);
        }
        KeyCode::Char('L') => player.seek_by(scrub),
        KeyCode::Char('H') => player.seek_by(-scrub),
        KeyCode::Char('+') | KeyCode::Char('=') => player.change_volume(step),
        KeyCode::Char('-') => player.change_volume(-step),
        KeyCode::Char('m') => player.toggle_mute(),
        KeyCode::Char('K') => app.toggle_metadata_window(),
        _ => {}
    }

    Action::None
}
