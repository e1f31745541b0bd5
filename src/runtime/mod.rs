//! Terminal runtime: wires settings, catalog fetch, audio, MPRIS and the UI
//! into one event loop.

use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::catalog::CatalogMsg;
use crate::config;
use crate::mpris::ControlCmd;
use crate::playback::ResourceMsg;

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;
mod startup;

pub use logging::init_logging;
pub use settings::load_settings;


/// Run the player for the signed-in `user_email` until the user quits.
pub fn run(settings: config::Settings, user_email: &str) -> Result<(), Box<dyn std::error::Error>> {
    info!("runtime: starting for {user_email}");

    let (catalog_tx, catalog_rx) = mpsc::channel::<CatalogMsg>();
    let (resource_tx, resource_rx) = mpsc::channel::<ResourceMsg>();
    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();

    let mut app = App::new(user_email, settings.catalog.section_size)
        .with_sidebar_albums(settings.ui.sidebar_albums);
    let mut player = startup::build_controller(&settings, resource_tx);
    let mpris = crate::mpris::spawn_mpris(control_tx.clone());
    mpris_sync::update_mpris(&mpris, &player);

    startup::start_catalog_fetch(&mut app, &settings, &catalog_tx);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let channels = event_loop::Channels {
        catalog_tx,
        catalog_rx,
        resource_rx,
        control_tx,
        control_rx,
    };
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut player,
        &mpris,
        &channels,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("runtime: stopped");
    run_result
}
