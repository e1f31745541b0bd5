use super::*;
use crate::catalog::{FetchError, TrackRecord};
use chrono::{TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn t(id: u64, title: &str, album: &str, year: i32) -> TrackRecord {
    TrackRecord {
        id,
        title: title.into(),
        album_name: album.into(),
        artist_name: "WOS".into(),
        artwork_url: format!("https://img.example/{id}/100x100bb.jpg"),
        preview_url: Some(format!("https://audio.example/{id}.m4a")),
        release_date: Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single(),
    }
}

fn catalog() -> Vec<TrackRecord> {
    vec![
        t(1, "Canguro", "Caravana", 2019),
        t(2, "Morfeo", "Caravana", 2019),
        t(3, "Arrancármelo", "Oscuro Éxtasis", 2023),
        t(4, "Mugre", "Descartable", 2021),
    ]
}

fn ready_app() -> App {
    let mut app = App::new("ana.perez@example.com", 12);
    let generation = app.begin_fetch();
    let mut rng = StdRng::seed_from_u64(7);
    assert!(app.install_catalog(generation, Ok(catalog()), &mut rng));
    app
}

#[test]
fn new_app_starts_loading_with_alias() {
    let app = App::new("ana.perez@example.com", 12);
    assert_eq!(app.status, CatalogStatus::Loading);
    assert_eq!(app.alias, "ana perez");
    assert!(app.visible_tracks().is_empty());
}

#[test]
fn install_catalog_computes_projections() {
    let app = ready_app();
    assert_eq!(app.status, CatalogStatus::Ready);
    assert_eq!(app.albums, vec!["Caravana", "Descartable", "Oscuro Éxtasis"]);
    assert_eq!(
        app.album_art_url("Caravana"),
        Some("https://img.example/1/200x200bb.jpg")
    );
    let recent: Vec<u64> = app.sections.recent.iter().map(|t| t.id).collect();
    assert_eq!(recent[..2], [3, 4]);
    assert_eq!(app.sections.recommended.len(), 4);
    assert_eq!(app.sections.trending.len(), 4);
}

#[test]
fn stale_generation_is_ignored() {
    let mut app = App::new("a@b.co", 12);
    let old = app.begin_fetch();
    let current = app.begin_fetch();
    let mut rng = StdRng::seed_from_u64(1);

    assert!(!app.install_catalog(old, Ok(catalog()), &mut rng));
    assert!(app.is_loading());
    assert!(app.tracks.is_empty());

    assert!(app.install_catalog(current, Ok(Vec::new()), &mut rng));
    assert_eq!(app.status, CatalogStatus::Empty);
}

#[test]
fn failed_fetch_is_distinct_from_empty() {
    let mut app = ready_app();
    let generation = app.begin_fetch();
    let mut rng = StdRng::seed_from_u64(1);
    app.install_catalog(
        generation,
        Err(FetchError::Exhausted { attempts: 4 }),
        &mut rng,
    );
    assert!(matches!(app.status, CatalogStatus::Failed(_)));
    assert!(app.tracks.is_empty());
    assert!(app.albums.is_empty());
}

#[test]
fn searching_replaces_sections_with_results() {
    let mut app = ready_app();
    app.enter_filter_mode();
    for c in "cara".chars() {
        app.push_filter_char(c);
    }
    assert!(app.is_searching());
    let ids: Vec<u64> = app.visible_tracks().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2]);

    app.exit_filter_mode();
    assert!(app.is_searching());

    app.clear_filter();
    assert!(!app.is_searching());
    assert_eq!(app.visible_tracks().len(), app.sections.recent.len());
}

#[test]
fn whitespace_query_is_not_a_search() {
    let mut app = ready_app();
    app.push_filter_char(' ');
    assert!(!app.is_searching());
}

#[test]
fn selection_is_clamped_when_results_shrink() {
    let mut app = ready_app();
    app.selected = 3;
    app.push_filter_char('m');
    app.push_filter_char('u');
    assert_eq!(app.selected, 0);
    assert_eq!(app.selected_track().map(|t| t.id), Some(4));
}

#[test]
fn cursor_wraps_in_focused_pane() {
    let mut app = ready_app();
    app.prev();
    assert_eq!(app.selected, app.visible_tracks().len() - 1);
    app.next();
    assert_eq!(app.selected, 0);

    app.toggle_focus();
    assert_eq!(app.focus, Pane::Albums);
    app.prev();
    assert_eq!(app.selected_album(), Some("Oscuro Éxtasis"));
    app.next();
    assert_eq!(app.selected_album(), Some("Caravana"));
}

#[test]
fn switching_section_resets_cursor() {
    let mut app = ready_app();
    app.selected = 2;
    app.set_section(Section::Trending);
    assert_eq!(app.selected, 0);
    assert_eq!(Section::Recommended.title(&app.alias), "Made for ana perez");
}

#[test]
fn cursor_moves_are_safe_on_empty_lists() {
    let mut app = App::new("a@b.co", 12);
    app.next();
    app.prev();
    assert_eq!(app.selected, 0);
    assert!(app.selected_track().is_none());
    assert!(app.selected_album().is_none());
}

#[test]
fn sidebar_cursor_stays_within_listed_albums() {
    let mut app = App::new("ana.perez@example.com", 12).with_sidebar_albums(2);
    let generation = app.begin_fetch();
    let mut rng = StdRng::seed_from_u64(7);
    app.install_catalog(generation, Ok(catalog()), &mut rng);
    app.toggle_focus();

    assert_eq!(app.sidebar_albums(), ["Caravana", "Descartable"]);
    app.next();
    assert_eq!(app.selected_album(), Some("Descartable"));
    app.next();
    assert_eq!(app.selected_album(), Some("Caravana"));
}

#[test]
fn filter_mode_is_unavailable_while_loading() {
    let mut app = ready_app();
    app.begin_fetch();
    app.enter_filter_mode();
    assert!(!app.filter_mode);
}
