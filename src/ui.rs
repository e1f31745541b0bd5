//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use chrono::Datelike;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::{App, CatalogStatus, Pane, Section};
use crate::catalog::{LARGE_ARTWORK_SIZE, TrackRecord};
use crate::config::{ControlsSettings, TimeField, TrackDisplayField, UiSettings};
use crate::playback::{PlaybackState, Transport};

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("tab".to_string(), "albums/browse".to_string());
    map.insert("1/2/3".to_string(), "section".to_string());
    map.insert("enter".to_string(), "play selected".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("h/l".to_string(), "prev/next song".to_string());
    // H/L is filled dynamically from config.
    map.insert("+/-".to_string(), "volume".to_string());
    map.insert("m".to_string(), "mute".to_string());
    map.insert("/".to_string(), "search".to_string());
    map.insert("r".to_string(), "reload".to_string());
    map.insert("K".to_string(), "details".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    let order = [
        "j/k", "tab", "1/2/3", "enter", "space/p", "h/l", "H/L", "+/-", "m", "/", "r", "K", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn seconds(s: f64) -> Duration {
    if s.is_finite() && s > 0.0 {
        Duration::from_secs_f64(s)
    } else {
        Duration::ZERO
    }
}

/// Build the "now playing" track text according to `ui` settings.
fn now_playing_track_text(track: &TrackRecord, ui: &UiSettings) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in &ui.now_playing_track_fields {
        let value = match f {
            TrackDisplayField::Title => Some(track.title.clone()),
            TrackDisplayField::Artist => Some(track.artist_name.clone()),
            TrackDisplayField::Album => Some(track.album_name.clone()),
            TrackDisplayField::Year => track.release_date.map(|d| d.year().to_string()),
        };
        if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
            parts.push(v);
        }
    }

    if parts.is_empty() {
        track.title.clone()
    } else {
        parts.join(&ui.now_playing_track_separator)
    }
}

/// Build the now-playing time text (elapsed/total/remaining) per `UiSettings`.
fn now_playing_time_text(
    elapsed: Duration,
    total: Option<Duration>,
    ui: &UiSettings,
) -> Option<String> {
    if ui.now_playing_time_fields.is_empty() {
        return None;
    }

    let mut parts: Vec<String> = Vec::new();
    for f in &ui.now_playing_time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_mmss(elapsed)),
            TimeField::Total => {
                if let Some(t) = total {
                    parts.push(format_mmss(t));
                }
            }
            TimeField::Remaining => {
                if let Some(t) = total {
                    let rem = t.saturating_sub(elapsed);
                    parts.push(format!("-{}", format_mmss(rem)));
                }
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.now_playing_time_separator))
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn padded_block(title: String) -> Block<'static> {
    Block::default().borders(Borders::ALL).title(title).padding(Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    })
}

/// Window of `height` rows around `selected`, as `(start, end, selected_in_window)`.
fn visible_window(total: usize, selected: usize, height: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    playback: &PlaybackState,
    now_playing: Option<&TrackRecord>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(4),
        ])
        .split(frame.area());

    draw_header(frame, app, ui_settings, chunks[0]);
    draw_search(frame, app, chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(chunks[2]);
    draw_albums(frame, app, body[0]);
    draw_browse(frame, app, now_playing, body[1]);

    if app.metadata_window {
        draw_details(frame, app, body[1]);
    }

    draw_now_playing(frame, playback, now_playing, ui_settings, chunks[3]);

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(padded_block(" controls ".to_string()))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}

fn draw_header(frame: &mut Frame, app: &App, ui_settings: &UiSettings, area: Rect) {
    let line = Line::from(vec![
        Span::raw(format!("Hi, {}", app.alias)).bold(),
        Span::raw("  "),
        Span::raw(ui_settings.header_text.as_str()),
        Span::raw("  "),
        Span::raw(app.user_email.as_str()).italic(),
    ]);
    let header = Paragraph::new(line).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" teaser ")
            .title_alignment(Alignment::Center),
    );
    frame.render_widget(header, area);
}

fn draw_search(frame: &mut Frame, app: &App, area: Rect) {
    let text = if app.filter_mode {
        format!("/{}_", app.filter_query)
    } else if app.is_searching() {
        format!("/{}  (esc clears)", app.filter_query)
    } else {
        "press / to search songs and albums".to_string()
    };
    let mut search = Paragraph::new(text).block(padded_block(" search ".to_string()));
    if !app.filter_mode && !app.is_searching() {
        search = search.dim();
    }
    frame.render_widget(search, area);
}

fn draw_albums(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Pane::Albums;
    let title = format!(" albums ({}) ", app.albums.len());
    let mut block = Block::default().borders(Borders::ALL).title(title);
    if focused {
        block = block.border_style(Style::default().add_modifier(Modifier::BOLD));
    }

    let albums = app.sidebar_albums();
    let height = area.height.saturating_sub(2) as usize;
    let selected = app.album_selected.min(albums.len().saturating_sub(1));
    let (start, end, sel) = visible_window(albums.len(), selected, height);

    let items: Vec<ListItem> = albums[start..end]
        .iter()
        .map(|a| ListItem::new(a.as_str()))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !albums.is_empty() && focused {
        state.select(Some(sel));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn browse_title(app: &App) -> String {
    if app.is_searching() {
        return format!(
            " results for \"{}\" ({}) ",
            app.filter_query.trim(),
            app.visible_tracks().len()
        );
    }
    let tabs: Vec<String> = Section::ALL
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let label = s.title(&app.alias);
            if *s == app.section {
                format!("[{}] {}", i + 1, label.to_uppercase())
            } else {
                format!("[{}] {}", i + 1, label)
            }
        })
        .collect();
    format!(" {} ", tabs.join("  "))
}

/// Message shown instead of the list, if any.
fn browse_message(app: &App) -> Option<String> {
    match &app.status {
        CatalogStatus::Loading => Some("Loading songs…".to_string()),
        CatalogStatus::Failed(reason) => Some(format!(
            "Could not load the catalog ({reason}).\nPress r to retry."
        )),
        CatalogStatus::Empty => Some("No songs found for this artist.".to_string()),
        CatalogStatus::Ready if app.visible_tracks().is_empty() => {
            Some("No songs or albums match your search.".to_string())
        }
        CatalogStatus::Ready => None,
    }
}

fn draw_browse(frame: &mut Frame, app: &App, now_playing: Option<&TrackRecord>, area: Rect) {
    let focused = app.focus == Pane::Browse;
    let mut block = Block::default().borders(Borders::ALL).title(browse_title(app));
    if focused {
        block = block.border_style(Style::default().add_modifier(Modifier::BOLD));
    }

    if let Some(msg) = browse_message(app) {
        let p = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(p, area);
        return;
    }

    let tracks = app.visible_tracks();
    let height = area.height.saturating_sub(2) as usize;
    let (start, end, sel) = visible_window(tracks.len(), app.selected, height);
    let playing_id = now_playing.map(|t| t.id);

    let items: Vec<ListItem> = tracks[start..end]
        .iter()
        .map(|t| {
            let marker = if Some(t.id) == playing_id { "♪ " } else { "  " };
            let text = format!("{marker}{} · {}", t.title, t.album_name);
            if t.has_preview() {
                ListItem::new(text)
            } else {
                ListItem::new(format!("{text}  (no preview)")).dim()
            }
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !tracks.is_empty() && focused {
        state.select(Some(sel));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_details(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_sized(72, 10, area);
    frame.render_widget(Clear, popup_area);

    let meta = match app.focus {
        Pane::Albums => album_details(app),
        Pane::Browse => track_details(app),
    };
    let p = Paragraph::new(meta)
        .block(padded_block(" details (K closes) ".to_string()))
        .wrap(Wrap { trim: true });
    frame.render_widget(p, popup_area);
}

fn album_details(app: &App) -> String {
    let Some(album) = app.selected_album() else {
        return "No album selected".to_string();
    };
    let songs = app.tracks.iter().filter(|t| t.album_name == album);
    let (total, playable) = songs.fold((0, 0), |(n, p), t| (n + 1, p + usize::from(t.has_preview())));
    format!(
        "Album: {album}\nSongs: {total} ({playable} with preview)\nCover: {}",
        app.album_art_url(album).unwrap_or("-"),
    )
}

fn track_details(app: &App) -> String {
    match app.selected_track() {
        Some(t) => format!(
            "Title: {}\nArtist: {}\nAlbum: {}\nReleased: {}\nPreview: {}\nArtwork: {}",
            t.title,
            t.artist_name,
            t.album_name,
            t.release_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string()),
            if t.has_preview() { "yes" } else { "no" },
            t.artwork_at(LARGE_ARTWORK_SIZE),
        ),
        None => "No track selected".to_string(),
    }
}

fn draw_now_playing(
    frame: &mut Frame,
    playback: &PlaybackState,
    track: Option<&TrackRecord>,
    ui_settings: &UiSettings,
    area: Rect,
) {
    let block = padded_block(" now playing ".to_string());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let transport = match playback.transport {
        Transport::Idle => "Stopped",
        Transport::Playing => "Playing",
        Transport::Paused => "Paused",
    };
    let volume = if playback.muted {
        "muted".to_string()
    } else {
        format!("vol {:>3.0}%", playback.volume * 100.0)
    };

    let song = track
        .map(|t| now_playing_track_text(t, ui_settings))
        .unwrap_or_else(|| "Pick a song to start listening".to_string());
    let info = Line::from(vec![
        Span::raw(format!("{transport} • ")).bold(),
        Span::raw(song),
        Span::raw(format!(" • {volume}")),
    ]);
    frame.render_widget(Paragraph::new(info), rows[0]);

    let elapsed = seconds(playback.elapsed_seconds);
    let total = (playback.total_seconds > 0.0).then(|| seconds(playback.total_seconds));
    let ratio = match total {
        Some(t) if !t.is_zero() => (elapsed.as_secs_f64() / t.as_secs_f64()).clamp(0.0, 1.0),
        _ => 0.0,
    };
    let label = now_playing_time_text(elapsed, total, ui_settings).unwrap_or_default();
    let gauge = Gauge::default().ratio(ratio).label(label);
    frame.render_widget(gauge, rows[1]);
}
