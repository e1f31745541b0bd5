//! Application model types: `App`, `CatalogStatus`, `Pane` and `Section`.

use std::collections::BTreeMap;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::catalog::{self, FetchError, TrackRecord};
use crate::session::greeting_alias;

/// Where the catalog load currently stands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogStatus {
    Loading,
    Ready,
    /// Some endpoint answered, but nothing matched the artist.
    Empty,
    /// Every endpoint failed.
    Failed(String),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Pane {
    Albums,
    #[default]
    Browse,
}

/// Browse sections shown while no search is active.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Section {
    #[default]
    Recent,
    Recommended,
    Trending,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Recent, Section::Recommended, Section::Trending];

    pub fn title(self, alias: &str) -> String {
        match self {
            Section::Recent => "Recent releases".to_string(),
            Section::Recommended => format!("Made for {alias}"),
            Section::Trending => "Trending".to_string(),
        }
    }
}

/// The three browse lists, computed once per catalog load.
#[derive(Clone, Debug, Default)]
pub struct Sections {
    pub recent: Vec<TrackRecord>,
    pub recommended: Vec<TrackRecord>,
    pub trending: Vec<TrackRecord>,
}

impl Sections {
    fn get(&self, section: Section) -> &[TrackRecord] {
        match section {
            Section::Recent => &self.recent,
            Section::Recommended => &self.recommended,
            Section::Trending => &self.trending,
        }
    }
}

/// The main application model.
pub struct App {
    pub user_email: String,
    pub alias: String,

    pub status: CatalogStatus,
    /// Full normalized list; the playback controller holds the same list.
    pub tracks: Vec<TrackRecord>,
    pub albums: Vec<String>,
    /// How many of `albums` the sidebar lists.
    sidebar_albums: usize,
    pub album_art: BTreeMap<String, String>,
    pub sections: Sections,
    section_size: usize,
    /// Bumped whenever a fetch starts; results from older fetches are dropped.
    generation: u64,

    pub focus: Pane,
    pub section: Section,
    /// Cursor within `visible_tracks()`.
    pub selected: usize,
    /// Cursor within `albums`.
    pub album_selected: usize,

    pub filter_mode: bool,
    pub filter_query: String,
    results: Vec<TrackRecord>,

    pub metadata_window: bool,
}

impl App {
    pub fn new(user_email: &str, section_size: usize) -> Self {
        Self {
            user_email: user_email.to_string(),
            alias: greeting_alias(user_email),
            status: CatalogStatus::Loading,
            tracks: Vec::new(),
            albums: Vec::new(),
            sidebar_albums: usize::MAX,
            album_art: BTreeMap::new(),
            sections: Sections::default(),
            section_size,
            generation: 0,
            focus: Pane::Browse,
            section: Section::Recent,
            selected: 0,
            album_selected: 0,
            filter_mode: false,
            filter_query: String::new(),
            results: Vec::new(),
            metadata_window: false,
        }
    }

    pub fn with_sidebar_albums(mut self, limit: usize) -> Self {
        self.sidebar_albums = limit;
        self
    }

    /// The albums listed in the sidebar.
    pub fn sidebar_albums(&self) -> &[String] {
        let n = self.sidebar_albums.min(self.albums.len());
        &self.albums[..n]
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Mark a new fetch as started and return its generation.
    pub fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        self.status = CatalogStatus::Loading;
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.status == CatalogStatus::Loading
    }

    /// Install a finished fetch. Returns `false` for a result from an older
    /// generation, which is ignored.
    ///
    /// All projections are computed here, before anything becomes visible.
    pub fn install_catalog<R: Rng + ?Sized>(
        &mut self,
        generation: u64,
        result: Result<Vec<TrackRecord>, FetchError>,
        rng: &mut R,
    ) -> bool {
        if generation != self.generation {
            debug!(
                "app: ignoring catalog for generation {generation} (current {})",
                self.generation
            );
            return false;
        }

        match result {
            Ok(tracks) => {
                let albums = catalog::album_names(&tracks);
                let album_art = catalog::album_art(&tracks);
                let sections = Sections {
                    recent: catalog::recent_releases(&tracks, self.section_size),
                    recommended: catalog::recommended(&tracks, self.section_size, rng),
                    trending: catalog::trending(&tracks, self.section_size, rng),
                };

                info!(
                    "app: catalog ready ({} tracks, {} albums)",
                    tracks.len(),
                    albums.len()
                );
                self.status = if tracks.is_empty() {
                    CatalogStatus::Empty
                } else {
                    CatalogStatus::Ready
                };
                self.tracks = tracks;
                self.albums = albums;
                self.album_art = album_art;
                self.sections = sections;
            }
            Err(e) => {
                warn!("app: catalog failed: {e}");
                self.status = CatalogStatus::Failed(e.to_string());
                self.tracks.clear();
                self.albums.clear();
                self.album_art.clear();
                self.sections = Sections::default();
            }
        }

        self.selected = 0;
        self.album_selected = 0;
        self.refresh_results();
        true
    }

    /// A non-blank query switches the browse pane to search results.
    pub fn is_searching(&self) -> bool {
        !self.filter_query.trim().is_empty()
    }

    pub fn visible_tracks(&self) -> &[TrackRecord] {
        if self.is_searching() {
            &self.results
        } else {
            self.sections.get(self.section)
        }
    }

    pub fn selected_track(&self) -> Option<&TrackRecord> {
        self.visible_tracks().get(self.selected)
    }

    pub fn selected_album(&self) -> Option<&str> {
        self.sidebar_albums()
            .get(self.album_selected)
            .map(String::as_str)
    }

    /// Art for an album, already at thumbnail size.
    pub fn album_art_url(&self, album: &str) -> Option<&str> {
        self.album_art.get(album).map(String::as_str)
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Pane::Albums => Pane::Browse,
            Pane::Browse => Pane::Albums,
        };
    }

    pub fn set_section(&mut self, section: Section) {
        if self.section != section {
            self.section = section;
            self.selected = 0;
        }
    }

    /// Move the cursor of the focused pane down, wrapping to the top.
    pub fn next(&mut self) {
        match self.focus {
            Pane::Albums => {
                self.album_selected = wrap_next(self.album_selected, self.sidebar_albums().len())
            }
            Pane::Browse => {
                self.selected = wrap_next(self.selected, self.visible_tracks().len())
            }
        }
    }

    /// Move the cursor of the focused pane up, wrapping to the bottom.
    pub fn prev(&mut self) {
        match self.focus {
            Pane::Albums => {
                self.album_selected = wrap_prev(self.album_selected, self.sidebar_albums().len())
            }
            Pane::Browse => {
                self.selected = wrap_prev(self.selected, self.visible_tracks().len())
            }
        }
    }

    /// Enter filter mode; keystrokes go to the query. Ignored while the
    /// catalog is loading.
    pub fn enter_filter_mode(&mut self) {
        if self.is_loading() {
            return;
        }
        self.filter_mode = true;
        self.focus = Pane::Browse;
    }

    /// Leave filter mode, keeping the query (and the results) in place.
    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }

    /// Clear the query and go back to the browse sections.
    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.filter_mode = false;
        self.refresh_results();
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.refresh_results();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.refresh_results();
    }

    fn refresh_results(&mut self) {
        self.results = catalog::filter(&self.tracks, &self.filter_query);
        self.ensure_selected_visible();
    }

    fn ensure_selected_visible(&mut self) {
        let len = self.visible_tracks().len();
        if self.selected >= len {
            self.selected = 0;
        }
    }
}

fn wrap_next(current: usize, len: usize) -> usize {
    if len == 0 { 0 } else { (current + 1) % len }
}

fn wrap_prev(current: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else if current == 0 || current >= len {
        len - 1
    } else {
        current - 1
    }
}
