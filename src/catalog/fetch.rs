//! Catalog acquisition: a linear walk over lookup/search query variants.
//!
//! The first variant whose raw `results` array is non-empty wins. Failures of
//! a single variant are logged and skipped; only when every variant failed
//! does the caller see an error, so "no results" and "load failed" stay
//! distinguishable.

use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::CatalogSettings;

use super::model::{RawResponse, TrackRecord};
use super::normalize::normalize;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("catalog service answered with HTTP {0}")]
    Status(u16),
    #[error("unreadable catalog response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid catalog url: {0}")]
    InvalidUrl(String),
    #[error("all {attempts} catalog requests failed")]
    Exhausted { attempts: usize },
}

/// Something that can GET a catalog URL and decode the body.
pub trait CatalogTransport {
    fn get(&self, url: &Url) -> Result<RawResponse, FetchError>;
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl CatalogTransport for HttpTransport {
    fn get(&self, url: &Url) -> Result<RawResponse, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        // The service labels its JSON as text/javascript, so decode the text ourselves.
        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// Exact artist-id lookup.
    Lookup,
    /// Free-text search on the artist name.
    Search,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryVariant {
    pub endpoint: Endpoint,
    pub country: Option<String>,
}

/// The ordered list of variants to try: every lookup before every search,
/// one per configured country (or a single country-less one).
pub fn query_variants(settings: &CatalogSettings) -> Vec<QueryVariant> {
    let countries: Vec<Option<String>> = if settings.countries.is_empty() {
        vec![None]
    } else {
        settings.countries.iter().cloned().map(Some).collect()
    };

    [Endpoint::Lookup, Endpoint::Search]
        .into_iter()
        .flat_map(|endpoint| {
            countries.iter().map(move |country| QueryVariant {
                endpoint,
                country: country.clone(),
            })
        })
        .collect()
}

pub fn variant_url(settings: &CatalogSettings, variant: &QueryVariant) -> Result<Url, FetchError> {
    let base = settings.base_url.trim_end_matches('/');
    let limit = settings.limit.to_string();

    let mut params: Vec<(&str, String)> = match variant.endpoint {
        Endpoint::Lookup => vec![
            ("id", settings.artist_id.to_string()),
            ("entity", "song".to_string()),
            ("limit", limit),
        ],
        Endpoint::Search => vec![
            ("term", settings.artist_name.clone()),
            ("entity", "song".to_string()),
            ("attribute", "artistTerm".to_string()),
            ("limit", limit),
        ],
    };
    if let Some(country) = &variant.country {
        params.push(("country", country.clone()));
    }

    let path = match variant.endpoint {
        Endpoint::Lookup => "lookup",
        Endpoint::Search => "search",
    };

    Url::parse_with_params(&format!("{base}/{path}"), &params)
        .map_err(|e| FetchError::InvalidUrl(e.to_string()))
}

/// Fetch and normalize the configured artist's catalog.
///
/// `Ok(vec![])` means at least one request succeeded but nothing matched;
/// `Err(FetchError::Exhausted)` means no request succeeded at all.
pub fn fetch_catalog(
    transport: &impl CatalogTransport,
    settings: &CatalogSettings,
) -> Result<Vec<TrackRecord>, FetchError> {
    let variants = query_variants(settings);
    let mut any_answered = false;

    for variant in &variants {
        let url = match variant_url(settings, variant) {
            Ok(url) => url,
            Err(e) => {
                warn!("catalog: skipping {:?}: {e}", variant);
                continue;
            }
        };

        match transport.get(&url) {
            Ok(response) if response.results.is_empty() => {
                debug!("catalog: {url} returned no results");
                any_answered = true;
            }
            Ok(response) => {
                info!(
                    "catalog: using {url} ({} raw results)",
                    response.results.len()
                );
                return Ok(normalize(response.results, &settings.artist_name));
            }
            Err(e) => warn!("catalog: {url} failed: {e}"),
        }
    }

    if any_answered {
        Ok(Vec::new())
    } else {
        Err(FetchError::Exhausted {
            attempts: variants.len(),
        })
    }
}

/// A finished background fetch.
#[derive(Debug)]
pub struct CatalogMsg {
    pub generation: u64,
    pub result: Result<Vec<TrackRecord>, FetchError>,
}

/// Run `fetch_catalog` over HTTP on a worker thread and report on `tx`.
///
/// Nothing waits on the handle: if the receiver is gone by the time the
/// fetch completes, the result is dropped.
pub fn spawn_fetch(
    settings: CatalogSettings,
    generation: u64,
    tx: Sender<CatalogMsg>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let result = HttpTransport::new(Duration::from_secs(settings.timeout_secs))
            .and_then(|transport| fetch_catalog(&transport, &settings));
        let _ = tx.send(CatalogMsg { generation, result });
    })
}
