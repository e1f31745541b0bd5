//! Catalog module: fetching the artist's tracks and deriving views from them.
//!
//! `fetch` talks to the lookup/search service, `normalize` turns its raw
//! results into `TrackRecord`s, `projections` and `search` are pure functions
//! over the normalized list.

mod fetch;
mod model;
mod normalize;
mod projections;
mod search;

pub use fetch::*;
pub use model::*;
pub use normalize::normalize;
pub use projections::*;
pub use search::filter;
