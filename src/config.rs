//! Settings schema and loader.
//!
//! `schema` holds the `#[serde(default)]` structs for each config section,
//! `load` layers the config file and `TEASER__*` environment variables on top.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
