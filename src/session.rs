//! Local account and sign-in state.
//!
//! A single account lives in `account.toml` under the data directory, with
//! the password stored as a salted SHA-256 hash. `session.toml` records which
//! email is signed in; the player refuses to start without one.

mod store;
mod validate;

pub use store::*;
pub use validate::*;

#[cfg(test)]
mod tests;
