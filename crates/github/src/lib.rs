//! GitHub search client.
//!
//! Wraps `GET /search/issues` for the two queries PullTray needs: the open
//! pull requests and the open issues authored by one user. Results are
//! returned as opaque [`Item`]s and handed to the UI untouched.

pub mod client;
pub mod types;

pub use client::{Client, Error};
pub use types::{Item, SearchKind, SearchResponse};
