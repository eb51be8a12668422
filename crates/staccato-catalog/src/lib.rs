// SPDX-License-Identifier: GPL-3.0-or-later

//! Catalog search client for a client-credential music API.
//!
//! This crate wraps the two-step authenticate-then-search protocol: a
//! short-lived bearer credential is obtained via a client-credentials
//! exchange and used for exactly one artist search. The credential is never
//! cached or persisted; each search chain fetches a fresh one.

pub mod client;
pub mod error;
pub mod models;

pub use client::{CatalogClient, CatalogClientBuilder, CatalogSearcher};
pub use error::{CatalogError, Result};
pub use models::{ArtistSummary, Credential, SearchResult};
