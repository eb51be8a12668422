//! In-process artwork cache keyed by image URL.
//!
//! Downloads an image once, recognizes its format, and serves every later
//! request for the same URL from memory. The cache is bounded, and
//! concurrent requests for the same unseen URL share a single download.

mod cache;
mod error;

pub use cache::{Artwork, ArtworkCache, ImageFormat};
pub use error::ArtworkError;
