use thiserror::Error;

/// Failures while fetching or recognizing an image.
///
/// Cloneable so a coalesced download can hand the same failure to every
/// waiting caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtworkError {
    #[error("image download failed: {0}")]
    Download(String),

    #[error("image endpoint returned HTTP status {0}")]
    Status(u16),

    #[error("payload is not a recognized image format")]
    UnsupportedFormat,
}
