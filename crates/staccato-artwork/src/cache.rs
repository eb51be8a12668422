use bytes::Bytes;
use moka::future::Cache;
use reqwest::Client;
use tracing::{debug, trace};

use crate::error::ArtworkError;

/// Image formats the cache recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
    Bmp,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::WebP => "image/webp",
            Self::Bmp => "image/bmp",
        }
    }

    /// Recognize a format from the payload's magic numbers.
    fn sniff(data: &[u8]) -> Option<Self> {
        match data {
            [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(Self::Png),
            [0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
            [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some(Self::Gif),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(Self::WebP),
            [b'B', b'M', ..] => Some(Self::Bmp),
            _ => None,
        }
    }
}

/// A downloaded, recognized image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artwork {
    pub data: Bytes,
    pub format: ImageFormat,
}

/// Bounded in-memory image cache keyed by URL.
///
/// At most one entry per URL. Entries live until evicted by capacity
/// pressure; there is no TTL. Failed downloads are never cached, so a later
/// request for the same URL retries.
pub struct ArtworkCache {
    client: Client,
    cache: Cache<String, Artwork>,
}

impl ArtworkCache {
    /// Create a cache holding up to `capacity` images.
    pub fn new(capacity: u64) -> Self {
        Self::with_client(Client::new(), capacity)
    }

    /// Create a cache using a preconfigured HTTP client (timeouts, proxy).
    pub fn with_client(client: Client, capacity: u64) -> Self {
        Self {
            client,
            cache: Cache::new(capacity),
        }
    }

    /// Return the artwork for `url`, downloading it on first use.
    ///
    /// A cache hit never touches the network. Concurrent callers asking for
    /// the same unseen URL share one download; each receives the same bytes
    /// or the same failure.
    pub async fn get_or_download(&self, url: &str) -> Result<Artwork, ArtworkError> {
        self.cache
            .try_get_with(url.to_string(), self.download(url))
            .await
            .map_err(|error| (*error).clone())
    }

    async fn download(&self, url: &str) -> Result<Artwork, ArtworkError> {
        trace!(target: "artwork", "GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| ArtworkError::Download(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ArtworkError::Status(status.as_u16()));
        }

        let data = response
            .bytes()
            .await
            .map_err(|error| ArtworkError::Download(error.to_string()))?;

        let format = ImageFormat::sniff(&data).ok_or(ArtworkError::UnsupportedFormat)?;
        debug!(
            target: "artwork",
            "cached {} ({} bytes, {})",
            url,
            data.len(),
            format.mime_type()
        );

        Ok(Artwork { data, format })
    }

    /// Whether `url` is already cached.
    pub fn contains(&self, url: &str) -> bool {
        self.cache.get(url).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniff_recognizes_common_formats() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
        assert_eq!(ImageFormat::sniff(&png), Some(ImageFormat::Png));

        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00];
        assert_eq!(ImageFormat::sniff(&jpeg), Some(ImageFormat::Jpeg));

        assert_eq!(ImageFormat::sniff(b"GIF89a...."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::sniff(b"GIF87a...."), Some(ImageFormat::Gif));
        assert_eq!(
            ImageFormat::sniff(b"RIFF\x00\x00\x00\x00WEBPVP8 "),
            Some(ImageFormat::WebP)
        );
        assert_eq!(ImageFormat::sniff(b"BM\x00\x00"), Some(ImageFormat::Bmp));
    }

    #[test]
    fn sniff_rejects_non_image_payloads() {
        assert_eq!(ImageFormat::sniff(b"<html>not an image</html>"), None);
        assert_eq!(ImageFormat::sniff(b""), None);
        // A prefix shorter than the magic number is not a match.
        assert_eq!(ImageFormat::sniff(&[0x89, b'P']), None);
    }

    #[test]
    fn mime_types_are_stable() {
        assert_eq!(ImageFormat::Png.mime_type(), "image/png");
        assert_eq!(ImageFormat::Jpeg.mime_type(), "image/jpeg");
    }
}
