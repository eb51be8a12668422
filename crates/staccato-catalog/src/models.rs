// SPDX-License-Identifier: GPL-3.0-or-later

use serde::{Deserialize, Serialize};

/// Bearer credential returned by the client-credentials exchange.
///
/// Short-lived; fetched fresh for every search chain and held only in
/// memory. The expiry the API reports alongside it is ignored because the
/// credential is used for a single request and discarded.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Credential {
    /// Opaque bearer token.
    pub access_token: String,
}

impl Credential {
    pub fn is_empty(&self) -> bool {
        self.access_token.is_empty()
    }
}

/// One matched artist from a catalog search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtistSummary {
    /// Display name.
    pub name: String,
    /// Image URLs in API order; may be empty.
    pub image_urls: Vec<String>,
    /// Follower count; always present in a well-formed response.
    pub follower_count: u64,
}

impl ArtistSummary {
    /// Representative thumbnail/hero image, if the artist has any images.
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }
}

/// Ordered artist search result (API response order).
///
/// Replaced wholesale on every successful search; there is no diffing
/// against the previous result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SearchResult {
    pub artists: Vec<ArtistSummary>,
}

impl SearchResult {
    pub fn len(&self) -> usize {
        self.artists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artists.is_empty()
    }
}

// Wire shape of the search payload:
// { "artists": { "items": [ { "name", "images": [{"url"}], "followers": {"total"} } ] } }
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub artists: ArtistPage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtistPage {
    pub items: Vec<ArtistItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtistItem {
    pub name: String,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    // A missing followers object is a malformed response, not a zero.
    pub followers: Followers,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImageRef {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Followers {
    pub total: u64,
}

impl From<SearchResponse> for SearchResult {
    fn from(response: SearchResponse) -> Self {
        Self {
            artists: response
                .artists
                .items
                .into_iter()
                .map(|item| ArtistSummary {
                    name: item.name,
                    image_urls: item.images.into_iter().map(|image| image.url).collect(),
                    follower_count: item.followers.total,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_payload_maps_in_response_order() {
        let payload = r#"{
            "artists": {
                "items": [
                    { "name": "First", "images": [{ "url": "http://img/a.png" }], "followers": { "total": 10 } },
                    { "name": "Second", "images": [], "followers": { "total": 20 } }
                ]
            }
        }"#;

        let response: SearchResponse = serde_json::from_str(payload).unwrap();
        let result = SearchResult::from(response);

        assert_eq!(result.len(), 2);
        assert_eq!(result.artists[0].name, "First");
        assert_eq!(result.artists[0].thumbnail_url(), Some("http://img/a.png"));
        assert_eq!(result.artists[1].name, "Second");
        assert_eq!(result.artists[1].thumbnail_url(), None);
        assert_eq!(result.artists[1].follower_count, 20);
    }

    #[test]
    fn missing_images_array_decodes_as_empty() {
        let payload = r#"{
            "artists": {
                "items": [
                    { "name": "Bare", "followers": { "total": 5 } }
                ]
            }
        }"#;

        let response: SearchResponse = serde_json::from_str(payload).unwrap();
        let result = SearchResult::from(response);
        assert!(result.artists[0].image_urls.is_empty());
    }

    #[test]
    fn missing_followers_is_a_decode_error() {
        let payload = r#"{
            "artists": {
                "items": [
                    { "name": "NoFollowers", "images": [] }
                ]
            }
        }"#;

        assert!(serde_json::from_str::<SearchResponse>(payload).is_err());
    }
}
