//! Unsplash search API client.
//!
//! See: <https://unsplash.com/documentation#search-photos>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::traits::ImageSearchProvider;
use crate::types::{ImageRecord, SearchQuery, SearchResult};
use crate::{ImgcacheError, Result};

/// Default base URL for the Unsplash API
pub const DEFAULT_BASE_URL: &str = "https://api.unsplash.com";

/// Message used when upstream gives us nothing better.
pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to fetch images";

/// Client for the Unsplash photo search endpoint.
///
/// The access key is optional at construction time so a daemon can start
/// without one; every search then fails with `MisconfiguredCredential`
/// without touching the network.
#[derive(Clone)]
pub struct UnsplashClient {
    access_key: Option<String>,
    http: Client,
    base_url: String,
}

impl UnsplashClient {
    /// Create a client against the public Unsplash API.
    pub fn new(access_key: Option<String>) -> Self {
        Self::with_base_url(access_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(access_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            access_key: access_key.filter(|k| !k.trim().is_empty()),
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Apply a request timeout. Without one, reqwest's transport defaults
    /// apply (no overall deadline).
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ImgcacheError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(self)
    }

    /// Whether an access key is configured.
    pub fn has_credential(&self) -> bool {
        self.access_key.is_some()
    }

    /// Search photos.
    pub async fn search_photos(&self, query: &SearchQuery) -> Result<SearchResult> {
        let access_key = self
            .access_key
            .as_deref()
            .ok_or(ImgcacheError::MisconfiguredCredential)?;

        let url = format!("{}/search/photos", self.base_url);
        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("Client-ID {access_key}"))
            .header("Accept-Version", "v1")
            .query(&[
                ("query", query.text().to_string()),
                ("page", query.page().to_string()),
                ("per_page", query.per_page().to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                debug!(error = %e, "unsplash request failed");
                ImgcacheError::Upstream {
                    status: 500,
                    message: FALLBACK_ERROR_MESSAGE.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            // Error bodies are best-effort; a non-JSON body just means no message.
            let body = response.json::<ErrorBody>().await.ok();
            return Err(upstream_error(status.as_u16(), body));
        }

        let page: SearchResponse = response
            .json()
            .await
            .map_err(|e| ImgcacheError::Http(format!("invalid Unsplash response: {e}")))?;

        Ok(page.results.into_iter().map(Photo::into_record).collect())
    }
}

/// Build the pass-through error for a non-2xx response.
fn upstream_error(status: u16, body: Option<ErrorBody>) -> ImgcacheError {
    let message = body
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());
    ImgcacheError::Upstream { status, message }
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<Photo>,
}

#[derive(Deserialize)]
struct Photo {
    id: String,
    urls: PhotoUrls,
    #[serde(default)]
    alt_description: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Deserialize)]
struct PhotoUrls {
    regular: String,
}

impl Photo {
    fn into_record(self) -> ImageRecord {
        ImageRecord::new(self.id, self.urls.regular, self.alt_description, self.description)
    }
}

/// Unsplash documents `{"errors": [...]}`; some proxies and older
/// endpoints answer `{"error": "..."}`. Accept either.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Vec<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.error
            .filter(|e| !e.is_empty())
            .or_else(|| self.errors.into_iter().next())
    }
}

// ============================================================================
// Provider Trait Implementation
// ============================================================================

#[async_trait]
impl ImageSearchProvider for UnsplashClient {
    fn name(&self) -> &str {
        "unsplash"
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        self.search_photos(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_key_counts_as_missing() {
        assert!(!UnsplashClient::new(Some("   ".into())).has_credential());
        assert!(!UnsplashClient::new(None).has_credential());
        assert!(UnsplashClient::new(Some("key".into())).has_credential());
    }

    #[test]
    fn error_message_prefers_error_field() {
        let body = ErrorBody {
            error: Some("Rate Limited".into()),
            errors: vec!["other".into()],
        };
        assert_eq!(body.into_message().as_deref(), Some("Rate Limited"));
    }

    #[test]
    fn error_message_falls_back_to_errors_list() {
        let body = ErrorBody {
            error: None,
            errors: vec!["OAuth error: The access token is invalid".into()],
        };
        assert_eq!(
            body.into_message().as_deref(),
            Some("OAuth error: The access token is invalid")
        );
    }

    #[test]
    fn upstream_error_without_body_uses_fallback() {
        match upstream_error(502, None) {
            ImgcacheError::Upstream { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, FALLBACK_ERROR_MESSAGE);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn photo_maps_to_record() {
        let photo: Photo = serde_json::from_value(serde_json::json!({
            "id": "p1",
            "urls": { "regular": "https://images.unsplash.com/p1", "thumb": "t" },
            "alt_description": null,
            "description": "sunset",
            "likes": 12
        }))
        .unwrap();
        let record = photo.into_record();
        assert_eq!(record.id, "p1");
        assert_eq!(record.url, "https://images.unsplash.com/p1");
        assert_eq!(record.title, "Image p1");
        assert_eq!(record.description, "sunset");
    }
}
