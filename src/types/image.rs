//! Normalized image records returned to callers and stored in the cache.

use serde::{Deserialize, Serialize};

/// A single image, normalized from whatever the provider returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    pub url: String,
    pub title: String,
    pub description: String,
}

impl ImageRecord {
    /// Build a record, substituting placeholders for a missing or empty
    /// title/description.
    pub fn new(
        id: impl Into<String>,
        url: impl Into<String>,
        title: Option<String>,
        description: Option<String>,
    ) -> Self {
        let id = id.into();
        let title = title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| format!("Image {id}"));
        let description = description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| format!("Description for Image {id}"));
        Self {
            id,
            url: url.into(),
            title,
            description,
        }
    }
}

/// Images in provider ranking order. Serialized verbatim into the cache.
pub type SearchResult = Vec<ImageRecord>;
