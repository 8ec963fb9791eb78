//! Common types used throughout Philomena Copier
//!
//! Wire shapes of the Philomena JSON API: search results coming from the
//! source booru and the upload body sent to the target booru.

use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Search Types
// ============================================================================

/// One source-side image to copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Source-instance identifier, used for progress output only
    pub id: u64,
    /// Free-form description
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Original-source attribution URL
    #[serde(default, deserialize_with = "null_as_empty")]
    pub source_url: String,
    /// Tag names
    #[serde(default)]
    pub tags: Vec<String>,
    /// URL the target booru fetches the image bytes from
    pub view_url: String,
}

impl ImageRecord {
    /// Tags joined the way the upload form expects them
    pub fn tag_input(&self) -> String {
        self.tags.join(", ")
    }
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    /// Images in the server's sort order
    pub images: Vec<ImageRecord>,
    /// Total number of images matching the query across all pages
    pub total: u64,
}

impl SearchPage {
    /// Check if this page has no images
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Number of images on this page
    pub fn len(&self) -> usize {
        self.images.len()
    }
}

// ============================================================================
// Upload Types
// ============================================================================

/// Metadata part of an upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadImage {
    pub description: String,
    pub tag_input: String,
    pub source_url: String,
}

/// Body of `POST /api/v1/json/images`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadBody {
    pub image: UploadImage,
    /// Remote location the target fetches the image from
    pub url: String,
}

impl From<&ImageRecord> for UploadBody {
    fn from(record: &ImageRecord) -> Self {
        Self {
            image: UploadImage {
                description: record.description.clone(),
                tag_input: record.tag_input(),
                source_url: record.source_url.clone(),
            },
            url: record.view_url.clone(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
