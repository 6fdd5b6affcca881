//! Wire shapes for the MangaUpdates API. Records travel through search and
//! the cache as raw `serde_json::Value`s and are only deserialized into these
//! types at mapping time, so cached payloads stay lossless.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MuGenre {
    pub genre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MuImageUrl {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MuImage {
    pub url: MuImageUrl,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MuAssociatedTitle {
    pub title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MuCategory {
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub votes: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MuAuthor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<i64>,
    #[serde(rename = "type")]
    pub role: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MuPublisher {
    pub publisher_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher_id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Full series record. Search responses carry a subset of these fields; the
/// series-detail endpoint fills in the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MuSeries {
    pub series_id: i64,
    pub title: String,
    pub url: String,
    pub associated: Vec<MuAssociatedTitle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image: MuImage,
    #[serde(rename = "type")]
    pub series_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bayesian_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_votes: Option<i64>,
    pub genres: Vec<MuGenre>,
    pub categories: Vec<MuCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_chapter: Option<i64>,
    /// Free-text publication status, e.g. "10 Volumes (Complete)".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub licensed: Option<bool>,
    pub completed: bool,
    pub authors: Vec<MuAuthor>,
    pub publishers: Vec<MuPublisher>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MuSearchResult {
    /// Kept raw so the cache stores exactly what the API returned.
    pub record: serde_json::Value,
    pub hit_title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MuSearchResponse {
    pub total_hits: i64,
    pub page: i64,
    pub per_page: i64,
    pub results: Vec<MuSearchResult>,
}
