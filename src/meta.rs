//! Normalized output shapes handed to the host application. Mapping into
//! these is a pure function of (raw record, settings).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataOrigin {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credit {
    pub name: String,
    pub role: String,
}

/// Search-result shape: one catalog entry as shown in a result list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComicSeries {
    pub id: String,
    pub name: String,
    pub aliases: BTreeSet<String>,
    pub description: String,
    pub image_url: String,
    pub publisher: Option<String>,
    pub start_year: Option<i64>,
    pub count_of_issues: Option<i64>,
    pub count_of_volumes: Option<i64>,
    pub format: Option<String>,
}

/// Full normalized metadata for a series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesMetadata {
    pub source: Option<MetadataOrigin>,
    pub series_id: Option<String>,
    pub issue_id: Option<String>,
    pub series: Option<String>,
    pub series_aliases: BTreeSet<String>,
    pub volume: Option<i64>,
    pub count_of_issues: Option<i64>,
    pub count_of_volumes: Option<i64>,
    pub year: Option<i64>,
    pub publisher: Option<String>,
    pub description: Option<String>,
    pub genres: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub credits: Vec<Credit>,
    /// "Yes" when the series type is Manga or Doujinshi.
    pub manga: Option<String>,
    pub maturity_rating: Option<String>,
    pub cover_image: Option<String>,
    pub web_link: Option<String>,
}
