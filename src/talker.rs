use std::cmp::min;
use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, info, instrument};
use url::Url;

use crate::cache::{CachedSeries, SeriesCache};
use crate::error::{TalkerError, TalkerResult};
use crate::fetch::Fetcher;
use crate::helpers;
use crate::http::{HttpTransport, ReqwestTransport};
use crate::meta::{ComicSeries, Credit, MetadataOrigin, SeriesMetadata};
use crate::models::{MuPublisher, MuSearchResponse, MuSeries};
use crate::settings::{DEFAULT_API_URL, MangaUpdatesSettings};

pub const PROVIDER_ID: &str = "mangaupdates";
pub const PROVIDER_NAME: &str = "MangaUpdates";

const RESULTS_PER_PAGE: i64 = 100;
/// Never consider more than 5 pages of results, whatever total_hits claims.
const MAX_SEARCH_RESULTS: i64 = 500;

/// Called after each fetched search page with (results seen, capped total).
pub type ProgressCallback<'a> = &'a (dyn Fn(usize, usize) + Send + Sync);

/// The MangaUpdates talker: searches the catalog, caches raw records and maps
/// them into the normalized metadata shapes.
pub struct MangaUpdates {
    settings: MangaUpdatesSettings,
    transport: Arc<dyn HttpTransport>,
    fetcher: Fetcher,
    cache: Arc<dyn SeriesCache>,
}

impl MangaUpdates {
    pub fn new(settings: MangaUpdatesSettings, cache: Arc<dyn SeriesCache>) -> Self {
        Self::with_transport(settings, Arc::new(ReqwestTransport::default()), cache)
    }

    pub fn with_transport(
        settings: MangaUpdatesSettings,
        transport: Arc<dyn HttpTransport>,
        cache: Arc<dyn SeriesCache>,
    ) -> Self {
        Self {
            settings,
            transport: transport.clone(),
            fetcher: Fetcher::new(transport),
            cache,
        }
    }

    fn endpoint(&self, path: &str) -> TalkerResult<String> {
        let mut base = self.settings.api_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let url = Url::parse(&base)
            .and_then(|u| u.join(path))
            .map_err(|err| TalkerError::Network(format!("invalid api url {base:?}: {err}")))?;
        Ok(url.to_string())
    }

    /// Health check: reported as a (message, validity) pair, never raised.
    pub async fn check_status(&self, url_override: Option<&str>) -> (String, bool) {
        let url = match url_override.filter(|u| !u.trim().is_empty()) {
            Some(url) => {
                let mut url = url.trim().to_string();
                if !url.ends_with('/') {
                    url.push('/');
                }
                url
            }
            None => DEFAULT_API_URL.to_string(),
        };

        let Ok(response) = self.transport.get(&url).await else {
            return ("Failed to connect to the URL!".to_string(), false);
        };
        let ok = serde_json::from_str::<Value>(&response.body)
            .ok()
            .and_then(|v| v.get("status").and_then(|s| s.as_str().map(String::from)))
            .is_some_and(|s| s == "success");
        if ok {
            ("The URL is valid".to_string(), true)
        } else {
            ("The URL is INVALID!".to_string(), false)
        }
    }

    #[instrument(skip_all, fields(query = %series_name, literal = literal))]
    pub async fn search_for_series(
        &self,
        series_name: &str,
        progress: Option<ProgressCallback<'_>>,
        refresh_cache: bool,
        literal: bool,
        series_match_threshold: u32,
    ) -> TalkerResult<Vec<ComicSeries>> {
        let search_name = helpers::sanitize_title(series_name, literal);
        info!(query = %search_name, "searching MangaUpdates");

        // We might have done this same search recently; literal searches
        // always go online.
        if !refresh_cache && !literal {
            let cached = self.cache.search_results(PROVIDER_ID, series_name);
            if !cached.is_empty() {
                debug!(count = cached.len(), "using cached search results");
                let mut records = Vec::with_capacity(cached.len());
                for entry in cached {
                    let record: Value = serde_json::from_slice(&entry.data).map_err(|err| {
                        TalkerError::Data(format!("cached record was not json: {err}"))
                    })?;
                    records.push(record);
                }
                let records = self.apply_filters(records);
                return self.format_search_results(&records);
            }
        }

        let url = self.endpoint("series/search")?;
        let mut params = json!({
            "search": search_name,
            "page": 1,
            "perpage": RESULTS_PER_PAGE,
        });

        let mut response: MuSearchResponse =
            serde_json::from_value(self.fetcher.post_json(&url, &params).await?)
                .map_err(|err| TalkerError::Data(format!("unexpected search response: {err}")))?;

        let total = min(response.total_hits, MAX_SEARCH_RESULTS).max(0) as usize;
        let mut search_results: Vec<Value> = Vec::new();
        search_results.extend(response.results.iter().map(|r| r.record.clone()));
        search_results.truncate(total);

        match progress {
            Some(callback) => callback(search_results.len(), total),
            None => debug!(
                found = search_results.len(),
                total_hits = response.total_hits,
                "first page of results"
            ),
        }

        let mut page = 1;
        while search_results.len() < total {
            if !literal {
                // Stop paging once any title on the current page falls below
                // the match threshold; the page itself is kept.
                let stop_searching = response.results.iter().any(|result| {
                    let title = result
                        .record
                        .get("title")
                        .and_then(|t| t.as_str())
                        .unwrap_or("");
                    !helpers::titles_match(&search_name, title, series_match_threshold)
                });
                if stop_searching {
                    break;
                }
            }

            debug!(
                seen = search_results.len(),
                total, "getting another page of results"
            );
            page += 1;
            params["page"] = json!(page);
            response = serde_json::from_value(self.fetcher.post_json(&url, &params).await?)
                .map_err(|err| TalkerError::Data(format!("unexpected search response: {err}")))?;
            if response.results.is_empty() {
                break;
            }
            search_results.extend(response.results.iter().map(|r| r.record.clone()));
            search_results.truncate(total);

            if let Some(callback) = progress {
                callback(search_results.len(), total);
            }
        }

        // Cache the raw records before any filtering, keyed by the original
        // query text. Literal searches stay out of the cache entirely.
        if !literal {
            let mut entries = Vec::with_capacity(search_results.len());
            for record in &search_results {
                entries.push(CachedSeries {
                    id: record
                        .get("series_id")
                        .and_then(|id| id.as_i64())
                        .unwrap_or_default(),
                    data: serde_json::to_vec(record)
                        .map_err(|err| TalkerError::Data(format!("serialize record: {err}")))?,
                });
            }
            self.cache
                .store_search_results(PROVIDER_ID, series_name, entries, false);
        }

        let search_results = self.apply_filters(search_results);
        self.format_search_results(&search_results)
    }

    /// Fetch one series mapped to the search-result shape.
    pub async fn fetch_series(&self, series_id: i64) -> TalkerResult<ComicSeries> {
        let series = self.fetch_series_record(series_id).await?;
        Ok(self.format_series(&series))
    }

    /// Fetch one series mapped to full normalized metadata.
    pub async fn fetch_series_metadata(&self, series_id: i64) -> TalkerResult<SeriesMetadata> {
        let series = self.fetch_series_record(series_id).await?;
        Ok(self.map_series_metadata(&series))
    }

    /// Hosts sometimes send only an issue id, which for this provider is
    /// really the series id.
    pub async fn fetch_comic_data(
        &self,
        issue_id: Option<i64>,
        series_id: Option<i64>,
    ) -> TalkerResult<SeriesMetadata> {
        match series_id.or(issue_id) {
            Some(id) => self.fetch_series_metadata(id).await,
            None => Ok(SeriesMetadata::default()),
        }
    }

    /// MangaUpdates has no issue-level data; a single empty placeholder.
    pub async fn fetch_issues_in_series(
        &self,
        _series_id: i64,
    ) -> TalkerResult<Vec<SeriesMetadata>> {
        Ok(vec![SeriesMetadata::default()])
    }

    pub async fn fetch_issues_by_series_issue_num_and_year(
        &self,
        series_ids: &[i64],
        _issue_number: &str,
        _year: Option<i64>,
    ) -> TalkerResult<Vec<SeriesMetadata>> {
        let mut series_list = Vec::with_capacity(series_ids.len());
        for series_id in series_ids {
            series_list.push(self.fetch_series_metadata(*series_id).await?);
        }
        Ok(series_list)
    }

    pub async fn fetch_publisher(&self, publisher_id: i64) -> TalkerResult<MuPublisher> {
        let url = self.endpoint(&format!("publishers/{publisher_id}"))?;
        serde_json::from_value(self.fetcher.get(&url).await?)
            .map_err(|err| TalkerError::Data(format!("unexpected publisher response: {err}")))
    }

    async fn fetch_series_record(&self, series_id: i64) -> TalkerResult<MuSeries> {
        let record = self.fetch_series_raw(series_id).await?;
        serde_json::from_value(record)
            .map_err(|err| TalkerError::Data(format!("unexpected series record: {err}")))
    }

    async fn fetch_series_raw(&self, series_id: i64) -> TalkerResult<Value> {
        // Only an authoritative entry (a previous full fetch) short-circuits
        // the network; search fragments are incomplete.
        if let Some((entry, authoritative)) = self.cache.series_info(PROVIDER_ID, series_id)
            && authoritative
        {
            debug!(series_id, "using cached series record");
            return serde_json::from_slice(&entry.data)
                .map_err(|err| TalkerError::Data(format!("cached record was not json: {err}")));
        }

        let url = self.endpoint(&format!("series/{series_id}"))?;
        let record = self.fetcher.get(&url).await?;

        let data = serde_json::to_vec(&record)
            .map_err(|err| TalkerError::Data(format!("serialize record: {err}")))?;
        self.cache
            .store_series_info(PROVIDER_ID, CachedSeries { id: series_id, data }, true);
        Ok(record)
    }

    fn apply_filters(&self, mut records: Vec<Value>) -> Vec<Value> {
        if self.settings.filter_nsfw {
            records.retain(|record| !has_genre(record, &["Adult", "Hentai"]));
        }
        if self.settings.filter_dojin {
            records.retain(|record| !has_genre(record, &["Doujinshi"]));
        }
        records
    }

    fn format_search_results(&self, records: &[Value]) -> TalkerResult<Vec<ComicSeries>> {
        let mut formatted = Vec::with_capacity(records.len());
        for record in records {
            let series: MuSeries = serde_json::from_value(record.clone())
                .map_err(|err| TalkerError::Data(format!("unexpected series record: {err}")))?;
            formatted.push(self.format_series(&series));
        }
        Ok(formatted)
    }

    fn format_series(&self, series: &MuSeries) -> ComicSeries {
        let aliases = series
            .associated
            .iter()
            .map(|alias| alias.title.clone())
            .collect();

        // latest_chapter is only a confirmed issue count once the series is
        // marked complete.
        let count_of_issues = if series.completed {
            series.latest_chapter
        } else {
            None
        };

        ComicSeries {
            id: series.series_id.to_string(),
            name: series.title.clone(),
            aliases,
            description: series.description.clone().unwrap_or_default(),
            image_url: series.image.url.original.clone().unwrap_or_default(),
            publisher: self.publisher_string(&series.publishers),
            start_year: series.year.as_deref().and_then(helpers::xlate_int),
            count_of_issues,
            count_of_volumes: None,
            format: None,
        }
    }

    fn publisher_string(&self, publishers: &[MuPublisher]) -> Option<String> {
        if publishers.is_empty() {
            return None;
        }
        let preferred = if self.settings.use_original_publisher {
            "Original"
        } else {
            "English"
        };
        let names: Vec<&str> = publishers
            .iter()
            .filter(|publisher| publisher.kind == preferred)
            .map(|publisher| publisher.publisher_name.as_str())
            .collect();
        Some(names.join(", "))
    }

    fn map_series_metadata(&self, series: &MuSeries) -> SeriesMetadata {
        let mut md = SeriesMetadata {
            source: Some(MetadataOrigin {
                id: PROVIDER_ID.to_string(),
                name: PROVIDER_NAME.to_string(),
            }),
            series_id: Some(series.series_id.to_string()),
            issue_id: Some(series.series_id.to_string()),
            series: Some(series.title.clone()),
            ..Default::default()
        };

        md.cover_image = series.image.url.original.clone();
        for alias in &series.associated {
            md.series_aliases.insert(alias.title.clone());
        }

        md.publisher = self.publisher_string(&series.publishers);

        for person in &series.authors {
            md.credits.push(Credit {
                name: person.name.clone(),
                role: person.role.clone(),
            });
        }

        if matches!(series.series_type.as_str(), "Manga" | "Doujinshi") {
            md.manga = Some("Yes".to_string());
        }

        for genre in &series.genres {
            md.genres.insert(genre.genre.clone());
        }
        if self.settings.add_nsfw_rating
            && series
                .genres
                .iter()
                .any(|genre| genre.genre == "Adult" || genre.genre == "Hentai")
        {
            md.maturity_rating = Some("Adult".to_string());
        }

        for category in &series.categories {
            md.tags.insert(category.category.clone());
        }

        md.count_of_volumes = series.status.as_deref().and_then(helpers::parse_volume_count);

        // Marked as complete, so latest_chapter is a confirmed chapter count.
        if series.completed || self.settings.use_ongoing_issue_count {
            md.count_of_issues = series.latest_chapter;
        }

        md.year = series.year.as_deref().and_then(helpers::xlate_int);
        md.description = series.description.clone();
        md.web_link = (!series.url.is_empty()).then(|| series.url.clone());

        if self.settings.use_series_start_as_volume && md.year.is_some() {
            md.volume = md.year;
        }

        md
    }
}

fn has_genre(record: &Value, names: &[&str]) -> bool {
    record
        .get("genres")
        .and_then(|genres| genres.as_array())
        .is_some_and(|genres| {
            genres.iter().any(|genre| {
                genre
                    .get("genre")
                    .and_then(|name| name.as_str())
                    .is_some_and(|name| names.contains(&name))
            })
        })
}
