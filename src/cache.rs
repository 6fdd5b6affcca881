use std::collections::HashMap;
use std::sync::Mutex;

/// One cached record: the provider-assigned series id plus the raw JSON blob
/// exactly as fetched. Entries are replaced wholesale, never merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedSeries {
    pub id: i64,
    pub data: Vec<u8>,
}

/// Local result cache. Search results are keyed by (source, query text) and
/// series records by (source, series id); the `authoritative` flag marks
/// entries that came from a full series fetch rather than a search fragment.
pub trait SeriesCache: Send + Sync {
    fn search_results(&self, source: &str, query: &str) -> Vec<CachedSeries>;

    fn store_search_results(
        &self,
        source: &str,
        query: &str,
        entries: Vec<CachedSeries>,
        authoritative: bool,
    );

    fn series_info(&self, source: &str, series_id: i64) -> Option<(CachedSeries, bool)>;

    fn store_series_info(&self, source: &str, entry: CachedSeries, authoritative: bool);
}

/// In-process cache backed by hash maps. The mutexes serialize concurrent
/// hosts so a stored entry is never observed half-written.
#[derive(Default)]
pub struct MemoryCache {
    searches: Mutex<HashMap<(String, String), Vec<CachedSeries>>>,
    series: Mutex<HashMap<(String, i64), (CachedSeries, bool)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SeriesCache for MemoryCache {
    fn search_results(&self, source: &str, query: &str) -> Vec<CachedSeries> {
        self.searches
            .lock()
            .unwrap()
            .get(&(source.to_string(), query.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    fn store_search_results(
        &self,
        source: &str,
        query: &str,
        entries: Vec<CachedSeries>,
        _authoritative: bool,
    ) {
        self.searches
            .lock()
            .unwrap()
            .insert((source.to_string(), query.to_string()), entries);
    }

    fn series_info(&self, source: &str, series_id: i64) -> Option<(CachedSeries, bool)> {
        self.series
            .lock()
            .unwrap()
            .get(&(source.to_string(), series_id))
            .cloned()
    }

    fn store_series_info(&self, source: &str, entry: CachedSeries, authoritative: bool) {
        self.series
            .lock()
            .unwrap()
            .insert((source.to_string(), entry.id), (entry, authoritative));
    }
}
