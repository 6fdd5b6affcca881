use anyhow::Result;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "https://api.mangaupdates.com/v1/";

/// Host-facing configuration surface. All fields have defaults so a bare
/// `[Default::default()]` talker works out of the box.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MangaUpdatesSettings {
    /// Base API URL; override for a mirror or a test server.
    pub api_url: String,
    /// Default the volume number to the series start year.
    pub use_series_start_as_volume: bool,
    /// Accepted for compatibility; search records carry no hit titles so this
    /// has no mapping effect.
    pub use_search_title: bool,
    /// Use latest_chapter as issue count even for ongoing series.
    pub use_ongoing_issue_count: bool,
    /// Prefer "Original"-typed publishers over "English"-typed ones.
    pub use_original_publisher: bool,
    /// Drop search results with an Adult or Hentai genre.
    pub filter_nsfw: bool,
    /// Set maturity_rating to "Adult" for Adult or Hentai genres.
    pub add_nsfw_rating: bool,
    /// Drop search results with a Doujinshi genre.
    pub filter_dojin: bool,
}

impl Default for MangaUpdatesSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            use_series_start_as_volume: false,
            use_search_title: false,
            use_ongoing_issue_count: false,
            use_original_publisher: false,
            filter_nsfw: false,
            add_nsfw_rating: false,
            filter_dojin: true,
        }
    }
}

impl MangaUpdatesSettings {
    /// Load from `mangaupdates.toml` merged with `MU_`-prefixed environment
    /// variables.
    pub fn load() -> Result<Self> {
        let settings = Figment::new()
            .merge(Toml::file("mangaupdates.toml"))
            .merge(Env::prefixed("MU_"))
            .extract()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_filter_dojin_only() {
        let settings = MangaUpdatesSettings::default();
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert!(settings.filter_dojin);
        assert!(!settings.filter_nsfw);
        assert!(!settings.use_ongoing_issue_count);
    }

    #[test]
    fn toml_overrides_defaults() {
        let settings: MangaUpdatesSettings = Figment::new()
            .merge(Toml::string(
                r#"
                api_url = "http://localhost:9000/v1/"
                filter_nsfw = true
                filter_dojin = false
                "#,
            ))
            .extract()
            .unwrap();
        assert_eq!(settings.api_url, "http://localhost:9000/v1/");
        assert!(settings.filter_nsfw);
        assert!(!settings.filter_dojin);
    }
}
