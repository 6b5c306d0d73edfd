//! Front-end configuration with baked-in defaults.
//!
//! # Design
//! - Every field has a default so an empty override document is valid.
//! - `validate` rejects values that would make the site unusable rather than
//!   silently clamping them.
//! - Relative catalog URLs resolve against the site root (`base_path`), never
//!   the current route, so detail pages fetch the same files as the gallery.

use crate::catalog::CatalogKind;
use crate::error::ConfigError;
use crate::fetch::{DEFAULT_CACHE_EXPIRY_MS, DEFAULT_REQUEST_TIMEOUT_MS, FetchSettings};
use serde::Deserialize;
use std::str::FromStr;
use tracing::Level;
use url::Url;

/// Default sidebar search debounce.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u32 = 200;
/// Default hover delay before a card preview starts.
pub const DEFAULT_PREVIEW_DELAY_MS: u32 = 1_000;
/// Default path the app is served under.
pub const DEFAULT_BASE_PATH: &str = "/";

/// Source URLs for each catalog.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CatalogUrls {
    /// Movie catalog.
    pub movies: String,
    /// Season catalog.
    pub seasons: String,
    /// Coming-soon catalog.
    pub coming_soon: String,
}

impl Default for CatalogUrls {
    fn default() -> Self {
        Self {
            movies: "./data/movie_data.json".to_string(),
            seasons: "./data/episodes_data.json".to_string(),
            coming_soon: "./data/comingsoon_data.json".to_string(),
        }
    }
}

impl CatalogUrls {
    /// URL for `kind`.
    #[must_use]
    pub fn url(&self, kind: CatalogKind) -> &str {
        match kind {
            CatalogKind::Movies => &self.movies,
            CatalogKind::Seasons => &self.seasons,
            CatalogKind::ComingSoon => &self.coming_soon,
        }
    }

    /// Rewrite every URL through `resolve`, typically to make page-relative
    /// paths absolute.
    #[must_use]
    pub fn map(self, resolve: impl Fn(&str) -> String) -> Self {
        Self {
            movies: resolve(&self.movies),
            seasons: resolve(&self.seasons),
            coming_soon: resolve(&self.coming_soon),
        }
    }
}

/// Runtime configuration for the catalog front-end.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ShelfConfig {
    /// Catalog sources.
    pub catalogs: CatalogUrls,
    /// Abort timeout per request.
    pub request_timeout_ms: u64,
    /// Fetch cache freshness window; also the sweep interval.
    pub cache_expiry_ms: u64,
    /// Sidebar search debounce.
    pub search_debounce_ms: u32,
    /// Hover delay before a card preview plays.
    pub preview_delay_ms: u32,
    /// Minimum level forwarded to the console.
    pub log_level: String,
    /// Path the app is served under; relative catalog URLs resolve here.
    pub base_path: String,
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            catalogs: CatalogUrls::default(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            cache_expiry_ms: DEFAULT_CACHE_EXPIRY_MS,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            preview_delay_ms: DEFAULT_PREVIEW_DELAY_MS,
            log_level: "info".to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
        }
    }
}

impl ShelfConfig {
    /// Parse and validate an override document. Absent fields keep their
    /// defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::InvalidField`] for values that fail validation.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|err| ConfigError::Parse {
            detail: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidField`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, url) in [
            ("catalogs.movies", &self.catalogs.movies),
            ("catalogs.seasons", &self.catalogs.seasons),
            ("catalogs.coming_soon", &self.catalogs.coming_soon),
        ] {
            if url.trim().is_empty() {
                return Err(ConfigError::InvalidField {
                    field,
                    reason: "empty_url",
                });
            }
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidField {
                field: "request_timeout_ms",
                reason: "zero_duration",
            });
        }
        if self.cache_expiry_ms == 0 {
            return Err(ConfigError::InvalidField {
                field: "cache_expiry_ms",
                reason: "zero_duration",
            });
        }
        if !self.base_path.starts_with('/') {
            return Err(ConfigError::InvalidField {
                field: "base_path",
                reason: "not_absolute",
            });
        }
        self.log_level()?;
        Ok(())
    }

    /// Make every catalog URL absolute for a page currently at `page_href`.
    #[must_use]
    pub fn resolve_catalogs(self, page_href: &str) -> Self {
        let base_path = self.base_path.clone();
        Self {
            catalogs: self
                .catalogs
                .map(|url| resolve_catalog_url(url, page_href, &base_path)),
            ..self
        }
    }

    /// Parsed console log level.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidField`] for an unknown level name.
    pub fn log_level(&self) -> Result<Level, ConfigError> {
        Level::from_str(self.log_level.trim()).map_err(|_| ConfigError::InvalidField {
            field: "log_level",
            reason: "unknown_level",
        })
    }

    /// Fetch cache tunables.
    #[must_use]
    pub const fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            expiry_ms: self.cache_expiry_ms,
            timeout_ms: self.request_timeout_ms,
        }
    }
}

/// Resolve `url` against the app root of the page at `page_href`.
///
/// The root is the page origin joined with `base_path`, so a page deep in the
/// router (`/movie/3`) resolves `./data/x.json` to `/data/x.json`. Absolute
/// URLs pass through; anything unparsable is returned unchanged.
#[must_use]
pub fn resolve_catalog_url(url: &str, page_href: &str, base_path: &str) -> String {
    let root = if base_path.ends_with('/') {
        base_path.to_string()
    } else {
        format!("{base_path}/")
    };
    Url::parse(page_href)
        .and_then(|page| page.join(&root))
        .and_then(|root| root.join(url))
        .map_or_else(|_| url.to_string(), String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = ShelfConfig::from_json("{}").unwrap();
        assert_eq!(config, ShelfConfig::default());
        assert_eq!(config.fetch_settings(), FetchSettings::default());
        assert_eq!(config.catalogs.url(CatalogKind::Seasons), "./data/episodes_data.json");
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config =
            ShelfConfig::from_json(r#"{"catalogs":{"movies":"/m.json"},"log_level":"debug"}"#)
                .unwrap();
        assert_eq!(config.catalogs.movies, "/m.json");
        assert_eq!(config.catalogs.coming_soon, "./data/comingsoon_data.json");
        assert_eq!(config.log_level().unwrap(), Level::DEBUG);
    }

    #[test]
    fn rejects_zero_durations_and_empty_urls() {
        assert_eq!(
            ShelfConfig::from_json(r#"{"request_timeout_ms":0}"#),
            Err(ConfigError::InvalidField {
                field: "request_timeout_ms",
                reason: "zero_duration",
            })
        );
        assert_eq!(
            ShelfConfig::from_json(r#"{"catalogs":{"seasons":" "}}"#),
            Err(ConfigError::InvalidField {
                field: "catalogs.seasons",
                reason: "empty_url",
            })
        );
    }

    #[test]
    fn rejects_unknown_log_level_and_bad_json() {
        assert!(matches!(
            ShelfConfig::from_json(r#"{"log_level":"loud"}"#),
            Err(ConfigError::InvalidField {
                field: "log_level",
                ..
            })
        ));
        assert!(matches!(
            ShelfConfig::from_json("{"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn relative_urls_resolve_against_app_root_not_route() {
        assert_eq!(
            resolve_catalog_url("./data/movie_data.json", "http://h/movie/3", "/"),
            "http://h/data/movie_data.json"
        );
        assert_eq!(
            resolve_catalog_url("data/episodes_data.json", "http://h/season/0?x=1#top", "/"),
            "http://h/data/episodes_data.json"
        );
        assert_eq!(
            resolve_catalog_url("./data/movie_data.json", "https://h/shelf/movie/3", "/shelf"),
            "https://h/shelf/data/movie_data.json"
        );
        assert_eq!(
            resolve_catalog_url("/m.json", "http://h/shelf/movie/3", "/shelf/"),
            "http://h/m.json"
        );
        assert_eq!(
            resolve_catalog_url("https://cdn/m.json", "http://h/movie/3", "/"),
            "https://cdn/m.json"
        );
        assert_eq!(resolve_catalog_url("./m.json", "not a url", "/"), "./m.json");
    }

    #[test]
    fn detail_and_gallery_pages_resolve_to_the_same_catalogs() {
        let from_gallery = ShelfConfig::default().resolve_catalogs("http://h/");
        let from_detail = ShelfConfig::default().resolve_catalogs("http://h/movie/3");
        assert_eq!(from_gallery.catalogs, from_detail.catalogs);
        assert_eq!(from_detail.catalogs.seasons, "http://h/data/episodes_data.json");
    }

    #[test]
    fn rejects_relative_base_path() {
        assert_eq!(
            ShelfConfig::from_json(r#"{"base_path":"shelf"}"#),
            Err(ConfigError::InvalidField {
                field: "base_path",
                reason: "not_absolute",
            })
        );
    }

    #[test]
    fn map_rewrites_every_url() {
        let urls = CatalogUrls::default().map(|url| format!("https://site{}", &url[1..]));
        assert_eq!(urls.movies, "https://site/data/movie_data.json");
    }
}
