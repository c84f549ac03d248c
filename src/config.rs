// Runtime configuration, read from the environment.
// `main` loads a `.env` file first, so every variable below can live there.

use crate::error::{Error, Result};
use crate::favorites::FAVORITES_FILE;
use crate::paginator::DEFAULT_PAGE_SIZE;
use std::path::PathBuf;

/// Application name, used for the data directory
pub const APP_NAME: &str = "news-dashboard";

/// Default news API endpoint
pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";

/// Value shipped in the sample `.env`; never a real key.
pub const PLACEHOLDER_API_KEY: &str = "your_api_key_here";

pub const ENV_API_KEY: &str = "NEWS_API_KEY";
pub const ENV_BASE_URL: &str = "NEWS_API_URL";
pub const ENV_COUNTRY: &str = "NEWS_COUNTRY";
pub const ENV_LANGUAGE: &str = "NEWS_LANGUAGE";
pub const ENV_PAGE_SIZE: &str = "NEWS_PAGE_SIZE";
pub const ENV_FAVORITES_PATH: &str = "NEWS_FAVORITES_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub country: String,
    pub language: String,
    /// Articles per displayed page
    pub page_size: usize,
    pub favorites_path: PathBuf,
}

impl Config {
    /// Configuration with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            country: "us".to_string(),
            language: "en".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            favorites_path: default_favorites_path(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = var(ENV_API_KEY)
            .filter(|key| key != PLACEHOLDER_API_KEY)
            .ok_or(Error::MissingApiKey)?;

        let mut config = Self::new(api_key);

        if let Some(url) = var(ENV_BASE_URL) {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(country) = var(ENV_COUNTRY) {
            config.country = country.to_lowercase();
        }
        if let Some(language) = var(ENV_LANGUAGE) {
            config.language = language.to_lowercase();
        }
        if let Some(size) = var(ENV_PAGE_SIZE) {
            config.page_size = size
                .parse()
                .ok()
                .filter(|&n: &usize| n > 0)
                .ok_or_else(|| {
                    Error::Config(format!("{ENV_PAGE_SIZE} must be a positive integer, got '{size}'"))
                })?;
        }
        if let Some(path) = var(ENV_FAVORITES_PATH) {
            config.favorites_path = PathBuf::from(path);
        }

        Ok(config)
    }
}

/// `<data dir>/news-dashboard/favorites.json`, or `favorites.json` in the
/// working directory when there is no data directory.
pub fn default_favorites_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_NAME).join(FAVORITES_FILE))
        .unwrap_or_else(|| PathBuf::from(FAVORITES_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[(ENV_API_KEY, "abc123")])).unwrap();

        assert_eq!(config.api_key, "abc123");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.country, "us");
        assert_eq!(config.language, "en");
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert!(config.favorites_path.ends_with(FAVORITES_FILE));
    }

    #[test]
    fn test_missing_key() {
        let result = Config::from_lookup(lookup(&[]));
        assert!(matches!(result, Err(Error::MissingApiKey)));

        let result = Config::from_lookup(lookup(&[(ENV_API_KEY, "   ")]));
        assert!(matches!(result, Err(Error::MissingApiKey)));
    }

    #[test]
    fn test_placeholder_key_rejected() {
        let result = Config::from_lookup(lookup(&[(ENV_API_KEY, PLACEHOLDER_API_KEY)]));
        assert!(matches!(result, Err(Error::MissingApiKey)));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            (ENV_API_KEY, "abc123"),
            (ENV_BASE_URL, "http://localhost:9000/v2/"),
            (ENV_COUNTRY, "GB"),
            (ENV_LANGUAGE, "FR"),
            (ENV_PAGE_SIZE, "25"),
            (ENV_FAVORITES_PATH, "/tmp/favs.json"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:9000/v2");
        assert_eq!(config.country, "gb");
        assert_eq!(config.language, "fr");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.favorites_path, PathBuf::from("/tmp/favs.json"));
    }

    #[test]
    fn test_invalid_page_size() {
        let result = Config::from_lookup(lookup(&[(ENV_API_KEY, "abc"), (ENV_PAGE_SIZE, "ten")]));
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains(ENV_PAGE_SIZE)));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let result = Config::from_lookup(lookup(&[(ENV_API_KEY, "abc"), (ENV_PAGE_SIZE, "0")]));
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("positive")));
    }
}
