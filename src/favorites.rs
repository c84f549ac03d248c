// Favorites management
// - A deduplicated, insertion-ordered list of saved articles.
// - The whole list is written to a single JSON file after every mutation.
// - Loading is per record: a record that cannot be read is dropped, the rest
//   are kept.

use crate::article::Article;
use crate::storage;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Default favorites file name
pub const FAVORITES_FILE: &str = "favorites.json";

const DEFAULT_TITLE: &str = "No Title";
const DEFAULT_SOURCE: &str = "Unknown";

/// A saved article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredRecord")]
pub struct FavoriteRecord {
    pub title: String,
    #[serde(rename = "source")]
    pub source_name: String,
    pub url: String,
    pub description: String,
    pub published: String,
    pub saved_at: DateTime<Utc>,
}

/// On-disk shape as older files may hold it: any field missing or null,
/// timestamps with or without an offset.
#[derive(Deserialize)]
struct StoredRecord {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    published: Option<String>,
    #[serde(default)]
    saved_at: Option<String>,
}

impl From<StoredRecord> for FavoriteRecord {
    fn from(stored: StoredRecord) -> Self {
        let text = |value: Option<String>, default: &str| {
            value
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            title: text(stored.title, DEFAULT_TITLE),
            source_name: text(stored.source, DEFAULT_SOURCE),
            url: stored.url.unwrap_or_default(),
            description: stored.description.unwrap_or_default(),
            published: stored.published.unwrap_or_default(),
            saved_at: stored
                .saved_at
                .as_deref()
                .and_then(parse_saved_at)
                .unwrap_or_else(Utc::now),
        }
    }
}

/// RFC 3339, or a naive ISO timestamp taken as UTC.
fn parse_saved_at(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

impl FavoriteRecord {
    /// Build a record from an article, `None` if it has no URL.
    pub fn from_article(article: &Article) -> Option<Self> {
        let url = article.url()?;

        let text = |value: &Option<String>, default: &str| {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(default)
                .to_string()
        };

        Some(Self {
            title: text(&article.title, DEFAULT_TITLE),
            source_name: article
                .source_name()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(DEFAULT_SOURCE)
                .to_string(),
            url: url.to_string(),
            description: text(&article.description, ""),
            published: text(&article.published_at, ""),
            saved_at: Utc::now(),
        })
    }
}

/// Outcome of a mutating call on [`FavoritesStore`].
///
/// Memory and disk only diverge in the `MemoryOnly` case, until the next
/// successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Nothing was modified.
    Unchanged,
    /// Modified and written to disk.
    Persisted,
    /// Modified in memory, but writing the file failed.
    MemoryOnly,
}

impl Change {
    /// Whether the in-memory collection was modified.
    pub fn applied(self) -> bool {
        !matches!(self, Change::Unchanged)
    }

    pub fn is_persisted(self) -> bool {
        matches!(self, Change::Persisted)
    }
}

/// File-backed favorites
#[derive(Debug)]
pub struct FavoritesStore {
    path: PathBuf,
    favorites: Vec<FavoriteRecord>,
}

impl FavoritesStore {
    /// Load favorites from `path`.
    ///
    /// A missing, unreadable or corrupt file yields an empty store.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let favorites = match storage::load_from::<Vec<serde_json::Value>>(&path) {
            Ok(Some(entries)) => dedup_loaded(read_records(entries)),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Ignoring unusable favorites file: {e}");
                Vec::new()
            }
        };

        debug!(count = favorites.len(), path = %path.display(), "Loaded favorites.");
        Self { path, favorites }
    }

    /// Save an article, unless it has no URL or is already saved.
    pub fn add(&mut self, article: &Article) -> Change {
        let Some(record) = FavoriteRecord::from_article(article) else {
            debug!("Not saving article without URL.");
            return Change::Unchanged;
        };

        if self.contains(&record.url) {
            return Change::Unchanged;
        }

        self.favorites.push(record);
        self.persist()
    }

    /// Remove every favorite with this URL.
    pub fn remove(&mut self, url: &str) -> Change {
        let before = self.favorites.len();
        self.favorites.retain(|fav| fav.url != url);

        if self.favorites.len() == before {
            return Change::Unchanged;
        }

        self.persist()
    }

    /// Remove all favorites. Always rewrites the file.
    pub fn clear(&mut self) -> Change {
        self.favorites.clear();
        self.persist()
    }

    /// All favorites, oldest first
    pub fn list(&self) -> Vec<FavoriteRecord> {
        self.favorites.clone()
    }

    pub fn get(&self, url: &str) -> Option<&FavoriteRecord> {
        self.favorites.iter().find(|fav| fav.url == url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.get(url).is_some()
    }

    pub fn count(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Change {
        match storage::save_to(&self.path, &self.favorites) {
            Ok(()) => {
                debug!(count = self.favorites.len(), "Saved favorites.");
                Change::Persisted
            }
            Err(e) => {
                error!("Failed to save favorites: {e}");
                Change::MemoryOnly
            }
        }
    }
}

fn read_records(entries: Vec<serde_json::Value>) -> Vec<FavoriteRecord> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index, "Dropping unreadable favorite: {e}");
                None
            }
        })
        .collect()
}

/// Drop records that would break URL uniqueness, keeping the first.
fn dedup_loaded(records: Vec<FavoriteRecord>) -> Vec<FavoriteRecord> {
    let mut seen = HashSet::new();

    records
        .into_iter()
        .filter(|record| {
            if record.url.trim().is_empty() {
                warn!(title = %record.title, "Dropping favorite without URL.");
                return false;
            }
            if !seen.insert(record.url.clone()) {
                warn!(url = %record.url, "Dropping duplicate favorite.");
                return false;
            }
            true
        })
        .collect()
}
