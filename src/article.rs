// Article records and display formatting.
// `Article` mirrors what the news API returns: every field may be absent.
// `ArticleView` is the display-ready form, with defaults filled in once
// when it is built so the presentation layer never has to.

use crate::favorites::FavoriteRecord;
use chrono::{DateTime, NaiveDateTime};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Description length shown in listings.
pub const DESCRIPTION_MAX_CHARS: usize = 150;

const NOT_AVAILABLE: &str = "N/A";

/// Where an article came from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// An article as returned by the news API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default)]
    pub source: Option<ArticleSource>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub url_to_image: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl Article {
    pub fn source_name(&self) -> Option<&str> {
        self.source.as_ref().and_then(|s| s.name.as_deref())
    }

    /// The article URL, if present and non-blank
    pub fn url(&self) -> Option<&str> {
        non_empty(self.url.as_deref())
    }
}

impl From<&FavoriteRecord> for Article {
    fn from(record: &FavoriteRecord) -> Self {
        Self {
            source: Some(ArticleSource {
                id: None,
                name: Some(record.source_name.clone()),
            }),
            author: None,
            title: Some(record.title.clone()),
            description: Some(record.description.clone()),
            url: Some(record.url.clone()),
            url_to_image: None,
            published_at: Some(record.published.clone()),
            content: None,
        }
    }
}

/// Display-ready article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleView {
    pub index: usize,
    pub title: String,
    pub source: String,
    pub author: String,
    pub description: String,
    pub url: String,
    pub published: String,
    pub content: String,
}

impl ArticleView {
    pub fn new(article: &Article, index: usize) -> Self {
        Self {
            index,
            title: or_default(article.title.as_deref(), "No Title"),
            source: or_default(article.source_name(), "Unknown Source"),
            author: or_default(article.author.as_deref(), "Unknown"),
            description: truncate_text(article.description.as_deref(), DESCRIPTION_MAX_CHARS),
            url: article.url().unwrap_or_default().to_string(),
            published: format_date(article.published_at.as_deref()),
            content: or_default(article.content.as_deref(), "No content available"),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn or_default(value: Option<&str>, default: &str) -> String {
    non_empty(value).unwrap_or(default).to_string()
}

/// Format an ISO-8601 timestamp as `YYYY-MM-DD HH:MM`.
///
/// Unparsable input is returned unchanged; missing input becomes "N/A".
pub fn format_date(date: Option<&str>) -> String {
    let Some(date) = non_empty(date) else {
        return NOT_AVAILABLE.to_string();
    };

    const FORMAT: &str = "%Y-%m-%d %H:%M";

    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return dt.format(FORMAT).to_string();
    }

    // Timestamps without an offset, e.g. `2024-01-15T10:30:00`.
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(date, fmt).ok())
        .map_or_else(|| date.to_string(), |dt| dt.format(FORMAT).to_string())
}

/// Truncate to at most `max_chars` characters, ending in "..." when cut.
pub fn truncate_text(text: Option<&str>, max_chars: usize) -> String {
    let Some(text) = non_empty(text) else {
        return NOT_AVAILABLE.to_string();
    };

    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let mut truncated: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    truncated.push_str("...");
    truncated
}

/// A run of text, highlighted or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub highlighted: bool,
}

impl Fragment {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            highlighted: false,
        }
    }
}

/// Split `text` around case-insensitive matches of `keywords`.
///
/// Matches come back upper-cased, as highlighted fragments.
pub fn highlight_keywords<S: AsRef<str>>(text: &str, keywords: &[S]) -> Vec<Fragment> {
    let Some(pattern) = keyword_pattern(keywords) else {
        return vec![Fragment::plain(text)];
    };

    let mut fragments = Vec::new();
    let mut last = 0;

    for found in pattern.find_iter(text) {
        if found.start() > last {
            fragments.push(Fragment::plain(&text[last..found.start()]));
        }
        fragments.push(Fragment {
            text: found.as_str().to_uppercase(),
            highlighted: true,
        });
        last = found.end();
    }

    if last < text.len() || fragments.is_empty() {
        fragments.push(Fragment::plain(&text[last..]));
    }

    fragments
}

fn keyword_pattern<S: AsRef<str>>(keywords: &[S]) -> Option<Regex> {
    let alternatives: Vec<String> = keywords
        .iter()
        .map(|k| k.as_ref().trim())
        .filter(|k| !k.is_empty())
        .map(regex::escape)
        .collect();

    if alternatives.is_empty() {
        return None;
    }

    RegexBuilder::new(&alternatives.join("|"))
        .case_insensitive(true)
        .build()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_article() -> Article {
        Article {
            source: Some(ArticleSource {
                id: Some("test-source".to_string()),
                name: Some("Test Source".to_string()),
            }),
            author: Some("John Doe".to_string()),
            title: Some("Test Article".to_string()),
            description: Some("Test description".to_string()),
            url: Some("https://test.com/article".to_string()),
            url_to_image: None,
            published_at: Some("2024-01-15T10:30:00Z".to_string()),
            content: Some("Test content".to_string()),
        }
    }

    #[test]
    fn test_deserialize_api_article() {
        let json = r#"{
            "source": {"id": null, "name": "Reuters"},
            "author": null,
            "title": "Markets rally",
            "description": "Stocks rose.",
            "url": "https://example.com/markets",
            "urlToImage": "https://example.com/img.png",
            "publishedAt": "2024-03-01T08:00:00Z",
            "content": null
        }"#;

        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.source_name(), Some("Reuters"));
        assert_eq!(article.author, None);
        assert_eq!(article.url_to_image.as_deref(), Some("https://example.com/img.png"));
        assert_eq!(article.published_at.as_deref(), Some("2024-03-01T08:00:00Z"));
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let article: Article = serde_json::from_str("{}").unwrap();
        assert_eq!(article, Article::default());
        assert_eq!(article.url(), None);
    }

    #[test]
    fn test_view_complete_article() {
        let view = ArticleView::new(&full_article(), 1);

        assert_eq!(view.index, 1);
        assert_eq!(view.title, "Test Article");
        assert_eq!(view.source, "Test Source");
        assert_eq!(view.author, "John Doe");
        assert_eq!(view.url, "https://test.com/article");
        assert_eq!(view.published, "2024-01-15 10:30");
        assert_eq!(view.content, "Test content");
    }

    #[test]
    fn test_view_applies_defaults() {
        let view = ArticleView::new(&Article::default(), 7);

        assert_eq!(view.title, "No Title");
        assert_eq!(view.source, "Unknown Source");
        assert_eq!(view.author, "Unknown");
        assert_eq!(view.description, "N/A");
        assert_eq!(view.url, "");
        assert_eq!(view.published, "N/A");
        assert_eq!(view.content, "No content available");
    }

    #[test]
    fn test_view_truncates_description() {
        let article = Article {
            description: Some("A".repeat(200)),
            ..Article::default()
        };
        let view = ArticleView::new(&article, 1);

        assert_eq!(view.description.chars().count(), DESCRIPTION_MAX_CHARS);
        assert!(view.description.ends_with("..."));
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(Some("2024-01-15T10:30:00Z")), "2024-01-15 10:30");
        assert_eq!(format_date(Some("2024-01-15T10:30:00+02:00")), "2024-01-15 10:30");
        assert_eq!(format_date(Some("2024-01-15T10:30:00.123456")), "2024-01-15 10:30");
        assert_eq!(format_date(Some("invalid_date")), "invalid_date");
        assert_eq!(format_date(Some("")), "N/A");
        assert_eq!(format_date(None), "N/A");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text(Some("Short text"), 100), "Short text");
        assert_eq!(truncate_text(Some("  padded  "), 100), "padded");
        assert_eq!(truncate_text(None, 100), "N/A");
        assert_eq!(truncate_text(Some(""), 100), "N/A");

        let long = truncate_text(Some(&"A".repeat(150)), 100);
        assert_eq!(long.len(), 100);
        assert!(long.ends_with("..."));
    }

    #[test]
    fn test_truncate_counts_characters() {
        let text = "é".repeat(20);
        let truncated = truncate_text(Some(&text), 10);
        assert_eq!(truncated, format!("{}...", "é".repeat(7)));
    }

    #[test]
    fn test_highlight_keywords() {
        let fragments = highlight_keywords("Rust is fast, rust is safe", &["rust"]);

        assert_eq!(
            fragments,
            vec![
                Fragment { text: "RUST".into(), highlighted: true },
                Fragment { text: " is fast, ".into(), highlighted: false },
                Fragment { text: "RUST".into(), highlighted: true },
                Fragment { text: " is safe".into(), highlighted: false },
            ]
        );
    }

    #[test]
    fn test_highlight_escapes_keywords() {
        let fragments = highlight_keywords("C++ vs C", &["c++"]);
        assert_eq!(fragments[0], Fragment { text: "C++".into(), highlighted: true });
        assert_eq!(fragments[1], Fragment { text: " vs C".into(), highlighted: false });
    }

    #[test]
    fn test_highlight_without_keywords() {
        let none: [&str; 0] = [];
        assert_eq!(highlight_keywords("Headline", &none), vec![Fragment::plain("Headline")]);
        assert_eq!(highlight_keywords("Headline", &["", "  "]), vec![Fragment::plain("Headline")]);
        assert_eq!(highlight_keywords("Headline", &["absent"]), vec![Fragment::plain("Headline")]);
    }

    #[test]
    fn test_article_from_favorite() {
        let record = FavoriteRecord {
            title: "Saved".to_string(),
            source_name: "BBC".to_string(),
            url: "https://bbc.co.uk/a".to_string(),
            description: "Desc".to_string(),
            published: "2024-01-15T10:30:00Z".to_string(),
            saved_at: chrono::Utc::now(),
        };

        let view = ArticleView::new(&Article::from(&record), 1);
        assert_eq!(view.title, "Saved");
        assert_eq!(view.source, "BBC");
        assert_eq!(view.url, "https://bbc.co.uk/a");
        assert_eq!(view.published, "2024-01-15 10:30");
        assert_eq!(view.author, "Unknown");
    }
}
