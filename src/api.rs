// API client module: a small blocking HTTP client for the news API
// (newsapi.org v2). Every call is synchronous; the interactive loop shows a
// spinner while one is in flight.

use crate::article::Article;
use crate::config::{Config, PLACEHOLDER_API_KEY};
use crate::error::{Error, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

pub const USER_AGENT: &str = "News-Dashboard/1.0";

/// The API refuses page sizes above this.
pub const MAX_PAGE_SIZE: usize = 100;

const API_KEY_HEADER: &str = "x-api-key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// News categories accepted by the headlines endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Business,
    Entertainment,
    General,
    Health,
    Science,
    Sports,
    Technology,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Business,
        Category::Entertainment,
        Category::General,
        Category::Health,
        Category::Science,
        Category::Sports,
        Category::Technology,
    ];

    /// Value sent on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::General => "general",
            Category::Health => "health",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Technology => "technology",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::Business => "Business",
            Category::Entertainment => "Entertainment",
            Category::General => "General",
            Category::Health => "Health",
            Category::Science => "Science",
            Category::Sports => "Sports",
            Category::Technology => "Technology",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Category::Business => "Business & Finance",
            Category::Entertainment => "Entertainment & Arts",
            Category::General => "General News",
            Category::Health => "Health & Medicine",
            Category::Science => "Science & Technology",
            Category::Sports => "Sports",
            Category::Technology => "Technology & Innovation",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| Error::InvalidCategory(s.to_string()))
    }
}

/// Sort order for `everything` searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    Relevancy,
    Popularity,
    #[default]
    PublishedAt,
}

impl SortBy {
    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Relevancy => "relevancy",
            SortBy::Popularity => "popularity",
            SortBy::PublishedAt => "publishedAt",
        }
    }
}

type Params = Vec<(&'static str, String)>;

/// Parameters for `top-headlines`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlinesQuery {
    pub country: String,
    pub category: Option<Category>,
    pub page: usize,
    pub page_size: usize,
}

impl HeadlinesQuery {
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            category: None,
            page: 1,
            page_size: 20,
        }
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    fn params(&self) -> Params {
        let mut params = vec![
            ("country", self.country.clone()),
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.min(MAX_PAGE_SIZE).to_string()),
        ];
        if let Some(category) = self.category {
            params.push(("category", category.to_string()));
        }
        params
    }
}

/// Parameters for `everything`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub language: String,
    pub sort_by: SortBy,
    pub page: usize,
    pub page_size: usize,
    /// ISO 8601 date, e.g. `2024-01-01`
    pub from: Option<String>,
    pub to: Option<String>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: language.into(),
            sort_by: SortBy::default(),
            page: 1,
            page_size: 20,
            from: None,
            to: None,
        }
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    fn params(&self) -> Result<Params> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(Error::EmptyQuery);
        }

        let mut params = vec![
            ("q", query.to_string()),
            ("language", self.language.clone()),
            ("sortBy", self.sort_by.as_str().to_string()),
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.min(MAX_PAGE_SIZE).to_string()),
        ];
        if let Some(from) = &self.from {
            params.push(("from", from.clone()));
        }
        if let Some(to) = &self.to {
            params.push(("to", to.clone()));
        }
        Ok(params)
    }
}

/// Parameters for `top-headlines/sources`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourcesQuery {
    pub language: String,
    pub category: Option<Category>,
    pub country: Option<String>,
}

impl SourcesQuery {
    fn params(&self) -> Params {
        let mut params = vec![("language", self.language.clone())];
        if let Some(category) = self.category {
            params.push(("category", category.to_string()));
        }
        if let Some(country) = &self.country {
            params.push(("country", country.clone()));
        }
        params
    }
}

fn source_params(sources: &[&str], page: usize, page_size: usize) -> Result<Params> {
    if sources.is_empty() {
        return Err(Error::NoSources);
    }

    Ok(vec![
        ("sources", sources.join(",")),
        ("page", page.to_string()),
        ("pageSize", page_size.min(MAX_PAGE_SIZE).to_string()),
    ])
}

/// Response of the article endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlesResponse {
    #[serde(default)]
    pub total_results: usize,
    #[serde(default)]
    pub articles: Vec<Article>,
}

/// A news source
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Source {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SourcesResponse {
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// Shape of an error body: `{"status": "error", "code": ..., "message": ...}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    status: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Turn a status and body into a typed response or an error.
fn parse_response<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T> {
    match status {
        StatusCode::UNAUTHORIZED => return Err(Error::InvalidApiKey),
        StatusCode::TOO_MANY_REQUESTS => return Err(Error::RateLimited),
        _ => {}
    }

    if let Ok(err) = serde_json::from_str::<ErrorBody>(body) {
        if err.status == "error" {
            return Err(Error::Api {
                code: err.code.unwrap_or_else(|| "unknown".to_string()),
                message: err.message.unwrap_or_else(|| "Unknown error".to_string()),
            });
        }
    }

    if !status.is_success() {
        return Err(Error::Status(status));
    }

    Ok(serde_json::from_str(body)?)
}

/// Cheap structural check: news API keys are 32 characters.
pub fn looks_like_api_key(key: &str) -> bool {
    key.trim().len() >= 32
}

/// Blocking client for the news API. The key is sent on every request.
#[derive(Clone)]
pub struct NewsClient {
    client: Client,
    base_url: String,
}

impl NewsClient {
    pub fn new(config: &Config) -> Result<Self> {
        let key = config.api_key.trim();
        if key.is_empty() || key == PLACEHOLDER_API_KEY {
            return Err(Error::MissingApiKey);
        }

        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(key)
            .map_err(|_| Error::Config("API key contains invalid characters".to_string()))?;
        value.set_sensitive(true);
        headers.insert(API_KEY_HEADER, value);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(NewsClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get<T: DeserializeOwned>(&self, endpoint: &str, params: &Params) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, ?params, "Requesting news API.");

        let res = self.client.get(&url).query(params).send()?;
        let status = res.status();
        let body = res.text()?;

        parse_response(status, &body)
    }

    pub fn top_headlines(&self, query: &HeadlinesQuery) -> Result<ArticlesResponse> {
        self.get("top-headlines", &query.params())
    }

    pub fn search(&self, query: &SearchQuery) -> Result<ArticlesResponse> {
        self.get("everything", &query.params()?)
    }

    pub fn sources(&self, query: &SourcesQuery) -> Result<SourcesResponse> {
        self.get("top-headlines/sources", &query.params())
    }

    /// Headlines from specific source ids, e.g. `["bbc-news", "cnn"]`.
    pub fn headlines_by_source(
        &self,
        sources: &[&str],
        page: usize,
        page_size: usize,
    ) -> Result<ArticlesResponse> {
        self.get("top-headlines", &source_params(sources, page, page_size)?)
    }

    /// Check the key against the API with a one-article request.
    pub fn verify(&self, country: &str) -> Result<()> {
        self.top_headlines(&HeadlinesQuery::new(country).page_size(1))
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_client_creation() {
        let client = NewsClient::new(&Config::new("a".repeat(32)));
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_rejects_placeholder_key() {
        let result = NewsClient::new(&Config::new(PLACEHOLDER_API_KEY));
        assert!(matches!(result, Err(Error::MissingApiKey)));

        let result = NewsClient::new(&Config::new(""));
        assert!(matches!(result, Err(Error::MissingApiKey)));
    }

    #[test]
    fn test_client_rejects_unprintable_key() {
        let result = NewsClient::new(&Config::new("bad\nkey"));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_headlines_params() {
        let params = HeadlinesQuery::new("us")
            .category(Category::Science)
            .page_size(250)
            .params();

        assert_eq!(param(&params, "country"), Some("us"));
        assert_eq!(param(&params, "category"), Some("science"));
        assert_eq!(param(&params, "page"), Some("1"));
        assert_eq!(param(&params, "pageSize"), Some("100"));
    }

    #[test]
    fn test_headlines_params_without_category() {
        let params = HeadlinesQuery::new("gb").params();
        assert_eq!(param(&params, "category"), None);
        assert_eq!(param(&params, "pageSize"), Some("20"));
    }

    #[test]
    fn test_search_params() {
        let mut query = SearchQuery::new("  rust language ", "en").page_size(100);
        query.from = Some("2024-01-01".to_string());
        let params = query.params().unwrap();

        assert_eq!(param(&params, "q"), Some("rust language"));
        assert_eq!(param(&params, "language"), Some("en"));
        assert_eq!(param(&params, "sortBy"), Some("publishedAt"));
        assert_eq!(param(&params, "from"), Some("2024-01-01"));
        assert_eq!(param(&params, "to"), None);
    }

    #[test]
    fn test_search_rejects_empty_query() {
        let result = SearchQuery::new("   ", "en").params();
        assert!(matches!(result, Err(Error::EmptyQuery)));
    }

    #[test]
    fn test_source_params() {
        let params = source_params(&["bbc-news", "cnn"], 2, 10).unwrap();
        assert_eq!(param(&params, "sources"), Some("bbc-news,cnn"));
        assert_eq!(param(&params, "page"), Some("2"));

        assert!(matches!(source_params(&[], 1, 10), Err(Error::NoSources)));
    }

    #[test]
    fn test_sources_params() {
        let query = SourcesQuery {
            language: "en".to_string(),
            category: Some(Category::Business),
            country: None,
        };
        let params = query.params();
        assert_eq!(param(&params, "category"), Some("business"));
        assert_eq!(param(&params, "country"), None);
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("Science".parse::<Category>().unwrap(), Category::Science);
        assert_eq!(" sports ".parse::<Category>().unwrap(), Category::Sports);
        assert!(matches!("weather".parse::<Category>(), Err(Error::InvalidCategory(c)) if c == "weather"));

        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_parse_articles_response() {
        let body = r#"{
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {"source": {"id": null, "name": "BBC"}, "title": "One", "url": "https://a.com"},
                {"title": "Two"}
            ]
        }"#;

        let response: ArticlesResponse = parse_response(StatusCode::OK, body).unwrap();
        assert_eq!(response.total_results, 2);
        assert_eq!(response.articles.len(), 2);
        assert_eq!(response.articles[0].source_name(), Some("BBC"));
        assert_eq!(response.articles[1].url(), None);
    }

    #[test]
    fn test_parse_sources_response() {
        let body = r#"{"status": "ok", "sources": [{"id": "bbc-news", "name": "BBC News", "category": "general"}]}"#;

        let response: SourcesResponse = parse_response(StatusCode::OK, body).unwrap();
        assert_eq!(response.sources[0].id, "bbc-news");
        assert_eq!(response.sources[0].category.as_deref(), Some("general"));
    }

    #[test]
    fn test_parse_error_body() {
        let body = r#"{"status": "error", "code": "parameterInvalid", "message": "Bad country"}"#;

        let result: Result<ArticlesResponse> = parse_response(StatusCode::BAD_REQUEST, body);
        match result {
            Err(Error::Api { code, message }) => {
                assert_eq!(code, "parameterInvalid");
                assert_eq!(message, "Bad country");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_parse_status_errors() {
        let result: Result<ArticlesResponse> = parse_response(StatusCode::UNAUTHORIZED, "");
        assert!(matches!(result, Err(Error::InvalidApiKey)));

        let result: Result<ArticlesResponse> = parse_response(StatusCode::TOO_MANY_REQUESTS, "{}");
        assert!(matches!(result, Err(Error::RateLimited)));

        let result: Result<ArticlesResponse> =
            parse_response(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert!(matches!(result, Err(Error::Status(s)) if s == StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn test_parse_malformed_success_body() {
        let result: Result<ArticlesResponse> = parse_response(StatusCode::OK, "not json");
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_looks_like_api_key() {
        assert!(looks_like_api_key(&"k".repeat(32)));
        assert!(!looks_like_api_key("short"));
        assert!(!looks_like_api_key(""));
    }
}
