//! Wikipedia knowledge source.
//!
//! Talks to the MediaWiki Action API (`api.php`):
//! - `list=search` for ranked page ids
//! - `prop=extracts|info` for a page's plain-text intro and canonical URL
//!
//! Responses decode into explicit types where every remote field that may be
//! absent is an `Option`, so "missing" is handled where it is consumed.

use crate::source::KnowledgeSource;
use crate::types::{DocumentContent, SearchResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use wikiqa_core::config::KnowledgeConfig;
use wikiqa_core::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    error: Option<ApiError>,
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
    pageid: u64,
    #[serde(default)]
    snippet: String,
}

#[derive(Debug, Deserialize)]
struct PageResponse {
    #[serde(default)]
    error: Option<ApiError>,
    #[serde(default)]
    query: Option<PageQuery>,
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    /// Keyed by the page id as a string
    #[serde(default)]
    pages: HashMap<String, RawPage>,
}

#[derive(Debug, Deserialize)]
struct RawPage {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    fullurl: Option<String>,
    /// Present (as an empty string) when the id has no page
    #[serde(default)]
    missing: Option<serde_json::Value>,
    #[serde(default)]
    invalid: Option<serde_json::Value>,
}

/// MediaWiki Action API client.
#[derive(Debug, Clone)]
pub struct WikipediaClient {
    api_url: String,
    site_url: String,
    client: Client,
}

impl WikipediaClient {
    /// Client for English Wikipedia with default settings.
    pub fn new() -> AppResult<Self> {
        Self::from_config(&KnowledgeConfig::default())
    }

    pub fn from_config(config: &KnowledgeConfig) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_url: config.api_url.clone(),
            site_url: config.site_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Link used when the API supplies no `fullurl` for a page.
    pub fn fallback_url(&self, document_id: u64) -> String {
        curid_url(&self.site_url, document_id)
    }

    fn search_params(query: &str, limit: u32) -> Vec<(&'static str, String)> {
        vec![
            ("action", "query".to_string()),
            ("list", "search".to_string()),
            ("srsearch", query.to_string()),
            ("srlimit", limit.to_string()),
            ("format", "json".to_string()),
            ("origin", "*".to_string()),
        ]
    }

    fn page_params(document_id: u64) -> Vec<(&'static str, String)> {
        vec![
            ("action", "query".to_string()),
            ("prop", "extracts|info".to_string()),
            ("exintro", "1".to_string()),
            ("explaintext", "1".to_string()),
            ("inprop", "url".to_string()),
            ("pageids", document_id.to_string()),
            ("format", "json".to_string()),
            ("origin", "*".to_string()),
        ]
    }

    /// Issue one GET and decode the whole body, or fail without partial data.
    async fn get_json<T: DeserializeOwned>(
        &self,
        params: &[(&'static str, String)],
        action: &str,
    ) -> AppResult<T> {
        let response = self
            .client
            .get(&self.api_url)
            .query(params)
            .send()
            .await
            .map_err(|e| AppError::Search(format!("Wikipedia {} request failed: {}", action, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::Search(format!(
                "Wikipedia {} failed: {}",
                action, status
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Search(format!("Failed to parse Wikipedia {} response: {}", action, e)))
    }
}

fn curid_url(site_url: &str, document_id: u64) -> String {
    format!("{}/?curid={}", site_url, document_id)
}

fn api_error(action: &str, error: ApiError) -> AppError {
    AppError::Search(format!(
        "Wikipedia {} rejected ({}): {}",
        action, error.code, error.info
    ))
}

fn parse_search_response(response: SearchResponse) -> AppResult<Vec<SearchResult>> {
    if let Some(error) = response.error {
        return Err(api_error("search", error));
    }

    let hits = match response.query {
        Some(query) => query.search,
        None => Vec::new(),
    };

    Ok(hits
        .into_iter()
        .map(|hit| SearchResult {
            title: hit.title,
            document_id: hit.pageid,
            snippet: hit.snippet,
        })
        .collect())
}

fn parse_page_response(
    response: PageResponse,
    document_id: u64,
    site_url: &str,
) -> AppResult<DocumentContent> {
    if let Some(error) = response.error {
        return Err(api_error("page fetch", error));
    }

    let page = response
        .query
        .and_then(|mut query| query.pages.remove(&document_id.to_string()))
        .ok_or(AppError::DocumentNotFound(document_id))?;

    if page.missing.is_some() || page.invalid.is_some() {
        return Err(AppError::DocumentNotFound(document_id));
    }

    let title = page.title.ok_or(AppError::DocumentNotFound(document_id))?;

    Ok(DocumentContent {
        title,
        extract: page.extract.unwrap_or_default(),
        url: page
            .fullurl
            .unwrap_or_else(|| curid_url(site_url, document_id)),
    })
}

#[async_trait::async_trait]
impl KnowledgeSource for WikipediaClient {
    fn name(&self) -> &str {
        "Wikipedia"
    }

    async fn search(&self, query: &str, limit: u32) -> AppResult<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Err(AppError::Search("search query must not be empty".to_string()));
        }
        if limit == 0 {
            return Err(AppError::Search("search limit must be at least 1".to_string()));
        }

        tracing::debug!(query, limit, "Searching Wikipedia");

        let response: SearchResponse = self
            .get_json(&Self::search_params(query, limit), "search")
            .await?;
        let results = parse_search_response(response)?;

        tracing::debug!(query, hits = results.len(), "Wikipedia search complete");
        Ok(results)
    }

    async fn fetch_document(&self, document_id: u64) -> AppResult<DocumentContent> {
        tracing::debug!(document_id, "Fetching Wikipedia page");

        let response: PageResponse = self
            .get_json(&Self::page_params(document_id), "page fetch")
            .await?;

        parse_page_response(response, document_id, &self.site_url)
    }
}
