//! Google Custom Search provider.
//!
//! Maps each search hit to a [`SourceKind::Web`] record (title, snippet, link).
//! Needs an API key and a search engine (CSE) id; without them every search
//! returns nothing.

use async_trait::async_trait;
use paperforge_core::error::EvidenceError;
use paperforge_core::evidence::{EvidenceProvider, EvidenceRecord, SourceKind};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// The API caps `num` at 10.
const MAX_RESULTS_PER_QUERY: usize = 10;

pub struct GoogleSearchProvider {
    base_url: String,
    api_key: Option<String>,
    cse_id: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

impl GoogleSearchProvider {
    pub fn new(api_key: Option<String>, cse_id: Option<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key,
            cse_id,
            timeout: Duration::from_secs(15),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<EvidenceRecord>, EvidenceError> {
        let (Some(key), Some(cx)) = (&self.api_key, &self.cse_id) else {
            return Err(EvidenceError::NotConfigured(
                "GOOGLE_SEARCH_API_KEY or GOOGLE_CSE_ID missing".into(),
            ));
        };

        let num = limit.clamp(1, MAX_RESULTS_PER_QUERY).to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("key", key.as_str()),
                ("cx", cx.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| EvidenceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EvidenceError::Status {
                status_code: status.as_u16(),
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| EvidenceError::Decode(e.to_string()))?;

        Ok(body
            .items
            .into_iter()
            .take(limit)
            .map(SearchItem::into_record)
            .collect())
    }
}

#[async_trait]
impl EvidenceProvider for GoogleSearchProvider {
    fn name(&self) -> &str {
        "google"
    }

    fn query_suffix(&self) -> &str {
        "research paper academic source"
    }

    async fn search(&self, query: &str, limit: usize) -> Vec<EvidenceRecord> {
        debug!(query, limit, "Searching Google Custom Search");
        match self.fetch(query, limit).await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Google Search API request failed");
                Vec::new()
            }
        }
    }
}

// --- Custom Search API types (internal) ---

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

impl SearchItem {
    fn into_record(self) -> EvidenceRecord {
        EvidenceRecord {
            kind: SourceKind::Web,
            title: self.title,
            attribution: String::new(),
            identifier: self.link,
            year: None,
            snippet: self.snippet,
        }
    }
}
