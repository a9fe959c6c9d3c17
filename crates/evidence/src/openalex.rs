//! OpenAlex scholarly works search.
//!
//! Queries `https://api.openalex.org/works` and maps each work to a
//! [`SourceKind::Scholarly`] record (authors, year, DOI).

use async_trait::async_trait;
use paperforge_core::error::EvidenceError;
use paperforge_core::evidence::{EvidenceProvider, EvidenceRecord, SourceKind};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.openalex.org";

const SELECT_FIELDS: &str = "id,doi,title,authorships,cited_by_count,publication_year";

pub struct OpenAlexProvider {
    base_url: String,
    mailto: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

impl OpenAlexProvider {
    pub fn new(mailto: Option<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            mailto,
            timeout: Duration::from_secs(15),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<EvidenceRecord>, EvidenceError> {
        let url = format!("{}/works", self.base_url);
        let per_page = limit.to_string();
        let mut params = vec![
            ("search", query),
            ("per-page", per_page.as_str()),
            ("select", SELECT_FIELDS),
        ];
        // Identifies us for the polite pool
        if let Some(mailto) = &self.mailto {
            params.push(("mailto", mailto.as_str()));
        }

        let response = self
            .client
            .get(&url)
            .query(&params)
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

        let body: WorksResponse = response
            .json()
            .await
            .map_err(|e| EvidenceError::Decode(e.to_string()))?;

        Ok(body
            .results
            .into_iter()
            .take(limit)
            .map(Work::into_record)
            .collect())
    }
}

#[async_trait]
impl EvidenceProvider for OpenAlexProvider {
    fn name(&self) -> &str {
        "openalex"
    }

    async fn search(&self, query: &str, limit: usize) -> Vec<EvidenceRecord> {
        debug!(query, limit, "Searching OpenAlex");
        match self.fetch(query, limit).await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "OpenAlex API request failed");
                Vec::new()
            }
        }
    }
}

// --- OpenAlex API types (internal) ---

#[derive(Debug, Deserialize)]
struct WorksResponse {
    #[serde(default)]
    results: Vec<Work>,
}

#[derive(Debug, Deserialize)]
struct Work {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    doi: Option<String>,
    #[serde(default)]
    publication_year: Option<i32>,
    #[serde(default)]
    authorships: Vec<Authorship>,
}

#[derive(Debug, Deserialize)]
struct Authorship {
    #[serde(default)]
    author: Option<Author>,
}

#[derive(Debug, Deserialize)]
struct Author {
    #[serde(default)]
    display_name: Option<String>,
}

impl Work {
    fn into_record(self) -> EvidenceRecord {
        let attribution = self
            .authorships
            .into_iter()
            .filter_map(|a| a.author.and_then(|author| author.display_name))
            .collect::<Vec<_>>()
            .join(", ");

        EvidenceRecord {
            kind: SourceKind::Scholarly,
            title: self.title,
            attribution,
            identifier: self.doi,
            year: self.publication_year,
            snippet: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_works_response() {
        let data = r#"{
            "meta": {"count": 1},
            "results": [{
                "id": "https://openalex.org/W1",
                "doi": "https://doi.org/10.1/solar",
                "title": "Perovskite Solar Cells",
                "cited_by_count": 42,
                "publication_year": 2021,
                "authorships": [
                    {"author": {"display_name": "Ada Lovelace"}},
                    {"author": {"display_name": "Alan Turing"}}
                ]
            }]
        }"#;
        let parsed: WorksResponse = serde_json::from_str(data).unwrap();
        let record = parsed.results.into_iter().next().unwrap().into_record();
        assert_eq!(record.kind, SourceKind::Scholarly);
        assert_eq!(record.title.as_deref(), Some("Perovskite Solar Cells"));
        assert_eq!(record.attribution, "Ada Lovelace, Alan Turing");
        assert_eq!(record.identifier.as_deref(), Some("https://doi.org/10.1/solar"));
        assert_eq!(record.year, Some(2021));
    }

    #[test]
    fn nulls_and_missing_fields_tolerated() {
        let data = r#"{"results":[{"title":null,"doi":null,"authorships":[{"author":{}}]}]}"#;
        let parsed: WorksResponse = serde_json::from_str(data).unwrap();
        let record = parsed.results.into_iter().next().unwrap().into_record();
        assert!(record.title.is_none());
        assert!(record.identifier.is_none());
        assert!(record.year.is_none());
        assert_eq!(record.attribution, "");
    }

    #[test]
    fn missing_results_is_empty() {
        let parsed: WorksResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.results.is_empty());
    }

    #[tokio::test]
    async fn unreachable_api_yields_no_records() {
        let provider = OpenAlexProvider::new(None)
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2));
        assert!(provider.search("solar", 5).await.is_empty());
    }
}
