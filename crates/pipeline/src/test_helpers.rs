//! Shared test helpers for pipeline stage tests.

use async_trait::async_trait;
use paperforge_core::error::SynthesisError;
use paperforge_core::evidence::{EvidenceProvider, EvidenceRecord, SourceKind};
use paperforge_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A mock engine that replays a script of responses in order.
///
/// Every request is recorded. Panics if more calls are made than scripted.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<ProviderResponse, SynthesisError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<ProviderResponse, SynthesisError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Successful text responses, one per call.
    pub fn texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(make_text_response(t))).collect())
    }

    /// A single failing call.
    pub fn failing(error: SynthesisError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, SynthesisError> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request);
        self.script.lock().unwrap().pop_front().unwrap_or_else(|| {
            panic!(
                "ScriptedProvider: no more responses (call #{})",
                requests.len()
            )
        })
    }
}

pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        content: text.to_string(),
        model: "mock-model".into(),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
    }
}

/// Evidence keyed by subcategory: a query matches the first entry whose key
/// it starts with. Unmatched queries return nothing.
pub struct StaticEvidence {
    entries: Vec<(String, Vec<EvidenceRecord>)>,
    queries: Mutex<Vec<(String, usize)>>,
}

impl StaticEvidence {
    pub fn new(entries: Vec<(&str, Vec<EvidenceRecord>)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// `(query, limit)` pairs seen so far.
    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl EvidenceProvider for StaticEvidence {
    fn name(&self) -> &str {
        "static_mock"
    }

    async fn search(&self, query: &str, limit: usize) -> Vec<EvidenceRecord> {
        self.queries.lock().unwrap().push((query.to_string(), limit));
        self.entries
            .iter()
            .find(|(key, _)| query.starts_with(key.as_str()))
            .map(|(_, records)| records.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }
}

/// A scholarly record with a single author.
pub fn paper(title: &str, author: &str, year: i32, doi: &str) -> EvidenceRecord {
    EvidenceRecord {
        kind: SourceKind::Scholarly,
        title: Some(title.into()),
        attribution: author.into(),
        identifier: Some(doi.into()),
        year: Some(year),
        snippet: None,
    }
}
