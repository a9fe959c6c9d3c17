//! Evidence provider trait and the source records it returns.
//!
//! An evidence provider turns a query string into a short list of candidate
//! sources. Each record yields one reference line and one block of grounding
//! context for the synthesis prompt.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::paper::Reference;

/// Where a record came from. Selects the citation and context layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Structured scholarly index entry (authors, year, DOI)
    Scholarly,
    /// General web search hit (title, snippet, URL)
    Web,
}

/// One candidate source returned for a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    pub kind: SourceKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Comma-separated author names, or empty.
    #[serde(default)]
    pub attribution: String,

    /// DOI or URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

const UNTITLED: &str = "Untitled";
const NO_DATE: &str = "n.d.";
const NO_SNIPPET: &str = "No snippet available.";

impl EvidenceRecord {
    fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED)
    }

    /// The citation line for this record.
    pub fn reference(&self) -> Reference {
        let title = self.title_or_default();
        let line = match self.kind {
            SourceKind::Scholarly => {
                let year = self
                    .year
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| NO_DATE.to_string());
                let mut line = format!("{} ({year}). {title}.", self.attribution);
                if let Some(id) = self.identifier.as_deref().filter(|id| !id.is_empty()) {
                    line.push(' ');
                    line.push_str(id);
                }
                line
            }
            SourceKind::Web => match self.identifier.as_deref() {
                Some(url) => format!("{title}. {url}"),
                None => format!("{title}."),
            },
        };
        Reference::from(line)
    }

    /// The grounding block for this record, without trailing separator.
    pub fn context_block(&self) -> String {
        let title = self.title_or_default();
        let id = self.identifier.as_deref().unwrap_or("None");
        match self.kind {
            SourceKind::Scholarly => {
                format!("Title: {title}\nAuthors: {}\nDOI: {id}", self.attribution)
            }
            SourceKind::Web => format!(
                "Title: {title}\nSnippet: {}\nURL: {id}",
                self.snippet.as_deref().unwrap_or(NO_SNIPPET)
            ),
        }
    }
}

/// Join the context blocks of `records` with blank lines.
pub fn grounding_context(records: &[EvidenceRecord]) -> String {
    records
        .iter()
        .map(EvidenceRecord::context_block)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The evidence provider trait.
///
/// `search` never fails: transport errors, bad statuses and missing
/// credentials all yield an empty list. Callers cannot tell "no results"
/// from "provider unavailable".
#[async_trait]
pub trait EvidenceProvider: Send + Sync {
    /// A human-readable name (e.g., "openalex", "google").
    fn name(&self) -> &str;

    /// Text appended to a subcategory to form the search query.
    fn query_suffix(&self) -> &str {
        "research paper"
    }

    /// Search for at most `limit` records.
    async fn search(&self, query: &str, limit: usize) -> Vec<EvidenceRecord>;
}
