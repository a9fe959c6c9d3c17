//! Paper domain types: topic, subcategories, references, formats, results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::PipelineError;

/// The research subject of a run. Never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic(String);

impl Topic {
    /// Validate a topic. Blank input is rejected before any network call.
    pub fn parse(raw: &str) -> Result<Self, PipelineError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PipelineError::EmptyTopic);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One decomposed sub-topic. Order in the decomposer output is section order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subcategory(pub String);

impl Subcategory {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Subcategory {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for Subcategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One formatted citation line.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Reference(String);

impl Reference {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The deduplication key.
    pub fn trimmed(&self) -> &str {
        self.0.trim()
    }
}

impl From<String> for Reference {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Reference {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The requested output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Txt,
    #[serde(rename = "md")]
    Markdown,
    Docx,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [Self::Txt, Self::Markdown, Self::Docx];

    /// File extension, also the token accepted on the command line.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Markdown => "md",
            Self::Docx => "docx",
        }
    }

    /// Label used in progress output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Txt => "TXT",
            Self::Markdown => "Markdown",
            Self::Docx => "DOCX",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Returned when a format token is not one of `txt`, `md`, `docx`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid format '{0}'. Please choose 'txt', 'md', or 'docx'.")]
pub struct UnsupportedFormat(pub String);

impl FromStr for OutputFormat {
    type Err = UnsupportedFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "txt" => Ok(Self::Txt),
            "md" => Ok(Self::Markdown),
            "docx" => Ok(Self::Docx),
            _ => Err(UnsupportedFormat(s.to_string())),
        }
    }
}

/// Outcome of researching one subcategory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubcategoryResult {
    pub subcategory: Subcategory,

    /// The synthesized summary; `None` when evidence or synthesis failed.
    pub narrative: Option<String>,

    pub references: Vec<Reference>,
}

impl SubcategoryResult {
    /// A result that contributes nothing.
    pub fn empty(subcategory: Subcategory) -> Self {
        Self {
            subcategory,
            narrative: None,
            references: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.narrative.is_some()
    }
}

/// Everything a completed run produced, ready to be rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperReport {
    pub run_id: Uuid,
    pub topic: Topic,
    pub format: OutputFormat,
    pub subcategories: Vec<Subcategory>,
    pub results: Vec<SubcategoryResult>,
    /// The coalesced body. Never contains a references section.
    pub draft: String,
    /// Deduplicated, sorted references.
    pub references: Vec<Reference>,
}
