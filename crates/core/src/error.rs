//! Error types for the PaperForge domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.

use std::path::PathBuf;
use thiserror::Error;

// --- Bounded context errors ---

/// Failures of a single synthesis engine call.
#[derive(Debug, Clone, Error)]
pub enum SynthesisError {
    #[error("No API key configured for provider '{0}'")]
    NotConfigured(String),

    #[error("Unauthorized - check your API key")]
    Unauthorized,

    #[error("Forbidden - API key may be invalid or expired")]
    Forbidden,

    #[error("Server error (HTTP {status_code}) - please try again later")]
    Server { status_code: u16, message: String },

    #[error("Request failed with status code {status_code}: {message}")]
    UnexpectedStatus { status_code: u16, message: String },

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response body: {0}")]
    InvalidResponse(String),
}

impl SynthesisError {
    /// Map a non-success HTTP status to the matching failure.
    pub fn from_status(status_code: u16, body: impl Into<String>) -> Self {
        match status_code {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            500..=599 => Self::Server {
                status_code,
                message: body.into(),
            },
            _ => Self::UnexpectedStatus {
                status_code,
                message: body.into(),
            },
        }
    }
}

/// Failures inside an evidence provider.
///
/// These never leave the provider: [`crate::EvidenceProvider::search`] logs
/// them and returns an empty result set.
#[derive(Debug, Clone, Error)]
pub enum EvidenceError {
    #[error("Evidence provider not configured: {0}")]
    NotConfigured(String),

    #[error("Search request failed: {0}")]
    Network(String),

    #[error("Search returned HTTP {status_code}")]
    Status { status_code: u16 },

    #[error("Failed to decode search response: {0}")]
    Decode(String),
}

/// Failures of the synthesis pipeline stages.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    #[error("No topic entered")]
    EmptyTopic,

    #[error("Failed to parse subcategories: the response was not a valid numbered list")]
    Parse { response: String },

    #[error("The engine returned no text for the {stage}")]
    EmptyGeneration { stage: String },

    #[error("No sources found for '{subcategory}'")]
    NoEvidence { subcategory: String },

    #[error("No research data was collected for any subcategory")]
    NoResearch,

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}

impl PipelineError {
    /// Whether this failure must abort the whole run.
    ///
    /// Only meaningful for errors raised by run-level stages; per-subcategory
    /// failures are reported through the observer instead of being returned.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::NoEvidence { .. })
    }
}

/// Failures while writing the final document.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to build document package: {0}")]
    Archive(String),
}
