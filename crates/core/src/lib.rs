//! # PaperForge Core
//!
//! Domain types, traits, and error definitions for the PaperForge research
//! paper generator. This crate has **no HTTP or filesystem dependencies** — it
//! defines the model that the engine, evidence, pipeline and render crates
//! implement against.
//!
//! ## Design Philosophy
//!
//! The two external collaborators of the pipeline are traits here:
//! - [`Provider`] — the synthesis engine (a chat-style LLM endpoint)
//! - [`EvidenceProvider`] — a source-metadata search backend
//!
//! Concrete implementations are selected from configuration at startup, and
//! tests substitute scripted implementations.

pub mod error;
pub mod evidence;
pub mod message;
pub mod paper;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use error::{EvidenceError, PipelineError, RenderError, SynthesisError};
pub use evidence::{EvidenceProvider, EvidenceRecord, SourceKind};
pub use message::{Message, Role};
pub use paper::{
    OutputFormat, PaperReport, Reference, Subcategory, SubcategoryResult, Topic, UnsupportedFormat,
};
pub use provider::{ModelSettings, Provider, ProviderRequest, ProviderResponse, Usage};
