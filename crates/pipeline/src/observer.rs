//! Progress hooks for a pipeline run.
//!
//! The pipeline logs through `tracing` regardless; an observer is how a
//! front end shows stage-by-stage progress to a person.

use paperforge_core::error::PipelineError;
use paperforge_core::paper::{OutputFormat, Subcategory, SubcategoryResult, Topic};

/// Receives stage transitions and per-subcategory outcomes. All hooks
/// default to no-ops.
pub trait PipelineObserver: Send + Sync {
    fn decomposing(&self, _topic: &Topic) {}

    fn decomposed(&self, _subcategories: &[Subcategory]) {}

    /// `evidence` is the provider name, e.g. "openalex".
    fn researching(&self, _subcategory: &Subcategory, _evidence: &str) {}

    fn researched(&self, _result: &SubcategoryResult) {}

    /// The subcategory contributes nothing to the paper.
    fn skipped(&self, _subcategory: &Subcategory, _reason: &PipelineError) {}

    fn coalescing(&self, _format: OutputFormat) {}
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}
