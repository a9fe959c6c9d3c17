//! Researcher — gathers evidence for one subcategory and synthesizes a
//! grounded summary from it.
//!
//! Never fails the run. With no evidence the engine is not called at all;
//! an engine failure or empty generation still hands back the references
//! that were found so the caller can decide what to keep.

use paperforge_core::error::PipelineError;
use paperforge_core::evidence::{EvidenceProvider, EvidenceRecord, SourceKind, grounding_context};
use paperforge_core::message::Message;
use paperforge_core::paper::{Reference, Subcategory, SubcategoryResult};
use paperforge_core::provider::{ModelSettings, Provider};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What happened when researching one subcategory.
#[derive(Debug, Clone)]
pub enum ResearchOutcome {
    /// A non-empty narrative was synthesized.
    Completed(SubcategoryResult),
    /// No narrative. `result.references` holds whatever evidence was found.
    Failed {
        result: SubcategoryResult,
        reason: PipelineError,
    },
}

impl ResearchOutcome {
    pub fn result(&self) -> &SubcategoryResult {
        match self {
            Self::Completed(result) | Self::Failed { result, .. } => result,
        }
    }

    pub fn into_result(self) -> SubcategoryResult {
        match self {
            Self::Completed(result) | Self::Failed { result, .. } => result,
        }
    }
}

pub struct Researcher {
    provider: Arc<dyn Provider>,
    evidence: Arc<dyn EvidenceProvider>,
    settings: ModelSettings,
    limit: usize,
}

impl Researcher {
    pub fn new(
        provider: Arc<dyn Provider>,
        evidence: Arc<dyn EvidenceProvider>,
        settings: ModelSettings,
        limit: usize,
    ) -> Self {
        Self {
            provider,
            evidence,
            settings,
            limit,
        }
    }

    /// Name of the evidence source in use.
    pub fn evidence_name(&self) -> &str {
        self.evidence.name()
    }

    /// The search query for `subcategory`.
    pub fn query(&self, subcategory: &Subcategory) -> String {
        format!("{subcategory} {}", self.evidence.query_suffix())
    }

    pub async fn research(&self, subcategory: &Subcategory) -> ResearchOutcome {
        let query = self.query(subcategory);
        let records = self.evidence.search(&query, self.limit).await;
        debug!(%subcategory, found = records.len(), "Evidence gathered");

        if records.is_empty() {
            warn!(%subcategory, "No sources found, skipping synthesis");
            return ResearchOutcome::Failed {
                result: SubcategoryResult::empty(subcategory.clone()),
                reason: PipelineError::NoEvidence {
                    subcategory: subcategory.to_string(),
                },
            };
        }

        let references: Vec<Reference> = records.iter().map(EvidenceRecord::reference).collect();
        let request = self.settings.request(synthesis_messages(subcategory, &records));

        let narrative = match self.provider.complete(request).await {
            Ok(response) => response.content.trim().to_string(),
            Err(e) => {
                warn!(%subcategory, error = %e, "Synthesis failed");
                return ResearchOutcome::Failed {
                    result: SubcategoryResult {
                        subcategory: subcategory.clone(),
                        narrative: None,
                        references,
                    },
                    reason: e.into(),
                };
            }
        };

        if narrative.is_empty() {
            return ResearchOutcome::Failed {
                result: SubcategoryResult {
                    subcategory: subcategory.clone(),
                    narrative: None,
                    references,
                },
                reason: PipelineError::EmptyGeneration {
                    stage: format!("summary of '{subcategory}'"),
                },
            };
        }

        info!(%subcategory, sources = references.len(), "Subcategory synthesized");
        ResearchOutcome::Completed(SubcategoryResult {
            subcategory: subcategory.clone(),
            narrative: Some(narrative),
            references,
        })
    }
}

/// Grounded synthesis prompt. The source labels follow the kind of the
/// first record; a provider only ever returns one kind.
fn synthesis_messages(subcategory: &Subcategory, records: &[EvidenceRecord]) -> Vec<Message> {
    let (source_label, heading) = match records.first().map(|r| r.kind) {
        Some(SourceKind::Web) => ("search results", "Search Results"),
        _ => ("scholarly article metadata", "Scholarly Article Metadata"),
    };

    let prompt = format!(
        "Synthesize a detailed academic summary for the subtopic '{subcategory}' using only the following {source_label}. \
Trace connections between the sources and the broader subtopic. \
Do not invent facts that the sources do not support. \
Your summary must be in plain text and must not contain any in-text citations or references.\n\n\
{heading}:\n{}",
        grounding_context(records)
    );
    vec![Message::user(prompt)]
}
