//! The PaperForge synthesis pipeline.
//!
//! One run takes a topic through four stages:
//!
//! 1. **Decompose** — ask the engine for 3 to 5 subcategories
//! 2. **Research** — gather evidence and synthesize a summary per subcategory
//! 3. **Coalesce** — merge the summaries into one paper body
//! 4. **Consolidate** — deduplicate and sort the references
//!
//! Stages run strictly in order and subcategories are researched
//! sequentially. Only decomposition and coalescing can fail the run;
//! a subcategory that yields no narrative is reported and skipped.

pub mod coalescer;
pub mod decomposer;
pub mod observer;
pub mod references;
pub mod researcher;

pub use coalescer::Coalescer;
pub use decomposer::{Decomposer, parse_subcategories};
pub use observer::{NoopObserver, PipelineObserver};
pub use references::consolidate;
pub use researcher::{ResearchOutcome, Researcher};

use paperforge_config::AppConfig;
use paperforge_core::error::PipelineError;
use paperforge_core::evidence::EvidenceProvider;
use paperforge_core::paper::{OutputFormat, PaperReport, Topic};
use paperforge_core::provider::Provider;
use std::sync::Arc;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

pub struct Pipeline {
    decomposer: Decomposer,
    researcher: Researcher,
    coalescer: Coalescer,
    observer: Arc<dyn PipelineObserver>,
}

impl Pipeline {
    /// Wire the stages from `config` around one engine and one evidence source.
    pub fn new(
        provider: Arc<dyn Provider>,
        evidence: Arc<dyn EvidenceProvider>,
        config: &AppConfig,
    ) -> Self {
        let stages = &config.stages;
        Self {
            decomposer: Decomposer::new(provider.clone(), stages.decompose.clone())
                .with_max_subcategories(config.pipeline.max_subcategories),
            researcher: Researcher::new(
                provider.clone(),
                evidence,
                stages.research.clone(),
                config.evidence.limit,
            ),
            coalescer: Coalescer::new(provider, stages.coalesce.clone()),
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Run every stage for `topic` and return the paper ready to render.
    pub async fn run(
        &self,
        topic: &Topic,
        format: OutputFormat,
    ) -> Result<PaperReport, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline", %run_id, topic = %topic, format = %format);
        self.run_stages(run_id, topic, format).instrument(span).await
    }

    async fn run_stages(
        &self,
        run_id: Uuid,
        topic: &Topic,
        format: OutputFormat,
    ) -> Result<PaperReport, PipelineError> {
        info!("Pipeline started");

        self.observer.decomposing(topic);
        let subcategories = self.decomposer.decompose(topic).await?;
        self.observer.decomposed(&subcategories);

        let mut results = Vec::with_capacity(subcategories.len());
        let mut narratives = Vec::new();
        let mut gathered = Vec::new();

        for subcategory in &subcategories {
            self.observer
                .researching(subcategory, self.researcher.evidence_name());

            match self.researcher.research(subcategory).await {
                ResearchOutcome::Completed(result) => {
                    if let Some(narrative) = &result.narrative {
                        narratives.push(narrative.clone());
                    }
                    gathered.extend(result.references.iter().cloned());
                    self.observer.researched(&result);
                    results.push(result);
                }
                ResearchOutcome::Failed { result, reason } => {
                    // References without a narrative are not cited.
                    warn!(%subcategory, reason = %reason, "Subcategory skipped");
                    self.observer.skipped(subcategory, &reason);
                    results.push(result);
                }
            }
        }

        if narratives.is_empty() {
            return Err(PipelineError::NoResearch);
        }

        self.observer.coalescing(format);
        let draft = self.coalescer.coalesce(topic, &narratives, format).await?;
        let references = consolidate(gathered);

        info!(
            researched = narratives.len(),
            skipped = subcategories.len() - narratives.len(),
            references = references.len(),
            "Pipeline finished"
        );

        Ok(PaperReport {
            run_id,
            topic: topic.clone(),
            format,
            subcategories,
            results,
            draft,
            references,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_helpers;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{ScriptedProvider, StaticEvidence, paper};
    use paperforge_core::SynthesisError;
    use paperforge_core::paper::{Subcategory, SubcategoryResult};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<String>>,
    }

    impl RecordingObserver {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
        fn push(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl PipelineObserver for RecordingObserver {
        fn decomposing(&self, topic: &Topic) {
            self.push(format!("decomposing {topic}"));
        }
        fn decomposed(&self, subcategories: &[Subcategory]) {
            self.push(format!("decomposed {}", subcategories.len()));
        }
        fn researching(&self, subcategory: &Subcategory, evidence: &str) {
            self.push(format!("researching {subcategory} via {evidence}"));
        }
        fn researched(&self, result: &SubcategoryResult) {
            self.push(format!("researched {}", result.subcategory));
        }
        fn skipped(&self, subcategory: &Subcategory, _reason: &PipelineError) {
            self.push(format!("skipped {subcategory}"));
        }
        fn coalescing(&self, format: OutputFormat) {
            self.push(format!("coalescing {}", format.label()));
        }
    }

    fn renewable_evidence() -> Arc<StaticEvidence> {
        Arc::new(StaticEvidence::new(vec![
            (
                "Solar",
                vec![
                    paper("Perovskites", "Ada Lovelace", 2021, "https://doi.org/10.1/p"),
                    paper("Shared Grid", "Grace Hopper", 2019, "https://doi.org/10.1/g"),
                ],
            ),
            (
                "Wind",
                vec![paper("Shared Grid", "Grace Hopper", 2019, "https://doi.org/10.1/g")],
            ),
        ]))
    }

    fn topic() -> Topic {
        Topic::parse("Renewable Energy").unwrap()
    }

    #[tokio::test]
    async fn full_run_merges_and_consolidates() {
        let provider = Arc::new(ScriptedProvider::texts(&[
            "1. Solar: photovoltaics\n2. Wind\n3. Tidal",
            "Solar summary.",
            "Wind summary.",
            "# Renewable Energy\n\nBody.",
        ]));
        let observer = Arc::new(RecordingObserver::default());
        let pipeline = Pipeline::new(provider.clone(), renewable_evidence(), &AppConfig::default())
            .with_observer(observer.clone());

        let report = pipeline.run(&topic(), OutputFormat::Markdown).await.unwrap();

        assert_eq!(report.subcategories.len(), 3);
        assert_eq!(report.results.len(), 3);
        assert!(!report.results[2].is_success());
        assert_eq!(report.draft, "# Renewable Energy\n\nBody.");
        // Shared Grid appears under both subcategories but is cited once.
        assert_eq!(
            report
                .references
                .iter()
                .map(|r| r.as_str())
                .collect::<Vec<_>>(),
            vec![
                "Ada Lovelace (2021). Perovskites. https://doi.org/10.1/p",
                "Grace Hopper (2019). Shared Grid. https://doi.org/10.1/g",
            ]
        );

        // decompose + 2 syntheses (tidal has no evidence) + coalesce
        assert_eq!(provider.call_count(), 4);
        let coalesce_prompt = provider.requests()[3].first_user_prompt().to_string();
        assert!(coalesce_prompt.contains("Solar summary.\n\nWind summary."));

        assert_eq!(
            observer.events(),
            vec![
                "decomposing Renewable Energy",
                "decomposed 3",
                "researching Solar via static_mock",
                "researched Solar",
                "researching Wind via static_mock",
                "researched Wind",
                "researching Tidal via static_mock",
                "skipped Tidal",
                "coalescing Markdown",
            ]
        );
    }

    #[tokio::test]
    async fn failed_synthesis_references_not_cited() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(test_helpers::make_text_response("1. Solar\n2. Wind")),
            Err(SynthesisError::Server {
                status_code: 502,
                message: "bad gateway".into(),
            }),
            Ok(test_helpers::make_text_response("Wind summary.")),
            Ok(test_helpers::make_text_response("Paper.")),
        ]));
        let pipeline = Pipeline::new(provider, renewable_evidence(), &AppConfig::default());

        let report = pipeline.run(&topic(), OutputFormat::Txt).await.unwrap();
        assert_eq!(report.references.len(), 1);
        assert_eq!(report.references[0].as_str(), "Grace Hopper (2019). Shared Grid. https://doi.org/10.1/g");
        assert_eq!(report.results[0].references.len(), 2);
    }

    #[tokio::test]
    async fn no_research_is_fatal() {
        let provider = Arc::new(ScriptedProvider::texts(&["1. Tidal\n2. Geothermal"]));
        let pipeline = Pipeline::new(
            provider.clone(),
            Arc::new(StaticEvidence::empty()),
            &AppConfig::default(),
        );

        let err = pipeline.run(&topic(), OutputFormat::Docx).await.unwrap_err();
        assert!(matches!(err, PipelineError::NoResearch));
        assert!(err.is_fatal());
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn unparseable_decomposition_stops_run() {
        let provider = Arc::new(ScriptedProvider::texts(&["Sorry, I cannot help with that."]));
        let evidence = renewable_evidence();
        let pipeline = Pipeline::new(provider, evidence.clone(), &AppConfig::default());

        let err = pipeline.run(&topic(), OutputFormat::Txt).await.unwrap_err();
        assert!(matches!(err, PipelineError::Parse { .. }));
        assert!(evidence.queries().is_empty());
    }

    #[tokio::test]
    async fn empty_paper_is_fatal() {
        let provider = Arc::new(ScriptedProvider::texts(&["1. Solar", "Solar summary.", "  "]));
        let pipeline = Pipeline::new(provider, renewable_evidence(), &AppConfig::default());

        let err = pipeline.run(&topic(), OutputFormat::Txt).await.unwrap_err();
        assert!(matches!(err, PipelineError::EmptyGeneration { .. }));
    }

    #[tokio::test]
    async fn subcategory_clamp_applies() {
        let provider = Arc::new(ScriptedProvider::texts(&[
            "1. Solar\n2. Wind\n3. Tidal",
            "Solar summary.",
            "Paper.",
        ]));
        let mut config = AppConfig::default();
        config.pipeline.max_subcategories = Some(1);
        let pipeline = Pipeline::new(provider, renewable_evidence(), &config);

        let report = pipeline.run(&topic(), OutputFormat::Txt).await.unwrap();
        assert_eq!(report.subcategories, vec![Subcategory::from("Solar")]);
    }
}
