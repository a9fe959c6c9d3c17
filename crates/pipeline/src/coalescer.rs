//! Coalescer — merges every subcategory summary into one paper body.
//!
//! The prompt depends on the output format: plain prose for TXT, Markdown
//! headings for MD, and bare title lines the renderer can promote to
//! headings for DOCX. No variant asks for a references section; the
//! consolidated list is appended at render time.

use paperforge_core::error::PipelineError;
use paperforge_core::message::Message;
use paperforge_core::paper::{OutputFormat, Topic};
use paperforge_core::provider::{ModelSettings, Provider};
use std::sync::Arc;
use tracing::info;

const SECTION_OUTLINE: &str = "- Title\n- Abstract\n- Introduction\n- Body Sections (based on the research findings)\n- Conclusion";

pub struct Coalescer {
    provider: Arc<dyn Provider>,
    settings: ModelSettings,
}

impl Coalescer {
    pub fn new(provider: Arc<dyn Provider>, settings: ModelSettings) -> Self {
        Self { provider, settings }
    }

    /// Produce the paper body for `format` from the successful narratives.
    pub async fn coalesce(
        &self,
        topic: &Topic,
        narratives: &[String],
        format: OutputFormat,
    ) -> Result<String, PipelineError> {
        let messages = vec![Message::user(build_prompt(topic, narratives, format))];
        let response = self.provider.complete(self.settings.request(messages)).await?;

        let draft = response.content.trim();
        if draft.is_empty() {
            return Err(PipelineError::EmptyGeneration {
                stage: "paper".into(),
            });
        }

        info!(chars = draft.len(), format = %format, "Paper body coalesced");
        Ok(draft.to_string())
    }
}

pub fn build_prompt(topic: &Topic, narratives: &[String], format: OutputFormat) -> String {
    let findings = narratives.join("\n\n");
    match format {
        OutputFormat::Txt => format!(
            "Write a full research paper on the topic: '{topic}'.\n\
Synthesize the following research findings for the content of the paper, tracing connections between the subtopics.\n\
Your output should be a single, plain text document without any special formatting like Markdown. Do not include a references section.\n\n\
Research Findings:\n{findings}\n\n\
The paper should have the following sections:\n{SECTION_OUTLINE}"
        ),
        OutputFormat::Markdown => format!(
            "Write a full research paper on the topic: '{topic}'.\n\
Synthesize the following research findings, using Markdown syntax to format the document. Do not include a references section.\n\n\
Use a single '#' for the main title, '##' for main sections (e.g., Introduction, Conclusion), and '###' for sub-sections.\n\n\
Research Findings:\n{findings}"
        ),
        OutputFormat::Docx => format!(
            "Write a full research paper in APA format on the topic: '{topic}'.\n\
Synthesize the following research findings, tracing connections between the subtopics.\n\
The output should be a single, plain text document with no special formatting. Ensure section titles are on their own lines. Do not include a references section.\n\n\
Research Findings:\n{findings}\n\n\
The paper should have the following sections, with each title on a new line:\n{SECTION_OUTLINE}"
        ),
    }
}
