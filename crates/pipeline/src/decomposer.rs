//! Decomposer — turns one topic into an ordered list of subcategories.
//!
//! The engine is asked for a numbered list of 3 to 5 subcategories. Parsing
//! keeps every `N. label` line, drops a trailing `: explanation` clause and
//! surrounding `**` emphasis, and skips everything else.

use paperforge_core::error::PipelineError;
use paperforge_core::message::Message;
use paperforge_core::paper::{Subcategory, Topic};
use paperforge_core::provider::{ModelSettings, Provider};
use regex_lite::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info};

const SYSTEM_PROMPT: &str = "You are a helpful research assistant. Your task is to break down a broad topic into 3 to 5 key subcategories. Respond with a numbered list. Do not include any other text, explanations, or markdown fences.";

/// `N. label[: clause]`
static NUMBERED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s*(.*?)(?::.*)?$").expect("numbered-line pattern is valid"));

pub struct Decomposer {
    provider: Arc<dyn Provider>,
    settings: ModelSettings,
    max_subcategories: Option<usize>,
}

impl Decomposer {
    pub fn new(provider: Arc<dyn Provider>, settings: ModelSettings) -> Self {
        Self {
            provider,
            settings,
            max_subcategories: None,
        }
    }

    /// Keep at most `max` subcategories. Unset keeps everything parsed.
    pub fn with_max_subcategories(mut self, max: Option<usize>) -> Self {
        self.max_subcategories = max;
        self
    }

    /// Build the decomposition messages for `topic`.
    pub fn messages(topic: &Topic) -> Vec<Message> {
        vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(format!(
                "Given the research topic: '{topic}', generate a list of 3 to 5 logical subcategories for an in-depth research paper."
            )),
        ]
    }

    /// Ask the engine for subcategories and parse them.
    ///
    /// Engine failures and unparseable output are both fatal to the run.
    pub async fn decompose(&self, topic: &Topic) -> Result<Vec<Subcategory>, PipelineError> {
        let request = self.settings.request(Self::messages(topic));
        let response = self.provider.complete(request).await?;
        debug!(response = %response.content, "Decomposer raw response");

        let mut subcategories = parse_subcategories(&response.content)?;
        if let Some(max) = self.max_subcategories
            && subcategories.len() > max
        {
            info!(parsed = subcategories.len(), max, "Clamping subcategory list");
            subcategories.truncate(max);
        }

        info!(count = subcategories.len(), "Subcategories generated");
        Ok(subcategories)
    }
}

/// Parse a numbered list into subcategories, preserving order.
///
/// Returns [`PipelineError::Parse`] when no line matches.
pub fn parse_subcategories(text: &str) -> Result<Vec<Subcategory>, PipelineError> {
    let subcategories: Vec<Subcategory> = text
        .lines()
        .filter_map(|line| {
            let caps = NUMBERED_LINE.captures(line.trim())?;
            let label = caps.get(1)?.as_str().trim().trim_matches('*').trim();
            (!label.is_empty()).then(|| Subcategory(label.to_string()))
        })
        .collect();

    if subcategories.is_empty() {
        return Err(PipelineError::Parse {
            response: text.to_string(),
        });
    }
    Ok(subcategories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedProvider;

    fn labels(subs: &[Subcategory]) -> Vec<&str> {
        subs.iter().map(Subcategory::as_str).collect()
    }

    #[test]
    fn parses_numbered_lines_in_order() {
        let subs = parse_subcategories("1. Foo: bar\n2. **Baz**\nnot a line\n3. Qux").unwrap();
        assert_eq!(labels(&subs), vec!["Foo", "Baz", "Qux"]);
    }

    #[test]
    fn bold_label_with_colon_clause() {
        let subs = parse_subcategories("1. **Solar Power:** photovoltaics and CSP").unwrap();
        assert_eq!(labels(&subs), vec!["Solar Power"]);
    }

    #[test]
    fn tolerates_indentation_and_crlf() {
        let subs = parse_subcategories("  1.  Wind Energy  \r\n  2.Hydropower\r\n").unwrap();
        assert_eq!(labels(&subs), vec!["Wind Energy", "Hydropower"]);
    }

    #[test]
    fn no_numbered_lines_is_parse_failure() {
        let err = parse_subcategories("Here are some ideas:\n- Solar\n- Wind").unwrap_err();
        assert!(matches!(err, PipelineError::Parse { .. }));
        assert!(matches!(
            parse_subcategories("").unwrap_err(),
            PipelineError::Parse { .. }
        ));
    }

    #[test]
    fn empty_labels_skipped() {
        let subs = parse_subcategories("1.\n2. ****\n3. Storage").unwrap();
        assert_eq!(labels(&subs), vec!["Storage"]);
    }

    #[test]
    fn no_upper_bound_by_default() {
        let text = (1..=7).map(|i| format!("{i}. Item {i}")).collect::<Vec<_>>().join("\n");
        assert_eq!(parse_subcategories(&text).unwrap().len(), 7);
    }

    #[test]
    fn prompt_names_topic_and_range() {
        let topic = Topic::parse("Renewable Energy").unwrap();
        let messages = Decomposer::messages(&topic);
        assert_eq!(messages.len(), 2);
        assert!(messages[1].content.contains("'Renewable Energy'"));
        assert!(messages[1].content.contains("3 to 5 logical subcategories"));
        assert!(messages[0].content.contains("numbered list"));
    }

    #[tokio::test]
    async fn decompose_uses_stage_settings() {
        let provider = Arc::new(ScriptedProvider::texts(&["1. Solar\n2. Wind\n3. Hydro"]));
        let decomposer =
            Decomposer::new(provider.clone(), ModelSettings::new("gpt-4o-mini", 0.4, 200));
        let topic = Topic::parse("Renewable Energy").unwrap();

        let subs = decomposer.decompose(&topic).await.unwrap();
        assert_eq!(labels(&subs), vec!["Solar", "Wind", "Hydro"]);

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "gpt-4o-mini");
        assert_eq!(requests[0].max_tokens, 200);
        assert!((requests[0].temperature - 0.4).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn decompose_clamps_when_configured() {
        let provider = Arc::new(ScriptedProvider::texts(&["1. A\n2. B\n3. C\n4. D"]));
        let decomposer = Decomposer::new(provider, ModelSettings::new("m", 0.4, 200))
            .with_max_subcategories(Some(2));
        let topic = Topic::parse("Letters").unwrap();
        let subs = decomposer.decompose(&topic).await.unwrap();
        assert_eq!(labels(&subs), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn engine_failure_propagates() {
        let provider = Arc::new(ScriptedProvider::failing(
            paperforge_core::SynthesisError::Unauthorized,
        ));
        let decomposer = Decomposer::new(provider, ModelSettings::new("m", 0.4, 200));
        let topic = Topic::parse("Anything").unwrap();
        let err = decomposer.decompose(&topic).await.unwrap_err();
        assert!(matches!(err, PipelineError::Synthesis(_)));
    }
}
