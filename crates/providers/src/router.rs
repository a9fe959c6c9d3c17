//! Engine selection — builds the configured synthesis engine.

use paperforge_config::{AMPLIFY_ENGINE, AppConfig};
use paperforge_core::provider::Provider;
use std::sync::Arc;
use std::time::Duration;

use crate::amplify::AmplifyProvider;
use crate::openai_compat::OpenAiCompatProvider;

/// Build the synthesis engine named by `config.synthesis.engine`.
///
/// A missing API key still yields an engine; its calls fail with
/// `SynthesisError::NotConfigured`. The CLI checks credentials first.
pub fn build_from_config(config: &AppConfig) -> Arc<dyn Provider> {
    let synthesis = &config.synthesis;
    let api_key = synthesis.api_key.clone().unwrap_or_default();
    let timeout = Duration::from_secs(synthesis.timeout_secs);

    if synthesis.engine == AMPLIFY_ENGINE {
        let mut provider = AmplifyProvider::new(api_key).with_timeout(timeout);
        if let Some(url) = &synthesis.api_url {
            provider = provider.with_base_url(url);
        }
        return Arc::new(provider);
    }

    let base_url = synthesis
        .api_url
        .clone()
        .unwrap_or_else(|| default_base_url(&synthesis.engine));

    Arc::new(
        OpenAiCompatProvider::new(&synthesis.engine, base_url, api_key).with_timeout(timeout),
    )
}

/// Get the default base URL for well-known OpenAI-compatible providers.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "deepseek" => "https://api.deepseek.com/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}
