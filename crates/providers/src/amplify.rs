//! Amplify chat API provider.
//!
//! Amplify wraps the chat messages in a `data` envelope together with the
//! sampling options and model id, and answers with `{"data": "<text>"}`.

use async_trait::async_trait;
use paperforge_core::error::SynthesisError;
use paperforge_core::message::Message;
use paperforge_core::provider::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::map_send_error;

pub const DEFAULT_BASE_URL: &str = "https://prod-api.vanderbilt.ai";

/// A provider for the Amplify `/chat` endpoint.
pub struct AmplifyProvider {
    base_url: String,
    api_key: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl AmplifyProvider {
    /// Create a provider against the production endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(60),
            client: reqwest::Client::new(),
        }
    }

    /// Override the base URL (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn build_payload(request: &ProviderRequest) -> AmplifyRequest<'_> {
        AmplifyRequest {
            data: AmplifyData {
                temperature: request.temperature,
                max_tokens: request.max_tokens,
                data_sources: Vec::new(),
                messages: &request.messages,
                options: AmplifyOptions {
                    rag_only: false,
                    skip_rag: true,
                    model: AmplifyModel { id: &request.model },
                    prompt: request.first_user_prompt(),
                },
            },
        }
    }
}

#[async_trait]
impl Provider for AmplifyProvider {
    fn name(&self) -> &str {
        "amplify"
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, SynthesisError> {
        if self.api_key.is_empty() {
            return Err(SynthesisError::NotConfigured(self.name().into()));
        }

        let url = format!("{}/chat", self.base_url);
        let payload = Self::build_payload(&request);

        debug!(
            model = %request.model,
            max_tokens = request.max_tokens,
            "Sending Amplify chat request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Amplify returned error");
            return Err(SynthesisError::from_status(status, error_body));
        }

        let body: AmplifyResponse = response
            .json()
            .await
            .map_err(|e| SynthesisError::InvalidResponse(e.to_string()))?;

        Ok(ProviderResponse {
            content: body.data,
            model: request.model,
            usage: None,
        })
    }
}

// --- Amplify API types (internal) ---

#[derive(Debug, Serialize)]
struct AmplifyRequest<'a> {
    data: AmplifyData<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AmplifyData<'a> {
    temperature: f32,
    #[serde(rename = "max_tokens")]
    max_tokens: u32,
    data_sources: Vec<serde_json::Value>,
    messages: &'a [Message],
    options: AmplifyOptions<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AmplifyOptions<'a> {
    rag_only: bool,
    skip_rag: bool,
    model: AmplifyModel<'a>,
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
struct AmplifyModel<'a> {
    id: &'a str,
}

#[derive(Debug, Deserialize)]
struct AmplifyResponse {
    #[serde(default)]
    data: String,
}
