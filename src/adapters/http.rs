//! OpenAI-compatible chat completions generator.
//!
//! Works with any server exposing `/v1/chat/completions` (Ollama, LM Studio,
//! vLLM, hosted APIs).

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{GenerationOutput, Generator, SamplingConfig};

/// Chat message sent to the endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Message {
    role: String,
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: Option<u64>,
}

/// HTTP generator client
pub struct HttpGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl HttpGenerator {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        request_timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    /// API root, always ending in "/v1"
    fn api_root(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let base = base.trim_end_matches("/chat/completions");
        if base.ends_with("/v1") {
            base.to_string()
        } else {
            format!("{}/v1", base)
        }
    }

    /// Resolve the chat completions endpoint from the base URL
    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_root())
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait]
impl Generator for HttpGenerator {
    fn name(&self) -> &str {
        "http"
    }

    async fn generate(
        &self,
        prompt: &str,
        max_output_tokens: u32,
        sampling: &SamplingConfig,
    ) -> Result<GenerationOutput> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user".to_string(),
                content: Some(prompt.to_string()),
            }],
            temperature: sampling.temperature,
            top_p: sampling.top_p,
            max_tokens: max_output_tokens,
        };

        let response = self
            .authorize(self.client.post(self.endpoint()).json(&body))
            .send()
            .await
            .context("Generation request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("Generation endpoint returned {}: {}", status, detail.trim());
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("Failed to parse generation response")?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .context("Generation response contained no text")?;

        Ok(GenerationOutput {
            content,
            tokens_used: parsed.usage.and_then(|u| u.total_tokens),
        })
    }

    async fn health_check(&self) -> Result<()> {
        let url = format!("{}/models", self.api_root());
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .with_context(|| format!("Failed to reach generation endpoint: {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Generation endpoint health check failed: {}",
                response.status()
            );
        }

        Ok(())
    }
}
