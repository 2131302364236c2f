//! Generator interfaces for external language models.
//!
//! Generators turn an instruction prompt into narrative text. Two backends
//! ship with the crate: an OpenAI-compatible HTTP endpoint and a local
//! command that reads the prompt on stdin.

pub mod command;
pub mod http;
pub mod model;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use command::CommandGenerator;
pub use http::HttpGenerator;
pub use model::{
    BackendLoader, GeneratorLoader, LoadRetryPolicy, ModelCell, ModelStatus, ModelUnavailable,
};

/// Sampling parameters forwarded to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

fn default_temperature() -> f32 {
    0.3
}
fn default_top_p() -> f32 {
    0.9
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_p: default_top_p(),
        }
    }
}

/// Output from a generation call
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    /// The text returned by the model
    pub content: String,

    /// Tokens used (if available)
    pub tokens_used: Option<u64>,
}

impl GenerationOutput {
    /// Create a new output with just content
    pub fn new(content: String) -> Self {
        Self {
            content,
            tokens_used: None,
        }
    }
}

/// Which backend the loader builds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// OpenAI-compatible chat completions endpoint
    #[default]
    Http,
    /// Local program reading the prompt from stdin
    Command,
}

/// Resolved generator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorSettings {
    pub backend: BackendKind,
    pub base_url: String,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Program and arguments for the command backend
    pub command: Vec<String>,
    pub timeout_seconds: u64,
    pub sampling: SamplingConfig,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::Http,
            base_url: "http://localhost:11434/v1".to_string(),
            model: "llama3.1".to_string(),
            api_key: None,
            command: vec!["ollama".to_string(), "run".to_string(), "llama3.1".to_string()],
            timeout_seconds: 300,
            sampling: SamplingConfig::default(),
        }
    }
}

/// Trait for text generation backends
#[async_trait]
pub trait Generator: Send + Sync {
    /// Human-readable backend name
    fn name(&self) -> &str;

    /// Generate text for an instruction prompt
    async fn generate(
        &self,
        prompt: &str,
        max_output_tokens: u32,
        sampling: &SamplingConfig,
    ) -> Result<GenerationOutput>;

    /// Verify the backend is reachable and the model can be served
    async fn health_check(&self) -> Result<()>;
}
