//! Report synthesis engine.
//!
//! One request flows through: prepare -> {prompt -> generate} and
//! {facts, themes} -> format (or fallback) -> optional chart. The engine keeps
//! no per-request state; the only shared resource is the model cell.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::adapters::{ModelCell, SamplingConfig};
use crate::config::ResolvedConfig;
use crate::domain::{ExtractedFacts, ReportPath, ReportRequest, ReportResult, SizeTier};
use crate::extract::{FactExtractor, KeywordExtractor, Vocabulary};

use super::chart::synthesize_chart;
use super::error::SynthesisError;
use super::format::{build_fallback, format_generated};
use super::prepare::prepare;
use super::prompt;

/// Turns document text into executive reports
pub struct ReportEngine {
    extractor: FactExtractor,
    keywords: KeywordExtractor,
    model: Arc<ModelCell>,
    sampling: SamplingConfig,
}

impl ReportEngine {
    pub fn new(vocabulary: &Vocabulary, model: Arc<ModelCell>) -> Result<Self> {
        Ok(Self {
            extractor: FactExtractor::new(vocabulary)?,
            keywords: KeywordExtractor::new(vocabulary)?,
            model,
            sampling: SamplingConfig::default(),
        })
    }

    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    /// Build an engine backed by the process-wide model cell
    pub fn from_config(config: &ResolvedConfig) -> Result<Self> {
        let vocabulary = config.vocabulary()?;
        let model = ModelCell::shared(&config.generator, &config.model_load);
        Ok(Self::new(&vocabulary, model)?.with_sampling(config.generator.sampling.clone()))
    }

    pub fn model(&self) -> &ModelCell {
        &self.model
    }

    /// Run only the deterministic extractors
    pub fn analyze(&self, text: &str) -> (ExtractedFacts, Vec<String>) {
        (self.extractor.extract(text), self.keywords.extract(text))
    }

    /// Produce a report for one request.
    ///
    /// Fails only when the content is below the minimum length; in that case
    /// the model is never touched.
    #[instrument(
        skip(self, request),
        fields(tier = %request.size_tier, fingerprint = %request.fingerprint())
    )]
    pub async fn synthesize(
        &self,
        request: &ReportRequest,
    ) -> Result<ReportResult, SynthesisError> {
        let prepared = prepare(&request.content, request.size_tier)?;
        if prepared.truncated {
            debug!(
                normalized_chars = prepared.normalized_chars,
                budget = request.size_tier.char_budget(),
                "Content truncated to tier budget"
            );
        }

        let focus = request.focus();
        let (facts, themes) = self.analyze(&prepared.text);
        let prompt = prompt::assemble(&prepared.text, request.size_tier, focus);

        let (narrative, path) = match self.generate(&prompt, request.size_tier).await {
            Ok(text) => {
                info!("Using generated narrative");
                (
                    format_generated(&text, &facts, &themes, &request.options),
                    ReportPath::Generated,
                )
            }
            Err(e) => {
                warn!(error = %format!("{:#}", e), "Generation failed, using fallback report");
                (build_fallback(&prepared.text, focus), ReportPath::Fallback)
            }
        };

        let chart = if request.options.include_chart {
            synthesize_chart(&facts.metrics)
        } else {
            None
        };

        Ok(ReportResult {
            narrative,
            path,
            facts,
            themes,
            chart,
            size_tier: request.size_tier,
            generated_at: Utc::now(),
        })
    }

    /// One generation attempt; any failure is terminal for the request
    async fn generate(&self, prompt: &str, tier: SizeTier) -> Result<String> {
        let generator = self.model.get().await?;
        let output = generator
            .generate(prompt, tier.max_output_tokens(), &self.sampling)
            .await?;

        if let Some(tokens) = output.tokens_used {
            debug!(tokens, backend = generator.name(), "Generation finished");
        }

        let text = output.content.trim();
        if text.is_empty() {
            anyhow::bail!("Generator '{}' returned empty text", generator.name());
        }

        Ok(text.to_string())
    }
}
