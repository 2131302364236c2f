//! Report requests and size tiers.
//!
//! A request is created per user action and never mutated afterwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Verbosity/length preset controlling both truncation and generation budgets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeTier {
    VeryShort,
    Short,
    #[default]
    Medium,
    Long,
    Detailed,
}

impl SizeTier {
    /// All tiers, shortest first
    pub const ALL: [SizeTier; 5] = [
        SizeTier::VeryShort,
        SizeTier::Short,
        SizeTier::Medium,
        SizeTier::Long,
        SizeTier::Detailed,
    ];

    /// Maximum number of characters of content fed to the pipeline
    pub fn char_budget(&self) -> usize {
        match self {
            SizeTier::VeryShort => 3_000,
            SizeTier::Short => 4_500,
            SizeTier::Medium => 6_000,
            SizeTier::Long => 8_000,
            SizeTier::Detailed => 10_000,
        }
    }

    /// Maximum number of tokens the generator may produce
    pub fn max_output_tokens(&self) -> u32 {
        match self {
            SizeTier::VeryShort => 256,
            SizeTier::Short => 512,
            SizeTier::Medium => 768,
            SizeTier::Long => 1024,
            SizeTier::Detailed => 1536,
        }
    }

    /// Verbosity instruction appended to the prompt
    pub fn verbosity(&self) -> &'static str {
        match self {
            SizeTier::VeryShort => "Be very concise: 3-4 short paragraphs in total.",
            SizeTier::Short => "Be concise: one short paragraph per section.",
            SizeTier::Medium => "Give a balanced analysis: two to three paragraphs per section.",
            SizeTier::Long => {
                "Give a thorough analysis with supporting detail and examples from the document."
            }
            SizeTier::Detailed => {
                "Give an exhaustive, fully detailed analysis covering every relevant point \
                 of the document."
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeTier::VeryShort => "very_short",
            SizeTier::Short => "short",
            SizeTier::Medium => "medium",
            SizeTier::Long => "long",
            SizeTier::Detailed => "detailed",
        }
    }
}

impl fmt::Display for SizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizeTier {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "very_short" | "veryshort" => Ok(SizeTier::VeryShort),
            "short" => Ok(SizeTier::Short),
            "medium" => Ok(SizeTier::Medium),
            "long" => Ok(SizeTier::Long),
            "detailed" => Ok(SizeTier::Detailed),
            other => anyhow::bail!("Unknown size tier: {}", other),
        }
    }
}

/// Optional sections and outputs of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Build a chart descriptor from the ranked metrics
    #[serde(default = "default_true")]
    pub include_chart: bool,

    /// Render the Strategic Insights and Next Actions sections
    #[serde(default = "default_true")]
    pub include_insights: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            include_chart: true,
            include_insights: true,
        }
    }
}

/// One synthesis invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Plain text extracted upstream from the source document
    pub content: String,

    pub size_tier: SizeTier,

    /// Free-form focus instruction appended verbatim to the prompt
    pub custom_focus: Option<String>,

    #[serde(default)]
    pub options: ReportOptions,
}

impl ReportRequest {
    pub fn new(content: impl Into<String>, size_tier: SizeTier) -> Self {
        Self {
            content: content.into(),
            size_tier,
            custom_focus: None,
            options: ReportOptions::default(),
        }
    }

    /// Attach a custom focus; blank strings are treated as absent
    pub fn with_focus(mut self, focus: impl Into<String>) -> Self {
        let focus = focus.into();
        self.custom_focus = if focus.trim().is_empty() {
            None
        } else {
            Some(focus)
        };
        self
    }

    pub fn with_options(mut self, options: ReportOptions) -> Self {
        self.options = options;
        self
    }

    /// The custom focus, if it carries any text
    pub fn focus(&self) -> Option<&str> {
        self.custom_focus
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }

    /// Content digest in "sha256:<hex>" form
    pub fn fingerprint(&self) -> String {
        content_fingerprint(&self.content)
    }
}

/// Compute the "sha256:<hex>" digest of a piece of content
pub fn content_fingerprint(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("sha256:{}", hex::encode(hasher.finalize()))
}
