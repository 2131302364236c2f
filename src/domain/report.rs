//! Report outputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::facts::ExtractedFacts;
use super::request::SizeTier;

/// Which assembly path produced the narrative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportPath {
    /// Model narrative merged with extracted facts
    Generated,
    /// Deterministic report built without the model
    Fallback,
}

/// Renderable series for an external visualization layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDescriptor {
    /// Always "bar"
    #[serde(rename = "type")]
    pub chart_type: String,
    pub values: Vec<u8>,
    pub labels: Vec<String>,
    pub title: String,
    pub description: String,
}

impl ChartDescriptor {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Final output of one request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResult {
    /// Markdown ready for display or storage
    pub narrative: String,

    pub path: ReportPath,

    pub facts: ExtractedFacts,

    /// Recurring capitalized terms, most frequent first (at most 10)
    pub themes: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartDescriptor>,

    pub size_tier: SizeTier,

    pub generated_at: DateTime<Utc>,
}

impl ReportResult {
    pub fn is_fallback(&self) -> bool {
        self.path == ReportPath::Fallback
    }
}
