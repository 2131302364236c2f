//! Deterministic fact extraction.
//!
//! Mines prepared document text for facts without involving the model:
//! - Metrics: labelled percentages ranked for charting
//! - Contextual: percentages with their surrounding prose
//! - Categories: status, situation and responsible
//! - Dates: day/month/year strings
//! - Keywords: recurring capitalized themes
//!
//! Every line passes the relevance gate first. Extraction never fails: a line
//! that does not parse contributes nothing.

pub mod categories;
pub mod context;
pub mod keywords;
pub mod metrics;
pub mod patterns;
pub mod text;
pub mod vocabulary;

use anyhow::Result;
use tracing::debug;

use crate::domain::ExtractedFacts;

pub use keywords::KeywordExtractor;
pub use patterns::PatternTable;
pub use vocabulary::Vocabulary;

/// Line-oriented extractor for every structured fact kind
#[derive(Debug, Clone)]
pub struct FactExtractor {
    table: PatternTable,
}

impl FactExtractor {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self> {
        Ok(Self {
            table: PatternTable::compile(vocabulary)?,
        })
    }

    /// Lines that survive the relevance gate
    pub fn relevant_lines<'a>(&self, content: &'a str) -> Vec<&'a str> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| self.table.is_relevant(line))
            .collect()
    }

    pub fn extract(&self, content: &str) -> ExtractedFacts {
        let lines = self.relevant_lines(content);

        let facts = ExtractedFacts {
            metrics: metrics::extract_metrics(&self.table, &lines),
            contextual: context::extract_contextual(&self.table, &lines),
            categories: categories::extract_categories(&self.table, &lines),
            dates: categories::extract_dates(&self.table, &lines),
        };

        debug!(
            lines = lines.len(),
            metrics = facts.metrics.len(),
            contextual = facts.contextual.len(),
            categories = facts.categories.len(),
            dates = facts.dates.len(),
            "Extracted structured facts"
        );

        facts
    }
}
