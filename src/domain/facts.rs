//! Structured facts mined from document text.
//!
//! Extraction produces several fact kinds with different lifecycles; callers
//! that only need to walk them uniformly use [`Fact`].

use serde::{Deserialize, Serialize};

/// A percentage paired with a short label, used for charts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateMetric {
    pub label: String,
    /// Always within 1..=100
    pub value: u8,
    /// Rank of the pattern that found it (higher wins)
    pub priority: u8,
}

/// A percentage with the prose surrounding it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextualFact {
    /// Always within 1..=100
    pub value: u8,
    /// Up to 200 characters around the occurrence
    pub snippet: String,
    pub priority: u8,
}

/// Single-valued categories; the first match in a document wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Status,
    Situation,
    Responsible,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Status => "Status",
            Category::Situation => "Situation",
            Category::Responsible => "Responsible",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFact {
    pub category: Category,
    /// Trimmed to 150 characters
    pub value: String,
}

/// A calendar date as written in the document (day/month/year)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateFact {
    pub raw: String,
}

/// Uniform view over every fact kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fact {
    Percentage(ContextualFact),
    Category(CategoryFact),
    Date(DateFact),
}

/// Everything the deterministic extractors found in one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFacts {
    /// Ranked chart candidates (at most 8)
    pub metrics: Vec<CandidateMetric>,
    /// Ranked contextual percentages (at most 8)
    pub contextual: Vec<ContextualFact>,
    /// At most one fact per category, in category order
    pub categories: Vec<CategoryFact>,
    /// Empty, or 1..=10 distinct dates in order of appearance
    pub dates: Vec<DateFact>,
}

impl ExtractedFacts {
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
            && self.contextual.is_empty()
            && self.categories.is_empty()
            && self.dates.is_empty()
    }

    /// Look up the fact recorded for a category
    pub fn category(&self, category: Category) -> Option<&CategoryFact> {
        self.categories.iter().find(|f| f.category == category)
    }

    /// Narrative-facing facts as tagged variants: percentages, categories, dates
    pub fn facts(&self) -> Vec<Fact> {
        let percentages = self.contextual.iter().cloned().map(Fact::Percentage);
        let categories = self.categories.iter().cloned().map(Fact::Category);
        let dates = self.dates.iter().cloned().map(Fact::Date);
        percentages.chain(categories).chain(dates).collect()
    }
}
