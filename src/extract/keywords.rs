//! Recurring theme keywords.
//!
//! Capitalized words of five or more letters are counted after removing
//! stopwords and generic business vocabulary. Ties keep first-seen order.

use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use regex::Regex;

use super::text::capitalize;
use super::vocabulary::Vocabulary;

pub const MAX_THEMES: usize = 10;

/// Window of most frequent terms inspected for repeated ones
const TOP_WINDOW: usize = 20;

/// Below this many repeated terms, fall back to raw frequency
const MIN_REPEATED: usize = 5;

#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    token: Regex,
    excluded: HashSet<String>,
}

impl KeywordExtractor {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self> {
        let token =
            Regex::new(r"\b\p{Lu}\p{L}{4,}\b").context("Failed to compile keyword pattern")?;
        let excluded = vocabulary
            .stopwords
            .iter()
            .chain(vocabulary.generic_terms.iter())
            .map(|w| w.trim().to_lowercase())
            .collect();

        Ok(Self { token, excluded })
    }

    /// Ranked themes, most frequent first
    pub fn extract(&self, content: &str) -> Vec<String> {
        // term -> (count, first position)
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        for (position, m) in self.token.find_iter(content).enumerate() {
            let term = m.as_str().to_lowercase();
            if self.excluded.contains(&term) {
                continue;
            }
            counts.entry(term).or_insert((0, position)).0 += 1;
        }

        let mut ranked: Vec<(String, usize, usize)> = counts
            .into_iter()
            .map(|(term, (count, first))| (term, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        let repeated: Vec<&(String, usize, usize)> = ranked
            .iter()
            .take(TOP_WINDOW)
            .filter(|(_, count, _)| *count >= 2)
            .collect();

        let chosen: Vec<&str> = if repeated.len() >= MIN_REPEATED {
            repeated.iter().map(|(term, _, _)| term.as_str()).collect()
        } else {
            ranked.iter().map(|(term, _, _)| term.as_str()).collect()
        };

        chosen.into_iter().take(MAX_THEMES).map(capitalize).collect()
    }
}
