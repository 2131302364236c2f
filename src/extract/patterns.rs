//! Compiled pattern table.
//!
//! Patterns are built once from a [`Vocabulary`] and ranked by priority:
//! list-item shapes (9-10) beat the broader whole-line shapes (3-5).

use anyhow::{Context, Result};
use regex::Regex;

use super::text::truncate_chars;
use super::vocabulary::Vocabulary;
use crate::domain::Category;

/// A percentage figure with an optional separator tail, read by `parse_value`
const VALUE: &str = r"(?P<value>\d{1,3}(?:[.,]\d+)?)\s*%";

/// Longest label kept after cleaning
pub const MAX_LABEL_CHARS: usize = 60;

/// Characters stripped from the end of labels
const TRAILING_PUNCT: &[char] = &[
    '.', ',', ';', ':', '!', '?', '-', '–', '—', '(', ')', '"', '\'',
];

/// Characters stripped from the start of labels
const LEADING_PUNCT: &[char] = &['-', '–', '—', '•', '*', '▪', '►', ':', ';', ',', '.'];

/// Minimum label shape accepted by a pattern family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelPolicy {
    pub min_chars: usize,
    pub min_alpha_run: usize,
}

pub const STRICT_LABEL: LabelPolicy = LabelPolicy {
    min_chars: 8,
    min_alpha_run: 5,
};

pub const RELAXED_LABEL: LabelPolicy = LabelPolicy {
    min_chars: 5,
    min_alpha_run: 3,
};

/// One percentage pattern with named `label` and `value` groups
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub name: &'static str,
    pub regex: Regex,
    pub priority: u8,
}

/// Every regex the fact extractor needs
#[derive(Debug, Clone)]
pub struct PatternTable {
    /// Applied to list items, highest priority first
    pub prioritized: Vec<PatternRule>,
    /// Applied to whole lines when list items yield too little
    pub generic: Vec<PatternRule>,
    pub percentage: Regex,
    pub date: Regex,
    categories: Vec<(Category, Regex)>,
    list_marker: Regex,
    degenerate: Regex,
    completion_suffix: Regex,
    irrelevance_terms: Vec<String>,
}

/// Build a regex alternation, longest words first so multi-word terms win
fn alternation(words: &[String]) -> String {
    let mut sorted: Vec<&String> = words.iter().filter(|w| !w.trim().is_empty()).collect();
    if sorted.is_empty() {
        // never matches
        return r"\b\B".to_string();
    }
    sorted.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
    sorted
        .iter()
        .map(|w| regex::escape(w.trim()))
        .collect::<Vec<_>>()
        .join("|")
}

fn compile(name: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).with_context(|| format!("Failed to compile {} pattern", name))
}

impl PatternTable {
    /// Compile the table for a vocabulary
    pub fn compile(vocabulary: &Vocabulary) -> Result<Self> {
        let of = alternation(&vocabulary.of_connectors);
        let verbs = alternation(&vocabulary.status_verbs);
        let completion = alternation(&vocabulary.completion_words);

        let prioritized = vec![
            PatternRule {
                name: "list_label_colon",
                regex: compile(
                    "list_label_colon",
                    &format!(r"^(?P<label>[^:%]{{10,150}}?)\s*:\s*{VALUE}"),
                )?,
                priority: 10,
            },
            PatternRule {
                name: "list_value_of",
                regex: compile(
                    "list_value_of",
                    &format!(r"(?i)^{VALUE}\s+(?:{of})\s+(?P<label>[^%:;.!?]{{10,150}})"),
                )?,
                priority: 9,
            },
        ];

        let generic = vec![
            PatternRule {
                name: "label_colon",
                regex: compile(
                    "label_colon",
                    &format!(r"(?P<label>[^:%.;!?]{{5,80}}?)\s*:\s*{VALUE}"),
                )?,
                priority: 5,
            },
            PatternRule {
                name: "value_of",
                regex: compile(
                    "value_of",
                    &format!(r"(?i)\b{VALUE}\s+(?:{of})\s+(?P<label>[^%:;.!?]{{5,80}})"),
                )?,
                priority: 4,
            },
            PatternRule {
                name: "label_verb",
                regex: compile(
                    "label_verb",
                    &format!(r"(?i)(?P<label>[^:%.;!?]{{5,80}}?)\s+(?:{verbs})\s+{VALUE}"),
                )?,
                priority: 3,
            },
        ];

        let category_pattern = |keys: &[String]| {
            format!(r"(?i)\b(?:{})\s*:\s*(?P<value>.+)", alternation(keys))
        };
        let categories = vec![
            (
                Category::Status,
                compile("status", &category_pattern(&vocabulary.status_keys))?,
            ),
            (
                Category::Situation,
                compile("situation", &category_pattern(&vocabulary.situation_keys))?,
            ),
            (
                Category::Responsible,
                compile("responsible", &category_pattern(&vocabulary.responsible_keys))?,
            ),
        ];

        Ok(Self {
            prioritized,
            generic,
            percentage: compile("percentage", &format!(r"\b{VALUE}"))?,
            date: compile(
                "date",
                r"\b(?P<day>\d{1,2})[/.\-](?P<month>\d{1,2})[/.\-](?P<year>\d{4}|\d{2})\b",
            )?,
            categories,
            list_marker: compile(
                "list_marker",
                r"^\s*\d{1,2}[.)]\s+|(?:^|\s)[-•*▪►–]\s+",
            )?,
            degenerate: compile(
                "degenerate",
                r"^\s*(?:[-•*▪►–]\s*)?\p{L}{1,12}\s*:\s*\d{1,3}(?:[.,]\d+)?\s*%\s*[.;,]?\s*$",
            )?,
            completion_suffix: compile(
                "completion_suffix",
                &format!(r"(?i)(?:^|\s+)(?:{completion})\s*$"),
            )?,
            irrelevance_terms: vocabulary
                .irrelevance_terms
                .iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        })
    }

    /// Relevance gate: placeholder text and bare "word: NN%" lines are noise
    pub fn is_relevant(&self, line: &str) -> bool {
        if line.trim().is_empty() {
            return false;
        }

        let lower = line.to_lowercase();
        if self.irrelevance_terms.iter().any(|t| lower.contains(t.as_str())) {
            return false;
        }

        !self.degenerate.is_match(line)
    }

    /// Split a line into list items: the text following each bullet or number marker
    pub fn list_items<'a>(&self, line: &'a str) -> Vec<&'a str> {
        let markers: Vec<(usize, usize)> = self
            .list_marker
            .find_iter(line)
            .map(|m| (m.start(), m.end()))
            .collect();

        markers
            .iter()
            .enumerate()
            .map(|(i, &(_, body_start))| {
                let body_end = markers.get(i + 1).map(|&(next, _)| next).unwrap_or(line.len());
                line[body_start..body_end].trim()
            })
            .filter(|item| !item.is_empty())
            .collect()
    }

    /// Strip markers, trailing punctuation and completion words, then cap the length
    pub fn clean_label(&self, raw: &str) -> String {
        let mut label = raw
            .trim_start_matches(|c: char| c.is_whitespace() || LEADING_PUNCT.contains(&c))
            .to_string();

        loop {
            let before = label.len();
            let trimmed_len = label
                .trim_end_matches(|c: char| c.is_whitespace() || TRAILING_PUNCT.contains(&c))
                .len();
            label.truncate(trimmed_len);

            if let Some(m) = self.completion_suffix.find(&label) {
                label.truncate(m.start());
            }

            if label.len() == before {
                break;
            }
        }

        let collapsed = label.split_whitespace().collect::<Vec<_>>().join(" ");
        truncate_chars(&collapsed, MAX_LABEL_CHARS).trim_end().to_string()
    }

    /// Category patterns in category order
    pub fn categories(&self) -> &[(Category, Regex)] {
        &self.categories
    }

    /// Highest priority of any percentage pattern matching the line
    pub fn line_priority(&self, line: &str) -> Option<u8> {
        let items = self.list_items(line);
        let prioritized = self
            .prioritized
            .iter()
            .filter(|rule| items.iter().any(|item| rule.regex.is_match(item)))
            .map(|rule| rule.priority);
        let generic = self
            .generic
            .iter()
            .filter(|rule| rule.regex.is_match(line))
            .map(|rule| rule.priority);

        prioritized.chain(generic).max()
    }
}
