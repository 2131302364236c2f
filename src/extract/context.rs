//! Contextual percentages: each occurrence with the prose around it.

use std::collections::HashSet;

use super::metrics::{parse_value, rank_by};
use super::patterns::PatternTable;
use super::text::{collapse_whitespace, has_alpha_run, tail_chars, truncate_chars};
use crate::domain::ContextualFact;

/// Characters captured on each side of an occurrence
pub const CONTEXT_WINDOW: usize = 80;

pub const MAX_SNIPPET_CHARS: usize = 200;

/// Most contextual facts kept after ranking
pub const MAX_CONTEXTUAL: usize = 8;

/// Prefix length used to detect repeated snippets
const IDENTITY_PREFIX: usize = 40;

/// Priority for occurrences on lines no percentage pattern recognizes
const BASE_PRIORITY: u8 = 1;

fn snippet_for(line: &str, start: usize, end: usize) -> String {
    let before = tail_chars(&line[..start], CONTEXT_WINDOW);
    let after = truncate_chars(&line[end..], CONTEXT_WINDOW);
    let snippet = collapse_whitespace(&format!("{}{}{}", before, &line[start..end], after));
    truncate_chars(&snippet, MAX_SNIPPET_CHARS).to_string()
}

/// Extract ranked contextual facts from relevance-gated lines
pub fn extract_contextual(table: &PatternTable, lines: &[&str]) -> Vec<ContextualFact> {
    let mut seen: HashSet<(u8, String)> = HashSet::new();
    let mut facts = Vec::new();

    for line in lines {
        let priority = table.line_priority(line).unwrap_or(BASE_PRIORITY);

        for caps in table.percentage.captures_iter(line) {
            let (Some(whole), Some(raw)) = (caps.get(0), caps.name("value")) else {
                continue;
            };
            // a bare "0%" falls out here with every other out-of-range value
            let Some(value) = parse_value(raw.as_str()) else {
                continue;
            };

            let snippet = snippet_for(line, whole.start(), whole.end());
            let prose = collapse_whitespace(&table.percentage.replace_all(&snippet, " "));
            if prose.chars().count() < 8 || !has_alpha_run(&prose, 4) {
                continue;
            }

            let identity = (value, truncate_chars(&snippet, IDENTITY_PREFIX).to_string());
            if !seen.insert(identity) {
                continue;
            }

            facts.push(ContextualFact {
                value,
                snippet,
                priority,
            });
        }
    }

    rank_by(&mut facts, |f| (f.priority, f.value));
    facts.truncate(MAX_CONTEXTUAL);
    facts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Vocabulary;

    fn table() -> PatternTable {
        PatternTable::compile(&Vocabulary::default()).unwrap()
    }

    #[test]
    fn test_snippet_window() {
        let table = table();
        let prefix = "x".repeat(120);
        let suffix = "y".repeat(120);
        let line = format!("{} migration at 45% done {}", prefix, suffix);
        let facts = extract_contextual(&table, &[line.as_str()]);

        assert_eq!(facts.len(), 1);
        let snippet = &facts[0].snippet;
        assert!(snippet.contains("45%"));
        assert!(snippet.chars().count() <= MAX_SNIPPET_CHARS);
        assert!(!snippet.contains(&prefix));
    }

    #[test]
    fn test_zero_and_out_of_range_are_excluded() {
        let table = table();
        let lines = [
            "Open incidents dropped to 0% this quarter",
            "Revenue grew 150% year over year",
            "Supplier onboarding moved to 35% after the audit",
        ];
        let facts = extract_contextual(&table, &lines);

        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].value, 35);
    }

    #[test]
    fn test_thousands_separated_figures_are_excluded() {
        let table = table();
        let lines = [
            "Revenue grew 1,500% year over year in the new segment",
            "Costs rose 2.300% after the merger with the regional carrier",
            "Margin improved to 12,5% after the repricing",
        ];
        let facts = extract_contextual(&table, &lines);

        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].value, 12);
        assert!(facts[0].snippet.contains("12,5%"));
    }

    #[test]
    fn test_requires_prose_around_value() {
        let table = table();
        let facts = extract_contextual(&table, &["12% 14% 16%", "ok 50%"]);
        assert!(facts.is_empty());
    }

    #[test]
    fn test_repeated_snippets_are_deduplicated() {
        let table = table();
        let line = "Customer adoption reached 64% across all regions";
        let facts = extract_contextual(&table, &[line, line]);
        assert_eq!(facts.len(), 1);
    }

    #[test]
    fn test_ranked_by_line_priority() {
        let table = table();
        let lines = [
            "Informal estimate says roughly 90% of staff agree",
            "- Infrastructure upgrade: 40% concluded",
        ];
        let facts = extract_contextual(&table, &lines);

        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].value, 40);
        assert_eq!(facts[0].priority, 10);
        assert_eq!(facts[1].value, 90);
    }
}
