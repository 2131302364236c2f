//! Chart candidates: labelled percentages.
//!
//! Two ordered passes. List items are mined with the prioritized patterns;
//! only when that finds fewer than two candidates do the generic whole-line
//! patterns run, with a relaxed label policy to compensate.

use std::collections::HashSet;

use regex::Captures;
use tracing::debug;

use super::patterns::{LabelPolicy, PatternRule, PatternTable, RELAXED_LABEL, STRICT_LABEL};
use super::text::has_alpha_run;
use crate::domain::CandidateMetric;

/// Most metrics kept after ranking
pub const MAX_METRICS: usize = 8;

/// Parse a captured percentage, accepting only 1..=100
///
/// Decimals are dropped. A separator followed by exactly three digits is a
/// thousands group ("1,500", "2.300"), so the figure is out of range.
pub fn parse_value(raw: &str) -> Option<u8> {
    let (whole, fraction) = raw
        .split_once(|c: char| c == '.' || c == ',')
        .unwrap_or((raw, ""));
    if fraction.len() == 3 {
        return None;
    }

    let value: u16 = whole.parse().ok()?;
    if (1..=100).contains(&value) {
        u8::try_from(value).ok()
    } else {
        None
    }
}

/// Sort by priority then value, both descending
pub fn rank_by<T>(items: &mut [T], key: impl Fn(&T) -> (u8, u8)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

fn candidate(
    table: &PatternTable,
    caps: &Captures<'_>,
    rule: &PatternRule,
    policy: LabelPolicy,
) -> Option<CandidateMetric> {
    let value = parse_value(caps.name("value")?.as_str())?;
    let label = table.clean_label(caps.name("label")?.as_str());

    if label.chars().count() < policy.min_chars || !has_alpha_run(&label, policy.min_alpha_run) {
        return None;
    }

    Some(CandidateMetric {
        label,
        value,
        priority: rule.priority,
    })
}

fn collect<'a>(
    table: &PatternTable,
    rules: &[PatternRule],
    texts: impl Iterator<Item = &'a str>,
    policy: LabelPolicy,
    seen: &mut HashSet<String>,
    out: &mut Vec<CandidateMetric>,
) {
    for text in texts {
        // each percentage in a text backs at most one metric
        let mut claimed: HashSet<(usize, usize)> = HashSet::new();

        for rule in rules {
            for caps in rule.regex.captures_iter(text) {
                let Some(span) = caps.name("value").map(|v| (v.start(), v.end())) else {
                    continue;
                };
                if claimed.contains(&span) {
                    continue;
                }
                let Some(metric) = candidate(table, &caps, rule, policy) else {
                    continue;
                };
                claimed.insert(span);
                if seen.insert(metric.label.to_lowercase()) {
                    out.push(metric);
                }
            }
        }
    }
}

/// Extract ranked chart candidates from relevance-gated lines
pub fn extract_metrics(table: &PatternTable, lines: &[&str]) -> Vec<CandidateMetric> {
    let mut seen = HashSet::new();
    let mut metrics = Vec::new();

    let items = lines.iter().flat_map(|line| table.list_items(line));
    collect(table, &table.prioritized, items, STRICT_LABEL, &mut seen, &mut metrics);
    debug!(found = metrics.len(), "Prioritized metric pass");

    if metrics.len() < 2 {
        collect(
            table,
            &table.generic,
            lines.iter().copied(),
            RELAXED_LABEL,
            &mut seen,
            &mut metrics,
        );
        debug!(found = metrics.len(), "Generic metric pass");
    }

    rank_by(&mut metrics, |m| (m.priority, m.value));
    metrics.truncate(MAX_METRICS);
    metrics
}
