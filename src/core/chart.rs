//! Chart descriptor synthesis from ranked metrics.

use crate::domain::{CandidateMetric, ChartDescriptor};
use crate::extract::metrics::MAX_METRICS;

pub const CHART_TYPE: &str = "bar";
pub const CHART_TITLE: &str = "Key Percentages";
pub const CHART_DESCRIPTION: &str =
    "Percentages identified in the document, ordered by extraction confidence and value.";

/// Minimum number of metrics for a chart to be worth rendering
pub const MIN_CHART_METRICS: usize = 2;

/// Build a bar chart from already-ranked metrics; `None` below two metrics.
pub fn synthesize_chart(metrics: &[CandidateMetric]) -> Option<ChartDescriptor> {
    if metrics.len() < MIN_CHART_METRICS {
        return None;
    }

    let selected = &metrics[..metrics.len().min(MAX_METRICS)];

    Some(ChartDescriptor {
        chart_type: CHART_TYPE.to_string(),
        values: selected.iter().map(|m| m.value).collect(),
        labels: selected.iter().map(|m| m.label.clone()).collect(),
        title: CHART_TITLE.to_string(),
        description: CHART_DESCRIPTION.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(label: &str, value: u8) -> CandidateMetric {
        CandidateMetric {
            label: label.to_string(),
            value,
            priority: 10,
        }
    }

    #[test]
    fn test_needs_two_metrics() {
        assert!(synthesize_chart(&[]).is_none());
        assert!(synthesize_chart(&[metric("Data migration", 85)]).is_none());
    }

    #[test]
    fn test_keeps_ranked_order() {
        let chart =
            synthesize_chart(&[metric("Data migration", 85), metric("User training", 40)]).unwrap();
        assert_eq!(chart.chart_type, "bar");
        assert_eq!(chart.values, vec![85, 40]);
        assert_eq!(chart.labels, vec!["Data migration", "User training"]);
        assert_eq!(chart.title, CHART_TITLE);
    }

    #[test]
    fn test_capped_at_max_metrics() {
        let metrics: Vec<CandidateMetric> = (1..=12)
            .map(|i| metric(&format!("Workstream {}", i), 100 - i))
            .collect();
        let chart = synthesize_chart(&metrics).unwrap();
        assert_eq!(chart.len(), MAX_METRICS);
    }

    #[test]
    fn test_serializes_type_tag() {
        let chart =
            synthesize_chart(&[metric("Alpha stream", 10), metric("Beta stream", 20)]).unwrap();
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["type"], "bar");
    }
}
