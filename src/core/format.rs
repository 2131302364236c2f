//! Report assembly for both paths.

use crate::domain::{ExtractedFacts, Fact, ReportOptions};
use crate::extract::text::split_sentences;

use super::templates::{
    FALLBACK_ANALYSIS_TEMPLATE, NEXT_ACTIONS_TEMPLATE, NO_DATA_TEMPLATE,
    STRATEGIC_INSIGHTS_TEMPLATE,
};

/// Entries rendered per fact group in the data section
pub const MAX_ENTRIES_PER_GROUP: usize = 5;

/// Sentences reproduced by the fallback summary
pub const FALLBACK_SUMMARY_SENTENCES: usize = 5;

const SENTENCES_PER_PARAGRAPH: usize = 2;

/// Whether the text already carries headings, lists or bold markers
pub fn has_markup(text: &str) -> bool {
    text.lines().map(str::trim_start).any(|line| {
        line.starts_with('#')
            || line.starts_with("**")
            || line.starts_with("- ")
            || line.starts_with("* ")
            || line.starts_with("• ")
            || is_numbered_item(line)
    })
}

fn is_numbered_item(line: &str) -> bool {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    (1..=2).contains(&digits)
        && (line[digits..].starts_with(". ") || line[digits..].starts_with(") "))
}

/// Group sentences into paragraphs of two
pub fn paragraphs(text: &str) -> String {
    split_sentences(text)
        .chunks(SENTENCES_PER_PARAGRAPH)
        .map(|chunk| chunk.join(" "))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Merge the model narrative with the extracted facts
pub fn format_generated(
    narrative: &str,
    facts: &ExtractedFacts,
    themes: &[String],
    options: &ReportOptions,
) -> String {
    let analysis = if has_markup(narrative) {
        narrative.trim().to_string()
    } else {
        paragraphs(narrative)
    };

    let mut sections = vec![
        section("Analysis", &analysis),
        section("Data & Information", &render_data(facts, themes)),
    ];

    if options.include_insights {
        sections.push(section("Strategic Insights", STRATEGIC_INSIGHTS_TEMPLATE));
        sections.push(section("Next Actions", NEXT_ACTIONS_TEMPLATE));
    }

    sections.join("\n\n")
}

/// Deterministic report built from the content alone
pub fn build_fallback(content: &str, focus: Option<&str>) -> String {
    let summary = split_sentences(content)
        .into_iter()
        .take(FALLBACK_SUMMARY_SENTENCES)
        .collect::<Vec<_>>()
        .join(" ");

    let mut sections = Vec::with_capacity(3);
    if !summary.is_empty() {
        sections.push(section("Summary", &summary));
    }
    sections.push(section("Analysis", FALLBACK_ANALYSIS_TEMPLATE));
    if let Some(focus) = focus {
        sections.push(section("Requested Focus", focus));
    }

    sections.join("\n\n")
}

fn section(title: &str, body: &str) -> String {
    format!("## {}\n\n{}", title, body)
}

fn render_data(facts: &ExtractedFacts, themes: &[String]) -> String {
    let mut figures = Vec::new();
    let mut categories = Vec::new();
    let mut dates = Vec::new();

    for fact in facts.facts() {
        match fact {
            Fact::Percentage(f) => {
                if figures.len() < MAX_ENTRIES_PER_GROUP {
                    figures.push(format!("- **{}%**: {}", f.value, f.snippet));
                }
            }
            Fact::Category(f) => {
                categories.push(format!("- **{}**: {}", f.category.label(), f.value));
            }
            Fact::Date(d) => {
                if dates.len() < MAX_ENTRIES_PER_GROUP {
                    dates.push(format!("- {}", d.raw));
                }
            }
        }
    }

    let mut blocks = Vec::new();
    for (heading, lines) in [
        ("Key figures", figures),
        ("Status and ownership", categories),
        ("Dates", dates),
    ] {
        if !lines.is_empty() {
            blocks.push(format!("### {}\n\n{}", heading, lines.join("\n")));
        }
    }

    if !themes.is_empty() {
        blocks.push(format!("### Recurring themes\n\n{}", themes.join(", ")));
    }

    if blocks.is_empty() {
        NO_DATA_TEMPLATE.to_string()
    } else {
        blocks.join("\n\n")
    }
}
