//! Single-valued category facts and calendar dates.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use super::patterns::PatternTable;
use super::text::{collapse_whitespace, has_alpha_run, truncate_chars};
use crate::domain::{CategoryFact, DateFact};

pub const MAX_CATEGORY_CHARS: usize = 150;

/// More distinct dates than this marks the input as noise
pub const MAX_DATES: usize = 10;

/// First acceptable match per category, in category order
pub fn extract_categories(table: &PatternTable, lines: &[&str]) -> Vec<CategoryFact> {
    let mut found: Vec<CategoryFact> = Vec::new();

    for line in lines {
        for (category, regex) in table.categories() {
            if found.iter().any(|f| f.category == *category) {
                continue;
            }
            let Some(value) = regex.captures(line).and_then(|c| c.name("value")) else {
                continue;
            };

            let value = collapse_whitespace(value.as_str());
            let value = truncate_chars(&value, MAX_CATEGORY_CHARS).trim_end().to_string();
            if has_alpha_run(&value, 3) {
                found.push(CategoryFact {
                    category: *category,
                    value,
                });
            }
        }
    }

    found.sort_by_key(|f| f.category);
    found
}

/// Validate a day/month/year triple; two-digit years are read as 20xx
fn is_calendar_date(day: &str, month: &str, year: &str) -> bool {
    let (Ok(day), Ok(month), Ok(mut year)) =
        (day.parse::<u32>(), month.parse::<u32>(), year.parse::<i32>())
    else {
        return false;
    };
    if year < 100 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month, day).is_some()
}

/// Distinct dates in order of appearance; all dropped when there are too many
pub fn extract_dates(table: &PatternTable, lines: &[&str]) -> Vec<DateFact> {
    let mut seen = HashSet::new();
    let mut dates = Vec::new();

    for line in lines {
        for caps in table.date.captures_iter(line) {
            let (Some(raw), Some(day), Some(month), Some(year)) = (
                caps.get(0),
                caps.name("day"),
                caps.name("month"),
                caps.name("year"),
            ) else {
                continue;
            };
            if !is_calendar_date(day.as_str(), month.as_str(), year.as_str()) {
                continue;
            }
            if seen.insert(raw.as_str().to_string()) {
                dates.push(DateFact {
                    raw: raw.as_str().to_string(),
                });
            }
        }
    }

    if dates.len() > MAX_DATES {
        debug!(count = dates.len(), "Too many dates, discarding date category");
        return Vec::new();
    }

    dates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use crate::extract::Vocabulary;

    fn table() -> PatternTable {
        PatternTable::compile(&Vocabulary::default()).unwrap()
    }

    #[test]
    fn test_first_status_wins() {
        let table = table();
        let lines = [
            "Status: In Progress",
            "Owner: Maria Silva",
            "Status: Done",
            "Situação: Dentro do prazo",
        ];
        let facts = extract_categories(&table, &lines);

        assert_eq!(facts.len(), 3);
        assert_eq!(facts[0].category, Category::Status);
        assert_eq!(facts[0].value, "In Progress");
        assert_eq!(facts[1].category, Category::Situation);
        assert_eq!(facts[1].value, "Dentro do prazo");
        assert_eq!(facts[2].category, Category::Responsible);
        assert_eq!(facts[2].value, "Maria Silva");
    }

    #[test]
    fn test_category_value_needs_letters_and_is_capped() {
        let table = table();
        let long = format!("Responsible: {}", "Team ".repeat(60));
        let facts = extract_categories(&table, &["Status: 12/3", long.as_str(), "Status: On hold"]);

        assert_eq!(facts[0].value, "On hold");
        assert!(facts[1].value.chars().count() <= MAX_CATEGORY_CHARS);
    }

    #[test]
    fn test_dates_are_validated_and_deduplicated() {
        let table = table();
        let lines = [
            "Kickoff on 05/02/2024 and review on 5.3.24",
            "Kickoff confirmed for 05/02/2024",
            "Invalid 31/02/2024 and 45/13/2024",
        ];
        let dates = extract_dates(&table, &lines);
        let raw: Vec<&str> = dates.iter().map(|d| d.raw.as_str()).collect();
        assert_eq!(raw, vec!["05/02/2024", "5.3.24"]);
    }

    #[test]
    fn test_too_many_dates_drop_category() {
        let table = table();
        let owned: Vec<String> = (1..=11)
            .map(|d| format!("Milestone on {:02}/06/2024", d))
            .collect();
        let lines: Vec<&str> = owned.iter().map(String::as_str).collect();
        assert!(extract_dates(&table, &lines).is_empty());

        assert_eq!(extract_dates(&table, &lines[..10]).len(), 10);
    }
}
