//! History CLI subcommands for saved reports.
//!
//! Provides commands to:
//! - `list`: Show recent reports
//! - `show`: Print a saved report
//! - `delete`: Remove a saved report
//! - `search`: Find reports by label, tag or file name

use anyhow::Result;
use clap::Subcommand;

use crate::extract::text::truncate_chars;
use crate::history::{ReportHistory, SavedReport};

/// History-related subcommands
#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// List saved reports, newest first
    List {
        /// Maximum number of reports to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Print a saved report
    Show {
        /// Report ID (or unique prefix)
        report_id: String,
    },

    /// Delete a saved report
    Delete {
        /// Report ID (or unique prefix)
        report_id: String,
    },

    /// Search saved reports
    Search {
        /// Search query
        query: String,
    },
}

impl HistoryCommands {
    pub async fn execute(self) -> Result<()> {
        match self {
            HistoryCommands::List { limit } => list_reports(limit).await,
            HistoryCommands::Show { report_id } => show_report(&report_id).await,
            HistoryCommands::Delete { report_id } => delete_report(&report_id).await,
            HistoryCommands::Search { query } => search_reports(&query).await,
        }
    }
}

fn print_table(reports: &[&SavedReport]) {
    println!("{:<10} {:<17} {:<11} {:<40}", "ID", "CREATED", "TIER", "LABEL");
    println!("{}", "-".repeat(80));

    for report in reports {
        let label = if report.label.chars().count() > 37 {
            format!("{}...", truncate_chars(&report.label, 37))
        } else {
            report.label.clone()
        };
        println!(
            "{:<10} {:<17} {:<11} {:<40}",
            truncate_chars(&report.id, 8),
            report.created_at.format("%Y-%m-%d %H:%M"),
            report.size_tier.as_str(),
            label
        );
    }
}

async fn list_reports(limit: usize) -> Result<()> {
    let history = ReportHistory::load().await?;

    if history.is_empty() {
        println!("No saved reports. Use 'execbrief report --save <label>' to keep one.");
        return Ok(());
    }

    print_table(&history.list(Some(limit)));
    println!("\nTotal: {} reports", history.len());

    Ok(())
}

async fn show_report(report_id: &str) -> Result<()> {
    let history = ReportHistory::load().await?;
    let report = history
        .get(report_id)
        .ok_or_else(|| anyhow::anyhow!("Report not found: {}", report_id))?;

    println!("ID:      {}", report.id);
    println!("Label:   {}", report.label);
    println!("Created: {}", report.created_at.to_rfc3339());
    println!("Tier:    {}", report.size_tier);
    if let Some(ref name) = report.source_file_name {
        println!("Source:  {}", name);
    }
    if !report.tags.is_empty() {
        println!("Tags:    {}", report.tags.join(", "));
    }
    if let Some(ref focus) = report.custom_focus {
        println!("Focus:   {}", focus);
    }
    if let Some(ref digest) = report.content_sha256 {
        println!("Digest:  {}", digest);
    }
    println!("{}", "-".repeat(80));
    println!("{}", report.content);

    Ok(())
}

async fn delete_report(report_id: &str) -> Result<()> {
    let mut history = ReportHistory::load().await?;
    let removed = history
        .remove(report_id)
        .ok_or_else(|| anyhow::anyhow!("Report not found: {}", report_id))?;
    history.save().await?;

    eprintln!("Deleted report {} ({})", removed.id, removed.label);
    Ok(())
}

async fn search_reports(query: &str) -> Result<()> {
    let history = ReportHistory::load().await?;
    let results = history.search(query);

    if results.is_empty() {
        println!("No results found for: {}", query);
        return Ok(());
    }

    println!("Found {} result(s) for \"{}\":\n", results.len(), query);
    print_table(&results);

    Ok(())
}
