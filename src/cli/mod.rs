//! Command-line interface for execbrief.
//!
//! Provides commands for synthesizing reports, inspecting extracted facts,
//! managing saved reports and checking the generator backend.

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;

use crate::adapters::{ModelCell, ModelStatus};
use crate::config;
use crate::core::{normalize, synthesize_chart, ReportEngine};
use crate::domain::{ChartDescriptor, ReportOptions, ReportRequest, SizeTier};
use crate::history::{ReportHistory, SavedReport};

pub mod history;

/// execbrief - Executive report synthesis from document text
#[derive(Parser, Debug)]
#[command(name = "execbrief")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synthesize an executive report
    Report {
        /// Input text file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Report length and detail
        #[arg(short, long, value_enum, default_value = "medium")]
        tier: TierArg,

        /// Additional focus for the analysis
        #[arg(short, long)]
        focus: Option<String>,

        /// Skip the chart descriptor
        #[arg(long)]
        no_chart: bool,

        /// Skip the Strategic Insights and Next Actions sections
        #[arg(long)]
        no_insights: bool,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,

        /// Save the report to history with this label
        #[arg(short, long)]
        save: Option<String>,

        /// Tags to apply when saving (comma-separated)
        #[arg(long)]
        tags: Option<String>,
    },

    /// Print the deterministically extracted facts as JSON
    Facts {
        /// Input text file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Manage saved reports
    History {
        #[command(subcommand)]
        command: history::HistoryCommands,
    },

    /// Show resolved configuration (debug)
    Config,

    /// Load the generator and check that it responds
    Health,
}

/// Size tier for CLI (maps to SizeTier)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TierArg {
    VeryShort,
    Short,
    Medium,
    Long,
    Detailed,
}

impl From<TierArg> for SizeTier {
    fn from(t: TierArg) -> Self {
        match t {
            TierArg::VeryShort => SizeTier::VeryShort,
            TierArg::Short => SizeTier::Short,
            TierArg::Medium => SizeTier::Medium,
            TierArg::Long => SizeTier::Long,
            TierArg::Detailed => SizeTier::Detailed,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Report {
                input,
                tier,
                focus,
                no_chart,
                no_insights,
                json,
                save,
                tags,
            } => {
                let options = ReportOptions {
                    include_chart: !no_chart,
                    include_insights: !no_insights,
                };
                run_report(input, tier.into(), focus, options, json, save, tags).await
            }
            Commands::Facts { input } => show_facts(input).await,
            Commands::History { command } => command.execute().await,
            Commands::Config => show_config(),
            Commands::Health => check_health().await,
        }
    }
}

/// Read input from a file or piped stdin
fn read_input(input_file: Option<&Path>) -> Result<String> {
    let input = if let Some(path) = input_file {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?
    } else if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        buffer
    } else {
        String::new()
    };

    if input.trim().is_empty() {
        anyhow::bail!("No input provided. Use --input <file> or pipe text to stdin");
    }

    Ok(input)
}

fn parse_tags(tags: Option<String>) -> Vec<String> {
    tags.map(|s| {
        s.split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

async fn run_report(
    input_file: Option<PathBuf>,
    tier: SizeTier,
    focus: Option<String>,
    options: ReportOptions,
    as_json: bool,
    save_label: Option<String>,
    tags: Option<String>,
) -> Result<()> {
    let content = read_input(input_file.as_deref())?;
    let cfg = config::config()?;
    let engine = ReportEngine::from_config(cfg)?;

    let mut request = ReportRequest::new(content, tier).with_options(options);
    if let Some(focus) = focus {
        request = request.with_focus(focus);
    }

    let result = engine.synthesize(&request).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        if result.is_fallback() {
            eprintln!("Generator unavailable; showing the basic report.\n");
        }
        println!("{}", result.narrative);
        if let Some(ref chart) = result.chart {
            println!("\n{}", render_chart(chart));
        }
    }

    if let Some(label) = save_label {
        let mut report = SavedReport::new(&label, &result.narrative, tier)
            .with_tags(parse_tags(tags))
            .with_focus(request.focus().map(str::to_string))
            .with_source_text(&request.content);
        if let Some(name) = input_file
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
        {
            report = report.with_source_file(name);
        }

        let mut history = ReportHistory::load().await?;
        let id = report.id.clone();
        history.add(report);
        history.save().await?;

        eprintln!("\nSaved to history");
        eprintln!("   ID: {}", id);
        eprintln!("   Label: {}", label);
    }

    Ok(())
}

/// Plain-text bars for terminal output
fn render_chart(chart: &ChartDescriptor) -> String {
    let width = chart
        .labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = format!("{}\n", chart.title);
    for (label, value) in chart.labels.iter().zip(&chart.values) {
        let bar = "#".repeat((usize::from(*value) + 3) / 4);
        out.push_str(&format!("  {:<width$}  {:<25} {:>3}%\n", label, bar, value, width = width));
    }
    out.push_str(&chart.description);
    out
}

async fn show_facts(input_file: Option<PathBuf>) -> Result<()> {
    let content = read_input(input_file.as_deref())?;
    let cfg = config::config()?;
    let engine = ReportEngine::from_config(cfg)?;

    let (facts, themes) = engine.analyze(&normalize(&content));
    let chart = synthesize_chart(&facts.metrics);

    let output = json!({
        "facts": facts,
        "tagged": facts.facts(),
        "themes": themes,
        "chart": chart,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("execbrief configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:     {}", cfg.home.display());
    println!("  History:  {}", cfg.history.display());
    println!(
        "  Vocabulary: {}",
        cfg.vocabulary_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(built-in)".to_string())
    );
    println!();
    println!("Generator:");
    println!("{}", serde_yaml::to_string(&cfg.generator)?.trim_end());
    println!();
    println!("Model load retry:");
    println!("  Initial delay: {}ms", cfg.model_load.initial_delay_ms);
    println!("  Max delay:     {}ms", cfg.model_load.max_delay_ms);
    println!("  Multiplier:    {}", cfg.model_load.backoff_multiplier);

    Ok(())
}

async fn check_health() -> Result<()> {
    let cfg = config::config()?;
    let cell = ModelCell::shared(&cfg.generator, &cfg.model_load);

    eprintln!("Checking {:?} generator ({})...", cfg.generator.backend, cfg.generator.model);
    cell.get().await?;

    match cell.status() {
        ModelStatus::Ready => println!("Generator ready"),
        other => println!("Generator status: {:?}", other),
    }

    Ok(())
}
