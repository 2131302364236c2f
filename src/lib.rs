//! execbrief - Executive report synthesis engine
//!
//! Turns plain text extracted from a business document into an executive
//! report that combines a model-written narrative with facts mined
//! deterministically from the text.
//!
//! # Architecture
//!
//! - Extraction never depends on the model: percentages with labels and
//!   context, status/situation/responsible values, dates and recurring themes
//! - Generation goes through a lazily loaded, shared model cell
//! - When generation fails the engine returns a deterministic fallback
//!   report instead of an error
//!
//! # Modules
//!
//! - `adapters`: Generator backends (HTTP, local command) and the model cell
//! - `core`: Request pipeline (prepare, prompt, format, chart, engine)
//! - `domain`: Data structures (requests, facts, results)
//! - `extract`: Deterministic fact and theme extraction
//! - `history`: Saved report store used by the CLI
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Synthesize a report
//! execbrief report --input status.txt --tier short
//!
//! # Inspect the extracted facts only
//! cat status.txt | execbrief facts
//!
//! # Save and list reports
//! execbrief report -i status.txt --save "Weekly status" --tags ops
//! execbrief history list
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod extract;
pub mod history;

// Re-export main types at crate root for convenience
pub use adapters::{Generator, GeneratorLoader, ModelCell, ModelStatus, SamplingConfig};
pub use core::{ReportEngine, SynthesisError};
pub use domain::{
    CandidateMetric, ChartDescriptor, ExtractedFacts, Fact, ReportOptions, ReportPath,
    ReportRequest, ReportResult, SizeTier,
};
pub use extract::Vocabulary;
pub use history::{ReportHistory, SavedReport};
