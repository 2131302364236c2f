//! Report synthesis.
//!
//! This module contains:
//! - Prepare: normalization, length gate and truncation
//! - Prompt: instruction payload for the generator
//! - Format: generated and fallback report assembly
//! - Chart: chart descriptor from ranked metrics
//! - Engine: the request pipeline tying them together

pub mod chart;
pub mod engine;
pub mod error;
pub mod format;
pub mod prepare;
pub mod prompt;
pub mod templates;

pub use chart::synthesize_chart;
pub use engine::ReportEngine;
pub use error::SynthesisError;
pub use prepare::{normalize, prepare, PreparedContent, MIN_CONTENT_CHARS};
pub use templates::{FALLBACK_ANALYSIS_TEMPLATE, NEXT_ACTIONS_TEMPLATE, STRATEGIC_INSIGHTS_TEMPLATE};
