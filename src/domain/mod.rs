//! Domain types for the report engine.
//!
//! This module contains the core data structures:
//! - Request: Input document, size tier and options
//! - Facts: Deterministically extracted facts
//! - Report: Final report and chart descriptor

pub mod facts;
pub mod report;
pub mod request;

// Re-export commonly used types
pub use facts::{
    CandidateMetric, Category, CategoryFact, ContextualFact, DateFact, ExtractedFacts, Fact,
};
pub use report::{ChartDescriptor, ReportPath, ReportResult};
pub use request::{content_fingerprint, ReportOptions, ReportRequest, SizeTier};
