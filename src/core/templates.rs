//! Fixed report text.
//!
//! These sections are not derived from the document or the model. They are
//! kept as named templates so a generated version can replace them later.

/// Body of the "Strategic Insights" section
pub const STRATEGIC_INSIGHTS_TEMPLATE: &str = "\
- Prioritize the initiatives with the highest reported progress to secure early results.
- Review items with low completion rates and confirm owners, scope and deadlines.
- Align stakeholders on the current status before committing new resources.";

/// Body of the "Next Actions" section
pub const NEXT_ACTIONS_TEMPLATE: &str = "\
1. Validate the figures above with the responsible teams.
2. Define owners and target dates for every open item.
3. Schedule a follow-up review to track progress against this report.";

/// Analysis text used when no narrative could be generated
pub const FALLBACK_ANALYSIS_TEMPLATE: &str = "\
An automated narrative could not be generated for this document. The summary above \
reproduces its opening sentences. Review the full document for figures, deadlines and \
responsibilities before making decisions based on this report.";

/// Text shown in the data section when nothing was extracted
pub const NO_DATA_TEMPLATE: &str = "No structured data was identified in the document.";
