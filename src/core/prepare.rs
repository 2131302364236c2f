//! Content preparation: normalization, length gate and truncation.

use crate::domain::SizeTier;
use crate::extract::text::{collapse_whitespace, truncate_chars};

use super::error::SynthesisError;

/// Minimum normalized length accepted for synthesis
pub const MIN_CONTENT_CHARS: usize = 50;

/// Content ready for the extractors and the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedContent {
    pub text: String,
    /// Character count after normalization, before truncation
    pub normalized_chars: usize,
    pub truncated: bool,
}

/// Unify line endings, collapse whitespace within lines and drop repeated
/// blank lines.
pub fn normalize(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines: Vec<String> = Vec::new();
    for line in unified.lines() {
        let line = collapse_whitespace(line);
        if line.is_empty() && lines.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        lines.push(line);
    }

    lines.join("\n").trim().to_string()
}

/// Normalize, apply the minimum-length gate and cut to the tier's budget.
///
/// Truncation is a hard character cut; it does not look for a sentence end.
pub fn prepare(raw: &str, tier: SizeTier) -> Result<PreparedContent, SynthesisError> {
    let normalized = normalize(raw);
    let normalized_chars = normalized.chars().count();

    if normalized_chars < MIN_CONTENT_CHARS {
        return Err(SynthesisError::InputTooShort {
            actual: normalized_chars,
            minimum: MIN_CONTENT_CHARS,
        });
    }

    let budget = tier.char_budget();
    let truncated = normalized_chars > budget;
    let text = if truncated {
        truncate_chars(&normalized, budget).to_string()
    } else {
        normalized
    };

    Ok(PreparedContent {
        text,
        normalized_chars,
        truncated,
    })
}
