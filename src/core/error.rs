//! Caller-visible engine failures.

use thiserror::Error;

/// Errors returned by [`crate::core::ReportEngine::synthesize`].
///
/// Generation failures never appear here; they are recovered by the
/// fallback report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    #[error("Content too short: {actual} characters after normalization (minimum {minimum})")]
    InputTooShort { actual: usize, minimum: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_names_both_lengths() {
        let err = SynthesisError::InputTooShort {
            actual: 49,
            minimum: 50,
        };
        let message = err.to_string();
        assert!(message.contains("49"));
        assert!(message.contains("50"));
    }
}
