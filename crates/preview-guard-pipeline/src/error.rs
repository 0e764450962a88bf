//! Error taxonomy for the sanitization pipeline.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bline (\d+)\b").expect("Invalid line reference regex"));

/// Fixed error code carried by every terminal failure.
pub const SANITIZATION_FAILED: &str = "SANITIZATION_FAILED";

/// Errors raised by a [`CodeTransformer`](crate::CodeTransformer).
#[derive(Debug, thiserror::Error)]
pub enum TransformerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("API key not set: environment variable {0} is empty")]
    MissingApiKey(String),

    #[error("{0}")]
    Other(String),
}

/// Why a single attempt did not produce a usable component.
///
/// None of these are terminal on their own; they drive the next retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttemptFailure {
    #[error("Empty response from transformation service")]
    EmptyResponse,

    #[error("Output truncated by length limit")]
    Truncated,

    #[error("Validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),

    #[error("Transformation service error: {0}")]
    ServiceError(String),
}

impl AttemptFailure {
    /// The warning list this attempt contributes to the next prompt.
    pub fn into_warnings(self) -> Vec<String> {
        match self {
            Self::ValidationFailed(errors) => errors,
            other => vec![other.to_string()],
        }
    }
}

/// Terminal failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The shape gate rejected the input before any service call
    ShapeRejected,

    /// Every attempt failed
    Exhausted,
}

/// Terminal failure surfaced once the pipeline gives up.
///
/// Callers must not render anything when they receive this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct SanitizationError {
    pub message: String,
    pub code: &'static str,
    pub kind: FailureKind,

    /// Diagnostics from the last attempt only
    pub details: Vec<String>,
    pub attempts: u32,
    pub debug_info: String,
}

impl SanitizationError {
    /// The input does not look like a component; nothing was sent.
    pub fn shape_rejected(reasons: Vec<String>) -> Self {
        Self {
            message: "Input does not look like a React component".to_string(),
            code: SANITIZATION_FAILED,
            kind: FailureKind::ShapeRejected,
            details: reasons,
            attempts: 0,
            debug_info: "Rejected by shape check before transformation".to_string(),
        }
    }

    /// All attempts were used up.
    pub fn exhausted(attempts: u32, details: Vec<String>, debug_info: String) -> Self {
        Self {
            message: format!("Code sanitization failed after {attempts} attempt(s)"),
            code: SANITIZATION_FAILED,
            kind: FailureKind::Exhausted,
            details,
            attempts,
            debug_info,
        }
    }

    /// First `line N` reference in the details, if any.
    pub fn line(&self) -> Option<usize> {
        self.details.iter().find_map(|detail| {
            LINE_RE
                .captures(detail)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse().ok())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failure_keeps_errors_verbatim() {
        let failure = AttemptFailure::ValidationFailed(vec!["a".into(), "b".into()]);
        assert_eq!(failure.into_warnings(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn other_failures_become_single_warning() {
        assert_eq!(
            AttemptFailure::Truncated.into_warnings(),
            vec!["Output truncated by length limit".to_string()]
        );
        assert_eq!(
            AttemptFailure::ServiceError("timeout".into()).into_warnings(),
            vec!["Transformation service error: timeout".to_string()]
        );
    }

    #[test]
    fn shape_rejection_has_zero_attempts() {
        let error = SanitizationError::shape_rejected(vec!["No JSX elements found".into()]);
        assert_eq!(error.attempts, 0);
        assert_eq!(error.code, SANITIZATION_FAILED);
        assert_eq!(error.kind, FailureKind::ShapeRejected);
    }

    #[test]
    fn extracts_line_from_details() {
        let error = SanitizationError::exhausted(
            2,
            vec![
                "Missing component declaration named 'Preview'".into(),
                "Dangerous eval() call found at line 14".into(),
            ],
            String::new(),
        );
        assert_eq!(error.line(), Some(14));
    }

    #[test]
    fn serializes_camel_case() {
        let error = SanitizationError::exhausted(2, vec![], "finish_reason=stop".into());
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["code"], "SANITIZATION_FAILED");
        assert_eq!(json["debugInfo"], "finish_reason=stop");
        assert_eq!(json["kind"], "exhausted");
    }
}
