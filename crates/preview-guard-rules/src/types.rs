//! Validation result types shared by the validators and the auto-fixer.

use serde::{Deserialize, Serialize};

/// Category of a full-validator finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Import,
    Export,
    Directive,
    TypescriptAnnotation,
    Dangerous,
    Syntax,
    Markdown,
}

impl ErrorKind {
    /// Whether the auto-fixer knows how to remove this kind of finding.
    pub fn is_fixable(&self) -> bool {
        !matches!(self, Self::Dangerous | Self::Syntax)
    }
}

/// A single finding from the full validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    #[serde(rename = "type")]
    pub kind: ErrorKind,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,

    pub fixable: bool,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, line: Option<usize>) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            fixable: kind.is_fixable(),
        }
    }
}

/// Output of the full validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,

    /// Non-blocking observations
    pub warnings: Vec<String>,
}

/// Output of the deterministic repair pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoFixResult {
    pub code: String,

    /// One entry per fix step that changed the code
    pub fixes_applied: Vec<String>,

    /// Findings left after re-validating the fixed code
    pub remaining_errors: Vec<ValidationError>,
}

/// Output of the minimal validator used inside the retry loop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinimalValidationResult {
    pub valid: bool,
    pub has_critical_errors: bool,
    pub errors: Vec<String>,

    /// Input with markdown fences and the end sentinel stripped
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixability_follows_kind() {
        assert!(ErrorKind::Import.is_fixable());
        assert!(ErrorKind::TypescriptAnnotation.is_fixable());
        assert!(ErrorKind::Markdown.is_fixable());
        assert!(!ErrorKind::Dangerous.is_fixable());
        assert!(!ErrorKind::Syntax.is_fixable());
    }

    #[test]
    fn serializes_error_with_type_tag() {
        let error =
            ValidationError::new(ErrorKind::TypescriptAnnotation, "Type alias found", Some(3));
        let json = serde_json::to_value(&error).unwrap();

        assert_eq!(json["type"], "typescript-annotation");
        assert_eq!(json["line"], 3);
        assert_eq!(json["fixable"], true);
    }

    #[test]
    fn serializes_fix_result_in_camel_case() {
        let json = serde_json::to_string(&AutoFixResult::default()).unwrap();
        assert!(json.contains("fixesApplied"));
        assert!(json.contains("remainingErrors"));
    }
}
