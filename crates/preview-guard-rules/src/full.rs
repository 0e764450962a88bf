//! Full rule-table validation.

use regex::Regex;
use std::sync::LazyLock;

use crate::balance::{code_skeleton, scan_balance};
use crate::line_of;
use crate::minimal::{has_preview_declaration, MIN_CODE_LENGTH};
use crate::rules::RULES;
use crate::types::{ErrorKind, ValidationError, ValidationResult};

static COMPONENT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:function|class|const|let|var)\s+([A-Z][\w$]*)")
        .expect("Invalid component name regex")
});

/// First capitalised declaration in `code`.
pub fn primary_component_name(code: &str) -> Option<String> {
    COMPONENT_NAME_RE
        .captures(code)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Check `code` against every forbidden-pattern rule, delimiter balance and
/// minimum length.
///
/// A missing `Preview` declaration is only a warning here; the auto-fixer can
/// usually rename the component.
pub fn validate_sanitized_code(code: &str) -> ValidationResult {
    let mut errors = Vec::new();

    for rule in RULES.iter() {
        for m in rule.pattern.find_iter(code) {
            errors.push(ValidationError::new(
                rule.kind,
                rule.message,
                Some(line_of(code, m.start())),
            ));
        }
    }

    for message in scan_balance(code).describe(true) {
        errors.push(ValidationError::new(ErrorKind::Syntax, message, None));
    }

    if code_skeleton(code).trim().len() < MIN_CODE_LENGTH {
        errors.push(ValidationError::new(
            ErrorKind::Syntax,
            "Code is too short or empty",
            None,
        ));
    }

    let mut warnings = Vec::new();
    if !has_preview_declaration(code) {
        warnings.push(match primary_component_name(code) {
            Some(name) => format!("Component is named '{name}', expected 'Preview'"),
            None => "No component declaration named 'Preview' found".to_string(),
        });
    }

    ValidationResult {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}
