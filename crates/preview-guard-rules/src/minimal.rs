//! Fast safety and shape checks used inside the retry loop.

use regex::Regex;
use std::sync::LazyLock;

use crate::balance::{code_skeleton, scan_balance};
use crate::line_of;
use crate::rules::rules_of;
use crate::types::{ErrorKind, MinimalValidationResult};

/// Minimum length of the comment- and string-stripped code.
pub const MIN_CODE_LENGTH: usize = 30;

static LEADING_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*```[\w+-]*[ \t]*\r?\n").expect("Invalid leading fence regex")
});

static TRAILING_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\r?\n)?[ \t]*```[ \t]*\s*$").expect("Invalid trailing fence regex")
});

static END_SENTINEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\r?\n)?[ \t]*(?://[ \t]*END OF CODE[^\n]*|/\*[ \t]*END OF CODE[ \t]*\*/)\s*$")
        .expect("Invalid end sentinel regex")
});

static PREVIEW_DECLARATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bfunction\s*\*?\s*Preview\s*[(<]|\b(?:const|let|var)\s+Preview\s*[:=]")
        .expect("Invalid Preview declaration regex")
});

/// Remove a leading and a trailing markdown code fence, if present.
pub fn strip_markdown_fences(code: &str) -> String {
    let without_leading = LEADING_FENCE_RE.replace(code, "");
    TRAILING_FENCE_RE.replace(&without_leading, "").into_owned()
}

/// Remove a trailing `// END OF CODE` sentinel comment, if present.
pub fn strip_end_sentinel(code: &str) -> String {
    END_SENTINEL_RE.replace(code, "").into_owned()
}

/// Whether `code` declares a function or constant named exactly `Preview`.
pub fn has_preview_declaration(code: &str) -> bool {
    PREVIEW_DECLARATION_RE.is_match(code)
}

/// Strip fences and the sentinel in either order until nothing changes.
fn strip_output_wrappers(code: &str) -> String {
    let mut current = code.to_string();
    loop {
        let next = strip_end_sentinel(&strip_markdown_fences(&current));
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Run every minimal check and collect all failures.
///
/// The returned `code` has fences and the sentinel stripped whether or not
/// the checks passed.
pub fn validate_minimal(code: &str) -> MinimalValidationResult {
    let code = strip_output_wrappers(code).trim().to_string();

    let mut errors = Vec::new();
    let mut critical = false;

    for rule in rules_of(ErrorKind::Dangerous) {
        for m in rule.pattern.find_iter(&code) {
            errors.push(format!("{} at line {}", rule.message, line_of(&code, m.start())));
            critical = true;
        }
    }

    let balance = scan_balance(&code);
    if !balance.is_structurally_balanced() {
        errors.extend(balance.describe(false));
        critical = true;
    }

    if !has_preview_declaration(&code) {
        errors.push("Missing component declaration named 'Preview'".to_string());
        critical = true;
    }

    let length = code_skeleton(&code).trim().len();
    if length < MIN_CODE_LENGTH {
        errors.push(format!(
            "Code is too short ({length} characters after removing comments and strings)"
        ));
    }

    MinimalValidationResult {
        valid: errors.is_empty(),
        has_critical_errors: critical,
        errors,
        code,
    }
}
