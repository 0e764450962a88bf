//! Rule-based validation for generated preview components.
//!
//! This crate holds the deterministic half of the sanitization pipeline: a
//! comment- and template-aware delimiter scanner, the cheap shape gate, the
//! minimal validator used inside the retry loop, and the full validator with
//! its mechanical auto-fixer.

pub mod balance;
pub mod fix;
pub mod full;
pub mod minimal;
pub mod rules;
pub mod shape;
pub mod types;

pub use balance::{code_skeleton, scan_balance, DelimiterBalance};
pub use fix::{auto_fix_code, validate_and_fix, ALTERNATE_COMPONENT_NAMES};
pub use full::validate_sanitized_code;
pub use minimal::{
    has_preview_declaration, strip_end_sentinel, strip_markdown_fences, validate_minimal,
    MIN_CODE_LENGTH,
};
pub use rules::{Rule, RULES};
pub use shape::{inspect_shape, looks_like_react_code, ShapeReport};
pub use types::{
    AutoFixResult, ErrorKind, MinimalValidationResult, ValidationError, ValidationResult,
};

/// Name of the component the rendering sandbox mounts.
pub const CANONICAL_COMPONENT: &str = "Preview";

/// 1-based line number of a byte offset.
pub(crate) fn line_of(source: &str, offset: usize) -> usize {
    source[..offset.min(source.len())].matches('\n').count() + 1
}
