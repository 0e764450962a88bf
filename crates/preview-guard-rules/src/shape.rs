//! Cheap heuristic gate run before any call to the transformation service.

use regex::Regex;
use std::sync::LazyLock;

static DECLARATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    // function Button(...) | const Button = ... | const Button: FC = ...
    Regex::new(r"\bfunction\s*\*?\s*[A-Z][\w$]*\s*[(<]|\b(?:const|let|var)\s+[A-Z][\w$]*\s*[:=]")
        .expect("Invalid declaration regex")
});

static MARKUP_RE: LazyLock<Regex> = LazyLock::new(|| {
    // <div ...>, <Button/>, <motion.div>, and fragments <>
    Regex::new(r"<(?:[A-Za-z][\w.-]*(?:\s|/?>)|>)").expect("Invalid markup regex")
});

static MARKUP_RETURN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\breturn\s*\(?\s*<[A-Za-z>]").expect("Invalid markup return regex")
});

/// Which pieces of component evidence were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShapeReport {
    /// A capitalised function or constant declaration
    pub has_declaration: bool,

    /// At least one markup-like tag
    pub has_markup: bool,

    /// A `return` whose expression starts with a tag
    pub has_markup_return: bool,
}

impl ShapeReport {
    /// All three pieces of evidence are present.
    pub fn is_component(&self) -> bool {
        self.has_declaration && self.has_markup && self.has_markup_return
    }

    /// Human-readable reasons the gate failed. Empty when it passed.
    pub fn missing(&self) -> Vec<String> {
        let mut reasons = Vec::new();
        if !self.has_declaration {
            reasons.push("No component declaration found".to_string());
        }
        if !self.has_markup {
            reasons.push("No JSX elements found".to_string());
        }
        if !self.has_markup_return {
            reasons.push("No return statement with JSX found".to_string());
        }
        reasons
    }
}

/// Collect the shape evidence for `source`.
pub fn inspect_shape(source: &str) -> ShapeReport {
    ShapeReport {
        has_declaration: DECLARATION_RE.is_match(source),
        has_markup: MARKUP_RE.is_match(source),
        has_markup_return: MARKUP_RETURN_RE.is_match(source),
    }
}

/// Does the text plausibly contain a React component?
pub fn looks_like_react_code(source: &str) -> bool {
    inspect_shape(source).is_component()
}
