//! Forbidden-pattern rule table.
//!
//! Every rule is one regular expression tied to an [`ErrorKind`]. The full
//! validator reports each match; the minimal validator reuses the dangerous
//! rules. Patterns that the auto-fixer also rewrites are shared as constants
//! so detection and repair cannot drift apart.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::ErrorKind;

/// Scalar annotations: `name: string`, `flag?: boolean`, `(): void =>`.
/// Group 1 is the preceding token, group 2 the following delimiter.
pub(crate) const SCALAR_ANNOTATION: &str = r"([\w$\])])\??[ \t]*:[ \t]*(?:string|number|boolean|any|void|unknown)(?:\[\])?([ \t]*[,)=;{])";

/// `const App: React.FC<Props> = ...`. Group 1 is the assignment.
pub(crate) const FC_ANNOTATION: &str =
    r":[ \t]*(?:React\.)?(?:FC|FunctionComponent|VFC)\b(?:<[^>\n]*>)?([ \t]*=)";

pub(crate) const INTERFACE_HEAD: &str =
    r"(?m)^[ \t]*(?:export\s+)?(?:declare\s+)?interface\s+[A-Za-z_$][\w$]*";

pub(crate) const TYPE_ALIAS_HEAD: &str =
    r"(?m)^[ \t]*(?:export\s+)?type\s+[A-Za-z_$][\w$]*(?:<[^>\n]*>)?\s*=";

/// A single forbidden pattern.
#[derive(Debug)]
pub struct Rule {
    pub kind: ErrorKind,
    pub message: &'static str,
    pub pattern: Regex,
}

impl Rule {
    fn new(kind: ErrorKind, message: &'static str, pattern: &str) -> Self {
        Self {
            kind,
            message,
            pattern: Regex::new(pattern).expect("Invalid rule regex"),
        }
    }
}

/// All forbidden patterns, in reporting order.
pub static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        // Imports: bare, destructured (possibly multi-line), side-effect
        Rule::new(
            ErrorKind::Import,
            "Import statement found",
            r#"(?m)^[ \t]*import\b(?:\s+type)?\s*(?:[^'";]*?\s*from\s*)?['"][^'"\n]+['"]"#,
        ),
        Rule::new(
            ErrorKind::Import,
            "require() call found",
            r#"\brequire\s*\(\s*['"]"#,
        ),
        // Exports
        Rule::new(
            ErrorKind::Export,
            "Default export found",
            r"(?m)^[ \t]*export\s+default\b",
        ),
        Rule::new(
            ErrorKind::Export,
            "Named export found",
            r"(?m)^[ \t]*export\s+(?:const|let|var|function|class|async|interface|type|enum)\b",
        ),
        Rule::new(
            ErrorKind::Export,
            "Export block found",
            r"(?m)^[ \t]*export\s*[{*]",
        ),
        Rule::new(
            ErrorKind::Export,
            "CommonJS export found",
            r"(?m)\bmodule\.exports\b|^[ \t]*exports\.[\w$]+\s*=",
        ),
        // Execution-mode directives
        Rule::new(
            ErrorKind::Directive,
            "Directive found",
            r#"(?m)^[ \t]*['"]use (?:client|server|strict)['"]"#,
        ),
        // TypeScript-only syntax
        Rule::new(
            ErrorKind::TypescriptAnnotation,
            "Interface declaration found",
            INTERFACE_HEAD,
        ),
        Rule::new(
            ErrorKind::TypescriptAnnotation,
            "Type alias found",
            TYPE_ALIAS_HEAD,
        ),
        Rule::new(
            ErrorKind::TypescriptAnnotation,
            "Type annotation found",
            SCALAR_ANNOTATION,
        ),
        Rule::new(
            ErrorKind::TypescriptAnnotation,
            "Function component type annotation found",
            FC_ANNOTATION,
        ),
        // Dangerous constructs
        Rule::new(
            ErrorKind::Dangerous,
            "Dangerous eval() call found",
            r"\beval\s*\(",
        ),
        Rule::new(
            ErrorKind::Dangerous,
            "Dangerous Function constructor found",
            r"\bnew\s+Function\s*\(",
        ),
        Rule::new(
            ErrorKind::Dangerous,
            "Dangerous document.write() call found",
            r"\bdocument\.write(?:ln)?\s*\(",
        ),
        // Markdown
        Rule::new(
            ErrorKind::Markdown,
            "Markdown code fence found",
            r"(?m)^[ \t]*```",
        ),
    ]
});

/// Rules of a single kind.
pub fn rules_of(kind: ErrorKind) -> impl Iterator<Item = &'static Rule> {
    RULES.iter().filter(move |rule| rule.kind == kind)
}
