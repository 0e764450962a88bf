//! Deterministic auto-fixer.
//!
//! Rewrites residual module, directive and TypeScript syntax out of generated
//! code and renames common alternate component names to `Preview`. Every step
//! runs to a fixed point, so feeding the output back in applies nothing.

use regex::Regex;
use std::sync::LazyLock;

use crate::full::validate_sanitized_code;
use crate::rules::{FC_ANNOTATION, INTERFACE_HEAD, SCALAR_ANNOTATION, TYPE_ALIAS_HEAD};
use crate::types::AutoFixResult;
use crate::CANONICAL_COMPONENT;

/// Component names the fixer renames to `Preview`, highest priority first.
pub const ALTERNATE_COMPONENT_NAMES: &[&str] = &[
    "App",
    "HomePage",
    "Home",
    "LandingPage",
    "Landing",
    "Page",
    "MainPage",
    "Main",
    "Website",
    "Component",
    "Hero",
    "Dashboard",
    "Index",
];

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Invalid auto-fix regex")
}

static FENCE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^[ \t]*```[^\n]*\n?"));

static MULTILINE_IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"(?m)^[ \t]*import\s+(?:type\s+)?(?:[\w$]+\s*,\s*)?\{[^}]*\}\s*from\s*['"][^'"\n]+['"][ \t]*;?[ \t]*\n?"#)
});

static SINGLE_LINE_IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"(?m)^[ \t]*import\s+(?:type\s+)?(?:[^'"\n;]*?\s+from\s*)?['"][^'"\n]+['"][ \t]*;?[ \t]*\n?"#)
});

static REQUIRE_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"(?m)^[ \t]*(?:(?:const|let|var)\s+[^=\n]+=\s*)?require\s*\(\s*['"][^'"\n]+['"]\s*\)[ \t]*;?[ \t]*\n?"#)
});

static ANONYMOUS_DEFAULT_FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?m)^([ \t]*)export\s+default\s+(async\s+)?function\s*\(")
});

static ANONYMOUS_DEFAULT_ARROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?m)^([ \t]*)export\s+default\s+(\([^)\n]*\)\s*=>)")
});

static DEFAULT_EXPORT_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?m)^([ \t]*)export\s+default\s+((?:async\s+)?function\b|class\b)")
});

static TRAILING_DEFAULT_EXPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?m)^[ \t]*export\s+default\s+[A-Za-z_$][\w$]*[ \t]*;?[ \t]*$\n?")
});

static NAMED_EXPORT_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?m)^([ \t]*)export\s+((?:const|let|var|function|class|async|interface|type|enum)\b)")
});

static EXPORT_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"(?m)^[ \t]*export\s*(?:\{[^}]*\}|\*(?:\s+as\s+[\w$]+)?)(?:\s*from\s*['"][^'"\n]+['"])?[ \t]*;?[ \t]*\n?"#)
});

static DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"(?m)^[ \t]*['"]use (?:client|server|strict)['"][ \t]*;?[ \t]*\n?"#)
});

static MODULE_EXPORTS_OBJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?m)^[ \t]*module\.exports\s*=\s*\{[^}]*\}[ \t]*;?[ \t]*\n?")
});

static MODULE_EXPORTS_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?m)^[ \t]*(?:module\.)?exports(?:\.[\w$]+)?\s*=[^\n]*\n?")
});

static SCALAR_ANNOTATION_RE: LazyLock<Regex> = LazyLock::new(|| compile(SCALAR_ANNOTATION));

static FC_ANNOTATION_RE: LazyLock<Regex> = LazyLock::new(|| compile(FC_ANNOTATION));

static INTERFACE_HEAD_RE: LazyLock<Regex> = LazyLock::new(|| compile(INTERFACE_HEAD));

static TYPE_ALIAS_HEAD_RE: LazyLock<Regex> = LazyLock::new(|| compile(TYPE_ALIAS_HEAD));

static EXCESS_BLANK_LINES_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\n(?:[ \t]*\n){4,}"));

/// Any declaration named `Preview`, class components included.
static PREVIEW_DECLARED_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\b(?:function\s*\*?|class|const|let|var)\s+Preview\b"));

static RENAME_RES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    ALTERNATE_COMPONENT_NAMES
        .iter()
        .map(|name| {
            let pattern = format!(r"\b(function\s*\*?|class|const|let|var)(\s+){name}\b");
            (*name, compile(&pattern))
        })
        .collect()
});

/// Replace every match until the text stops changing. Returns the number of
/// replacements made.
fn replace_to_fixed_point(code: &mut String, re: &Regex, replacement: &str) -> usize {
    let mut total = 0;
    loop {
        let count = re.find_iter(code).count();
        if count == 0 {
            return total;
        }
        let replaced = re.replace_all(code, replacement).into_owned();
        if replaced == *code {
            return total;
        }
        *code = replaced;
        total += count;
    }
}

/// Accumulates fix descriptions while the code is rewritten.
struct Fixer {
    code: String,
    fixes: Vec<String>,
}

impl Fixer {
    fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
            fixes: Vec::new(),
        }
    }

    /// Apply one or more patterns as a single named step.
    fn step(
        &mut self,
        patterns: &[(&LazyLock<Regex>, &str)],
        describe: impl FnOnce(usize) -> String,
    ) {
        let count: usize = patterns
            .iter()
            .map(|(re, replacement)| replace_to_fixed_point(&mut self.code, re, replacement))
            .sum();
        if count > 0 {
            self.fixes.push(describe(count));
        }
    }

    fn rename_component(&mut self) {
        if PREVIEW_DECLARED_RE.is_match(&self.code) {
            return;
        }

        let found = RENAME_RES.iter().find(|(_, re)| re.is_match(&self.code));
        if let Some((name, re)) = found {
            let replacement = format!("${{1}}${{2}}{CANONICAL_COMPONENT}");
            self.code = re.replacen(&self.code, 1, replacement.as_str()).into_owned();
            self.fixes
                .push(format!("Renamed component '{name}' to '{CANONICAL_COMPONENT}'"));
        }
    }

    fn strip_type_blocks(&mut self) {
        let mut removed = 0;
        loop {
            match find_type_block(&self.code) {
                Some((start, end)) => {
                    self.code.replace_range(start..end, "");
                    removed += 1;
                }
                None => break,
            }
        }
        if removed > 0 {
            self.fixes
                .push(format!("Removed {removed} interface/type declaration(s)"));
        }
    }

    fn finish(self) -> AutoFixResult {
        let code = self.code.trim().to_string();
        let remaining_errors = validate_sanitized_code(&code).errors;
        AutoFixResult {
            code,
            fixes_applied: self.fixes,
            remaining_errors,
        }
    }
}

/// Locate the first removable `interface` or `type` declaration.
///
/// Declarations whose body never closes are left in place.
fn find_type_block(code: &str) -> Option<(usize, usize)> {
    let candidates = INTERFACE_HEAD_RE
        .find_iter(code)
        .map(|m| (m.start(), m.end(), true))
        .chain(TYPE_ALIAS_HEAD_RE.find_iter(code).map(|m| (m.start(), m.end(), false)));

    candidates
        .filter_map(|(start, head_end, is_interface)| {
            let body_end = if is_interface {
                let open = head_end + code[head_end..].find('{')?;
                matching_brace(code, open)? + 1
            } else {
                type_alias_end(code, head_end)?
            };
            Some((start, consume_terminator(code, body_end)))
        })
        .min()
}

/// Byte index of the `}` matching the `{` at `open`.
fn matching_brace(code: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, c) in code[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// End of a type alias body starting at `from` (just after the `=`).
///
/// The alias ends at a `;` outside nested delimiters, or at a line break
/// outside nested delimiters when the next line does not continue a union or
/// intersection.
fn type_alias_end(code: &str, from: usize) -> Option<usize> {
    let mut depth = 0i32;
    let mut seen_content = false;

    for (offset, c) in code[from..].char_indices() {
        let at = from + offset;
        match c {
            '{' | '(' | '[' | '<' => depth += 1,
            '}' | ')' | ']' => depth -= 1,
            '>' if !code[..at].ends_with('=') => depth -= 1,
            ';' if depth <= 0 => return Some(at + 1),
            '\n' if depth <= 0 && seen_content => {
                let next = code[at + 1..].trim_start();
                if !(next.starts_with('|') || next.starts_with('&')) {
                    return Some(at);
                }
            }
            _ => {}
        }
        if !c.is_whitespace() && c != '|' && c != '&' {
            seen_content = true;
        }
    }

    (depth <= 0 && seen_content).then_some(code.len())
}

/// Extend `end` over a trailing `;` and the rest of the line break.
fn consume_terminator(code: &str, mut end: usize) -> usize {
    let rest = &code[end..];
    let trimmed = rest.trim_start_matches([' ', '\t']);
    let mut skipped = rest.len() - trimmed.len();
    let mut trimmed = trimmed;
    if let Some(after) = trimmed.strip_prefix(';') {
        skipped += 1;
        trimmed = after;
    }
    if trimmed.starts_with('\n') {
        skipped += 1;
    } else if trimmed.starts_with("\r\n") {
        skipped += 2;
    }
    end += skipped;
    end
}

/// Mechanically repair `code` and re-validate the result.
pub fn auto_fix_code(code: &str) -> AutoFixResult {
    let mut fixer = Fixer::new(code);

    fixer.step(&[(&FENCE_LINE_RE, "")], |_| {
        "Removed markdown code fences".to_string()
    });
    fixer.step(&[(&MULTILINE_IMPORT_RE, "")], |n| {
        format!("Removed {n} destructured import statement(s)")
    });
    fixer.step(&[(&SINGLE_LINE_IMPORT_RE, "")], |n| {
        format!("Removed {n} import statement(s)")
    });
    fixer.step(&[(&REQUIRE_RE, "")], |n| {
        format!("Removed {n} require() call(s)")
    });
    fixer.step(
        &[
            (&ANONYMOUS_DEFAULT_FUNCTION_RE, "${1}${2}function Preview("),
            (&ANONYMOUS_DEFAULT_ARROW_RE, "${1}const Preview = ${2}"),
            (&DEFAULT_EXPORT_PREFIX_RE, "${1}${2}"),
            (&TRAILING_DEFAULT_EXPORT_RE, ""),
        ],
        |n| format!("Removed {n} default export(s)"),
    );
    fixer.step(&[(&NAMED_EXPORT_PREFIX_RE, "${1}${2}")], |n| {
        format!("Removed {n} named export prefix(es)")
    });
    fixer.step(&[(&EXPORT_BLOCK_RE, "")], |n| {
        format!("Removed {n} export block(s)")
    });
    fixer.step(&[(&DIRECTIVE_RE, "")], |n| {
        format!("Removed {n} directive(s)")
    });
    fixer.step(
        &[(&MODULE_EXPORTS_OBJECT_RE, ""), (&MODULE_EXPORTS_LINE_RE, "")],
        |n| format!("Removed {n} module export assignment(s)"),
    );
    fixer.rename_component();
    fixer.step(
        &[(&SCALAR_ANNOTATION_RE, "${1}${2}"), (&FC_ANNOTATION_RE, "${1}")],
        |n| format!("Removed {n} type annotation(s)"),
    );
    fixer.strip_type_blocks();
    fixer.step(&[(&EXCESS_BLANK_LINES_RE, "\n\n\n")], |_| {
        "Collapsed excess blank lines".to_string()
    });

    fixer.finish()
}

/// Validate first; only run the fixer when the code is not already valid.
pub fn validate_and_fix(code: &str) -> AutoFixResult {
    let validation = validate_sanitized_code(code);
    if validation.valid {
        return AutoFixResult {
            code: code.to_string(),
            fixes_applied: Vec::new(),
            remaining_errors: Vec::new(),
        };
    }
    auto_fix_code(code)
}
