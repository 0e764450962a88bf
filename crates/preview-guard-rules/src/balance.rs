//! Delimiter balance scanning.
//!
//! The scanner walks source text once, skipping comments and string bodies,
//! and switches back into code mode for `${...}` regions inside template
//! literals. Template and interpolation frames are kept on a stack so that
//! templates nested inside interpolations resolve correctly.

use serde::Serialize;

/// Signed delimiter counts. Positive means more openers than closers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DelimiterBalance {
    pub curly: i64,
    pub paren: i64,
    pub bracket: i64,
}

impl DelimiterBalance {
    /// All three delimiter kinds are balanced.
    pub fn is_balanced(&self) -> bool {
        self.curly == 0 && self.paren == 0 && self.bracket == 0
    }

    /// Curly braces and parentheses are balanced. Brackets are ignored.
    pub fn is_structurally_balanced(&self) -> bool {
        self.curly == 0 && self.paren == 0
    }

    /// Messages for every unbalanced kind, optionally including brackets.
    pub fn describe(&self, include_brackets: bool) -> Vec<String> {
        let mut kinds = vec![("curly braces", self.curly), ("parentheses", self.paren)];
        if include_brackets {
            kinds.push(("square brackets", self.bracket));
        }

        kinds
            .into_iter()
            .filter(|(_, count)| *count != 0)
            .map(|(name, count)| {
                if count > 0 {
                    format!("Unbalanced {name}: {count} unclosed")
                } else {
                    format!("Unbalanced {name}: {} extra closing", -count)
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Code,
    LineComment,
    BlockComment,
    Quoted(char),
}

#[derive(Debug)]
enum Frame {
    Template,
    /// Open `${` region; `braces` counts plain braces opened inside it.
    Interpolation { braces: usize },
}

/// Walk `source`, handing every character that is code to `emit`.
///
/// The braces that open and close an interpolation region are structural
/// parts of the template and are never emitted.
fn walk(source: &str, mut emit: impl FnMut(char)) {
    let chars: Vec<char> = source.chars().collect();
    let mut frames: Vec<Frame> = Vec::new();
    let mut mode = Mode::Code;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        match mode {
            Mode::LineComment => {
                if c == '\n' {
                    mode = Mode::Code;
                    emit(c);
                }
            }
            Mode::BlockComment => {
                if c == '*' && next == Some('/') {
                    mode = Mode::Code;
                    i += 1;
                }
            }
            Mode::Quoted(quote) => {
                if c == '\\' {
                    i += 1;
                } else if c == quote || c == '\n' {
                    // Plain strings cannot span lines; a stray quote in JSX
                    // text must not swallow the rest of the file.
                    mode = Mode::Code;
                }
            }
            Mode::Code if matches!(frames.last(), Some(Frame::Template)) => {
                if c == '\\' {
                    i += 1;
                } else if c == '`' {
                    frames.pop();
                } else if c == '$' && next == Some('{') {
                    frames.push(Frame::Interpolation { braces: 0 });
                    i += 1;
                }
            }
            Mode::Code => match c {
                '/' if next == Some('/') => {
                    mode = Mode::LineComment;
                    i += 1;
                }
                '/' if next == Some('*') => {
                    mode = Mode::BlockComment;
                    i += 1;
                }
                '\'' | '"' => mode = Mode::Quoted(c),
                '`' => frames.push(Frame::Template),
                '{' => {
                    if let Some(Frame::Interpolation { braces }) = frames.last_mut() {
                        *braces += 1;
                    }
                    emit(c);
                }
                '}' => {
                    let closes_interpolation =
                        matches!(frames.last(), Some(Frame::Interpolation { braces: 0 }));
                    if closes_interpolation {
                        frames.pop();
                    } else {
                        if let Some(Frame::Interpolation { braces }) = frames.last_mut() {
                            *braces -= 1;
                        }
                        emit(c);
                    }
                }
                _ => emit(c),
            },
        }

        i += 1;
    }
}

/// Count structural delimiters outside comments, strings and template bodies.
pub fn scan_balance(source: &str) -> DelimiterBalance {
    let mut balance = DelimiterBalance::default();

    walk(source, |c| match c {
        '{' => balance.curly += 1,
        '}' => balance.curly -= 1,
        '(' => balance.paren += 1,
        ')' => balance.paren -= 1,
        '[' => balance.bracket += 1,
        ']' => balance.bracket -= 1,
        _ => {}
    });

    balance
}

/// Source text with comments, string bodies and template bodies removed.
pub fn code_skeleton(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    walk(source, |c| out.push(c));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(source: &str) -> (i64, i64, i64) {
        let b = scan_balance(source);
        (b.curly, b.paren, b.bracket)
    }

    #[test]
    fn counts_plain_code() {
        assert_eq!(counts("function a() { return [1, 2]; }"), (0, 0, 0));
        assert_eq!(counts("function a() { if (x) {"), (2, 0, 0));
        assert_eq!(counts("a)) ]"), (0, -2, -1));
    }

    #[test]
    fn ignores_comments() {
        assert_eq!(counts("// {{{ ((\nconst a = 1;"), (0, 0, 0));
        assert_eq!(counts("/* } ) ] */ const a = {};"), (0, 0, 0));
    }

    #[test]
    fn ignores_quoted_strings_with_escapes() {
        assert_eq!(counts(r#"const a = "{ \" (";"#), (0, 0, 0));
        assert_eq!(counts(r"const b = '} \' )';"), (0, 0, 0));
    }

    #[test]
    fn ignores_template_bodies() {
        assert_eq!(counts("const a = `{{ (( [`;"), (0, 0, 0));
    }

    #[test]
    fn counts_code_inside_interpolation() {
        // The `(` inside the interpolation is code and stays unclosed.
        assert_eq!(counts("const a = `x ${ fn( } y`;"), (0, 1, 0));
        assert_eq!(counts("const a = `x ${ obj[{ k: 1 }.k] } y`;"), (0, 0, 0));
    }

    #[test]
    fn handles_templates_nested_in_interpolation() {
        let source = "const a = `outer ${ cond ? `inner ${ value } {` : '' } done`;";
        assert_eq!(counts(source), (0, 0, 0));
    }

    #[test]
    fn backtick_inside_interpolation_does_not_close_outer_template() {
        // The inner template opens and closes inside the interpolation; the
        // outer literal is still open afterwards so `{` is template text.
        let source = "const a = `${ `x` } {";
        assert_eq!(counts(source), (0, 0, 0));
    }

    #[test]
    fn skeleton_drops_comments_and_strings() {
        let skeleton = code_skeleton("const a = 'text'; // note\n/* block */ b();");
        assert!(!skeleton.contains("text"));
        assert!(!skeleton.contains("note"));
        assert!(!skeleton.contains("block"));
        assert!(skeleton.contains("b()"));
    }

    #[test]
    fn describes_imbalance() {
        let b = scan_balance("f(() => {");
        let messages = b.describe(false);
        assert_eq!(
            messages,
            vec![
                "Unbalanced curly braces: 1 unclosed".to_string(),
                "Unbalanced parentheses: 1 unclosed".to_string(),
            ]
        );
    }
}
