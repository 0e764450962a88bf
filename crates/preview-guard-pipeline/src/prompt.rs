//! Instruction text and user message construction.
//!
//! The system instruction is loaded once per process. The first caller
//! decides where it comes from (an override file or the embedded default);
//! afterwards the text is never mutated and every sanitization, on any
//! thread, reads the same value.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use minijinja::{context, Environment};

/// Built-in instruction text.
pub const DEFAULT_INSTRUCTIONS: &str = include_str!("../prompts/sanitize.md");

static INSTRUCTIONS: OnceLock<String> = OnceLock::new();

const USER_MESSAGE_TEMPLATE: &str = r#"Convert the following component ({{ line_count }} lines) into a self-contained `Preview` component.
{% if previous_errors %}

The previous attempt failed validation:
{% for error in previous_errors %}
- {{ error }}
{% endfor %}

Fix every one of these issues in this attempt.
{% endif %}

```jsx
{{ code }}
```
"#;

/// The process-wide system instruction.
///
/// `override_path` is only consulted on the very first call.
pub fn system_instruction(override_path: Option<&Path>) -> &'static str {
    INSTRUCTIONS
        .get_or_init(|| load_instructions(override_path))
        .as_str()
}

/// Read instruction text, falling back to the embedded default.
pub(crate) fn load_instructions(override_path: Option<&Path>) -> String {
    let Some(path) = override_path else {
        return DEFAULT_INSTRUCTIONS.to_string();
    };

    match fs::read_to_string(path) {
        Ok(text) if !text.trim().is_empty() => {
            tracing::info!("Loaded instructions from {}", path.display());
            text
        }
        Ok(_) => {
            tracing::warn!(
                "Instruction file {} is empty, using built-in instructions",
                path.display()
            );
            DEFAULT_INSTRUCTIONS.to_string()
        }
        Err(e) => {
            tracing::warn!(
                "Failed to read instruction file {}: {}, using built-in instructions",
                path.display(),
                e
            );
            DEFAULT_INSTRUCTIONS.to_string()
        }
    }
}

/// Render the user message for one attempt.
///
/// `previous_errors` is empty on the first attempt and holds only the
/// immediately preceding attempt's warnings afterwards.
pub fn user_message(code: &str, previous_errors: &[String]) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.add_template("user_message", USER_MESSAGE_TEMPLATE)?;

    env.get_template("user_message")?.render(context! {
        line_count => code.lines().count(),
        code => code,
        previous_errors => previous_errors,
    })
}
