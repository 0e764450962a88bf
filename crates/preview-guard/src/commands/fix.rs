//! Deterministic auto-fix over files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use preview_guard_rules::{validate_and_fix, AutoFixResult};

use super::sources::collect_sources;

/// Outcome of fixing a single file.
#[derive(Debug)]
pub struct FileFix {
    pub path: PathBuf,
    pub result: AutoFixResult,
    pub changed: bool,
}

/// Run the fix command.
pub fn run(paths: &[PathBuf], write: bool) -> Result<()> {
    let files = collect_sources(paths)?;
    if files.is_empty() {
        tracing::warn!("No source files found");
        return Ok(());
    }

    let mut unresolved = 0usize;
    for path in &files {
        let fixed = fix_file(path, write)?;

        for fix in &fixed.result.fixes_applied {
            tracing::info!("{}: {}", path.display(), fix);
        }
        for error in &fixed.result.remaining_errors {
            match error.line {
                Some(line) => tracing::warn!("{}:{}: {}", path.display(), line, error),
                None => tracing::warn!("{}: {}", path.display(), error),
            }
        }
        if !fixed.result.remaining_errors.is_empty() {
            unresolved += 1;
        }

        if fixed.changed && !write {
            tracing::debug!("{} would change (pass --write to apply)", path.display());
        }
    }

    let changed = if write { "fixed" } else { "fixable" };
    tracing::info!(
        "{} file(s) checked, {} with remaining errors ({})",
        files.len(),
        unresolved,
        changed
    );

    if unresolved > 0 {
        bail!("{} file(s) still have errors after auto-fix", unresolved);
    }
    Ok(())
}

/// Fix one file, writing the result back when `write` is set.
pub fn fix_file(path: &Path, write: bool) -> Result<FileFix> {
    let original =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let result = validate_and_fix(&original);
    let changed = result.code != original;

    if write && changed {
        fs::write(path, &result.code)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(FileFix {
        path: path.to_path_buf(),
        result,
        changed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const WITH_MODULE_SYNTAX: &str = r#"import React from "react";

export default function App() {
  return <div className="p-4">Hi</div>;
}
"#;

    #[test]
    fn dry_run_leaves_file_untouched() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("App.jsx");
        fs::write(&path, WITH_MODULE_SYNTAX).unwrap();

        let fixed = fix_file(&path, false).unwrap();

        assert!(fixed.changed);
        assert!(fixed.result.code.contains("function Preview()"));
        assert_eq!(fs::read_to_string(&path).unwrap(), WITH_MODULE_SYNTAX);
    }

    #[test]
    fn write_applies_fixes() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("App.jsx");
        fs::write(&path, WITH_MODULE_SYNTAX).unwrap();

        let fixed = fix_file(&path, true).unwrap();
        let on_disk = fs::read_to_string(&path).unwrap();

        assert!(fixed.result.remaining_errors.is_empty());
        assert_eq!(on_disk, fixed.result.code);
        assert!(!on_disk.contains("import"));
        assert!(!on_disk.contains("export"));
    }

    #[test]
    fn run_fails_when_dangerous_code_remains() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("Preview.jsx");
        fs::write(
            &path,
            "function Preview() {\n  eval(\"1 + 1\");\n  return <div>Hi there</div>;\n}\n",
        )
        .unwrap();

        assert!(run(&[path], true).is_err());
    }
}
