//! Validate files in parallel against the full rule set.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use serde::Serialize;

use preview_guard_rules::{validate_sanitized_code, ValidationResult};

use super::sources::collect_sources;

/// Validation report for a single file.
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub result: ValidationResult,
}

/// Run the check command.
pub fn run(paths: &[PathBuf], json: bool) -> Result<()> {
    let files = collect_sources(paths)?;
    let reports = check_files(&files)?;
    let invalid = reports.iter().filter(|r| !r.result.valid).count();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_report(report);
        }
        tracing::info!("{} file(s) checked, {} invalid", reports.len(), invalid);
    }

    if invalid > 0 {
        bail!("{} file(s) failed validation", invalid);
    }
    Ok(())
}

/// Validate every file, keeping input order.
pub fn check_files(files: &[PathBuf]) -> Result<Vec<FileReport>> {
    files.par_iter().map(|path| check_file(path)).collect()
}

fn check_file(path: &Path) -> Result<FileReport> {
    let code =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    Ok(FileReport {
        path: path.to_path_buf(),
        result: validate_sanitized_code(&code),
    })
}

fn print_report(report: &FileReport) {
    let path = report.path.display();

    for error in &report.result.errors {
        let fixable = if error.fixable { " (fixable)" } else { "" };
        match error.line {
            Some(line) => println!("{}:{}: {}{}", path, line, error, fixable),
            None => println!("{}: {}{}", path, error, fixable),
        }
    }
    for warning in &report.result.warnings {
        println!("{}: warning: {}", path, warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reports_each_file_in_order() {
        let temp = tempdir().unwrap();
        let clean = temp.path().join("a.jsx");
        let dirty = temp.path().join("b.tsx");
        fs::write(
            &clean,
            "function Preview() {\n  return <div className=\"p-4\">Hello world</div>;\n}\n",
        )
        .unwrap();
        fs::write(
            &dirty,
            "import React from 'react';\nfunction Preview() {\n  return <div>Hello world</div>;\n}\n",
        )
        .unwrap();

        let reports = check_files(&[clean.clone(), dirty.clone()]).unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].path, clean);
        assert!(reports[0].result.valid);
        assert_eq!(reports[1].path, dirty);
        assert!(!reports[1].result.valid);
        assert_eq!(reports[1].result.errors[0].line, Some(1));
    }

    #[test]
    fn run_fails_on_invalid_files() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("bad.jsx");
        fs::write(&path, "export const x = 1;").unwrap();

        assert!(run(&[temp.path().to_path_buf()], true).is_err());
    }

    #[test]
    fn json_report_flattens_result() {
        let report = FileReport {
            path: PathBuf::from("Hero.jsx"),
            result: validate_sanitized_code(
                "function Preview() { return <div>Hello there</div>; }",
            ),
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["path"], "Hero.jsx");
        assert_eq!(value["valid"], true);
        assert!(value["errors"].as_array().unwrap().is_empty());
    }
}
