//! Resolve CLI path arguments into component source files.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use walkdir::{DirEntry, WalkDir};

/// Extensions picked up when walking a directory.
const SOURCE_EXTENSIONS: &[&str] = &["tsx", "jsx", "ts", "js"];

/// Directories never descended into.
const SKIP_DIRS: &[&str] = &["node_modules", "dist", "build", "target"];

/// Expand files and directories into a sorted, de-duplicated file list.
///
/// Files named explicitly are taken as-is regardless of extension.
pub fn collect_sources(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            let walker = WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e));

            for entry in walker.filter_map(|e| e.ok()) {
                if entry.file_type().is_file() && is_source_file(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else {
            bail!("Path not found: {}", path.display());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIP_DIRS.contains(&name.as_ref())
}

fn is_source_file(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    if name.ends_with(".d.ts") {
        return false;
    }

    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn walks_directories_for_sources() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("components/nested")).unwrap();
        fs::create_dir_all(root.join("node_modules/react")).unwrap();
        fs::write(root.join("components/Hero.tsx"), "").unwrap();
        fs::write(root.join("components/nested/Card.jsx"), "").unwrap();
        fs::write(root.join("components/types.d.ts"), "").unwrap();
        fs::write(root.join("components/README.md"), "").unwrap();
        fs::write(root.join("node_modules/react/index.js"), "").unwrap();

        let files = collect_sources(&[root.to_path_buf()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![
                PathBuf::from("components/Hero.tsx"),
                PathBuf::from("components/nested/Card.jsx"),
            ]
        );
    }

    #[test]
    fn explicit_files_are_kept_and_deduplicated() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("preview.txt");
        fs::write(&file, "").unwrap();

        let files = collect_sources(&[file.clone(), file.clone()]).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn missing_path_is_an_error() {
        let temp = tempdir().unwrap();
        assert!(collect_sources(&[temp.path().join("missing")]).is_err());
    }
}
