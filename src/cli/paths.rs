// src/cli/paths.rs
//
// Shared path expansion utilities for CLI commands.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use glob::glob;
use thiserror::Error;

/// Extension of Neo source files.
pub const SOURCE_EXTENSION: &str = "neo";

/// Errors that can occur during path expansion
#[derive(Debug, Error)]
pub enum PathError {
    /// Glob pattern syntax error
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
    /// IO error (permissions, etc.)
    #[error("error reading '{}': {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Split a `;`-separated directory list, dropping empty entries.
pub fn split_src_dirs(list: &str) -> Vec<String> {
    list.split(';')
        .map(str::trim)
        .filter(|dir| !dir.is_empty())
        .map(str::to_string)
        .collect()
}

/// Expand a list of path patterns into concrete .neo file paths.
///
/// Each pattern can be:
/// - A direct file path (e.g., "foo.neo")
/// - A directory (expands to **/*.neo recursively)
/// - A glob pattern (e.g., "src/**/*.neo", "tests/*.neo")
///
/// Explicit file paths keep their input order. Glob and directory matches are
/// sorted and appended after them. Duplicates are removed.
///
/// An empty result is valid (not an error).
pub fn expand_paths(patterns: &[String]) -> Result<Vec<PathBuf>, PathError> {
    let mut explicit_files = Vec::new();
    let mut glob_files = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for pattern in patterns {
        expand_pattern(pattern, &mut explicit_files, &mut glob_files, &mut seen)?;
    }

    glob_files.sort();
    explicit_files.extend(glob_files);

    tracing::debug!(patterns = patterns.len(), files = explicit_files.len(), "expanded paths");
    Ok(explicit_files)
}

/// Expand a single pattern into file paths
fn expand_pattern(
    pattern: &str,
    explicit_files: &mut Vec<PathBuf>,
    glob_files: &mut Vec<PathBuf>,
    seen: &mut HashSet<PathBuf>,
) -> Result<(), PathError> {
    let path = PathBuf::from(pattern);

    if path.is_file() {
        // Non-.neo files named explicitly are skipped silently
        if has_neo_extension(&path) {
            add_unique(path, explicit_files, seen);
        }
    } else if path.is_dir() {
        let glob_pattern = format!("{}/**/*.{}", pattern.trim_end_matches('/'), SOURCE_EXTENSION);
        expand_glob(&glob_pattern, glob_files, seen)?;
    } else {
        expand_glob(pattern, glob_files, seen)?;
    }

    Ok(())
}

/// Expand a glob pattern and add matching .neo files
fn expand_glob(
    pattern: &str,
    files: &mut Vec<PathBuf>,
    seen: &mut HashSet<PathBuf>,
) -> Result<(), PathError> {
    let entries = glob(pattern).map_err(|e| PathError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.msg.to_string(),
    })?;

    for entry in entries {
        match entry {
            Ok(path) => {
                if path.is_file() && has_neo_extension(&path) {
                    add_unique(path, files, seen);
                }
            }
            Err(e) => {
                return Err(PathError::IoError {
                    path: e.path().to_path_buf(),
                    source: e.into(),
                });
            }
        }
    }

    Ok(())
}

/// Add a path if not already seen (uses canonical path for deduplication)
fn add_unique(path: PathBuf, files: &mut Vec<PathBuf>, seen: &mut HashSet<PathBuf>) {
    let key = path.canonicalize().unwrap_or_else(|_| path.clone());
    if seen.insert(key) {
        files.push(path);
    }
}

fn has_neo_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "// test").unwrap();
        path
    }

    fn as_pattern(path: &Path) -> String {
        path.to_string_lossy().to_string()
    }

    #[test]
    fn expand_single_file() {
        let dir = TempDir::new().unwrap();
        let file = create_file(dir.path(), "test.neo");

        let files = expand_paths(&[as_pattern(&file)]).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn expand_nested_directory() {
        let dir = TempDir::new().unwrap();
        create_file(dir.path(), "root.neo");
        create_file(dir.path(), "sub/nested.neo");
        create_file(dir.path(), "sub/deep/file.neo");
        create_file(dir.path(), "sub/notes.txt");

        let files = expand_paths(&[as_pattern(dir.path())]).unwrap();
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn expand_glob_pattern() {
        let dir = TempDir::new().unwrap();
        create_file(dir.path(), "test1.neo");
        create_file(dir.path(), "test2.neo");
        create_file(dir.path(), "other.txt");

        let pattern = format!("{}/*.neo", dir.path().display());
        let files = expand_paths(&[pattern]).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn explicit_files_come_first_then_sorted_matches() {
        let dir = TempDir::new().unwrap();
        let z = create_file(dir.path(), "z.neo");
        create_file(dir.path(), "m/b.neo");
        create_file(dir.path(), "m/a.neo");

        let files = expand_paths(&[as_pattern(&z), as_pattern(&dir.path().join("m"))]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["z.neo", "a.neo", "b.neo"]);
    }

    #[test]
    fn duplicates_are_removed() {
        let dir = TempDir::new().unwrap();
        let file = create_file(dir.path(), "test.neo");

        let files = expand_paths(&[
            as_pattern(&file),
            as_pattern(&file),
            as_pattern(dir.path()),
        ])
        .unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn empty_result_is_ok() {
        let dir = TempDir::new().unwrap();
        create_file(dir.path(), "test.txt");

        let files = expand_paths(&[as_pattern(dir.path())]).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn invalid_glob_pattern() {
        let result = expand_paths(&["[invalid".to_string()]);
        assert!(matches!(result, Err(PathError::InvalidPattern { .. })));
    }

    #[test]
    fn src_dir_list_is_split_on_semicolons() {
        assert_eq!(split_src_dirs("a;b/c;;d "), vec!["a", "b/c", "d"]);
        assert!(split_src_dirs("").is_empty());
    }
}
