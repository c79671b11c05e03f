//! Source file discovery for `include` / `exclude` patterns.
//!
//! Patterns are `/`-separated and relative to the project directory. A `**`
//! segment matches any number of directories, `*` and `?` match within one
//! segment. A pattern whose last segment has no wildcard and no extension
//! names a directory and matches every checkable file below it.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ProgramError;

/// Extensions the checker reads.
const SOURCE_EXTENSIONS: [&str; 2] = [".d.ts", ".ts"];

/// Directories never walked.
const SKIPPED_DIRECTORIES: [&str; 3] = ["node_modules", ".git", "target"];

/// Files under `root` matching one of `include` and none of `exclude`,
/// sorted so discovery order never depends on the file system.
pub fn discover_source_files(root: &Path, include: &[String], exclude: &[String]) -> Result<Vec<PathBuf>, ProgramError> {
    let include: Vec<Vec<&str>> = include.iter().map(|p| expand_directory(split_pattern(p))).collect();
    let exclude: Vec<Vec<&str>> = exclude.iter().map(|p| expand_directory(split_pattern(p))).collect();
    let mut found = Vec::new();
    walk(root, &mut Vec::new(), &include, &exclude, &mut found)?;
    found.sort();
    found.dedup();
    debug!(root = %root.display(), files = found.len(), "discovered source files");
    Ok(found)
}

fn walk(
    dir: &Path,
    relative: &mut Vec<String>,
    include: &[Vec<&str>],
    exclude: &[Vec<&str>],
    found: &mut Vec<PathBuf>,
) -> Result<(), ProgramError> {
    let entries = std::fs::read_dir(dir).map_err(|source| ProgramError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            continue;
        };
        relative.push(name);
        let segments: Vec<&str> = relative.iter().map(String::as_str).collect();
        let excluded = exclude.iter().any(|p| matches_path(p, &segments));
        if path.is_dir() {
            if !excluded && !SKIPPED_DIRECTORIES.contains(&relative[relative.len() - 1].as_str()) {
                walk(&path, relative, include, exclude, found)?;
            }
        } else if !excluded && is_source_file(&path) && include.iter().any(|p| matches_path(p, &segments)) {
            found.push(path);
        }
        relative.pop();
    }
    Ok(())
}

pub(crate) fn is_source_file(path: &Path) -> bool {
    let name = path.to_string_lossy();
    SOURCE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

fn split_pattern(pattern: &str) -> Vec<&str> {
    pattern
        .trim_start_matches("./")
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect()
}

/// `src` means `src/**/*`.
fn expand_directory(mut segments: Vec<&str>) -> Vec<&str> {
    let names_directory = segments
        .last()
        .map_or(true, |last| !last.contains(['*', '?']) && !last.contains('.'));
    if names_directory {
        segments.push("**");
        segments.push("*");
    }
    segments
}

/// Match path segments against pattern segments.
fn matches_path(pattern: &[&str], path: &[&str]) -> bool {
    match (pattern.first(), path.first()) {
        (None, None) => true,
        (Some(&"**"), _) => {
            matches_path(&pattern[1..], path) || (!path.is_empty() && matches_path(pattern, &path[1..]))
        }
        (Some(segment), Some(name)) => matches_segment(segment.as_bytes(), name.as_bytes()) && matches_path(&pattern[1..], &path[1..]),
        _ => false,
    }
}

fn matches_segment(pattern: &[u8], name: &[u8]) -> bool {
    match (pattern.first(), name.first()) {
        (None, None) => true,
        (Some(b'*'), _) => matches_segment(&pattern[1..], name) || (!name.is_empty() && matches_segment(pattern, &name[1..])),
        (Some(b'?'), Some(_)) => matches_segment(&pattern[1..], &name[1..]),
        (Some(p), Some(n)) => p == n && matches_segment(&pattern[1..], &name[1..]),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, path: &str) -> bool {
        let pattern = expand_directory(split_pattern(pattern));
        let path: Vec<&str> = path.split('/').collect();
        matches_path(&pattern, &path)
    }

    #[test]
    fn test_double_star_matches_any_depth() {
        assert!(matches("**/*.ts", "a.ts"));
        assert!(matches("**/*.ts", "src/deep/a.ts"));
        assert!(!matches("**/*.ts", "src/a.js"));
    }

    #[test]
    fn test_single_star_stays_in_segment() {
        assert!(matches("src/*.ts", "src/a.ts"));
        assert!(!matches("src/*.ts", "src/nested/a.ts"));
        assert!(matches("src/?.ts", "src/a.ts"));
        assert!(!matches("src/?.ts", "src/ab.ts"));
    }

    #[test]
    fn test_directory_pattern_covers_contents() {
        assert!(matches("src", "src/a.ts"));
        assert!(matches("./src", "src/x/y.d.ts"));
        assert!(!matches("src", "lib/a.ts"));
    }

    #[test]
    fn test_source_extensions() {
        assert!(is_source_file(Path::new("a.ts")));
        assert!(is_source_file(Path::new("lib.d.ts")));
        assert!(!is_source_file(Path::new("a.js")));
    }
}
