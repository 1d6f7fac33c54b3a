//! Artifact discovery inside one results folder.

use glob::{glob_with, MatchOptions, Pattern};
use std::path::{Path, PathBuf};

/// Resolve `tree/subpath/pattern` to at most one file.
///
/// Only `pattern` is expanded; metacharacters in the tree path and the subpath
/// are matched literally. Candidates are sorted so the choice does not depend
/// on directory enumeration order, and a warning is logged when the pattern is
/// ambiguous. Hidden files never match a wildcard. Zero matches, unreadable entries and invalid patterns all yield
/// `None`.
pub fn locate(tree: &Path, subpath: &str, pattern: &str) -> Option<PathBuf> {
    let search = search_pattern(tree, subpath, pattern);

    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let entries = match glob_with(&search, options) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Invalid search pattern {}: {}", search, e);
            return None;
        }
    };

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                log::debug!("Skipping unreadable entry while searching {}: {}", search, e);
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    candidates.sort();

    let count = candidates.len();
    let first = candidates.into_iter().next()?;
    if count > 1 {
        log::warn!(
            "Found {} files matching {}; using {}",
            count,
            search,
            first.display()
        );
    }
    Some(first)
}

fn search_pattern(tree: &Path, subpath: &str, pattern: &str) -> String {
    let mut base = PathBuf::from(Pattern::escape(&tree.to_string_lossy()));
    let subpath = subpath.trim_matches('/');
    if !subpath.is_empty() {
        base.push(Pattern::escape(subpath));
    }
    base.join(pattern).to_string_lossy().into_owned()
}
