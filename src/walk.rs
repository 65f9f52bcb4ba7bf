//! Filesystem walking for a scan.
//!
//! Collects the files of one extension under the scan root, honoring
//! `.gitignore` rules, skipping `.git`, and applying the user's
//! exclusion patterns. Uses the `ignore` crate for the traversal.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use ignore::WalkBuilder;

use crate::lang;

/// User exclusion patterns. A file is excluded when a pattern
/// glob-matches its basename (`*.pb.go`) or appears as a substring of
/// its full path (`generated/`).
#[derive(Clone)]
pub struct ExcludeList {
    patterns: Vec<(Option<GlobMatcher>, String)>,
}

impl ExcludeList {
    pub fn new(patterns: &[String]) -> Self {
        let patterns = patterns
            .iter()
            .map(|p| {
                let matcher = Glob::new(p).ok().map(|g| g.compile_matcher());
                (matcher, p.clone())
            })
            .collect();
        Self { patterns }
    }

    /// Parse a comma-separated `--exclude` argument.
    pub fn from_arg(arg: &str) -> Self {
        let patterns: Vec<String> = arg
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        Self::new(&patterns)
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn matches(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let basename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        let full = path.to_string_lossy();
        self.patterns.iter().any(|(matcher, raw)| {
            matcher.as_ref().is_some_and(|m| m.is_match(basename)) || full.contains(raw.as_str())
        })
    }
}

/// Walk the root and return the files with the configured extension
/// (case-insensitive), sorted for stable downstream ordering. Walk
/// errors surface as warnings; the entry is skipped.
pub fn source_files(root: &Path, ext: &str, exclude: &ExcludeList) -> Vec<PathBuf> {
    let want = lang::normalize_ext(ext);
    let mut files = Vec::new();

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .follow_links(false)
        .filter_entry(|entry| {
            !(entry.file_type().is_some_and(|ft| ft.is_dir()) && entry.file_name() == ".git")
        })
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                eprintln!("warning: {err}");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.path();
        let matches_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&want));
        if !matches_ext || exclude.matches(path) {
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    files
}

#[cfg(test)]
#[path = "walk_test.rs"]
mod tests;
