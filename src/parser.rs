//! Line-level parsing: turns file bytes into an ordered sequence of
//! fingerprint records under the active strategy.
//!
//! Physical lines are always counted (line numbers of emitted records
//! point into the original file) but blank lines, comment-only lines,
//! and per-extension boilerplate are never emitted. The previously
//! emitted record is threaded through so indent-delta strategies have
//! their baseline without any mutable parser state inside the strategy.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crate::cache::FileCache;
use crate::lang;
use crate::line::SourceLine;
use crate::strategy::Strategy;
use crate::util::worker_count;

/// Characters that terminate a word during first-word extraction and
/// line tokenization.
pub const SEPARATORS: &str = " \t:.;{}()[]#!<>=,\n\r";

pub fn is_separator(c: char) -> bool {
    SEPARATORS.contains(c)
}

/// Width of the leading indent run: spaces count 1, tabs count 4.
pub fn indent_width(line: &str) -> i32 {
    let mut indent = 0;
    for c in line.chars() {
        match c {
            ' ' => indent += 1,
            '\t' => indent += 4,
            _ => break,
        }
    }
    indent
}

/// Extract the first word of a line: skip leading spaces and tabs,
/// then read up to the first separator. A line that starts with a
/// separator yields that single character.
pub fn first_word(line: &str) -> &str {
    let trimmed = line.trim_start_matches([' ', '\t']);
    match trimmed.char_indices().find(|&(_, c)| is_separator(c)) {
        Some((0, c)) => &trimmed[..c.len_utf8()],
        Some((end, _)) => &trimmed[..end],
        None => trimmed,
    }
}

/// Per-file skip rules: the run's comment prefix and the extension's
/// first-word deny list.
pub struct LineFilter<'a> {
    comment_prefix: &'a str,
    skip_words: &'static [&'static str],
}

impl<'a> LineFilter<'a> {
    pub fn new(comment_prefix: &'a str, skip_words: &'static [&'static str]) -> Self {
        Self {
            comment_prefix,
            skip_words,
        }
    }

    /// Filter for a specific file, with the deny list chosen by extension.
    pub fn for_path(comment_prefix: &'a str, path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(lang::normalize_ext)
            .unwrap_or_default();
        Self::new(comment_prefix, lang::skip_first_words(&ext))
    }

    pub fn is_whitespace_only(&self, line: &str) -> bool {
        line.chars().all(|c| c == ' ' || c == '\t')
    }

    pub fn is_comment_only(&self, line: &str) -> bool {
        !self.comment_prefix.is_empty()
            && line
                .trim_start_matches([' ', '\t'])
                .starts_with(self.comment_prefix)
    }

    pub fn skips_first_word(&self, line: &str) -> bool {
        !self.skip_words.is_empty() && self.skip_words.contains(&first_word(line))
    }
}

/// Parse already-read content into records.
pub fn parse_content(content: &str, strategy: Strategy, filter: &LineFilter) -> Vec<SourceLine> {
    let prepared = strategy.preparse(content);
    let mut records: Vec<SourceLine> = Vec::new();
    for (idx, line) in prepared.split('\n').enumerate() {
        if let Some(record) = strategy.parse_line(filter, idx + 1, line, records.last()) {
            records.push(record);
        }
    }
    records
}

/// Read and parse a single file.
pub fn parse_file(
    path: &Path,
    strategy: Strategy,
    comment_prefix: &str,
) -> io::Result<Vec<SourceLine>> {
    let bytes = fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);
    let filter = LineFilter::for_path(comment_prefix, path);
    Ok(parse_content(&content, strategy, &filter))
}

/// Cache hit/miss counts for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseStats {
    pub cache_hits: usize,
    pub cache_misses: usize,
}

/// Parse all files with a worker pool, reusing cached records where
/// the cache entry is still valid. Unreadable files are dropped
/// silently; the returned map holds only the files that parsed.
pub fn parse_files(
    files: &[PathBuf],
    strategy: Strategy,
    comment_prefix: &str,
    cache: Option<&FileCache>,
) -> (HashMap<PathBuf, Vec<SourceLine>>, ParseStats) {
    if files.is_empty() {
        return (HashMap::new(), ParseStats::default());
    }

    let results = Mutex::new(HashMap::with_capacity(files.len()));
    let hits = AtomicUsize::new(0);
    let misses = AtomicUsize::new(0);

    let workers = worker_count().min(files.len()).max(1);
    let chunk_size = files.len().div_ceil(workers);

    thread::scope(|scope| {
        let results = &results;
        let hits = &hits;
        let misses = &misses;
        for chunk in files.chunks(chunk_size) {
            scope.spawn(move || {
                let mut local: Vec<(PathBuf, Vec<SourceLine>)> = Vec::with_capacity(chunk.len());
                for path in chunk {
                    if let Some(records) = cache.and_then(|c| c.lookup(path)) {
                        hits.fetch_add(1, Ordering::Relaxed);
                        local.push((path.clone(), records));
                        continue;
                    }
                    match parse_file(path, strategy, comment_prefix) {
                        Ok(records) => {
                            misses.fetch_add(1, Ordering::Relaxed);
                            local.push((path.clone(), records));
                        }
                        Err(_) => {} // unreadable: absent from the run
                    }
                }
                results.lock().unwrap().extend(local);
            });
        }
    });

    let stats = ParseStats {
        cache_hits: hits.load(Ordering::Relaxed),
        cache_misses: misses.load(Ordering::Relaxed),
    };
    (results.into_inner().unwrap(), stats)
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
