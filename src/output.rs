//! Console rendering and report artifacts.
//!
//! Progress lines and the match report go to stdout with raw ANSI
//! styling; the markdown pattern report is written next to the other
//! per-strategy state under `.quickdup/`.

use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::STATE_DIR;
use crate::filter::FilterStats;
use crate::lang;
use crate::line::SourceLine;
use crate::results::Match;
use crate::strategy::Strategy;
use crate::util::format_duration;

// ANSI color codes.
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const CYAN: &str = "\x1b[36m";
pub const YELLOW: &str = "\x1b[33m";
pub const GREEN: &str = "\x1b[32m";
pub const MAGENTA: &str = "\x1b[35m";
pub const RESET: &str = "\x1b[0m";

pub fn print_scan_start(file_count: usize, workers: usize) {
    println!("Scanning {file_count} files using {workers} workers...");
}

pub fn print_parse_complete(
    file_count: usize,
    cache_hits: usize,
    cache_misses: usize,
    total_lines: usize,
    elapsed: Duration,
) {
    let elapsed = format_duration(elapsed);
    if cache_hits > 0 {
        println!(
            "Parsed {file_count} files ({cache_hits} cached, {cache_misses} parsed) in {elapsed} ({total_lines} lines of code)"
        );
    } else {
        println!("Parsed {file_count} files in {elapsed} ({total_lines} lines of code)");
    }
}

pub fn print_ignored_loaded(count: usize) {
    if count > 0 {
        println!("Loaded {count} ignored patterns from ignore.json");
    }
}

pub fn print_detect_complete(stopped_at: usize, elapsed: Duration) {
    println!("Growth stopped at {stopped_at} lines");
    println!("Pattern detection took {}", format_duration(elapsed));
}

pub fn print_filter_complete(
    elapsed: Duration,
    stats: &FilterStats,
    min_score: i64,
    min_similarity: f64,
) {
    println!("Filtering took {}", format_duration(elapsed));
    if stats.blocked > 0 {
        println!("Filtered {} common patterns", stats.blocked);
    }
    if stats.low_score > 0 {
        println!(
            "Filtered {} low-score patterns (score < {min_score})",
            stats.low_score
        );
    }
    if stats.low_similarity > 0 {
        println!(
            "Filtered {} low-similarity patterns (similarity < {:.0}%)",
            stats.low_similarity,
            min_similarity * 100.0
        );
    }
}

pub fn print_match_summary(match_count: usize, min_occur: usize, top: usize) {
    println!(
        "Found {GREEN}{BOLD}{match_count}{RESET} patterns with {min_occur}+ occurrences (showing top {top} by score)\n"
    );
}

/// The ranked match list; callers pass the display prefix.
pub fn print_matches(matches: &[Match]) {
    for m in matches {
        println!(
            "\n{MAGENTA}{BOLD}Score {}{RESET} {DIM}[{} lines]{RESET} {DIM}{:.0}% similar{RESET} {DIM}found {} times{RESET} {DIM}[{:016x}]{RESET}:",
            m.score,
            m.lines(),
            m.similarity * 100.0,
            m.locations.len(),
            m.hash
        );
        for loc in &m.locations {
            println!(
                "  {CYAN}{}{RESET}{DIM}:{RESET}{YELLOW}{}{RESET}",
                loc.path.display(),
                loc.line_start
            );
        }
    }
}

/// Top files by duplicated line count across all matches.
pub fn print_hotspots(matches: &[Match]) {
    let mut per_file: HashMap<&Path, usize> = HashMap::new();
    for m in matches {
        for loc in &m.locations {
            *per_file.entry(loc.path.as_path()).or_default() += m.lines();
        }
    }
    if per_file.is_empty() {
        return;
    }

    let mut hotspots: Vec<(&Path, usize)> = per_file.into_iter().collect();
    hotspots.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    println!("\n{GREEN}{BOLD}Duplication hotspots (lines):{RESET}");
    for (path, lines) in hotspots.iter().take(5) {
        println!("  {YELLOW}{lines:>4}{RESET} {CYAN}{}{RESET}", path.display());
    }
}

pub fn print_total(
    match_count: usize,
    file_count: usize,
    total_lines: usize,
    elapsed: Duration,
) {
    println!(
        "\nTotal: {GREEN}{BOLD}{match_count}{RESET} duplicate patterns in {GREEN}{file_count}{RESET} files ({GREEN}{total_lines}{RESET} lines) in {GREEN}{}{RESET}",
        format_duration(elapsed)
    );
}

/// Strip the scan-root `./` prefix so location paths line up with
/// git's repository-relative paths.
fn annotation_path(path: &Path) -> &Path {
    path.strip_prefix("./").unwrap_or(path)
}

/// One GitHub Actions annotation line per match, anchored at the first
/// location. With a changed-file set, matches starting outside it are
/// skipped.
pub fn github_annotations(matches: &[Match], level: &str, changed: Option<&HashSet<PathBuf>>) {
    let mut emitted = 0usize;
    for m in matches {
        let Some(first) = m.locations.first() else {
            continue;
        };
        let file = annotation_path(&first.path);
        if let Some(changed) = changed
            && !changed.contains(file)
        {
            continue;
        }
        let others: Vec<String> = m.locations[1..]
            .iter()
            .map(|loc| {
                let base = loc
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| loc.path.display().to_string());
                format!("{base}:{}", loc.line_start)
            })
            .collect();
        let end_line = first.line_start + m.lines() - 1;
        println!(
            "::{level} file={},line={},endLine={end_line},title=Duplicate ({} lines, {:.0}% similar, score {})::Duplicate code also at: {}",
            file.display(),
            first.line_start,
            m.lines(),
            m.similarity * 100.0,
            m.score,
            others.join(", ")
        );
        emitted += 1;
    }
    if emitted > 0 {
        println!();
    }
}

/// Strip the window's common leading whitespace for display.
fn normalize_indent(records: &[SourceLine]) -> Vec<String> {
    let leading = |line: &str| line.chars().take_while(|&c| c == ' ' || c == '\t').count();
    let min_leading = records
        .iter()
        .filter(|r| !r.source.trim().is_empty())
        .map(|r| leading(&r.source))
        .min()
        .unwrap_or(0);

    records
        .iter()
        .map(|r| {
            if r.source.len() >= min_leading {
                r.source.chars().skip(min_leading).collect()
            } else {
                r.source.clone()
            }
        })
        .collect()
}

const MARKDOWN_MAX_OCCURRENCES: usize = 4;

/// Write the human-review pattern report with real code snippets.
pub fn write_markdown(
    root: &Path,
    strategy: Strategy,
    matches: &[Match],
    ext: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let lang = lang::markdown_lang(&lang::normalize_ext(ext)).to_string();
    let mut out = String::new();

    out.push_str("# Duplicate Code Patterns\n\n");
    out.push_str("This file contains actual code snippets for each detected pattern.\n");
    out.push_str("Review these to determine if they represent refactorable duplications.\n\n");

    for (i, m) in matches.iter().enumerate() {
        out.push_str(&format!(
            "---\n\n## Pattern {} [{:016x}] (Score: {}, Occurrences: {})\n\n",
            i + 1,
            m.hash,
            m.score,
            m.locations.len()
        ));
        for loc in m.locations.iter().take(MARKDOWN_MAX_OCCURRENCES) {
            out.push_str(&format!("### {}:{}\n\n", loc.path.display(), loc.line_start));
            out.push_str(&format!("```{lang}\n"));
            for line in normalize_indent(&loc.records) {
                out.push_str(&line);
                out.push('\n');
            }
            out.push_str("```\n\n");
        }
        if m.locations.len() > MARKDOWN_MAX_OCCURRENCES {
            out.push_str(&format!(
                "*... and {} more occurrences*\n\n",
                m.locations.len() - MARKDOWN_MAX_OCCURRENCES
            ));
        }
    }

    let path = root
        .join(STATE_DIR)
        .join(format!("{}-patterns.md", strategy.name()));
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(&path, out)?;
    Ok(path)
}

#[cfg(test)]
#[path = "output_test.rs"]
mod tests;
