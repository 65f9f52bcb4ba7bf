//! Compare duplication between two git refs.
//!
//! Both refs' trees are materialized into temp directories and scanned
//! in-process with the cache disabled. The interesting output is the
//! patterns whose occurrence count shrank without reaching zero:
//! refactorings that removed some copies but left stragglers behind.

use std::collections::HashMap;
use std::error::Error;
use std::path::{Path, PathBuf};

use crate::git::GitRepo;
use crate::output::{BOLD, CYAN, DIM, GREEN, MAGENTA, RESET};
use crate::results::{self, PatternJson, ResultsFile};
use crate::scan::{self, ScanConfig};

/// A pattern present on both sides with fewer occurrences on head.
pub struct Lingering {
    pub hash: String,
    pub base_count: usize,
    pub head_count: usize,
    pub removed: usize,
    pub pattern: PatternJson,
}

pub struct CompareOutcome {
    /// Sorted by occurrences removed, descending.
    pub lingering: Vec<Lingering>,
    pub fully_removed: usize,
    pub newly_introduced: usize,
}

/// Diff two result sets by pattern hash.
pub fn diff_results(base: &ResultsFile, head: &ResultsFile) -> CompareOutcome {
    let base_occur: HashMap<&str, usize> = base
        .patterns
        .iter()
        .map(|p| (p.hash.as_str(), p.occurrences))
        .collect();
    let head_patterns: HashMap<&str, &PatternJson> =
        head.patterns.iter().map(|p| (p.hash.as_str(), p)).collect();

    let mut lingering: Vec<Lingering> = Vec::new();
    let mut fully_removed = 0usize;
    for (hash, &base_count) in &base_occur {
        match head_patterns.get(hash) {
            Some(pattern) if pattern.occurrences < base_count => {
                lingering.push(Lingering {
                    hash: (*hash).to_string(),
                    base_count,
                    head_count: pattern.occurrences,
                    removed: base_count - pattern.occurrences,
                    pattern: (*pattern).clone(),
                });
            }
            Some(_) => {}
            None => fully_removed += 1,
        }
    }
    lingering.sort_by(|a, b| b.removed.cmp(&a.removed).then(a.hash.cmp(&b.hash)));

    let newly_introduced = head
        .patterns
        .iter()
        .filter(|p| !base_occur.contains_key(p.hash.as_str()))
        .count();

    CompareOutcome {
        lingering,
        fully_removed,
        newly_introduced,
    }
}

/// Scan both refs and print the comparison.
pub fn run(base_ref: &str, head_ref: &str, config: &ScanConfig) -> Result<(), Box<dyn Error>> {
    println!("Comparing duplicates: {base_ref} -> {head_ref}\n");

    let repo = GitRepo::open(&config.root)?;
    // A scan path below the repo root narrows both checkouts.
    let subdir = config
        .root
        .canonicalize()
        .ok()
        .and_then(|root| {
            let repo_root = repo.root().canonicalize().ok()?;
            root.strip_prefix(repo_root).ok().map(Path::to_path_buf)
        })
        .unwrap_or_default();

    let base_dir = tempfile::Builder::new().prefix("quickdup-base-").tempdir()?;
    let head_dir = tempfile::Builder::new().prefix("quickdup-head-").tempdir()?;

    println!("Creating checkout for {base_ref}...");
    repo.extract_tree(base_ref, base_dir.path())?;
    println!("Creating checkout for {head_ref}...");
    repo.extract_tree(head_ref, head_dir.path())?;

    println!("\nScanning {base_ref}...");
    let base_scan_root = base_dir.path().join(&subdir);
    let base_report = scan::execute(&side_config(config, base_scan_root.clone()))?;
    results::write_results(&base_scan_root, config.strategy, &base_report.matches)?;

    println!("\nScanning {head_ref}...");
    let head_scan_root = head_dir.path().join(&subdir);
    let head_report = scan::execute(&side_config(config, head_scan_root.clone()))?;
    results::write_results(&head_scan_root, config.strategy, &head_report.matches)?;

    let base_results =
        results::load_results(&results::results_path(&base_scan_root, config.strategy));
    let head_results =
        results::load_results(&results::results_path(&head_scan_root, config.strategy));

    let outcome = diff_results(&base_results, &head_results);
    print_comparison(base_ref, head_ref, &outcome, &head_scan_root);
    Ok(())
}

fn side_config(config: &ScanConfig, root: PathBuf) -> ScanConfig {
    ScanConfig {
        root,
        ext: config.ext.clone(),
        strategy: config.strategy,
        comment_prefix: config.comment_prefix.clone(),
        exclude: config.exclude.clone(),
        min_occur: config.min_occur,
        min_size: config.min_size,
        max_size: config.max_size,
        min_score: config.min_score,
        min_similarity: config.min_similarity,
        top: config.top,
        keep_overlaps: config.keep_overlaps,
        no_cache: true,
        timeout: config.timeout,
    }
}

fn print_comparison(base_ref: &str, head_ref: &str, outcome: &CompareOutcome, head_root: &Path) {
    let separator = "=".repeat(60);
    println!("\n{separator}");
    println!("COMPARISON RESULTS: {base_ref} -> {head_ref}");
    println!("{separator}\n");

    if outcome.lingering.is_empty() {
        println!("No lingering duplicates found. All refactoring appears complete!");
    } else {
        println!(
            "Found {} patterns with incomplete refactoring:\n",
            outcome.lingering.len()
        );
        for l in &outcome.lingering {
            println!(
                "{DIM}[{}]{RESET} {} -> {} occurrences: {GREEN}{BOLD}{}{RESET} removed, {MAGENTA}{BOLD}{}{RESET} lingering - potentially missed refactoring?",
                l.hash,
                l.base_count,
                l.head_count,
                l.removed,
                l.head_count
            );
            println!("  Remaining locations:");
            for loc in &l.pattern.locations {
                let rel = Path::new(&loc.filename)
                    .strip_prefix(head_root)
                    .unwrap_or_else(|_| Path::new(&loc.filename));
                println!("    {CYAN}{}:{}{RESET}", rel.display(), loc.line_start);
            }
            println!();
        }
    }

    if outcome.fully_removed > 0 {
        println!(
            "\n{GREEN}{BOLD}{}{RESET} duplicate patterns were completely removed.",
            outcome.fully_removed
        );
    }
    if outcome.newly_introduced > 0 {
        println!(
            "{MAGENTA}{BOLD}{}{RESET} new duplicate patterns were introduced.",
            outcome.newly_introduced
        );
    }
}

#[cfg(test)]
#[path = "compare_test.rs"]
mod tests;
