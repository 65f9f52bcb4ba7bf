//! The scan pipeline: walk, parse (with cache), detect, filter, report.

use std::collections::HashSet;
use std::error::Error;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use crate::cache;
use crate::detect::{self, CancelToken, DetectParams};
use crate::filter::{self, FilterConfig};
use crate::git::GitRepo;
use crate::output;
use crate::parser;
use crate::results::{self, Match};
use crate::strategy::Strategy;
use crate::util::worker_count;
use crate::walk::{self, ExcludeList};

pub struct ScanConfig {
    pub root: PathBuf,
    pub ext: String,
    pub strategy: Strategy,
    pub comment_prefix: String,
    pub exclude: ExcludeList,
    pub min_occur: usize,
    pub min_size: usize,
    pub max_size: usize,
    pub min_score: i64,
    pub min_similarity: f64,
    pub top: usize,
    pub keep_overlaps: bool,
    pub no_cache: bool,
    /// Wall-clock budget; growth and clustering stop at the next stage
    /// boundary once it elapses.
    pub timeout: Option<Duration>,
}

/// CI/annotation switches that only affect `run`'s output side.
pub struct OutputConfig {
    pub github_annotations: bool,
    pub github_level: String,
    pub git_diff: Option<String>,
}

pub struct ScanReport {
    pub matches: Vec<Match>,
    pub files_scanned: usize,
    pub total_lines: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
}

/// Run the detection pipeline and return the ranked matches. Progress
/// goes to stdout; the cache and ignore list are maintained here, the
/// results artifacts are left to the caller.
pub fn execute(config: &ScanConfig) -> Result<ScanReport, Box<dyn Error>> {
    let cancel = CancelToken::new();
    if let Some(timeout) = config.timeout {
        let token = cancel.clone();
        thread::spawn(move || {
            thread::sleep(timeout);
            token.cancel();
        });
    }

    let files = walk::source_files(&config.root, &config.ext, &config.exclude);
    if files.is_empty() {
        println!(
            "No .{} files found in {}",
            crate::lang::normalize_ext(&config.ext),
            config.root.display()
        );
        return Ok(ScanReport {
            matches: Vec::new(),
            files_scanned: 0,
            total_lines: 0,
            cache_hits: 0,
            cache_misses: 0,
        });
    }

    output::print_scan_start(files.len(), worker_count());

    let parse_start = Instant::now();
    let cached = if config.no_cache {
        None
    } else {
        cache::load(&config.root, config.strategy)
    };
    let (file_data, parse_stats) = parser::parse_files(
        &files,
        config.strategy,
        &config.comment_prefix,
        cached.as_ref(),
    );
    if !config.no_cache && parse_stats.cache_misses > 0 {
        cache::save(&config.root, config.strategy, &file_data);
    }
    let total_lines: usize = file_data.values().map(Vec::len).sum();
    output::print_parse_complete(
        file_data.len(),
        parse_stats.cache_hits,
        parse_stats.cache_misses,
        total_lines,
        parse_start.elapsed(),
    );

    let user_ignored = filter::load_ignored(&config.root, config.strategy);
    output::print_ignored_loaded(user_ignored.len());

    println!("Detecting patterns...");
    let detect_start = Instant::now();
    let params = DetectParams {
        min_occur: config.min_occur,
        min_size: config.min_size,
        max_size: config.max_size,
        keep_overlaps: config.keep_overlaps,
    };
    let outcome = detect::detect(&file_data, config.strategy, &params, &cancel);
    output::print_detect_complete(outcome.stopped_at, detect_start.elapsed());

    let filter_start = Instant::now();
    let filter_config = FilterConfig {
        min_occur: config.min_occur,
        min_score: config.min_score,
        min_similarity: config.min_similarity,
        user_ignored,
    };
    let (matches, filter_stats) =
        filter::filter_matches(outcome.patterns, config.strategy, &filter_config, &cancel);
    output::print_filter_complete(
        filter_start.elapsed(),
        &filter_stats,
        config.min_score,
        config.min_similarity,
    );

    Ok(ScanReport {
        matches,
        files_scanned: file_data.len(),
        total_lines,
        cache_hits: parse_stats.cache_hits,
        cache_misses: parse_stats.cache_misses,
    })
}

/// Full CLI entry: pipeline, console report, annotations, and state
/// files. Annotation mode emits `::level ...` lines and writes nothing.
pub fn run(config: &ScanConfig, out: &OutputConfig) -> Result<(), Box<dyn Error>> {
    let started = Instant::now();
    let report = execute(config)?;
    if report.files_scanned == 0 {
        return Ok(());
    }

    let top = filter::top_n(&report.matches, config.top);

    if out.github_annotations {
        let changed = out.git_diff.as_deref().map(|r| changed_files(config, r));
        output::github_annotations(top, &out.github_level, changed.as_ref());
    }

    output::print_match_summary(report.matches.len(), config.min_occur, top.len());
    output::print_matches(top);
    output::print_hotspots(&report.matches);
    output::print_total(
        report.matches.len(),
        report.files_scanned,
        report.total_lines,
        started.elapsed(),
    );

    if out.github_annotations {
        return Ok(());
    }

    let results_path = results::write_results(&config.root, config.strategy, &report.matches)?;
    println!(
        "Results written to: {}{}{}",
        output::CYAN,
        results_path.display(),
        output::RESET
    );
    let markdown_path =
        output::write_markdown(&config.root, config.strategy, &report.matches, &config.ext)?;
    println!(
        "Raw patterns written to: {}{}{}",
        output::CYAN,
        markdown_path.display(),
        output::RESET
    );
    Ok(())
}

fn changed_files(config: &ScanConfig, refspec: &str) -> HashSet<PathBuf> {
    match GitRepo::open(&config.root).and_then(|repo| repo.changed_files(refspec)) {
        Ok(paths) => paths,
        Err(err) => {
            eprintln!("warning: --git-diff: {err}");
            HashSet::new()
        }
    }
}

#[cfg(test)]
#[path = "scan_test.rs"]
mod tests;
