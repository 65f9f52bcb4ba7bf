/// CLI argument definitions for the `quickdup` command.
///
/// A single flag-driven command; `--compare` switches the run into
/// two-ref comparison mode instead of a plain scan.
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "quickdup", version, about = "Find duplicated code patterns fast")]
pub struct Cli {
    /// Directory to scan (default: current directory)
    pub path: Option<PathBuf>,

    /// File extension to scan
    #[arg(long, default_value = ".go")]
    pub ext: String,

    /// Fingerprinting strategy
    #[arg(long, default_value = "word-indent",
          value_parser = ["word-indent", "normalized-indent", "word-only", "inlineable"])]
    pub strategy: String,

    /// Minimum occurrences to report
    #[arg(long, default_value = "3")]
    pub min_occur: usize,

    /// Base pattern size to start growing from
    #[arg(long, default_value = "3")]
    pub min_size: usize,

    /// Stop growing patterns at this many lines (0 = unbounded)
    #[arg(long, default_value = "0")]
    pub max_size: usize,

    /// Minimum score to report
    #[arg(long, default_value = "3")]
    pub min_score: i64,

    /// Minimum token similarity between occurrences (0.0-1.0)
    #[arg(long, default_value = "0.5")]
    pub min_similarity: f64,

    /// Show top N matches by score
    #[arg(long, default_value = "10")]
    pub top: usize,

    /// Override comment prefix (auto-detected by extension)
    #[arg(long, default_value = "")]
    pub comment: String,

    /// Exclude files matching patterns (comma-separated, e.g. '*.pb.go,*_gen.go')
    #[arg(long, default_value = "")]
    pub exclude: String,

    /// Keep overlapping occurrences within the same file
    #[arg(long)]
    pub keep_overlaps: bool,

    /// Disable incremental caching, force full re-parse
    #[arg(long)]
    pub no_cache: bool,

    /// Abort detection after this many seconds (0 = no limit)
    #[arg(long, default_value = "0")]
    pub timeout: u64,

    /// Output GitHub Actions annotations for inline PR comments
    #[arg(long)]
    pub github_annotations: bool,

    /// GitHub annotation level
    #[arg(long, default_value = "warning", value_parser = ["notice", "warning", "error"])]
    pub github_level: String,

    /// Only annotate files changed vs this git ref (e.g. origin/main)
    #[arg(long)]
    pub git_diff: Option<String>,

    /// Compare duplicates between two commits (format: base..head)
    #[arg(long)]
    pub compare: Option<String>,
}
