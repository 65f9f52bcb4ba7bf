mod cache;
mod cli;
mod compare;
mod detect;
mod filter;
mod git;
mod lang;
mod line;
mod output;
mod parser;
mod results;
mod scan;
mod similarity;
mod strategy;
mod util;
mod walk;

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::cli::Cli;
use crate::scan::{OutputConfig, ScanConfig};
use crate::strategy::Strategy;
use crate::walk::ExcludeList;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let strategy = Strategy::from_name(&cli.strategy).ok_or_else(|| {
        format!(
            "unknown strategy: {} (expected one of: {})",
            cli.strategy,
            Strategy::ALL_NAMES.join(", ")
        )
    })?;
    if cli.min_size == 0 {
        return Err("min-size must be at least 1".into());
    }
    if cli.max_size != 0 && cli.max_size < cli.min_size {
        return Err("max-size must be 0 or at least min-size".into());
    }
    if !(0.0..=1.0).contains(&cli.min_similarity) {
        return Err("min-similarity must be between 0.0 and 1.0".into());
    }

    let ext = lang::normalize_ext(&cli.ext);
    let comment_prefix = if cli.comment.is_empty() {
        lang::comment_prefix(&ext).unwrap_or("//").to_string()
    } else {
        cli.comment.clone()
    };

    let config = ScanConfig {
        root: cli.path.clone().unwrap_or_else(|| PathBuf::from(".")),
        ext: cli.ext.clone(),
        strategy,
        comment_prefix,
        exclude: ExcludeList::from_arg(&cli.exclude),
        min_occur: cli.min_occur,
        min_size: cli.min_size,
        max_size: cli.max_size,
        min_score: cli.min_score,
        min_similarity: cli.min_similarity,
        top: cli.top,
        keep_overlaps: cli.keep_overlaps,
        no_cache: cli.no_cache,
        timeout: (cli.timeout > 0).then(|| Duration::from_secs(cli.timeout)),
    };

    if let Some(spec) = &cli.compare {
        let (base, head) = spec
            .split_once("..")
            .filter(|(b, h)| !b.is_empty() && !h.is_empty())
            .ok_or("--compare requires format 'base..head'")?;
        return compare::run(base, head, &config);
    }

    let out = OutputConfig {
        github_annotations: cli.github_annotations,
        github_level: cli.github_level.clone(),
        git_diff: cli.git_diff.clone(),
    };
    scan::run(&config, &out)
}
