//! Terminal match model and the persisted results JSON.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cache::STATE_DIR;
use crate::detect::Location;
use crate::line::SourceLine;
use crate::strategy::Strategy;

/// A scored duplicate pattern: one similarity cluster of one hash
/// bucket, ready for reporting.
#[derive(Debug, Clone)]
pub struct Match {
    pub hash: u64,
    pub locations: Vec<Location>,
    /// Representative window: the first location's records.
    pub records: Vec<SourceLine>,
    /// Mean pairwise token similarity across the cluster.
    pub similarity: f64,
    pub score: i64,
}

impl Match {
    /// Pattern length in records.
    pub fn lines(&self) -> usize {
        self.records.len()
    }
}

#[derive(Serialize, Deserialize, Default)]
pub struct ResultsFile {
    pub total_patterns: usize,
    pub patterns: Vec<PatternJson>,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct PatternJson {
    /// 16 lowercase hex characters.
    pub hash: String,
    pub score: i64,
    pub lines: usize,
    pub similarity: f64,
    pub occurrences: usize,
    pub locations: Vec<LocationJson>,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct LocationJson {
    pub filename: String,
    pub line_start: usize,
}

pub fn results_path(root: &Path, strategy: Strategy) -> PathBuf {
    root.join(STATE_DIR)
        .join(format!("{}-results.json", strategy.name()))
}

pub fn to_results_file(matches: &[Match]) -> ResultsFile {
    ResultsFile {
        total_patterns: matches.len(),
        patterns: matches
            .iter()
            .map(|m| PatternJson {
                hash: format!("{:016x}", m.hash),
                score: m.score,
                lines: m.lines(),
                similarity: m.similarity,
                occurrences: m.locations.len(),
                locations: m
                    .locations
                    .iter()
                    .map(|loc| LocationJson {
                        filename: loc.path.display().to_string(),
                        line_start: loc.line_start,
                    })
                    .collect(),
            })
            .collect(),
    }
}

/// Write the full match list (not just the display prefix) and return
/// the path written.
pub fn write_results(
    root: &Path,
    strategy: Strategy,
    matches: &[Match],
) -> Result<PathBuf, Box<dyn Error>> {
    let path = results_path(root, strategy);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(&to_results_file(matches))?;
    fs::write(&path, json)?;
    Ok(path)
}

/// Read a results file back; missing or malformed files read as empty
/// (compare mode treats both as "no patterns on this side").
pub fn load_results(path: &Path) -> ResultsFile {
    let Ok(data) = fs::read(path) else {
        return ResultsFile::default();
    };
    serde_json::from_slice(&data).unwrap_or_default()
}

#[cfg(test)]
#[path = "results_test.rs"]
mod tests;
