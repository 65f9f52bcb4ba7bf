//! Filtering and ranking of mined pattern buckets into matches.
//!
//! Each bucket runs the same gauntlet: strategy block list and user
//! ignore list, occurrence floor, similarity clustering (a bucket can
//! split into several matches or none), then per-cluster score
//! threshold. The surviving matches sort deterministically.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use std::thread;

use serde::{Deserialize, Serialize};

use crate::cache::STATE_DIR;
use crate::detect::{Buckets, CancelToken, Location};
use crate::results::Match;
use crate::similarity::{self, Cluster};
use crate::strategy::Strategy;
use crate::util::worker_count;

pub struct FilterConfig {
    pub min_occur: usize,
    pub min_score: i64,
    pub min_similarity: f64,
    pub user_ignored: HashSet<u64>,
}

/// Why candidate patterns were dropped, for the run summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterStats {
    pub blocked: usize,
    pub low_score: usize,
    pub low_similarity: usize,
}

/// Turn raw buckets into scored, ranked matches.
///
/// Cancellation is honored before the clustering stage; a cancelled
/// run reports no matches rather than a half-clustered set.
pub fn filter_matches(
    patterns: Buckets,
    strategy: Strategy,
    config: &FilterConfig,
    cancel: &CancelToken,
) -> (Vec<Match>, FilterStats) {
    let blocked = strategy.blocked_hashes();
    let mut stats = FilterStats::default();

    let mut candidates: Vec<(u64, Vec<Location>)> = Vec::new();
    for (hash, locations) in patterns {
        if blocked.contains(&hash) || config.user_ignored.contains(&hash) {
            stats.blocked += 1;
            continue;
        }
        if locations.len() < config.min_occur {
            continue;
        }
        candidates.push((hash, locations));
    }
    // Hash order fixes the processing order regardless of map iteration.
    candidates.sort_by_key(|&(hash, _)| hash);

    if candidates.is_empty() || cancel.is_cancelled() {
        return (Vec::new(), stats);
    }

    let clusters = cluster_candidates(&candidates, config.min_similarity);

    let mut matches: Vec<Match> = Vec::new();
    for ((hash, _), bucket_clusters) in candidates.iter().zip(&clusters) {
        for cluster in bucket_clusters {
            if cluster.locations.len() < config.min_occur {
                stats.low_similarity += 1;
                continue;
            }
            let base = strategy.score(&cluster.locations[0].records, cluster.similarity);
            // More occurrences means more payoff from fixing it.
            let score = base * cluster.locations.len() as i64;
            if score < config.min_score {
                stats.low_score += 1;
                continue;
            }
            matches.push(Match {
                hash: *hash,
                records: cluster.locations[0].records.clone(),
                locations: cluster.locations.clone(),
                similarity: cluster.similarity,
                score,
            });
        }
    }

    matches.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.hash.cmp(&b.hash))
            .then_with(|| a.locations[0].path.cmp(&b.locations[0].path))
            .then(a.locations[0].index.cmp(&b.locations[0].index))
    });

    (matches, stats)
}

/// Cluster every candidate bucket, partitioned across the worker pool.
fn cluster_candidates(
    candidates: &[(u64, Vec<Location>)],
    min_similarity: f64,
) -> Vec<Vec<Cluster>> {
    let mut clusters: Vec<Vec<Cluster>> = Vec::with_capacity(candidates.len());
    clusters.resize_with(candidates.len(), Vec::new);

    let workers = worker_count().min(candidates.len()).max(1);
    let chunk_size = candidates.len().div_ceil(workers);

    thread::scope(|scope| {
        for (in_chunk, out_chunk) in candidates
            .chunks(chunk_size)
            .zip(clusters.chunks_mut(chunk_size))
        {
            scope.spawn(move || {
                for ((_, locations), out) in in_chunk.iter().zip(out_chunk.iter_mut()) {
                    *out = similarity::cluster_by_similarity(locations, min_similarity);
                }
            });
        }
    });

    clusters
}

/// The display prefix of the ranked matches.
pub fn top_n(matches: &[Match], n: usize) -> &[Match] {
    &matches[..n.min(matches.len())]
}

/// On-disk shape of the per-strategy ignore list.
#[derive(Serialize, Deserialize)]
pub struct IgnoreFile {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ignored: Vec<String>,
}

fn ignore_path(root: &Path, strategy: Strategy) -> std::path::PathBuf {
    root.join(STATE_DIR)
        .join(format!("{}-ignore.json", strategy.name()))
}

/// Load the user's ignored hashes. A missing file is created empty; a
/// malformed one warns and counts as empty.
pub fn load_ignored(root: &Path, strategy: Strategy) -> HashSet<u64> {
    let path = ignore_path(root, strategy);
    let data = match fs::read(&path) {
        Ok(data) => data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let empty = IgnoreFile {
                description: String::new(),
                ignored: Vec::new(),
            };
            if let Ok(json) = serde_json::to_string_pretty(&empty) {
                if let Some(dir) = path.parent() {
                    let _ = fs::create_dir_all(dir);
                }
                let _ = fs::write(&path, json);
            }
            return HashSet::new();
        }
        Err(_) => return HashSet::new(),
    };

    match serde_json::from_slice::<IgnoreFile>(&data) {
        Ok(file) => file
            .ignored
            .iter()
            .filter_map(|hex| u64::from_str_radix(hex, 16).ok())
            .collect(),
        Err(err) => {
            eprintln!("warning: could not parse {}: {err}", path.display());
            HashSet::new()
        }
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
