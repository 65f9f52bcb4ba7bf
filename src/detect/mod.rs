//! Grow-based duplicate window mining.
//!
//! ## Algorithm
//!
//! **Base generation:** slide a `min_size` window over every file's
//! records, hashing each window into a bucket map.
//!
//! **Generation filter:** prune same-file overlapping occurrences
//! within each bucket (earliest wins, unless `keep_overlaps`), then
//! drop buckets with fewer than `min_occur` occurrences.
//!
//! **Grow:** extend every surviving occurrence by one record at its
//! tail, rehash, and filter again. Occurrences of the previous
//! generation that were absorbed into a survivor — same start, or
//! starting one record later so the shorter window sits entirely
//! inside the longer one — are discarded; whatever remains above
//! `min_occur` is frozen into the result at its length.
//!
//! Growth repeats until a generation comes up empty (or hits
//! `max_size`); the residual generation is never emitted. The result
//! is the set of maximal duplicates: no reported window survives as a
//! sub-window of a longer reported one.

pub mod overlap;
pub mod windows;

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::line::SourceLine;
use crate::strategy::Strategy;

/// A concrete placement of a pattern window in one file.
#[derive(Debug, Clone)]
pub struct Location {
    pub path: PathBuf,
    /// 1-based line number of the window's first record.
    pub line_start: usize,
    /// Start index into the file's record sequence.
    pub index: usize,
    /// Copy of the window's records.
    pub records: Vec<SourceLine>,
}

impl Location {
    /// Window length in records.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Window hash to occurrence list.
pub type Buckets = HashMap<u64, Vec<Location>>;

#[derive(Debug, Clone)]
pub struct DetectParams {
    pub min_occur: usize,
    pub min_size: usize,
    /// 0 means unbounded growth.
    pub max_size: usize,
    pub keep_overlaps: bool,
}

/// Cooperative cancellation, checked at stage boundaries only.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

pub struct DetectOutcome {
    /// Maximal patterns, keyed by window hash.
    pub patterns: Buckets,
    /// Longest window length that still met the occurrence threshold.
    pub stopped_at: usize,
}

/// Mine maximal duplicate windows from the parsed files.
///
/// Cancellation is honored between growth iterations; an early stop
/// returns the buckets frozen so far and leaves the in-flight
/// generation unreported.
pub fn detect(
    file_data: &HashMap<PathBuf, Vec<SourceLine>>,
    strategy: Strategy,
    params: &DetectParams,
    cancel: &CancelToken,
) -> DetectOutcome {
    let base = windows::base_windows(file_data, strategy, params.min_size);
    let mut current = filter_generation(base, params);
    let mut len = params.min_size;
    let mut stopped_at = params.min_size;
    let mut patterns = Buckets::new();

    while !current.is_empty() {
        if cancel.is_cancelled() {
            break;
        }
        if params.max_size != 0 && len >= params.max_size {
            // The capped generation is degenerate by configuration;
            // drop it rather than report it.
            break;
        }
        len += 1;

        let extended = windows::extend_windows(&current, file_data, strategy, len);
        let next = filter_generation(extended, params);
        if !next.is_empty() {
            stopped_at = len;
        }

        let absorbed = absorbed_starts(&next);
        freeze(&mut patterns, current, &absorbed, params.min_occur);
        current = next;
    }

    DetectOutcome {
        patterns,
        stopped_at,
    }
}

/// Apply the per-generation invariants: occurrences sorted by
/// (path, index), same-file overlaps pruned, buckets at or above the
/// occurrence floor.
fn filter_generation(generation: Buckets, params: &DetectParams) -> Buckets {
    let mut filtered = Buckets::with_capacity(generation.len());
    for (hash, locations) in generation {
        let locations = overlap::order_and_prune(locations, params.keep_overlaps);
        if locations.len() >= params.min_occur {
            filtered.insert(hash, locations);
        }
    }
    filtered
}

/// Starts covered by the next generation's survivors. A window of
/// length L-1 fits inside a survivor window of length L only when it
/// begins at the survivor's start or one record after it.
fn absorbed_starts(next: &Buckets) -> HashMap<PathBuf, HashSet<usize>> {
    let mut absorbed: HashMap<PathBuf, HashSet<usize>> = HashMap::new();
    for location in next.values().flatten() {
        let starts = absorbed.entry(location.path.clone()).or_default();
        starts.insert(location.index);
        starts.insert(location.index + 1);
    }
    absorbed
}

/// Emit the previous generation's unabsorbed occurrences.
fn freeze(
    patterns: &mut Buckets,
    generation: Buckets,
    absorbed: &HashMap<PathBuf, HashSet<usize>>,
    min_occur: usize,
) {
    for (hash, mut locations) in generation {
        locations.retain(|loc| {
            !absorbed
                .get(&loc.path)
                .is_some_and(|starts| starts.contains(&loc.index))
        });
        if locations.len() >= min_occur {
            patterns.insert(hash, locations);
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
