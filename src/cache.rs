//! Incremental cache of parsed line records, one binary blob per
//! strategy under `.quickdup/`.
//!
//! An entry is reused only when the blob's format version matches and
//! the file's (mtime, size) pair is unchanged; size is part of the key
//! so filesystems with coarse mtime resolution still invalidate on
//! same-second edits. Every failure mode — unreadable blob, decode
//! error, version drift, write error — degrades to a cold cache and
//! never poisons a run.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use serde::{Deserialize, Serialize};

use crate::line::{Fingerprint, SourceLine};
use crate::strategy::Strategy;

/// Bump when the record format changes; a mismatch discards the blob.
const CACHE_VERSION: u32 = 1;

/// Directory under the scan root holding all per-strategy state.
pub const STATE_DIR: &str = ".quickdup";

#[derive(Serialize, Deserialize)]
pub struct FileCache {
    version: u32,
    files: HashMap<PathBuf, CachedFile>,
}

#[derive(Serialize, Deserialize)]
struct CachedFile {
    mtime_ns: u128,
    size: u64,
    records: Vec<CachedRecord>,
}

/// The serializable subset of a record; hash bytes are recomputed on
/// load rather than stored.
#[derive(Serialize, Deserialize)]
struct CachedRecord {
    line_number: usize,
    fingerprint: Fingerprint,
    source: String,
}

pub fn cache_path(root: &Path, strategy: Strategy) -> PathBuf {
    root.join(STATE_DIR)
        .join(format!("{}-cache.bin", strategy.name()))
}

/// (mtime in nanoseconds since the epoch, byte size) for a file.
fn file_stamp(path: &Path) -> Option<(u128, u64)> {
    let meta = fs::metadata(path).ok()?;
    let mtime = meta
        .modified()
        .ok()?
        .duration_since(UNIX_EPOCH)
        .ok()?
        .as_nanos();
    Some((mtime, meta.len()))
}

/// Load the strategy's cache blob, or `None` for any failure.
pub fn load(root: &Path, strategy: Strategy) -> Option<FileCache> {
    let bytes = fs::read(cache_path(root, strategy)).ok()?;
    let cache: FileCache = bincode::deserialize(&bytes).ok()?;
    if cache.version != CACHE_VERSION {
        return None;
    }
    Some(cache)
}

impl FileCache {
    /// Rehydrate the cached records for `path` if its stamp still
    /// matches; `None` forces a re-parse.
    pub fn lookup(&self, path: &Path) -> Option<Vec<SourceLine>> {
        let cached = self.files.get(path)?;
        let (mtime_ns, size) = file_stamp(path)?;
        if cached.mtime_ns != mtime_ns || cached.size != size {
            return None;
        }
        Some(
            cached
                .records
                .iter()
                .map(|r| SourceLine::new(r.line_number, r.fingerprint.clone(), r.source.clone()))
                .collect(),
        )
    }
}

/// Write the cache back from this run's parsed files (cache hits
/// included, which is what merges old and fresh entries). Errors are
/// swallowed; the next run simply starts cold.
pub fn save(root: &Path, strategy: Strategy, file_data: &HashMap<PathBuf, Vec<SourceLine>>) {
    let mut files = HashMap::with_capacity(file_data.len());
    for (path, records) in file_data {
        let Some((mtime_ns, size)) = file_stamp(path) else {
            continue;
        };
        let records = records
            .iter()
            .map(|r| CachedRecord {
                line_number: r.line_number,
                fingerprint: r.fingerprint.clone(),
                source: r.source.clone(),
            })
            .collect();
        files.insert(
            path.clone(),
            CachedFile {
                mtime_ns,
                size,
                records,
            },
        );
    }

    let cache = FileCache {
        version: CACHE_VERSION,
        files,
    };
    let Ok(bytes) = bincode::serialize(&cache) else {
        return;
    };
    let dir = root.join(STATE_DIR);
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let _ = fs::write(cache_path(root, strategy), bytes);
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
