//! Parallel window generation for the detector.
//!
//! Both stages partition their work across a pool of scoped OS
//! threads (one per logical CPU). Each worker fills a private bucket
//! map; the global map's mutex is taken once per worker, only for the
//! merge.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::thread;

use super::{Buckets, Location};
use crate::line::SourceLine;
use crate::strategy::Strategy;
use crate::util::worker_count;

/// Slide a `min_size` window over every file and bucket the hashes.
/// Files shorter than the window contribute nothing.
pub fn base_windows(
    file_data: &HashMap<PathBuf, Vec<SourceLine>>,
    strategy: Strategy,
    min_size: usize,
) -> Buckets {
    let mut files: Vec<&PathBuf> = file_data.keys().collect();
    if files.is_empty() {
        return Buckets::new();
    }
    files.sort();

    let workers = worker_count().min(files.len()).max(1);
    let chunk_size = files.len().div_ceil(workers);
    let global = Mutex::new(Buckets::new());

    thread::scope(|scope| {
        let global = &global;
        for chunk in files.chunks(chunk_size) {
            scope.spawn(move || {
                let mut local = Buckets::new();
                for &path in chunk {
                    let records = &file_data[path];
                    if records.len() < min_size {
                        continue;
                    }
                    for index in 0..=records.len() - min_size {
                        let window = &records[index..index + min_size];
                        local
                            .entry(strategy.hash(window))
                            .or_default()
                            .push(Location {
                                path: path.clone(),
                                line_start: window[0].line_number,
                                index,
                                records: window.to_vec(),
                            });
                    }
                }
                merge(global, local);
            });
        }
    });

    global.into_inner().unwrap()
}

/// Re-window every surviving occurrence at `new_len` records,
/// dropping those that would run past their file's end.
pub fn extend_windows(
    survivors: &Buckets,
    file_data: &HashMap<PathBuf, Vec<SourceLine>>,
    strategy: Strategy,
    new_len: usize,
) -> Buckets {
    let locations: Vec<&Location> = survivors.values().flatten().collect();
    if locations.is_empty() {
        return Buckets::new();
    }

    let workers = worker_count().min(locations.len()).max(1);
    let chunk_size = locations.len().div_ceil(workers);
    let global = Mutex::new(Buckets::new());

    thread::scope(|scope| {
        let global = &global;
        for chunk in locations.chunks(chunk_size) {
            scope.spawn(move || {
                let mut local = Buckets::new();
                for &location in chunk {
                    let records = &file_data[&location.path];
                    let end = location.index + new_len;
                    if end > records.len() {
                        continue;
                    }
                    let window = &records[location.index..end];
                    local
                        .entry(strategy.hash(window))
                        .or_default()
                        .push(Location {
                            path: location.path.clone(),
                            line_start: location.line_start,
                            index: location.index,
                            records: window.to_vec(),
                        });
                }
                merge(global, local);
            });
        }
    });

    global.into_inner().unwrap()
}

fn merge(global: &Mutex<Buckets>, local: Buckets) {
    let mut global = global.lock().unwrap();
    for (hash, mut locations) in local {
        global.entry(hash).or_default().append(&mut locations);
    }
}
