//! Occurrence ordering and same-file overlap pruning.

use super::Location;

/// Sort occurrences by (path, start index) and, unless
/// `keep_overlaps`, drop same-file occurrences whose window intersects
/// an earlier kept one. The sweep keeps a `last_end` cursor per file:
/// an occurrence survives iff its start is at or past the cursor.
///
/// The sort also pins down bucket order, which would otherwise depend
/// on worker merge timing.
pub fn order_and_prune(mut locations: Vec<Location>, keep_overlaps: bool) -> Vec<Location> {
    locations.sort_by(|a, b| a.path.cmp(&b.path).then(a.index.cmp(&b.index)));
    if keep_overlaps || locations.len() <= 1 {
        return locations;
    }

    let mut kept: Vec<Location> = Vec::with_capacity(locations.len());
    let mut last_end = 0usize;
    for location in locations {
        let same_file = kept.last().is_some_and(|prev| prev.path == location.path);
        if !same_file || location.index >= last_end {
            last_end = location.index + location.len();
            kept.push(location);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::Fingerprint;
    use crate::line::SourceLine;
    use std::path::PathBuf;

    fn loc(path: &str, index: usize, len: usize) -> Location {
        let records = (0..len)
            .map(|i| {
                SourceLine::new(
                    index + i + 1,
                    Fingerprint::WordOnly {
                        word: "x".to_string(),
                    },
                    "x".to_string(),
                )
            })
            .collect();
        Location {
            path: PathBuf::from(path),
            line_start: index + 1,
            index,
            records,
        }
    }

    #[test]
    fn keeps_non_overlapping() {
        let pruned = order_and_prune(vec![loc("a", 0, 3), loc("a", 3, 3)], false);
        assert_eq!(pruned.len(), 2);
    }

    #[test]
    fn drops_overlapping_keeping_earliest() {
        let pruned = order_and_prune(
            vec![loc("a", 1, 3), loc("a", 0, 3), loc("a", 2, 3), loc("a", 3, 3)],
            false,
        );
        let starts: Vec<usize> = pruned.iter().map(|l| l.index).collect();
        assert_eq!(starts, vec![0, 3]);
    }

    #[test]
    fn different_files_never_overlap() {
        let pruned = order_and_prune(vec![loc("b", 0, 3), loc("a", 0, 3)], false);
        assert_eq!(pruned.len(), 2);
        assert_eq!(pruned[0].path, PathBuf::from("a"));
    }

    #[test]
    fn keep_overlaps_only_sorts() {
        let pruned = order_and_prune(vec![loc("a", 1, 3), loc("a", 0, 3)], true);
        let starts: Vec<usize> = pruned.iter().map(|l| l.index).collect();
        assert_eq!(starts, vec![0, 1]);
    }
}
