use super::*;
use crate::parser::{LineFilter, parse_content};
use std::path::Path;

fn records(content: &str) -> Vec<SourceLine> {
    parse_content(content, Strategy::NormalizedIndent, &LineFilter::new("//", &[]))
}

fn file_map(files: &[(&str, &str)]) -> HashMap<PathBuf, Vec<SourceLine>> {
    files
        .iter()
        .map(|(name, content)| (PathBuf::from(name), records(content)))
        .collect()
}

fn params(min_occur: usize, min_size: usize) -> DetectParams {
    DetectParams {
        min_occur,
        min_size,
        max_size: 0,
        keep_overlaps: false,
    }
}

fn run(files: &[(&str, &str)], params: &DetectParams) -> DetectOutcome {
    detect(
        &file_map(files),
        Strategy::NormalizedIndent,
        params,
        &CancelToken::new(),
    )
}

#[test]
fn exact_duplicate_across_two_files() {
    let body = "func a() {\n    return 1\n}\n";
    let outcome = run(&[("a.go", body), ("b.go", body)], &params(2, 3));

    assert_eq!(outcome.patterns.len(), 1);
    let locations = outcome.patterns.values().next().unwrap();
    assert_eq!(locations.len(), 2);
    for loc in locations {
        assert_eq!(loc.len(), 3);
        assert_eq!(loc.line_start, 1);
    }
    assert_eq!(outcome.stopped_at, 3);
}

#[test]
fn no_duplicates_in_distinct_files() {
    let outcome = run(
        &[
            ("a.go", "alpha x\nbeta y\ngamma z\n"),
            ("b.go", "one x\ntwo y\nthree z\n"),
        ],
        &params(2, 3),
    );
    assert!(outcome.patterns.is_empty());
}

#[test]
fn file_shorter_than_window_is_ignored() {
    let outcome = run(&[("a.go", "x\ny\n"), ("b.go", "x\ny\n")], &params(2, 3));
    assert!(outcome.patterns.is_empty());
}

#[test]
fn growth_absorbs_shorter_windows() {
    // The 5-line block appears twice with an unrelated line between;
    // only the grown 5-line pattern may be reported, none of its
    // 3- or 4-line sub-windows.
    let content = "if x {\n    return y\n}\ndo z\ndone\nzzz filler\nif x {\n    return y\n}\ndo z\ndone\n";
    let outcome = run(&[("a.go", content)], &params(2, 3));

    assert_eq!(outcome.patterns.len(), 1, "sub-windows must be absorbed");
    let locations = outcome.patterns.values().next().unwrap();
    assert_eq!(locations.len(), 2);
    for loc in locations {
        assert_eq!(loc.len(), 5);
    }
    let starts: Vec<usize> = locations.iter().map(|l| l.line_start).collect();
    assert_eq!(starts, vec![1, 7]);
    assert_eq!(outcome.stopped_at, 5);
}

#[test]
fn overlap_pruning_keeps_earliest_disjoint_starts() {
    // Six identical statements: base windows would start at indices
    // 0..=3, but only 0 and 3 fit without overlapping.
    let content = "x := 0\n".repeat(6);
    let outcome = run(&[("a.go", &content)], &params(2, 3));

    assert_eq!(outcome.patterns.len(), 1);
    let locations = outcome.patterns.values().next().unwrap();
    let starts: Vec<usize> = locations.iter().map(|l| l.line_start).collect();
    assert_eq!(starts, vec![1, 4]);
    for loc in locations {
        assert_eq!(loc.len(), 3);
    }
}

#[test]
fn keep_overlaps_lets_windows_grow_through_each_other() {
    let content = "x := 0\n".repeat(6);
    let mut p = params(2, 3);
    p.keep_overlaps = true;
    let outcome = run(&[("a.go", &content)], &p);

    // With overlaps kept, starts 0 and 1 both survive to length 5.
    assert_eq!(outcome.patterns.len(), 1);
    let locations = outcome.patterns.values().next().unwrap();
    assert_eq!(locations.len(), 2);
    for loc in locations {
        assert_eq!(loc.len(), 5);
    }
    let starts: Vec<usize> = locations.iter().map(|l| l.index).collect();
    assert_eq!(starts, vec![0, 1]);
}

#[test]
fn max_size_suppresses_patterns_reaching_the_cap() {
    // Two identical 6-line files. Uncapped, the whole file grows into
    // one 6-line pattern; capped at 4, every window is absorbed into
    // the capped generation and the capped generation itself is never
    // emitted.
    let body = "a1 x\nb2 y\nc3 z\nd4 x\ne5 y\nf6 z\n";
    let mut p = params(2, 3);
    p.max_size = 4;
    let outcome = run(&[("a.go", body), ("b.go", body)], &p);

    assert!(outcome.patterns.is_empty());
}

#[test]
fn max_size_leaves_shorter_patterns_alone() {
    // Six identical statements stop growing at length 3 on their own;
    // a cap of 4 never comes into play.
    let content = "x := 0\n".repeat(6);
    let mut p = params(2, 3);
    p.max_size = 4;
    let outcome = run(&[("a.go", &content)], &p);

    assert_eq!(outcome.patterns.len(), 1);
    let locations = outcome.patterns.values().next().unwrap();
    let starts: Vec<usize> = locations.iter().map(|l| l.line_start).collect();
    assert_eq!(starts, vec![1, 4]);
}

#[test]
fn unbounded_growth_reports_whole_file() {
    let body = "a1 x\nb2 y\nc3 z\nd4 x\ne5 y\nf6 z\n";
    let outcome = run(&[("a.go", body), ("b.go", body)], &params(2, 3));

    assert_eq!(outcome.patterns.len(), 1);
    let locations = outcome.patterns.values().next().unwrap();
    for loc in locations {
        assert_eq!(loc.len(), 6);
        assert_eq!(loc.line_start, 1);
    }
    assert_eq!(outcome.stopped_at, 6);
}

#[test]
fn occurrence_floor_filters_buckets() {
    let body = "func a() {\n    return 1\n}\n";
    let outcome = run(&[("a.go", body), ("b.go", body)], &params(3, 3));
    assert!(outcome.patterns.is_empty());
}

#[test]
fn cancelled_token_stops_before_growth() {
    let body = "func a() {\n    return 1\n}\n";
    let cancel = CancelToken::new();
    cancel.cancel();
    let outcome = detect(
        &file_map(&[("a.go", body), ("b.go", body)]),
        Strategy::NormalizedIndent,
        &params(2, 3),
        &cancel,
    );
    // The base generation never froze; nothing is reported.
    assert!(outcome.patterns.is_empty());
}

#[test]
fn locations_record_entry_indices() {
    let content = "zzz filler\nfunc a() {\n    return 1\n}\n";
    let body = "func a() {\n    return 1\n}\n";
    let outcome = run(&[("a.go", content), ("b.go", body)], &params(2, 3));

    assert_eq!(outcome.patterns.len(), 1);
    let locations = outcome.patterns.values().next().unwrap();
    let a = locations.iter().find(|l| l.path == Path::new("a.go")).unwrap();
    let b = locations.iter().find(|l| l.path == Path::new("b.go")).unwrap();
    assert_eq!((a.index, a.line_start), (1, 2));
    assert_eq!((b.index, b.line_start), (0, 1));
}
