use super::*;
use std::fs;

fn touch(dir: &Path, rel: &str) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "x := 1\n").unwrap();
}

#[test]
fn collects_only_the_configured_extension() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "a.go");
    touch(dir.path(), "sub/b.go");
    touch(dir.path(), "c.rs");
    touch(dir.path(), "README.md");

    let files = source_files(dir.path(), ".go", &ExcludeList::new(&[]));
    let names: Vec<String> = files
        .iter()
        .map(|p| p.strip_prefix(dir.path()).unwrap().display().to_string())
        .collect();
    assert_eq!(names, vec!["a.go", "sub/b.go"]);
}

#[test]
fn extension_matching_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "a.go");
    touch(dir.path(), "b.GO");

    let files = source_files(dir.path(), ".go", &ExcludeList::new(&[]));
    assert_eq!(files.len(), 2);
}

#[test]
fn git_dir_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "a.go");
    touch(dir.path(), ".git/hooks/b.go");

    let files = source_files(dir.path(), ".go", &ExcludeList::new(&[]));
    assert_eq!(files.len(), 1);
}

#[test]
fn exclude_globs_match_basenames() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "api.pb.go");
    touch(dir.path(), "api.go");
    touch(dir.path(), "types_gen.go");

    let exclude = ExcludeList::from_arg("*.pb.go, *_gen.go");
    let files = source_files(dir.path(), ".go", &exclude);
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("api.go"));
}

#[test]
fn exclude_substrings_match_full_paths() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "src/handler.go");
    touch(dir.path(), "generated/handler.go");

    let exclude = ExcludeList::new(&["generated".to_string()]);
    let files = source_files(dir.path(), ".go", &exclude);
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("src/handler.go"));
}

#[test]
fn empty_exclude_arg_excludes_nothing() {
    let exclude = ExcludeList::from_arg("");
    assert!(exclude.is_empty());
    assert!(!exclude.matches(Path::new("anything.go")));

    let exclude = ExcludeList::from_arg(" , ,");
    assert!(exclude.is_empty());
}

#[test]
fn results_are_sorted() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "z.go");
    touch(dir.path(), "a.go");
    touch(dir.path(), "m/n.go");

    let files = source_files(dir.path(), ".go", &ExcludeList::new(&[]));
    let mut sorted = files.clone();
    sorted.sort();
    assert_eq!(files, sorted);
}
