use super::*;
use crate::parser::{LineFilter, parse_content};

fn records(content: &str, strategy: Strategy) -> Vec<SourceLine> {
    parse_content(content, strategy, &LineFilter::new("//", &[]))
}

#[test]
fn name_round_trip() {
    for name in Strategy::ALL_NAMES {
        let strategy = Strategy::from_name(name).unwrap();
        assert_eq!(strategy.name(), *name);
    }
}

#[test]
fn unknown_name_is_rejected() {
    assert!(Strategy::from_name("token-stream").is_none());
    assert!(Strategy::from_name("").is_none());
}

#[test]
fn hash_is_deterministic_across_parses() {
    let content = "func a() {\n    x := 1\n}\n";
    let a = records(content, Strategy::WordIndent);
    let b = records(content, Strategy::WordIndent);
    assert_eq!(
        Strategy::WordIndent.hash(&a),
        Strategy::WordIndent.hash(&b)
    );
}

#[test]
fn hash_changes_with_word() {
    let a = records("foo x\nbar y\nbaz z\n", Strategy::WordOnly);
    let b = records("foo x\nbar y\nqux z\n", Strategy::WordOnly);
    assert_ne!(Strategy::WordOnly.hash(&a), Strategy::WordOnly.hash(&b));
}

#[test]
fn hash_changes_with_indent_delta() {
    let a = records("if x {\n    y()\n}\n", Strategy::WordIndent);
    let b = records("if x {\ny()\n}\n", Strategy::WordIndent);
    assert_ne!(Strategy::WordIndent.hash(&a), Strategy::WordIndent.hash(&b));
}

#[test]
fn word_only_ignores_indent() {
    let a = records("if x {\n    y()\n}\n", Strategy::WordOnly);
    let b = records("if x {\ny()\n}\n", Strategy::WordOnly);
    assert_eq!(Strategy::WordOnly.hash(&a), Strategy::WordOnly.hash(&b));
}

#[test]
fn parse_line_skips_blank_comment_and_denied() {
    let filter = LineFilter::new("//", &["import"]);
    let strategy = Strategy::WordIndent;
    assert!(strategy.parse_line(&filter, 1, "", None).is_none());
    assert!(strategy.parse_line(&filter, 2, "   \t", None).is_none());
    assert!(strategy.parse_line(&filter, 3, "  // note", None).is_none());
    assert!(
        strategy
            .parse_line(&filter, 4, "import \"fmt\"", None)
            .is_none()
    );
    assert!(strategy.parse_line(&filter, 5, "x := 1", None).is_some());
}

#[test]
fn indent_delta_is_relative_to_previous_emitted() {
    let content = "func a() {\n    // note\n    x := 1\n}\n";
    let recs = records(content, Strategy::WordIndent);
    assert_eq!(recs.len(), 3);
    // The comment line is skipped but still counted.
    assert_eq!(recs[1].line_number, 3);
    // Delta is against line 1 (the previous emitted record), not line 2.
    assert_eq!(recs[1].fingerprint.indent_delta(), Some(4));
    assert_eq!(recs[2].fingerprint.indent_delta(), Some(-4));
}

#[test]
fn normalized_delta_is_clamped() {
    let recs = records("a\n        b\nc\n", Strategy::NormalizedIndent);
    assert_eq!(recs[1].fingerprint.indent_delta(), Some(1));
    assert_eq!(recs[2].fingerprint.indent_delta(), Some(-1));
}

#[test]
fn word_indent_score_scales_with_similarity() {
    let recs = records("alpha x\nbeta y\ngamma z\n", Strategy::WordIndent);
    assert_eq!(Strategy::WordIndent.score(&recs, 1.0), 3);
    assert_eq!(Strategy::WordIndent.score(&recs, 0.75), 1);
    // 50% similarity is the noise floor.
    assert_eq!(Strategy::WordIndent.score(&recs, 0.5), 0);
    assert_eq!(Strategy::WordIndent.score(&recs, 0.2), 0);
}

#[test]
fn word_indent_score_counts_unique_words() {
    let recs = records("x a\nx b\nx c\n", Strategy::WordIndent);
    assert_eq!(Strategy::WordIndent.score(&recs, 1.0), 1);
}

#[test]
fn normalized_score_balanced_window() {
    let recs = records("if x {\n    y()\n}\n", Strategy::NormalizedIndent);
    // Three unique words, no imbalance, full similarity.
    assert_eq!(Strategy::NormalizedIndent.score(&recs, 1.0), 3);
}

#[test]
fn normalized_score_discounts_imbalance() {
    let recs = records("if q {\n    with r\n}\ndo z\ndone\n", Strategy::NormalizedIndent);
    // Window "} / do z / done" closes a scope it never opened.
    let window = &recs[2..5];
    assert_eq!(Strategy::NormalizedIndent.score(window, 1.0), 2);
}

#[test]
fn normalized_score_length_bonus() {
    let content: String = (0..20).map(|i| format!("word{i}\n")).collect();
    let recs = records(&content, Strategy::NormalizedIndent);
    assert_eq!(recs.len(), 20);
    // At the noise floor the vocabulary term vanishes; only the
    // length bonus remains.
    assert_eq!(Strategy::NormalizedIndent.score(&recs, 0.5), 1);
    assert_eq!(Strategy::NormalizedIndent.score(&recs[..19], 0.5), 0);
}

#[test]
fn inlineable_braced_shape_scores() {
    let content = "public int GetX()\n{\n    return x;\n}\n";
    let recs = records(content, Strategy::Inlineable);
    assert_eq!(recs.len(), 4);
    assert_eq!(Strategy::Inlineable.score(&recs, 1.0), 100);
    assert_eq!(Strategy::Inlineable.score(&recs, 0.5), 50);
}

#[test]
fn inlineable_inline_shape_scores() {
    let content = "private string Name()\nreturn name;\n}\n";
    let recs = records(content, Strategy::Inlineable);
    assert_eq!(recs.len(), 3);
    assert!(Strategy::Inlineable.score(&recs, 1.0) > 0);
}

#[test]
fn inlineable_allows_trailing_closers() {
    let content = "public int GetX()\n{\n    return x;\n}\n}\n";
    let recs = records(content, Strategy::Inlineable);
    assert_eq!(recs.len(), 5);
    assert!(Strategy::Inlineable.score(&recs, 1.0) > 0);
}

#[test]
fn inlineable_rejects_other_shapes() {
    let strategy = Strategy::Inlineable;

    let not_modifier = records("func a()\nreturn x\n}\n", strategy);
    assert_eq!(strategy.score(&not_modifier, 1.0), 0);

    let too_long: String = format!(
        "public int GetX()\n{{\n    return x;\n}}\n{}",
        "filler\n".repeat(4)
    );
    let recs = records(&too_long, strategy);
    assert_eq!(recs.len(), 8);
    assert_eq!(strategy.score(&recs, 1.0), 0);

    let too_short = records("public x\nreturn y\n", strategy);
    assert_eq!(strategy.score(&too_short, 1.0), 0);
}

#[test]
fn blocked_hashes_cover_dedenting_braces() {
    // Each closing brace dedents, matching the canonical block-list
    // windows for both indent strategies.
    let content = "a {\n    b {\n        c\n    }\n}\n";
    for strategy in [Strategy::WordIndent, Strategy::NormalizedIndent] {
        let recs = records(content, strategy);
        let braces = &recs[3..5];
        assert_eq!(braces[0].word(), "}");
        assert!(
            strategy.blocked_hashes().contains(&strategy.hash(braces)),
            "{} should block a dedenting brace pair",
            strategy.name()
        );
    }
}

#[test]
fn blocked_hashes_cover_triple_brace() {
    let content = "a {\n    b {\n        c {\n            d\n        }\n    }\n}\n";
    let strategy = Strategy::NormalizedIndent;
    let recs = records(content, strategy);
    let braces = &recs[4..7];
    assert!(braces.iter().all(|r| r.word() == "}"));
    assert!(strategy.blocked_hashes().contains(&strategy.hash(braces)));
}

#[test]
fn inlineable_blocks_nothing() {
    assert!(Strategy::Inlineable.blocked_hashes().is_empty());
}

#[test]
fn flat_braces_are_not_blocked() {
    // Braces at column zero carry a zero delta and hash differently
    // from the canonical dedenting windows.
    let strategy = Strategy::NormalizedIndent;
    let recs = records("}\n}\n}\n", strategy);
    assert!(!strategy.blocked_hashes().contains(&strategy.hash(&recs)));
}
