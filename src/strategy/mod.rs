//! Fingerprinting strategies.
//!
//! A strategy decides which lines matter, what payload each line
//! contributes to a window hash, and how a matched window is scored.
//! Strategies are a closed set dispatched by `match`; the on-disk
//! state files (results, cache, ignore list) are namespaced by
//! `Strategy::name`.

pub mod preparse;

use std::collections::HashSet;

use crate::line::{Fingerprint, SourceLine};
use crate::parser::{LineFilter, first_word, indent_width};

/// Access modifiers that can start an inlineable one-liner method.
const ACCESS_MODIFIERS: &[&str] = &["public", "private", "internal", "protected"];

/// Inlineable shapes are only meaningful between 3 and 6 lines.
const INLINEABLE_MIN: usize = 3;
const INLINEABLE_MAX: usize = 6;

/// FNV-1a 64-bit constants.
const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Exact indent delta plus first word. The default.
    WordIndent,
    /// Indent delta direction (-1/0/+1) plus first word; tolerant of
    /// reformatted indentation.
    NormalizedIndent,
    /// First word only; ignores indentation entirely.
    WordOnly,
    /// First word only, scored to surface duplicate one-liner methods.
    Inlineable,
}

impl Strategy {
    pub const ALL_NAMES: &'static [&'static str] = &[
        "word-indent",
        "normalized-indent",
        "word-only",
        "inlineable",
    ];

    /// Stable identifier; used to namespace all files under `.quickdup/`.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::WordIndent => "word-indent",
            Strategy::NormalizedIndent => "normalized-indent",
            Strategy::WordOnly => "word-only",
            Strategy::Inlineable => "inlineable",
        }
    }

    pub fn from_name(name: &str) -> Option<Strategy> {
        match name {
            "word-indent" => Some(Strategy::WordIndent),
            "normalized-indent" => Some(Strategy::NormalizedIndent),
            "word-only" => Some(Strategy::WordOnly),
            "inlineable" => Some(Strategy::Inlineable),
            _ => None,
        }
    }

    /// Content normalization before line splitting. All strategies
    /// blank out C-style block comments.
    pub fn preparse(&self, content: &str) -> String {
        preparse::strip_block_comments(content)
    }

    /// Parse one physical line into a record, or `None` to skip it.
    ///
    /// `prev` is the most recently *emitted* record, not the textual
    /// predecessor: indent deltas are relative to the previous
    /// non-skipped line, with an initial baseline of zero.
    pub fn parse_line(
        &self,
        filter: &LineFilter,
        line_number: usize,
        line: &str,
        prev: Option<&SourceLine>,
    ) -> Option<SourceLine> {
        if filter.is_whitespace_only(line)
            || filter.is_comment_only(line)
            || filter.skips_first_word(line)
        {
            return None;
        }

        let word = first_word(line).to_string();
        let fingerprint = match self {
            Strategy::WordIndent => {
                let delta = indent_width(line) - prev.map_or(0, |p| indent_width(&p.source));
                Fingerprint::WordIndent {
                    indent_delta: delta,
                    word,
                }
            }
            Strategy::NormalizedIndent => {
                let delta = indent_width(line) - prev.map_or(0, |p| indent_width(&p.source));
                Fingerprint::NormalizedIndent {
                    indent_delta: delta.signum(),
                    word,
                }
            }
            Strategy::WordOnly => Fingerprint::WordOnly { word },
            Strategy::Inlineable => Fingerprint::Inlineable { word },
        };

        Some(SourceLine::new(line_number, fingerprint, line.to_string()))
    }

    /// Fold the window's pre-computed hash bytes through FNV-1a.
    /// Equal hashes correspond to byte-identical payload sequences
    /// (modulo the usual 64-bit collision caveat).
    pub fn hash(&self, window: &[SourceLine]) -> u64 {
        let mut hash = FNV_OFFSET;
        for record in window {
            for &byte in record.hash_bytes() {
                hash ^= u64::from(byte);
                hash = hash.wrapping_mul(FNV_PRIME);
            }
        }
        hash
    }

    /// Ranking scalar for a matched window given the cluster's average
    /// token similarity. Similarity below 50% is treated as noise:
    /// the adjusted factor maps 0.5 -> 0 and 1.0 -> 1.
    pub fn score(&self, window: &[SourceLine], similarity: f64) -> i64 {
        let adjusted = (similarity * 2.0 - 1.0).max(0.0);
        match self {
            Strategy::WordIndent | Strategy::WordOnly => {
                (unique_words(window) as f64 * adjusted) as i64
            }
            Strategy::NormalizedIndent => score_normalized_indent(window, adjusted),
            Strategy::Inlineable => score_inlineable(window, adjusted),
        }
    }

    /// Hashes of structurally empty windows (closing braces, bare
    /// returns, function boundaries) that are never worth reporting.
    /// Built at startup with this strategy's own `hash`.
    pub fn blocked_hashes(&self) -> HashSet<u64> {
        let delta = match self {
            Strategy::WordIndent => 4,
            Strategy::NormalizedIndent => 1,
            Strategy::WordOnly => 0,
            // One-liner shapes are exactly what inlineable looks for.
            Strategy::Inlineable => return HashSet::new(),
        };

        let canonical: &[&[(i32, &str)]] = &[
            &[(-delta, "}"), (-delta, "}")],
            &[(-delta, "}"), (-delta, "}"), (-delta, "}")],
            &[(0, "return"), (-delta, "}")],
            &[(delta, "return"), (-delta, "}")],
            &[(-delta, "}"), (0, "return"), (-delta, "}")],
            &[(-delta, "}"), (0, "func")],
            &[(-delta, "}"), (0, "return")],
        ];

        canonical
            .iter()
            .map(|pattern| {
                let window: Vec<SourceLine> = pattern
                    .iter()
                    .map(|&(d, w)| self.canonical_record(d, w))
                    .collect();
                self.hash(&window)
            })
            .collect()
    }

    fn canonical_record(&self, indent_delta: i32, word: &str) -> SourceLine {
        let word = word.to_string();
        let fingerprint = match self {
            Strategy::WordIndent => Fingerprint::WordIndent { indent_delta, word },
            Strategy::NormalizedIndent => Fingerprint::NormalizedIndent { indent_delta, word },
            Strategy::WordOnly => Fingerprint::WordOnly { word },
            Strategy::Inlineable => Fingerprint::Inlineable { word },
        };
        SourceLine::new(0, fingerprint, String::new())
    }
}

fn unique_words(window: &[SourceLine]) -> usize {
    window.iter().map(SourceLine::word).collect::<HashSet<_>>().len()
}

/// Unique words discounted by brace imbalance: a window that closes
/// scopes it never opened (or vice versa) is likelier to straddle two
/// unrelated constructs, so its vocabulary counts for less. The cubed
/// similarity factor and the small length bonus bias this strategy
/// toward long, near-identical stretches.
fn score_normalized_indent(window: &[SourceLine], adjusted: f64) -> i64 {
    let mut running = 0i32;
    let mut lowest = 0i32;
    for record in window {
        running += record.fingerprint.indent_delta().unwrap_or(0);
        lowest = lowest.min(running);
    }
    let imbalance = running.max(0) + (-lowest).max(0);
    let effective = (unique_words(window) as i32 - imbalance).max(0);

    (f64::from(effective) * adjusted.powi(3)) as i64 + (window.len() / 20) as i64
}

/// Non-zero only for access-modifier-led one-liner method shapes:
/// `modifier { return }` or `modifier return }` (brace on the same
/// line), optionally followed by trailing closer lines, 3-6 lines total.
fn score_inlineable(window: &[SourceLine], adjusted: f64) -> i64 {
    if window.len() < INLINEABLE_MIN || window.len() > INLINEABLE_MAX {
        return 0;
    }
    let words: Vec<&str> = window.iter().map(SourceLine::word).collect();
    if !ACCESS_MODIFIERS.contains(&words[0]) {
        return 0;
    }
    let braced = words.len() >= 4 && words[1] == "{" && words[2] == "return" && words[3] == "}";
    let inline = words[1] == "return" && words[2] == "}";
    if !braced && !inline {
        return 0;
    }
    50 + (adjusted * 50.0) as i64
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
