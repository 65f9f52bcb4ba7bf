//! The per-line record produced by parsing: line number, fingerprint
//! payload, and the original text. Records are immutable once built;
//! their hash-contribution bytes are computed at construction so the
//! detector's hot loop only concatenates byte slices.

use serde::{Deserialize, Serialize};

/// Strategy-specific fingerprint payload for one source line.
///
/// Equal payloads always serialize to identical hash bytes, which is
/// what makes window hashes comparable across files and runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fingerprint {
    /// Signed indent delta (spaces = 1 unit, tabs = 4) plus first word.
    WordIndent { indent_delta: i32, word: String },
    /// Indent delta clamped to -1/0/+1 plus first word.
    NormalizedIndent { indent_delta: i32, word: String },
    /// First word only.
    WordOnly { word: String },
    /// First word only; scoring recognizes inlineable method shapes.
    Inlineable { word: String },
}

impl Fingerprint {
    /// Canonical byte serialization folded into the window hash.
    fn hash_bytes(&self) -> Vec<u8> {
        match self {
            Fingerprint::WordIndent { indent_delta, word }
            | Fingerprint::NormalizedIndent { indent_delta, word } => {
                format!("{indent_delta}|{word}\n").into_bytes()
            }
            Fingerprint::WordOnly { word } | Fingerprint::Inlineable { word } => {
                format!("{word}\n").into_bytes()
            }
        }
    }

    /// The first-word token carried by every payload variant.
    pub fn word(&self) -> &str {
        match self {
            Fingerprint::WordIndent { word, .. }
            | Fingerprint::NormalizedIndent { word, .. }
            | Fingerprint::WordOnly { word }
            | Fingerprint::Inlineable { word } => word,
        }
    }

    /// Indent delta, for the variants that carry one.
    pub fn indent_delta(&self) -> Option<i32> {
        match self {
            Fingerprint::WordIndent { indent_delta, .. }
            | Fingerprint::NormalizedIndent { indent_delta, .. } => Some(*indent_delta),
            _ => None,
        }
    }
}

/// A parsed source line: 1-based line number in the original file,
/// fingerprint payload, and the raw text (used for tokenization and
/// display). Skipped lines never become records, but line numbers of
/// emitted records still point into the original file.
#[derive(Debug, Clone)]
pub struct SourceLine {
    pub line_number: usize,
    pub fingerprint: Fingerprint,
    pub source: String,
    hash_bytes: Vec<u8>,
}

impl SourceLine {
    pub fn new(line_number: usize, fingerprint: Fingerprint, source: String) -> Self {
        let hash_bytes = fingerprint.hash_bytes();
        Self {
            line_number,
            fingerprint,
            source,
            hash_bytes,
        }
    }

    /// Pre-computed hash contribution of this record.
    pub fn hash_bytes(&self) -> &[u8] {
        &self.hash_bytes
    }

    pub fn word(&self) -> &str {
        self.fingerprint.word()
    }
}
