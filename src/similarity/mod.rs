//! Token-level similarity between occurrences of the same pattern.
//!
//! A window hash only proves that two occurrences share shape;
//! clustering on raw-token Jaccard separates occurrences that share
//! vocabulary from those that merely collide structurally. Each hash
//! bucket splits into similarity-connected clusters that the filter
//! treats as independent match candidates.

pub mod union_find;

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::detect::Location;
use crate::line::SourceLine;
use crate::parser::is_separator;
use union_find::UnionFind;

/// Tokens also terminate at quote characters, which the separator set
/// does not include.
fn is_token_boundary(c: char) -> bool {
    is_separator(c) || c == '"' || c == '\'' || c == '`'
}

/// Split a source line into tokens. Never yields an empty token.
pub fn tokenize_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in line.chars() {
        if is_token_boundary(c) {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// The union of tokens across a window's original text.
pub fn window_tokens(records: &[SourceLine]) -> HashSet<String> {
    let mut tokens = HashSet::new();
    for record in records {
        tokens.extend(tokenize_line(&record.source));
    }
    tokens
}

/// Jaccard similarity of two token sets. Two empty sets are fully
/// similar; one empty set is fully dissimilar.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// A similarity-connected subset of one bucket's occurrences, with the
/// mean of its internal pairwise similarities (1.0 for singletons).
pub struct Cluster {
    pub locations: Vec<Location>,
    pub similarity: f64,
}

/// Split a bucket's occurrences into clusters whose members are
/// transitively connected by pairwise similarity at or above
/// `threshold`. Clusters come back largest first; input order breaks
/// ties, so callers that pass sorted locations get deterministic
/// output.
pub fn cluster_by_similarity(locations: &[Location], threshold: f64) -> Vec<Cluster> {
    let n = locations.len();
    if n < 2 {
        return vec![Cluster {
            locations: locations.to_vec(),
            similarity: 1.0,
        }];
    }

    let tokens: Vec<HashSet<String>> = locations
        .iter()
        .map(|loc| window_tokens(&loc.records))
        .collect();

    let mut uf = UnionFind::new(n);
    let mut similarities: HashMap<(usize, usize), f64> = HashMap::new();
    for i in 0..n {
        for j in i + 1..n {
            let sim = jaccard(&tokens[i], &tokens[j]);
            similarities.insert((i, j), sim);
            if sim >= threshold {
                uf.union(i, j);
            }
        }
    }

    let mut components: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for i in 0..n {
        components.entry(uf.find(i)).or_default().push(i);
    }

    let mut clusters: Vec<Cluster> = components
        .into_values()
        .map(|members| {
            let mut total = 0.0;
            let mut pairs = 0usize;
            for (pos, &i) in members.iter().enumerate() {
                for &j in &members[pos + 1..] {
                    total += similarities[&(i, j)];
                    pairs += 1;
                }
            }
            let similarity = if pairs == 0 { 1.0 } else { total / pairs as f64 };
            Cluster {
                locations: members.iter().map(|&i| locations[i].clone()).collect(),
                similarity,
            }
        })
        .collect();

    clusters.sort_by(|a, b| b.locations.len().cmp(&a.locations.len()));
    clusters
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
