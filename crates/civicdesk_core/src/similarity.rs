//! Bag-of-words overlap between two complaint texts.

use crate::normalize::normalize;
use std::collections::HashSet;

/// Jaccard overlap between two pre-normalized token sets.
///
/// Both sets empty scores 0.0: two blank reports are not a match.
pub fn jaccard(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Similarity score in `[0, 1]` between two raw texts.
///
/// Normalizes both sides, splits into token sets (duplicate tokens collapse)
/// and computes the Jaccard overlap. Symmetric.
pub fn similarity(text_a: &str, text_b: &str) -> f64 {
    let norm_a = normalize(text_a);
    let norm_b = normalize(text_b);
    let set_a: HashSet<&str> = norm_a.split_whitespace().collect();
    let set_b: HashSet<&str> = norm_b.split_whitespace().collect();
    jaccard(&set_a, &set_b)
}
