//! Jaccard similarity over token sets.
//!
//! # Invariants
//! - Result is within `[0, 1]` and symmetric in its arguments.
//! - Two empty sets score `1`; exactly one empty set scores `0`.

use std::collections::HashSet;
use std::hash::Hash;

/// Scores two token sequences, collapsing repeats within each.
pub fn similarity<T: AsRef<str>>(a: &[T], b: &[T]) -> f64 {
    let set_a = a.iter().map(|token| token.as_ref()).collect::<HashSet<&str>>();
    let set_b = b.iter().map(|token| token.as_ref()).collect::<HashSet<&str>>();
    set_similarity(&set_a, &set_b)
}

/// Scores two prebuilt token sets.
///
/// Two blank notes count as identical. That convention can report blank
/// notes as duplicates of each other and is kept on purpose.
pub fn set_similarity<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        (false, false) => {}
    }

    let (smaller, larger) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let intersection = smaller.iter().filter(|token| larger.contains(*token)).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::similarity;
    use proptest::prelude::*;

    const EMPTY: [&str; 0] = [];

    #[test]
    fn empty_sets_follow_blank_note_convention() {
        assert_eq!(similarity(&EMPTY, &EMPTY), 1.0);
        assert_eq!(similarity(&EMPTY, &["x"]), 0.0);
        assert_eq!(similarity(&["x"], &EMPTY), 0.0);
    }

    #[test]
    fn one_differing_token_each_side_scores_three_fifths() {
        let a = ["apple", "banana", "cherry", "date"];
        let b = ["apple", "banana", "cherry", "fig"];
        assert_eq!(similarity(&a, &b), 0.6);
    }

    #[test]
    fn repeats_collapse_before_scoring() {
        let a = ["alpha", "alpha", "beta"];
        let b = ["alpha", "beta", "beta", "beta"];
        assert_eq!(similarity(&a, &b), 1.0);
    }

    #[test]
    fn disjoint_sets_score_zero() {
        assert_eq!(similarity(&["one", "two"], &["three", "four"]), 0.0);
    }

    proptest! {
        #[test]
        fn similarity_is_symmetric(
            a in prop::collection::vec("[a-e]{1,3}", 0..12),
            b in prop::collection::vec("[a-e]{1,3}", 0..12),
        ) {
            prop_assert_eq!(similarity(&a, &b), similarity(&b, &a));
        }

        #[test]
        fn similarity_stays_in_unit_range(
            a in prop::collection::vec("[a-e]{1,3}", 0..12),
            b in prop::collection::vec("[a-e]{1,3}", 0..12),
        ) {
            let score = similarity(&a, &b);
            prop_assert!((0.0..=1.0).contains(&score));
        }

        #[test]
        fn non_empty_set_is_identical_to_itself(
            a in prop::collection::vec("[a-z]{3,6}", 1..12),
        ) {
            prop_assert_eq!(similarity(&a, &a), 1.0);
        }
    }
}
