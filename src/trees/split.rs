//! Threshold search over a single orderable feature.
use crate::data::dataset::ClassLabel;
use std::collections::HashMap;

/// One retained threshold together with its weighted Gini score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitCandidate {
    pub threshold: f64,
    pub score: f64,
    pub left_size: usize,
    pub right_size: usize,
}

/// Every candidate threshold of a feature, ascending, and the best of them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SplitSearch {
    candidates: Vec<SplitCandidate>,
    best: Option<SplitCandidate>,
}

impl SplitSearch {
    pub fn candidates(&self) -> &[SplitCandidate] {
        &self.candidates
    }

    pub fn thresholds(&self) -> Vec<f64> {
        self.candidates.iter().map(|c| c.threshold).collect()
    }

    pub fn scores(&self) -> Vec<f64> {
        self.candidates.iter().map(|c| c.score).collect()
    }

    /// The candidate with the lowest score; the first one on ties.
    pub fn best(&self) -> Option<&SplitCandidate> {
        self.best.as_ref()
    }

    pub fn best_threshold(&self) -> Option<f64> {
        self.best.map(|c| c.threshold)
    }

    pub fn best_score(&self) -> Option<f64> {
        self.best.map(|c| c.score)
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Gini impurity of a subset given its per-class counts.
///
/// `1 - Σ (c_k / n)²`, zero for a pure subset and for an empty one.
pub fn gini_impurity(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    1.0 - counts
        .iter()
        .map(|&count| {
            let p = count as f64 / n;
            p * p
        })
        .sum::<f64>()
}

/// Scores every midpoint between adjacent distinct values of `feature_values`.
///
/// A sample goes left when its value is strictly below the threshold.
/// Thresholds leaving either side empty are dropped, and a feature with fewer
/// than two distinct values yields an empty search with no best candidate.
/// `feature_values` and `labels` must be parallel.
pub fn find_best_split<YT: ClassLabel>(feature_values: &[f64], labels: &[YT]) -> SplitSearch {
    debug_assert_eq!(feature_values.len(), labels.len());
    let total = labels.len();

    let mut order = (0..total).collect::<Vec<_>>();
    order.sort_by(|&a, &b| feature_values[a].total_cmp(&feature_values[b]));

    let mut distinct = order.iter().map(|&i| feature_values[i]).collect::<Vec<_>>();
    distinct.dedup();
    if distinct.len() < 2 {
        return SplitSearch::default();
    }

    let mut class_ids = HashMap::new();
    let label_ids = labels
        .iter()
        .map(|label| {
            let next = class_ids.len();
            *class_ids.entry(*label).or_insert(next)
        })
        .collect::<Vec<_>>();

    let mut left_counts = vec![0usize; class_ids.len()];
    let mut right_counts = vec![0usize; class_ids.len()];
    for &id in &label_ids {
        right_counts[id] += 1;
    }

    let mut candidates = Vec::with_capacity(distinct.len() - 1);
    let mut left_size = 0;
    for pair in distinct.windows(2) {
        // halves first so huge magnitudes cannot overflow
        let threshold = pair[0] / 2.0 + pair[1] / 2.0;
        if threshold.is_nan() {
            continue;
        }

        while left_size < total && feature_values[order[left_size]] < threshold {
            let id = label_ids[order[left_size]];
            left_counts[id] += 1;
            right_counts[id] -= 1;
            left_size += 1;
        }
        let right_size = total - left_size;
        if left_size == 0 || right_size == 0 {
            continue;
        }

        let score = (left_size as f64 / total as f64) * gini_impurity(&left_counts, left_size)
            + (right_size as f64 / total as f64) * gini_impurity(&right_counts, right_size);
        candidates.push(SplitCandidate {
            threshold,
            score,
            left_size,
            right_size,
        });
    }

    let best = candidates
        .iter()
        .copied()
        .min_by(|a, b| a.score.total_cmp(&b.score));

    SplitSearch { candidates, best }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gini_impurity() {
        assert_eq!(gini_impurity(&[4], 4), 0.0);
        assert_relative_eq!(gini_impurity(&[2, 2], 4), 0.5);
        assert_relative_eq!(gini_impurity(&[3, 1], 4), 0.375);
        assert_relative_eq!(gini_impurity(&[1, 1, 1], 3), 2.0 / 3.0);
        assert_eq!(gini_impurity(&[], 0), 0.0);
    }

    #[test]
    fn test_thresholds_are_midpoints() {
        let search = find_best_split(&[1.0, 2.0, 3.0, 4.0], &[0u8, 1, 0, 1]);
        assert_eq!(search.thresholds(), vec![1.5, 2.5, 3.5]);
        assert_eq!(search.scores().len(), 3);
    }

    #[test]
    fn test_thresholds_ascending_for_unsorted_input() {
        let search = find_best_split(&[4.0, 1.0, 3.0, 1.0, 2.0], &[1u8, 0, 1, 0, 0]);
        assert_eq!(search.thresholds(), vec![1.5, 2.5, 3.5]);
        assert_eq!(search.best_threshold(), Some(2.5));
        assert_eq!(search.best_score(), Some(0.0));
    }

    #[test]
    fn test_perfect_split() {
        let search = find_best_split(&[1.0, 1.0, 2.0, 2.0], &[0u8, 0, 1, 1]);
        assert_eq!(search.thresholds(), vec![1.5]);
        assert_eq!(search.best_threshold(), Some(1.5));
        assert_eq!(search.best_score(), Some(0.0));
    }

    #[test]
    fn test_best_is_strict_minimum() {
        let search = find_best_split(&[1.0, 2.0, 3.0, 4.0], &[0u8, 0, 1, 1]);
        let scores = search.scores();
        assert_relative_eq!(scores[0], 1.0 / 3.0);
        assert_relative_eq!(scores[1], 0.0);
        assert_relative_eq!(scores[2], 1.0 / 3.0);
        assert_eq!(search.best_threshold(), Some(2.5));
        let best = search.best().unwrap();
        assert_eq!((best.left_size, best.right_size), (2, 2));
        assert!(scores
            .iter()
            .enumerate()
            .all(|(i, &score)| i == 1 || score > best.score));
    }

    #[test]
    fn test_tie_keeps_first_threshold() {
        let search = find_best_split(&[1.0, 2.0, 3.0], &[0u8, 1, 0]);
        assert_eq!(search.scores()[0], search.scores()[1]);
        assert_eq!(search.best_threshold(), Some(1.5));
    }

    #[test]
    fn test_multiclass_scores() {
        let search = find_best_split(&[0.0, 1.0, 2.0], &[0u8, 1, 2]);
        // left {0}, right {1, 2}
        assert_relative_eq!(search.scores()[0], 2.0 / 3.0 * 0.5);
        assert_relative_eq!(search.scores()[1], 2.0 / 3.0 * 0.5);
    }

    #[test]
    fn test_constant_feature_has_no_split() {
        for labels in [[0u8, 0, 0], [0, 1, 2]] {
            let search = find_best_split(&[7.0, 7.0, 7.0], &labels);
            assert!(search.is_empty());
            assert!(search.thresholds().is_empty());
            assert!(search.scores().is_empty());
            assert_eq!(search.best_threshold(), None);
            assert_eq!(search.best_score(), None);
        }
    }

    #[test]
    fn test_empty_input_has_no_split() {
        let search = find_best_split::<u8>(&[], &[]);
        assert_eq!(search, SplitSearch::default());
    }

    #[test]
    fn test_degenerate_midpoint_is_dropped() {
        let next = f64::from_bits(1.0f64.to_bits() + 1);
        let search = find_best_split(&[1.0, next], &[0u8, 1]);
        assert!(search.is_empty());
        assert_eq!(search.best_threshold(), None);
    }

    #[test]
    fn test_nan_values_produce_no_threshold() {
        let search = find_best_split(&[1.0, f64::NAN, 2.0], &[0u8, 1, 1]);
        assert_eq!(search.thresholds(), vec![1.5]);
        assert_eq!(search.best().map(|c| c.left_size), Some(1));
    }
}
