//! Ranks unordered category codes so they can be split like real values.
use crate::data::dataset::ClassLabel;
use std::collections::HashMap;

/// Category-to-rank mapping for one node's subset, plus the ranked column.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryEncoding {
    ranks: HashMap<i64, usize>,
    encoded: Vec<f64>,
}

impl CategoryEncoding {
    /// Rank assigned to `category`, if it occurs in the encoded subset.
    pub fn rank(&self, category: i64) -> Option<usize> {
        self.ranks.get(&category).copied()
    }

    pub fn ranks(&self) -> &HashMap<i64, usize> {
        &self.ranks
    }

    /// Ranks parallel to the input column.
    pub fn encoded(&self) -> &[f64] {
        &self.encoded
    }

    pub fn into_encoded(self) -> Vec<f64> {
        self.encoded
    }
}

/// Orders categories by `count(category) / count(category with reference label)`.
///
/// Categories that never carry the reference label get a statistic of zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoricalEncoder<YT: ClassLabel> {
    reference: YT,
}

impl<YT: ClassLabel> Default for CategoricalEncoder<YT> {
    /// Uses `1` as the reference label, the positive class of a binary task.
    fn default() -> Self {
        Self::new(YT::one())
    }
}

impl<YT: ClassLabel> CategoricalEncoder<YT> {
    pub fn new(reference: YT) -> Self {
        Self { reference }
    }

    pub fn reference(&self) -> YT {
        self.reference
    }

    /// Ranks the distinct categories of `categories` from `0` upwards.
    ///
    /// Categories with equal statistics keep the order in which they first
    /// appear. The result depends only on the given subset, so it must be
    /// recomputed for every node.
    pub fn encode(&self, categories: &[i64], labels: &[YT]) -> CategoryEncoding {
        debug_assert_eq!(categories.len(), labels.len());

        let mut positions = HashMap::new();
        let mut stats: Vec<(i64, usize, usize)> = Vec::new();
        for (&category, &label) in categories.iter().zip(labels) {
            let position = *positions.entry(category).or_insert_with(|| {
                stats.push((category, 0, 0));
                stats.len() - 1
            });
            stats[position].1 += 1;
            if label == self.reference {
                stats[position].2 += 1;
            }
        }

        let mut ratios = stats
            .into_iter()
            .map(|(category, count, hits)| {
                let ratio = if hits > 0 {
                    count as f64 / hits as f64
                } else {
                    0.0
                };
                (category, ratio)
            })
            .collect::<Vec<_>>();
        ratios.sort_by(|a, b| a.1.total_cmp(&b.1));

        let ranks = ratios
            .into_iter()
            .enumerate()
            .map(|(rank, (category, _))| (category, rank))
            .collect::<HashMap<_, _>>();
        let encoded = categories
            .iter()
            .map(|category| ranks[category] as f64)
            .collect();

        CategoryEncoding { ranks, encoded }
    }
}
