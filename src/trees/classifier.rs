//! Decision Tree Classifier
use super::encoding::CategoricalEncoder;
use super::node::TreeNode;
use super::params::TreeParams;
use super::split::{find_best_split, SplitCandidate};
use crate::data::dataset::{ClassLabel, Dataset, Number};
use crate::data::feature::FeatureKind;
use crate::error::TreeError;
use crate::metrics::confusion::ClassificationMetrics;
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use std::marker::PhantomData;
use tracing::{debug, info, trace};

/// Winning threshold of one feature at one node, with the orderable column it
/// was found on.
struct FeatureSplit {
    feature_index: usize,
    candidate: SplitCandidate,
    values: Vec<f64>,
}

/// What a single node becomes once its rows are examined.
enum NodeOutcome<YT: ClassLabel> {
    Terminal(YT),
    Split {
        feature_index: usize,
        threshold: f64,
        left_rows: Vec<usize>,
        right_rows: Vec<usize>,
    },
}

/// Binary CART classifier over real and categorical features.
///
/// The kind of every column is declared up front and never inferred from the
/// data. Categorical columns hold integer category codes.
#[derive(Clone, Debug)]
pub struct DecisionTreeClassifier<XT: Number, YT: ClassLabel> {
    root: Option<Box<TreeNode<YT>>>,
    feature_kinds: Vec<FeatureKind>,
    tree_params: TreeParams,
    encoder: CategoricalEncoder<YT>,

    _marker: PhantomData<XT>,
}

impl<XT: Number, YT: ClassLabel> ClassificationMetrics<YT> for DecisionTreeClassifier<XT, YT> {}

impl<XT: Number, YT: ClassLabel> DecisionTreeClassifier<XT, YT> {
    /// Creates an unfitted classifier from per-column feature type tags.
    ///
    /// # Arguments
    ///
    /// * `feature_types` - One tag per column, each `"real"` or `"categorical"`.
    ///
    /// # Errors
    ///
    /// `UnknownFeatureKind` for any other tag.
    pub fn new(feature_types: &[&str]) -> Result<Self, TreeError> {
        Ok(Self::from_kinds(FeatureKind::parse_all(feature_types)?))
    }

    pub fn from_kinds(feature_kinds: Vec<FeatureKind>) -> Self {
        Self {
            root: None,
            feature_kinds,
            tree_params: TreeParams::new(),
            encoder: CategoricalEncoder::default(),
            _marker: PhantomData,
        }
    }

    /// Creates an unfitted classifier with early-stopping controls.
    ///
    /// # Arguments
    ///
    /// * `feature_types` - One tag per column, each `"real"` or `"categorical"`.
    /// * `max_depth` - The maximum depth of the tree.
    /// * `min_samples_split` - The minimum number of samples required to split a node.
    /// * `min_samples_leaf` - The minimum number of samples each child of a split must keep.
    ///
    /// # Errors
    ///
    /// `UnknownFeatureKind` for an unknown tag, `InvalidParameter` if a control
    /// is out of range.
    pub fn with_params(
        feature_types: &[&str],
        max_depth: Option<u16>,
        min_samples_split: Option<u16>,
        min_samples_leaf: Option<u16>,
    ) -> Result<Self, TreeError> {
        let mut tree = Self::new(feature_types)?;

        tree.set_max_depth(max_depth)?;
        tree.set_min_samples_split(min_samples_split.unwrap_or(2))?;
        tree.set_min_samples_leaf(min_samples_leaf.unwrap_or(1))?;
        Ok(tree)
    }

    pub fn set_max_depth(&mut self, max_depth: Option<u16>) -> Result<(), TreeError> {
        self.tree_params.set_max_depth(max_depth)
    }

    pub fn set_min_samples_split(&mut self, min_samples_split: u16) -> Result<(), TreeError> {
        self.tree_params.set_min_samples_split(min_samples_split)
    }

    pub fn set_min_samples_leaf(&mut self, min_samples_leaf: u16) -> Result<(), TreeError> {
        self.tree_params.set_min_samples_leaf(min_samples_leaf)
    }

    /// Sets the label whose frequency ranks categorical values. Defaults to `1`.
    pub fn set_reference_class(&mut self, reference: YT) {
        self.encoder = CategoricalEncoder::new(reference);
    }

    pub fn params(&self) -> &TreeParams {
        &self.tree_params
    }

    pub fn feature_kinds(&self) -> &[FeatureKind] {
        &self.feature_kinds
    }

    /// The fitted tree, `None` before `fit`.
    pub fn root(&self) -> Option<&TreeNode<YT>> {
        self.root.as_deref()
    }

    pub fn depth(&self) -> Option<usize> {
        self.root().map(TreeNode::depth)
    }

    pub fn n_leaves(&self) -> Option<usize> {
        self.root().map(TreeNode::n_leaves)
    }

    /// Builds the decision tree from a dataset, replacing any previous tree.
    ///
    /// # Errors
    ///
    /// * `EmptyDataset` / `LengthMismatch` for a degenerate dataset.
    /// * `FeatureCountMismatch` if the column count differs from the declaration.
    /// * `NonFiniteValue` for NaN or infinite features.
    /// * `InvalidCategory` for a categorical value that is not an integer code
    ///   representable as `i64`.
    pub fn fit(&mut self, dataset: &Dataset<XT, YT>) -> Result<String, TreeError> {
        dataset.validate()?;
        self.check_feature_count(dataset.ncols())?;
        let x = dataset.features_f64()?;
        self.check_categories(&x)?;
        let y = dataset.y.as_slice();

        // Nodes are grown from a work stack, left child first, so tree depth is
        // bounded by the data and not by the thread stack.
        let mut root = TreeNode::placeholder();
        {
            let mut pending = vec![((0..x.nrows()).collect::<Vec<_>>(), 0, &mut root)];
            while let Some((rows, depth, slot)) = pending.pop() {
                match self.build_node(&x, y, &rows, depth)? {
                    NodeOutcome::Terminal(class) => *slot = TreeNode::terminal(class),
                    NodeOutcome::Split {
                        feature_index,
                        threshold,
                        left_rows,
                        right_rows,
                    } => {
                        *slot = TreeNode::internal(
                            feature_index,
                            threshold,
                            TreeNode::placeholder(),
                            TreeNode::placeholder(),
                        );
                        if let TreeNode::Internal { left, right, .. } = slot {
                            pending.push((right_rows, depth + 1, &mut **right));
                            pending.push((left_rows, depth + 1, &mut **left));
                        }
                    }
                }
            }
        }
        info!(
            samples = x.nrows(),
            nodes = root.n_nodes(),
            depth = root.depth(),
            "finished building the tree"
        );

        self.root = Some(Box::new(root));
        Ok("Finished building the tree.".into())
    }

    /// Predicts one class per row of `features`, in row order.
    ///
    /// # Errors
    ///
    /// * `NotFitted` before `fit`.
    /// * `FeatureCountMismatch` if the column count differs from the declaration.
    /// * `NonFiniteValue` for a NaN or infinite value on a visited node.
    pub fn predict(&self, features: &DMatrix<XT>) -> Result<DVector<YT>, TreeError> {
        let root = self.root.as_ref().ok_or(TreeError::NotFitted)?;
        self.check_feature_count(features.ncols())?;

        let predictions = (0..features.nrows())
            .into_par_iter()
            .map(|row| self.make_prediction(features, row, root))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DVector::from_vec(predictions))
    }

    fn make_prediction(
        &self,
        features: &DMatrix<XT>,
        row: usize,
        root: &TreeNode<YT>,
    ) -> Result<YT, TreeError> {
        let mut node = root;
        loop {
            match node {
                TreeNode::Terminal { class } => return Ok(*class),
                TreeNode::Internal {
                    feature_index,
                    threshold,
                    left,
                    right,
                } => {
                    let value = self.orderable_value(features[(row, *feature_index)], row, *feature_index)?;
                    node = if value < *threshold { &**left } else { &**right };
                }
            }
        }
    }

    /// Raw value for real features, truncated category code for categorical ones.
    fn orderable_value(&self, value: XT, row: usize, feature: usize) -> Result<f64, TreeError> {
        let value = value
            .to_f64()
            .filter(|value| value.is_finite())
            .ok_or(TreeError::NonFiniteValue { row, feature })?;
        Ok(match self.feature_kinds[feature] {
            FeatureKind::Real => value,
            FeatureKind::Categorical => value.trunc(),
        })
    }

    fn check_feature_count(&self, found: usize) -> Result<(), TreeError> {
        if found != self.feature_kinds.len() {
            return Err(TreeError::FeatureCountMismatch {
                expected: self.feature_kinds.len(),
                found,
            });
        }
        Ok(())
    }

    /// Categorical values must be integers within the `i64` range, so that
    /// distinct codes stay distinct once converted.
    fn check_categories(&self, x: &DMatrix<f64>) -> Result<(), TreeError> {
        let is_code = |value: &f64| {
            value.fract() == 0.0 && *value >= i64::MIN as f64 && *value < i64::MAX as f64
        };
        for (feature, kind) in self.feature_kinds.iter().enumerate() {
            if *kind != FeatureKind::Categorical {
                continue;
            }
            if let Some(row) = x.column(feature).iter().position(|value| !is_code(value)) {
                return Err(TreeError::InvalidCategory { row, feature });
            }
        }
        Ok(())
    }

    /// Decides whether the samples in `rows` form a leaf or split in two.
    fn build_node(
        &self,
        x: &DMatrix<f64>,
        y: &[YT],
        rows: &[usize],
        depth: usize,
    ) -> Result<NodeOutcome<YT>, TreeError> {
        let labels = rows.iter().map(|&row| y[row]).collect::<Vec<_>>();
        let first = *labels.first().ok_or(TreeError::EmptyDataset)?;

        if labels.iter().all(|&label| label == first) {
            trace!(depth, samples = rows.len(), class = ?first, "pure node");
            return Ok(NodeOutcome::Terminal(first));
        }

        let majority = majority_class(&labels).unwrap_or(first);
        if self.tree_params.stops_at(depth, rows.len()) {
            trace!(depth, samples = rows.len(), class = ?majority, "stopping rule reached");
            return Ok(NodeOutcome::Terminal(majority));
        }

        let Some(best) = self.find_split(x, &labels, rows) else {
            trace!(depth, samples = rows.len(), class = ?majority, "no usable split");
            return Ok(NodeOutcome::Terminal(majority));
        };

        let threshold = best.candidate.threshold;
        let mut left_rows = Vec::with_capacity(best.candidate.left_size);
        let mut right_rows = Vec::with_capacity(best.candidate.right_size);
        for (&row, &value) in rows.iter().zip(&best.values) {
            if value < threshold {
                left_rows.push(row);
            } else {
                right_rows.push(row);
            }
        }
        debug!(
            depth,
            samples = rows.len(),
            feature = best.feature_index,
            threshold,
            score = best.candidate.score,
            "split node"
        );

        Ok(NodeOutcome::Split {
            feature_index: best.feature_index,
            threshold,
            left_rows,
            right_rows,
        })
    }

    /// Best split over all features, lowest weighted Gini first and lowest
    /// feature index on ties.
    fn find_split(&self, x: &DMatrix<f64>, labels: &[YT], rows: &[usize]) -> Option<FeatureSplit> {
        let min_leaf = usize::from(self.tree_params.min_samples_leaf());

        let splits = self
            .feature_kinds
            .par_iter()
            .enumerate()
            .map(|(feature_index, kind)| {
                let column = rows.iter().map(|&row| x[(row, feature_index)]);
                let values = match kind {
                    FeatureKind::Real => column.collect::<Vec<_>>(),
                    FeatureKind::Categorical => {
                        let codes = column.map(|value| value as i64).collect::<Vec<_>>();
                        self.encoder.encode(&codes, labels).into_encoded()
                    }
                };

                let search = find_best_split(&values, labels);
                let candidate = if min_leaf <= 1 {
                    search.best().copied()
                } else {
                    search
                        .candidates()
                        .iter()
                        .filter(|c| c.left_size >= min_leaf && c.right_size >= min_leaf)
                        .copied()
                        .min_by(|a, b| a.score.total_cmp(&b.score))
                };

                candidate.map(|candidate| FeatureSplit {
                    feature_index,
                    candidate,
                    values,
                })
            })
            .collect::<Vec<_>>();

        splits
            .into_iter()
            .flatten()
            .fold(None, |best: Option<FeatureSplit>, split| match best {
                Some(best) if best.candidate.score <= split.candidate.score => Some(best),
                _ => Some(split),
            })
    }
}

/// Most frequent label; the one seen first wins ties.
fn majority_class<YT: ClassLabel>(labels: &[YT]) -> Option<YT> {
    let mut counts: Vec<(YT, usize)> = Vec::new();
    for &label in labels {
        match counts.iter_mut().find(|(class, _)| *class == label) {
            Some((_, count)) => *count += 1,
            None => counts.push((label, 1)),
        }
    }
    counts
        .into_iter()
        .fold(None, |best, (class, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((class, count)),
        })
        .map(|(class, _)| class)
}
