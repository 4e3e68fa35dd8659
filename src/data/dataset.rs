use crate::error::TreeError;
use nalgebra::{DMatrix, DVector};
use num_traits::{Num, ToPrimitive};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use std::cmp::PartialOrd;
use std::fmt::Debug;
use std::hash::Hash;

/// Values a feature matrix may hold.
///
/// Every feature is reduced to `f64` before scoring, so anything numeric and
/// ordered qualifies. Categorical columns hold integer category codes stored
/// in the same matrix.
pub trait Number: Debug + Clone + Copy + Num + ToPrimitive + PartialOrd + Send + Sync + 'static {}

impl<T> Number for T where
    T: Debug + Clone + Copy + Num + ToPrimitive + PartialOrd + Send + Sync + 'static
{
}

/// Discrete class labels.
///
/// `One` names the reference class used when ranking categories.
pub trait ClassLabel: Debug + Clone + Copy + Num + Eq + Hash + Ord + Send + Sync + 'static {}

impl<T> ClassLabel for T where
    T: Debug + Clone + Copy + Num + Eq + Hash + Ord + Send + Sync + 'static
{
}

/// Labeled samples: one row of `x` per entry of `y`.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset<XT: Number, YT: ClassLabel> {
    pub x: DMatrix<XT>,
    pub y: DVector<YT>,
}

impl<XT: Number, YT: ClassLabel> Dataset<XT, YT> {
    pub fn new(x: DMatrix<XT>, y: DVector<YT>) -> Self {
        Self { x, y }
    }

    pub fn into_parts(&self) -> (&DMatrix<XT>, &DVector<YT>) {
        (&self.x, &self.y)
    }

    pub fn is_not_empty(&self) -> bool {
        !(self.x.is_empty() || self.y.is_empty())
    }

    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.x.ncols()
    }

    /// Rejects datasets a tree cannot be grown on.
    ///
    /// # Errors
    ///
    /// * `EmptyDataset` if there are no rows.
    /// * `LengthMismatch` if `x` and `y` disagree on the number of rows.
    pub fn validate(&self) -> Result<(), TreeError> {
        if self.x.nrows() == 0 || self.y.is_empty() {
            return Err(TreeError::EmptyDataset);
        }
        if self.x.nrows() != self.y.len() {
            return Err(TreeError::LengthMismatch {
                expected: self.x.nrows(),
                found: self.y.len(),
            });
        }
        Ok(())
    }

    /// Returns the feature matrix converted to `f64`.
    ///
    /// # Errors
    ///
    /// `NonFiniteValue` for a value that is NaN, infinite or not representable
    /// as `f64`. Missing values are not supported.
    pub fn features_f64(&self) -> Result<DMatrix<f64>, TreeError> {
        let mut converted = DMatrix::zeros(self.x.nrows(), self.x.ncols());
        for row in 0..self.x.nrows() {
            for feature in 0..self.x.ncols() {
                converted[(row, feature)] = self.x[(row, feature)]
                    .to_f64()
                    .filter(|value| value.is_finite())
                    .ok_or(TreeError::NonFiniteValue { row, feature })?;
            }
        }
        Ok(converted)
    }

    /// Shuffles the rows and splits them into a training and a test part.
    ///
    /// # Arguments
    ///
    /// * `train_size` - Share of rows that go to the training part, in `[0, 1]`.
    /// * `seed` - Seed for the shuffle; `None` draws one from the OS.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `train_size` is outside `[0, 1]`.
    pub fn train_test_split(
        &self,
        train_size: f64,
        seed: Option<u64>,
    ) -> Result<(Self, Self), TreeError> {
        if !(0.0..=1.0).contains(&train_size) {
            return Err(TreeError::InvalidParameter(
                "Train size should be between 0.0 and 1.0".into(),
            ));
        }
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut indices = (0..self.x.nrows()).collect::<Vec<_>>();
        indices.shuffle(&mut rng);
        let train_size = (self.x.nrows() as f64 * train_size).floor() as usize;
        let (train_indices, test_indices) = indices.split_at(train_size);

        let train = Self::new(
            self.x.select_rows(train_indices),
            self.y.select_rows(train_indices),
        );
        let test = Self::new(
            self.x.select_rows(test_indices),
            self.y.select_rows(test_indices),
        );

        Ok((train, test))
    }
}
