use crate::data::dataset::ClassLabel;
use crate::error::TreeError;
use nalgebra::{DMatrix, DVector};
use std::collections::BTreeSet;

/// Rows are true classes, columns predicted classes, both in ascending order.
pub type ConfusionMatrix = DMatrix<usize>;

/// Evaluation helpers for classifiers.
///
/// Binary tasks treat the larger label as the positive class; multiclass
/// precision and recall are macro averages.
pub trait ClassificationMetrics<T: ClassLabel> {
    /// Computes the confusion matrix of `y_pred` against `y_true`.
    ///
    /// # Errors
    ///
    /// `LengthMismatch` if the vectors differ in length.
    fn confusion_matrix(
        &self,
        y_true: &DVector<T>,
        y_pred: &DVector<T>,
    ) -> Result<ConfusionMatrix, TreeError> {
        if y_true.len() != y_pred.len() {
            return Err(TreeError::LengthMismatch {
                expected: y_true.len(),
                found: y_pred.len(),
            });
        }

        let classes = y_true
            .iter()
            .chain(y_pred.iter())
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();
        let position = |label: &T| classes.binary_search(label).unwrap_or_default();

        let mut matrix = DMatrix::zeros(classes.len(), classes.len());
        for (y_t, y_p) in y_true.iter().zip(y_pred.iter()) {
            matrix[(position(y_t), position(y_p))] += 1;
        }

        Ok(matrix)
    }

    /// Share of predictions equal to the true label.
    fn accuracy(&self, y_true: &DVector<T>, y_pred: &DVector<T>) -> Result<f64, TreeError> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;
        if y_true.is_empty() {
            return Err(TreeError::EmptyDataset);
        }

        Ok(matrix.trace() as f64 / y_true.len() as f64)
    }

    fn precision(&self, y_true: &DVector<T>, y_pred: &DVector<T>) -> Result<f64, TreeError> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;
        Ok(per_class_average(&matrix, |class| matrix.column(class).sum()))
    }

    fn recall(&self, y_true: &DVector<T>, y_pred: &DVector<T>) -> Result<f64, TreeError> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;
        Ok(per_class_average(&matrix, |class| matrix.row(class).sum()))
    }

    /// Harmonic mean of precision and recall.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when precision and recall are both zero.
    fn f1_score(&self, y_true: &DVector<T>, y_pred: &DVector<T>) -> Result<f64, TreeError> {
        let precision = self.precision(y_true, y_pred)?;
        let recall = self.recall(y_true, y_pred)?;

        if (precision + recall).abs() < f64::EPSILON {
            return Err(TreeError::InvalidParameter(
                "Precision and recall are both 0, F1 score undefined.".into(),
            ));
        }
        Ok(2.0 * (precision * recall) / (precision + recall))
    }
}

/// Ratio of the diagonal entry to `total(class)`; binary matrices report the
/// positive class only, larger ones the mean over classes.
fn per_class_average(matrix: &ConfusionMatrix, total: impl Fn(usize) -> usize) -> f64 {
    let ratio = |class: usize| {
        let denominator = total(class);
        if denominator == 0 {
            0.0
        } else {
            matrix[(class, class)] as f64 / denominator as f64
        }
    };

    match matrix.nrows() {
        0 => 0.0,
        2 => ratio(1),
        n => (0..n).map(ratio).sum::<f64>() / n as f64,
    }
}
