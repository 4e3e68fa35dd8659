//! Error type shared by the whole crate.

/// Errors raised while configuring, fitting or querying a tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeError {
    #[error("Unknown feature type: {0:?} (must be one of: real, categorical)")]
    UnknownFeatureKind(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("The dataset is empty.")]
    EmptyDataset,

    #[error("Length mismatch: expected {expected} entries, found {found}.")]
    LengthMismatch { expected: usize, found: usize },

    #[error("Feature count mismatch: the tree was declared with {expected} features, found {found}.")]
    FeatureCountMismatch { expected: usize, found: usize },

    #[error("Non-finite value in row {row}, feature {feature}.")]
    NonFiniteValue { row: usize, feature: usize },

    #[error("Value in row {row}, feature {feature} is not a valid category code.")]
    InvalidCategory { row: usize, feature: usize },

    #[error("Tree wasn't built yet.")]
    NotFitted,
}
