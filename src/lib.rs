//! # Gini-cart
//!
//! `gini-cart` grows binary CART decision trees for classification. Columns are
//! declared either `real` or `categorical`; categorical codes are ranked per
//! node by their label statistics so that one threshold search over weighted
//! Gini impurity serves both kinds.
//!
//! ## Getting Started
//!
//! To use `gini-cart`, add the following to your `Cargo.toml` file:
//!
//! ```toml
//! [dependencies]
//! gini-cart = "*"
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use gini_cart::data::dataset::Dataset;
//! use gini_cart::trees::DecisionTreeClassifier;
//! use nalgebra::{DMatrix, DVector};
//!
//! let x = DMatrix::from_row_slice(4, 2, &[0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0]);
//! let y = DVector::from_vec(vec![0u8, 0, 0, 1]);
//!
//! let dataset = Dataset::new(x, y);
//!
//! let mut model = DecisionTreeClassifier::new(&["real", "real"]).unwrap();
//!
//! model.fit(&dataset).unwrap();
//!
//! let test_x = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 0.0, 1.0]);
//!
//! let predictions = model.predict(&test_x).unwrap();
//! assert_eq!(predictions, DVector::from_vec(vec![1, 0]));
//! ```
//!
//! Progress is reported through `tracing`; install a subscriber to see it.

/// Dataset and feature declarations
pub mod data;
/// Error type
pub mod error;
/// Functions for evaluating model performance
pub mod metrics;
/// Decision trees
pub mod trees;

pub use error::TreeError;
