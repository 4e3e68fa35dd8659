/// Feature matrix and label vector container
pub mod dataset;
/// Per-column feature kinds
pub mod feature;
