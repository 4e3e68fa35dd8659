/// Decision tree classifier: tree building and prediction
pub mod classifier;
/// Per-node ranking of categorical features
pub mod encoding;
/// Tree node representation
pub mod node;
/// Early-stopping controls
pub mod params;
/// Weighted Gini threshold search
pub mod split;

pub use classifier::DecisionTreeClassifier;
pub use encoding::{CategoricalEncoder, CategoryEncoding};
pub use node::TreeNode;
pub use params::TreeParams;
pub use split::{find_best_split, gini_impurity, SplitCandidate, SplitSearch};
