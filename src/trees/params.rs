use crate::error::TreeError;

/// Early-stopping controls checked before every split search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeParams {
    max_depth: Option<u16>,
    min_samples_split: u16,
    min_samples_leaf: u16,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeParams {
    /// Unbounded depth, nodes with two or more samples may split, leaves
    /// may hold a single sample.
    pub fn new() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }

    pub fn set_max_depth(&mut self, max_depth: Option<u16>) -> Result<(), TreeError> {
        if max_depth.is_some_and(|depth| depth < 1) {
            return Err(TreeError::InvalidParameter(
                "The maximum depth must be greater than 0.".into(),
            ));
        }
        self.max_depth = max_depth;
        Ok(())
    }

    pub fn set_min_samples_split(&mut self, min_samples_split: u16) -> Result<(), TreeError> {
        if min_samples_split < 2 {
            return Err(TreeError::InvalidParameter(
                "The minimum number of samples to split must be greater than 1.".into(),
            ));
        }
        self.min_samples_split = min_samples_split;
        Ok(())
    }

    pub fn set_min_samples_leaf(&mut self, min_samples_leaf: u16) -> Result<(), TreeError> {
        if min_samples_leaf < 1 {
            return Err(TreeError::InvalidParameter(
                "The minimum number of samples in a leaf must be greater than 0.".into(),
            ));
        }
        self.min_samples_leaf = min_samples_leaf;
        Ok(())
    }

    pub fn max_depth(&self) -> Option<u16> {
        self.max_depth
    }

    pub fn min_samples_split(&self) -> u16 {
        self.min_samples_split
    }

    pub fn min_samples_leaf(&self) -> u16 {
        self.min_samples_leaf
    }

    /// Whether a node at `depth` holding `n_samples` rows must become a leaf
    /// without searching for a split.
    pub fn stops_at(&self, depth: usize, n_samples: usize) -> bool {
        self.max_depth.is_some_and(|max| depth >= usize::from(max))
            || n_samples < usize::from(self.min_samples_split)
            || n_samples < 2 * usize::from(self.min_samples_leaf)
    }
}
