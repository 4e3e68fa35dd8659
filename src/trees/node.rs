use crate::data::dataset::ClassLabel;
use std::mem;

/// Decision tree node
///
/// Each internal node owns its two children, so a tree is dropped as a whole.
/// Traversals, comparison, cloning and dropping walk the tree with an explicit
/// stack, so arbitrarily deep trees never exhaust the thread stack.
#[derive(Debug)]
pub enum TreeNode<YT: ClassLabel> {
    /// Leaf predicting a single class.
    Terminal { class: YT },
    /// Rows whose orderable value is strictly below `threshold` go left.
    Internal {
        feature_index: usize,
        threshold: f64,
        left: Box<TreeNode<YT>>,
        right: Box<TreeNode<YT>>,
    },
}

impl<YT: ClassLabel> TreeNode<YT> {
    pub fn terminal(class: YT) -> Self {
        Self::Terminal { class }
    }

    pub fn internal(feature_index: usize, threshold: f64, left: Self, right: Self) -> Self {
        Self::Internal {
            feature_index,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Leaf standing in for a subtree that is not built yet.
    pub(crate) fn placeholder() -> Self {
        Self::terminal(YT::zero())
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal { .. })
    }

    /// Nodes in pre-order, left subtree before right.
    pub fn iter(&self) -> impl Iterator<Item = &Self> + '_ {
        let mut pending = vec![self];
        std::iter::from_fn(move || {
            let node = pending.pop()?;
            if let Self::Internal { left, right, .. } = node {
                pending.push(&**right);
                pending.push(&**left);
            }
            Some(node)
        })
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 0)];
        while let Some((node, depth)) = pending.pop() {
            match node {
                Self::Terminal { .. } => deepest = deepest.max(depth),
                Self::Internal { left, right, .. } => {
                    pending.push((&**left, depth + 1));
                    pending.push((&**right, depth + 1));
                }
            }
        }
        deepest
    }

    pub fn n_nodes(&self) -> usize {
        self.iter().count()
    }

    pub fn n_leaves(&self) -> usize {
        self.iter().filter(|node| node.is_terminal()).count()
    }

    /// Moves internal children into `into`, leaving placeholders behind.
    fn detach_children(&mut self, into: &mut Vec<Box<Self>>) {
        if let Self::Internal { left, right, .. } = self {
            for child in [left, right] {
                if !child.is_terminal() {
                    into.push(mem::replace(child, Box::new(Self::placeholder())));
                }
            }
        }
    }
}

impl<YT: ClassLabel> Clone for TreeNode<YT> {
    fn clone(&self) -> Self {
        let mut root = Self::placeholder();
        {
            let mut pending = vec![(self, &mut root)];
            while let Some((source, slot)) = pending.pop() {
                match source {
                    Self::Terminal { class } => *slot = Self::terminal(*class),
                    Self::Internal {
                        feature_index,
                        threshold,
                        left,
                        right,
                    } => {
                        *slot = Self::internal(
                            *feature_index,
                            *threshold,
                            Self::placeholder(),
                            Self::placeholder(),
                        );
                        if let Self::Internal {
                            left: left_slot,
                            right: right_slot,
                            ..
                        } = slot
                        {
                            pending.push((&**right, &mut **right_slot));
                            pending.push((&**left, &mut **left_slot));
                        }
                    }
                }
            }
        }
        root
    }
}

impl<YT: ClassLabel> PartialEq for TreeNode<YT> {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some(pair) = pending.pop() {
            match pair {
                (Self::Terminal { class: a }, Self::Terminal { class: b }) => {
                    if a != b {
                        return false;
                    }
                }
                (
                    Self::Internal {
                        feature_index: feature_a,
                        threshold: threshold_a,
                        left: left_a,
                        right: right_a,
                    },
                    Self::Internal {
                        feature_index: feature_b,
                        threshold: threshold_b,
                        left: left_b,
                        right: right_b,
                    },
                ) => {
                    if feature_a != feature_b || threshold_a != threshold_b {
                        return false;
                    }
                    pending.push((&**right_a, &**right_b));
                    pending.push((&**left_a, &**left_b));
                }
                _ => return false,
            }
        }
        true
    }
}

impl<YT: ClassLabel> Drop for TreeNode<YT> {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
    }
}
