use serde::{Deserialize, Serialize};

use super::tree::StandardSplit;

/// Node of an isolation tree. Children are addressed by their id in the owning tree's arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    External {
        id: usize,
        depth: usize,
        n_samples: usize,
    },
    Internal {
        id: usize,
        split_params: StandardSplit,
        children: Vec<usize>,
        depth: usize,
        n_samples: usize,
    },
}
impl Node {
    pub fn get_id(&self) -> usize {
        match self {
            Node::External { id, .. } => *id,
            Node::Internal { id, .. } => *id,
        }
    }
    pub fn get_n_samples(&self) -> usize {
        match self {
            Node::External { n_samples, .. } => *n_samples,
            Node::Internal { n_samples, .. } => *n_samples,
        }
    }
    pub fn get_depth(&self) -> usize {
        match self {
            Node::External { depth, .. } => *depth,
            Node::Internal { depth, .. } => *depth,
        }
    }
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::External { .. })
    }
    /// Ids of the left and right children, `None` for leaves.
    pub fn get_children(&self) -> Option<(usize, usize)> {
        match self {
            Node::External { .. } => None,
            Node::Internal { children, .. } => Some((children[0], children[1])),
        }
    }
}
