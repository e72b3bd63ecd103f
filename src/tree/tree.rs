use crate::{
    error::{Error, Result},
    forest::forest::average_path_length,
    tree::node::Node,
    utils::{split::get_random_split, structures::Sample},
    RandomGenerator,
};
use serde::{Deserialize, Serialize};
use std::{collections::VecDeque, ops::Range};

#[derive(Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct StandardSplit {
    pub feature: usize,
    pub threshold: f64,
}
impl StandardSplit {
    /// `0` (left) when the feature is strictly below the threshold, `1` (right) otherwise.
    pub fn split(&self, sample: &Sample) -> usize {
        self.branch(&sample.features)
    }
    pub fn branch(&self, x: &[f64]) -> usize {
        (x[self.feature] >= self.threshold) as usize
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IsolationTreeConfig {
    pub max_depth: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IsolationTree {
    nodes: Vec<Node>,
    config: IsolationTreeConfig,
    n_features: usize,
}
impl IsolationTree {
    pub fn new(config: IsolationTreeConfig) -> Self {
        Self {
            nodes: Vec::new(),
            config,
            n_features: 0,
        }
    }

    /// Wraps an already built arena whose node 0 is the root, for points of `n_features` features.
    ///
    /// Every other node must be the child of exactly one internal node, children must follow
    /// their parent in the arena, and an internal node's size must be the sum of its children's.
    pub fn from_nodes(nodes: Vec<Node>, n_features: usize) -> Result<Self> {
        if nodes.is_empty() {
            return Err(Error::InvalidTree("a tree needs at least a root".to_string()));
        }
        let mut parents = vec![0usize; nodes.len()];
        for (position, node) in nodes.iter().enumerate() {
            if node.get_id() != position {
                return Err(Error::InvalidTree(format!(
                    "node at position {} carries id {}",
                    position,
                    node.get_id()
                )));
            }
            let Node::Internal {
                split_params,
                children,
                n_samples,
                ..
            } = node
            else {
                continue;
            };
            if children.len() != 2 {
                return Err(Error::InvalidTree(format!(
                    "internal node {} has {} children",
                    position,
                    children.len()
                )));
            }
            if children.iter().any(|&c| c <= position || c >= nodes.len()) {
                return Err(Error::InvalidTree(format!(
                    "internal node {} points outside the arena or backwards",
                    position
                )));
            }
            if split_params.feature >= n_features {
                return Err(Error::InvalidTree(format!(
                    "internal node {} splits on feature {} of {}",
                    position, split_params.feature, n_features
                )));
            }
            let children_samples = children
                .iter()
                .map(|&c| nodes[c].get_n_samples())
                .sum::<usize>();
            if *n_samples != children_samples {
                return Err(Error::InvalidTree(format!(
                    "internal node {} holds {} samples, its children {}",
                    position, n_samples, children_samples
                )));
            }
            for &child in children {
                parents[child] += 1;
            }
        }
        if let Some(orphan) = (1..nodes.len()).find(|&id| parents[id] != 1) {
            return Err(Error::InvalidTree(format!(
                "node {} is the child of {} nodes",
                orphan, parents[orphan]
            )));
        }
        let max_depth = nodes.iter().map(Node::get_depth).max().unwrap_or(0);
        Ok(Self {
            nodes,
            config: IsolationTreeConfig { max_depth },
            n_features,
        })
    }

    pub fn get_n_features(&self) -> usize {
        self.n_features
    }
    pub fn get_max_depth(&self) -> usize {
        self.config.max_depth
    }
    pub fn get_root(&self) -> &Node {
        &self.nodes[0]
    }
    pub fn get_node_at(&self, id: usize) -> &Node {
        &self.nodes[id]
    }
    pub fn get_nodes(&self) -> &[Node] {
        &self.nodes
    }
    pub fn leaves(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| node.is_leaf())
    }

    pub fn fit(&mut self, data: &[Sample], random_state: &mut RandomGenerator) {
        let mut data = data.to_vec();
        self.n_features = data.first().map_or(0, Sample::len);
        self.nodes = self.build_tree(&mut data, random_state);
    }

    fn build_tree(&self, samples: &mut [Sample], random_state: &mut RandomGenerator) -> Vec<Node> {
        let n_features = samples.first().map_or(0, Sample::len);
        let features = (0..n_features).collect::<Vec<_>>();
        let mut queue: VecDeque<(Range<usize>, usize, Option<usize>, Vec<usize>)> =
            VecDeque::from(vec![(0..samples.len(), 0, None, features)]);
        let mut nodes = Vec::new();

        while let Some((range, depth, parent, mut non_constant_features)) = queue.pop_front() {
            let id = nodes.len();

            if let Some(parent) = parent {
                if let Node::Internal { children, .. } = &mut nodes[parent] {
                    children.push(id);
                }
            }

            let node_samples = &mut samples[range.clone()];
            let leaf = Node::External {
                id,
                depth,
                n_samples: node_samples.len(),
            };

            if node_samples.len() <= 1 || depth >= self.config.max_depth {
                nodes.push(leaf);
                continue;
            }

            let Some((left, right, split_params)) =
                get_random_split(node_samples, &mut non_constant_features, random_state)
            else {
                nodes.push(leaf);
                continue;
            };

            nodes.push(Node::Internal {
                id,
                split_params,
                children: Vec::with_capacity(2),
                depth,
                n_samples: node_samples.len(),
            });

            for child_range in [left, right] {
                let child_range =
                    (range.start + child_range.start)..(range.start + child_range.end);
                queue.push_back((
                    child_range,
                    depth + 1,
                    Some(id),
                    non_constant_features.clone(),
                ));
            }
        }
        nodes
    }

    /// Leaf reached by `x` together with the number of edges traversed to get there.
    pub fn predict_leaf(&self, x: &[f64]) -> Result<(&Node, usize)> {
        self.check_point(x)?;
        Ok(self.leaf_of(x))
    }

    /// Edges from the root to the leaf reached by `x`, plus the expected depth of the
    /// unresolved samples left in that leaf.
    pub fn path_length(&self, x: &[f64], n_population: usize) -> Result<f64> {
        self.check_point(x)?;
        Ok(self.depth_of(x, n_population))
    }

    /// Same as [`IsolationTree::path_length`] for points already known to match the tree.
    pub(crate) fn depth_of(&self, x: &[f64], n_population: usize) -> f64 {
        let (leaf, edges) = self.leaf_of(x);
        edges as f64 + average_path_length(leaf.get_n_samples(), n_population)
    }

    fn leaf_of(&self, x: &[f64]) -> (&Node, usize) {
        let mut node = self.get_root();
        let mut edges = 0;

        while let Node::Internal {
            split_params,
            children,
            ..
        } = node
        {
            node = self.get_node_at(children[split_params.branch(x)]);
            edges += 1;
        }
        (node, edges)
    }

    fn check_point(&self, x: &[f64]) -> Result<()> {
        if x.len() != self.n_features {
            return Err(Error::InvalidQueryArgument(format!(
                "point has {} features, the tree was built on {}",
                x.len(),
                self.n_features
            )));
        }
        Ok(())
    }
}
