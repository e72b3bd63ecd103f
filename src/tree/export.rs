use std::fmt::Write;

use super::{node::Node, tree::IsolationTree};
use crate::forest::forest::IsolationForest;

/// Renders `tree` as a Graphviz digraph. Nodes are numbered in pre-order starting at 0.
pub fn to_dot(tree: &IsolationTree) -> String {
    let mut dot = String::from("digraph G {\n");
    let mut next_id = 0;
    write_node(tree, tree.get_root(), &mut next_id, &mut dot);
    dot.push_str("}\n");
    dot
}

/// One digraph per tree, in the order the forest stores them.
pub fn forest_to_dot(forest: &IsolationForest) -> Vec<String> {
    forest.get_trees().iter().map(to_dot).collect()
}

fn write_node(tree: &IsolationTree, node: &Node, next_id: &mut usize, dot: &mut String) -> usize {
    let id = *next_id;
    *next_id += 1;
    match node {
        Node::Internal {
            split_params,
            children,
            n_samples,
            ..
        } => {
            let _ = writeln!(
                dot,
                "  \"{}\" [label=\"Attribute: {}\\nSplit Value:\\n {} \\n Size: {}\", shape=box];",
                id, split_params.feature, split_params.threshold, n_samples
            );
            for &child in children {
                let child_id = write_node(tree, tree.get_node_at(child), next_id, dot);
                let _ = writeln!(dot, "  \"{}\" -> \"{}\";", id, child_id);
            }
        }
        Node::External {
            depth, n_samples, ..
        } => {
            let _ = writeln!(
                dot,
                "  \"{}\" [label=\"Depth: {}\\nSize: {} \", shape=box, penwidth=3];",
                id, depth, n_samples
            );
        }
    }
    id
}
