#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::tree::{
        export::to_dot,
        node::Node,
        tree::{IsolationTree, IsolationTreeConfig, StandardSplit},
    };
    use crate::utils::structures::Sample;
    use crate::RandomGenerator;
    use rand::SeedableRng;

    fn internal(
        id: usize,
        feature: usize,
        threshold: f64,
        n_samples: usize,
        depth: usize,
        children: [usize; 2],
    ) -> Node {
        Node::Internal {
            id,
            split_params: StandardSplit { feature, threshold },
            children: children.to_vec(),
            depth,
            n_samples,
        }
    }

    fn leaf(id: usize, depth: usize) -> Node {
        Node::External {
            id,
            depth,
            n_samples: 1,
        }
    }

    // Fully isolated tree over 16 points, nodes numbered in pre-order.
    fn hand_built_tree() -> IsolationTree {
        let nodes = vec![
            internal(0, 1, 1.8, 16, 0, [1, 14]),
            internal(1, 0, 1.8, 7, 1, [2, 9]),
            internal(2, 1, 1.6, 4, 2, [3, 6]),
            internal(3, 0, 1.6, 2, 3, [4, 5]),
            leaf(4, 4),
            leaf(5, 4),
            internal(6, 0, 1.5, 2, 3, [7, 8]),
            leaf(7, 4),
            leaf(8, 4),
            internal(9, 1, 1.4, 3, 2, [10, 11]),
            leaf(10, 3),
            internal(11, 0, 2.3, 2, 3, [12, 13]),
            leaf(12, 4),
            leaf(13, 4),
            internal(14, 0, 3.0, 9, 1, [15, 30]),
            internal(15, 1, 2.3, 8, 2, [16, 25]),
            internal(16, 0, 2.0, 5, 3, [17, 20]),
            internal(17, 1, 2.2, 2, 4, [18, 19]),
            leaf(18, 5),
            leaf(19, 5),
            internal(20, 1, 2.1, 3, 4, [21, 24]),
            internal(21, 0, 2.5, 2, 5, [22, 23]),
            leaf(22, 6),
            leaf(23, 6),
            leaf(24, 5),
            internal(25, 0, 2.2, 3, 3, [26, 27]),
            leaf(26, 4),
            internal(27, 1, 2.6, 2, 4, [28, 29]),
            leaf(28, 5),
            leaf(29, 5),
            leaf(30, 2),
        ];
        IsolationTree::from_nodes(nodes, 2).unwrap()
    }

    fn testing_data() -> Vec<Sample> {
        vec![
            vec![4.5, 2.25],
            vec![1.75, 1.5],
            vec![1.75, 2.0],
            vec![1.75, 1.75],
            vec![2.25, 2.0],
            vec![2.25, 2.25],
            vec![1.75, 2.5],
            vec![1.5, 2.25],
            vec![1.25, 1.75],
            vec![1.5, 1.5],
            vec![2.0, 1.25],
            vec![2.25, 1.5],
            vec![2.5, 1.75],
            vec![2.75, 2.0],
            vec![2.5, 2.5],
            vec![2.25, 2.75],
        ]
        .into_iter()
        .map(Sample::new)
        .collect()
    }

    fn check_sizes(tree: &IsolationTree, node: &Node) {
        if let Some((left, right)) = node.get_children() {
            let left = tree.get_node_at(left);
            let right = tree.get_node_at(right);
            assert_eq!(
                node.get_n_samples(),
                left.get_n_samples() + right.get_n_samples()
            );
            check_sizes(tree, left);
            check_sizes(tree, right);
        }
    }

    #[test]
    fn test_path_length_hand_built() {
        let tree = hand_built_tree();
        let n_population = 16;
        assert_eq!(tree.path_length(&[4.5, 2.25], n_population).unwrap(), 2.0);
        assert_eq!(tree.path_length(&[1.75, 1.75], n_population).unwrap(), 4.0);
        assert_eq!(tree.path_length(&[2.75, 2.0], n_population).unwrap(), 6.0);
        assert_eq!(tree.path_length(&[2.1, 2.0], n_population).unwrap(), 6.0);
        assert_eq!(tree.path_length(&[0.0, 0.0], n_population).unwrap(), 4.0);
        assert_eq!(tree.path_length(&[100.0, 100.0], n_population).unwrap(), 2.0);
        assert_eq!(tree.path_length(&[0.0, 100.0], n_population).unwrap(), 4.0);
        assert_eq!(tree.path_length(&[-1.0, -1.0], n_population).unwrap(), 4.0);
    }

    #[test]
    fn test_threshold_goes_right() {
        let tree = hand_built_tree();
        // equal to the root threshold on feature 1 goes right, then 3.0 on feature 0 goes right
        let (leaf, edges) = tree.predict_leaf(&[3.0, 1.8]).unwrap();
        assert_eq!(leaf.get_id(), 30);
        assert_eq!(edges, 2);
    }

    #[test]
    fn test_hand_built_sizes() {
        let tree = hand_built_tree();
        check_sizes(&tree, tree.get_root());
        assert_eq!(tree.leaves().count(), 16);
        assert_eq!(tree.get_max_depth(), 6);
    }

    #[test]
    fn test_leaf_correction() {
        let nodes = vec![
            internal(0, 0, 2.0, 5, 0, [1, 2]),
            Node::External {
                id: 1,
                depth: 1,
                n_samples: 2,
            },
            Node::External {
                id: 2,
                depth: 1,
                n_samples: 3,
            },
        ];
        let tree = IsolationTree::from_nodes(nodes, 1).unwrap();
        assert_eq!(tree.path_length(&[1.0], 16).unwrap(), 2.0);
        crate::assert_eq_with_tol!(tree.path_length(&[3.0], 16).unwrap(), 1.0 + 2.2907, 1e-4);
    }

    #[test]
    fn test_from_nodes_rejects_malformed() {
        assert!(matches!(
            IsolationTree::from_nodes(vec![], 1),
            Err(Error::InvalidTree(_))
        ));
        assert!(matches!(
            IsolationTree::from_nodes(vec![internal(0, 0, 1.0, 2, 0, [1, 5]), leaf(1, 1)], 1),
            Err(Error::InvalidTree(_))
        ));
        assert!(matches!(
            IsolationTree::from_nodes(vec![leaf(1, 0)], 1),
            Err(Error::InvalidTree(_))
        ));
    }

    #[test]
    fn test_from_nodes_rejects_shared_child() {
        assert!(matches!(
            IsolationTree::from_nodes(vec![internal(0, 0, 1.0, 2, 0, [1, 1]), leaf(1, 1)], 1),
            Err(Error::InvalidTree(_))
        ));
        let nodes = vec![
            internal(0, 0, 1.0, 4, 0, [1, 2]),
            internal(1, 0, 0.5, 2, 1, [3, 4]),
            internal(2, 0, 2.0, 2, 1, [3, 4]),
            leaf(3, 2),
            leaf(4, 2),
        ];
        assert!(matches!(
            IsolationTree::from_nodes(nodes, 1),
            Err(Error::InvalidTree(_))
        ));
    }

    #[test]
    fn test_from_nodes_rejects_unreachable_node() {
        let nodes = vec![internal(0, 0, 1.0, 2, 0, [1, 2]), leaf(1, 1), leaf(2, 1), leaf(3, 1)];
        assert!(matches!(
            IsolationTree::from_nodes(nodes, 1),
            Err(Error::InvalidTree(_))
        ));
    }

    #[test]
    fn test_from_nodes_rejects_size_mismatch() {
        let nodes = vec![internal(0, 0, 1.0, 3, 0, [1, 2]), leaf(1, 1), leaf(2, 1)];
        assert!(matches!(
            IsolationTree::from_nodes(nodes, 1),
            Err(Error::InvalidTree(_))
        ));
    }

    #[test]
    fn test_from_nodes_rejects_unknown_feature() {
        let nodes = vec![internal(0, 2, 1.0, 2, 0, [1, 2]), leaf(1, 1), leaf(2, 1)];
        assert!(matches!(
            IsolationTree::from_nodes(nodes, 2),
            Err(Error::InvalidTree(_))
        ));
    }

    #[test]
    fn test_point_dimension_checked() {
        let tree = hand_built_tree();
        assert!(matches!(
            tree.path_length(&[1.0], 16),
            Err(Error::InvalidQueryArgument(_))
        ));
        assert!(matches!(
            tree.predict_leaf(&[1.0, 2.0, 3.0]),
            Err(Error::InvalidQueryArgument(_))
        ));
    }

    #[test]
    fn test_fit_tolerates_empty_partition() {
        let data = vec![
            Sample::new(vec![1.0, 5.0]),
            Sample::new(vec![f64::from_bits(1.0f64.to_bits() + 1), 5.0]),
        ];
        let mut random_state = RandomGenerator::seed_from_u64(13);
        let mut tree = IsolationTree::new(IsolationTreeConfig { max_depth: 4 });
        tree.fit(&data, &mut random_state);

        assert!(tree.leaves().any(|leaf| leaf.get_n_samples() == 0));
        check_sizes(&tree, tree.get_root());
        assert_eq!(tree.leaves().map(Node::get_n_samples).sum::<usize>(), 2);
        assert!(tree.leaves().all(|leaf| leaf.get_depth() <= 4));
        assert!(tree
            .leaves()
            .any(|leaf| leaf.get_n_samples() == 2 && leaf.get_depth() == 4));
    }

    #[test]
    fn test_fit_invariants() {
        let data = testing_data();
        let mut random_state = RandomGenerator::seed_from_u64(7);
        for max_depth in [0, 1, 3, 4, 10] {
            let mut tree = IsolationTree::new(IsolationTreeConfig { max_depth });
            tree.fit(&data, &mut random_state);

            check_sizes(&tree, tree.get_root());
            assert_eq!(
                tree.leaves().map(Node::get_n_samples).sum::<usize>(),
                data.len()
            );
            assert!(tree.leaves().all(|leaf| leaf.get_depth() <= max_depth));
            assert_eq!(tree.get_root().is_leaf(), max_depth == 0);
        }
    }

    #[test]
    fn test_fit_unlimited_isolates_every_point() {
        let data = testing_data();
        let mut random_state = RandomGenerator::seed_from_u64(11);
        let mut tree = IsolationTree::new(IsolationTreeConfig {
            max_depth: usize::MAX,
        });
        tree.fit(&data, &mut random_state);
        assert!(tree.leaves().all(|leaf| leaf.get_n_samples() <= 1));
        for sample in &data {
            let (leaf, edges) = tree.predict_leaf(&sample.features).unwrap();
            assert_eq!(leaf.get_n_samples(), 1);
            assert_eq!(leaf.get_depth(), edges);
        }
    }

    #[test]
    fn test_fit_single_sample() {
        let mut random_state = RandomGenerator::seed_from_u64(3);
        let mut tree = IsolationTree::new(IsolationTreeConfig { max_depth: 0 });
        tree.fit(&[Sample::new(vec![1.0, 2.0])], &mut random_state);
        assert_eq!(
            tree.get_root(),
            &Node::External {
                id: 0,
                depth: 0,
                n_samples: 1
            }
        );
        assert_eq!(tree.path_length(&[5.0, 5.0], 10).unwrap(), 0.0);
    }

    #[test]
    fn test_to_dot() {
        let tree = hand_built_tree();
        let dot = to_dot(&tree);
        assert!(dot.starts_with("digraph G {\n"));
        assert!(dot.ends_with("}\n"));
        assert_eq!(dot.matches("[label=").count(), 31);
        assert_eq!(dot.matches(" -> ").count(), 30);
        assert_eq!(dot.matches("penwidth=3").count(), 16);
        assert!(dot.contains("\"0\" [label=\"Attribute: 1\\nSplit Value:\\n 1.8 \\n Size: 16\""));
        assert!(dot.contains("\"30\" [label=\"Depth: 2\\nSize: 1 \""));
        assert!(dot.contains("\"0\" -> \"1\";"));
        assert!(dot.contains("\"0\" -> \"14\";"));
    }
}
