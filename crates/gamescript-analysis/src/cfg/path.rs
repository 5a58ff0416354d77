//! Backward path search over a graph.

use std::collections::VecDeque;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap;

/// Searches backwards from `seeds` for a node accepted by `is_target`.
///
/// The search is breadth-first along incoming edges. A node for which
/// `is_barrier` holds is still tested as a target but never expanded. On
/// success the path is returned in forward order: the target first, the
/// seed it was reached from last.
pub fn find_edge_path<N, E>(
    graph: &DiGraph<N, E>,
    seeds: impl IntoIterator<Item = NodeIndex>,
    mut is_target: impl FnMut(NodeIndex) -> bool,
    mut is_barrier: impl FnMut(NodeIndex) -> bool,
) -> Option<Vec<NodeIndex>> {
    // Maps each visited node to the node it was reached from; seeds map to
    // themselves.
    let mut next: FxHashMap<NodeIndex, NodeIndex> = FxHashMap::default();
    let mut queue = VecDeque::new();

    for seed in seeds {
        if next.insert(seed, seed).is_none() {
            queue.push_back(seed);
        }
    }

    while let Some(node) = queue.pop_front() {
        if is_target(node) {
            let mut path = vec![node];
            let mut current = node;
            while let Some(&after) = next.get(&current) {
                if after == current {
                    break;
                }
                path.push(after);
                current = after;
            }
            return Some(path);
        }

        if is_barrier(node) {
            continue;
        }

        for pred in graph.neighbors_directed(node, Direction::Incoming) {
            if let std::collections::hash_map::Entry::Vacant(entry) = next.entry(pred) {
                entry.insert(node);
                queue.push_back(pred);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    /// a -> b -> c -> d, plus a -> d
    fn chain() -> (DiGraph<char, ()>, [NodeIndex; 4]) {
        let mut graph = DiGraph::new();
        let a = graph.add_node('a');
        let b = graph.add_node('b');
        let c = graph.add_node('c');
        let d = graph.add_node('d');
        graph.add_edge(a, b, ());
        graph.add_edge(b, c, ());
        graph.add_edge(c, d, ());
        graph.add_edge(a, d, ());
        (graph, [a, b, c, d])
    }

    #[test]
    fn finds_shortest_backward_path() {
        let (graph, [a, _, _, d]) = chain();
        let path = find_edge_path(&graph, [d], |n| n == a, |_| false).unwrap();
        assert_eq!(path, [a, d]);
    }

    #[test]
    fn barrier_blocks_expansion_but_is_tested() {
        let (graph, [a, b, c, _]) = chain();
        assert_eq!(find_edge_path(&graph, [c], |n| n == a, |n| n == b), None);
        assert_eq!(
            find_edge_path(&graph, [c], |n| n == b, |n| n == b),
            Some(vec![b, c])
        );
    }

    #[test]
    fn seed_can_be_the_target() {
        let (graph, [_, b, _, _]) = chain();
        assert_eq!(find_edge_path(&graph, [b], |n| n == b, |_| true), Some(vec![b]));
    }

    #[test]
    fn cycles_terminate() {
        let mut graph: DiGraph<(), ()> = DiGraph::new();
        let a = graph.add_node(());
        let b = graph.add_node(());
        let c = graph.add_node(());
        graph.add_edge(a, b, ());
        graph.add_edge(b, a, ());
        graph.add_edge(c, c, ());
        assert_eq!(find_edge_path(&graph, [a], |n| n == c, |_| false), None);
    }
}
