//! Unweighted search primitives over a static adjacency graph.
//!
//! All searches are plain FIFO breadth-first traversals. Neighbors are
//! expanded in the order the graph reports them, so results are
//! deterministic for a given adjacency order.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

/// Read-only access to an undirected adjacency structure.
pub trait Neighbors {
    /// Neighbors of `qubit`, empty if the qubit is unknown.
    fn neighbors(&self, qubit: u32) -> &[u32];
}

impl Neighbors for FxHashMap<u32, Vec<u32>> {
    fn neighbors(&self, qubit: u32) -> &[u32] {
        self.get(&qubit).map_or(&[], Vec::as_slice)
    }
}

/// Shortest path from `from` to `to`, both endpoints included.
///
/// Returns `None` if `to` is unreachable.
pub fn shortest_path<G: Neighbors + ?Sized>(graph: &G, from: u32, to: u32) -> Option<Vec<u32>> {
    if from == to {
        return Some(vec![from]);
    }

    let mut parents: FxHashMap<u32, u32> = FxHashMap::default();
    let mut queue = VecDeque::new();
    parents.insert(from, from);
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        for &neighbor in graph.neighbors(current) {
            if parents.contains_key(&neighbor) {
                continue;
            }
            parents.insert(neighbor, current);

            if neighbor == to {
                let mut path = vec![to];
                let mut node = to;
                while node != from {
                    node = parents[&node];
                    path.push(node);
                }
                path.reverse();
                return Some(path);
            }

            queue.push_back(neighbor);
        }
    }

    None
}

/// Number of hops on a shortest path, or `None` if unreachable.
pub fn distance<G: Neighbors + ?Sized>(graph: &G, from: u32, to: u32) -> Option<usize> {
    shortest_path(graph, from, to).map(|path| path.len() - 1)
}

/// First node in BFS order from `from` (inclusive) that satisfies `is_free`.
pub fn nearest_free<G, F>(graph: &G, from: u32, is_free: F) -> Option<u32>
where
    G: Neighbors + ?Sized,
    F: Fn(u32) -> bool,
{
    bfs_order(graph, from).into_iter().find(|&q| is_free(q))
}

/// Every node reachable from `from`, in FIFO breadth-first order.
pub fn bfs_order<G: Neighbors + ?Sized>(graph: &G, from: u32) -> Vec<u32> {
    let mut seen = FxHashSet::default();
    let mut order = Vec::new();
    let mut queue = VecDeque::new();
    seen.insert(from);
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        order.push(current);
        for &neighbor in graph.neighbors(current) {
            if seen.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_graph(n: u32) -> FxHashMap<u32, Vec<u32>> {
        let mut adjacency: FxHashMap<u32, Vec<u32>> = FxHashMap::default();
        for i in 0..n {
            adjacency.entry(i).or_default();
            if i + 1 < n {
                adjacency.entry(i).or_default().push(i + 1);
                adjacency.entry(i + 1).or_default().push(i);
            }
        }
        adjacency
    }

    #[test]
    fn test_shortest_path_linear() {
        let graph = path_graph(5);
        assert_eq!(shortest_path(&graph, 0, 4), Some(vec![0, 1, 2, 3, 4]));
        assert_eq!(shortest_path(&graph, 3, 1), Some(vec![3, 2, 1]));
        assert_eq!(shortest_path(&graph, 2, 2), Some(vec![2]));
    }

    #[test]
    fn test_shortest_path_unreachable() {
        let mut graph = path_graph(3);
        graph.insert(7, vec![]);
        assert_eq!(shortest_path(&graph, 0, 7), None);
        assert_eq!(distance(&graph, 0, 7), None);
    }

    #[test]
    fn test_nearest_free_prefers_start() {
        let graph = path_graph(5);
        assert_eq!(nearest_free(&graph, 2, |_| true), Some(2));
        assert_eq!(nearest_free(&graph, 2, |q| q == 4), Some(4));
        assert_eq!(nearest_free(&graph, 2, |q| q > 10), None);
    }

    #[test]
    fn test_bfs_order_visits_by_distance() {
        let graph = path_graph(5);
        assert_eq!(bfs_order(&graph, 2), vec![2, 1, 3, 0, 4]);
    }
}
