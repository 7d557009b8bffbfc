//! Hardware topology: the physical qubit adjacency graph.
//!
//! A [`Topology`] is built once per compilation and never changes
//! afterwards. Occupancy is not stored here; it is read from the
//! [`Layout`] passed into the operations that need it.
//!
//! # Connectivity score
//!
//! The "center" of a topology is found with a continuous frontier walk
//! rather than exact graph centrality. Starting at a qubit, the walk
//! visits one node per unit of budget, accumulating the set of all
//! neighbors seen along the way; the score is the size of that set when
//! the budget (or the frontier) runs out. The frontier may hold the same
//! node more than once, and re-visits still consume budget.

use std::collections::VecDeque;

use petgraph::Graph;
use petgraph::Undirected;
use petgraph::algo::connected_components;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::error::{MapError, MapResult, Phase};
use crate::interaction::LogicalId;
use crate::layout::Layout;
use crate::pathfinding::{self, Neighbors};

/// Physical register name used when rendering physical qubits.
pub const PHYSICAL_REGISTER: &str = "Q";

/// Render a physical qubit as it appears in emitted circuits, e.g. `Q[12]`.
pub fn physical_label(qubit: u32) -> String {
    format!("{PHYSICAL_REGISTER}[{qubit}]")
}

/// Target device adjacency graph.
#[derive(Debug, Clone)]
pub struct Topology {
    /// Qubit ids in declaration order.
    qubits: Vec<u32>,
    /// Connected pairs, deduplicated, in insertion order.
    edges: Vec<(u32, u32)>,
    /// Adjacency lists in insertion order.
    adjacency: FxHashMap<u32, Vec<u32>>,
    /// Highest connectivity score over the whole device, computed once.
    center: Option<u32>,
}

impl Topology {
    /// Build a topology from qubit ids and undirected adjacency pairs.
    ///
    /// Duplicate pairs (in either direction) are ignored. Self loops, pairs
    /// naming unknown qubits, duplicate qubit ids and disconnected graphs
    /// are rejected.
    pub fn from_edges(
        qubits: impl IntoIterator<Item = u32>,
        edges: impl IntoIterator<Item = (u32, u32)>,
    ) -> MapResult<Self> {
        let qubits: Vec<u32> = qubits.into_iter().collect();
        let known: FxHashSet<u32> = qubits.iter().copied().collect();
        if known.len() != qubits.len() {
            return Err(MapError::InvalidTopology("duplicate physical qubit id".to_string()));
        }

        let edges: Vec<(u32, u32)> = edges.into_iter().collect();
        for &(a, b) in &edges {
            if a == b {
                return Err(MapError::InvalidTopology(format!("self loop on qubit {a}")));
            }
            for q in [a, b] {
                if !known.contains(&q) {
                    return Err(MapError::UnknownPhysical {
                        phase: Phase::Topology,
                        qubit: q,
                    });
                }
            }
        }

        let components = count_components(&qubits, &edges);
        if components > 1 {
            return Err(MapError::DisconnectedTopology { components });
        }

        Ok(Self::build(qubits, edges))
    }

    /// Construct without validation. Callers guarantee well-formed input.
    fn build(qubits: Vec<u32>, pairs: Vec<(u32, u32)>) -> Self {
        let mut topology = Self {
            adjacency: qubits.iter().map(|&q| (q, Vec::new())).collect(),
            qubits,
            edges: Vec::with_capacity(pairs.len()),
            center: None,
        };
        for (a, b) in pairs {
            topology.add_edge(a, b);
        }
        topology.center = topology.compute_center();
        debug!(
            "Built topology with {} qubits, {} edges, center {:?}",
            topology.qubits.len(),
            topology.edges.len(),
            topology.center
        );
        topology
    }

    fn add_edge(&mut self, a: u32, b: u32) {
        if self.is_adjacent(a, b) {
            return;
        }
        self.edges.push((a, b));
        self.adjacency.entry(a).or_default().push(b);
        self.adjacency.entry(b).or_default().push(a);
    }

    fn compute_center(&self) -> Option<u32> {
        let budget = self.qubits.len();
        let mut best: Option<(u32, usize)> = None;
        for &q in &self.qubits {
            let score = self.connectivity_score(q, budget);
            trace!("connectivity score of Q[{}]: {}", q, score);
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((q, score));
            }
        }
        best.map(|(q, _)| q)
    }

    /// Create a linear topology (0-1-2-3-...).
    pub fn linear(n: u32) -> Self {
        Self::build((0..n).collect(), (1..n).map(|i| (i - 1, i)).collect())
    }

    /// Create a ring topology (linear with the ends joined).
    pub fn ring(n: u32) -> Self {
        let mut pairs: Vec<_> = (1..n).map(|i| (i - 1, i)).collect();
        if n > 2 {
            pairs.push((n - 1, 0));
        }
        Self::build((0..n).collect(), pairs)
    }

    /// Create a `rows` x `cols` grid, qubits numbered row-major.
    ///
    /// `rows * cols` must fit in a `u32`. [`TopologySpec::build`] checks
    /// sizes before calling the presets.
    ///
    /// [`TopologySpec::build`]: crate::TopologySpec::build
    pub fn grid(rows: u32, cols: u32) -> Self {
        let mut pairs = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                let q = r * cols + c;
                if c + 1 < cols {
                    pairs.push((q, q + 1));
                }
                if r + 1 < rows {
                    pairs.push((q, q + cols));
                }
            }
        }
        Self::build((0..rows * cols).collect(), pairs)
    }

    /// Create a star topology (qubit 0 connected to all others).
    pub fn star(n: u32) -> Self {
        Self::build((0..n).collect(), (1..n).map(|i| (0, i)).collect())
    }

    /// Create a fully connected topology.
    pub fn full(n: u32) -> Self {
        let mut pairs = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                pairs.push((i, j));
            }
        }
        Self::build((0..n).collect(), pairs)
    }

    /// The 65-qubit heavy-hex lattice: five rows of qubits joined by
    /// bridge qubits. This is the default target.
    pub fn heavy_hex_65() -> Self {
        const BRIDGES: [[(u32, u32); 6]; 4] = [
            [(0, 10), (10, 13), (4, 11), (11, 17), (8, 12), (12, 21)],
            [(15, 24), (24, 29), (19, 25), (25, 33), (23, 26), (26, 37)],
            [(27, 38), (38, 41), (31, 39), (39, 45), (35, 40), (40, 49)],
            [(43, 52), (52, 56), (47, 53), (53, 60), (51, 54), (54, 64)],
        ];
        // Interior qubits of each row; each links to both of its row neighbors.
        let rows = [1..=8, 14..=22, 28..=36, 42..=50, 56..=63];

        let mut pairs = Vec::new();
        for (i, row) in rows.into_iter().enumerate() {
            for q in row {
                pairs.push((q, q - 1));
                pairs.push((q, q + 1));
            }
            if let Some(links) = BRIDGES.get(i) {
                pairs.extend(links);
            }
        }

        Self::build((0..65).collect(), pairs)
    }

    /// Number of physical qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Qubit ids in declaration order.
    pub fn qubits(&self) -> &[u32] {
        &self.qubits
    }

    /// Deduplicated adjacency pairs.
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    /// Whether `qubit` is part of this topology.
    pub fn contains(&self, qubit: u32) -> bool {
        self.adjacency.contains_key(&qubit)
    }

    /// Get neighbors of a qubit, in insertion order.
    pub fn neighbors(&self, qubit: u32) -> &[u32] {
        self.adjacency.get(&qubit).map_or(&[], Vec::as_slice)
    }

    /// Check if two qubits are directly connected.
    #[inline]
    pub fn is_adjacent(&self, q1: u32, q2: u32) -> bool {
        self.adjacency
            .get(&q1)
            .is_some_and(|neighbors| neighbors.contains(&q2))
    }

    /// The best-connected qubit of the device.
    pub fn center(&self) -> MapResult<u32> {
        self.center.ok_or(MapError::EmptyTopology {
            phase: Phase::Topology,
        })
    }

    /// Score `start` with the frontier walk described in the module docs.
    pub fn connectivity_score(&self, start: u32, budget: usize) -> usize {
        let mut visited = FxHashSet::default();
        let mut seen_neighbors = FxHashSet::default();
        let mut frontier = VecDeque::new();
        let mut current = start;
        let mut remaining = budget;

        loop {
            visited.insert(current);
            if remaining == 0 {
                return seen_neighbors.len();
            }

            let neighbors = self.neighbors(current);
            seen_neighbors.extend(neighbors.iter().copied());
            frontier.extend(neighbors.iter().copied().filter(|n| !visited.contains(n)));

            match frontier.pop_front() {
                Some(next) => current = next,
                None => return seen_neighbors.len(),
            }
            remaining -= 1;
        }
    }

    /// Hill-climb from the center towards the qubit with the best score for
    /// placing `num_qubits` interacting qubits.
    ///
    /// Stops at the first qubit none of whose neighbors scores strictly
    /// higher. The result is a local optimum.
    pub fn find_optimal_starting_pos(&self, num_qubits: usize) -> MapResult<u32> {
        let mut best = self.center()?;
        let mut best_score = self.connectivity_score(best, num_qubits);

        loop {
            let mut improved = false;
            for &neighbor in self.neighbors(best) {
                let score = self.connectivity_score(neighbor, num_qubits);
                if score > best_score {
                    best_score = score;
                    best = neighbor;
                    improved = true;
                }
            }
            if !improved {
                debug!(
                    "Starting position Q[{}] (score {}) for {} qubits",
                    best, best_score, num_qubits
                );
                return Ok(best);
            }
        }
    }

    /// Shortest path from `from` to `to`, both included.
    pub fn shortest_path(&self, from: u32, to: u32) -> Option<Vec<u32>> {
        pathfinding::shortest_path(self, from, to)
    }

    /// Shortest-path hop count.
    pub fn distance(&self, from: u32, to: u32) -> Option<usize> {
        pathfinding::distance(self, from, to)
    }

    /// Closest unoccupied qubit to `from` (which may be `from` itself).
    pub fn nearest_free(&self, from: u32, layout: &Layout) -> MapResult<u32> {
        pathfinding::nearest_free(self, from, |q| !layout.is_occupied(q)).ok_or(
            MapError::NoFreeQubit {
                phase: Phase::Placement,
                from,
            },
        )
    }

    /// Assign `qubit` to a free physical qubit next to an occupied one, or
    /// to the first free qubit if nothing is occupied yet.
    pub fn place_arbitrarily(&self, qubit: LogicalId, layout: &mut Layout) -> MapResult<u32> {
        let free = |q: &&u32| !layout.is_occupied(**q);
        let target = self
            .qubits
            .iter()
            .filter(free)
            .find(|&&q| self.neighbors(q).iter().any(|&n| layout.is_occupied(n)))
            .or_else(|| self.qubits.iter().find(free))
            .copied()
            .ok_or(MapError::TopologyExhausted {
                phase: Phase::Placement,
                qubit,
                available: self.qubits.len(),
            })?;

        layout.assign(qubit, target);
        debug!("Placed {} arbitrarily on Q[{}]", qubit, target);
        Ok(target)
    }
}

impl Neighbors for Topology {
    fn neighbors(&self, qubit: u32) -> &[u32] {
        Topology::neighbors(self, qubit)
    }
}

fn count_components(qubits: &[u32], edges: &[(u32, u32)]) -> usize {
    let mut graph: Graph<u32, (), Undirected> = Graph::new_undirected();
    let nodes: FxHashMap<u32, _> = qubits.iter().map(|&q| (q, graph.add_node(q))).collect();
    for (a, b) in edges {
        graph.add_edge(nodes[a], nodes[b], ());
    }
    connected_components(&graph)
}
