//! One-shot initial placement of logical qubits onto the topology.
//!
//! Placement is a greedy growth from a seed. The most interactive logical
//! qubit goes to a well-connected starting position, and its interaction
//! partners are then pulled in strongest-edge first, each onto the free
//! physical qubit nearest to the partner that is already placed.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::{MapError, MapResult};
use crate::interaction::{InteractionGraph, LogicalId};
use crate::layout::Layout;
use crate::topology::Topology;

/// Options for [`InitialPlacement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementOptions {
    /// Place circuits without any two-qubit interaction by filling the
    /// topology arbitrarily instead of failing with
    /// [`MapError::NoInteractions`].
    pub allow_isolated: bool,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            allow_isolated: true,
        }
    }
}

/// A pending assignment: pull `target` next to the already placed `source`.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    weight: f64,
    /// Insertion counter; earlier candidates win ties.
    seq: u64,
    source: LogicalId,
    target: LogicalId,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .total_cmp(&other.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Max-heap of candidates with a running insertion counter.
#[derive(Default)]
struct CandidateQueue {
    heap: BinaryHeap<Candidate>,
    next_seq: u64,
}

impl CandidateQueue {
    /// Enqueue every unplaced interaction partner of `source`.
    fn extend_from(&mut self, graph: &InteractionGraph, layout: &Layout, source: LogicalId) {
        for (target, weight) in graph.neighbors(source) {
            if layout.is_placed(target) {
                continue;
            }
            self.heap.push(Candidate {
                weight,
                seq: self.next_seq,
                source,
                target,
            });
            self.next_seq += 1;
        }
    }

    fn pop(&mut self) -> Option<Candidate> {
        self.heap.pop()
    }
}

/// The initial placement engine.
#[derive(Debug, Clone, Default)]
pub struct InitialPlacement {
    options: PlacementOptions,
}

impl InitialPlacement {
    /// Create a placement engine.
    pub fn new(options: PlacementOptions) -> Self {
        Self { options }
    }

    /// Assign every logical qubit of `graph` to a distinct physical qubit.
    ///
    /// Fails when the topology runs out of free qubits, or when the graph
    /// has no interactions and isolated placement is disabled.
    #[instrument(skip_all, fields(logical = graph.qubit_count(), physical = topology.num_qubits()))]
    pub fn run(&self, graph: &InteractionGraph, topology: &Topology) -> MapResult<Layout> {
        let mut layout = Layout::new();
        let edged: Vec<LogicalId> = graph
            .qubits()
            .map(|(id, _)| id)
            .filter(|&id| graph.has_edges(id))
            .collect();

        let Some(seed) = heaviest_unplaced(graph, &edged, &layout) else {
            if !self.options.allow_isolated || graph.qubit_count() == 0 {
                return Err(MapError::NoInteractions {
                    qubits: graph.qubit_count(),
                });
            }
            info!(
                "No interactions among {} qubits, placing arbitrarily",
                graph.qubit_count()
            );
            for (id, _) in graph.qubits() {
                topology.place_arbitrarily(id, &mut layout)?;
            }
            return Ok(layout);
        };

        let start = topology.find_optimal_starting_pos(edged.len())?;
        info!(
            "Seeding placement with {} (weight {:.3}) on Q[{}]",
            graph.name_of(seed),
            graph.total_weight(seed),
            start
        );
        layout.assign(seed, start);
        grow(graph, topology, &mut layout, seed)?;

        // Interaction components not reachable from the first seed.
        let mut components = 1;
        while let Some(next) = heaviest_unplaced(graph, &edged, &layout) {
            let physical = topology.place_arbitrarily(next, &mut layout)?;
            debug!(
                "Seeding component {} with {} on Q[{}]",
                components + 1,
                graph.name_of(next),
                physical
            );
            grow(graph, topology, &mut layout, next)?;
            components += 1;
        }

        let isolated = graph.qubit_count() - edged.len();
        for (id, _) in graph.qubits() {
            if !layout.is_placed(id) {
                topology.place_arbitrarily(id, &mut layout)?;
            }
        }

        info!(
            "Placed {} qubits ({} interaction components, {} isolated)",
            layout.len(),
            components,
            isolated
        );
        Ok(layout)
    }
}

/// Place the interaction component of `seed`, which must already be placed.
fn grow(
    graph: &InteractionGraph,
    topology: &Topology,
    layout: &mut Layout,
    seed: LogicalId,
) -> MapResult<()> {
    let mut queue = CandidateQueue::default();
    queue.extend_from(graph, layout, seed);

    while let Some(candidate) = queue.pop() {
        if layout.is_placed(candidate.target) {
            continue;
        }
        let Some(anchor) = layout.physical(candidate.source) else {
            continue;
        };
        let physical = topology.nearest_free(anchor, layout)?;
        layout.assign(candidate.target, physical);
        debug!(
            "Placed {} on Q[{}] next to {} (weight {:.3})",
            graph.name_of(candidate.target),
            physical,
            graph.name_of(candidate.source),
            candidate.weight
        );
        queue.extend_from(graph, layout, candidate.target);
    }
    Ok(())
}

/// Unplaced qubit from `candidates` with the greatest total weight; the
/// first one wins ties.
fn heaviest_unplaced(
    graph: &InteractionGraph,
    candidates: &[LogicalId],
    layout: &Layout,
) -> Option<LogicalId> {
    let mut best: Option<(LogicalId, f64)> = None;
    for &id in candidates {
        if layout.is_placed(id) {
            continue;
        }
        let weight = graph.total_weight(id);
        if best.is_none_or(|(_, w)| weight > w) {
            best = Some((id, weight));
        }
    }
    best.map(|(id, _)| id)
}
