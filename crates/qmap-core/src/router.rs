//! On-demand SWAP routing.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MapError, MapResult, Phase};
use crate::interaction::{InteractionGraph, LogicalId};
use crate::layout::Layout;
use crate::policy::{
    DistanceToCenter, MeetingPolicy, MeetingStrategy, MoverPolicy, MoverStrategy, PathTruncation,
    RoutingContext, swaps_for_split,
};
use crate::topology::{Topology, physical_label};

/// Two adjacent physical qubits whose occupants were exchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwapPair(pub u32, pub u32);

impl fmt::Display for SwapPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", physical_label(self.0), physical_label(self.1))
    }
}

/// Makes two placed logical qubits physically adjacent before they
/// interact.
///
/// The router moves qubits along one shortest path, so the number of
/// SWAPs is the path length minus two. Which qubit moves and where the
/// two meet is delegated to the configured policies.
pub struct Router {
    mover: Box<dyn MoverPolicy>,
    meeting: Box<dyn MeetingPolicy>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(DistanceToCenter, PathTruncation)
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("mover", &self.mover.name())
            .field("meeting", &self.meeting.name())
            .finish()
    }
}

impl Router {
    /// Create a router from explicit policies.
    pub fn new(mover: impl MoverPolicy + 'static, meeting: impl MeetingPolicy + 'static) -> Self {
        Self {
            mover: Box::new(mover),
            meeting: Box::new(meeting),
        }
    }

    /// Create a router from serializable strategy choices.
    pub fn from_strategies(mover: MoverStrategy, meeting: MeetingStrategy) -> Self {
        Self {
            mover: mover.build(),
            meeting: meeting.build(),
        }
    }

    /// Make `a` and `b` adjacent, mutating `layout` in place.
    ///
    /// Returns the swapped physical pairs in application order. Already
    /// adjacent qubits yield an empty list and leave the layout untouched.
    pub fn route_adjacent(
        &self,
        graph: &InteractionGraph,
        topology: &Topology,
        layout: &mut Layout,
        a: LogicalId,
        b: LogicalId,
    ) -> MapResult<Vec<SwapPair>> {
        if a == b {
            return Err(MapError::SelfInteraction {
                phase: Phase::Routing,
                name: graph.name_of(a),
            });
        }

        let ctx = RoutingContext::new(graph, topology, layout);
        let pa = ctx.physical(a)?;
        let pb = ctx.physical(b)?;
        if topology.is_adjacent(pa, pb) {
            return Ok(Vec::new());
        }

        let (mover, anchor) = self.mover.select(&ctx, a, b)?;
        let from = ctx.physical(mover)?;
        let to = ctx.physical(anchor)?;
        let path = topology
            .shortest_path(from, to)
            .ok_or(MapError::Unreachable {
                phase: Phase::Routing,
                from,
                to,
            })?;
        let k = self.meeting.meeting_index(&ctx, &path);

        let swaps: Vec<SwapPair> = swaps_for_split(&path, k)
            .into_iter()
            .map(|(p1, p2)| SwapPair(p1, p2))
            .collect();
        for swap in &swaps {
            layout.swap(swap.0, swap.1);
        }

        debug!(
            "Routed {} - {}: {} moves along {:?}, {} swaps",
            graph.name_of(a),
            graph.name_of(b),
            graph.name_of(mover),
            path,
            swaps.len()
        );
        Ok(swaps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{BestEdgeScore, LessConnected};

    fn setup(placements: &[(&str, u32)]) -> (InteractionGraph, Layout, Vec<LogicalId>) {
        let mut graph = InteractionGraph::new();
        let mut layout = Layout::new();
        let ids = placements
            .iter()
            .map(|&(name, p)| {
                let id = graph.add_qubit(name);
                layout.assign(id, p);
                id
            })
            .collect();
        (graph, layout, ids)
    }

    #[test]
    fn test_adjacent_qubits_need_no_swaps() {
        let topology = Topology::linear(5);
        let (graph, mut layout, ids) = setup(&[("a", 1), ("b", 2)]);
        let before = layout.clone();

        let swaps = Router::default()
            .route_adjacent(&graph, &topology, &mut layout, ids[0], ids[1])
            .unwrap();
        assert!(swaps.is_empty());
        assert_eq!(layout, before);
    }

    #[test]
    fn test_path_scenario_two_swaps() {
        let topology = Topology::linear(5);
        let (graph, mut layout, ids) = setup(&[("Q0", 0), ("Q1", 3)]);

        let swaps = Router::default()
            .route_adjacent(&graph, &topology, &mut layout, ids[0], ids[1])
            .unwrap();

        // Q1 is farther from the center (qubit 0) and walks towards Q0.
        assert_eq!(swaps, vec![SwapPair(3, 2), SwapPair(2, 1)]);
        let p0 = layout.physical(ids[0]).unwrap();
        let p1 = layout.physical(ids[1]).unwrap();
        assert_eq!(p0, 0);
        assert!(topology.is_adjacent(p0, p1));
    }

    #[test]
    fn test_intermediate_occupants_shift_back() {
        let topology = Topology::linear(5);
        let (graph, mut layout, ids) = setup(&[("a", 0), ("b", 3), ("c", 2)]);

        Router::default()
            .route_adjacent(&graph, &topology, &mut layout, ids[0], ids[1])
            .unwrap();

        assert_eq!(layout.physical(ids[1]), Some(1));
        assert_eq!(layout.physical(ids[2]), Some(3));
        assert!(!layout.is_occupied(2));
        assert_eq!(layout.len(), 3);
    }

    #[test]
    fn test_unplaced_qubit_is_fatal() {
        let topology = Topology::linear(5);
        let (mut graph, mut layout, ids) = setup(&[("a", 0)]);
        let b = graph.add_qubit("b");

        let err = Router::default()
            .route_adjacent(&graph, &topology, &mut layout, ids[0], b)
            .unwrap_err();
        assert!(matches!(
            err,
            MapError::Unplaced {
                phase: Phase::Routing,
                ..
            }
        ));
    }

    #[test]
    fn test_same_qubit_is_rejected() {
        let topology = Topology::linear(3);
        let (graph, mut layout, ids) = setup(&[("a", 0)]);
        assert!(matches!(
            Router::default().route_adjacent(&graph, &topology, &mut layout, ids[0], ids[0]),
            Err(MapError::SelfInteraction { .. })
        ));
    }

    #[test]
    fn test_edge_score_moves_anchor_when_better() {
        let topology = Topology::linear(5);
        let mut graph = InteractionGraph::new();
        graph.record_interaction("q0", "q1").unwrap();
        graph.record_interaction("q1", "q2").unwrap();
        graph.record_interaction("q1", "q2").unwrap();
        let q0 = graph.qubit_id("q0").unwrap();
        let q1 = graph.qubit_id("q1").unwrap();
        let q2 = graph.qubit_id("q2").unwrap();

        let mut layout = Layout::new();
        layout.assign(q0, 0);
        layout.assign(q1, 3);
        layout.assign(q2, 4);

        let router = Router::new(DistanceToCenter, BestEdgeScore);
        let swaps = router
            .route_adjacent(&graph, &topology, &mut layout, q0, q1)
            .unwrap();

        // q1 keeps its neighbor q2; q0 walks up instead.
        assert_eq!(swaps, vec![SwapPair(0, 1), SwapPair(1, 2)]);
        assert_eq!(layout.physical(q0), Some(2));
        assert_eq!(layout.physical(q1), Some(3));
        assert_eq!(layout.physical(q2), Some(4));
    }

    #[test]
    fn test_less_connected_policy() {
        let topology = Topology::linear(6);
        let mut graph = InteractionGraph::new();
        graph.record_interaction("hub", "x").unwrap();
        graph.record_interaction("hub", "y").unwrap();
        graph.record_interaction("hub", "leaf").unwrap();
        let hub = graph.qubit_id("hub").unwrap();
        let leaf = graph.qubit_id("leaf").unwrap();

        let mut layout = Layout::new();
        layout.assign(hub, 5);
        layout.assign(leaf, 1);

        let router = Router::new(LessConnected, PathTruncation);
        router
            .route_adjacent(&graph, &topology, &mut layout, hub, leaf)
            .unwrap();
        assert_eq!(layout.physical(hub), Some(5));
        assert_eq!(layout.physical(leaf), Some(4));
    }

    #[test]
    fn test_swap_pair_display() {
        assert_eq!(SwapPair(3, 12).to_string(), "Q[3],Q[12]");
    }
}
