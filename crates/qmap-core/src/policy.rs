//! Pluggable routing heuristics.
//!
//! Routing two non-adjacent qubits takes two decisions:
//!
//! 1. **Mover selection** ([`MoverPolicy`]): which of the two qubits walks
//!    along the shortest path and which one stays as the anchor.
//! 2. **Meeting point** ([`MeetingPolicy`]): where on that path the two
//!    end up. The mover stops at `path[k]`, the anchor at `path[k + 1]`.
//!
//! The defaults are [`DistanceToCenter`] and [`PathTruncation`], which
//! together move only the qubit farther from the topology center and
//! leave the anchor in place.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{MapError, MapResult, Phase};
use crate::interaction::{InteractionGraph, LogicalId};
use crate::layout::Layout;
use crate::topology::Topology;

/// Read-only view of the mapping state handed to routing policies.
#[derive(Debug, Clone, Copy)]
pub struct RoutingContext<'a> {
    pub graph: &'a InteractionGraph,
    pub topology: &'a Topology,
    pub layout: &'a Layout,
}

impl<'a> RoutingContext<'a> {
    /// Bundle the mapping state for a routing decision.
    pub fn new(graph: &'a InteractionGraph, topology: &'a Topology, layout: &'a Layout) -> Self {
        Self {
            graph,
            topology,
            layout,
        }
    }

    /// Physical qubit of `qubit`, or [`MapError::Unplaced`].
    pub fn physical(&self, qubit: LogicalId) -> MapResult<u32> {
        self.layout.physical(qubit).ok_or_else(|| MapError::Unplaced {
            phase: Phase::Routing,
            qubit,
            name: self.graph.name_of(qubit),
        })
    }
}

/// Decides which of two qubits moves.
pub trait MoverPolicy: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Return `(mover, anchor)`.
    fn select(
        &self,
        ctx: &RoutingContext<'_>,
        a: LogicalId,
        b: LogicalId,
    ) -> MapResult<(LogicalId, LogicalId)>;
}

/// Decides where on the mover→anchor path the two qubits meet.
pub trait MeetingPolicy: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Index `k` such that the mover ends on `path[k]` and the anchor on
    /// `path[k + 1]`. `path` runs from the mover to the anchor and holds at
    /// least three qubits.
    fn meeting_index(&self, ctx: &RoutingContext<'_>, path: &[u32]) -> usize;
}

/// The qubit farther from the topology center moves; ties move the first.
///
/// Qubits near the well-connected center stay put, which keeps future
/// routes short.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceToCenter;

impl MoverPolicy for DistanceToCenter {
    fn name(&self) -> &str {
        "distance-to-center"
    }

    fn select(
        &self,
        ctx: &RoutingContext<'_>,
        a: LogicalId,
        b: LogicalId,
    ) -> MapResult<(LogicalId, LogicalId)> {
        let center = ctx.topology.center()?;
        let distance = |q: LogicalId| -> MapResult<usize> {
            let p = ctx.physical(q)?;
            ctx.topology
                .distance(p, center)
                .ok_or(MapError::Unreachable {
                    phase: Phase::Routing,
                    from: p,
                    to: center,
                })
        };

        if distance(a)? >= distance(b)? {
            Ok((a, b))
        } else {
            Ok((b, a))
        }
    }
}

/// The qubit with the smaller total interaction weight moves towards the
/// better connected one; ties move the first.
#[derive(Debug, Clone, Copy, Default)]
pub struct LessConnected;

impl MoverPolicy for LessConnected {
    fn name(&self) -> &str {
        "less-connected"
    }

    fn select(
        &self,
        ctx: &RoutingContext<'_>,
        a: LogicalId,
        b: LogicalId,
    ) -> MapResult<(LogicalId, LogicalId)> {
        if ctx.graph.total_weight(a) <= ctx.graph.total_weight(b) {
            Ok((a, b))
        } else {
            Ok((b, a))
        }
    }
}

/// The anchor never moves: the mover walks up to the anchor's neighbor.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathTruncation;

impl MeetingPolicy for PathTruncation {
    fn name(&self) -> &str {
        "truncate"
    }

    fn meeting_index(&self, _ctx: &RoutingContext<'_>, path: &[u32]) -> usize {
        path.len().saturating_sub(2)
    }
}

/// Try every meeting point and keep the one that leaves the most
/// interaction weight on physically adjacent pairs.
///
/// Every split costs the same number of SWAPs. Ties keep the anchor in
/// place.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestEdgeScore;

impl MeetingPolicy for BestEdgeScore {
    fn name(&self) -> &str {
        "edge-score"
    }

    fn meeting_index(&self, ctx: &RoutingContext<'_>, path: &[u32]) -> usize {
        let last = path.len().saturating_sub(2);
        let mut best = (last, f64::NEG_INFINITY);

        for k in (0..=last).rev() {
            let mut trial = ctx.layout.clone();
            for (p1, p2) in swaps_for_split(path, k) {
                trial.swap(p1, p2);
            }
            let score = adjacent_edge_score(ctx.graph, ctx.topology, &trial);
            if score > best.1 {
                best = (k, score);
            }
        }

        best.0
    }
}

/// SWAPs that bring `path[0]` to `path[k]` and `path[last]` to `path[k + 1]`.
///
/// The mover's chain comes first, then the anchor's; the two chains touch
/// disjoint qubits.
pub fn swaps_for_split(path: &[u32], k: usize) -> Vec<(u32, u32)> {
    let mut swaps: Vec<(u32, u32)> = path[..=k].windows(2).map(|w| (w[0], w[1])).collect();
    swaps.extend(path[k + 1..].windows(2).rev().map(|w| (w[1], w[0])));
    swaps
}

/// Total weight of interaction edges whose endpoints sit on adjacent
/// physical qubits.
pub fn adjacent_edge_score(graph: &InteractionGraph, topology: &Topology, layout: &Layout) -> f64 {
    graph
        .edges()
        .filter(|edge| {
            let (a, b) = edge.endpoints();
            match (layout.physical(a), layout.physical(b)) {
                (Some(pa), Some(pb)) => topology.is_adjacent(pa, pb),
                _ => false,
            }
        })
        .map(|edge| edge.weight())
        .sum()
}

/// Serializable choice of [`MoverPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoverStrategy {
    /// [`DistanceToCenter`]
    #[default]
    DistanceToCenter,
    /// [`LessConnected`]
    LessConnected,
}

impl MoverStrategy {
    /// Instantiate the policy.
    pub fn build(self) -> Box<dyn MoverPolicy> {
        match self {
            MoverStrategy::DistanceToCenter => Box::new(DistanceToCenter),
            MoverStrategy::LessConnected => Box::new(LessConnected),
        }
    }
}

impl FromStr for MoverStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "distance-to-center" | "center" => Ok(MoverStrategy::DistanceToCenter),
            "less-connected" | "connectivity" => Ok(MoverStrategy::LessConnected),
            other => Err(format!(
                "unknown mover strategy '{other}' (expected center or connectivity)"
            )),
        }
    }
}

impl fmt::Display for MoverStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.build().name())
    }
}

/// Serializable choice of [`MeetingPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeetingStrategy {
    /// [`PathTruncation`]
    #[default]
    Truncate,
    /// [`BestEdgeScore`]
    EdgeScore,
}

impl MeetingStrategy {
    /// Instantiate the policy.
    pub fn build(self) -> Box<dyn MeetingPolicy> {
        match self {
            MeetingStrategy::Truncate => Box::new(PathTruncation),
            MeetingStrategy::EdgeScore => Box::new(BestEdgeScore),
        }
    }
}

impl FromStr for MeetingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "truncate" => Ok(MeetingStrategy::Truncate),
            "edge-score" => Ok(MeetingStrategy::EdgeScore),
            other => Err(format!(
                "unknown meeting strategy '{other}' (expected truncate or edge-score)"
            )),
        }
    }
}

impl fmt::Display for MeetingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.build().name())
    }
}
