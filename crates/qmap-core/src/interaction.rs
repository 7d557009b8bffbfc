//! Weighted interaction graph over logical qubits.
//!
//! The graph is filled during the first pass over a circuit. Every
//! two-qubit operation either creates an edge between its operands or
//! reinforces the existing one. Reinforcement is larger when the two
//! endpoints have seen little other activity since the edge was last
//! touched, which approximates recency without timestamps.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{MapError, MapResult, Phase};

/// Weight of a freshly created interaction edge.
pub const INITIAL_EDGE_WEIGHT: f64 = 2.0;

/// Numerator of the reinforcement term.
const WEIGHT_INCREMENT: f64 = 1.0;

/// Identifier of a logical qubit inside one [`InteractionGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LogicalId(pub u32);

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "l{}", self.0)
    }
}

/// Identifier of a classical bit inside one [`InteractionGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClbitId(pub u32);

/// Identifier of an interaction edge inside one [`InteractionGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

/// A logical qubit and its interaction bookkeeping.
#[derive(Debug, Clone)]
pub struct LogicalQubit {
    name: String,
    edges: Vec<EdgeId>,
    usage: u32,
}

impl LogicalQubit {
    /// The qubit's name as referenced by the circuit, e.g. `q[3]`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Incident edges in creation order.
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Number of edge reinforcements this qubit took part in.
    pub fn usage(&self) -> u32 {
        self.usage
    }
}

/// An undirected, weighted interaction between two distinct logical qubits.
#[derive(Debug, Clone)]
pub struct Edge {
    endpoints: (LogicalId, LogicalId),
    weight: f64,
    /// Combined usage of both endpoints at the last update.
    baseline: u32,
}

impl Edge {
    /// Both endpoints, in the order of the first recorded interaction.
    pub fn endpoints(&self) -> (LogicalId, LogicalId) {
        self.endpoints
    }

    /// Current weight. Starts at [`INITIAL_EDGE_WEIGHT`] and never decreases.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Whether `qubit` is one of the endpoints.
    pub fn contains(&self, qubit: LogicalId) -> bool {
        self.endpoints.0 == qubit || self.endpoints.1 == qubit
    }

    /// The endpoint opposite to `qubit`, or `None` if `qubit` is not on this edge.
    pub fn other(&self, qubit: LogicalId) -> Option<LogicalId> {
        match self.endpoints {
            (a, b) if a == qubit => Some(b),
            (a, b) if b == qubit => Some(a),
            _ => None,
        }
    }
}

/// A named classical bit. Carries identity only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassicalBit {
    name: String,
}

impl ClassicalBit {
    /// The bit's name, e.g. `c[0]`.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Arena of logical qubits, classical bits and interaction edges.
#[derive(Debug, Clone, Default)]
pub struct InteractionGraph {
    qubits: Vec<LogicalQubit>,
    qubit_index: FxHashMap<String, LogicalId>,
    clbits: Vec<ClassicalBit>,
    clbit_index: FxHashMap<String, ClbitId>,
    edges: Vec<Edge>,
    /// Keyed by (smaller id, larger id).
    edge_index: FxHashMap<(LogicalId, LogicalId), EdgeId>,
}

impl InteractionGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the logical qubit called `name`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_qubit(&mut self, name: &str) -> LogicalId {
        if let Some(&id) = self.qubit_index.get(name) {
            return id;
        }
        let id = LogicalId(self.qubits.len() as u32);
        self.qubits.push(LogicalQubit {
            name: name.to_string(),
            edges: Vec::new(),
            usage: 0,
        });
        self.qubit_index.insert(name.to_string(), id);
        id
    }

    /// Get or create the classical bit called `name`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_classical_bit(&mut self, name: &str) -> ClbitId {
        if let Some(&id) = self.clbit_index.get(name) {
            return id;
        }
        let id = ClbitId(self.clbits.len() as u32);
        self.clbits.push(ClassicalBit {
            name: name.to_string(),
        });
        self.clbit_index.insert(name.to_string(), id);
        id
    }

    /// Record a two-qubit interaction between the qubits named `a` and `b`.
    ///
    /// Unknown names are created on the fly.
    pub fn record_interaction(&mut self, a: &str, b: &str) -> MapResult<EdgeId> {
        if a == b {
            return Err(MapError::SelfInteraction {
                phase: Phase::Collection,
                name: a.to_string(),
            });
        }
        let a = self.add_qubit(a);
        let b = self.add_qubit(b);
        self.record_interaction_ids(a, b)
    }

    /// Record a two-qubit interaction between two existing qubits.
    #[allow(clippy::cast_possible_truncation)]
    pub fn record_interaction_ids(&mut self, a: LogicalId, b: LogicalId) -> MapResult<EdgeId> {
        for id in [a, b] {
            if id.0 as usize >= self.qubits.len() {
                return Err(MapError::UnknownQubit {
                    phase: Phase::Collection,
                    name: id.to_string(),
                });
            }
        }
        if a == b {
            return Err(MapError::SelfInteraction {
                phase: Phase::Collection,
                name: self.qubits[a.0 as usize].name.clone(),
            });
        }

        let key = if a < b { (a, b) } else { (b, a) };
        if let Some(&edge_id) = self.edge_index.get(&key) {
            self.reinforce(edge_id);
            return Ok(edge_id);
        }

        let edge_id = EdgeId(self.edges.len() as u32);
        self.edges.push(Edge {
            endpoints: (a, b),
            weight: INITIAL_EDGE_WEIGHT,
            baseline: self.combined_usage(a, b),
        });
        self.edge_index.insert(key, edge_id);
        self.qubits[a.0 as usize].edges.push(edge_id);
        self.qubits[b.0 as usize].edges.push(edge_id);
        trace!(
            "new edge {} - {}",
            self.qubits[a.0 as usize].name,
            self.qubits[b.0 as usize].name
        );
        Ok(edge_id)
    }

    fn reinforce(&mut self, edge_id: EdgeId) {
        let (a, b) = self.edges[edge_id.0 as usize].endpoints;
        let now = self.combined_usage(a, b);

        let edge = &mut self.edges[edge_id.0 as usize];
        let intervening = now.saturating_sub(edge.baseline);
        edge.weight += WEIGHT_INCREMENT / (1.0 + f64::from(intervening));

        self.qubits[a.0 as usize].usage += 1;
        self.qubits[b.0 as usize].usage += 1;
        let updated = self.combined_usage(a, b);

        let edge = &mut self.edges[edge_id.0 as usize];
        edge.baseline = updated;
        trace!("edge {:?} reinforced to {:.4}", edge_id, edge.weight);
    }

    fn combined_usage(&self, a: LogicalId, b: LogicalId) -> u32 {
        self.qubits[a.0 as usize].usage + self.qubits[b.0 as usize].usage
    }

    /// Look up a logical qubit by id.
    pub fn qubit(&self, id: LogicalId) -> Option<&LogicalQubit> {
        self.qubits.get(id.0 as usize)
    }

    /// Look up a logical qubit id by name.
    pub fn qubit_id(&self, name: &str) -> Option<LogicalId> {
        self.qubit_index.get(name).copied()
    }

    /// Name of a logical qubit, or its id rendering if unknown.
    pub fn name_of(&self, id: LogicalId) -> String {
        self.qubit(id).map_or_else(|| id.to_string(), |q| q.name.clone())
    }

    /// All logical qubits in creation order.
    #[allow(clippy::cast_possible_truncation)]
    pub fn qubits(&self) -> impl Iterator<Item = (LogicalId, &LogicalQubit)> + '_ {
        self.qubits
            .iter()
            .enumerate()
            .map(|(i, q)| (LogicalId(i as u32), q))
    }

    /// Look up a classical bit id by name.
    pub fn classical_bit_id(&self, name: &str) -> Option<ClbitId> {
        self.clbit_index.get(name).copied()
    }

    /// Look up a classical bit by id.
    pub fn classical_bit(&self, id: ClbitId) -> Option<&ClassicalBit> {
        self.clbits.get(id.0 as usize)
    }

    /// Look up an edge by id.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0 as usize)
    }

    /// The edge between `a` and `b`, in either order.
    pub fn edge_between(&self, a: LogicalId, b: LogicalId) -> Option<&Edge> {
        let key = if a < b { (a, b) } else { (b, a) };
        self.edge_index
            .get(&key)
            .and_then(|&id| self.edges.get(id.0 as usize))
    }

    /// All edges in creation order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter()
    }

    /// Interaction partners of `qubit` with the connecting weight.
    pub fn neighbors(&self, qubit: LogicalId) -> impl Iterator<Item = (LogicalId, f64)> + '_ {
        self.qubit(qubit)
            .map(|q| q.edges.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(move |&id| {
                let edge = &self.edges[id.0 as usize];
                edge.other(qubit).map(|other| (other, edge.weight))
            })
    }

    /// Sum of the weights of all edges incident to `qubit`.
    pub fn total_weight(&self, qubit: LogicalId) -> f64 {
        self.neighbors(qubit).map(|(_, w)| w).sum()
    }

    /// Whether `qubit` has at least one interaction.
    pub fn has_edges(&self, qubit: LogicalId) -> bool {
        self.qubit(qubit).is_some_and(|q| !q.edges.is_empty())
    }

    /// Number of logical qubits.
    pub fn qubit_count(&self) -> usize {
        self.qubits.len()
    }

    /// Number of classical bits.
    pub fn classical_bit_count(&self) -> usize {
        self.clbits.len()
    }

    /// Number of distinct interaction edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
