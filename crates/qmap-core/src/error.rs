//! Error types for the mapping core.

use std::fmt;

use thiserror::Error;

use crate::interaction::LogicalId;

/// The phase of a compilation in which an error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// First pass: building the interaction graph.
    Collection,
    /// Topology construction and validation.
    Topology,
    /// One-shot initial placement.
    Placement,
    /// On-demand adjacency enforcement.
    Routing,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Collection => "collection",
            Phase::Topology => "topology",
            Phase::Placement => "placement",
            Phase::Routing => "routing",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while placing and routing logical qubits.
///
/// Every variant is fatal for the circuit being compiled.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MapError {
    /// A logical qubit has no physical assignment.
    #[error("[{phase}] logical qubit '{name}' ({qubit}) has no physical assignment")]
    Unplaced {
        phase: Phase,
        qubit: LogicalId,
        name: String,
    },

    /// Nearest-free search exhausted the topology.
    #[error("[{phase}] no free physical qubit reachable from Q[{from}]")]
    NoFreeQubit { phase: Phase, from: u32 },

    /// Every physical qubit is occupied.
    #[error("[{phase}] cannot place {qubit}: all {available} physical qubits are occupied")]
    TopologyExhausted {
        phase: Phase,
        qubit: LogicalId,
        available: usize,
    },

    /// No path exists between two physical qubits.
    #[error("[{phase}] no path from Q[{from}] to Q[{to}]")]
    Unreachable { phase: Phase, from: u32, to: u32 },

    /// The topology has no qubits, so it has no center.
    #[error("[{phase}] topology has no physical qubits")]
    EmptyTopology { phase: Phase },

    /// Seed selection needs at least one interaction edge.
    #[error("[placement] interaction graph over {qubits} qubits has no interactions")]
    NoInteractions { qubits: usize },

    /// An interaction of a qubit with itself.
    #[error("[{phase}] qubit '{name}' cannot interact with itself")]
    SelfInteraction { phase: Phase, name: String },

    /// A logical qubit name that was never declared.
    #[error("[{phase}] unknown logical qubit '{name}'")]
    UnknownQubit { phase: Phase, name: String },

    /// A physical qubit id that is not part of the topology.
    #[error("[{phase}] physical qubit Q[{qubit}] is not part of the topology")]
    UnknownPhysical { phase: Phase, qubit: u32 },

    /// The topology graph is not connected.
    #[error("[topology] topology is not connected ({components} components)")]
    DisconnectedTopology { components: usize },

    /// Malformed topology description.
    #[error("[topology] invalid topology: {0}")]
    InvalidTopology(String),

    /// Routing or resolution requested before placement.
    #[error("[{phase}] placement has not run yet")]
    NotPlaced { phase: Phase },

    /// Interaction recorded after placement froze the graph.
    #[error("[collection] interaction '{a}' - '{b}' recorded after placement")]
    GraphFrozen { a: String, b: String },
}

/// Result type for mapping operations.
pub type MapResult<T> = Result<T, MapError>;
