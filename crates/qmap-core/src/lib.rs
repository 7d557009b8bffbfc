//! qmap Placement and Routing Core
//!
//! This crate maps a circuit over logical qubits onto a device whose
//! qubits can only interact along the edges of a fixed adjacency graph.
//! It consumes the circuit twice:
//!
//! 1. **Collection**: every two-qubit operation is recorded in a weighted
//!    [`InteractionGraph`]. Repeated interactions strengthen their edge.
//! 2. **Placement**: [`InitialPlacement`] assigns each logical qubit a
//!    physical qubit, growing outward from a well-connected starting
//!    position so that strongly interacting qubits land close together.
//! 3. **Routing**: before each two-qubit operation, the [`Router`] walks one
//!    operand along a shortest path with SWAPs until both are adjacent.
//!
//! # Architecture
//!
//! ```text
//! front-end pass            back-end pass
//!       │                         │
//!       ▼                         ▼
//! ┌──────────────────────────────────────┐
//! │ Mapper                               │
//! │   InteractionGraph ──► InitialPlacement ──► Layout
//! │                                      │        │
//! │   Router (MoverPolicy, MeetingPolicy) ◄──────┘
//! └──────────────────────────────────────┘
//!       │
//!       ▼
//!   Topology (immutable, shared)
//! ```
//!
//! # Example
//!
//! ```rust
//! use qmap_core::{Mapper, Topology};
//!
//! let topology = Topology::linear(5);
//! let mut mapper = Mapper::new(&topology);
//!
//! // First pass
//! for name in ["q[0]", "q[1]", "q[2]"] {
//!     mapper.add_qubit(name);
//! }
//! mapper.record_interaction("q[0]", "q[1]").unwrap();
//! mapper.record_interaction("q[1]", "q[2]").unwrap();
//! mapper.record_interaction("q[0]", "q[2]").unwrap();
//!
//! mapper.place().unwrap();
//!
//! // Second pass
//! for (a, b) in [("q[0]", "q[1]"), ("q[1]", "q[2]"), ("q[0]", "q[2]")] {
//!     for swap in mapper.route_adjacent(a, b).unwrap() {
//!         println!("swap {swap};");
//!     }
//!     let pa = mapper.resolve_physical(a).unwrap();
//!     let pb = mapper.resolve_physical(b).unwrap();
//!     assert!(topology.is_adjacent(pa, pb));
//! }
//!
//! println!("{} swaps", mapper.metrics().swaps);
//! ```
//!
//! # Routing Policies
//!
//! - [`DistanceToCenter`] (default): the qubit farther from the topology
//!   center moves.
//! - [`LessConnected`]: the qubit with less total interaction weight moves.
//! - [`PathTruncation`] (default): the anchor stays, the mover walks up to it.
//! - [`BestEdgeScore`]: both may move; the meeting point keeps the most
//!   interaction weight on adjacent pairs.

pub mod config;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod mapper;
pub mod metrics;
pub mod pathfinding;
pub mod placement;
pub mod policy;
pub mod router;
pub mod topology;

pub use config::{MAX_FULL_QUBITS, MAX_PRESET_QUBITS, MapperConfig, TopologySpec};
pub use error::{MapError, MapResult, Phase};
pub use interaction::{
    ClassicalBit, ClbitId, Edge, EdgeId, INITIAL_EDGE_WEIGHT, InteractionGraph, LogicalId,
    LogicalQubit,
};
pub use layout::Layout;
pub use mapper::Mapper;
pub use metrics::MappingMetrics;
pub use placement::{InitialPlacement, PlacementOptions};
pub use policy::{
    BestEdgeScore, DistanceToCenter, LessConnected, MeetingPolicy, MeetingStrategy, MoverPolicy,
    MoverStrategy, PathTruncation, RoutingContext,
};
pub use router::{Router, SwapPair};
pub use topology::{PHYSICAL_REGISTER, Topology, physical_label};
