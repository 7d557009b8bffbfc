//! The mapping session: collect, place, route.

use tracing::{info, warn};

use crate::config::MapperConfig;
use crate::error::{MapError, MapResult, Phase};
use crate::interaction::{ClbitId, EdgeId, InteractionGraph, LogicalId};
use crate::layout::Layout;
use crate::metrics::MappingMetrics;
use crate::placement::InitialPlacement;
use crate::router::{Router, SwapPair};
use crate::topology::{Topology, physical_label};

/// Placement state, present once [`Mapper::place`] succeeded.
#[derive(Debug)]
struct Placed {
    initial: Layout,
    current: Layout,
}

/// One circuit's trip through the mapping core.
///
/// The session moves through two phases. While collecting, the first pass
/// declares qubits and records interactions. [`place`](Self::place) then
/// freezes the interaction graph and computes the initial layout; from then
/// on the second pass routes two-qubit operations and resolves names to
/// physical qubits.
///
/// The topology is borrowed so one device description serves many
/// circuits.
#[derive(Debug)]
pub struct Mapper<'t> {
    topology: &'t Topology,
    graph: InteractionGraph,
    placement: InitialPlacement,
    router: Router,
    placed: Option<Placed>,
    two_qubit_ops: usize,
    swaps: usize,
}

impl<'t> Mapper<'t> {
    /// Create a session with the default policies.
    pub fn new(topology: &'t Topology) -> Self {
        Self::with_config(topology, &MapperConfig::default())
    }

    /// Create a session with the placement and routing settings of
    /// `config`. The topology description in `config` is not consulted.
    pub fn with_config(topology: &'t Topology, config: &MapperConfig) -> Self {
        Self {
            topology,
            graph: InteractionGraph::new(),
            placement: InitialPlacement::new(config.placement),
            router: Router::from_strategies(config.mover, config.meeting),
            placed: None,
            two_qubit_ops: 0,
            swaps: 0,
        }
    }

    /// Declare a logical qubit. Repeated names return the existing id.
    ///
    /// Qubits first declared after placement stay unplaced.
    pub fn add_qubit(&mut self, name: &str) -> LogicalId {
        self.graph.add_qubit(name)
    }

    /// Declare a classical bit. Repeated names return the existing id.
    pub fn add_classical_bit(&mut self, name: &str) -> ClbitId {
        self.graph.add_classical_bit(name)
    }

    /// Record one two-qubit operation between `a` and `b`.
    pub fn record_interaction(&mut self, a: &str, b: &str) -> MapResult<EdgeId> {
        if self.placed.is_some() {
            return Err(MapError::GraphFrozen {
                a: a.to_string(),
                b: b.to_string(),
            });
        }
        self.graph.record_interaction(a, b)
    }

    /// Compute the initial layout.
    ///
    /// Calling this again keeps the existing layout.
    pub fn place(&mut self) -> MapResult<&Layout> {
        if self.placed.is_none() {
            let layout = self.placement.run(&self.graph, self.topology)?;
            info!(
                "Placed {} logical qubits on {} physical qubits",
                layout.len(),
                self.topology.num_qubits()
            );
            self.placed = Some(Placed {
                initial: layout.clone(),
                current: layout,
            });
        } else {
            warn!("Placement already ran, keeping the existing layout");
        }

        let placed = self.placed()?;
        Ok(&placed.current)
    }

    /// Make the qubits named `a` and `b` physically adjacent.
    ///
    /// Counts one two-qubit operation and returns the SWAPs to emit before
    /// it, in order.
    pub fn route_adjacent(&mut self, a: &str, b: &str) -> MapResult<Vec<SwapPair>> {
        let a = self.lookup(a, Phase::Routing)?;
        let b = self.lookup(b, Phase::Routing)?;
        let placed = self.placed.as_mut().ok_or(MapError::NotPlaced {
            phase: Phase::Routing,
        })?;

        let swaps = self.router.route_adjacent(
            &self.graph,
            self.topology,
            &mut placed.current,
            a,
            b,
        )?;
        self.two_qubit_ops += 1;
        self.swaps += swaps.len();
        Ok(swaps)
    }

    /// Current physical qubit of the logical qubit `name`.
    pub fn resolve_physical(&self, name: &str) -> MapResult<u32> {
        let id = self.lookup(name, Phase::Routing)?;
        let placed = self.placed()?;
        placed.current.physical(id).ok_or_else(|| MapError::Unplaced {
            phase: Phase::Routing,
            qubit: id,
            name: name.to_string(),
        })
    }

    /// Current physical qubit of `name`, rendered as `Q[id]`.
    pub fn resolve_label(&self, name: &str) -> MapResult<String> {
        self.resolve_physical(name).map(physical_label)
    }

    /// Counters so far.
    pub fn metrics(&self) -> MappingMetrics {
        MappingMetrics {
            logical_qubits: self.graph.qubit_count(),
            two_qubit_ops: self.two_qubit_ops,
            swaps: self.swaps,
        }
    }

    /// The interaction graph collected so far.
    pub fn graph(&self) -> &InteractionGraph {
        &self.graph
    }

    /// The target topology.
    pub fn topology(&self) -> &'t Topology {
        self.topology
    }

    /// The current layout, if placement ran.
    pub fn layout(&self) -> Option<&Layout> {
        self.placed.as_ref().map(|p| &p.current)
    }

    /// The layout as it was right after placement, before any routing.
    pub fn initial_layout(&self) -> Option<&Layout> {
        self.placed.as_ref().map(|p| &p.initial)
    }

    /// Whether placement ran.
    pub fn is_placed(&self) -> bool {
        self.placed.is_some()
    }

    fn placed(&self) -> MapResult<&Placed> {
        self.placed.as_ref().ok_or(MapError::NotPlaced {
            phase: Phase::Routing,
        })
    }

    fn lookup(&self, name: &str, phase: Phase) -> MapResult<LogicalId> {
        self.graph
            .qubit_id(name)
            .ok_or_else(|| MapError::UnknownQubit {
                phase,
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_ordering() {
        let topology = Topology::linear(5);
        let mut mapper = Mapper::new(&topology);
        mapper.add_qubit("a");
        mapper.add_qubit("b");
        mapper.record_interaction("a", "b").unwrap();

        assert!(matches!(
            mapper.route_adjacent("a", "b"),
            Err(MapError::NotPlaced { .. })
        ));
        assert!(matches!(
            mapper.resolve_physical("a"),
            Err(MapError::NotPlaced { .. })
        ));

        mapper.place().unwrap();
        assert!(mapper.is_placed());
        assert!(matches!(
            mapper.record_interaction("a", "b"),
            Err(MapError::GraphFrozen { .. })
        ));
    }

    #[test]
    fn test_route_counts_ops_and_swaps() {
        let topology = Topology::linear(5);
        let mut mapper = Mapper::new(&topology);
        for name in ["a", "b", "c"] {
            mapper.add_qubit(name);
        }
        mapper.record_interaction("a", "b").unwrap();
        mapper.record_interaction("b", "c").unwrap();
        mapper.record_interaction("a", "c").unwrap();
        mapper.place().unwrap();

        let mut total = 0;
        for (x, y) in [("a", "b"), ("b", "c"), ("a", "c")] {
            total += mapper.route_adjacent(x, y).unwrap().len();
            let px = mapper.resolve_physical(x).unwrap();
            let py = mapper.resolve_physical(y).unwrap();
            assert!(topology.is_adjacent(px, py));
        }

        let metrics = mapper.metrics();
        assert_eq!(metrics.logical_qubits, 3);
        assert_eq!(metrics.two_qubit_ops, 3);
        assert_eq!(metrics.swaps, total);
    }

    #[test]
    fn test_initial_layout_is_preserved() {
        let topology = Topology::linear(6);
        let mut mapper = Mapper::new(&topology);
        mapper.record_interaction("a", "b").unwrap();
        mapper.record_interaction("b", "c").unwrap();
        mapper.record_interaction("c", "d").unwrap();
        mapper.record_interaction("a", "d").unwrap();
        mapper.place().unwrap();
        let initial = mapper.initial_layout().cloned().unwrap();

        mapper.route_adjacent("a", "d").unwrap();
        assert_eq!(mapper.initial_layout(), Some(&initial));
    }

    #[test]
    fn test_unknown_name() {
        let topology = Topology::linear(3);
        let mut mapper = Mapper::new(&topology);
        mapper.add_qubit("a");
        mapper.place().unwrap();
        assert!(matches!(
            mapper.resolve_label("nope"),
            Err(MapError::UnknownQubit { .. })
        ));
        assert_eq!(mapper.resolve_label("a").unwrap(), "Q[0]");
    }

    #[test]
    fn test_place_twice_keeps_layout() {
        let topology = Topology::linear(4);
        let mut mapper = Mapper::new(&topology);
        mapper.record_interaction("a", "b").unwrap();
        let first = mapper.place().unwrap().clone();
        let second = mapper.place().unwrap().clone();
        assert_eq!(first, second);
    }
}
