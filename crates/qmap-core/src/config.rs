//! Mapper configuration.
//!
//! All types deserialize with defaults, so an empty YAML or JSON document
//! yields the stock setup: the 65-qubit heavy-hex target, distance-to-center
//! mover selection, path truncation and permissive isolated placement.

use serde::{Deserialize, Serialize};

use crate::error::{MapError, MapResult};
use crate::placement::PlacementOptions;
use crate::policy::{MeetingStrategy, MoverStrategy};
use crate::topology::Topology;

/// Largest qubit count accepted for the linear, ring, star and grid presets.
pub const MAX_PRESET_QUBITS: u32 = 4096;

/// Largest qubit count accepted for the all-to-all preset, whose edge count
/// grows quadratically.
pub const MAX_FULL_QUBITS: u32 = 256;

/// Complete configuration of a [`Mapper`](crate::Mapper) session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Target device.
    pub topology: TopologySpec,

    /// Initial placement settings.
    pub placement: PlacementOptions,

    /// Which qubit moves during routing.
    pub mover: MoverStrategy,

    /// Where routed qubits meet.
    pub meeting: MeetingStrategy,
}

/// Serializable description of a hardware topology.
///
/// ```yaml
/// kind: custom
/// edges: [[0, 1], [1, 2], [2, 3]]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopologySpec {
    /// The 65-qubit heavy-hex lattice.
    #[default]
    #[serde(rename = "heavy_hex_65")]
    HeavyHex65,
    /// A path of `qubits` qubits.
    Linear { qubits: u32 },
    /// A cycle of `qubits` qubits.
    Ring { qubits: u32 },
    /// A `rows` x `cols` grid.
    Grid { rows: u32, cols: u32 },
    /// Qubit 0 connected to every other qubit.
    Star { qubits: u32 },
    /// All-to-all connectivity.
    Full { qubits: u32 },
    /// Explicit adjacency pairs. Qubit ids default to the ids named by
    /// `edges`, in ascending order.
    Custom {
        #[serde(default)]
        qubits: Option<Vec<u32>>,
        edges: Vec<[u32; 2]>,
    },
}

impl TopologySpec {
    /// Build and validate the topology.
    pub fn build(&self) -> MapResult<Topology> {
        let preset_size = match self {
            TopologySpec::Linear { qubits }
            | TopologySpec::Ring { qubits }
            | TopologySpec::Star { qubits } => Some((*qubits, MAX_PRESET_QUBITS)),
            TopologySpec::Full { qubits } => Some((*qubits, MAX_FULL_QUBITS)),
            TopologySpec::Grid { rows, cols } => {
                let size = rows.checked_mul(*cols).ok_or_else(|| {
                    MapError::InvalidTopology(format!("grid {rows}x{cols} is too large"))
                })?;
                Some((size, MAX_PRESET_QUBITS))
            }
            TopologySpec::HeavyHex65 | TopologySpec::Custom { .. } => None,
        };
        match preset_size {
            Some((0, _)) => {
                return Err(MapError::InvalidTopology(
                    "topology needs at least one qubit".to_string(),
                ));
            }
            Some((size, max)) if size > max => {
                return Err(MapError::InvalidTopology(format!(
                    "{size} qubits exceeds the limit of {max} for this topology"
                )));
            }
            _ => {}
        }

        let topology = match self {
            TopologySpec::HeavyHex65 => Topology::heavy_hex_65(),
            TopologySpec::Linear { qubits } => Topology::linear(*qubits),
            TopologySpec::Ring { qubits } => Topology::ring(*qubits),
            TopologySpec::Grid { rows, cols } => Topology::grid(*rows, *cols),
            TopologySpec::Star { qubits } => Topology::star(*qubits),
            TopologySpec::Full { qubits } => Topology::full(*qubits),
            TopologySpec::Custom { qubits, edges } => {
                let ids = match qubits {
                    Some(ids) => ids.clone(),
                    None => {
                        let mut ids: Vec<u32> = edges.iter().flatten().copied().collect();
                        ids.sort_unstable();
                        ids.dedup();
                        ids
                    }
                };
                if ids.is_empty() {
                    return Err(MapError::InvalidTopology(
                        "custom topology names no qubits".to_string(),
                    ));
                }
                Topology::from_edges(ids, edges.iter().map(|&[a, b]| (a, b)))?
            }
        };
        Ok(topology)
    }
}
