//! Gate cost model and per-circuit report.

use qmap_core::MappingMetrics;
use serde::{Deserialize, Serialize};

/// Cost assigned to each emitted operation.
///
/// The mapping core only counts SWAPs; how they weigh against other gates
/// is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModel {
    /// `rz`, a virtual gate on most devices.
    pub rz: u64,
    /// `x`.
    pub x: u64,
    /// `sx`.
    pub sx: u64,
    /// Any other single-qubit gate.
    pub single_qubit: u64,
    /// Any two-qubit gate other than `swap`.
    pub two_qubit: u64,
    /// `swap`, whether written in the source or inserted by routing.
    pub swap: u64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            rz: 0,
            x: 1,
            sx: 1,
            single_qubit: 1,
            two_qubit: 10,
            swap: 30,
        }
    }
}

impl CostModel {
    /// Cost of one application of gate `name` on `arity` qubits.
    pub fn gate_cost(&self, name: &str, arity: usize) -> u64 {
        match (name, arity) {
            ("swap", 2) => self.swap,
            (_, 2) => self.two_qubit,
            ("rz", _) => self.rz,
            ("x", _) => self.x,
            ("sx", _) => self.sx,
            _ => self.single_qubit,
        }
    }
}

/// Summary of one remapped circuit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemapReport {
    /// Counters from the mapping core.
    #[serde(flatten)]
    pub metrics: MappingMetrics,
    /// Total cost of the emitted circuit under the [`CostModel`] used.
    pub cost: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_costs() {
        let model = CostModel::default();
        assert_eq!(model.gate_cost("rz", 1), 0);
        assert_eq!(model.gate_cost("sx", 1), 1);
        assert_eq!(model.gate_cost("h", 1), 1);
        assert_eq!(model.gate_cost("cx", 2), 10);
        assert_eq!(model.gate_cost("cz", 2), 10);
        assert_eq!(model.gate_cost("swap", 2), 30);
    }

    #[test]
    fn test_partial_override() {
        let model: CostModel = serde_json::from_str(r#"{"two_qubit": 7}"#).unwrap();
        assert_eq!(model.two_qubit, 7);
        assert_eq!(model.swap, 30);
    }

    #[test]
    fn test_report_flattens_metrics() {
        let report = RemapReport {
            metrics: MappingMetrics {
                logical_qubits: 2,
                two_qubit_ops: 1,
                swaps: 0,
            },
            cost: 12,
        };
        let json = serde_json::to_value(report).unwrap();
        assert_eq!(json["logical_qubits"], 2);
        assert_eq!(json["cost"], 12);
    }
}
