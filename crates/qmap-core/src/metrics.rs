//! Counters reported after mapping a circuit.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Mapping statistics of one circuit, or the sum over several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingMetrics {
    /// Logical qubits placed.
    pub logical_qubits: usize,
    /// Two-qubit operations routed.
    pub two_qubit_ops: usize,
    /// SWAPs inserted by the router.
    pub swaps: usize,
}

impl MappingMetrics {
    /// Average SWAPs per routed two-qubit operation.
    #[allow(clippy::cast_precision_loss)]
    pub fn swaps_per_op(&self) -> f64 {
        if self.two_qubit_ops == 0 {
            0.0
        } else {
            self.swaps as f64 / self.two_qubit_ops as f64
        }
    }
}

impl Add for MappingMetrics {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for MappingMetrics {
    fn add_assign(&mut self, rhs: Self) {
        self.logical_qubits += rhs.logical_qubits;
        self.two_qubit_ops += rhs.two_qubit_ops;
        self.swaps += rhs.swaps;
    }
}

impl Sum for MappingMetrics {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}
