//! Logical-to-physical qubit assignment.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::interaction::LogicalId;

/// A mapping from logical qubits to physical qubits.
///
/// Both directions are stored and updated together, so the assignment is
/// injective at all times. A physical qubit is occupied exactly when the
/// reverse map has an entry for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Map from logical qubit to physical qubit index.
    logical_to_physical: FxHashMap<LogicalId, u32>,
    /// Map from physical qubit index to logical qubit.
    physical_to_logical: FxHashMap<u32, LogicalId>,
}

impl Layout {
    /// Create a new empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `logical` to `physical`.
    ///
    /// If the physical qubit is already held by a different logical qubit,
    /// or the logical qubit already sits elsewhere, the stale entries are
    /// dropped to keep both maps consistent.
    pub fn assign(&mut self, logical: LogicalId, physical: u32) {
        if let Some(&old_logical) = self.physical_to_logical.get(&physical) {
            if old_logical != logical {
                self.logical_to_physical.remove(&old_logical);
            }
        }
        if let Some(&old_physical) = self.logical_to_physical.get(&logical) {
            if old_physical != physical {
                self.physical_to_logical.remove(&old_physical);
            }
        }
        self.logical_to_physical.insert(logical, physical);
        self.physical_to_logical.insert(physical, logical);
    }

    /// Get the physical qubit for a logical qubit.
    pub fn physical(&self, logical: LogicalId) -> Option<u32> {
        self.logical_to_physical.get(&logical).copied()
    }

    /// Get the logical qubit occupying a physical qubit.
    pub fn logical(&self, physical: u32) -> Option<LogicalId> {
        self.physical_to_logical.get(&physical).copied()
    }

    /// Whether some logical qubit occupies `physical`.
    #[inline]
    pub fn is_occupied(&self, physical: u32) -> bool {
        self.physical_to_logical.contains_key(&physical)
    }

    /// Whether `logical` has a physical assignment.
    #[inline]
    pub fn is_placed(&self, logical: LogicalId) -> bool {
        self.logical_to_physical.contains_key(&logical)
    }

    /// Exchange the occupants of two physical qubits.
    ///
    /// Either slot may be empty; an occupant next to an empty slot simply
    /// moves over.
    pub fn swap(&mut self, p1: u32, p2: u32) {
        let l1 = self.physical_to_logical.remove(&p1);
        let l2 = self.physical_to_logical.remove(&p2);

        if let Some(l1) = l1 {
            self.logical_to_physical.insert(l1, p2);
            self.physical_to_logical.insert(p2, l1);
        }

        if let Some(l2) = l2 {
            self.logical_to_physical.insert(l2, p1);
            self.physical_to_logical.insert(p1, l2);
        }
    }

    /// Get the number of placed logical qubits.
    pub fn len(&self) -> usize {
        self.logical_to_physical.len()
    }

    /// Check if the layout is empty.
    pub fn is_empty(&self) -> bool {
        self.logical_to_physical.is_empty()
    }

    /// Iterate over (logical, physical) pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (LogicalId, u32)> + '_ {
        self.logical_to_physical.iter().map(|(&l, &p)| (l, p))
    }
}
