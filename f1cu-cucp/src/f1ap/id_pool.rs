//! CU UE F1AP identifier pool
//!
//! The CU-assigned UE id is visible to the DU and must never name two live
//! UEs at once. The pool is bounded by the configured maximum UE count and
//! always hands out the lowest free id.

use std::collections::BTreeSet;

use f1cu_f1ap::ids::GnbCuUeF1apId;

/// Bounded allocator for `GnbCuUeF1apId` values.
#[derive(Debug)]
pub struct CuUeF1apIdPool {
    capacity: u64,
    in_use: BTreeSet<u64>,
}

impl CuUeF1apIdPool {
    /// Creates a pool handing out ids in `0..capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity as u64,
            in_use: BTreeSet::new(),
        }
    }

    /// Allocates the lowest free id, or `None` when every id is in use.
    pub fn allocate(&mut self) -> Option<GnbCuUeF1apId> {
        if self.in_use.len() as u64 >= self.capacity {
            return None;
        }
        // The pool is dense from 0, so the first gap is the answer.
        let mut candidate = 0u64;
        for used in &self.in_use {
            if *used != candidate {
                break;
            }
            candidate += 1;
        }
        debug_assert!(candidate < self.capacity);
        self.in_use.insert(candidate);
        Some(GnbCuUeF1apId(candidate))
    }

    /// Returns an id to the pool. Releasing an unassigned id is a no-op.
    pub fn release(&mut self, id: GnbCuUeF1apId) {
        self.in_use.remove(&id.0);
    }

    /// Number of ids currently assigned.
    pub fn len(&self) -> usize {
        self.in_use.len()
    }

    /// Returns true if no ids are assigned.
    pub fn is_empty(&self) -> bool {
        self.in_use.is_empty()
    }
}
