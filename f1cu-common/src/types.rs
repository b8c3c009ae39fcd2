//! Shared opaque handles
//!
//! Indexes into registries owned by the CU-CP proper. The F1AP layer never
//! interprets them; it only carries them between collaborators.

use std::fmt;

/// Handle into the CU-CP's UE registry.
///
/// Allocated by the session registry collaborator, not by the F1AP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UeIndex(u32);

impl UeIndex {
    /// Creates a UE index from its raw value.
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for UeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ue={}", self.0)
    }
}

/// Handle naming a DU association within the CU-CP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DuIndex(u16);

impl DuIndex {
    /// Creates a DU index from its raw value.
    pub fn new(value: u16) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for DuIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "du={}", self.0)
    }
}
