//! Paging procedure
//!
//! Per 3GPP TS 38.473 Section 8.7. Non-UE-associated downlink message
//! telling the DU to page a UE in the listed cells.

use crate::ids::NrCgi;
use f1cu_common::OctetString;

/// Paging DRX cycle length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingDrx {
    /// 32 radio frames
    V32,
    /// 64 radio frames
    V64,
    /// 128 radio frames
    V128,
    /// 256 radio frames
    V256,
}

/// PAGING (CU -> DU).
#[derive(Debug, Clone, PartialEq)]
pub struct Paging {
    /// UE identity index value used to compute the paging frame
    pub ue_identity_index: u64,
    /// Paging identity (5G-S-TMSI or I-RNTI), opaque here
    pub paging_identity: OctetString,
    /// DRX cycle, if signalled
    pub paging_drx: Option<PagingDrx>,
    /// Cells to page in
    pub paging_cells: Vec<NrCgi>,
}
