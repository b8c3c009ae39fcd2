//! UE Context Setup procedure
//!
//! Per 3GPP TS 38.473 Section 8.3.1. The CU requests establishment of a UE
//! context with SRBs/DRBs at the DU; the DU answers with a response listing
//! what it set up and what it failed, or with an outright failure.

use crate::ids::{Cause, DrbId, GnbCuUeF1apId, GnbDuUeF1apId, NrCgi, SrbId};
use f1cu_common::OctetString;

/// One SRB requested for setup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SrbToSetupItem {
    /// Bearer to establish
    pub srb_id: SrbId,
}

/// One DRB requested for setup.
#[derive(Debug, Clone, PartialEq)]
pub struct DrbToSetupItem {
    /// Bearer to establish
    pub drb_id: DrbId,
    /// 5QI of the mapped QoS flow
    pub five_qi: u16,
}

/// One bearer the DU failed to establish.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrbFailedItem {
    /// Bearer that failed
    pub drb_id: DrbId,
    /// Failure cause reported by the DU
    pub cause: Cause,
}

/// One SRB the DU failed to establish.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SrbFailedItem {
    /// Bearer that failed
    pub srb_id: SrbId,
    /// Failure cause reported by the DU
    pub cause: Cause,
}

/// UE CONTEXT SETUP REQUEST (CU -> DU).
#[derive(Debug, Clone, PartialEq)]
pub struct UeContextSetupRequest {
    /// CU-assigned UE id
    pub gnb_cu_ue_f1ap_id: GnbCuUeF1apId,
    /// DU-assigned UE id, absent for inter-DU setup
    pub gnb_du_ue_f1ap_id: Option<GnbDuUeF1apId>,
    /// Special cell for the UE
    pub sp_cell_id: NrCgi,
    /// SRBs to establish
    pub srbs_to_setup: Vec<SrbToSetupItem>,
    /// DRBs to establish
    pub drbs_to_setup: Vec<DrbToSetupItem>,
    /// RRC container to deliver alongside the setup
    pub rrc_container: Option<OctetString>,
}

/// UE CONTEXT SETUP RESPONSE (DU -> CU).
#[derive(Debug, Clone, PartialEq)]
pub struct UeContextSetupResponse {
    /// CU-assigned UE id
    pub gnb_cu_ue_f1ap_id: GnbCuUeF1apId,
    /// DU-assigned UE id; mandatory on the wire but modelled as optional so
    /// the CU can validate its presence instead of trusting the peer.
    pub gnb_du_ue_f1ap_id: Option<GnbDuUeF1apId>,
    /// DU-to-CU container (cell group config), mandatory for a valid setup
    pub du_to_cu_rrc_container: Option<OctetString>,
    /// DRBs the DU established
    pub drbs_setup: Vec<DrbId>,
    /// DRBs the DU failed to establish
    pub drbs_failed: Vec<DrbFailedItem>,
    /// SRBs the DU failed to establish
    pub srbs_failed: Vec<SrbFailedItem>,
    /// C-RNTI allocated at the DU, if changed
    pub c_rnti: Option<u16>,
}

/// UE CONTEXT SETUP FAILURE (DU -> CU).
#[derive(Debug, Clone, PartialEq)]
pub struct UeContextSetupFailure {
    /// CU-assigned UE id
    pub gnb_cu_ue_f1ap_id: GnbCuUeF1apId,
    /// DU-assigned UE id, when known
    pub gnb_du_ue_f1ap_id: Option<GnbDuUeF1apId>,
    /// Rejection cause
    pub cause: Cause,
}

impl UeContextSetupResponse {
    /// Returns true if any requested bearer failed to establish.
    pub fn has_failed_bearers(&self) -> bool {
        !self.drbs_failed.is_empty() || !self.srbs_failed.is_empty()
    }
}
