//! UE Context Modification procedure
//!
//! Per 3GPP TS 38.473 Section 8.3.4. Same request/response shape as setup,
//! applied to an existing UE context.

use crate::ids::{Cause, DrbId, GnbCuUeF1apId, GnbDuUeF1apId};
use crate::messages::ue_context_setup::{DrbFailedItem, DrbToSetupItem, SrbToSetupItem};
use f1cu_common::OctetString;

/// UE CONTEXT MODIFICATION REQUEST (CU -> DU).
#[derive(Debug, Clone, PartialEq)]
pub struct UeContextModificationRequest {
    /// CU-assigned UE id
    pub gnb_cu_ue_f1ap_id: GnbCuUeF1apId,
    /// DU-assigned UE id
    pub gnb_du_ue_f1ap_id: GnbDuUeF1apId,
    /// SRBs to add or modify
    pub srbs_to_setup: Vec<SrbToSetupItem>,
    /// DRBs to add or modify
    pub drbs_to_setup: Vec<DrbToSetupItem>,
    /// DRBs to release
    pub drbs_to_release: Vec<DrbId>,
    /// RRC container to deliver alongside the modification
    pub rrc_container: Option<OctetString>,
}

/// UE CONTEXT MODIFICATION RESPONSE (DU -> CU).
#[derive(Debug, Clone, PartialEq)]
pub struct UeContextModificationResponse {
    /// CU-assigned UE id
    pub gnb_cu_ue_f1ap_id: GnbCuUeF1apId,
    /// DU-assigned UE id
    pub gnb_du_ue_f1ap_id: GnbDuUeF1apId,
    /// DU-to-CU container when the cell group config changed
    pub du_to_cu_rrc_container: Option<OctetString>,
    /// DRBs modified or added
    pub drbs_setup: Vec<DrbId>,
    /// DRBs the DU failed to modify
    pub drbs_failed: Vec<DrbFailedItem>,
}

/// UE CONTEXT MODIFICATION FAILURE (DU -> CU).
#[derive(Debug, Clone, PartialEq)]
pub struct UeContextModificationFailure {
    /// CU-assigned UE id
    pub gnb_cu_ue_f1ap_id: GnbCuUeF1apId,
    /// DU-assigned UE id, when known
    pub gnb_du_ue_f1ap_id: Option<GnbDuUeF1apId>,
    /// Rejection cause
    pub cause: Cause,
}
