//! UE Context Release procedure
//!
//! Per 3GPP TS 38.473 Sections 8.3.2 - 8.3.3. The release can be initiated
//! by the CU (RELEASE COMMAND / RELEASE COMPLETE) or requested by the DU
//! (RELEASE REQUEST, which the CU answers with its own RELEASE COMMAND).

use crate::ids::{Cause, GnbCuUeF1apId, GnbDuUeF1apId, SrbId};
use f1cu_common::OctetString;

/// UE CONTEXT RELEASE REQUEST (DU -> CU).
#[derive(Debug, Clone, PartialEq)]
pub struct UeContextReleaseRequest {
    /// CU-assigned UE id
    pub gnb_cu_ue_f1ap_id: GnbCuUeF1apId,
    /// DU-assigned UE id
    pub gnb_du_ue_f1ap_id: GnbDuUeF1apId,
    /// Why the DU wants the context released
    pub cause: Cause,
}

/// UE CONTEXT RELEASE COMMAND (CU -> DU).
#[derive(Debug, Clone, PartialEq)]
pub struct UeContextReleaseCommand {
    /// CU-assigned UE id
    pub gnb_cu_ue_f1ap_id: GnbCuUeF1apId,
    /// DU-assigned UE id
    pub gnb_du_ue_f1ap_id: GnbDuUeF1apId,
    /// Release cause
    pub cause: Cause,
    /// Final RRC message to deliver before release (e.g. RRC Release)
    pub rrc_container: Option<OctetString>,
    /// Bearer for the final RRC message
    pub srb_id: Option<SrbId>,
}

/// UE CONTEXT RELEASE COMPLETE (DU -> CU).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UeContextReleaseComplete {
    /// CU-assigned UE id
    pub gnb_cu_ue_f1ap_id: GnbCuUeF1apId,
    /// DU-assigned UE id
    pub gnb_du_ue_f1ap_id: GnbDuUeF1apId,
}
