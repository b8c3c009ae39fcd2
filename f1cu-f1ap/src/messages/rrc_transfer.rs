//! RRC message transfer procedures
//!
//! Covers INITIAL UL RRC MESSAGE TRANSFER (new-UE announcement), UL RRC
//! MESSAGE TRANSFER and DL RRC MESSAGE TRANSFER, per 3GPP TS 38.473
//! Sections 8.4.1 - 8.4.3.

use crate::ids::{GnbCuUeF1apId, GnbDuUeF1apId, NrCgi, SrbId};
use f1cu_common::OctetString;

/// INITIAL UL RRC MESSAGE TRANSFER (DU -> CU).
///
/// First uplink message for a UE; carries only the DU-assigned id because
/// the CU has not named the UE yet.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialUlRrcMessageTransfer {
    /// DU-assigned UE id
    pub gnb_du_ue_f1ap_id: GnbDuUeF1apId,
    /// Cell the UE accessed
    pub nr_cgi: NrCgi,
    /// C-RNTI allocated by the DU
    pub c_rnti: u16,
    /// UL CCCH RRC container
    pub rrc_container: OctetString,
    /// Mandatory DU-to-CU container (cell group config)
    pub du_to_cu_rrc_container: Option<OctetString>,
    /// Present when the UE continues a previous connection: the RRC setup
    /// complete goes straight to SRB1 instead of the first-contact path.
    pub rrc_container_rrc_setup_complete: Option<OctetString>,
}

/// UL RRC MESSAGE TRANSFER (DU -> CU).
#[derive(Debug, Clone, PartialEq)]
pub struct UlRrcMessageTransfer {
    /// CU-assigned UE id
    pub gnb_cu_ue_f1ap_id: GnbCuUeF1apId,
    /// DU-assigned UE id
    pub gnb_du_ue_f1ap_id: GnbDuUeF1apId,
    /// Bearer the message arrived on
    pub srb_id: SrbId,
    /// UL DCCH RRC container
    pub rrc_container: OctetString,
}

/// DL RRC MESSAGE TRANSFER (CU -> DU).
#[derive(Debug, Clone, PartialEq)]
pub struct DlRrcMessageTransfer {
    /// CU-assigned UE id
    pub gnb_cu_ue_f1ap_id: GnbCuUeF1apId,
    /// DU-assigned UE id
    pub gnb_du_ue_f1ap_id: GnbDuUeF1apId,
    /// Previous DU-assigned id, included once after an RRC reestablishment
    /// in the same DU (TS 38.401 Section 8.7).
    pub old_gnb_du_ue_f1ap_id: Option<GnbDuUeF1apId>,
    /// Target bearer
    pub srb_id: SrbId,
    /// DL RRC container
    pub rrc_container: OctetString,
}
