//! Collaborator interfaces
//!
//! The F1AP engine never talks to the transport, the CU-CP's UE registry or
//! the RRC layer directly; it goes through the notifier traits below. All
//! of them are wired at construction time - the engine cannot be built with
//! a collaborator missing.

use std::sync::Arc;

use f1cu_common::{DuIndex, OctetString, UeIndex};
use f1cu_f1ap::ids::{Cause, NrCgi, SrbId};
use f1cu_f1ap::messages::F1SetupRequest;
use f1cu_f1ap::F1apPdu;

/// Wire-facing notifier: hands a fully built PDU to the transport/codec
/// layer. Fire-and-forget; delivery is the transport's problem.
pub trait F1apMessageNotifier: Send + Sync {
    /// Called with every outbound F1AP PDU.
    fn on_new_pdu(&self, pdu: F1apPdu);
}

/// Parameters passed to the session registry when a new UE announces itself.
#[derive(Debug, Clone)]
pub struct UeCreationRequest {
    /// UE index previously obtained from `on_new_ue_index_required`
    pub ue_index: UeIndex,
    /// C-RNTI allocated by the DU
    pub c_rnti: u16,
    /// Cell the UE accessed
    pub cgi: NrCgi,
    /// DU-to-CU container carried in the initial uplink message
    pub du_to_cu_rrc_container: OctetString,
}

/// DU-initiated release request forwarded to the owning CU-CP.
#[derive(Debug, Clone)]
pub struct UeReleaseRequestInfo {
    /// UE the DU wants released
    pub ue_index: UeIndex,
    /// Cause reported by the DU
    pub cause: Cause,
}

/// Session registry interface of the owning CU-CP.
pub trait DuProcessorNotifier: Send + Sync {
    /// Forwards an F1 SETUP REQUEST for acceptance or rejection. The owner
    /// answers asynchronously through `F1apCu::notify_f1_setup_result`.
    fn on_f1_setup_request(&self, request: F1SetupRequest);

    /// Asks for a free UE index; `None` means the registry is full and the
    /// triggering uplink message is dropped.
    fn on_new_ue_index_required(&self) -> Option<UeIndex>;

    /// Admits a UE and returns its RRC sink, or `None` if admission failed.
    fn on_create_ue(&self, request: UeCreationRequest) -> Option<Arc<dyn RrcSink>>;

    /// Forwards a DU-initiated UE context release request.
    fn on_du_initiated_release_request(&self, request: UeReleaseRequestInfo);

    /// Index of the DU association this protocol instance serves.
    fn du_index(&self) -> DuIndex;
}

/// Peer-management interface used to tear down a whole DU association.
pub trait DuManagementNotifier: Send + Sync {
    /// Requests removal of the DU and every UE under it.
    fn on_du_remove_request(&self, du_index: DuIndex);
}

/// Per-UE RRC delivery interface, obtained from the session registry at
/// admission.
pub trait RrcSink: Send + Sync {
    /// Delivers the very first uplink payload for a UE (UL CCCH).
    fn on_ul_ccch_pdu(&self, pdu: OctetString);

    /// Delivers an uplink payload on an established signalling bearer.
    fn on_ul_dcch_pdu(&self, srb_id: SrbId, pdu: OctetString);
}
