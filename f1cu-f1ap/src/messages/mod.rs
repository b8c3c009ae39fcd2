//! F1AP messages
//!
//! One module per procedure family, plus the closed PDU enums that the
//! dispatcher matches on. Unknown procedure codes decode into the
//! `Unsupported` arms so that version skew never becomes fatal.

pub mod f1_setup;
pub mod paging;
pub mod rrc_transfer;
pub mod ue_context_modification;
pub mod ue_context_release;
pub mod ue_context_setup;

pub use f1_setup::*;
pub use paging::*;
pub use rrc_transfer::*;
pub use ue_context_modification::*;
pub use ue_context_release::*;
pub use ue_context_setup::*;

/// Top-level F1AP PDU, classified by message category.
#[derive(Debug, Clone, PartialEq)]
pub enum F1apPdu {
    /// Initiating message - starts a procedure
    InitiatingMessage(InitiatingMessage),
    /// Successful outcome - completes a procedure
    SuccessfulOutcome(SuccessfulOutcome),
    /// Unsuccessful outcome - completes a procedure with failure
    UnsuccessfulOutcome(UnsuccessfulOutcome),
}

/// Initiating messages handled by the CU-CP side of F1.
#[derive(Debug, Clone, PartialEq)]
pub enum InitiatingMessage {
    /// F1 SETUP REQUEST (DU -> CU)
    F1SetupRequest(F1SetupRequest),
    /// F1 REMOVAL REQUEST (DU -> CU)
    F1RemovalRequest(F1RemovalRequest),
    /// INITIAL UL RRC MESSAGE TRANSFER (DU -> CU, new UE)
    InitialUlRrcMessageTransfer(InitialUlRrcMessageTransfer),
    /// UL RRC MESSAGE TRANSFER (DU -> CU)
    UlRrcMessageTransfer(UlRrcMessageTransfer),
    /// DL RRC MESSAGE TRANSFER (CU -> DU)
    DlRrcMessageTransfer(DlRrcMessageTransfer),
    /// UE CONTEXT SETUP REQUEST (CU -> DU)
    UeContextSetupRequest(UeContextSetupRequest),
    /// UE CONTEXT MODIFICATION REQUEST (CU -> DU)
    UeContextModificationRequest(UeContextModificationRequest),
    /// UE CONTEXT RELEASE COMMAND (CU -> DU)
    UeContextReleaseCommand(UeContextReleaseCommand),
    /// UE CONTEXT RELEASE REQUEST (DU -> CU)
    UeContextReleaseRequest(UeContextReleaseRequest),
    /// PAGING (CU -> DU)
    Paging(Paging),
    /// Procedure code not known to this implementation
    Unsupported {
        /// Raw procedure code from the wire
        procedure_code: u8,
    },
}

/// Successful outcomes handled by the CU-CP side of F1.
#[derive(Debug, Clone, PartialEq)]
pub enum SuccessfulOutcome {
    /// F1 SETUP RESPONSE (CU -> DU)
    F1SetupResponse(F1SetupResponse),
    /// UE CONTEXT SETUP RESPONSE (DU -> CU)
    UeContextSetupResponse(UeContextSetupResponse),
    /// UE CONTEXT MODIFICATION RESPONSE (DU -> CU)
    UeContextModificationResponse(UeContextModificationResponse),
    /// UE CONTEXT RELEASE COMPLETE (DU -> CU)
    UeContextReleaseComplete(UeContextReleaseComplete),
    /// Procedure code not known to this implementation
    Unsupported {
        /// Raw procedure code from the wire
        procedure_code: u8,
    },
}

/// Unsuccessful outcomes handled by the CU-CP side of F1.
#[derive(Debug, Clone, PartialEq)]
pub enum UnsuccessfulOutcome {
    /// F1 SETUP FAILURE (CU -> DU)
    F1SetupFailure(F1SetupFailure),
    /// UE CONTEXT SETUP FAILURE (DU -> CU)
    UeContextSetupFailure(UeContextSetupFailure),
    /// UE CONTEXT MODIFICATION FAILURE (DU -> CU)
    UeContextModificationFailure(UeContextModificationFailure),
    /// Procedure code not known to this implementation
    Unsupported {
        /// Raw procedure code from the wire
        procedure_code: u8,
    },
}

impl F1apPdu {
    /// Short human-readable name of the PDU type, for protocol logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            F1apPdu::InitiatingMessage(_) => "InitiatingMessage",
            F1apPdu::SuccessfulOutcome(_) => "SuccessfulOutcome",
            F1apPdu::UnsuccessfulOutcome(_) => "UnsuccessfulOutcome",
        }
    }
}
