//! F1 Setup and F1 Removal procedures
//!
//! F1 Setup is the non-UE-associated transaction that establishes the DU
//! association, per 3GPP TS 38.473 Section 8.2.3. The transaction id from
//! the request must be echoed verbatim in the response or failure.

use crate::ids::{Cause, NrCgi, TransactionId};

/// One cell served by the DU, announced during F1 Setup.
#[derive(Debug, Clone, PartialEq)]
pub struct ServedCellItem {
    /// Cell global identity
    pub nr_cgi: NrCgi,
    /// Physical cell id
    pub nr_pci: u16,
    /// Tracking area code
    pub tac: u32,
}

/// F1 SETUP REQUEST (DU -> CU).
#[derive(Debug, Clone, PartialEq)]
pub struct F1SetupRequest {
    /// Transaction identifier, echoed in the outcome
    pub transaction_id: TransactionId,
    /// gNB-DU identifier
    pub gnb_du_id: u64,
    /// Human-readable DU name
    pub gnb_du_name: Option<String>,
    /// Cells served by this DU
    pub served_cells: Vec<ServedCellItem>,
}

/// F1 SETUP RESPONSE (CU -> DU).
#[derive(Debug, Clone, PartialEq)]
pub struct F1SetupResponse {
    /// Transaction identifier from the request
    pub transaction_id: TransactionId,
    /// Human-readable CU name
    pub gnb_cu_name: Option<String>,
    /// Cells the CU activates at the DU
    pub cells_to_activate: Vec<NrCgi>,
}

/// F1 SETUP FAILURE (CU -> DU).
#[derive(Debug, Clone, PartialEq)]
pub struct F1SetupFailure {
    /// Transaction identifier from the request
    pub transaction_id: TransactionId,
    /// Rejection cause
    pub cause: Cause,
}

/// F1 REMOVAL REQUEST (DU -> CU).
///
/// Asks the CU to tear down the whole DU association.
#[derive(Debug, Clone, PartialEq)]
pub struct F1RemovalRequest {
    /// Transaction identifier
    pub transaction_id: TransactionId,
}
