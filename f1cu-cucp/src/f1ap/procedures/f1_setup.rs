//! F1 Setup transaction (DU initiated, CU responds)
//!
//! Per 3GPP TS 38.473 Section 8.2.3. The DU's request is forwarded to the
//! owning CU-CP, which decides asynchronously; the transaction keeps the
//! request's transaction id so the eventual outcome echoes it verbatim.

use f1cu_f1ap::ids::{Cause, NrCgi, TransactionId};
use f1cu_f1ap::messages::{
    F1SetupFailure, F1SetupRequest, F1SetupResponse, SuccessfulOutcome, UnsuccessfulOutcome,
};
use f1cu_f1ap::F1apPdu;

/// Decision returned by the owning CU-CP for a pending F1 Setup.
#[derive(Debug, Clone)]
pub enum F1SetupResult {
    /// Accept the DU association and activate the listed cells.
    Accept {
        /// Cells the CU activates at the DU
        cells_to_activate: Vec<NrCgi>,
    },
    /// Reject the DU association.
    Reject {
        /// Rejection cause sent to the DU
        cause: Cause,
    },
}

/// State kept between receiving an F1 SETUP REQUEST and answering it.
#[derive(Debug, Clone)]
pub struct F1SetupTransaction {
    transaction_id: TransactionId,
    gnb_du_id: u64,
}

impl F1SetupTransaction {
    /// Opens a transaction for a received request.
    pub fn new(request: &F1SetupRequest) -> Self {
        Self {
            transaction_id: request.transaction_id,
            gnb_du_id: request.gnb_du_id,
        }
    }

    /// Transaction id the outcome must echo.
    pub fn transaction_id(&self) -> TransactionId {
        self.transaction_id
    }

    /// gNB-DU id from the request, for logging.
    pub fn gnb_du_id(&self) -> u64 {
        self.gnb_du_id
    }

    /// Builds the F1 SETUP RESPONSE for an accepted association.
    pub fn response(&self, gnb_cu_name: Option<String>, cells_to_activate: Vec<NrCgi>) -> F1apPdu {
        F1apPdu::SuccessfulOutcome(SuccessfulOutcome::F1SetupResponse(F1SetupResponse {
            transaction_id: self.transaction_id,
            gnb_cu_name,
            cells_to_activate,
        }))
    }

    /// Builds the F1 SETUP FAILURE for a rejected association.
    pub fn failure(&self, cause: Cause) -> F1apPdu {
        F1apPdu::UnsuccessfulOutcome(UnsuccessfulOutcome::F1SetupFailure(F1SetupFailure {
            transaction_id: self.transaction_id,
            cause,
        }))
    }
}
