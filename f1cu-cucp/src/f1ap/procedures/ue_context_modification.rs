//! UE Context Modification procedure (CU initiated)
//!
//! Per 3GPP TS 38.473 Section 8.3.4. Unlike setup, a failed modification
//! leaves the UE context in place; tearing it down is the caller's call.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, warn};

use f1cu_f1ap::ids::Cause;
use f1cu_f1ap::messages::{
    InitiatingMessage, UeContextModificationRequest, UeContextModificationResponse,
};
use f1cu_f1ap::F1apPdu;

use crate::f1ap::procedures::ProcedureState;
use crate::f1ap::ue_context::{lock, ModificationEvent, ProcedureKind, SharedUeContextTable};
use crate::notifiers::F1apMessageNotifier;

/// Result of a UE Context Modification procedure.
#[derive(Debug)]
pub enum UeContextModificationOutcome {
    /// The DU applied the modification.
    Success(UeContextModificationResponse),
    /// The DU rejected the modification, or the UE context vanished before
    /// the request went out (`cause` is `None` in that case and nothing was
    /// sent to the DU).
    Rejected {
        /// Failure cause from the DU, absent when the procedure never ran
        cause: Option<Cause>,
    },
    /// The UE context was removed while the procedure was in flight.
    Cancelled,
    /// The DU did not answer within the deadline. The UE context is kept.
    TimedOut,
}

impl UeContextModificationOutcome {
    /// Returns true for a successful modification.
    pub fn is_success(&self) -> bool {
        matches!(self, UeContextModificationOutcome::Success(_))
    }
}

/// CU-initiated UE Context Modification.
pub struct UeContextModificationProcedure {
    request: UeContextModificationRequest,
    table: SharedUeContextTable,
    pdu_notifier: Arc<dyn F1apMessageNotifier>,
    response_timeout: Duration,
    state: ProcedureState,
}

impl UeContextModificationProcedure {
    /// Creates the procedure for an existing UE context.
    pub fn new(
        request: UeContextModificationRequest,
        table: SharedUeContextTable,
        pdu_notifier: Arc<dyn F1apMessageNotifier>,
        response_timeout: Duration,
    ) -> Self {
        Self {
            request,
            table,
            pdu_notifier,
            response_timeout,
            state: ProcedureState::Created,
        }
    }

    fn set_state(&mut self, next: ProcedureState) {
        debug!(
            "{}: ContextModification {} -> {next}",
            self.request.gnb_cu_ue_f1ap_id, self.state
        );
        self.state = next;
    }

    /// Runs the procedure to completion.
    pub async fn run(mut self) -> UeContextModificationOutcome {
        let cu_ue_id = self.request.gnb_cu_ue_f1ap_id;

        let lane = lock(&self.table).get(cu_ue_id).map(|ctx| ctx.lane.clone());
        let lane = match lane {
            Some(lane) => lane,
            None => {
                // Released concurrently; report failure without touching the DU.
                debug!("{cu_ue_id}: ContextModification skipped. UE context does not exist");
                self.set_state(ProcedureState::Completed);
                return UeContextModificationOutcome::Rejected { cause: None };
            }
        };
        let _lane = lane.lock().await;

        let rx = lock(&self.table).arm_modification(cu_ue_id);
        let rx = match rx {
            Some(rx) => rx,
            None => {
                self.set_state(ProcedureState::Cancelled);
                return UeContextModificationOutcome::Rejected { cause: None };
            }
        };

        debug!("{cu_ue_id}: Sending UeContextModificationRequest");
        self.pdu_notifier.on_new_pdu(F1apPdu::InitiatingMessage(
            InitiatingMessage::UeContextModificationRequest(self.request.clone()),
        ));
        self.set_state(ProcedureState::AwaitingResponse);

        let event = match timeout(self.response_timeout, rx).await {
            Ok(Ok(event)) => event,
            Ok(Err(_)) => {
                self.set_state(ProcedureState::Cancelled);
                return UeContextModificationOutcome::Cancelled;
            }
            Err(_) => {
                warn!("{cu_ue_id}: ContextModification timed out");
                lock(&self.table).disarm(cu_ue_id, ProcedureKind::ContextModification);
                self.set_state(ProcedureState::Completed);
                return UeContextModificationOutcome::TimedOut;
            }
        };

        match event {
            ModificationEvent::Response(response) => {
                debug!("{cu_ue_id}: ContextModification succeeded");
                self.set_state(ProcedureState::Completed);
                UeContextModificationOutcome::Success(response)
            }
            ModificationEvent::Failure(failure) => {
                warn!("{cu_ue_id}: ContextModification failed");
                self.set_state(ProcedureState::Completed);
                UeContextModificationOutcome::Rejected {
                    cause: Some(failure.cause),
                }
            }
            ModificationEvent::Cancelled => {
                self.set_state(ProcedureState::Cancelled);
                UeContextModificationOutcome::Cancelled
            }
        }
    }
}
