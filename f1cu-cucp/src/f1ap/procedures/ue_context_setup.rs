//! UE Context Setup procedure (CU initiated)
//!
//! Per 3GPP TS 38.473 Section 8.3.1. The CU sends UE CONTEXT SETUP REQUEST
//! and suspends until the DU answers. A response is only accepted when it
//! carries the DU-assigned UE id and the DU-to-CU container and every
//! requested bearer was established; anything else counts as a rejection
//! and the UE context is removed.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, warn};

use f1cu_f1ap::ids::{Cause, ProtocolCause, RadioNetworkCause};
use f1cu_f1ap::messages::{InitiatingMessage, UeContextSetupRequest, UeContextSetupResponse};
use f1cu_f1ap::F1apPdu;

use crate::f1ap::procedures::ProcedureState;
use crate::f1ap::ue_context::{lock, SetupEvent, SharedUeContextTable};
use crate::notifiers::F1apMessageNotifier;

/// Result of a UE Context Setup procedure.
#[derive(Debug)]
pub enum UeContextSetupOutcome {
    /// The DU established the context; the response passed validation and
    /// the DU-assigned id is now bound.
    Success(UeContextSetupResponse),
    /// The DU rejected the request, or the response failed validation. The
    /// UE context has been removed.
    Rejected {
        /// Failure cause, from the DU or derived from validation
        cause: Cause,
    },
    /// The DU accepted the request but failed to establish some of the
    /// requested bearers. Any bearer failure fails the whole setup, so the
    /// UE context has been removed; the response is kept for the failed
    /// bearer lists.
    PartialFailure(UeContextSetupResponse),
    /// The UE context was removed while the procedure was in flight.
    Cancelled,
    /// The DU did not answer within the deadline. The UE context has been
    /// removed.
    TimedOut,
}

impl UeContextSetupOutcome {
    /// Returns true for a validated successful setup.
    pub fn is_success(&self) -> bool {
        matches!(self, UeContextSetupOutcome::Success(_))
    }
}

/// CU-initiated UE Context Setup.
pub struct UeContextSetupProcedure {
    request: UeContextSetupRequest,
    table: SharedUeContextTable,
    pdu_notifier: Arc<dyn F1apMessageNotifier>,
    response_timeout: Duration,
    state: ProcedureState,
}

impl UeContextSetupProcedure {
    /// Creates the procedure for a UE that already has a context.
    pub fn new(
        request: UeContextSetupRequest,
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
            "{}: ContextSetup {} -> {next}",
            self.request.gnb_cu_ue_f1ap_id, self.state
        );
        self.state = next;
    }

    /// Runs the procedure to completion.
    pub async fn run(mut self) -> UeContextSetupOutcome {
        let cu_ue_id = self.request.gnb_cu_ue_f1ap_id;

        let lane = lock(&self.table).get(cu_ue_id).map(|ctx| ctx.lane.clone());
        let lane = match lane {
            Some(lane) => lane,
            None => {
                warn!("{cu_ue_id}: ContextSetup refused. UE context does not exist");
                self.set_state(ProcedureState::Completed);
                return UeContextSetupOutcome::Rejected {
                    cause: Cause::RadioNetwork(
                        RadioNetworkCause::UnknownOrAlreadyAllocatedGnbCuUeF1apId,
                    ),
                };
            }
        };
        let _lane = lane.lock().await;

        // The context may have been released while we queued on the lane.
        let rx = lock(&self.table).arm_setup(cu_ue_id);
        let rx = match rx {
            Some(rx) => rx,
            None => {
                self.set_state(ProcedureState::Cancelled);
                return UeContextSetupOutcome::Cancelled;
            }
        };

        debug!("{cu_ue_id}: Sending UeContextSetupRequest");
        self.pdu_notifier.on_new_pdu(F1apPdu::InitiatingMessage(
            InitiatingMessage::UeContextSetupRequest(self.request.clone()),
        ));
        self.set_state(ProcedureState::AwaitingResponse);

        let event = match timeout(self.response_timeout, rx).await {
            Ok(Ok(event)) => event,
            Ok(Err(_)) => {
                self.set_state(ProcedureState::Cancelled);
                return UeContextSetupOutcome::Cancelled;
            }
            Err(_) => {
                warn!("{cu_ue_id}: ContextSetup timed out. Removing UE context");
                lock(&self.table).remove_ue(cu_ue_id);
                self.set_state(ProcedureState::Completed);
                return UeContextSetupOutcome::TimedOut;
            }
        };

        match event {
            SetupEvent::Response(response) => {
                let outcome = self.accept(response);
                self.set_state(ProcedureState::Completed);
                outcome
            }
            SetupEvent::Failure(failure) => {
                warn!("{cu_ue_id}: ContextSetup failed. Removing UE context");
                lock(&self.table).remove_ue(cu_ue_id);
                self.set_state(ProcedureState::Completed);
                UeContextSetupOutcome::Rejected {
                    cause: failure.cause,
                }
            }
            SetupEvent::Cancelled => {
                self.set_state(ProcedureState::Cancelled);
                UeContextSetupOutcome::Cancelled
            }
        }
    }

    /// Validates the response and binds the DU-assigned id. Any validation
    /// failure removes the context and turns into a rejection.
    fn accept(&self, response: UeContextSetupResponse) -> UeContextSetupOutcome {
        let cu_ue_id = response.gnb_cu_ue_f1ap_id;

        let du_ue_id = match response.gnb_du_ue_f1ap_id {
            Some(id) => id,
            None => {
                warn!("{cu_ue_id}: ContextSetup response lacks the DU UE id. Removing UE context");
                lock(&self.table).remove_ue(cu_ue_id);
                return UeContextSetupOutcome::Rejected {
                    cause: Cause::Protocol(ProtocolCause::TransferSyntaxError),
                };
            }
        };

        if response.du_to_cu_rrc_container.is_none() {
            warn!(
                "{cu_ue_id}: ContextSetup response lacks the DU-to-CU container. \
                 Removing UE context"
            );
            lock(&self.table).remove_ue(cu_ue_id);
            return UeContextSetupOutcome::Rejected {
                cause: Cause::Protocol(ProtocolCause::TransferSyntaxError),
            };
        }

        if response.has_failed_bearers() {
            warn!(
                "{cu_ue_id}: ContextSetup established only part of the requested bearers. \
                 Removing UE context"
            );
            lock(&self.table).remove_ue(cu_ue_id);
            return UeContextSetupOutcome::PartialFailure(response);
        }

        if !lock(&self.table).bind_du_ue_id(cu_ue_id, du_ue_id) {
            lock(&self.table).remove_ue(cu_ue_id);
            return UeContextSetupOutcome::Rejected {
                cause: Cause::Protocol(ProtocolCause::MessageNotCompatibleWithReceiverState),
            };
        }

        debug!("{cu_ue_id} {du_ue_id}: ContextSetup succeeded");
        UeContextSetupOutcome::Success(response)
    }
}
