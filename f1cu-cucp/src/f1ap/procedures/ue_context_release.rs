//! UE Context Release procedure (CU initiated)
//!
//! Per 3GPP TS 38.473 Section 8.3.3. The CU sends UE CONTEXT RELEASE
//! COMMAND and waits for RELEASE COMPLETE. The context is removed whether
//! the DU confirms or the deadline passes; a UE marked for release stays
//! marked, so running the procedure twice releases once.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, warn};

use f1cu_common::UeIndex;
use f1cu_f1ap::messages::{InitiatingMessage, UeContextReleaseCommand};
use f1cu_f1ap::F1apPdu;

use crate::f1ap::procedures::ProcedureState;
use crate::f1ap::ue_context::{lock, ReleaseEvent, SharedUeContextTable};
use crate::notifiers::F1apMessageNotifier;

/// CU-initiated UE Context Release.
pub struct UeContextReleaseProcedure {
    command: UeContextReleaseCommand,
    table: SharedUeContextTable,
    pdu_notifier: Arc<dyn F1apMessageNotifier>,
    response_timeout: Duration,
    state: ProcedureState,
}

impl UeContextReleaseProcedure {
    /// Creates the procedure for an existing UE context.
    pub fn new(
        command: UeContextReleaseCommand,
        table: SharedUeContextTable,
        pdu_notifier: Arc<dyn F1apMessageNotifier>,
        response_timeout: Duration,
    ) -> Self {
        Self {
            command,
            table,
            pdu_notifier,
            response_timeout,
            state: ProcedureState::Created,
        }
    }

    fn set_state(&mut self, next: ProcedureState) {
        debug!(
            "{}: ContextRelease {} -> {next}",
            self.command.gnb_cu_ue_f1ap_id, self.state
        );
        self.state = next;
    }

    /// Runs the procedure to completion. Returns the released UE's index,
    /// or `None` when the context is already gone or already being released.
    pub async fn run(mut self) -> Option<UeIndex> {
        let cu_ue_id = self.command.gnb_cu_ue_f1ap_id;

        let (ue_index, lane) = {
            let mut table = lock(&self.table);
            match table.mark_release(cu_ue_id) {
                Some(false) => {}
                Some(true) => {
                    debug!("{cu_ue_id}: ContextRelease already in progress");
                    return None;
                }
                None => {
                    debug!("{cu_ue_id}: ContextRelease skipped. UE context does not exist");
                    return None;
                }
            }
            let ctx = table.get(cu_ue_id)?;
            (ctx.ue_index, ctx.lane.clone())
        };
        let _lane = lane.lock().await;

        let rx = lock(&self.table).arm_release(cu_ue_id);
        let rx = match rx {
            Some(rx) => rx,
            None => {
                self.set_state(ProcedureState::Cancelled);
                return None;
            }
        };

        debug!("{cu_ue_id}: Sending UeContextReleaseCommand");
        self.pdu_notifier.on_new_pdu(F1apPdu::InitiatingMessage(
            InitiatingMessage::UeContextReleaseCommand(self.command.clone()),
        ));
        self.set_state(ProcedureState::AwaitingResponse);

        match timeout(self.response_timeout, rx).await {
            Ok(Ok(ReleaseEvent::Complete(_))) => {
                debug!("{cu_ue_id}: ContextRelease complete");
            }
            Ok(Ok(ReleaseEvent::Cancelled)) | Ok(Err(_)) => {
                // Context was torn down underneath us, nothing left to remove.
                self.set_state(ProcedureState::Cancelled);
                return Some(ue_index);
            }
            Err(_) => {
                // The context is removed regardless; the DU is presumed gone.
                warn!("{cu_ue_id}: ContextRelease timed out waiting for complete");
            }
        }

        lock(&self.table).remove_ue(cu_ue_id);
        self.set_state(ProcedureState::Completed);
        Some(ue_index)
    }
}
