//! F1AP CU-CP protocol instance
//!
//! One `F1apCu` serves one DU association. Inbound PDUs are fed to the
//! dispatcher task through a bounded queue; CU-initiated procedures run on
//! the caller's task against the shared UE context table and suspend until
//! the dispatcher resolves their event slot.

pub mod id_pool;
pub mod procedures;
pub mod task;
pub mod ue_context;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, warn};

use f1cu_common::{OctetString, UeIndex};
use f1cu_f1ap::ids::{GnbCuUeF1apId, GnbDuUeF1apId, SrbId};
use f1cu_f1ap::messages::{
    DlRrcMessageTransfer, InitiatingMessage, Paging, UeContextModificationRequest,
    UeContextReleaseCommand, UeContextSetupRequest,
};
use f1cu_f1ap::F1apPdu;

use crate::config::F1cuConfig;
use crate::notifiers::{DuManagementNotifier, DuProcessorNotifier, F1apMessageNotifier};
use crate::tasks::{Task, TaskHandle};

use procedures::{
    F1SetupResult, UeContextModificationOutcome, UeContextModificationProcedure,
    UeContextReleaseProcedure, UeContextSetupOutcome, UeContextSetupProcedure,
};
use task::{F1apTask, F1apTaskMessage};
use ue_context::{lock, SharedUeContextTable, UeContextTable};

/// F1AP engine for one DU association.
pub struct F1apCu {
    handle: TaskHandle<F1apTaskMessage>,
    table: SharedUeContextTable,
    pdu_notifier: Arc<dyn F1apMessageNotifier>,
    response_timeout: Duration,
}

impl F1apCu {
    /// Starts the protocol instance: spawns the dispatcher task and wires
    /// the collaborators.
    pub fn start(
        config: &F1cuConfig,
        pdu_notifier: Arc<dyn F1apMessageNotifier>,
        du_processor: Arc<dyn DuProcessorNotifier>,
        du_management: Arc<dyn DuManagementNotifier>,
    ) -> Self {
        let table: SharedUeContextTable =
            Arc::new(Mutex::new(UeContextTable::new(config.max_ues)));

        let (tx, rx) = tokio::sync::mpsc::channel(config.channel_capacity);
        let mut task = F1apTask::new(
            table.clone(),
            pdu_notifier.clone(),
            du_processor,
            du_management,
            config.gnb_cu_name.clone(),
        );
        tokio::spawn(async move {
            task.run(rx).await;
        });

        Self {
            handle: TaskHandle::new(tx),
            table,
            pdu_notifier,
            response_timeout: config.procedure_timeout(),
        }
    }

    // ========================================================================
    // Inbound path
    // ========================================================================

    /// Submits a received PDU for dispatch. Never blocks: when the queue is
    /// full or the task is gone, the PDU is dropped with a warning.
    pub fn handle_pdu(&self, pdu: F1apPdu) {
        let type_name = pdu.type_name();
        if self
            .handle
            .try_send(F1apTaskMessage::ReceivePdu(pdu))
            .is_err()
        {
            warn!("Dropping inbound {type_name}. F1AP task queue full or closed");
        }
    }

    // ========================================================================
    // F1 Setup
    // ========================================================================

    /// Delivers the CU-CP's decision for the pending F1 Setup. On rejection
    /// the dispatcher also requests removal of the DU association.
    pub async fn notify_f1_setup_result(&self, result: F1SetupResult) {
        if self
            .handle
            .send(F1apTaskMessage::F1SetupResult(result))
            .await
            .is_err()
        {
            warn!("Dropping F1 Setup result. F1AP task is gone");
        }
    }

    // ========================================================================
    // UE-associated procedures
    // ========================================================================

    /// Runs the UE Context Setup procedure to completion.
    pub async fn ue_context_setup(
        &self,
        request: UeContextSetupRequest,
    ) -> UeContextSetupOutcome {
        UeContextSetupProcedure::new(
            request,
            self.table.clone(),
            self.pdu_notifier.clone(),
            self.response_timeout,
        )
        .run()
        .await
    }

    /// Runs the UE Context Modification procedure to completion.
    pub async fn ue_context_modification(
        &self,
        request: UeContextModificationRequest,
    ) -> UeContextModificationOutcome {
        UeContextModificationProcedure::new(
            request,
            self.table.clone(),
            self.pdu_notifier.clone(),
            self.response_timeout,
        )
        .run()
        .await
    }

    /// Runs the UE Context Release procedure to completion. Returns the
    /// released UE's index, or `None` when there was nothing to release.
    pub async fn ue_context_release(&self, command: UeContextReleaseCommand) -> Option<UeIndex> {
        UeContextReleaseProcedure::new(
            command,
            self.table.clone(),
            self.pdu_notifier.clone(),
            self.response_timeout,
        )
        .run()
        .await
    }

    // ========================================================================
    // Downlink transfer
    // ========================================================================

    /// Sends a DL RRC message for an admitted UE. A pending predecessor DU
    /// id is attached once and its stale context removed.
    pub fn handle_dl_rrc_message(
        &self,
        ue_index: UeIndex,
        srb_id: SrbId,
        rrc_container: OctetString,
    ) {
        let (cu_ue_id, du_ue_id, old_du_ue_id) = {
            let mut table = lock(&self.table);
            let (cu_ue_id, du_ue_id) = match table.get_by_ue_index(ue_index) {
                Some(ctx) => match ctx.du_ue_id {
                    Some(du_id) => (ctx.cu_ue_id, du_id),
                    None => {
                        warn!("{ue_index}: Dropping DL RRC message. DU UE id not yet known");
                        return;
                    }
                },
                None => {
                    warn!("{ue_index}: Dropping DL RRC message. UE context does not exist");
                    return;
                }
            };
            (cu_ue_id, du_ue_id, table.take_pending_old_du_ue_id(cu_ue_id))
        };

        // The predecessor context served its purpose once its id has been
        // signalled to the DU.
        if let Some(old_du_id) = old_du_ue_id {
            let stale = lock(&self.table)
                .get_by_du_id(old_du_id)
                .map(|ctx| ctx.cu_ue_id);
            if let Some(stale_cu_id) = stale {
                debug!("{ue_index}: Removing predecessor context {old_du_id}");
                lock(&self.table).remove_ue(stale_cu_id);
            }
        }

        self.pdu_notifier.on_new_pdu(F1apPdu::InitiatingMessage(
            InitiatingMessage::DlRrcMessageTransfer(DlRrcMessageTransfer {
                gnb_cu_ue_f1ap_id: cu_ue_id,
                gnb_du_ue_f1ap_id: du_ue_id,
                old_gnb_du_ue_f1ap_id: old_du_ue_id,
                srb_id,
                rrc_container,
            }),
        ));
    }

    /// Records that `ue_index` continues the connection previously served
    /// under `old_ue_index` (RRC reestablishment within the same DU). The
    /// predecessor's DU id is surfaced in the next DL RRC transfer. Returns
    /// true when the link was recorded.
    pub fn handle_ue_id_update(&self, ue_index: UeIndex, old_ue_index: UeIndex) -> bool {
        let mut table = lock(&self.table);

        let old_du_ue_id = match table.get_by_ue_index(old_ue_index).and_then(|c| c.du_ue_id) {
            Some(id) => id,
            None => {
                warn!("{ue_index}: Cannot link predecessor {old_ue_index}. No DU UE id known");
                return false;
            }
        };
        let cu_ue_id = match table.get_by_ue_index(ue_index) {
            Some(ctx) => ctx.cu_ue_id,
            None => {
                warn!("{ue_index}: Cannot link predecessor. UE context does not exist");
                return false;
            }
        };

        let linked = table.set_pending_old_du_ue_id(cu_ue_id, old_du_ue_id);
        debug!("{ue_index} {cu_ue_id}: Linked predecessor {old_du_ue_id}");
        linked
    }

    // ========================================================================
    // Non-UE-associated downlink
    // ========================================================================

    /// Sends a PAGING message to the DU.
    pub fn handle_paging(&self, paging: Paging) {
        debug!(
            "Sending Paging: ue_identity_index={} cells={}",
            paging.ue_identity_index,
            paging.paging_cells.len()
        );
        self.pdu_notifier
            .on_new_pdu(F1apPdu::InitiatingMessage(InitiatingMessage::Paging(
                paging,
            )));
    }

    // ========================================================================
    // Introspection and lifecycle
    // ========================================================================

    /// Number of UEs currently served on this association.
    pub fn ue_count(&self) -> usize {
        lock(&self.table).len()
    }

    /// F1AP ids of an admitted UE: the CU-assigned id and, once learned,
    /// the DU-assigned one.
    pub fn ue_f1ap_ids(
        &self,
        ue_index: UeIndex,
    ) -> Option<(GnbCuUeF1apId, Option<GnbDuUeF1apId>)> {
        lock(&self.table)
            .get_by_ue_index(ue_index)
            .map(|ctx| (ctx.cu_ue_id, ctx.du_ue_id))
    }

    /// Signals the dispatcher task to terminate.
    pub async fn shutdown(&self) {
        let _ = self.handle.shutdown().await;
    }
}
