//! F1AP dispatcher task
//!
//! Single actor owning the inbound side of the protocol instance. Every PDU
//! received from the DU association is processed here in arrival order:
//! stateless messages are handled inline, responses to in-flight procedures
//! are routed into the matching UE's event slot.
//!
//! # Message Flow
//!
//! ```text
//! Transport ---> F1AP Task ---> RRC sinks (UL message delivery)
//!                    |
//!                    +--------> DU processor (admission, F1 setup, release requests)
//!                    |
//!                    +--------> Event slots (procedure outcomes)
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use f1cu_f1ap::ids::SrbId;
use f1cu_f1ap::messages::{
    InitialUlRrcMessageTransfer, InitiatingMessage, SuccessfulOutcome, UeContextReleaseRequest,
    UlRrcMessageTransfer, UnsuccessfulOutcome,
};
use f1cu_f1ap::F1apPdu;

use super::procedures::{F1SetupResult, F1SetupTransaction};
use super::ue_context::{
    lock, ModificationEvent, ReleaseEvent, SetupEvent, SharedUeContextTable,
};
use crate::notifiers::{
    DuManagementNotifier, DuProcessorNotifier, F1apMessageNotifier, UeCreationRequest,
    UeReleaseRequestInfo,
};
use crate::tasks::{Task, TaskMessage};

/// Messages processed by the F1AP task.
#[derive(Debug)]
pub enum F1apTaskMessage {
    /// Decoded PDU received from the DU association
    ReceivePdu(F1apPdu),
    /// CU-CP's decision for the pending F1 Setup
    F1SetupResult(F1SetupResult),
}

/// F1AP task for one DU association.
pub struct F1apTask {
    /// Shared UE context table
    table: SharedUeContextTable,
    /// Outbound PDU sink
    pdu_notifier: Arc<dyn F1apMessageNotifier>,
    /// Owning CU-CP's session registry
    du_processor: Arc<dyn DuProcessorNotifier>,
    /// Peer management, for tearing down the DU association
    du_management: Arc<dyn DuManagementNotifier>,
    /// CU name announced in F1 SETUP RESPONSE
    gnb_cu_name: Option<String>,
    /// Open F1 Setup transaction awaiting the CU-CP's decision
    pending_setup: Option<F1SetupTransaction>,
}

impl F1apTask {
    /// Creates a new F1AP task.
    pub fn new(
        table: SharedUeContextTable,
        pdu_notifier: Arc<dyn F1apMessageNotifier>,
        du_processor: Arc<dyn DuProcessorNotifier>,
        du_management: Arc<dyn DuManagementNotifier>,
        gnb_cu_name: Option<String>,
    ) -> Self {
        Self {
            table,
            pdu_notifier,
            du_processor,
            du_management,
            gnb_cu_name,
            pending_setup: None,
        }
    }

    fn handle_message(&mut self, msg: F1apTaskMessage) {
        match msg {
            F1apTaskMessage::ReceivePdu(pdu) => self.handle_pdu(pdu),
            F1apTaskMessage::F1SetupResult(result) => self.handle_f1_setup_result(result),
        }
    }

    /// Dispatches one inbound PDU.
    fn handle_pdu(&mut self, pdu: F1apPdu) {
        match pdu {
            F1apPdu::InitiatingMessage(msg) => self.handle_initiating_message(msg),
            F1apPdu::SuccessfulOutcome(outcome) => self.handle_successful_outcome(outcome),
            F1apPdu::UnsuccessfulOutcome(outcome) => self.handle_unsuccessful_outcome(outcome),
        }
    }

    fn handle_initiating_message(&mut self, msg: InitiatingMessage) {
        match msg {
            InitiatingMessage::F1SetupRequest(request) => {
                info!(
                    "Received F1SetupRequest: gnb_du_id={} cells={}",
                    request.gnb_du_id,
                    request.served_cells.len()
                );
                if self.pending_setup.is_some() {
                    warn!("Overriding pending F1 Setup transaction");
                }
                self.pending_setup = Some(F1SetupTransaction::new(&request));
                self.du_processor.on_f1_setup_request(request);
            }
            InitiatingMessage::F1RemovalRequest(request) => {
                info!("Received F1RemovalRequest: {}", request.transaction_id);
                self.du_management
                    .on_du_remove_request(self.du_processor.du_index());
            }
            InitiatingMessage::InitialUlRrcMessageTransfer(transfer) => {
                self.handle_initial_ul_rrc_message(transfer);
            }
            InitiatingMessage::UlRrcMessageTransfer(transfer) => {
                self.handle_ul_rrc_message(transfer);
            }
            InitiatingMessage::UeContextReleaseRequest(request) => {
                self.handle_ue_context_release_request(request);
            }
            InitiatingMessage::Unsupported { procedure_code } => {
                warn!("Discarding PDU with unsupported procedure code {procedure_code}");
            }
            other => {
                // CU-to-DU messages looping back indicate a misbehaving peer.
                warn!("Discarding unexpected initiating message: {other:?}");
            }
        }
    }

    fn handle_successful_outcome(&mut self, outcome: SuccessfulOutcome) {
        match outcome {
            SuccessfulOutcome::UeContextSetupResponse(response) => {
                let cu_ue_id = response.gnb_cu_ue_f1ap_id;
                lock(&self.table).resolve_setup(cu_ue_id, SetupEvent::Response(response));
            }
            SuccessfulOutcome::UeContextModificationResponse(response) => {
                let cu_ue_id = response.gnb_cu_ue_f1ap_id;
                lock(&self.table)
                    .resolve_modification(cu_ue_id, ModificationEvent::Response(response));
            }
            SuccessfulOutcome::UeContextReleaseComplete(complete) => {
                let cu_ue_id = complete.gnb_cu_ue_f1ap_id;
                lock(&self.table).resolve_release(cu_ue_id, ReleaseEvent::Complete(complete));
            }
            SuccessfulOutcome::F1SetupResponse(_) => {
                warn!("Discarding F1SetupResponse. Not expected at the CU");
            }
            SuccessfulOutcome::Unsupported { procedure_code } => {
                warn!("Discarding outcome with unsupported procedure code {procedure_code}");
            }
        }
    }

    fn handle_unsuccessful_outcome(&mut self, outcome: UnsuccessfulOutcome) {
        match outcome {
            UnsuccessfulOutcome::UeContextSetupFailure(failure) => {
                let cu_ue_id = failure.gnb_cu_ue_f1ap_id;
                lock(&self.table).resolve_setup(cu_ue_id, SetupEvent::Failure(failure));
            }
            UnsuccessfulOutcome::UeContextModificationFailure(failure) => {
                let cu_ue_id = failure.gnb_cu_ue_f1ap_id;
                lock(&self.table)
                    .resolve_modification(cu_ue_id, ModificationEvent::Failure(failure));
            }
            UnsuccessfulOutcome::F1SetupFailure(_) => {
                warn!("Discarding F1SetupFailure. Not expected at the CU");
            }
            UnsuccessfulOutcome::Unsupported { procedure_code } => {
                warn!("Discarding outcome with unsupported procedure code {procedure_code}");
            }
        }
    }

    // ========================================================================
    // F1 Setup
    // ========================================================================

    /// Answers the pending F1 Setup with the CU-CP's decision. A rejection
    /// also tears down the DU association.
    fn handle_f1_setup_result(&mut self, result: F1SetupResult) {
        let txn = match self.pending_setup.take() {
            Some(txn) => txn,
            None => {
                warn!("Discarding F1 Setup result. No transaction pending");
                return;
            }
        };

        match result {
            F1SetupResult::Accept { cells_to_activate } => {
                info!(
                    "Accepting F1 Setup: gnb_du_id={} {}",
                    txn.gnb_du_id(),
                    txn.transaction_id()
                );
                self.pdu_notifier
                    .on_new_pdu(txn.response(self.gnb_cu_name.clone(), cells_to_activate));
            }
            F1SetupResult::Reject { cause } => {
                warn!(
                    "Rejecting F1 Setup: gnb_du_id={} {}",
                    txn.gnb_du_id(),
                    txn.transaction_id()
                );
                self.pdu_notifier.on_new_pdu(txn.failure(cause));
                self.du_management
                    .on_du_remove_request(self.du_processor.du_index());
            }
        }
    }

    // ========================================================================
    // UE admission
    // ========================================================================

    /// Admits a UE announced by INITIAL UL RRC MESSAGE TRANSFER: allocates
    /// its CU id, registers it with the CU-CP and delivers the first uplink
    /// payload. Any failure along the way drops the message.
    fn handle_initial_ul_rrc_message(&mut self, transfer: InitialUlRrcMessageTransfer) {
        let du_ue_id = transfer.gnb_du_ue_f1ap_id;

        let du_to_cu_rrc_container = match transfer.du_to_cu_rrc_container {
            Some(container) => container,
            None => {
                warn!("{du_ue_id}: Dropping InitialUlRrcMessageTransfer. Missing DU-to-CU container");
                return;
            }
        };

        if !transfer.nr_cgi.is_valid() {
            warn!(
                "{du_ue_id}: Dropping InitialUlRrcMessageTransfer. Invalid CGI {}",
                transfer.nr_cgi
            );
            return;
        }

        if lock(&self.table).get_by_du_id(du_ue_id).is_some() {
            warn!("{du_ue_id}: Dropping InitialUlRrcMessageTransfer. DU UE id already in use");
            return;
        }

        let cu_ue_id = match lock(&self.table).allocate_cu_ue_id() {
            Some(id) => id,
            None => {
                warn!("{du_ue_id}: Dropping InitialUlRrcMessageTransfer. No CU UE F1AP id available");
                return;
            }
        };

        let ue_index = match self.du_processor.on_new_ue_index_required() {
            Some(index) => index,
            None => {
                warn!("{du_ue_id}: Dropping InitialUlRrcMessageTransfer. No UE index available");
                lock(&self.table).release_cu_ue_id(cu_ue_id);
                return;
            }
        };

        let rrc = match self.du_processor.on_create_ue(UeCreationRequest {
            ue_index,
            c_rnti: transfer.c_rnti,
            cgi: transfer.nr_cgi,
            du_to_cu_rrc_container,
        }) {
            Some(rrc) => rrc,
            None => {
                warn!("{du_ue_id}: Dropping InitialUlRrcMessageTransfer. UE creation failed");
                lock(&self.table).release_cu_ue_id(cu_ue_id);
                return;
            }
        };

        {
            let mut table = lock(&self.table);
            if !table.add_ue(ue_index, cu_ue_id, rrc.clone()) {
                table.release_cu_ue_id(cu_ue_id);
                return;
            }
            table.bind_du_ue_id(cu_ue_id, du_ue_id);
        }
        info!("{ue_index} {cu_ue_id} {du_ue_id}: UE admitted (c_rnti={})", transfer.c_rnti);

        // A reestablishing UE carries its RRC setup complete inline and
        // skips the first-contact path.
        match transfer.rrc_container_rrc_setup_complete {
            Some(setup_complete) => rrc.on_ul_dcch_pdu(SrbId::Srb1, setup_complete),
            None => rrc.on_ul_ccch_pdu(transfer.rrc_container),
        }
    }

    // ========================================================================
    // UL message delivery
    // ========================================================================

    fn handle_ul_rrc_message(&mut self, transfer: UlRrcMessageTransfer) {
        let cu_ue_id = transfer.gnb_cu_ue_f1ap_id;

        let rrc = match lock(&self.table).get(cu_ue_id) {
            Some(ctx) => ctx.rrc.clone(),
            None => {
                warn!("{cu_ue_id}: Dropping UlRrcMessageTransfer. UE context does not exist");
                return;
            }
        };

        debug!(
            "{cu_ue_id}: Delivering UL RRC message on {} ({} bytes)",
            transfer.srb_id,
            transfer.rrc_container.len()
        );
        rrc.on_ul_dcch_pdu(transfer.srb_id, transfer.rrc_container);
    }

    // ========================================================================
    // DU-initiated release
    // ========================================================================

    /// Forwards a DU-initiated release request to the CU-CP, unless the UE
    /// is unknown or already being released.
    fn handle_ue_context_release_request(&mut self, request: UeContextReleaseRequest) {
        let cu_ue_id = request.gnb_cu_ue_f1ap_id;

        let ue_index = match lock(&self.table).get(cu_ue_id) {
            Some(ctx) if ctx.release_marked => {
                debug!("{cu_ue_id}: Ignoring UeContextReleaseRequest. Release already in progress");
                return;
            }
            Some(ctx) => ctx.ue_index,
            None => {
                warn!("{cu_ue_id}: Dropping UeContextReleaseRequest. UE context does not exist");
                return;
            }
        };

        info!("{ue_index} {cu_ue_id}: DU requested UE context release");
        self.du_processor
            .on_du_initiated_release_request(UeReleaseRequestInfo {
                ue_index,
                cause: request.cause,
            });
    }
}

#[async_trait::async_trait]
impl Task for F1apTask {
    type Message = F1apTaskMessage;

    async fn run(&mut self, mut rx: mpsc::Receiver<TaskMessage<Self::Message>>) {
        info!("F1AP task started");

        loop {
            match rx.recv().await {
                Some(TaskMessage::Message(msg)) => self.handle_message(msg),
                Some(TaskMessage::Shutdown) => {
                    info!("F1AP task shutting down");
                    break;
                }
                None => {
                    debug!("F1AP task channel closed");
                    break;
                }
            }
        }
    }
}
