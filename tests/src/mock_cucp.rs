//! Mock CU-CP collaborators for integration testing
//!
//! Stands in for everything around the F1AP engine: the transport (captures
//! outbound PDUs), the session registry (allocates UE indexes and RRC
//! sinks) and the peer manager (records DU removal requests).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use f1cu_common::{DuIndex, OctetString, UeIndex};
use f1cu_cucp::notifiers::{
    DuManagementNotifier, DuProcessorNotifier, F1apMessageNotifier, RrcSink, UeCreationRequest,
    UeReleaseRequestInfo,
};
use f1cu_cucp::{F1apCu, F1cuConfig};
use f1cu_f1ap::ids::{GnbCuUeF1apId, GnbDuUeF1apId, NrCgi, SrbId};
use f1cu_f1ap::messages::{F1SetupRequest, InitialUlRrcMessageTransfer, InitiatingMessage};
use f1cu_f1ap::F1apPdu;

use crate::test_utils::{wait_for_condition, DEFAULT_POLL_INTERVAL, DEFAULT_TEST_TIMEOUT};

/// Transport stand-in capturing every PDU the engine sends.
pub struct MockTransport {
    tx: mpsc::UnboundedSender<F1apPdu>,
    rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<F1apPdu>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        Arc::new(Self {
            tx,
            rx: tokio::sync::Mutex::new(rx),
        })
    }

    /// Awaits the next outbound PDU, panicking after one second of silence.
    pub async fn expect_pdu(&self) -> F1apPdu {
        let mut rx = self.rx.lock().await;
        timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("no PDU sent within 1s")
            .expect("transport channel closed")
    }

    /// Returns an already-captured PDU without waiting.
    pub async fn try_next_pdu(&self) -> Option<F1apPdu> {
        self.rx.lock().await.try_recv().ok()
    }
}

impl F1apMessageNotifier for MockTransport {
    fn on_new_pdu(&self, pdu: F1apPdu) {
        let _ = self.tx.send(pdu);
    }
}

/// Per-UE RRC sink recording uplink deliveries.
#[derive(Default)]
pub struct RecordingRrc {
    ccch: Mutex<Vec<OctetString>>,
    dcch: Mutex<Vec<(SrbId, OctetString)>>,
}

impl RecordingRrc {
    pub fn ccch_count(&self) -> usize {
        self.ccch.lock().unwrap().len()
    }

    pub fn dcch_messages(&self) -> Vec<(SrbId, OctetString)> {
        self.dcch.lock().unwrap().clone()
    }
}

impl RrcSink for RecordingRrc {
    fn on_ul_ccch_pdu(&self, pdu: OctetString) {
        self.ccch.lock().unwrap().push(pdu);
    }

    fn on_ul_dcch_pdu(&self, srb_id: SrbId, pdu: OctetString) {
        self.dcch.lock().unwrap().push((srb_id, pdu));
    }
}

/// Session registry and peer manager stand-in.
pub struct MockCuCp {
    next_ue_index: AtomicU32,
    admit: AtomicBool,
    setup_requests: Mutex<Vec<F1SetupRequest>>,
    release_requests: Mutex<Vec<UeReleaseRequestInfo>>,
    du_removals: Mutex<Vec<DuIndex>>,
    creations: Mutex<Vec<UeCreationRequest>>,
    sinks: Mutex<HashMap<UeIndex, Arc<RecordingRrc>>>,
}

impl MockCuCp {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_ue_index: AtomicU32::new(1),
            admit: AtomicBool::new(true),
            setup_requests: Mutex::new(Vec::new()),
            release_requests: Mutex::new(Vec::new()),
            du_removals: Mutex::new(Vec::new()),
            creations: Mutex::new(Vec::new()),
            sinks: Mutex::new(HashMap::new()),
        })
    }

    /// Makes subsequent admissions fail at the registry.
    pub fn set_admission(&self, admit: bool) {
        self.admit.store(admit, Ordering::SeqCst);
    }

    pub fn sink_for(&self, ue_index: UeIndex) -> Option<Arc<RecordingRrc>> {
        self.sinks.lock().unwrap().get(&ue_index).cloned()
    }

    pub fn created_ues(&self) -> Vec<UeIndex> {
        self.creations
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.ue_index)
            .collect()
    }

    pub fn f1_setup_requests(&self) -> usize {
        self.setup_requests.lock().unwrap().len()
    }

    pub fn release_requests(&self) -> Vec<UeReleaseRequestInfo> {
        self.release_requests.lock().unwrap().clone()
    }

    pub fn du_removals(&self) -> usize {
        self.du_removals.lock().unwrap().len()
    }
}

impl DuProcessorNotifier for MockCuCp {
    fn on_f1_setup_request(&self, request: F1SetupRequest) {
        self.setup_requests.lock().unwrap().push(request);
    }

    fn on_new_ue_index_required(&self) -> Option<UeIndex> {
        if !self.admit.load(Ordering::SeqCst) {
            return None;
        }
        Some(UeIndex::new(
            self.next_ue_index.fetch_add(1, Ordering::SeqCst),
        ))
    }

    fn on_create_ue(&self, request: UeCreationRequest) -> Option<Arc<dyn RrcSink>> {
        if !self.admit.load(Ordering::SeqCst) {
            return None;
        }
        let sink = Arc::new(RecordingRrc::default());
        self.sinks
            .lock()
            .unwrap()
            .insert(request.ue_index, sink.clone());
        self.creations.lock().unwrap().push(request);
        Some(sink)
    }

    fn on_du_initiated_release_request(&self, request: UeReleaseRequestInfo) {
        self.release_requests.lock().unwrap().push(request);
    }

    fn du_index(&self) -> DuIndex {
        DuIndex::new(0)
    }
}

impl DuManagementNotifier for MockCuCp {
    fn on_du_remove_request(&self, du_index: DuIndex) {
        self.du_removals.lock().unwrap().push(du_index);
    }
}

/// Fully wired engine plus its mocks.
pub struct TestBench {
    pub f1ap: F1apCu,
    pub transport: Arc<MockTransport>,
    pub cucp: Arc<MockCuCp>,
}

impl TestBench {
    /// Engine with defaults suitable for most tests (1s procedure timeout).
    pub fn new() -> Self {
        Self::with_config(F1cuConfig {
            procedure_timeout_ms: 1000,
            ..F1cuConfig::default()
        })
    }

    /// Engine with a short procedure deadline, for timeout tests.
    pub fn with_timeout_ms(ms: u64) -> Self {
        Self::with_config(F1cuConfig {
            procedure_timeout_ms: ms,
            ..F1cuConfig::default()
        })
    }

    pub fn with_config(config: F1cuConfig) -> Self {
        let transport = MockTransport::new();
        let cucp = MockCuCp::new();
        let f1ap = F1apCu::start(
            &config,
            transport.clone(),
            cucp.clone(),
            cucp.clone(),
        );
        Self {
            f1ap,
            transport,
            cucp,
        }
    }

    /// A valid test cell.
    pub fn cgi() -> NrCgi {
        NrCgi {
            plmn: [0x00, 0xf1, 0x10],
            nci: 0x12345,
        }
    }

    /// Builds a well-formed INITIAL UL RRC MESSAGE TRANSFER.
    pub fn initial_ul_rrc(du_ue_id: u64) -> InitialUlRrcMessageTransfer {
        InitialUlRrcMessageTransfer {
            gnb_du_ue_f1ap_id: GnbDuUeF1apId(du_ue_id),
            nr_cgi: Self::cgi(),
            c_rnti: 0x4601,
            rrc_container: OctetString::from_slice(&[0x1d, 0xec, 0x0d, 0xed]),
            du_to_cu_rrc_container: Some(OctetString::from_slice(&[0xce, 0x11])),
            rrc_container_rrc_setup_complete: None,
        }
    }

    /// Admits a UE through the inbound path and returns its handles.
    pub async fn admit_ue(&self, du_ue_id: u64) -> (UeIndex, GnbCuUeF1apId) {
        let before = self.f1ap.ue_count();
        self.f1ap
            .handle_pdu(F1apPdu::InitiatingMessage(
                InitiatingMessage::InitialUlRrcMessageTransfer(Self::initial_ul_rrc(du_ue_id)),
            ));

        wait_for_condition(
            || async { self.f1ap.ue_count() > before },
            DEFAULT_TEST_TIMEOUT,
            DEFAULT_POLL_INTERVAL,
        )
        .await
        .expect("UE was not admitted");

        let ue_index = *self
            .cucp
            .created_ues()
            .last()
            .expect("no UE creation recorded");
        let (cu_ue_id, _) = self
            .f1ap
            .ue_f1ap_ids(ue_index)
            .expect("admitted UE has no ids");
        (ue_index, cu_ue_id)
    }
}

impl Default for TestBench {
    fn default() -> Self {
        Self::new()
    }
}
