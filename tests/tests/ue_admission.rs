//! UE admission and RRC transfer integration tests

use integration_tests::{init_test_logging, TestBench};

use f1cu_common::{OctetString, UeIndex};
use f1cu_f1ap::ids::{GnbCuUeF1apId, GnbDuUeF1apId, SrbId};
use f1cu_f1ap::messages::{InitiatingMessage, Paging, UlRrcMessageTransfer};
use f1cu_f1ap::F1apPdu;

use std::time::Duration;

#[tokio::test]
async fn test_initial_ul_rrc_admits_ue_and_delivers_ccch() {
    init_test_logging();
    let bench = TestBench::new();

    let (ue_index, _cu_ue_id) = bench.admit_ue(9).await;

    assert_eq!(bench.f1ap.ue_count(), 1);
    let (_, du_ue_id) = bench.f1ap.ue_f1ap_ids(ue_index).unwrap();
    assert_eq!(du_ue_id, Some(GnbDuUeF1apId(9)));

    let sink = bench.cucp.sink_for(ue_index).unwrap();
    assert_eq!(sink.ccch_count(), 1);
    assert!(sink.dcch_messages().is_empty());
}

#[tokio::test]
async fn test_setup_complete_container_goes_to_srb1() {
    init_test_logging();
    let bench = TestBench::new();

    let mut transfer = TestBench::initial_ul_rrc(9);
    transfer.rrc_container_rrc_setup_complete = Some(OctetString::from_slice(&[0xaa]));
    bench.f1ap.handle_pdu(F1apPdu::InitiatingMessage(
        InitiatingMessage::InitialUlRrcMessageTransfer(transfer),
    ));

    integration_tests::wait_for_condition(
        || async { bench.f1ap.ue_count() == 1 },
        integration_tests::DEFAULT_TEST_TIMEOUT,
        Duration::from_millis(20),
    )
    .await
    .expect("UE was not admitted");

    let ue_index = bench.cucp.created_ues()[0];
    let sink = bench.cucp.sink_for(ue_index).unwrap();
    assert_eq!(sink.ccch_count(), 0);
    let dcch = sink.dcch_messages();
    assert_eq!(dcch.len(), 1);
    assert_eq!(dcch[0].0, SrbId::Srb1);
}

#[tokio::test]
async fn test_missing_du_to_cu_container_drops_message() {
    init_test_logging();
    let bench = TestBench::new();

    let mut transfer = TestBench::initial_ul_rrc(9);
    transfer.du_to_cu_rrc_container = None;
    bench.f1ap.handle_pdu(F1apPdu::InitiatingMessage(
        InitiatingMessage::InitialUlRrcMessageTransfer(transfer),
    ));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(bench.f1ap.ue_count(), 0);
    assert!(bench.cucp.created_ues().is_empty());
}

#[tokio::test]
async fn test_registry_refusal_recycles_cu_ue_id() {
    init_test_logging();
    let bench = TestBench::new();

    bench.cucp.set_admission(false);
    bench.f1ap.handle_pdu(F1apPdu::InitiatingMessage(
        InitiatingMessage::InitialUlRrcMessageTransfer(TestBench::initial_ul_rrc(1)),
    ));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(bench.f1ap.ue_count(), 0);

    // The aborted admission must not leak its id: the next UE gets id 0.
    bench.cucp.set_admission(true);
    let (_, cu_ue_id) = bench.admit_ue(2).await;
    assert_eq!(cu_ue_id, GnbCuUeF1apId(0));
}

#[tokio::test]
async fn test_ul_rrc_transfer_delivered_to_sink() {
    init_test_logging();
    let bench = TestBench::new();
    let (ue_index, cu_ue_id) = bench.admit_ue(9).await;

    bench.f1ap.handle_pdu(F1apPdu::InitiatingMessage(
        InitiatingMessage::UlRrcMessageTransfer(UlRrcMessageTransfer {
            gnb_cu_ue_f1ap_id: cu_ue_id,
            gnb_du_ue_f1ap_id: GnbDuUeF1apId(9),
            srb_id: SrbId::Srb1,
            rrc_container: OctetString::from_slice(&[0xbe, 0xef]),
        }),
    ));

    let sink = bench.cucp.sink_for(ue_index).unwrap();
    integration_tests::wait_for_condition(
        || async { !sink.dcch_messages().is_empty() },
        integration_tests::DEFAULT_TEST_TIMEOUT,
        Duration::from_millis(20),
    )
    .await
    .expect("UL RRC message was not delivered");

    let dcch = sink.dcch_messages();
    assert_eq!(dcch[0].0, SrbId::Srb1);
    assert_eq!(dcch[0].1.data(), &[0xbe, 0xef]);
}

#[tokio::test]
async fn test_dl_rrc_transfer_carries_bound_ids() {
    init_test_logging();
    let bench = TestBench::new();
    let (ue_index, cu_ue_id) = bench.admit_ue(9).await;

    bench
        .f1ap
        .handle_dl_rrc_message(ue_index, SrbId::Srb1, OctetString::from_slice(&[0x01]));

    match bench.transport.expect_pdu().await {
        F1apPdu::InitiatingMessage(InitiatingMessage::DlRrcMessageTransfer(transfer)) => {
            assert_eq!(transfer.gnb_cu_ue_f1ap_id, cu_ue_id);
            assert_eq!(transfer.gnb_du_ue_f1ap_id, GnbDuUeF1apId(9));
            assert_eq!(transfer.old_gnb_du_ue_f1ap_id, None);
            assert_eq!(transfer.srb_id, SrbId::Srb1);
        }
        other => panic!("expected DlRrcMessageTransfer, got {other:?}"),
    }
}

#[tokio::test]
async fn test_reestablishment_surfaces_old_du_id_once() {
    init_test_logging();
    let bench = TestBench::new();

    let (old_ue, _) = bench.admit_ue(1).await;
    let (new_ue, _) = bench.admit_ue(2).await;
    assert_eq!(bench.f1ap.ue_count(), 2);

    assert!(bench.f1ap.handle_ue_id_update(new_ue, old_ue));
    // Linking against an unknown predecessor must report failure.
    assert!(!bench.f1ap.handle_ue_id_update(new_ue, UeIndex::new(99)));

    // First DL transfer names the predecessor and retires its context.
    bench
        .f1ap
        .handle_dl_rrc_message(new_ue, SrbId::Srb1, OctetString::from_slice(&[0x02]));
    match bench.transport.expect_pdu().await {
        F1apPdu::InitiatingMessage(InitiatingMessage::DlRrcMessageTransfer(transfer)) => {
            assert_eq!(transfer.old_gnb_du_ue_f1ap_id, Some(GnbDuUeF1apId(1)));
        }
        other => panic!("expected DlRrcMessageTransfer, got {other:?}"),
    }
    assert_eq!(bench.f1ap.ue_count(), 1);
    assert!(bench.f1ap.ue_f1ap_ids(old_ue).is_none());

    // Second transfer no longer carries it.
    bench
        .f1ap
        .handle_dl_rrc_message(new_ue, SrbId::Srb1, OctetString::from_slice(&[0x03]));
    match bench.transport.expect_pdu().await {
        F1apPdu::InitiatingMessage(InitiatingMessage::DlRrcMessageTransfer(transfer)) => {
            assert_eq!(transfer.old_gnb_du_ue_f1ap_id, None);
        }
        other => panic!("expected DlRrcMessageTransfer, got {other:?}"),
    }
}

#[tokio::test]
async fn test_dl_rrc_for_unknown_ue_is_dropped() {
    init_test_logging();
    let bench = TestBench::new();

    bench.f1ap.handle_dl_rrc_message(
        UeIndex::new(99),
        SrbId::Srb1,
        OctetString::from_slice(&[0x01]),
    );

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(bench.transport.try_next_pdu().await.is_none());
}

#[tokio::test]
async fn test_paging_passthrough() {
    init_test_logging();
    let bench = TestBench::new();

    bench.f1ap.handle_paging(Paging {
        ue_identity_index: 17,
        paging_identity: OctetString::from_slice(&[0x05, 0x01]),
        paging_drx: None,
        paging_cells: vec![TestBench::cgi()],
    });

    match bench.transport.expect_pdu().await {
        F1apPdu::InitiatingMessage(InitiatingMessage::Paging(paging)) => {
            assert_eq!(paging.ue_identity_index, 17);
            assert_eq!(paging.paging_cells, vec![TestBench::cgi()]);
        }
        other => panic!("expected Paging, got {other:?}"),
    }
}
