//! UE Context Release integration tests

use integration_tests::{init_test_logging, wait_for_condition, TestBench, DEFAULT_TEST_TIMEOUT};

use f1cu_common::OctetString;
use f1cu_f1ap::ids::{Cause, GnbCuUeF1apId, GnbDuUeF1apId, RadioNetworkCause, SrbId};
use f1cu_f1ap::messages::{
    InitiatingMessage, SuccessfulOutcome, UeContextReleaseCommand, UeContextReleaseComplete,
    UeContextReleaseRequest,
};
use f1cu_f1ap::F1apPdu;

use std::time::Duration;

fn release_command(cu_ue_id: GnbCuUeF1apId, du_ue_id: u64) -> UeContextReleaseCommand {
    UeContextReleaseCommand {
        gnb_cu_ue_f1ap_id: cu_ue_id,
        gnb_du_ue_f1ap_id: GnbDuUeF1apId(du_ue_id),
        cause: Cause::RadioNetwork(RadioNetworkCause::NormalRelease),
        rrc_container: Some(OctetString::from_slice(&[0x28])),
        srb_id: Some(SrbId::Srb1),
    }
}

fn release_complete(cu_ue_id: GnbCuUeF1apId, du_ue_id: u64) -> F1apPdu {
    F1apPdu::SuccessfulOutcome(SuccessfulOutcome::UeContextReleaseComplete(
        UeContextReleaseComplete {
            gnb_cu_ue_f1ap_id: cu_ue_id,
            gnb_du_ue_f1ap_id: GnbDuUeF1apId(du_ue_id),
        },
    ))
}

#[tokio::test]
async fn test_cu_release_removes_context() {
    init_test_logging();
    let bench = TestBench::new();
    let (ue_index, cu_ue_id) = bench.admit_ue(9).await;

    let (released, _) = tokio::join!(
        bench.f1ap.ue_context_release(release_command(cu_ue_id, 9)),
        async {
            match bench.transport.expect_pdu().await {
                F1apPdu::InitiatingMessage(InitiatingMessage::UeContextReleaseCommand(cmd)) => {
                    assert_eq!(cmd.gnb_cu_ue_f1ap_id, cu_ue_id);
                    assert_eq!(cmd.srb_id, Some(SrbId::Srb1));
                }
                other => panic!("expected UeContextReleaseCommand, got {other:?}"),
            }
            bench.f1ap.handle_pdu(release_complete(cu_ue_id, 9));
        }
    );

    assert_eq!(released, Some(ue_index));
    assert_eq!(bench.f1ap.ue_count(), 0);
}

#[tokio::test]
async fn test_release_of_unknown_ue_returns_none() {
    init_test_logging();
    let bench = TestBench::new();

    let released = bench
        .f1ap
        .ue_context_release(release_command(GnbCuUeF1apId(5), 9))
        .await;

    assert_eq!(released, None);
    assert!(bench.transport.try_next_pdu().await.is_none());
}

#[tokio::test]
async fn test_second_release_is_idempotent() {
    init_test_logging();
    let bench = TestBench::new();
    let (ue_index, cu_ue_id) = bench.admit_ue(9).await;

    let (released, _) = tokio::join!(
        bench.f1ap.ue_context_release(release_command(cu_ue_id, 9)),
        async {
            bench.transport.expect_pdu().await;
            bench.f1ap.handle_pdu(release_complete(cu_ue_id, 9));
        }
    );
    assert_eq!(released, Some(ue_index));

    // The context is gone; a second command releases nothing and sends
    // nothing.
    let again = bench
        .f1ap
        .ue_context_release(release_command(cu_ue_id, 9))
        .await;
    assert_eq!(again, None);
    assert!(bench.transport.try_next_pdu().await.is_none());
}

#[tokio::test]
async fn test_concurrent_releases_release_once() {
    init_test_logging();
    let bench = TestBench::new();
    let (ue_index, cu_ue_id) = bench.admit_ue(9).await;

    let (first, second, _) = tokio::join!(
        bench.f1ap.ue_context_release(release_command(cu_ue_id, 9)),
        bench.f1ap.ue_context_release(release_command(cu_ue_id, 9)),
        async {
            // Exactly one command goes out.
            bench.transport.expect_pdu().await;
            bench.f1ap.handle_pdu(release_complete(cu_ue_id, 9));
        }
    );

    let mut results = [first, second];
    results.sort();
    assert_eq!(results, [None, Some(ue_index)]);
    assert_eq!(bench.f1ap.ue_count(), 0);
    assert!(bench.transport.try_next_pdu().await.is_none());
}

#[tokio::test]
async fn test_release_timeout_still_removes_context() {
    init_test_logging();
    let bench = TestBench::with_timeout_ms(50);
    let (ue_index, cu_ue_id) = bench.admit_ue(9).await;

    let released = bench
        .f1ap
        .ue_context_release(release_command(cu_ue_id, 9))
        .await;

    assert_eq!(released, Some(ue_index));
    assert_eq!(bench.f1ap.ue_count(), 0);
}

#[tokio::test]
async fn test_du_release_request_forwarded() {
    init_test_logging();
    let bench = TestBench::new();
    let (ue_index, cu_ue_id) = bench.admit_ue(9).await;

    bench.f1ap.handle_pdu(F1apPdu::InitiatingMessage(
        InitiatingMessage::UeContextReleaseRequest(UeContextReleaseRequest {
            gnb_cu_ue_f1ap_id: cu_ue_id,
            gnb_du_ue_f1ap_id: GnbDuUeF1apId(9),
            cause: Cause::RadioNetwork(RadioNetworkCause::RlFailure),
        }),
    ));

    wait_for_condition(
        || async { !bench.cucp.release_requests().is_empty() },
        DEFAULT_TEST_TIMEOUT,
        Duration::from_millis(20),
    )
    .await
    .expect("release request was not forwarded");

    let requests = bench.cucp.release_requests();
    assert_eq!(requests[0].ue_index, ue_index);
    assert_eq!(
        requests[0].cause,
        Cause::RadioNetwork(RadioNetworkCause::RlFailure)
    );
}

#[tokio::test]
async fn test_du_release_request_during_release_is_ignored() {
    init_test_logging();
    let bench = TestBench::new();
    let (_ue_index, cu_ue_id) = bench.admit_ue(9).await;

    let (released, _) = tokio::join!(
        bench.f1ap.ue_context_release(release_command(cu_ue_id, 9)),
        async {
            bench.transport.expect_pdu().await;

            // DU asks for release while the CU's own release is in flight.
            bench.f1ap.handle_pdu(F1apPdu::InitiatingMessage(
                InitiatingMessage::UeContextReleaseRequest(UeContextReleaseRequest {
                    gnb_cu_ue_f1ap_id: cu_ue_id,
                    gnb_du_ue_f1ap_id: GnbDuUeF1apId(9),
                    cause: Cause::RadioNetwork(RadioNetworkCause::RlFailure),
                }),
            ));
            tokio::time::sleep(Duration::from_millis(50)).await;
            assert!(bench.cucp.release_requests().is_empty());

            bench.f1ap.handle_pdu(release_complete(cu_ue_id, 9));
        }
    );

    assert!(released.is_some());
    assert!(bench.cucp.release_requests().is_empty());
}

#[tokio::test]
async fn test_du_release_request_for_unknown_ue_dropped() {
    init_test_logging();
    let bench = TestBench::new();

    bench.f1ap.handle_pdu(F1apPdu::InitiatingMessage(
        InitiatingMessage::UeContextReleaseRequest(UeContextReleaseRequest {
            gnb_cu_ue_f1ap_id: GnbCuUeF1apId(77),
            gnb_du_ue_f1ap_id: GnbDuUeF1apId(9),
            cause: Cause::RadioNetwork(RadioNetworkCause::RlFailure),
        }),
    ));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(bench.cucp.release_requests().is_empty());
}
