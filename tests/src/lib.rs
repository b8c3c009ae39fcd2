//! Integration test framework for the f1cu CU-CP engine
#![allow(missing_docs)]
//!
//! Provides mock collaborators and utilities for exercising a full
//! `F1apCu` instance: a transport that captures outbound PDUs, a CU-CP
//! stand-in that plays the session registry and peer manager, and
//! per-UE RRC sinks that record deliveries.

pub mod mock_cucp;
pub mod test_utils;

pub use mock_cucp::{MockCuCp, MockTransport, RecordingRrc, TestBench};
pub use test_utils::{init_test_logging, wait_for_condition, TestResult, DEFAULT_TEST_TIMEOUT};
