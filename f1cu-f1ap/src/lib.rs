//! F1AP (F1 Application Protocol) message model
//!
//! Typed representations of the F1AP procedures exchanged between a CU-CP
//! and a gNB-DU, per 3GPP TS 38.473. The bit-level ASN.1 codec lives below
//! the transport notifier; this crate only models message content.
//!
//! # Modules
//!
//! - `ids` - F1AP identifier types and validation
//! - `messages` - Per-procedure message structs and the closed PDU enums

pub mod ids;
pub mod messages;

pub use ids::{Cause, DrbId, GnbCuUeF1apId, GnbDuUeF1apId, NrCgi, SrbId, TransactionId};
pub use messages::F1apPdu;
