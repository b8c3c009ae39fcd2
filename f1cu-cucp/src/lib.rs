//! F1AP session-management engine (CU-CP side)
//!
//! This crate drives the CU-CP end of the F1 interface: it owns the
//! authoritative mapping between the CU- and DU-assigned UE identifiers,
//! runs the multi-step UE context procedures (setup, modification, release)
//! as cancellable async tasks, and dispatches inbound F1AP messages to the
//! correct per-UE state or in-flight procedure.
//!
//! # Architecture
//!
//! ```text
//! wire transport ---> F1apCu::handle_pdu ---> F1AP task (serializing actor)
//!                                                |
//!                     +--------------------------+--------------------+
//!                     |                          |                    |
//!              event slot resolve       stateless handlers      spawned procedure
//!              (in-flight procedure)    (admission, UL RRC,     tasks (setup/mod/
//!                                        F1 setup, removal)      release, per-UE lane)
//! ```
//!
//! All mutable state lives in the [`f1ap::ue_context::UeContextTable`];
//! inbound messages pass through a single mpsc-fed actor per protocol
//! instance, and procedures targeting the same UE queue behind a per-UE
//! lane so they never interleave.

pub mod config;
pub mod f1ap;
pub mod notifiers;
pub mod tasks;

pub use config::F1cuConfig;
pub use f1ap::F1apCu;
