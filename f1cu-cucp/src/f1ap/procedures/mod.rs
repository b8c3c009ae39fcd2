//! F1AP CU-side procedures
//!
//! Multi-step procedures initiated by this CU-CP. Each one runs on the
//! caller's task: it takes the target UE's lane, arms the matching event
//! slot, hands the request PDU to the transport notifier and suspends until
//! the dispatcher resolves the slot or the response deadline passes.

pub mod f1_setup;
pub mod ue_context_modification;
pub mod ue_context_release;
pub mod ue_context_setup;

pub use f1_setup::*;
pub use ue_context_modification::*;
pub use ue_context_release::*;
pub use ue_context_setup::*;

use std::fmt;

/// Lifecycle of a procedure task, logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcedureState {
    /// Built, request not yet sent
    Created,
    /// Request sent, suspended on the event slot
    AwaitingResponse,
    /// Terminated with an outcome
    Completed,
    /// Terminated because the UE context was removed underneath it
    Cancelled,
}

impl fmt::Display for ProcedureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcedureState::Created => write!(f, "created"),
            ProcedureState::AwaitingResponse => write!(f, "awaiting-response"),
            ProcedureState::Completed => write!(f, "completed"),
            ProcedureState::Cancelled => write!(f, "cancelled"),
        }
    }
}
