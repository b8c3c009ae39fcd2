//! F1AP identifier types
//!
//! Each endpoint independently assigns its own UE F1AP id and learns the
//! peer's from the first message that carries it. The newtypes below keep
//! the two spaces from being mixed up.

use std::fmt;

/// UE identifier assigned by the gNB-CU, visible to the DU on the wire.
///
/// Unique among live UE contexts; immutable once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GnbCuUeF1apId(pub u64);

impl fmt::Display for GnbCuUeF1apId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cu_ue_f1ap_id={}", self.0)
    }
}

/// UE identifier assigned by the gNB-DU.
///
/// Learned from the first uplink message for a UE; immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GnbDuUeF1apId(pub u64);

impl fmt::Display for GnbDuUeF1apId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "du_ue_f1ap_id={}", self.0)
    }
}

/// Transaction identifier for non-UE-associated procedures.
///
/// The responder must echo it verbatim in the response or failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionId(pub u8);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transaction_id={}", self.0)
    }
}

/// Signalling radio bearer identifier (0..=3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SrbId {
    /// SRB0 - CCCH
    Srb0,
    /// SRB1 - DCCH
    Srb1,
    /// SRB2 - DCCH, lower priority
    Srb2,
    /// SRB3 - direct SN-terminated DCCH
    Srb3,
}

impl SrbId {
    /// Returns the numeric SRB id.
    pub fn value(&self) -> u8 {
        match self {
            SrbId::Srb0 => 0,
            SrbId::Srb1 => 1,
            SrbId::Srb2 => 2,
            SrbId::Srb3 => 3,
        }
    }

    /// Converts a numeric SRB id, if in range.
    pub fn from_value(v: u8) -> Option<Self> {
        match v {
            0 => Some(SrbId::Srb0),
            1 => Some(SrbId::Srb1),
            2 => Some(SrbId::Srb2),
            3 => Some(SrbId::Srb3),
            _ => None,
        }
    }
}

impl fmt::Display for SrbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "srb{}", self.value())
    }
}

/// Data radio bearer identifier (1..=32).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrbId(pub u8);

impl fmt::Display for DrbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "drb{}", self.0)
    }
}

/// NR Cell Global Identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NrCgi {
    /// PLMN identity, BCD-encoded MCC/MNC.
    pub plmn: [u8; 3],
    /// NR Cell Identity, 36 bits.
    pub nci: u64,
}

/// Largest value representable in the 36-bit NCI field.
pub const NCI_MAX: u64 = (1 << 36) - 1;

impl NrCgi {
    /// Returns true if the CGI is well-formed: a non-zero PLMN and an NCI
    /// that fits in 36 bits.
    pub fn is_valid(&self) -> bool {
        self.plmn != [0, 0, 0] && self.nci <= NCI_MAX
    }
}

impl fmt::Display for NrCgi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "plmn={:02x}{:02x}{:02x} nci={:#011x}",
            self.plmn[0], self.plmn[1], self.plmn[2], self.nci
        )
    }
}

/// F1AP cause values, grouped as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
    /// Radio network layer cause
    RadioNetwork(RadioNetworkCause),
    /// Transport layer cause
    Transport(TransportCause),
    /// Protocol cause
    Protocol(ProtocolCause),
    /// Miscellaneous cause
    Misc(MiscCause),
}

/// Radio-network-layer causes used by this CU-CP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioNetworkCause {
    /// Unspecified radio network failure
    Unspecified,
    /// No radio resources available in the target cell
    NoRadioResourcesAvailable,
    /// Radio link failure reported for the UE
    RlFailure,
    /// Release requested by upper layers
    NormalRelease,
    /// Unknown or already released F1AP UE id
    UnknownOrAlreadyAllocatedGnbCuUeF1apId,
    /// Interaction with other procedure
    InteractionWithOtherProcedure,
}

/// Transport-layer causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCause {
    /// Unspecified transport failure
    Unspecified,
    /// Transport resource unavailable
    TransportResourceUnavailable,
}

/// Protocol causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolCause {
    /// Unspecified protocol error
    Unspecified,
    /// Transfer syntax error
    TransferSyntaxError,
    /// Message not compatible with receiver state
    MessageNotCompatibleWithReceiverState,
}

/// Miscellaneous causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiscCause {
    /// Unspecified
    Unspecified,
    /// Control processing overload
    ControlProcessingOverload,
    /// Hardware failure
    HardwareFailure,
}
