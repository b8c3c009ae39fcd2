//! Octet string container
//!
//! RRC containers cross the F1 interface as opaque byte strings. This type
//! owns such a payload and provides hex formatting for protocol logs.

use std::fmt;

/// An owned, opaque octet string.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct OctetString {
    data: Vec<u8>,
}

impl OctetString {
    /// Creates an empty octet string.
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Creates an octet string by copying the given slice.
    pub fn from_slice(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    /// Returns the underlying bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the length in octets.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the octet string is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consumes self, returning the underlying vector.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl fmt::Debug for OctetString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OctetString[{}](", self.data.len())?;
        // Long payloads are truncated in logs.
        let shown = self.data.len().min(16);
        for b in &self.data[..shown] {
            write!(f, "{b:02x}")?;
        }
        if self.data.len() > shown {
            write!(f, "..")?;
        }
        write!(f, ")")
    }
}
