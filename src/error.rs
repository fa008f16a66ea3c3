//! Unified error types for the AquaSense link.
//!
//! The protocol layer is deliberately silent about most failures: a
//! malformed or corrupt frame is dropped and the sensors re-report on
//! their next period.  Typed errors therefore only surface at the
//! transport boundary, where a broken byte channel is fatal for the
//! owning pump task.  All variants are `Copy` so they can be passed
//! around without allocation.

use core::fmt;

/// Errors from a [`ByteTransport`](crate::link::ByteTransport).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The peer end of the transport has gone away.
    TransportClosed,
    /// The transport rejected a write (buffer exhausted or line down).
    WriteFailed,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransportClosed => write!(f, "transport closed"),
            Self::WriteFailed => write!(f, "transport write failed"),
        }
    }
}

impl core::error::Error for LinkError {}
