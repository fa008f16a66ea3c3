//! Transport abstraction — any byte-oriented duplex channel.
//!
//! Concrete implementations in the field are serial lines; the in-memory
//! [`PipeEnd`] here backs the loopback simulation and the test suites.
//! The codecs and pump tasks are generic over [`ByteTransport`], so a new
//! transport requires zero changes to the protocol logic.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::error::LinkError;

/// Byte-oriented duplex transport.
///
/// `read_byte` blocks (suspends the calling task) until a byte arrives —
/// that suspension is the dominant idle state of every pump task.
pub trait ByteTransport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read the next byte, suspending until one is available.
    async fn read_byte(&mut self) -> Result<u8, Self::Error>;

    /// Write all of `bytes`, suspending if the line is backpressured.
    async fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// Depth of one direction of an in-memory byte pipe.
pub const PIPE_DEPTH: usize = 256;

/// One direction of an in-memory serial line.
pub type BytePipe = Channel<CriticalSectionRawMutex, u8, PIPE_DEPTH>;

/// One endpoint of an in-memory duplex pipe.
///
/// `Copy` so the read half (pump task) and write half (state-machine
/// task) can each hold their own handle; the single-reader/single-writer
/// discipline is by construction of the task topology, not enforced here.
#[derive(Clone, Copy)]
pub struct PipeEnd {
    rx: &'static BytePipe,
    tx: &'static BytePipe,
}

/// Build both endpoints of a duplex link from two directional pipes.
pub fn duplex(a_to_b: &'static BytePipe, b_to_a: &'static BytePipe) -> (PipeEnd, PipeEnd) {
    (
        PipeEnd { rx: b_to_a, tx: a_to_b },
        PipeEnd { rx: a_to_b, tx: b_to_a },
    )
}

impl ByteTransport for PipeEnd {
    type Error = LinkError;

    async fn read_byte(&mut self) -> Result<u8, LinkError> {
        Ok(self.rx.receive().await)
    }

    async fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        for &b in bytes {
            self.tx.send(b).await;
        }
        Ok(())
    }
}
