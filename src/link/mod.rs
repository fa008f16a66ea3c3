//! Sensor-link protocol layer.
//!
//! ```text
//!   bytes ──▶ FrameDecoder ──▶ Message ──▶ peer state machine
//!   peer  ──▶ encode_*     ──▶ bytes   ──▶ ByteTransport
//! ```
//!
//! Two codecs live here: the checksummed ASCII sensor-link frame codec
//! ([`codec`]) and the lower-assurance host command line codec ([`host`]).
//! [`transport`] defines the byte-channel boundary and [`io_task`] holds
//! the pump tasks that bridge transports to the bounded channels.

pub mod codec;
pub mod host;
pub mod io_task;
pub mod message;
pub mod transport;

pub use codec::{FrameBuf, FrameDecoder};
pub use host::{HostCommand, HostLineDecoder};
pub use io_task::OutboundLink;
pub use message::{Message, MessageKind, ScaledReading, SensorTag};
pub use transport::ByteTransport;
