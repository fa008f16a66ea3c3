//! Pump tasks and the outbound frame buffer.
//!
//! Receive side: one pump per link drains transport bytes through the
//! appropriate codec and forwards completed items to a bounded channel
//! with `try_send` — a full queue drops the newest item with a warning
//! instead of stalling the link.
//!
//! Transmit side: the state machines queue frames on an [`OutboundLink`]
//! synchronously; the owning task flushes the batch to the transport
//! between events.

use heapless::Vec;
use log::warn;

use crate::app::ports::LinkPort;
use crate::channels::{FrameChannel, HostChannel};
use crate::error::LinkError;

use super::codec::{self, FrameBuf, FrameDecoder};
use super::host::HostLineDecoder;
use super::message::SensorTag;
use super::transport::ByteTransport;

/// Frames an endpoint can stage between flushes.  A platform timer tick
/// produces at most one frame per sensor, so this never fills in practice.
pub const PENDING_CAP: usize = 8;

/// Outbound half of a link endpoint: encodes and stages frames for the
/// next flush.
#[derive(Debug, Default)]
pub struct OutboundLink {
    pending: Vec<FrameBuf, PENDING_CAP>,
}

impl OutboundLink {
    pub fn new() -> Self {
        Self::default()
    }

    fn stage(&mut self, frame: Option<FrameBuf>) -> Result<(), LinkError> {
        let frame = frame.ok_or(LinkError::WriteFailed)?;
        self.pending.push(frame).map_err(|_| LinkError::WriteFailed)
    }

    /// Write all staged frames to `transport` in FIFO order.
    pub async fn flush<T: ByteTransport>(&mut self, transport: &mut T) -> Result<(), T::Error> {
        for frame in &self.pending {
            transport.write_bytes(frame).await?;
        }
        self.pending.clear();
        Ok(())
    }

    /// Remove and return the staged frames without transmitting them.
    pub fn take_pending(&mut self) -> Vec<FrameBuf, PENDING_CAP> {
        core::mem::take(&mut self.pending)
    }
}

impl LinkPort for OutboundLink {
    fn send_enable(&mut self, tag: SensorTag, period_ms: u32) -> Result<(), LinkError> {
        self.stage(codec::encode_enable(tag, period_ms))
    }

    fn send_reset(&mut self) -> Result<(), LinkError> {
        self.stage(Some(codec::encode_reset()))
    }

    fn send_ack(&mut self, tag: SensorTag) -> Result<(), LinkError> {
        self.stage(codec::encode_ack(tag))
    }

    fn send_data(&mut self, tag: SensorTag, value: u32) -> Result<(), LinkError> {
        self.stage(codec::encode_data(tag, value))
    }
}

/// Drain sensor-link bytes into `out` forever.
pub async fn frame_pump<T: ByteTransport>(
    mut transport: T,
    out: &'static FrameChannel,
    label: &'static str,
) -> Result<(), T::Error> {
    let mut decoder = FrameDecoder::new();
    loop {
        let byte = transport.read_byte().await?;
        if let Some(msg) = decoder.push(byte) {
            if out.try_send(msg).is_err() {
                warn!("{label}: frame queue full, dropping {:?} frame", msg.tag);
            }
        }
    }
}

/// Drain host-link bytes into `out` forever.
pub async fn host_line_pump<T: ByteTransport>(
    mut transport: T,
    out: &'static HostChannel,
) -> Result<(), T::Error> {
    let mut decoder = HostLineDecoder::new();
    loop {
        let byte = transport.read_byte().await?;
        if let Some(cmd) = decoder.push(byte) {
            if out.try_send(cmd).is_err() {
                warn!("host: command queue full, dropping {cmd:?}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::host::HostCommand;
    use crate::link::message::MessageKind;
    use crate::link::transport::{duplex, BytePipe};
    use embassy_sync::channel::Channel;
    use futures_lite::future::{block_on, or};

    fn leak_pipe() -> &'static BytePipe {
        Box::leak(Box::new(Channel::new()))
    }

    #[test]
    fn outbound_stages_in_fifo_order() {
        let mut link = OutboundLink::new();
        link.send_enable(SensorTag::Turbidity, 1000).unwrap();
        link.send_data(SensorTag::DOLevel, 612).unwrap();
        link.send_reset().unwrap();

        let frames = link.take_pending();
        assert_eq!(frames.len(), 3);
        assert!(frames[0].starts_with(b"$TURBD,00,00001000,"));
        assert!(frames[1].starts_with(b"$DOLEV,03,"));
        assert!(frames[2].starts_with(b"$CNTRL,00,,"));
        assert!(link.take_pending().is_empty());
    }

    #[test]
    fn outbound_rejects_unaddressable_tag() {
        let mut link = OutboundLink::new();
        assert_eq!(
            link.send_enable(SensorTag::None, 1000),
            Err(LinkError::WriteFailed)
        );
        assert!(link.take_pending().is_empty());
    }

    #[test]
    fn flush_round_trips_through_decoder() {
        let (mut tx_end, mut rx_end) = duplex(leak_pipe(), leak_pipe());
        let mut link = OutboundLink::new();
        link.send_data(SensorTag::Microplastic, 312).unwrap();

        block_on(async {
            link.flush(&mut tx_end).await.unwrap();
            let mut decoder = FrameDecoder::new();
            loop {
                let byte = rx_end.read_byte().await.unwrap();
                if let Some(msg) = decoder.push(byte) {
                    assert_eq!(msg.tag, SensorTag::Microplastic);
                    assert_eq!(msg.kind(), Some(MessageKind::Data));
                    assert_eq!(msg.params, 312);
                    break;
                }
            }
        });
        assert!(link.take_pending().is_empty());
    }

    #[test]
    fn frame_pump_forwards_decoded_frames() {
        static FRAMES: FrameChannel = Channel::new();
        let (mut writer, reader) = duplex(leak_pipe(), leak_pipe());

        let msg = block_on(async {
            let mut link = OutboundLink::new();
            link.send_ack(SensorTag::Turbidity).unwrap();
            link.flush(&mut writer).await.unwrap();

            or(FRAMES.receive(), async {
                let _ = frame_pump(reader, &FRAMES, "test").await;
                unreachable!("pump never returns on a live pipe")
            })
            .await
        });
        assert_eq!(msg.tag, SensorTag::Turbidity);
        assert_eq!(msg.kind(), Some(MessageKind::Ack));
    }

    #[test]
    fn host_pump_forwards_commands() {
        static COMMANDS: HostChannel = Channel::new();
        let (mut writer, reader) = duplex(leak_pipe(), leak_pipe());

        let cmd = block_on(async {
            writer.write_bytes(b"junk\nSTART\n").await.unwrap();
            or(COMMANDS.receive(), async {
                let _ = host_line_pump(reader, &COMMANDS).await;
                unreachable!("pump never returns on a live pipe")
            })
            .await
        });
        assert_eq!(cmd, HostCommand::Start);
    }
}
