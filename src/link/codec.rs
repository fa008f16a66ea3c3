//! Sensor-link frame codec.
//!
//! Wire format (ASCII, newline terminated):
//! ```text
//! ┌───┬────────┬───┬─────────┬───┬──────────┬───┬───┬───┬────────┬────┐
//! │ $ │ TAG(5) │ , │ ID(1-2) │ , │ PRM(0-8) │ , │ * │ , │ CS(2h) │ \n │
//! └───┴────────┴───┴─────────┴───┴──────────┴───┴───┴───┴────────┴────┘
//! ```
//!
//! The checksum is the running XOR of every byte from `'$'` through the
//! comma immediately preceding the checksum field, inclusive.  The decoder
//! consumes one byte at a time so it can operate incrementally on a live
//! stream — a single transport read may deliver part of a field, or
//! several frames back to back.
//!
//! A `'$'` at any point pre-empts whatever is in flight: the in-progress
//! message is discarded and parsing restarts at the tag field.

use heapless::{String, Vec};
use log::debug;

use super::message::{Message, MessageKind, SensorTag};

/// Maximum encoded frame length ("$TURBD,99,99999999,*,ff\n" is 24 bytes).
pub const FRAME_MAX: usize = 32;

/// Digits accepted into the message-id field; extras are consumed but dropped.
const MSG_ID_DIGITS: u8 = 2;

/// Digits accepted into the params field; extras are consumed but dropped.
const PARAM_DIGITS: u8 = 8;

/// An encoded frame ready for transmission.
pub type FrameBuf = Vec<u8, FRAME_MAX>;

/// Decoder state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    /// Discarding bytes until the next frame start.
    Waiting,
    /// Accumulating the 5-character sensor tag.
    SensorIdField,
    /// Accumulating message-id digits.
    MessageIdField,
    /// Accumulating params digits.
    ParamsField,
    /// Skipping the literal `'*'` up to its trailing comma.
    StarField,
    /// Accumulating the two checksum hex digits.
    ChecksumField,
}

/// Streaming frame decoder.
///
/// One instance per physical link, owned by the task that drains that
/// link's byte queue.  Never shared.
pub struct FrameDecoder {
    state: ParserState,
    message: Message,
    checksum_acc: u8,
    tag_buf: [u8; 5],
    tag_len: usize,
    id_digits: u8,
    param_digits: u8,
    cs_buf: [u8; 2],
    cs_len: usize,
    rejected: u32,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            state: ParserState::Waiting,
            message: Message::default(),
            checksum_acc: 0,
            tag_buf: [0; 5],
            tag_len: 0,
            id_digits: 0,
            param_digits: 0,
            cs_buf: [0; 2],
            cs_len: 0,
            rejected: 0,
        }
    }

    /// Feed one byte into the decoder.
    ///
    /// Returns `Some(message)` only when a frame completed *and* its
    /// checksum verified.  A fully parsed frame with a bad checksum is
    /// consumed, counted, and dropped — it is never yielded.
    pub fn push(&mut self, byte: u8) -> Option<Message> {
        // Frame start wins over everything, including an in-flight frame.
        if byte == b'$' {
            self.restart(byte);
            return None;
        }

        match self.state {
            ParserState::Waiting => {}

            ParserState::SensorIdField => {
                self.checksum_acc ^= byte;
                if byte == b',' {
                    self.state = ParserState::MessageIdField;
                } else if self.tag_len < self.tag_buf.len() {
                    self.tag_buf[self.tag_len] = byte;
                    self.tag_len += 1;
                    if self.tag_len == self.tag_buf.len() {
                        self.message.tag = SensorTag::from_wire(&self.tag_buf);
                        if self.message.tag == SensorTag::None {
                            // Unknown tag: abandon the frame outright.
                            self.state = ParserState::Waiting;
                        }
                    }
                }
            }

            ParserState::MessageIdField => {
                self.checksum_acc ^= byte;
                if byte == b',' {
                    self.state = ParserState::ParamsField;
                } else if byte.is_ascii_digit() {
                    if self.id_digits < MSG_ID_DIGITS {
                        self.message.message_id =
                            self.message.message_id * 10 + (byte - b'0');
                    }
                    self.id_digits += 1;
                }
            }

            ParserState::ParamsField => {
                self.checksum_acc ^= byte;
                if byte == b',' {
                    self.state = ParserState::StarField;
                } else if byte.is_ascii_digit() {
                    if self.param_digits < PARAM_DIGITS {
                        self.message.params =
                            self.message.params * 10 + u32::from(byte - b'0');
                    }
                    self.param_digits += 1;
                }
            }

            ParserState::StarField => {
                self.checksum_acc ^= byte;
                if byte == b',' {
                    self.state = ParserState::ChecksumField;
                }
            }

            ParserState::ChecksumField => {
                if self.cs_len < 2 {
                    self.cs_buf[self.cs_len] = byte;
                    self.cs_len += 1;
                }
                if self.cs_len == 2 {
                    self.state = ParserState::Waiting;
                    return self.verify();
                }
            }
        }

        None
    }

    /// Reset decoder state (e.g. after a transport reconnect).
    pub fn reset(&mut self) {
        self.restart(0);
        self.state = ParserState::Waiting;
    }

    /// Frames fully parsed but dropped on checksum mismatch.
    pub fn rejected(&self) -> u32 {
        self.rejected
    }

    // ── Internal ─────────────────────────────────────────────

    fn restart(&mut self, first_byte: u8) {
        self.state = ParserState::SensorIdField;
        self.message = Message::default();
        self.checksum_acc = first_byte;
        self.tag_len = 0;
        self.id_digits = 0;
        self.param_digits = 0;
        self.cs_len = 0;
    }

    fn verify(&mut self) -> Option<Message> {
        // Both hex digit cases are accepted; garbage parses as a mismatch.
        let carried = core::str::from_utf8(&self.cs_buf)
            .ok()
            .and_then(|s| u8::from_str_radix(s, 16).ok());

        self.message.checksum = carried.unwrap_or(0);
        if carried == Some(self.checksum_acc) {
            self.message.checksum_valid = true;
            self.message.ready = true;
            Some(core::mem::take(&mut self.message))
        } else {
            self.rejected = self.rejected.wrapping_add(1);
            debug!(
                "frame rejected: carried checksum {:02x?}, computed {:02x}",
                self.cs_buf, self.checksum_acc
            );
            self.message = Message::default();
            None
        }
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// Encoding
// ───────────────────────────────────────────────────────────────

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Render a frame for the given tag, message id, and optional payload.
///
/// Returns `None` for tags that cannot appear on the wire.  The params
/// field is eight zero-padded digits when present and empty otherwise
/// (ack and reset frames carry no payload).
pub fn encode_frame(tag: SensorTag, message_id: u8, params: Option<u32>) -> Option<FrameBuf> {
    use core::fmt::Write;

    let wire = tag.wire()?;
    let mut text: String<FRAME_MAX> = String::new();
    write!(text, "${},{:02},", wire, message_id).ok()?;
    if let Some(value) = params {
        write!(text, "{:08}", value).ok()?;
    }
    text.push_str(",*,00\n").ok()?;

    let mut buf: FrameBuf = Vec::from_slice(text.as_bytes()).ok()?;
    seal(&mut buf);
    Some(buf)
}

/// Data report: `$<TAG>,03,<value x8>,*,<cs>\n`.
pub fn encode_data(tag: SensorTag, value: u32) -> Option<FrameBuf> {
    encode_frame(tag, MessageKind::Data.id(), Some(value))
}

/// Enable command carrying the report period in milliseconds.
pub fn encode_enable(tag: SensorTag, period_ms: u32) -> Option<FrameBuf> {
    encode_frame(tag, MessageKind::Command.id(), Some(period_ms))
}

/// Acknowledgment frame with an empty payload field.
pub fn encode_ack(tag: SensorTag) -> Option<FrameBuf> {
    encode_frame(tag, MessageKind::Ack.id(), None)
}

/// Reset command addressed to the whole platform: `$CNTRL,00,,*,<cs>\n`.
pub fn encode_reset() -> FrameBuf {
    // Controller tag always encodes; the unwrap cannot fire.
    encode_frame(SensorTag::Controller, MessageKind::Command.id(), None)
        .unwrap_or_default()
}

/// Overwrite the checksum placeholder with the XOR of every byte from
/// `'$'` through the comma before the checksum field, inclusive.
fn seal(buf: &mut FrameBuf) {
    let n = buf.len();
    debug_assert!(n >= 4, "sealed frame must carry checksum and newline");
    let cs = buf[..n - 3].iter().fold(0u8, |acc, b| acc ^ b);
    buf[n - 3] = HEX[usize::from(cs >> 4)];
    buf[n - 2] = HEX[usize::from(cs & 0x0f)];
}
