//! Protocol message types shared by both endpoints.

/// Identifies the origin or target of a frame on the sensor link.
///
/// `None` is the sentinel for an unrecognized 5-character wire tag; it is
/// never transmitted and both endpoints ignore messages carrying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SensorTag {
    #[default]
    None,
    Controller,
    Turbidity,
    Microplastic,
    DOLevel,
}

impl SensorTag {
    /// The three physical sensor types, in slot order.
    pub const SENSORS: [SensorTag; 3] = [
        SensorTag::Turbidity,
        SensorTag::Microplastic,
        SensorTag::DOLevel,
    ];

    /// Map a 5-character wire tag to its identity.
    pub fn from_wire(tag: &[u8]) -> Self {
        match tag {
            b"CNTRL" => Self::Controller,
            b"TURBD" => Self::Turbidity,
            b"MCRPL" => Self::Microplastic,
            b"DOLEV" => Self::DOLevel,
            _ => Self::None,
        }
    }

    /// The 5-character wire tag, if this identity can appear on the wire.
    pub fn wire(self) -> Option<&'static str> {
        match self {
            Self::Controller => Some("CNTRL"),
            Self::Turbidity => Some("TURBD"),
            Self::Microplastic => Some("MCRPL"),
            Self::DOLevel => Some("DOLEV"),
            Self::None => None,
        }
    }

    /// Slot index for per-sensor bookkeeping (ack flags, record slots).
    pub fn sensor_index(self) -> Option<usize> {
        match self {
            Self::Turbidity => Some(0),
            Self::Microplastic => Some(1),
            Self::DOLevel => Some(2),
            Self::Controller | Self::None => None,
        }
    }

    /// Whether this tag names one of the three physical sensors.
    pub fn is_sensor(self) -> bool {
        self.sensor_index().is_some()
    }
}

/// Semantic meaning of the message-id field.
///
/// Id 2 is reserved and decodes to no kind; such frames are carried but
/// ignored by both endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Enable / reset command (id 0).
    Command,
    /// Acknowledgment that a command took effect (id 1).
    Ack,
    /// Periodic data report (id 3).
    Data,
}

impl MessageKind {
    pub const fn id(self) -> u8 {
        match self {
            Self::Command => 0,
            Self::Ack => 1,
            Self::Data => 3,
        }
    }

    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Command),
            1 => Some(Self::Ack),
            3 => Some(Self::Data),
            _ => None,
        }
    }
}

/// A decoded protocol unit.
///
/// Constructed empty when the decoder sees a frame start and handed off
/// by value once complete.  `ready` is only ever set together with
/// `checksum_valid`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Message {
    pub tag: SensorTag,
    /// Message id, 0..=99 (two wire digits).
    pub message_id: u8,
    /// Numeric payload magnitude, 0..=99_999_999 (eight wire digits).
    pub params: u32,
    /// Checksum value as carried in the frame.
    pub checksum: u8,
    /// True when `checksum` matched the running accumulator.
    pub checksum_valid: bool,
    /// True when the frame decoded completely and passed verification.
    pub ready: bool,
}

impl Message {
    /// Semantic kind of this message, if the id maps to one.
    pub fn kind(&self) -> Option<MessageKind> {
        MessageKind::from_id(self.message_id)
    }
}

/// A data-report payload re-tagged with its provenance, produced by the
/// controller once per accepted data frame and consumed by the
/// classification stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaledReading {
    pub tag: SensorTag,
    /// Wire-scaled integer value (physical x100 for turbidity and DO).
    pub value: u32,
}
