//! Bounded channel topology.
//!
//! ```text
//!   link rx pump ──▶ CONTROLLER_FRAMES ──▶ controller task
//!   link rx pump ──▶ PLATFORM_FRAMES   ──▶ platform task
//!   host rx pump ──▶ HOST_COMMANDS     ──▶ controller task
//!   controller   ──▶ PIPELINE          ──▶ pipeline task
//! ```
//!
//! Every channel has exactly one producer task and one consumer task.
//! Producers use `try_send`: when a consumer stalls and a queue fills,
//! the newest item is dropped with a warning rather than blocking the
//! link pump.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::link::host::HostCommand;
use crate::link::message::{Message, ScaledReading};

/// Depth of every inter-task queue.
pub const QUEUE_DEPTH: usize = 80;

/// Decoded sensor-link frames bound for a peer state machine.
pub type FrameChannel = Channel<CriticalSectionRawMutex, Message, QUEUE_DEPTH>;

/// Parsed host commands bound for the controller.
pub type HostChannel = Channel<CriticalSectionRawMutex, HostCommand, QUEUE_DEPTH>;

/// Controller output bound for the classification pipeline.
pub type PipelineChannel = Channel<CriticalSectionRawMutex, PipelineMsg, QUEUE_DEPTH>;

/// What the controller hands to the pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineMsg {
    /// An accepted data report, already provenance-tagged.
    Reading(ScaledReading),
    /// Session teardown: drop partial aggregation state and clear
    /// indicators.  Routed through this channel so the pipeline task
    /// stays the sole writer of indicator state.
    Deassert,
}

pub static CONTROLLER_FRAMES: FrameChannel = Channel::new();
pub static PLATFORM_FRAMES: FrameChannel = Channel::new();
pub static HOST_COMMANDS: HostChannel = Channel::new();
pub static PIPELINE: PipelineChannel = Channel::new();
