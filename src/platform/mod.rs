//! Platform-side endpoint: answers commands, reports telemetry.
//!
//! Dispatch is keyed on `(tag, message id)` of each validated frame.
//! Everything here is synchronous; [`task`] supplies the channel loop
//! and the timer multiplexing.

pub mod task;
pub mod timers;

use embassy_time::Instant;
use log::{debug, info};

use crate::app::ports::{LinkPort, ReadingSource};
use crate::error::LinkError;
use crate::link::message::{Message, MessageKind, SensorTag};

pub use timers::SensorTimers;

/// The platform machine: timer bookkeeping plus frame dispatch.
#[derive(Debug, Default)]
pub struct Platform {
    timers: SensorTimers,
}

impl Platform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timers(&self) -> &SensorTimers {
        &self.timers
    }

    /// Dispatch one validated frame.
    ///
    /// Commands addressed to a sensor (re)start its report timer with
    /// the period carried in the payload; a command addressed to the
    /// controller tag tears the whole session down.  Both are
    /// acknowledged.  Ack and data frames are not ours to answer.
    pub fn handle_frame(
        &mut self,
        msg: Message,
        now: Instant,
        link: &mut impl LinkPort,
    ) -> Result<(), LinkError> {
        match (msg.tag, msg.kind()) {
            (SensorTag::Controller, Some(MessageKind::Command)) => {
                info!("platform: session reset, stopping all timers");
                self.timers.stop_all();
                link.send_ack(SensorTag::Controller)?;
            }
            (tag, Some(MessageKind::Command)) if tag.is_sensor() => {
                info!("platform: {tag:?} enabled, period {} ms", msg.params);
                self.timers.start(tag, msg.params, now);
                link.send_ack(tag)?;
            }
            (tag, kind) => debug!("platform: ignoring {kind:?} from {tag:?}"),
        }
        Ok(())
    }

    /// Service every expired timer: sample the sensor, queue a data
    /// frame, rearm.  Sends are fire-and-forget.
    pub fn on_timer(
        &mut self,
        now: Instant,
        source: &mut impl ReadingSource,
        link: &mut impl LinkPort,
    ) -> Result<(), LinkError> {
        while let Some(tag) = self.timers.expired(now) {
            if let Some(value) = source.sample(tag) {
                link.send_data(tag, value)?;
            }
            self.timers.acknowledge(tag, now);
        }
        Ok(())
    }
}
