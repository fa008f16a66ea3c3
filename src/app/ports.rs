//! Port traits — the seams between the pure state machines and the
//! outside world.  Production wiring binds them to the loopback link and
//! the logging indicator; tests bind recorder mocks.

use crate::error::LinkError;
use crate::link::message::SensorTag;
use crate::pipeline::aggregate::AggregatedRecord;
use crate::pipeline::classify::Band;

use super::events::AppEvent;

/// Outbound half of a sensor-link endpoint.
///
/// Implementations queue the encoded frame; transmission happens when
/// the owning task next flushes.  Frames carrying [`SensorTag::None`]
/// are never produced, so encoding cannot fail for a valid call.
pub trait LinkPort {
    /// Queue an enable command (id 0) for `tag`, carrying the report
    /// period in milliseconds.
    fn send_enable(&mut self, tag: SensorTag, period_ms: u32) -> Result<(), LinkError>;
    /// Queue the session reset command, addressed to the platform as a
    /// whole (id 0, empty payload, controller tag).
    fn send_reset(&mut self) -> Result<(), LinkError>;
    /// Queue an acknowledgment (id 1, empty payload) from `tag`.
    fn send_ack(&mut self, tag: SensorTag) -> Result<(), LinkError>;
    /// Queue a data report (id 3) from `tag`.
    fn send_data(&mut self, tag: SensorTag, value: u32) -> Result<(), LinkError>;
}

/// Water-quality indicator bank, one lamp per sensor slot.
///
/// Both entry points are fire-and-forget and idempotent under repeated
/// identical input.
pub trait IndicatorPort {
    /// Drive one lamp from a single classified reading.
    fn apply(&mut self, tag: SensorTag, band: Band);
    /// Drive the lamps to the bands in a flushed record.
    fn apply_record(&mut self, record: &AggregatedRecord);
    /// Extinguish every lamp.
    fn all_off(&mut self);
}

/// Source of raw sensor samples, already wire-scaled.
pub trait ReadingSource {
    /// Sample the sensor identified by `tag`.  `None` for non-sensor tags.
    fn sample(&mut self, tag: SensorTag) -> Option<u32>;
}

/// Receiver for application lifecycle events.
pub trait EventSink {
    fn emit(&mut self, event: AppEvent);
}
