//! Reading aggregation.
//!
//! Classified readings overwrite their per-sensor slot; every third
//! reading (counted across all sensor types) the whole record flushes to
//! the indicator.  Slots persist across flushes so a slow sensor keeps
//! its last band lit; a session reset clears everything.

use crate::link::message::SensorTag;

use super::classify::Band;

/// Readings per indicator flush.
pub const BATCH_SIZE: u8 = 3;

/// One indicator band per sensor slot, indexed by
/// [`SensorTag::sensor_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggregatedRecord {
    pub slots: [Band; 3],
}

impl AggregatedRecord {
    /// Band currently held for `tag`, if it names a sensor.
    pub fn band_for(&self, tag: SensorTag) -> Option<Band> {
        tag.sensor_index().map(|i| self.slots[i])
    }
}

/// Batching accumulator between classification and the indicator.
#[derive(Debug, Default)]
pub struct Aggregator {
    record: AggregatedRecord,
    pending: u8,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one classified reading in; returns the record snapshot when
    /// this reading completes a batch.
    pub fn push(&mut self, tag: SensorTag, band: Band) -> Option<AggregatedRecord> {
        let idx = tag.sensor_index()?;
        self.record.slots[idx] = band;
        self.pending += 1;
        if self.pending == BATCH_SIZE {
            self.pending = 0;
            Some(self.record)
        } else {
            None
        }
    }

    /// Readings received since the last flush.
    pub fn pending(&self) -> u8 {
        self.pending
    }

    /// Drop all accumulated state (session teardown).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
