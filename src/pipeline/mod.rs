//! Classification / aggregation pipeline.
//!
//! Consumes the controller's pipeline channel and drives the indicator.
//! The stage itself is synchronous; [`task`] wraps it in the channel
//! loop and supplies the controller-state gate.

pub mod aggregate;
pub mod classify;
pub mod task;

use log::{debug, info};

use crate::app::ports::IndicatorPort;
use crate::channels::PipelineMsg;
use crate::link::message::SensorTag;

pub use aggregate::{AggregatedRecord, Aggregator, BATCH_SIZE};
pub use classify::{classify, physical, Band};

/// The pipeline stage: classify, aggregate, flush.
#[derive(Debug, Default)]
pub struct PipelineStage {
    aggregator: Aggregator,
}

impl PipelineStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one pipeline message.
    ///
    /// `gate_open` reflects whether the controller is in its telemetry
    /// state; flushed records are suppressed while it is not, so a stale
    /// batch can never light the lamps mid-teardown.
    pub fn handle(
        &mut self,
        msg: PipelineMsg,
        gate_open: bool,
        indicator: &mut impl IndicatorPort,
    ) {
        match msg {
            PipelineMsg::Reading(reading) => {
                let band = classify(reading.tag, reading.value);
                debug!(
                    "classified {:?} {} -> {band:?}",
                    reading.tag,
                    physical(reading.tag, reading.value)
                );
                if gate_open {
                    indicator.apply(reading.tag, band);
                }
                if let Some(record) = self.aggregator.push(reading.tag, band) {
                    if gate_open {
                        indicator.apply_record(&record);
                    } else {
                        debug!("record flush suppressed outside telemetry state");
                    }
                }
            }
            PipelineMsg::Deassert => {
                self.aggregator.reset();
                indicator.all_off();
            }
        }
    }
}

/// Indicator that reports band records on the log, used by the loopback
/// binary in place of real lamps.
#[derive(Debug, Default)]
pub struct LogIndicator;

impl IndicatorPort for LogIndicator {
    fn apply(&mut self, tag: SensorTag, band: Band) {
        debug!("indicator: {tag:?} -> {band:?}");
    }

    fn apply_record(&mut self, record: &AggregatedRecord) {
        info!(
            "indicator: turbidity={:?} microplastic={:?} do={:?}",
            record.slots[0], record.slots[1], record.slots[2]
        );
    }

    fn all_off(&mut self) {
        info!("indicator: all off");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::message::{ScaledReading, SensorTag};

    #[derive(Debug, Default)]
    struct RecordingIndicator {
        applies: std::vec::Vec<(SensorTag, Band)>,
        records: std::vec::Vec<AggregatedRecord>,
        all_off_calls: usize,
    }

    impl IndicatorPort for RecordingIndicator {
        fn apply(&mut self, tag: SensorTag, band: Band) {
            self.applies.push((tag, band));
        }

        fn apply_record(&mut self, record: &AggregatedRecord) {
            self.records.push(*record);
        }

        fn all_off(&mut self) {
            self.all_off_calls += 1;
        }
    }

    fn reading(tag: SensorTag, value: u32) -> PipelineMsg {
        PipelineMsg::Reading(ScaledReading { tag, value })
    }

    #[test]
    fn third_reading_flushes_record() {
        let mut stage = PipelineStage::new();
        let mut indicator = RecordingIndicator::default();

        stage.handle(reading(SensorTag::Turbidity, 500), true, &mut indicator);
        stage.handle(reading(SensorTag::Microplastic, 1_000), true, &mut indicator);
        assert!(indicator.records.is_empty());

        stage.handle(reading(SensorTag::DOLevel, 300), true, &mut indicator);
        assert_eq!(indicator.records.len(), 1);
        assert_eq!(
            indicator.records[0].slots,
            [Band::Green, Band::Yellow, Band::Red]
        );

        // Every reading also drove its own lamp immediately.
        assert_eq!(
            indicator.applies,
            [
                (SensorTag::Turbidity, Band::Green),
                (SensorTag::Microplastic, Band::Yellow),
                (SensorTag::DOLevel, Band::Red),
            ]
        );
    }

    #[test]
    fn closed_gate_suppresses_flush() {
        let mut stage = PipelineStage::new();
        let mut indicator = RecordingIndicator::default();

        for _ in 0..3 {
            stage.handle(reading(SensorTag::Turbidity, 500), false, &mut indicator);
        }
        assert!(indicator.records.is_empty());
        assert!(indicator.applies.is_empty());
    }

    #[test]
    fn deassert_clears_and_extinguishes() {
        let mut stage = PipelineStage::new();
        let mut indicator = RecordingIndicator::default();

        stage.handle(reading(SensorTag::Turbidity, 500), true, &mut indicator);
        stage.handle(reading(SensorTag::Microplastic, 100), true, &mut indicator);
        stage.handle(PipelineMsg::Deassert, true, &mut indicator);
        assert_eq!(indicator.all_off_calls, 1);

        // The interrupted batch is gone; a fresh one takes three readings.
        stage.handle(reading(SensorTag::DOLevel, 800), true, &mut indicator);
        stage.handle(reading(SensorTag::DOLevel, 800), true, &mut indicator);
        assert!(indicator.records.is_empty());
        stage.handle(reading(SensorTag::DOLevel, 800), true, &mut indicator);
        assert_eq!(indicator.records.len(), 1);
        assert_eq!(
            indicator.records[0].slots,
            [Band::Uninitialized, Band::Uninitialized, Band::Green]
        );
    }
}
