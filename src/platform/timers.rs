//! Restartable periodic timers, one per sensor slot.
//!
//! Deadlines are absolute [`Instant`]s so the platform task can sleep
//! with `Timer::at` on the earliest one and multiplex that against frame
//! arrival.  The set is pure bookkeeping; callers supply `now`.

use embassy_time::{Duration, Instant};
use log::warn;

use crate::link::message::SensorTag;

#[derive(Debug, Clone, Copy)]
struct SlotTimer {
    deadline: Option<Instant>,
    period: Duration,
}

impl Default for SlotTimer {
    fn default() -> Self {
        Self {
            deadline: None,
            period: Duration::from_ticks(0),
        }
    }
}

/// The three sensor report timers.
#[derive(Debug, Default)]
pub struct SensorTimers {
    slots: [SlotTimer; 3],
}

impl SensorTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)start the timer for `tag` with a new period.  A zero period is
    /// clamped to 1 ms so a malformed enable cannot wedge the task in a
    /// zero-delay loop.
    pub fn start(&mut self, tag: SensorTag, period_ms: u32, now: Instant) {
        let Some(idx) = tag.sensor_index() else {
            return;
        };
        let period_ms = if period_ms == 0 {
            warn!("{tag:?}: zero report period clamped to 1 ms");
            1
        } else {
            period_ms
        };
        let period = Duration::from_millis(period_ms.into());
        self.slots[idx] = SlotTimer {
            deadline: Some(now + period),
            period,
        };
    }

    /// Stop every timer (session teardown).
    pub fn stop_all(&mut self) {
        self.slots = [SlotTimer::default(); 3];
    }

    /// Earliest pending deadline, if any timer is running.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.slots.iter().filter_map(|s| s.deadline).min()
    }

    /// First timer whose deadline has passed.
    pub fn expired(&self, now: Instant) -> Option<SensorTag> {
        SensorTag::SENSORS.into_iter().find(|tag| {
            let idx = tag.sensor_index().unwrap_or(0);
            self.slots[idx].deadline.is_some_and(|d| d <= now)
        })
    }

    /// Rearm `tag` one period past `now`.
    pub fn acknowledge(&mut self, tag: SensorTag, now: Instant) {
        let Some(idx) = tag.sensor_index() else {
            return;
        };
        let slot = &mut self.slots[idx];
        if slot.deadline.is_some() {
            slot.deadline = Some(now + slot.period);
        }
    }
}
