//! Per-sensor scaling and threshold banding.
//!
//! Wire values for turbidity and dissolved oxygen are physical x100;
//! microplastic counts travel in native units.  Banding happens on the
//! wire-scaled integers, so no float comparison sits on the hot path.

use crate::link::message::SensorTag;

/// Water-quality band for one sensor slot.
///
/// `Uninitialized` doubles as "no reading yet" and "reading outside every
/// band" (a sensor fault indication).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Band {
    #[default]
    Uninitialized,
    Red,
    Yellow,
    Green,
}

/// Divisor that maps a wire value back to physical units.
pub const fn scale_divisor(tag: SensorTag) -> u32 {
    match tag {
        SensorTag::Turbidity | SensorTag::DOLevel => 100,
        _ => 1,
    }
}

/// Wire value in physical units, for operator-facing output.
pub fn physical(tag: SensorTag, value: u32) -> f32 {
    value as f32 / scale_divisor(tag) as f32
}

/// Band a wire-scaled reading.
///
/// Thresholds in physical units:
///
/// | sensor                     | green   | yellow    | red         |
/// |----------------------------|---------|-----------|-------------|
/// | turbidity (NTU)            | [0,20]  | (20,50]   | (50,100]    |
/// | microplastic (particles/L) | [0,500] | (500,2000]| (2000,3000] |
/// | dissolved oxygen (mg/L)    | (7,10]  | [4,7]     | [0,4)       |
pub fn classify(tag: SensorTag, value: u32) -> Band {
    match tag {
        SensorTag::Turbidity => match value {
            0..=2_000 => Band::Green,
            2_001..=5_000 => Band::Yellow,
            5_001..=10_000 => Band::Red,
            _ => Band::Uninitialized,
        },
        SensorTag::Microplastic => match value {
            0..=500 => Band::Green,
            501..=2_000 => Band::Yellow,
            2_001..=3_000 => Band::Red,
            _ => Band::Uninitialized,
        },
        SensorTag::DOLevel => match value {
            0..=399 => Band::Red,
            400..=700 => Band::Yellow,
            701..=1_000 => Band::Green,
            _ => Band::Uninitialized,
        },
        SensorTag::Controller | SensorTag::None => Band::Uninitialized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turbidity_boundaries() {
        // Wire values are NTU x 100.
        assert_eq!(classify(SensorTag::Turbidity, 0), Band::Green);
        assert_eq!(classify(SensorTag::Turbidity, 2_000), Band::Green);
        assert_eq!(classify(SensorTag::Turbidity, 2_001), Band::Yellow);
        assert_eq!(classify(SensorTag::Turbidity, 5_000), Band::Yellow);
        assert_eq!(classify(SensorTag::Turbidity, 5_001), Band::Red);
        assert_eq!(classify(SensorTag::Turbidity, 10_000), Band::Red);
        assert_eq!(classify(SensorTag::Turbidity, 10_001), Band::Uninitialized);
    }

    #[test]
    fn microplastic_boundaries() {
        assert_eq!(classify(SensorTag::Microplastic, 500), Band::Green);
        assert_eq!(classify(SensorTag::Microplastic, 501), Band::Yellow);
        assert_eq!(classify(SensorTag::Microplastic, 2_000), Band::Yellow);
        assert_eq!(classify(SensorTag::Microplastic, 2_001), Band::Red);
        assert_eq!(classify(SensorTag::Microplastic, 3_000), Band::Red);
        assert_eq!(classify(SensorTag::Microplastic, 3_001), Band::Uninitialized);
    }

    #[test]
    fn do_level_boundaries() {
        // Wire values are mg/L x 100; lower oxygen is worse.
        assert_eq!(classify(SensorTag::DOLevel, 0), Band::Red);
        assert_eq!(classify(SensorTag::DOLevel, 399), Band::Red);
        assert_eq!(classify(SensorTag::DOLevel, 400), Band::Yellow);
        assert_eq!(classify(SensorTag::DOLevel, 700), Band::Yellow);
        assert_eq!(classify(SensorTag::DOLevel, 701), Band::Green);
        assert_eq!(classify(SensorTag::DOLevel, 1_000), Band::Green);
        assert_eq!(classify(SensorTag::DOLevel, 1_001), Band::Uninitialized);
    }

    #[test]
    fn non_sensor_tags_never_band() {
        assert_eq!(classify(SensorTag::Controller, 100), Band::Uninitialized);
        assert_eq!(classify(SensorTag::None, 100), Band::Uninitialized);
    }

    #[test]
    fn physical_units() {
        assert_eq!(physical(SensorTag::Turbidity, 2_050), 20.5);
        assert_eq!(physical(SensorTag::Microplastic, 312), 312.0);
        assert_eq!(physical(SensorTag::DOLevel, 612), 6.12);
    }
}
