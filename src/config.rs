//! System configuration parameters
//!
//! All tunable parameters for the AquaSense link. The binary can override
//! the defaults from a JSON file; library consumers construct the struct
//! directly.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Sensor reporting periods ---
    /// Turbidity report period sent with the enable command (ms)
    pub turbidity_period_ms: u32,
    /// Microplastic report period sent with the enable command (ms)
    pub microplastic_period_ms: u32,
    /// Dissolved-oxygen report period sent with the enable command (ms)
    pub do_level_period_ms: u32,

    // --- Controller loop ---
    /// Cooperative yield inserted on every controller loop iteration (ms)
    pub loop_yield_ms: u64,

    // --- Simulation ---
    /// Seed for the simulated sensors' noise generator
    pub sensor_noise_seed: u32,
    /// How long the loopback demo lets telemetry flow before resetting (s)
    pub demo_telemetry_secs: u64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // One report per second per sensor
            turbidity_period_ms: 1000,
            microplastic_period_ms: 1000,
            do_level_period_ms: 1000,

            loop_yield_ms: 100,

            sensor_noise_seed: 0x00C0_FFEE,
            demo_telemetry_secs: 10,
        }
    }
}

impl SystemConfig {
    /// The enable period for a given sensor tag, if it is a sensor.
    pub fn period_for(&self, tag: crate::link::SensorTag) -> Option<u32> {
        use crate::link::SensorTag;
        match tag {
            SensorTag::Turbidity => Some(self.turbidity_period_ms),
            SensorTag::Microplastic => Some(self.microplastic_period_ms),
            SensorTag::DOLevel => Some(self.do_level_period_ms),
            SensorTag::Controller | SensorTag::None => None,
        }
    }
}
