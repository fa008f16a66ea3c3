//! Dissolved-oxygen generator: mg/L x 100 on the wire.
//!
//! Sweeps 3.5 to 8.0 mg/L in 0.1 steps with 0.01 to 0.20 mg/L of
//! jitter, dipping through the red band at the bottom of each cycle.

use super::{Noise, Triangle};

const START: u32 = 600;
const STEP: u32 = 10;
const LOW: u32 = 350;
const HIGH: u32 = 800;
const NOISE_LO: u32 = 1;
const NOISE_HI: u32 = 20;

#[derive(Debug)]
pub struct DoLevelSim {
    wave: Triangle,
}

impl DoLevelSim {
    pub fn new() -> Self {
        Self {
            wave: Triangle::new(START, STEP, LOW, HIGH),
        }
    }

    pub fn sample(&mut self, noise: &mut Noise) -> u32 {
        self.wave.advance() + noise.in_range(NOISE_LO, NOISE_HI)
    }
}

impl Default for DoLevelSim {
    fn default() -> Self {
        Self::new()
    }
}
