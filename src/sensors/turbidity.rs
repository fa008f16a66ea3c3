//! Turbidity generator: NTU x 100 on the wire.
//!
//! Sweeps 5.0 to 55.0 NTU in 0.5 steps with 0.10 to 0.50 NTU of jitter,
//! crossing the green/yellow and yellow/red thresholds each cycle.

use super::{Noise, Triangle};

const START: u32 = 500;
const STEP: u32 = 50;
const LOW: u32 = 500;
const HIGH: u32 = 5_500;
const NOISE_LO: u32 = 10;
const NOISE_HI: u32 = 50;

#[derive(Debug)]
pub struct TurbiditySim {
    wave: Triangle,
}

impl TurbiditySim {
    pub fn new() -> Self {
        Self {
            wave: Triangle::new(START, STEP, LOW, HIGH),
        }
    }

    pub fn sample(&mut self, noise: &mut Noise) -> u32 {
        self.wave.advance() + noise.in_range(NOISE_LO, NOISE_HI)
    }
}

impl Default for TurbiditySim {
    fn default() -> Self {
        Self::new()
    }
}
