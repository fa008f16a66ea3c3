//! Microplastic generator: particles/L, native units on the wire.
//!
//! Sweeps 100 to 2100 particles in steps of 20 with up to 49 particles
//! of jitter.

use super::{Noise, Triangle};

const START: u32 = 300;
const STEP: u32 = 20;
const LOW: u32 = 100;
const HIGH: u32 = 2_100;
const NOISE_HI: u32 = 49;

#[derive(Debug)]
pub struct MicroplasticSim {
    wave: Triangle,
}

impl MicroplasticSim {
    pub fn new() -> Self {
        Self {
            wave: Triangle::new(START, STEP, LOW, HIGH),
        }
    }

    pub fn sample(&mut self, noise: &mut Noise) -> u32 {
        self.wave.advance() + noise.in_range(0, NOISE_HI)
    }
}

impl Default for MicroplasticSim {
    fn default() -> Self {
        Self::new()
    }
}
