//! Deterministic random sources for tests.
//!
//! Every stochastic call in the crate draws unit values with
//! `rng.gen::<f64>()`, which keeps the top 53 bits of `next_u64`. A source
//! that always returns the same word therefore pins every draw to one value.

use rand::RngCore;

/// Returns the same unit draw forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedRng {
    word: u64,
}

impl FixedRng {
    /// Every `gen::<f64>()` yields `unit`, which must lie in `[0, 1)`.
    pub fn new(unit: f64) -> Self {
        let unit = unit.clamp(0.0, 1.0 - f64::EPSILON);
        let bits = (unit * (1u64 << 53) as f64) as u64;
        Self { word: bits << 11 }
    }

    /// Every draw is exactly 0.5, so zero-centred perturbations vanish.
    pub fn midpoint() -> Self {
        Self { word: 1u64 << 63 }
    }

    /// Every draw is 0.0: every Bernoulli roll succeeds, every choice picks
    /// the first option.
    pub fn zero() -> Self {
        Self { word: 0 }
    }
}

impl RngCore for FixedRng {
    fn next_u32(&mut self) -> u32 {
        (self.word >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.word
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.word.to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Cycles through a scripted list of unit draws.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    draws: Vec<u64>,
    next: usize,
}

impl ScriptedRng {
    pub fn new(units: &[f64]) -> Self {
        assert!(!units.is_empty(), "ScriptedRng needs at least one draw");
        Self {
            draws: units.iter().map(|&u| FixedRng::new(u).word).collect(),
            next: 0,
        }
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let word = self.draws[self.next];
        self.next = (self.next + 1) % self.draws.len();
        word
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
