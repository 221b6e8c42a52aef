//! Predictor state shared by the ADPCM encoder and decoder

use crate::{INDEX_TABLE, MAX_STEP_INDEX, SIGN_BIT, STEP_TABLE, clamp_i16};

/// ADPCM predictor state
///
/// Holds the running predicted sample and the current position in
/// [`STEP_TABLE`]. The encoder and decoder apply identical updates for each
/// code, so an encoder and a decoder started from the same state stay in
/// lockstep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdpcmState {
    /// Last reconstructed sample, always within the i16 range
    pub predictor: i32,

    /// Index into [`STEP_TABLE`], always within `0..=MAX_STEP_INDEX`
    pub step_index: usize,
}

impl AdpcmState {
    /// Reset state: predictor 0, step index 0
    #[must_use]
    pub fn new() -> Self {
        Self {
            predictor: 0,
            step_index: 0,
        }
    }

    /// Reset to initial state
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Current quantizer step size
    #[inline]
    #[must_use]
    pub fn step(&self) -> i32 {
        STEP_TABLE[self.step_index]
    }

    /// Difference reconstructed from `code` at the current step size
    ///
    /// `step/8 + step*b2 + step/2*b1 + step/4*b0`, always non-negative; the
    /// sign bit is applied by [`AdpcmState::apply`].
    #[inline]
    #[must_use]
    pub fn reconstruct(&self, code: u8) -> i32 {
        let step = self.step();
        let mut vpdiff = step >> 3;
        if code & 4 != 0 {
            vpdiff += step;
        }
        if code & 2 != 0 {
            vpdiff += step >> 1;
        }
        if code & 1 != 0 {
            vpdiff += step >> 2;
        }
        vpdiff
    }

    /// Advance the state by one code and return the new predictor
    pub fn apply(&mut self, code: u8) -> i32 {
        let code = code & 0x0F;
        let vpdiff = self.reconstruct(code);

        self.predictor = if code & SIGN_BIT != 0 {
            clamp_i16(self.predictor - vpdiff)
        } else {
            clamp_i16(self.predictor + vpdiff)
        };

        let index = self.step_index as i32 + INDEX_TABLE[code as usize];
        self.step_index = index.clamp(0, MAX_STEP_INDEX as i32) as usize;

        self.predictor
    }
}
