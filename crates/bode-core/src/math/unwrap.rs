//! Phase unwrapping
//!
//! Removes the artificial 2π jumps that principal-value phase
//! (`atan2`, range (-π, π]) introduces into a sampled phase curve.
//!
//! The correction for each sample depends on every correction made
//! before it, so samples must be fed in ascending frequency order in a
//! single pass.

use ndarray::{Array1, ArrayView1};
use std::f64::consts::PI;

const TWO_PI: f64 = 2.0 * PI;

/// Sequential phase unwrapper carrying a running 2π offset
#[derive(Debug, Clone, Default)]
pub struct PhaseUnwrapper {
    /// Accumulated multiple of 2π added to incoming samples
    offset: f64,
    /// Previous raw (wrapped) sample
    prev: Option<f64>,
    /// Number of samples that triggered a correction
    corrections: usize,
}

impl PhaseUnwrapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unwrap one sample given in sequence order
    ///
    /// When the raw step from the previous sample exceeds π in magnitude,
    /// the step is folded back into (-π, π] and the difference is added to
    /// the running offset. The first sample passes through unchanged.
    #[inline]
    pub fn process_sample(&mut self, x: f64) -> f64 {
        let Some(prev) = self.prev.replace(x) else {
            return x;
        };

        let step = x - prev;
        if step.abs() > PI {
            let mut folded = (step + PI).rem_euclid(TWO_PI) - PI;
            if folded == -PI && step > 0.0 {
                folded = PI;
            }
            self.offset += folded - step;
            self.corrections += 1;
        }
        x + self.offset
    }

    /// Unwrap a block of samples, continuing from the current state
    pub fn process(&mut self, raw: ArrayView1<'_, f64>) -> Array1<f64> {
        raw.iter().map(|&x| self.process_sample(x)).collect()
    }

    /// Current offset, always an integer multiple of 2π
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Number of samples corrected so far
    pub fn corrections(&self) -> usize {
        self.corrections
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Unwrap a whole phase curve in one left-to-right pass
pub fn unwrap_phase(raw: ArrayView1<'_, f64>) -> Array1<f64> {
    let mut unwrapper = PhaseUnwrapper::new();
    let unwrapped = unwrapper.process(raw);
    log::debug!(
        "unwrapped {} phase samples, {} corrections, final offset {:.3} rad",
        unwrapped.len(),
        unwrapper.corrections(),
        unwrapper.offset()
    );
    unwrapped
}
