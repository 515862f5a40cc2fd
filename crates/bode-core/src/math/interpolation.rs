//! Piecewise-linear phase interpolation
//!
//! Turns the unwrapped phase samples into a continuous function of
//! frequency over the sampled band. Queries outside the band fail; there
//! is no extrapolation.

use ndarray::ArrayView1;

use crate::error::{BodeError, Result};
use crate::frequency::FrequencyGrid;

/// Continuous phase approximation over [omega_min, omega_max]
///
/// Borrows the grid and samples, so construction does no work beyond a
/// length check. Each query is a binary search for the bracketing
/// interval followed by a linear blend.
#[derive(Debug, Clone, Copy)]
pub struct PhaseInterpolant<'a> {
    omega: &'a [f64],
    phase: ArrayView1<'a, f64>,
}

impl<'a> PhaseInterpolant<'a> {
    /// Build an interpolant from a grid and index-aligned phase samples
    pub fn new(grid: &'a FrequencyGrid, phase: ArrayView1<'a, f64>) -> Result<Self> {
        if phase.len() != grid.npoints() {
            return Err(BodeError::InvalidRange(format!(
                "phase has {} samples but grid has {} points",
                phase.len(),
                grid.npoints()
            )));
        }
        Ok(Self {
            omega: grid.omega(),
            phase,
        })
    }

    /// Interpolated phase at `omega` (rad/s)
    ///
    /// Returns the stored sample exactly when `omega` is a grid point.
    pub fn interpolate(&self, omega: f64) -> Result<f64> {
        let (min, max) = self.domain();
        if !(omega >= min && omega <= max) {
            return Err(BodeError::OutOfDomain { omega, min, max });
        }

        let n = self.omega.len();
        // Binary search for interval (O(log n))
        let idx = match self.omega.partition_point(|&w| w < omega) {
            0 => return Ok(self.phase[0]),
            i if i >= n => n - 2,
            i => i - 1,
        };

        let (w0, w1) = (self.omega[idx], self.omega[idx + 1]);
        if omega == w1 {
            return Ok(self.phase[idx + 1]);
        }

        let t = (omega - w0) / (w1 - w0);
        Ok(self.phase[idx] * (1.0 - t) + self.phase[idx + 1] * t)
    }

    /// Stored phase sample at grid index `index`
    #[inline]
    pub fn phase_at(&self, index: usize) -> f64 {
        self.phase[index]
    }

    /// Closed interval the interpolant is defined on
    #[inline]
    pub fn domain(&self) -> (f64, f64) {
        (self.omega[0], self.omega[self.omega.len() - 1])
    }
}
