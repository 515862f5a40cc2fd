//! Frequency response sampling
//!
//! Evaluates `|G(jω)|` and the principal value of `arg G(jω)` at every
//! point of a logarithmic grid.

use ndarray::Array1;

use crate::error::{BodeError, Result};
use crate::frequency::FrequencyGrid;
use crate::math::conversions::{complex_2_magnitude, complex_2_radian};
use crate::math::unwrap::unwrap_phase;
use crate::response::ResponseFunction;

/// Magnitude and raw (wrapped) phase sampled over a frequency grid
#[derive(Debug, Clone)]
pub struct FrequencyResponse {
    /// Sampling grid in rad/s
    pub grid: FrequencyGrid,
    /// |G(jω)| per grid point
    pub magnitude: Array1<f64>,
    /// arg G(jω) per grid point, radians in (-π, π]
    pub raw_phase: Array1<f64>,
}

impl FrequencyResponse {
    /// Sample `response` on `npoints` log-spaced frequencies in [omega_min, omega_max]
    ///
    /// The range is validated before the response is evaluated, and the
    /// response is then evaluated exactly `npoints` times.
    pub fn sample<G>(response: &G, omega_min: f64, omega_max: f64, npoints: usize) -> Result<Self>
    where
        G: ResponseFunction + ?Sized,
    {
        let grid = FrequencyGrid::logspace(omega_min, omega_max, npoints)?;
        Self::from_grid(response, grid)
    }

    /// Sample `response` on an existing grid
    pub fn from_grid<G>(response: &G, grid: FrequencyGrid) -> Result<Self>
    where
        G: ResponseFunction + ?Sized,
    {
        let n = grid.npoints();
        let mut magnitude = Array1::<f64>::zeros(n);
        let mut raw_phase = Array1::<f64>::zeros(n);

        for (i, &omega) in grid.omega().iter().enumerate() {
            let z = response.at_omega(omega);
            if !z.re.is_finite() || !z.im.is_finite() {
                return Err(BodeError::NonFiniteValue { omega });
            }
            magnitude[i] = complex_2_magnitude(z);
            raw_phase[i] = complex_2_radian(z);
        }

        log::debug!(
            "sampled {} points over [{}, {}] rad/s",
            n,
            grid.start(),
            grid.stop()
        );

        Ok(Self {
            grid,
            magnitude,
            raw_phase,
        })
    }

    /// Get the number of frequency points
    #[inline]
    pub fn npoints(&self) -> usize {
        self.grid.npoints()
    }

    /// Phase with 2π discontinuities removed
    pub fn unwrapped_phase(&self) -> Array1<f64> {
        unwrap_phase(self.raw_phase.view())
    }
}
