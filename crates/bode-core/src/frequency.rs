//! Frequency module - logarithmically spaced angular frequency grid
//!
//! All frequencies are angular (rad/s), matching the `jω` argument handed
//! to a [`ResponseFunction`](crate::response::ResponseFunction).

use serde::{Deserialize, Serialize};

use crate::error::{BodeError, Result};

/// Strictly increasing, positive angular frequencies in rad/s
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct FrequencyGrid {
    /// Frequency vector in rad/s
    omega: Vec<f64>,
}

impl FrequencyGrid {
    /// Create a log-spaced grid of `npoints` frequencies over [omega_min, omega_max]
    ///
    /// Point `k` is `10^(log10(omega_min) + k * Δ)` with
    /// `Δ = (log10(omega_max) - log10(omega_min)) / (npoints - 1)`.
    /// The endpoints are pinned to the exact inputs. Fails with
    /// `InvalidRange` when the window is too narrow for `npoints` distinct
    /// values.
    ///
    /// # Example
    /// ```
    /// use bode_core::FrequencyGrid;
    /// let grid = FrequencyGrid::logspace(0.1, 10.0, 3).unwrap();
    /// assert!((grid.omega()[1] - 1.0).abs() < 1e-12);
    /// ```
    pub fn logspace(omega_min: f64, omega_max: f64, npoints: usize) -> Result<Self> {
        validate_range(omega_min, omega_max, npoints)?;

        let log_start = omega_min.log10();
        let log_stop = omega_max.log10();
        let log_step = (log_stop - log_start) / (npoints - 1) as f64;

        let mut omega: Vec<f64> = (0..npoints)
            .map(|k| 10.0_f64.powf(log_start + k as f64 * log_step))
            .collect();
        omega[0] = omega_min;
        omega[npoints - 1] = omega_max;

        // Steps below f64 resolution collapse neighbouring points
        Self::from_omega(omega)
    }

    /// Create from an explicit frequency vector in rad/s
    ///
    /// The vector must hold at least two finite, positive, strictly
    /// increasing values.
    pub fn from_omega(omega: Vec<f64>) -> Result<Self> {
        if omega.len() < 2 {
            return Err(BodeError::InvalidRange(format!(
                "need at least 2 frequency points, got {}",
                omega.len()
            )));
        }
        if let Some(bad) = omega.iter().find(|w| !w.is_finite() || **w <= 0.0) {
            return Err(BodeError::InvalidRange(format!(
                "frequencies must be finite and positive, got {}",
                bad
            )));
        }
        if let Some(pair) = omega.windows(2).find(|w| w[1] <= w[0]) {
            return Err(BodeError::InvalidRange(format!(
                "frequencies must be strictly increasing, got {} then {}",
                pair[0], pair[1]
            )));
        }
        Ok(Self { omega })
    }

    /// Get frequency vector in rad/s
    #[inline]
    pub fn omega(&self) -> &[f64] {
        &self.omega
    }

    /// Get the number of frequency points
    #[inline]
    pub fn npoints(&self) -> usize {
        self.omega.len()
    }

    /// Lowest frequency in rad/s
    #[inline]
    pub fn start(&self) -> f64 {
        self.omega[0]
    }

    /// Highest frequency in rad/s
    #[inline]
    pub fn stop(&self) -> f64 {
        self.omega[self.omega.len() - 1]
    }
}

impl TryFrom<Vec<f64>> for FrequencyGrid {
    type Error = BodeError;

    fn try_from(omega: Vec<f64>) -> Result<Self> {
        Self::from_omega(omega)
    }
}

impl From<FrequencyGrid> for Vec<f64> {
    fn from(grid: FrequencyGrid) -> Self {
        grid.omega
    }
}

/// Check the sampling window before anything is evaluated
pub(crate) fn validate_range(omega_min: f64, omega_max: f64, npoints: usize) -> Result<()> {
    if !omega_min.is_finite() || !omega_max.is_finite() {
        return Err(BodeError::InvalidRange(format!(
            "bounds must be finite, got [{}, {}]",
            omega_min, omega_max
        )));
    }
    if omega_min <= 0.0 {
        return Err(BodeError::InvalidRange(format!(
            "omega_min must be positive, got {}",
            omega_min
        )));
    }
    if omega_max <= omega_min {
        return Err(BodeError::InvalidRange(format!(
            "omega_max ({}) must exceed omega_min ({})",
            omega_max, omega_min
        )));
    }
    if npoints < 2 {
        return Err(BodeError::InvalidRange(format!(
            "need at least 2 frequency points, got {}",
            npoints
        )));
    }
    Ok(())
}
