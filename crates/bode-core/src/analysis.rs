//! Bode analysis pipeline
//!
//! grid -> sampler -> unwrapper -> interpolant -> crossover solver -> result.
//!
//! The result hands a plotting layer everything it draws: the frequency
//! vector, the magnitude and unwrapped phase curves, and the optional
//! crossover overlays.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::crossover::{BracketStrategy, CrossoverKind, CrossoverOutcome, CrossoverSolver};
use crate::error::{BodeError, Result};
use crate::frequency::FrequencyGrid;
use crate::math::conversions::{magnitude_2_db, radian_2_degree};
use crate::response::ResponseFunction;
use crate::roots::{RootMethod, RootOptions};
use crate::sampler::FrequencyResponse;

/// Options controlling an analysis run
///
/// Both crossovers default to "not requested".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Search for the -180° phase crossover
    pub phase_crossover: bool,
    /// Search for the unity gain crossover
    pub gain_crossover: bool,
    /// Root finding algorithm
    pub root_method: RootMethod,
    /// Tolerance and iteration cap of the root search
    pub root_options: RootOptions,
    /// How the search bracket is chosen
    pub bracket: BracketStrategy,
    /// Run the two crossover searches on the rayon pool
    pub concurrent: bool,
    /// Report a missing requested crossover as `NoRootInRange` instead of
    /// `CrossoverOutcome::NotFound`
    pub fail_fast: bool,
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_phase_crossover(mut self, wanted: bool) -> Self {
        self.phase_crossover = wanted;
        self
    }

    pub fn with_gain_crossover(mut self, wanted: bool) -> Self {
        self.gain_crossover = wanted;
        self
    }

    pub fn with_root_method(mut self, method: RootMethod) -> Self {
        self.root_method = method;
        self
    }

    pub fn with_root_options(mut self, options: RootOptions) -> Self {
        self.root_options = options;
        self
    }

    pub fn with_bracket(mut self, bracket: BracketStrategy) -> Self {
        self.bracket = bracket;
        self
    }

    pub fn with_concurrent(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }
}

/// Immutable record of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodeAnalysisResult {
    grid: FrequencyGrid,
    magnitude: Array1<f64>,
    phase: Array1<f64>,
    phase_crossover: CrossoverOutcome,
    gain_crossover: CrossoverOutcome,
}

impl BodeAnalysisResult {
    /// Sampling grid
    #[inline]
    pub fn grid(&self) -> &FrequencyGrid {
        &self.grid
    }

    /// Frequency vector in rad/s
    #[inline]
    pub fn omega(&self) -> &[f64] {
        self.grid.omega()
    }

    /// |G(jω)| per grid point
    #[inline]
    pub fn magnitude(&self) -> &Array1<f64> {
        &self.magnitude
    }

    /// Unwrapped phase per grid point, radians
    #[inline]
    pub fn phase(&self) -> &Array1<f64> {
        &self.phase
    }

    /// Unwrapped phase in degrees
    pub fn phase_deg(&self) -> Array1<f64> {
        self.phase.mapv(radian_2_degree)
    }

    /// Magnitude in dB
    pub fn magnitude_db(&self) -> Array1<f64> {
        self.magnitude.mapv(magnitude_2_db)
    }

    /// Phase crossover (ωco, |G(jωco)|)
    #[inline]
    pub fn phase_crossover(&self) -> &CrossoverOutcome {
        &self.phase_crossover
    }

    /// Gain crossover (ω1, phase at ω1)
    #[inline]
    pub fn gain_crossover(&self) -> &CrossoverOutcome {
        &self.gain_crossover
    }
}

/// Analyse `response` over [omega_min, omega_max] with `points` log-spaced samples
///
/// Convenience form of [`analyze_with`] using default solver options.
///
/// # Example
/// ```
/// use bode_core::analyze;
/// use num_complex::Complex64;
///
/// let g = |s: Complex64| Complex64::new(1.0, 0.0) / s;
/// let result = analyze(&g, 0.1, 10.0, 100, false, true).unwrap();
/// let w1 = result.gain_crossover().point().unwrap().frequency;
/// assert!((w1 - 1.0).abs() < 1e-6);
/// ```
pub fn analyze<G>(
    response: &G,
    omega_min: f64,
    omega_max: f64,
    points: usize,
    want_phase_crossover: bool,
    want_gain_crossover: bool,
) -> Result<BodeAnalysisResult>
where
    G: ResponseFunction + Sync + ?Sized,
{
    let options = AnalysisOptions::new()
        .with_phase_crossover(want_phase_crossover)
        .with_gain_crossover(want_gain_crossover);
    analyze_with(response, omega_min, omega_max, points, &options)
}

/// Analyse `response` with explicit options
///
/// # Errors
/// * `InvalidRange` for a malformed window or root search options,
///   before any sampling
/// * `NonFiniteValue` if the response is NaN or infinite on the grid or
///   during a search
/// * `DidNotConverge` if a search exhausts its iteration cap
/// * `NoRootInRange` for a missing requested crossover, only with
///   `fail_fast`
pub fn analyze_with<G>(
    response: &G,
    omega_min: f64,
    omega_max: f64,
    points: usize,
    options: &AnalysisOptions,
) -> Result<BodeAnalysisResult>
where
    G: ResponseFunction + Sync + ?Sized,
{
    options.root_options.validate()?;
    let sampled = FrequencyResponse::sample(response, omega_min, omega_max, points)?;
    let phase = sampled.unwrapped_phase();

    let (phase_crossover, gain_crossover) = {
        let solver = CrossoverSolver::new(
            response,
            &sampled.grid,
            sampled.magnitude.view(),
            phase.view(),
        )?
        .with_method(options.root_method)
        .with_options(options.root_options)
        .with_bracket(options.bracket);

        let search = |wanted: bool, kind: CrossoverKind| -> Result<CrossoverOutcome> {
            if !wanted {
                return Ok(CrossoverOutcome::NotRequested);
            }
            match solver.find(kind) {
                Ok(point) => Ok(CrossoverOutcome::Found(point)),
                Err(err @ BodeError::NoRootInRange { .. }) if !options.fail_fast => {
                    log::warn!("{}", err);
                    Ok(CrossoverOutcome::NotFound)
                }
                Err(err) => Err(err),
            }
        };

        if options.concurrent && options.phase_crossover && options.gain_crossover {
            let (phase_result, gain_result) = rayon::join(
                || search(true, CrossoverKind::Phase),
                || search(true, CrossoverKind::Gain),
            );
            (phase_result?, gain_result?)
        } else {
            (
                search(options.phase_crossover, CrossoverKind::Phase)?,
                search(options.gain_crossover, CrossoverKind::Gain)?,
            )
        }
    };

    let FrequencyResponse { grid, magnitude, .. } = sampled;

    Ok(BodeAnalysisResult {
        grid,
        magnitude,
        phase,
        phase_crossover,
        gain_crossover,
    })
}
