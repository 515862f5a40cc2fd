//! Phase and gain crossover search
//!
//! Two independent bracketed root searches over the sampled band:
//!
//! - phase crossover: `phase(ω) + π = 0`, phase taken from the interpolant
//! - gain crossover: `|G(jω)| - 1 = 0`, magnitude evaluated directly
//!
//! Neither search mutates shared state, so both may run concurrently
//! against the same response and interpolant.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{GAIN_CROSSOVER_TARGET, PHASE_CROSSOVER_TARGET};
use crate::error::{BodeError, Result};
use crate::frequency::FrequencyGrid;
use crate::math::interpolation::PhaseInterpolant;
use crate::response::ResponseFunction;
use crate::roots::{RootFinder, RootMethod, RootOptions, RootResult};

/// Which characteristic point a search targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrossoverKind {
    /// Phase equals -180°
    Phase,
    /// Magnitude equals 1
    Gain,
}

impl fmt::Display for CrossoverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrossoverKind::Phase => write!(f, "phase"),
            CrossoverKind::Gain => write!(f, "gain"),
        }
    }
}

/// A located crossover
///
/// For a phase crossover `value` is the magnitude |G(jωco)|; for a gain
/// crossover it is the interpolated phase in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossoverPoint {
    /// Crossover frequency in rad/s
    pub frequency: f64,
    /// Companion value at `frequency`
    pub value: f64,
    /// Root finder iterations spent
    pub iterations: usize,
    /// Final bracket width in rad/s
    pub bracket_width: f64,
}

/// Per-crossover outcome of an analysis
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum CrossoverOutcome {
    /// The caller did not ask for this crossover
    #[default]
    NotRequested,
    /// Requested, but no crossing exists in the analysed band
    NotFound,
    Found(CrossoverPoint),
}

impl CrossoverOutcome {
    /// The crossover point, if one was found
    pub fn point(&self) -> Option<&CrossoverPoint> {
        match self {
            CrossoverOutcome::Found(point) => Some(point),
            _ => None,
        }
    }

    #[inline]
    pub fn is_found(&self) -> bool {
        matches!(self, CrossoverOutcome::Found(_))
    }
}

/// How the root search bracket is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BracketStrategy {
    /// Bracket the whole band [ωmin, ωmax]; fails when the endpoints
    /// share a sign even if the curve crosses an even number of times
    #[default]
    Window,
    /// Bracket the lowest-frequency grid interval whose samples change sign
    FirstSignChange,
}

/// Crossover solver over a sampled frequency response
pub struct CrossoverSolver<'a, G: ?Sized> {
    response: &'a G,
    grid: &'a FrequencyGrid,
    magnitude: ArrayView1<'a, f64>,
    interpolant: PhaseInterpolant<'a>,
    method: RootMethod,
    options: RootOptions,
    bracket: BracketStrategy,
}

impl<'a, G> CrossoverSolver<'a, G>
where
    G: ResponseFunction + ?Sized,
{
    /// Create a solver from the response and its sampled curves
    ///
    /// # Arguments
    /// * `response` - The response function, re-evaluated during the gain search
    /// * `grid` - Sampling grid
    /// * `magnitude` - |G(jω)| on the grid
    /// * `phase` - Unwrapped phase on the grid, radians
    pub fn new(
        response: &'a G,
        grid: &'a FrequencyGrid,
        magnitude: ArrayView1<'a, f64>,
        phase: ArrayView1<'a, f64>,
    ) -> Result<Self> {
        if magnitude.len() != grid.npoints() {
            return Err(BodeError::InvalidRange(format!(
                "magnitude has {} samples but grid has {} points",
                magnitude.len(),
                grid.npoints()
            )));
        }
        let interpolant = PhaseInterpolant::new(grid, phase)?;
        Ok(Self {
            response,
            grid,
            magnitude,
            interpolant,
            method: RootMethod::default(),
            options: RootOptions::default(),
            bracket: BracketStrategy::default(),
        })
    }

    pub fn with_method(mut self, method: RootMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_options(mut self, options: RootOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_bracket(mut self, bracket: BracketStrategy) -> Self {
        self.bracket = bracket;
        self
    }

    /// Phase interpolant the solver queries
    pub fn interpolant(&self) -> &PhaseInterpolant<'a> {
        &self.interpolant
    }

    /// Find ωco where the interpolated phase equals -π
    ///
    /// Returns ωco with |G(jωco)| evaluated from the response itself.
    ///
    /// # Errors
    /// * `NoRootInRange` if the phase does not cross -180° in the band
    /// * `DidNotConverge` if the iteration cap is reached
    pub fn find_phase_crossover(&self) -> Result<CrossoverPoint> {
        let interpolant = &self.interpolant;
        let (lower, upper) = self.bracket_for(CrossoverKind::Phase, |i| {
            interpolant.phase_at(i) - PHASE_CROSSOVER_TARGET
        })?;

        let root = self.solve(CrossoverKind::Phase, lower, upper, |omega| {
            Ok(interpolant.interpolate(omega)? - PHASE_CROSSOVER_TARGET)
        })?;

        let gain = self.magnitude_at(root.root)?;
        log::debug!(
            "phase crossover at {:.6} rad/s, |G| = {:.6} ({} iterations)",
            root.root,
            gain,
            root.iterations
        );

        Ok(CrossoverPoint {
            frequency: root.root,
            value: gain,
            iterations: root.iterations,
            bracket_width: root.bracket_width,
        })
    }

    /// Find ω1 where |G(jω)| equals 1
    ///
    /// Magnitude is evaluated from the response, never interpolated.
    /// Returns ω1 with the interpolated phase there.
    ///
    /// # Errors
    /// * `NoRootInRange` if the magnitude does not cross unity in the band
    /// * `DidNotConverge` if the iteration cap is reached
    pub fn find_gain_crossover(&self) -> Result<CrossoverPoint> {
        let magnitude = &self.magnitude;
        let (lower, upper) = self.bracket_for(CrossoverKind::Gain, |i| {
            magnitude[i] - GAIN_CROSSOVER_TARGET
        })?;

        let root = self.solve(CrossoverKind::Gain, lower, upper, |omega| {
            Ok(self.magnitude_at(omega)? - GAIN_CROSSOVER_TARGET)
        })?;

        let phase = self.interpolant.interpolate(root.root)?;
        log::debug!(
            "gain crossover at {:.6} rad/s, phase = {:.6} rad ({} iterations)",
            root.root,
            phase,
            root.iterations
        );

        Ok(CrossoverPoint {
            frequency: root.root,
            value: phase,
            iterations: root.iterations,
            bracket_width: root.bracket_width,
        })
    }

    /// Find either crossover by kind
    pub fn find(&self, kind: CrossoverKind) -> Result<CrossoverPoint> {
        match kind {
            CrossoverKind::Phase => self.find_phase_crossover(),
            CrossoverKind::Gain => self.find_gain_crossover(),
        }
    }

    /// |G(jω)| straight from the response
    fn magnitude_at(&self, omega: f64) -> Result<f64> {
        let mag = self.response.at_omega(omega).norm();
        if mag.is_finite() {
            Ok(mag)
        } else {
            Err(BodeError::NonFiniteValue { omega })
        }
    }

    fn no_root(&self, kind: CrossoverKind) -> BodeError {
        BodeError::NoRootInRange {
            crossover: kind,
            omega_min: self.grid.start(),
            omega_max: self.grid.stop(),
        }
    }

    /// Choose the search bracket from the sampled target values
    fn bracket_for<T>(&self, kind: CrossoverKind, sampled_target: T) -> Result<(f64, f64)>
    where
        T: Fn(usize) -> f64,
    {
        let omega = self.grid.omega();
        match self.bracket {
            BracketStrategy::Window => Ok((self.grid.start(), self.grid.stop())),
            BracketStrategy::FirstSignChange => (0..omega.len() - 1)
                .find(|&i| {
                    let (a, b) = (sampled_target(i), sampled_target(i + 1));
                    a == 0.0 || a.signum() != b.signum()
                })
                .map(|i| (omega[i], omega[i + 1]))
                .ok_or_else(|| self.no_root(kind)),
        }
    }

    fn solve<F>(
        &self,
        kind: CrossoverKind,
        lower: f64,
        upper: f64,
        target: F,
    ) -> Result<RootResult>
    where
        F: FnMut(f64) -> Result<f64>,
    {
        self.method
            .find_root(target, lower, upper, &self.options)
            .map_err(|err| match err {
                BodeError::NoSignChange {
                    f_lower, f_upper, ..
                } => {
                    log::debug!(
                        "no {} crossover: target is {} at {} and {} at {}",
                        kind,
                        f_lower,
                        lower,
                        f_upper,
                        upper
                    );
                    self.no_root(kind)
                }
                other => other,
            })
    }
}
