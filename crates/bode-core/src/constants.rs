//! Numerical constants for frequency-response analysis
//!
//! Crossover targets and the default root search settings used when
//! callers do not override them.

use std::f64::consts::PI;

/// Target phase for the phase crossover, in radians (-180°).
pub const PHASE_CROSSOVER_TARGET: f64 = -PI;

/// Target magnitude for the gain crossover (unity gain, 0 dB).
pub const GAIN_CROSSOVER_TARGET: f64 = 1.0;

/// Default root search tolerance, as a fraction of the bracket width.
/// On a two-decade window this resolves crossovers to about 1e-9 rad/s.
pub const DEFAULT_RELATIVE_XTOL: f64 = 1e-10;

/// Default iteration cap for bracketed root searches.
/// Bisection needs about 34 halvings to reach the default tolerance.
pub const DEFAULT_MAX_ITER: usize = 100;
