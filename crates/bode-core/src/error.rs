//! Error types for the analysis pipeline

use thiserror::Error;

use crate::crossover::CrossoverKind;

/// Errors produced while sampling, interpolating or solving for crossovers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BodeError {
    /// Malformed ωmin/ωmax/points input, rejected before any sampling
    #[error("Invalid frequency range: {0}")]
    InvalidRange(String),

    /// The phase interpolant was queried outside the sampled band
    #[error("Frequency {omega} rad/s outside interpolation domain [{min}, {max}]")]
    OutOfDomain { omega: f64, min: f64, max: f64 },

    /// The requested crossover does not exist inside the analysis window
    #[error("No {crossover} crossover in [{omega_min}, {omega_max}] rad/s")]
    NoRootInRange {
        crossover: CrossoverKind,
        omega_min: f64,
        omega_max: f64,
    },

    /// Bracket endpoints of a root search have the same sign
    #[error("No sign change over [{lower}, {upper}]: f(lower) = {f_lower}, f(upper) = {f_upper}")]
    NoSignChange {
        lower: f64,
        upper: f64,
        f_lower: f64,
        f_upper: f64,
    },

    /// Root search hit its iteration cap
    #[error("Root search did not converge after {iterations} iterations (bracket width {bracket_width})")]
    DidNotConverge {
        iterations: usize,
        bracket_width: f64,
    },

    /// The response or a derived target function was NaN or infinite
    #[error("Non-finite value at {omega} rad/s")]
    NonFiniteValue { omega: f64 },
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, BodeError>;
