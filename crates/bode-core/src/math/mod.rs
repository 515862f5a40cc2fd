//! Mathematical functions module
//!
//! Provides unit conversions, phase unwrapping and phase interpolation.

pub mod conversions;
pub mod interpolation;
pub mod unwrap;

pub use conversions::*;
pub use interpolation::PhaseInterpolant;
pub use unwrap::{unwrap_phase, PhaseUnwrapper};
