//! Unit conversion functions
//!
//! Conversions between complex responses and the magnitude/phase
//! representations drawn on a Bode chart.

use num_complex::Complex64;
use std::f64::consts::PI;

/// Convert complex number to magnitude
#[inline]
pub fn complex_2_magnitude(z: Complex64) -> f64 {
    z.norm()
}

/// Convert complex number to principal phase in radians, (-π, π]
#[inline]
pub fn complex_2_radian(z: Complex64) -> f64 {
    z.im.atan2(z.re)
}

/// Convert magnitude to dB (20*log10(mag))
pub fn magnitude_2_db(mag: f64) -> f64 {
    20.0 * mag.log10()
}

/// Convert radians to degrees
pub fn radian_2_degree(rad: f64) -> f64 {
    rad * 180.0 / PI
}
