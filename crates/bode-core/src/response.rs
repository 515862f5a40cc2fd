//! Response function capability
//!
//! An open-loop transfer function is anything that maps a complex
//! frequency `s = jω` to a complex response. Closures qualify directly.

use num_complex::Complex64;

/// A pure, deterministic map from complex frequency to complex response
///
/// Implementations may be evaluated any number of times at any frequency,
/// including points off the sampling grid during root searches. When the
/// analysis runs its two crossover searches concurrently the implementor
/// must also be `Sync`.
///
/// # Example
/// ```
/// use bode_core::ResponseFunction;
/// use num_complex::Complex64;
///
/// let integrator = |s: Complex64| Complex64::new(1.0, 0.0) / s;
/// let g = integrator.at_omega(2.0);
/// assert!((g.norm() - 0.5).abs() < 1e-12);
/// ```
pub trait ResponseFunction {
    /// Evaluate the response at complex frequency `s`
    fn response(&self, s: Complex64) -> Complex64;

    /// Evaluate the response on the imaginary axis, `G(jω)`
    #[inline]
    fn at_omega(&self, omega: f64) -> Complex64 {
        self.response(Complex64::new(0.0, omega))
    }
}

impl<F> ResponseFunction for F
where
    F: Fn(Complex64) -> Complex64,
{
    #[inline]
    fn response(&self, s: Complex64) -> Complex64 {
        self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    struct FirstOrderLag {
        tau: f64,
    }

    impl ResponseFunction for FirstOrderLag {
        fn response(&self, s: Complex64) -> Complex64 {
            Complex64::new(1.0, 0.0) / (s * self.tau + 1.0)
        }
    }

    #[test]
    fn test_closure_is_response_function() {
        let g = |s: Complex64| s * 2.0;
        let z = g.at_omega(3.0);
        assert_relative_eq!(z.re, 0.0, epsilon = 1e-12);
        assert_relative_eq!(z.im, 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_struct_implementor() {
        let lag = FirstOrderLag { tau: 0.5 };
        // Corner frequency: |G| = 1/sqrt(2), phase = -45°
        let z = lag.at_omega(2.0);
        assert_relative_eq!(z.norm(), 1.0 / 2.0_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(z.arg(), -PI / 4.0, epsilon = 1e-12);
    }
}
