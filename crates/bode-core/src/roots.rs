//! Bracketed scalar root finding
//!
//! The crossover solver only needs "bracket in, root out". Algorithms sit
//! behind the [`RootFinder`] trait so they can be swapped without touching
//! the solver.
//!
//! All finders require the target to change sign across the bracket and
//! never evaluate it outside `[lower, upper]`.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_ITER, DEFAULT_RELATIVE_XTOL};
use crate::error::{BodeError, Result};

/// Relative tolerance on the root location used by Brent's method
const BRENT_RTOL: f64 = 4.0 * f64::EPSILON;

/// Convergence tolerance on the root frequency
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FrequencyTolerance {
    /// Absolute width in rad/s
    Absolute(f64),
    /// Fraction of the initial bracket width
    RelativeToBracket(f64),
}

impl Default for FrequencyTolerance {
    fn default() -> Self {
        FrequencyTolerance::RelativeToBracket(DEFAULT_RELATIVE_XTOL)
    }
}

impl FrequencyTolerance {
    /// Absolute tolerance in rad/s for the bracket [lower, upper]
    pub fn resolve(&self, lower: f64, upper: f64) -> f64 {
        match *self {
            FrequencyTolerance::Absolute(tol) => tol,
            FrequencyTolerance::RelativeToBracket(frac) => frac * (upper - lower).abs(),
        }
    }
}

/// Options for bracketed root finding
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootOptions {
    /// Tolerance on the root frequency
    pub xtol: FrequencyTolerance,
    /// Maximum number of iterations before giving up
    pub max_iter: usize,
}

impl Default for RootOptions {
    fn default() -> Self {
        Self {
            xtol: FrequencyTolerance::default(),
            max_iter: DEFAULT_MAX_ITER,
        }
    }
}

impl RootOptions {
    pub fn with_xtol(mut self, xtol: FrequencyTolerance) -> Self {
        self.xtol = xtol;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Reject tolerances that are NaN, infinite or negative and a zero
    /// iteration cap
    pub fn validate(&self) -> Result<()> {
        let tol = match self.xtol {
            FrequencyTolerance::Absolute(tol) | FrequencyTolerance::RelativeToBracket(tol) => tol,
        };
        if !tol.is_finite() || tol < 0.0 {
            return Err(BodeError::InvalidRange(format!(
                "root tolerance must be finite and non-negative, got {:?}",
                self.xtol
            )));
        }
        if self.max_iter == 0 {
            return Err(BodeError::InvalidRange(
                "root search needs at least one iteration".to_string(),
            ));
        }
        Ok(())
    }
}

/// Result from a root search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootResult {
    /// The root found
    pub root: f64,
    /// Target function value at the root
    pub function_value: f64,
    /// Number of iterations used
    pub iterations: usize,
    /// Width of the final bracket, i.e. the achieved tolerance
    pub bracket_width: f64,
}

/// A bracketed scalar root finder
pub trait RootFinder {
    /// Find a root of `f` in [lower, upper]
    ///
    /// # Errors
    /// * `InvalidRange` if the bracket is empty or not finite
    /// * `NoSignChange` if `f(lower)` and `f(upper)` have the same sign
    /// * `NonFiniteValue` if `f` returns NaN or infinity
    /// * `DidNotConverge` if `options.max_iter` is exhausted
    /// * any error returned by `f` itself
    fn find_root<F>(
        &self,
        f: F,
        lower: f64,
        upper: f64,
        options: &RootOptions,
    ) -> Result<RootResult>
    where
        F: FnMut(f64) -> Result<f64>;
}

/// Bisection: linear convergence, maximally robust
#[derive(Debug, Clone, Copy, Default)]
pub struct Bisection;

/// Brent's method: inverse quadratic interpolation with bisection fallback
#[derive(Debug, Clone, Copy, Default)]
pub struct Brent;

/// Selects the root finding algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RootMethod {
    Bisection,
    #[default]
    Brent,
}

impl RootFinder for RootMethod {
    fn find_root<F>(
        &self,
        f: F,
        lower: f64,
        upper: f64,
        options: &RootOptions,
    ) -> Result<RootResult>
    where
        F: FnMut(f64) -> Result<f64>,
    {
        match self {
            RootMethod::Bisection => Bisection.find_root(f, lower, upper, options),
            RootMethod::Brent => Brent.find_root(f, lower, upper, options),
        }
    }
}

/// Evaluate `f` and reject non-finite values
fn eval<F>(f: &mut F, x: f64) -> Result<f64>
where
    F: FnMut(f64) -> Result<f64>,
{
    let y = f(x)?;
    if y.is_finite() {
        Ok(y)
    } else {
        Err(BodeError::NonFiniteValue { omega: x })
    }
}

/// Outcome of checking the bracket endpoints
enum Bracket {
    /// One endpoint is already an exact root
    Root(RootResult),
    /// Endpoints straddle a sign change
    Straddles { fa: f64, fb: f64 },
}

fn check_bracket<F>(f: &mut F, lower: f64, upper: f64) -> Result<Bracket>
where
    F: FnMut(f64) -> Result<f64>,
{
    if !lower.is_finite() || !upper.is_finite() || lower >= upper {
        return Err(BodeError::InvalidRange(format!(
            "root bracket [{}, {}] is empty or not finite",
            lower, upper
        )));
    }

    let fa = eval(f, lower)?;
    let fb = eval(f, upper)?;

    for (x, fx) in [(lower, fa), (upper, fb)] {
        if fx == 0.0 {
            return Ok(Bracket::Root(RootResult {
                root: x,
                function_value: 0.0,
                iterations: 0,
                bracket_width: 0.0,
            }));
        }
    }

    if fa.signum() == fb.signum() {
        return Err(BodeError::NoSignChange {
            lower,
            upper,
            f_lower: fa,
            f_upper: fb,
        });
    }

    Ok(Bracket::Straddles { fa, fb })
}

impl RootFinder for Bisection {
    fn find_root<F>(
        &self,
        mut f: F,
        lower: f64,
        upper: f64,
        options: &RootOptions,
    ) -> Result<RootResult>
    where
        F: FnMut(f64) -> Result<f64>,
    {
        options.validate()?;
        let fa = match check_bracket(&mut f, lower, upper)? {
            Bracket::Root(result) => return Ok(result),
            Bracket::Straddles { fa, .. } => fa,
        };
        let tol = options.xtol.resolve(lower, upper);

        let mut left = lower;
        let mut right = upper;
        let mut f_left = fa;

        for iter in 0..options.max_iter {
            let mid = 0.5 * (left + right);
            let f_mid = eval(&mut f, mid)?;

            if f_mid == 0.0 || (right - left) * 0.5 <= tol {
                return Ok(RootResult {
                    root: mid,
                    function_value: f_mid,
                    iterations: iter + 1,
                    bracket_width: (right - left) * 0.5,
                });
            }

            // Update bracket to maintain sign change
            if f_mid.signum() == f_left.signum() {
                left = mid;
                f_left = f_mid;
            } else {
                right = mid;
            }
        }

        Err(BodeError::DidNotConverge {
            iterations: options.max_iter,
            bracket_width: right - left,
        })
    }
}

impl RootFinder for Brent {
    fn find_root<F>(
        &self,
        mut f: F,
        lower: f64,
        upper: f64,
        options: &RootOptions,
    ) -> Result<RootResult>
    where
        F: FnMut(f64) -> Result<f64>,
    {
        options.validate()?;
        let (fa, fb) = match check_bracket(&mut f, lower, upper)? {
            Bracket::Root(result) => return Ok(result),
            Bracket::Straddles { fa, fb } => (fa, fb),
        };
        let xtol = options.xtol.resolve(lower, upper);

        // `cur` is the best estimate, `blk` the opposite end of the bracket,
        // `pre` the previous estimate.
        let (mut xpre, mut fpre) = (lower, fa);
        let (mut xcur, mut fcur) = (upper, fb);
        let (mut xblk, mut fblk) = (0.0, 0.0);
        let (mut spre, mut scur) = (0.0_f64, 0.0_f64);

        for iter in 0..options.max_iter {
            if fpre != 0.0 && fcur != 0.0 && fpre.signum() != fcur.signum() {
                xblk = xpre;
                fblk = fpre;
                spre = xcur - xpre;
                scur = spre;
            }
            if fblk.abs() < fcur.abs() {
                xpre = xcur;
                xcur = xblk;
                xblk = xpre;

                fpre = fcur;
                fcur = fblk;
                fblk = fpre;
            }

            let delta = 0.5 * (xtol + BRENT_RTOL * xcur.abs());
            let sbis = 0.5 * (xblk - xcur);
            if fcur == 0.0 || sbis.abs() < delta {
                return Ok(RootResult {
                    root: xcur,
                    function_value: fcur,
                    iterations: iter,
                    bracket_width: (xblk - xcur).abs(),
                });
            }

            if spre.abs() > delta && fcur.abs() < fpre.abs() {
                let stry = if xpre == xblk {
                    // Secant step
                    -fcur * (xcur - xpre) / (fcur - fpre)
                } else {
                    // Inverse quadratic interpolation
                    let dpre = (fpre - fcur) / (xpre - xcur);
                    let dblk = (fblk - fcur) / (xblk - xcur);
                    -fcur * (fblk * dblk - fpre * dpre) / (dblk * dpre * (fblk - fpre))
                };

                let limit = spre.abs().min(3.0 * sbis.abs() - delta);
                if stry.is_finite() && 2.0 * stry.abs() < limit {
                    spre = scur;
                    scur = stry;
                } else {
                    spre = sbis;
                    scur = sbis;
                }
            } else {
                spre = sbis;
                scur = sbis;
            }

            xpre = xcur;
            fpre = fcur;
            if scur.abs() > delta {
                xcur += scur;
            } else {
                xcur += if sbis > 0.0 { delta } else { -delta };
            }
            xcur = xcur.clamp(lower, upper);
            fcur = eval(&mut f, xcur)?;
        }

        Err(BodeError::DidNotConverge {
            iterations: options.max_iter,
            bracket_width: (xblk - xcur).abs(),
        })
    }
}
