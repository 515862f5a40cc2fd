//! End-to-end analysis tests
//!
//! Runs the full pipeline on transfer functions whose crossovers are known
//! analytically or can be checked against the response directly.

use approx::assert_relative_eq;
use bode_core::crossover::BracketStrategy;
use bode_core::math::PhaseInterpolant;
use bode_core::{
    analyze, analyze_with, AnalysisOptions, BodeError, CrossoverKind, CrossoverOutcome,
    FrequencyTolerance, ResponseFunction, RootMethod, RootOptions,
};
use num_complex::Complex64;
use std::f64::consts::PI;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// G(s) = 20(s+1) / (s (s+5) (s^2 + 2s + 10))
fn loop_gain(s: Complex64) -> Complex64 {
    (s + 1.0) * 20.0 / (s * (s + 5.0) * (s * s + s * 2.0 + 10.0))
}

/// G(s) = 10 / ((s+1)(s+2)(s+3))
fn third_order(s: Complex64) -> Complex64 {
    Complex64::new(10.0, 0.0) / ((s + 1.0) * (s + 2.0) * (s + 3.0))
}

// ============================================================================
// Reference example
// ============================================================================

#[test]
fn test_loop_gain_both_crossovers() {
    init_logger();
    let result = analyze(&loop_gain, 0.1, 10.0, 100, true, true).unwrap();

    assert_eq!(result.omega().len(), 100);

    let interp = PhaseInterpolant::new(result.grid(), result.phase().view()).unwrap();

    let pc = result.phase_crossover().point().expect("phase crossover");
    assert!(pc.frequency > 0.1 && pc.frequency < 10.0);
    assert_relative_eq!(interp.interpolate(pc.frequency).unwrap(), -PI, epsilon = 1e-8);
    assert_relative_eq!(pc.value, loop_gain.at_omega(pc.frequency).norm(), epsilon = 1e-12);
    // G(jωco) itself lies on the negative real axis to grid accuracy
    let g = loop_gain.at_omega(pc.frequency);
    assert!(g.re < 0.0);
    assert!(g.im.abs() / g.norm() < 1e-2);

    let gc = result.gain_crossover().point().expect("gain crossover");
    assert!(gc.frequency > 0.1 && gc.frequency < 10.0);
    assert_relative_eq!(loop_gain.at_omega(gc.frequency).norm(), 1.0, epsilon = 1e-8);
    assert_relative_eq!(gc.value, interp.interpolate(gc.frequency).unwrap(), epsilon = 1e-12);

    // Gain crossover comes first for this loop: stable with positive margins
    assert!(gc.frequency < pc.frequency);
    assert!(pc.value < 1.0);
    assert!(gc.value > -PI);
}

#[test]
fn test_loop_gain_phase_is_continuous() {
    let result = analyze(&loop_gain, 0.1, 10.0, 100, false, false).unwrap();
    let phase = result.phase();

    for i in 1..phase.len() {
        assert!((phase[i] - phase[i - 1]).abs() <= PI);
    }
    // Phase ends well below -180°, beyond the principal range
    assert!(phase[phase.len() - 1] < -PI);
}

// ============================================================================
// Known analytic crossovers
// ============================================================================

#[test]
fn test_third_order_phase_crossover() {
    let result = analyze(&third_order, 0.1, 10.0, 500, true, false).unwrap();

    let pc = result.phase_crossover().point().unwrap();
    // atan(ω) + atan(ω/2) + atan(ω/3) = π at ω = √11, |G(j√11)| = 10/60
    assert_relative_eq!(pc.frequency, 11.0_f64.sqrt(), epsilon = 1e-3);
    assert_relative_eq!(pc.value, 1.0 / 6.0, epsilon = 1e-3);
    assert_eq!(*result.gain_crossover(), CrossoverOutcome::NotRequested);
}

#[test]
fn test_third_order_gain_crossover() {
    let result = analyze(&third_order, 0.1, 10.0, 500, false, true).unwrap();

    let gc = result.gain_crossover().point().unwrap();
    // |(j+1)(j+2)(j+3)| = 10
    assert_relative_eq!(gc.frequency, 1.0, epsilon = 1e-8);
    assert_relative_eq!(gc.value, -PI / 2.0, epsilon = 1e-4);
}

#[test]
fn test_methods_agree() {
    let base = AnalysisOptions::new()
        .with_phase_crossover(true)
        .with_gain_crossover(true);

    let brent = analyze_with(&loop_gain, 0.1, 10.0, 100, &base).unwrap();
    let bisect = analyze_with(
        &loop_gain,
        0.1,
        10.0,
        100,
        &base.with_root_method(RootMethod::Bisection),
    )
    .unwrap();

    let (a, b) = (
        brent.phase_crossover().point().unwrap(),
        bisect.phase_crossover().point().unwrap(),
    );
    assert_relative_eq!(a.frequency, b.frequency, epsilon = 1e-8);

    let (a, b) = (
        brent.gain_crossover().point().unwrap(),
        bisect.gain_crossover().point().unwrap(),
    );
    assert_relative_eq!(a.frequency, b.frequency, epsilon = 1e-8);
}

// ============================================================================
// Missing crossovers and errors
// ============================================================================

#[test]
fn test_integrator_without_unity_gain() {
    init_logger();
    for k in [0.01, 100.0] {
        let g = move |s: Complex64| Complex64::new(k, 0.0) / s;

        let result = analyze(&g, 0.1, 10.0, 50, false, true).unwrap();
        assert_eq!(*result.gain_crossover(), CrossoverOutcome::NotFound);

        let options = AnalysisOptions::new()
            .with_gain_crossover(true)
            .with_fail_fast(true);
        let err = analyze_with(&g, 0.1, 10.0, 50, &options).unwrap_err();
        assert_eq!(
            err,
            BodeError::NoRootInRange {
                crossover: CrossoverKind::Gain,
                omega_min: 0.1,
                omega_max: 10.0,
            }
        );
    }
}

#[test]
fn test_widening_window_finds_crossover() {
    // Unity gain at 20 rad/s, outside the first window
    let g = |s: Complex64| Complex64::new(20.0, 0.0) / s;

    let narrow = analyze(&g, 0.1, 10.0, 50, false, true).unwrap();
    assert!(!narrow.gain_crossover().is_found());

    let wide = analyze(&g, 0.1, 100.0, 50, false, true).unwrap();
    let gc = wide.gain_crossover().point().unwrap();
    assert_relative_eq!(gc.frequency, 20.0, epsilon = 1e-6);
}

#[test]
fn test_iteration_cap_is_an_error() {
    let options = AnalysisOptions::new()
        .with_gain_crossover(true)
        .with_root_method(RootMethod::Bisection)
        .with_root_options(
            RootOptions::default()
                .with_xtol(FrequencyTolerance::Absolute(1e-12))
                .with_max_iter(2),
        );
    let err = analyze_with(&third_order, 0.1, 10.0, 50, &options).unwrap_err();
    assert!(matches!(err, BodeError::DidNotConverge { iterations: 2, .. }));
}

#[test]
fn test_non_finite_response_on_grid() {
    let g = |s: Complex64| {
        if s.im > 5.0 {
            Complex64::new(f64::NAN, 0.0)
        } else {
            Complex64::new(1.0, 0.0) / s
        }
    };
    let err = analyze(&g, 0.1, 10.0, 50, false, false).unwrap_err();
    assert!(matches!(err, BodeError::NonFiniteValue { omega } if omega > 5.0));
}

#[test]
fn test_first_sign_change_on_resonant_loop() {
    // Peaked magnitude crosses unity twice; the window endpoints are both below 1
    let g = |s: Complex64| Complex64::new(0.5, 0.0) / (s * s + s * 0.2 + 1.0);

    let window = analyze(&g, 0.1, 10.0, 300, false, true).unwrap();
    assert_eq!(*window.gain_crossover(), CrossoverOutcome::NotFound);

    let options = AnalysisOptions::new()
        .with_gain_crossover(true)
        .with_bracket(BracketStrategy::FirstSignChange);
    let first = analyze_with(&g, 0.1, 10.0, 300, &options).unwrap();
    let gc = first.gain_crossover().point().unwrap();
    assert!(gc.frequency < 1.0);
    assert_relative_eq!(g.at_omega(gc.frequency).norm(), 1.0, epsilon = 1e-8);
}

#[test]
fn test_concurrent_search() {
    let options = AnalysisOptions::new()
        .with_phase_crossover(true)
        .with_gain_crossover(true)
        .with_concurrent(true);
    let result = analyze_with(&loop_gain, 0.1, 10.0, 100, &options).unwrap();

    assert!(result.phase_crossover().is_found());
    assert!(result.gain_crossover().is_found());
}
