//! Numeric quadrature and the integration-limit solver built on top of it.

use crate::error::{EngineError, Result};
use crate::solver::find_root;

pub const DEFAULT_SUBINTERVALS: usize = 1000;

const MIN_LIMIT_SUBINTERVALS: usize = 30;
const MAX_LIMIT_SUBINTERVALS: usize = 3000;
const SUBINTERVALS_PER_UNIT: f64 = 50.0;
const FLAT_HEIGHT_TOL: f64 = 1e-4;
const MAX_GUESS_OFFSET: f64 = 1000.0;

/// Definite integral of `f` over `[a, b]` by the composite Simpson's 3/8
/// rule with `n` subintervals (rounded up to the next multiple of 3;
/// [`DEFAULT_SUBINTERVALS`] is a good general-purpose choice).
///
/// Non-finite values of `f` propagate into the result; a NaN or infinite
/// return is the failure signal, no error is raised here.
pub fn integrate<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, n: usize) -> f64 {
    let n = match n % 3 {
        0 => n.max(3),
        r => n + (3 - r),
    };
    let h = (b - a) / n as f64;
    let mut sum = f(a) + f(b);
    for i in 1..n {
        let weight = if i % 3 == 0 { 2.0 } else { 3.0 };
        sum += weight * f(a + h * i as f64);
    }
    3.0 * h / 8.0 * sum
}

/// Solve for the unknown bound of `∫ f` so the integral equals the target
/// area. `known_limit` and `target_area` arrive as user-typed strings;
/// `upper_unknown` picks which bound is solved for.
///
/// The residual integrates with a resolution proportional to the current
/// bracket width (clamped to 30..=3000 subintervals) and is handed to the
/// secant root finder, seeded by a rectangle estimate of the unknown bound.
pub fn solve_limit<F: Fn(f64) -> f64>(
    f: F,
    known_limit: &str,
    upper_unknown: bool,
    target_area: &str,
) -> Result<f64> {
    let known: f64 = known_limit
        .trim()
        .parse()
        .map_err(|_| EngineError::Parse(format!("invalid integration limit '{known_limit}'")))?;
    let target: f64 = target_area
        .trim()
        .parse()
        .map_err(|_| EngineError::Parse(format!("invalid target area '{target_area}'")))?;

    let residual = |x: f64| {
        let (a, b) = if upper_unknown { (known, x) } else { (x, known) };
        let width = (b - a).abs();
        let n = subintervals_for_width(width);
        integrate(&f, a, b, n) - target
    };

    let sample = f(known);
    let height = if sample.abs() > FLAT_HEIGHT_TOL {
        sample
    } else {
        1.0
    };
    let offset = (target / height).clamp(-MAX_GUESS_OFFSET, MAX_GUESS_OFFSET);
    let guess = if upper_unknown {
        known + offset
    } else {
        known - offset
    };

    find_root(residual, guess).map_err(|_| {
        EngineError::Convergence(
            "the function might not reach the target area".to_string(),
        )
    })
}

fn subintervals_for_width(width: f64) -> usize {
    let n = (width * SUBINTERVALS_PER_UNIT).ceil();
    if n.is_finite() && n >= 0.0 {
        (n as usize).clamp(MIN_LIMIT_SUBINTERVALS, MAX_LIMIT_SUBINTERVALS)
    } else {
        MIN_LIMIT_SUBINTERVALS
    }
}

#[cfg(test)]
mod calculus_internal_tests {
    use super::*;

    #[test]
    fn pads_subintervals_to_a_multiple_of_three() {
        // n = 10 must behave exactly as n = 12
        let padded = integrate(f64::sin, 0.0, std::f64::consts::PI, 10);
        let explicit = integrate(f64::sin, 0.0, std::f64::consts::PI, 12);
        assert_eq!(padded.to_bits(), explicit.to_bits());
    }

    #[test]
    fn width_proportional_resolution_is_clamped() {
        assert_eq!(subintervals_for_width(0.0), 30);
        assert_eq!(subintervals_for_width(1.0), 50);
        assert_eq!(subintervals_for_width(1e6), 3000);
        assert_eq!(subintervals_for_width(f64::NAN), 30);
    }

    #[test]
    fn rejects_unparsable_limit_strings() {
        let err = solve_limit(|x| x, "zero", true, "8").expect_err("bad limit");
        assert!(err.to_string().contains("invalid integration limit"));

        let err = solve_limit(|x| x, "0", true, "lots").expect_err("bad area");
        assert!(err.to_string().contains("invalid target area"));
    }
}
