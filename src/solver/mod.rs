//! Scalar root finding: a secant iteration plus a sign-change sweep driver
//! that collects every root in a window around the caller's guess.

use crate::error::{EngineError, Result};

pub const EPSILON: f64 = 1e-8;
pub const MAX_ITER: usize = 1000;
pub const DEDUP_TOL: f64 = 1e-5;
pub const SWEEP_RANGE: f64 = 50.0;
pub const SWEEP_STEPS: usize = 2000;

const SEED_STEP: f64 = 0.1;
const FLAT_SECANT_TOL: f64 = 1e-14;
const RECOVERY_ENVELOPE: f64 = 0.05;

/// Sweep window for [`find_all_roots`]. The defaults cover
/// `[guess - 50, guess + 50]` in 2000 steps.
#[derive(Debug, Clone)]
pub struct SweepOptions {
    pub range: f64,
    pub steps: usize,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            range: SWEEP_RANGE,
            steps: SWEEP_STEPS,
        }
    }
}

/// Find one root of `f` by the secant method seeded at `guess` and
/// `guess + 0.1`.
///
/// If either seed already satisfies `|f| < EPSILON` it is returned without
/// iterating. When the secant denominator degenerates (the two latest
/// function values nearly equal), the iterate is nudged by a deterministic
/// expanding, alternating offset within ±0.05 to escape flat regions; the
/// nudge spends an iteration, so the call always terminates within
/// `MAX_ITER` loop passes.
pub fn find_root<F: Fn(f64) -> f64>(f: F, guess: f64) -> Result<f64> {
    let mut x0 = guess;
    let mut f0 = f(x0);
    if f0.abs() < EPSILON {
        return Ok(x0);
    }
    let mut x1 = guess + SEED_STEP;
    let mut f1 = f(x1);
    if f1.abs() < EPSILON {
        return Ok(x1);
    }

    let mut recoveries = 0usize;
    for _ in 0..MAX_ITER {
        if (f1 - f0).abs() < FLAT_SECANT_TOL {
            recoveries += 1;
            x1 += recovery_nudge(recoveries);
            f1 = f(x1);
            continue;
        }

        let x2 = x1 - f1 * (x1 - x0) / (f1 - f0);
        let f2 = f(x2);
        if f2.abs() < EPSILON {
            return Ok(x2);
        }

        x0 = x1;
        f0 = f1;
        x1 = x2;
        f1 = f2;
    }

    Err(EngineError::Convergence(format!(
        "no root found near {guess} within {MAX_ITER} iterations"
    )))
}

// k-th recovery offset: alternating sign, magnitude growing toward the
// ±0.05 envelope. Deterministic replacement for a random perturbation.
fn recovery_nudge(k: usize) -> f64 {
    let magnitude = RECOVERY_ENVELOPE * k as f64 / (k as f64 + 1.0);
    if k % 2 == 0 { -magnitude } else { magnitude }
}

/// Find every root of `f` reachable from `guess`: one secant attempt from
/// the guess itself, then a linear sweep over the window looking for sign
/// changes, with a secant call seeded at each bracketing pair's midpoint.
/// Individual failures are swallowed; an empty final set is a convergence
/// error.
///
/// Candidates within `DEDUP_TOL` of an earlier one are dropped, and the
/// result is sorted ascending by distance from `guess` (stable, so ties keep
/// discovery order: the seeded root first, then ascending sweep position).
pub fn find_all_roots<F: Fn(f64) -> f64>(
    f: F,
    guess: f64,
    options: SweepOptions,
) -> Result<Vec<f64>> {
    let mut candidates: Vec<f64> = Vec::new();
    if let Ok(root) = find_root(&f, guess) {
        candidates.push(root);
    }

    let lo = guess - options.range;
    let step = 2.0 * options.range / options.steps as f64;
    let mut prev_x = lo;
    let mut prev_f = f(prev_x);
    for i in 1..=options.steps {
        let x = lo + step * i as f64;
        let fx = f(x);
        // NaN at either endpoint fails the comparison and skips the pair
        if prev_f * fx <= 0.0 {
            if let Ok(root) = find_root(&f, 0.5 * (prev_x + x)) {
                candidates.push(root);
            }
        }
        prev_x = x;
        prev_f = fx;
    }

    let mut roots: Vec<f64> = Vec::new();
    for candidate in candidates {
        if roots.iter().all(|r| (r - candidate).abs() > DEDUP_TOL) {
            roots.push(candidate);
        }
    }
    roots.sort_by(|a, b| (a - guess).abs().total_cmp(&(b - guess).abs()));

    if roots.is_empty() {
        return Err(EngineError::Convergence(
            "no roots found in the sweep window".to_string(),
        ));
    }
    Ok(roots)
}
