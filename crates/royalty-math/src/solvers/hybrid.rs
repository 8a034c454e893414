//! Hybrid root-finding algorithm.
//!
//! Newton-Raphson for speed, bisection as the safety net.

use log::debug;

use crate::error::{MathError, MathResult};
use crate::solvers::{bisection, central_difference, SolverConfig, SolverResult};

/// Newton gets at most this many iterations before the fallback kicks in.
const NEWTON_BUDGET: u32 = 20;

/// Consecutive residual blow-ups tolerated before Newton is abandoned.
const MAX_DIVERGENCE: u32 = 3;

/// Hybrid root-finding algorithm.
///
/// 1. Run Newton-Raphson from `initial_guess` with a short iteration budget
/// 2. Abandon it on divergence, a vanishing derivative or a non-finite iterate
/// 3. Fall back to bisection on `bounds`, or on a bracket found by expanding
///    outward from `initial_guess` when no bounds are given
///
/// The bisection stage uses the full `config.max_iterations`.
pub fn hybrid<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    bounds: Option<(f64, f64)>,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    match newton_with_monitoring(&f, &df, initial_guess, config) {
        Ok(result) => Ok(result),
        Err(newton_err) => {
            debug!("Newton-Raphson abandoned ({newton_err}), falling back to bisection");
            let (a, b) = match bounds {
                Some(bracket) => bracket,
                None => find_bracket(&f, initial_guess).ok_or_else(|| {
                    MathError::invalid_input(
                        "Newton-Raphson failed and no bracketing interval was found",
                    )
                })?,
            };
            bisection(&f, a, b, config)
        }
    }
}

/// Hybrid solver with a central-difference derivative.
pub fn hybrid_numerical<F>(
    f: F,
    initial_guess: f64,
    bounds: Option<(f64, f64)>,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    hybrid(&f, |x| central_difference(&f, x), initial_guess, bounds, config)
}

/// Newton-Raphson that fails fast when the residual keeps growing.
fn newton_with_monitoring<F, DF>(
    f: &F,
    df: &DF,
    initial_guess: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let mut x = initial_guess;
    let mut prev_residual = f64::MAX;
    let mut divergence_count = 0;
    let budget = config.max_iterations.min(NEWTON_BUDGET);

    for iteration in 0..budget {
        let fx = f(x);
        let residual = fx.abs();

        if !fx.is_finite() {
            return Err(MathError::invalid_input("function is not finite at Newton iterate"));
        }

        if residual < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration,
                residual: fx,
            });
        }

        if residual > prev_residual * 2.0 {
            divergence_count += 1;
            if divergence_count >= MAX_DIVERGENCE {
                return Err(MathError::invalid_input("Newton-Raphson diverging"));
            }
        } else {
            divergence_count = 0;
        }
        prev_residual = residual;

        let dfx = df(x);
        if !dfx.is_finite() || dfx.abs() < 1e-15 {
            return Err(MathError::DivisionByZero { value: dfx });
        }

        let step = fx / dfx;
        x -= step;

        if !x.is_finite() {
            return Err(MathError::invalid_input("Newton produced non-finite value"));
        }

        if step.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration + 1,
                residual: f(x),
            });
        }
    }

    Err(MathError::convergence_failed(budget, f(x).abs()))
}

/// Expands symmetrically around `initial_guess` until a sign change shows up.
fn find_bracket<F>(f: &F, initial_guess: f64) -> Option<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    let f_init = f(initial_guess);
    let mut delta = 0.1;

    for _ in 0..40 {
        let left = initial_guess - delta;
        let right = initial_guess + delta;
        let f_left = f(left);
        let f_right = f(right);

        if f_left * f_init < 0.0 {
            return Some((left, initial_guess));
        }
        if f_right * f_init < 0.0 {
            return Some((initial_guess, right));
        }

        delta *= 2.0;
    }

    None
}
