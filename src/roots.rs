//! One-dimensional root finding.
//!
//! Three strategies over a real function restricted to an [`Interval`]:
//!
//! - [`find_roots_bisection`]: linear scan for sign changes, refined by bisection.
//! - [`find_roots_newton`]: the same scan, refined by Newton–Raphson.
//! - [`smallest_root_of_distance`]: sphere tracing for conservative distance
//!   estimators, which may step by the function's own value.
//!
//! Scans can miss roots closer together than the scan step and will report a
//! spurious root at a pole where the function changes sign without crossing
//! zero. Callers that plot or render accept both.

use crate::field::MIN_SURFACE_DISTANCE;
use crate::interval::Interval;

/// Scan increment used before bisection.
pub const BISECTION_SCAN_STEP: f32 = 0.2;

/// Halvings spent refining one bracket.
pub const BISECTION_ITERATIONS: u32 = 80;

/// Bisection stops once `|f(mid)|` is this small.
pub const BISECTION_TOLERANCE: f32 = 3e-4;

/// Scan increment used before Newton refinement.
pub const NEWTON_SCAN_STEP: f32 = 0.3;

/// Newton stops once `|f(x)|` is this small.
pub const NEWTON_TOLERANCE: f32 = 1e-5;

/// Newton gives up after this many steps.
pub const NEWTON_MAX_ITERATIONS: u32 = 64;

/// Step of the central-difference derivative.
pub const DERIVATIVE_STEP: f32 = 1e-3;

/// Smallest advance of the sphere tracer, so it cannot stall at a zero estimate.
pub const MIN_MARCH_STEP: f32 = 1e-3;

/// Find roots of `f` on `domain` by scanning at [`BISECTION_SCAN_STEP`] and
/// bisecting every sign change.
///
/// A sample that is exactly zero carries no sign. It is skipped, so it only
/// contributes a root when the samples around it have strictly opposite signs;
/// a function that merely touches zero is not reported.
pub fn find_roots_bisection<F>(f: F, domain: Interval) -> Vec<f32>
where
    F: Fn(f32) -> f32,
{
    sign_changes(&f, domain, BISECTION_SCAN_STEP)
        .into_iter()
        .map(|(lo, hi)| bisect(&f, lo, hi, BISECTION_ITERATIONS))
        .collect()
}

/// Find roots of `f` on `domain` by scanning at [`NEWTON_SCAN_STEP`] and
/// running [`newton_search`] from the left end of every sign change.
///
/// Brackets where Newton does not converge are dropped.
pub fn find_roots_newton<F>(f: F, domain: Interval) -> Vec<f32>
where
    F: Fn(f32) -> f32,
{
    sign_changes(&f, domain, NEWTON_SCAN_STEP)
        .into_iter()
        .filter_map(|(lo, _)| newton_search(&f, lo, domain))
        .collect()
}

/// Brackets `(lo, hi)` between consecutive signed samples of opposite sign.
fn sign_changes<F>(f: &F, domain: Interval, step: f32) -> Vec<(f32, f32)>
where
    F: Fn(f32) -> f32,
{
    let mut brackets = Vec::new();
    let mut last_signed: Option<(f32, f32)> = None;

    for x in domain.samples(step) {
        let fx = f(x);
        if fx == 0.0 || fx.is_nan() {
            continue;
        }
        if let Some((prev_x, prev_fx)) = last_signed {
            if (prev_fx < 0.0) != (fx < 0.0) {
                brackets.push((prev_x, x));
            }
        }
        last_signed = Some((x, fx));
    }

    brackets
}

/// Bisect `[lo, hi]` for at most `iterations` halvings.
///
/// Returns the midpoint as soon as `|f(mid)| <= BISECTION_TOLERANCE`, or the
/// last midpoint once the budget is spent. The bracket is assumed to contain a
/// sign change; if it does not, the result drifts toward `hi`.
pub fn bisect<F>(f: F, mut lo: f32, mut hi: f32, iterations: u32) -> f32
where
    F: Fn(f32) -> f32,
{
    let mut mid = 0.5 * (lo + hi);
    for _ in 0..iterations {
        let f_mid = f(mid);
        if f_mid.abs() <= BISECTION_TOLERANCE {
            return mid;
        }
        let f_lo = f(lo);
        if (f_mid < 0.0 && f_lo < 0.0) || (f_mid > 0.0 && f_lo > 0.0) {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    mid
}

/// Central-difference derivative of `f` at `x`.
pub fn derivative<F>(f: F, x: f32, h: f32) -> f32
where
    F: Fn(f32) -> f32,
{
    (f(x + h) - f(x - h)) / (2.0 * h)
}

/// Newton–Raphson from `x`, using a numerical derivative.
///
/// Returns `None` when the slope vanishes, the iterate leaves `domain` widened
/// by one scan step, or [`NEWTON_MAX_ITERATIONS`] pass without `|f(x)|`
/// dropping to [`NEWTON_TOLERANCE`].
pub fn newton_search<F>(f: F, mut x: f32, domain: Interval) -> Option<f32>
where
    F: Fn(f32) -> f32,
{
    let bounds = domain.expand(NEWTON_SCAN_STEP);

    for _ in 0..NEWTON_MAX_ITERATIONS {
        let slope = derivative(&f, x, DERIVATIVE_STEP);
        if slope == 0.0 || !slope.is_finite() {
            return None;
        }

        x -= f(x) / slope;
        if !bounds.contains(x) {
            return None;
        }
        if f(x).abs() <= NEWTON_TOLERANCE {
            return Some(x);
        }
    }

    None
}

/// Smallest `x` in `domain` where the distance estimator `f` reaches zero.
///
/// `f` must be conservative: for `f(x) > 0` there is no root on
/// `[x, x + f(x)]`. The march advances by `max(f(x), MIN_MARCH_STEP)` until it
/// crosses the surface, then bisects the last step. The refined point only
/// counts as a hit when `f` there is below [`MIN_SURFACE_DISTANCE`].
///
/// Features thinner than one march step can still be skipped.
pub fn smallest_root_of_distance<F>(f: F, domain: Interval) -> Option<f32>
where
    F: Fn(f32) -> f32,
{
    let mut x = domain.min;
    let mut last = x;

    loop {
        let distance = f(x);
        if !(distance > 0.0 && x <= domain.max) {
            break;
        }
        last = x;
        x += distance.max(MIN_MARCH_STEP);
    }

    if x > domain.max {
        return None;
    }

    let root = bisect(&f, last, x, BISECTION_ITERATIONS);
    (f(root) < MIN_SURFACE_DISTANCE).then_some(root)
}
