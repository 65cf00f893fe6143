//! Uniform tenor grid and the eight zero-rate bootstrapping engines.
//!
//! Every engine consumes the same normalised pillar set and emits one
//! continuously-compounded zero rate per grid tenor. Discount factors,
//! forwards, and source tags are derived uniformly afterwards by the
//! assembler, so the engines stay pure interpolation/fitting kernels.
//!
//! Three engines work in zero-rate space (linear, cubic spline,
//! monotonic-convex), three in log-discount space (Bloomberg, log-linear,
//! log-cubic), one in forward space (linear-forward), and one is parametric
//! (Nelson-Siegel).

use crate::core::{BootstrapMethod, BootstrapPoint, PointSource};
use crate::math::nelson_siegel::{self, NelsonSiegelParams};
use crate::math::spline::NaturalCubicSpline;

/// Grid spacing for curves reaching past [`COARSE_THRESHOLD`].
const COARSE_STEP: f64 = 0.5;
/// Grid spacing for shorter curves.
const FINE_STEP: f64 = 0.25;
const COARSE_THRESHOLD: f64 = 10.0;
/// Smoothed Bloomberg forwards are floored here rather than at zero so the
/// rebuilt discount curve stays strictly decreasing.
const SMOOTHED_FORWARD_FLOOR: f64 = 1.0e-4;
/// Swap pillars dominate the Nelson-Siegel objective.
const SWAP_FIT_WEIGHT: f64 = 3.0;

/// Grid spacing rule shared by all engines.
pub(crate) fn grid_step(max_tenor: f64) -> f64 {
    if max_tenor > COARSE_THRESHOLD {
        COARSE_STEP
    } else {
        FINE_STEP
    }
}

/// Uniform grid `{step, 2·step, …}` covering `max_tenor + step`.
pub(crate) fn tenor_grid(max_tenor: f64) -> Vec<f64> {
    let step = grid_step(max_tenor);
    let n = ((max_tenor + step) / step).ceil() as usize;
    (1..=n).map(|k| k as f64 * step).collect()
}

/// Zero rates on the uniform grid, plus fitted parameters when the method is
/// parametric.
#[derive(Debug, Clone)]
pub(crate) struct EngineOutput {
    pub grid: Vec<f64>,
    pub zero_rates: Vec<f64>,
    pub parameters: Option<NelsonSiegelParams>,
}

/// Runs the selected engine over a sorted, de-duplicated pillar set.
///
/// Returns `None` for pillar sets the method cannot support (no pillars, or
/// a single pillar on a spline-kernel method); the caller maps that to the
/// benign-empty result.
pub(crate) fn run(method: BootstrapMethod, pillars: &[BootstrapPoint]) -> Option<EngineOutput> {
    if pillars.is_empty() {
        return None;
    }

    let tenors: Vec<f64> = pillars.iter().map(|p| p.tenor).collect();
    let rates: Vec<f64> = pillars.iter().map(|p| p.rate).collect();
    let grid = tenor_grid(tenors[tenors.len() - 1]);

    let mut parameters = None;
    let zero_rates = match method {
        BootstrapMethod::Linear => grid
            .iter()
            .map(|&t| interp_linear_flat(&tenors, &rates, t))
            .collect(),
        BootstrapMethod::CubicSpline => {
            let spline = NaturalCubicSpline::fit(tenors.clone(), rates.clone()).ok()?;
            grid.iter().map(|&t| spline.value(t)).collect()
        }
        BootstrapMethod::NelsonSiegel => {
            let weighted: Vec<(f64, f64, f64)> = pillars
                .iter()
                .map(|p| {
                    let weight = match p.source {
                        PointSource::Swap => SWAP_FIT_WEIGHT,
                        _ => 1.0,
                    };
                    (p.tenor, p.rate, weight)
                })
                .collect();
            let params = nelson_siegel::fit(&weighted);
            parameters = Some(params);
            grid.iter().map(|&t| params.value(t)).collect()
        }
        BootstrapMethod::Bloomberg => bloomberg_zero_rates(&tenors, &rates, &grid),
        BootstrapMethod::QuantlibLogLinear => log_linear_zero_rates(&tenors, &rates, &grid),
        BootstrapMethod::QuantlibLogCubic => log_cubic_zero_rates(&tenors, &rates, &grid)?,
        BootstrapMethod::QuantlibLinearForward => {
            linear_forward_zero_rates(&tenors, &rates, &grid)
        }
        BootstrapMethod::QuantlibMonotonicConvex => {
            monotonic_convex_zero_rates(&tenors, &rates, &grid)
        }
    };

    Some(EngineOutput {
        grid,
        zero_rates,
        parameters,
    })
}

/// Piecewise-linear interpolation with flat extrapolation at both ends.
fn interp_linear_flat(xs: &[f64], ys: &[f64], xq: f64) -> f64 {
    let n = xs.len();
    if xq <= xs[0] {
        return ys[0];
    }
    if xq >= xs[n - 1] {
        return ys[n - 1];
    }
    let i = xs.partition_point(|v| *v <= xq) - 1;
    let w = (xq - xs[i]) / (xs[i + 1] - xs[i]);
    ys[i] + w * (ys[i + 1] - ys[i])
}

/// Pillar log discount factors anchored at the origin, `log df(0) = 0`.
///
/// The anchor makes the short end interpolate against `df(0) = 1`, which is
/// exactly the `t/t₀` scaling the discount-space methods use below the first
/// pillar.
fn anchored_log_dfs(tenors: &[f64], rates: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut xs = Vec::with_capacity(tenors.len() + 1);
    let mut ys = Vec::with_capacity(tenors.len() + 1);
    xs.push(0.0);
    ys.push(0.0);
    for (t, r) in tenors.iter().zip(rates.iter()) {
        xs.push(*t);
        ys.push(-r * t);
    }
    (xs, ys)
}

/// Log-linear discount: linear pillar `log df`, flat continuous rate beyond
/// the last pillar.
fn log_linear_zero_rates(tenors: &[f64], rates: &[f64], grid: &[f64]) -> Vec<f64> {
    let (xs, ys) = anchored_log_dfs(tenors, rates);
    let t_last = tenors[tenors.len() - 1];
    let r_last = rates[rates.len() - 1];

    grid.iter()
        .map(|&t| {
            if t > t_last {
                r_last
            } else {
                -interp_linear_flat(&xs, &ys, t) / t
            }
        })
        .collect()
}

/// Log-cubic discount: natural spline through the anchored pillar `log df`
/// set; flat continuous rate beyond the last pillar.
fn log_cubic_zero_rates(tenors: &[f64], rates: &[f64], grid: &[f64]) -> Option<Vec<f64>> {
    if tenors.len() < 2 {
        return None;
    }

    let (xs, ys) = anchored_log_dfs(tenors, rates);
    let spline = NaturalCubicSpline::fit(xs, ys).ok()?;
    let t_last = tenors[tenors.len() - 1];
    let r_last = rates[rates.len() - 1];

    Some(
        grid.iter()
            .map(|&t| {
                if t > t_last {
                    r_last
                } else {
                    -spline.value(t) / t
                }
            })
            .collect(),
    )
}

/// Bloomberg-style pipeline: linear pillar `log df` on the grid, one
/// smoothing pass over the per-interval forwards, then discount factors
/// rebuilt from the smoothed forwards.
fn bloomberg_zero_rates(tenors: &[f64], rates: &[f64], grid: &[f64]) -> Vec<f64> {
    let (xs, ys) = anchored_log_dfs(tenors, rates);
    let t_last = tenors[tenors.len() - 1];
    let r_last = rates[rates.len() - 1];

    let dfs: Vec<f64> = grid
        .iter()
        .map(|&t| {
            let log_df = if t > t_last {
                -r_last * t
            } else {
                interp_linear_flat(&xs, &ys, t)
            };
            log_df.exp()
        })
        .collect();

    // Per-interval forwards, measured from the valuation date (df = 1).
    let n = grid.len();
    let mut forwards = Vec::with_capacity(n);
    let mut prev = (0.0, 1.0);
    for (&t, &df) in grid.iter().zip(dfs.iter()) {
        forwards.push(-(df / prev.1).ln() / (t - prev.0));
        prev = (t, df);
    }

    let smoothed = smooth_forwards(&forwards);

    let mut zero_rates = Vec::with_capacity(n);
    let mut prev = (0.0, 1.0);
    for (&t, &f) in grid.iter().zip(smoothed.iter()) {
        let df = prev.1 * (-f * (t - prev.0)).exp();
        zero_rates.push(-df.ln() / t);
        prev = (t, df);
    }
    zero_rates
}

/// One weighted-average pass over interior forwards; endpoints unchanged.
/// Neighbour reads come from the unsmoothed input so the pass stays
/// non-expansive on adjacent differences.
fn smooth_forwards(forwards: &[f64]) -> Vec<f64> {
    let n = forwards.len();
    let mut smoothed = forwards.to_vec();
    for i in 1..n.saturating_sub(1) {
        smoothed[i] = 0.6 * forwards[i] + 0.2 * forwards[i - 1] + 0.2 * forwards[i + 1];
    }
    for f in &mut smoothed {
        *f = f.max(SMOOTHED_FORWARD_FLOOR);
    }
    smoothed
}

/// Linear-forward: linear interpolation of pillar forward estimates, used
/// directly as the grid zero rate.
///
/// Assigning the forward to the zero rate (rather than integrating it) is
/// the documented behaviour of this method; the assembler still derives the
/// emitted forward curve from discount factors.
fn linear_forward_zero_rates(tenors: &[f64], rates: &[f64], grid: &[f64]) -> Vec<f64> {
    let n = tenors.len();
    let mut pillar_forwards = Vec::with_capacity(n);
    pillar_forwards.push(rates[0]);
    for i in 1..n {
        let slope = (rates[i] - rates[i - 1]) / (tenors[i] - tenors[i - 1]);
        pillar_forwards.push(rates[i] + tenors[i] * slope);
    }

    grid.iter()
        .map(|&t| interp_linear_flat(tenors, &pillar_forwards, t))
        .collect()
}

/// Monotonic-convex: cubic Hermite segments with equal endpoint slopes, the
/// segment slope zeroed by the Hyman filter wherever neighbouring secants
/// disagree in sign.
fn monotonic_convex_zero_rates(tenors: &[f64], rates: &[f64], grid: &[f64]) -> Vec<f64> {
    let n = tenors.len();
    if n == 1 {
        return vec![rates[0]; grid.len()];
    }

    let secants: Vec<f64> = (0..n - 1)
        .map(|i| (rates[i + 1] - rates[i]) / (tenors[i + 1] - tenors[i]))
        .collect();

    grid.iter()
        .map(|&tq| {
            if tq <= tenors[0] {
                return rates[0];
            }
            if tq >= tenors[n - 1] {
                return rates[n - 1];
            }

            let i = tenors.partition_point(|v| *v <= tq) - 1;
            let s = secants[i];
            let s_prev = if i > 0 { secants[i - 1] } else { s };
            let s_next = if i + 1 < secants.len() { secants[i + 1] } else { s };
            let s = if s_prev * s < 0.0 || s * s_next < 0.0 {
                0.0
            } else {
                s
            };

            let dt = tenors[i + 1] - tenors[i];
            let x = (tq - tenors[i]) / dt;
            let (h00, h10, h01, h11) = hermite_basis(x);
            h00 * rates[i] + h10 * dt * s + h01 * rates[i + 1] + h11 * dt * s
        })
        .collect()
}

fn hermite_basis(x: f64) -> (f64, f64, f64, f64) {
    let x2 = x * x;
    let x3 = x2 * x;
    (
        2.0 * x3 - 3.0 * x2 + 1.0,
        x3 - 2.0 * x2 + x,
        -2.0 * x3 + 3.0 * x2,
        x3 - x2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pillar(tenor: f64, rate: f64, source: PointSource) -> BootstrapPoint {
        BootstrapPoint {
            tenor,
            rate,
            source,
            priority: source.priority(),
            adjusted: false,
            original_rate: None,
        }
    }

    fn swap_pillars(quotes: &[(f64, f64)]) -> Vec<BootstrapPoint> {
        quotes
            .iter()
            .map(|&(t, r)| pillar(t, r, PointSource::Swap))
            .collect()
    }

    #[test]
    fn grid_step_switches_at_ten_years() {
        assert_relative_eq!(grid_step(5.0), 0.25);
        assert_relative_eq!(grid_step(10.0), 0.25);
        assert_relative_eq!(grid_step(10.01), 0.5);
        assert_relative_eq!(grid_step(30.0), 0.5);
    }

    #[test]
    fn grid_covers_max_tenor_plus_one_step() {
        let grid = tenor_grid(10.0);
        assert_eq!(grid.len(), 41);
        assert_relative_eq!(grid[0], 0.25, epsilon = 1e-12);
        assert_relative_eq!(grid[40], 10.25, epsilon = 1e-12);

        let coarse = tenor_grid(30.0);
        assert_eq!(coarse.len(), 61);
        assert_relative_eq!(coarse[60], 30.5, epsilon = 1e-12);

        assert!(grid.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn linear_engine_reproduces_pillars_on_grid() {
        let pillars = swap_pillars(&[(1.0, 0.045), (2.0, 0.043), (5.0, 0.042)]);
        let out = run(BootstrapMethod::Linear, &pillars).unwrap();

        for p in &pillars {
            let k = out
                .grid
                .iter()
                .position(|t| (t - p.tenor).abs() < 1e-12)
                .unwrap();
            assert_relative_eq!(out.zero_rates[k], p.rate, epsilon = 1e-9);
        }
    }

    #[test]
    fn cubic_spline_engine_reproduces_pillars_on_grid() {
        let pillars = swap_pillars(&[(1.0, 0.03), (2.0, 0.035), (5.0, 0.04), (10.0, 0.038)]);
        let out = run(BootstrapMethod::CubicSpline, &pillars).unwrap();

        for p in &pillars {
            let k = out
                .grid
                .iter()
                .position(|t| (t - p.tenor).abs() < 1e-12)
                .unwrap();
            assert_relative_eq!(out.zero_rates[k], p.rate, epsilon = 1e-9);
        }
    }

    #[test]
    fn spline_methods_reject_single_pillar() {
        let single = swap_pillars(&[(2.0, 0.04)]);
        assert!(run(BootstrapMethod::CubicSpline, &single).is_none());
        assert!(run(BootstrapMethod::QuantlibLogCubic, &single).is_none());
        // Local interpolants degrade to a flat curve instead.
        let out = run(BootstrapMethod::Linear, &single).unwrap();
        assert!(out.zero_rates.iter().all(|r| (r - 0.04).abs() < 1e-12));
    }

    #[test]
    fn log_linear_engine_keeps_flat_curve_flat() {
        let pillars = swap_pillars(&[(1.0, 0.04), (2.0, 0.04), (5.0, 0.04)]);
        let out = run(BootstrapMethod::QuantlibLogLinear, &pillars).unwrap();

        // Constant pillar rates must survive interpolation, the short-end
        // origin anchor, and the tail extrapolation.
        for r in &out.zero_rates {
            assert_relative_eq!(*r, 0.04, epsilon = 1e-12);
        }
    }

    #[test]
    fn log_cubic_engine_reproduces_pillars_on_grid() {
        let pillars = swap_pillars(&[(1.0, 0.03), (2.0, 0.035), (5.0, 0.04), (10.0, 0.038)]);
        let out = run(BootstrapMethod::QuantlibLogCubic, &pillars).unwrap();

        for p in &pillars {
            let k = out
                .grid
                .iter()
                .position(|t| (t - p.tenor).abs() < 1e-12)
                .unwrap();
            assert_relative_eq!(out.zero_rates[k], p.rate, epsilon = 1e-9);
        }
    }

    #[test]
    fn linear_forward_engine_matches_pillar_forward_estimates() {
        let tenors = vec![1.0, 2.0, 4.0];
        let rates = vec![0.03, 0.035, 0.038];
        let grid = tenor_grid(4.0);
        let out = linear_forward_zero_rates(&tenors, &rates, &grid);

        // f₀ = r₀; f_i = r_i + t_i·(r_i − r_{i−1})/(t_i − t_{i−1}).
        let k1 = grid.iter().position(|t| (t - 1.0).abs() < 1e-12).unwrap();
        assert_relative_eq!(out[k1], 0.03, epsilon = 1e-12);
        let k2 = grid.iter().position(|t| (t - 2.0).abs() < 1e-12).unwrap();
        assert_relative_eq!(out[k2], 0.035 + 2.0 * 0.005, epsilon = 1e-12);
        let k4 = grid.iter().position(|t| (t - 4.0).abs() < 1e-12).unwrap();
        assert_relative_eq!(out[k4], 0.038 + 4.0 * 0.0015, epsilon = 1e-12);
    }

    #[test]
    fn monotonic_convex_zeroes_slope_at_turning_points() {
        let tenors = vec![1.0, 2.0, 3.0];
        let rates = vec![0.03, 0.05, 0.04];
        let grid = tenor_grid(3.0);
        let out = monotonic_convex_zero_rates(&tenors, &rates, &grid);

        // The hump at 2y flips the secant sign on both sides, so both
        // segments collapse to slope-zero Hermite steps bounded by their
        // endpoint rates.
        for (t, r) in grid.iter().zip(out.iter()) {
            if *t <= 3.0 {
                assert!(*r <= 0.05 + 1e-12, "overshoot at {t}: {r}");
                assert!(*r >= 0.03 - 1e-12, "undershoot at {t}: {r}");
            }
        }

        let k2 = grid.iter().position(|t| (t - 2.0).abs() < 1e-12).unwrap();
        assert_relative_eq!(out[k2], 0.05, epsilon = 1e-9);
    }

    #[test]
    fn monotonic_convex_preserves_monotone_pillars() {
        let tenors = vec![1.0, 2.0, 5.0, 10.0];
        let rates = vec![0.02, 0.03, 0.04, 0.045];
        let grid = tenor_grid(10.0);
        let out = monotonic_convex_zero_rates(&tenors, &rates, &grid);

        for w in out.windows(2) {
            assert!(w[1] >= w[0] - 1e-12);
        }
    }

    #[test]
    fn bloomberg_smoothing_is_non_expansive_on_adjacent_differences() {
        let forwards = vec![0.050, 0.042, 0.061, 0.039, 0.055, 0.047];
        let smoothed = smooth_forwards(&forwards);

        let max_diff = |f: &[f64]| {
            f.windows(2)
                .map(|w| (w[1] - w[0]).abs())
                .fold(0.0, f64::max)
        };
        assert!(max_diff(&smoothed) <= max_diff(&forwards) + 1e-15);
        assert_relative_eq!(smoothed[0], forwards[0], epsilon = 1e-15);
        assert_relative_eq!(smoothed[5], forwards[5], epsilon = 1e-15);
    }

    #[test]
    fn bloomberg_engine_floors_forwards() {
        // A violently inverted curve would imply negative forwards; the
        // rebuilt curve keeps them at the floor instead.
        let pillars = swap_pillars(&[(1.0, 0.06), (2.0, 0.02)]);
        let out = run(BootstrapMethod::Bloomberg, &pillars).unwrap();

        let mut prev = (0.0, 1.0_f64);
        for (&t, &r) in out.grid.iter().zip(out.zero_rates.iter()) {
            let df = (-r * t).exp();
            let f = -(df / prev.1).ln() / (t - prev.0);
            assert!(f >= SMOOTHED_FORWARD_FLOOR - 1e-12);
            prev = (t, df);
        }
    }
}
