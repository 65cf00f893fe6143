//! Core domain types: calibration pillars, grid points, and the bootstrap
//! result container.

pub mod serialization;

pub use serialization::{from_json, from_msgpack, to_json_pretty, to_msgpack};

use crate::curve::conventions::BasisConvention;
use crate::math::nelson_siegel::NelsonSiegelParams;

/// Origin of a calibration pillar or curve grid point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointSource {
    /// Par interest-rate swap quote.
    Swap,
    /// Money-market futures quote (price-implied rate).
    Futures,
    /// Government bond yield.
    Bond,
    /// Grid point between pillars, produced by interpolation.
    Interpolated,
}

impl PointSource {
    /// Calibration authority of a pillar: swaps and bonds outrank futures.
    /// Lower value wins during de-duplication.
    pub fn priority(self) -> u8 {
        match self {
            Self::Swap | Self::Bond => 1,
            Self::Futures | Self::Interpolated => 2,
        }
    }
}

impl std::fmt::Display for PointSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Swap => "swap",
            Self::Futures => "futures",
            Self::Bond => "bond",
            Self::Interpolated => "interpolated",
        };
        f.write_str(label)
    }
}

/// Curve construction method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapMethod {
    /// Piecewise-linear zero rates.
    Linear,
    /// Natural cubic spline on zero rates.
    CubicSpline,
    /// Four-parameter Nelson-Siegel fit.
    NelsonSiegel,
    /// Log-discount interpolation with a forward smoothing pass.
    Bloomberg,
    /// Piecewise-linear log discount factors.
    QuantlibLogLinear,
    /// Natural cubic spline on log discount factors.
    QuantlibLogCubic,
    /// Linear interpolation of pillar forward estimates.
    QuantlibLinearForward,
    /// Hyman-filtered monotone-convex Hermite segments.
    QuantlibMonotonicConvex,
}

impl BootstrapMethod {
    /// All supported methods, in display order.
    pub const ALL: [BootstrapMethod; 8] = [
        Self::Linear,
        Self::CubicSpline,
        Self::NelsonSiegel,
        Self::Bloomberg,
        Self::QuantlibLogLinear,
        Self::QuantlibLogCubic,
        Self::QuantlibLinearForward,
        Self::QuantlibMonotonicConvex,
    ];

    /// Resolves a method identifier. Unknown names fall back to [`Self::Linear`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "linear" => Self::Linear,
            "cubic_spline" => Self::CubicSpline,
            "nelson_siegel" => Self::NelsonSiegel,
            "bloomberg" => Self::Bloomberg,
            "quantlib_log_linear" => Self::QuantlibLogLinear,
            "quantlib_log_cubic" => Self::QuantlibLogCubic,
            "quantlib_linear_forward" => Self::QuantlibLinearForward,
            "quantlib_monotonic_convex" => Self::QuantlibMonotonicConvex,
            _ => Self::Linear,
        }
    }

    /// Canonical method identifier.
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::CubicSpline => "cubic_spline",
            Self::NelsonSiegel => "nelson_siegel",
            Self::Bloomberg => "bloomberg",
            Self::QuantlibLogLinear => "quantlib_log_linear",
            Self::QuantlibLogCubic => "quantlib_log_cubic",
            Self::QuantlibLinearForward => "quantlib_linear_forward",
            Self::QuantlibMonotonicConvex => "quantlib_monotonic_convex",
        }
    }
}

impl std::fmt::Display for BootstrapMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A calibration pillar after normalisation to continuous compounding.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BootstrapPoint {
    /// Tenor in years, strictly positive.
    pub tenor: f64,
    /// Continuously-compounded zero rate, decimal.
    pub rate: f64,
    /// Instrument the pillar came from.
    pub source: PointSource,
    /// Calibration authority; see [`PointSource::priority`].
    pub priority: u8,
    /// True iff a futures rate was pulled toward the swap interpolation.
    pub adjusted: bool,
    /// The pre-adjustment rate, set iff `adjusted`.
    pub original_rate: Option<f64>,
}

/// One grid point of the bootstrapped curve.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DiscountFactor {
    /// Tenor in years.
    pub tenor: f64,
    /// Discount factor, in `(0, 1]` for non-negative curves.
    pub df: f64,
    /// Continuously-compounded zero rate, `−ln(df)/tenor`.
    pub zero_rate: f64,
    /// Instantaneous forward over the preceding grid interval, clamped to
    /// zero from below. `None` serialises as `N/A` in CSV exports.
    pub forward_rate: Option<f64>,
    /// Nearest pillar's source, or `Interpolated` away from pillars.
    pub source: PointSource,
}

/// A `(tenor, zero rate)` pair for display consumers.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurvePoint {
    pub tenor: f64,
    pub zero_rate: f64,
}

/// Output of one bootstrap call. Owns all of its arrays; no state is shared
/// between calls.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BootstrapResult {
    /// Method that produced the curve.
    pub method: BootstrapMethod,
    /// ISO currency code the inputs were quoted in.
    pub currency: String,
    /// Convention used to normalise par rates.
    pub basis_convention: BasisConvention,
    /// Pillars as received, after convention conversion but before
    /// reconciliation and de-duplication.
    pub input_points: Vec<BootstrapPoint>,
    /// Final pillar set: reconciled, de-duplicated, sorted by tenor.
    pub adjusted_points: Vec<BootstrapPoint>,
    /// The bootstrapped grid in ascending tenor order.
    pub discount_factors: Vec<DiscountFactor>,
    /// `(tenor, zero rate)` view of the same grid.
    pub curve_points: Vec<CurvePoint>,
    /// Fitted parameters, Nelson-Siegel only.
    pub parameters: Option<NelsonSiegelParams>,
}

impl BootstrapResult {
    /// True when the bootstrap degenerated to an empty curve.
    pub fn is_empty(&self) -> bool {
        self.discount_factors.is_empty()
    }

    /// Returns the discount factor at tenor `t` using log-linear
    /// interpolation between grid points.
    ///
    /// `t ≤ 0` and the empty curve return 1.0. Below the first grid point
    /// the curve is interpolated against `df(0) = 1`; beyond the last point
    /// the final segment is extended.
    pub fn discount_factor(&self, t: f64) -> f64 {
        if t <= 0.0 || self.discount_factors.is_empty() {
            return 1.0;
        }

        let points = &self.discount_factors;
        let first = points[0];
        if t <= first.tenor {
            return log_linear_df(0.0, 1.0, first.tenor, first.df, t);
        }

        for window in points.windows(2) {
            let (left, right) = (window[0], window[1]);
            if t <= right.tenor {
                return log_linear_df(left.tenor, left.df, right.tenor, right.df, t);
            }
        }

        if points.len() == 1 {
            let z = -first.df.ln() / first.tenor;
            return (-z * t).exp();
        }

        let left = points[points.len() - 2];
        let right = points[points.len() - 1];
        log_linear_df(left.tenor, left.df, right.tenor, right.df, t)
    }

    /// Returns the continuously-compounded zero rate at tenor `t`.
    pub fn zero_rate(&self, t: f64) -> f64 {
        if t <= 0.0 || self.discount_factors.is_empty() {
            return 0.0;
        }
        -self.discount_factor(t).ln() / t
    }

    /// Returns the continuously-compounded forward rate between `t1` and `t2`.
    pub fn forward_rate(&self, t1: f64, t2: f64) -> f64 {
        assert!(t2 > t1, "t2 must be greater than t1");
        (self.discount_factor(t1) / self.discount_factor(t2)).ln() / (t2 - t1)
    }
}

fn log_linear_df(t1: f64, df1: f64, t2: f64, df2: f64, t: f64) -> f64 {
    if (t2 - t1).abs() <= f64::EPSILON {
        return df2;
    }
    let w = (t - t1) / (t2 - t1);
    (df1.ln() + w * (df2.ln() - df1.ln())).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn unknown_method_falls_back_to_linear() {
        assert_eq!(BootstrapMethod::from_name("linear"), BootstrapMethod::Linear);
        assert_eq!(
            BootstrapMethod::from_name("quantlib_monotonic_convex"),
            BootstrapMethod::QuantlibMonotonicConvex
        );
        assert_eq!(BootstrapMethod::from_name("splines!!"), BootstrapMethod::Linear);
        assert_eq!(BootstrapMethod::from_name(""), BootstrapMethod::Linear);
    }

    #[test]
    fn method_names_round_trip() {
        for method in BootstrapMethod::ALL {
            assert_eq!(BootstrapMethod::from_name(method.name()), method);
        }
    }

    #[test]
    fn pillar_priority_ranks_swaps_over_futures() {
        assert!(PointSource::Swap.priority() < PointSource::Futures.priority());
        assert_eq!(PointSource::Bond.priority(), PointSource::Swap.priority());
    }

    #[test]
    fn discount_factor_lookup_interpolates_log_linearly() {
        let result = crate::curve::bootstrap(
            &[(1.0, 0.04), (2.0, 0.04), (5.0, 0.04)],
            &[],
            BootstrapMethod::QuantlibLogLinear,
            "USD",
        );

        let r = 2.0 * (1.0 + 0.04 / 2.0_f64).ln();
        assert_relative_eq!(result.discount_factor(1.0), (-r).exp(), epsilon = 1e-9);
        // Mid-grid queries stay between their neighbours.
        let mid = result.discount_factor(1.6);
        assert!(mid < result.discount_factor(1.5));
        assert!(mid > result.discount_factor(1.75));
        // Degenerate queries.
        assert_relative_eq!(result.discount_factor(0.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(result.zero_rate(0.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn forward_rate_between_grid_tenors_matches_df_ratio() {
        let result = crate::curve::bootstrap(
            &[(1.0, 0.045), (5.0, 0.042)],
            &[],
            BootstrapMethod::Linear,
            "USD",
        );
        let f = result.forward_rate(1.0, 2.0);
        let expected =
            (result.discount_factor(1.0) / result.discount_factor(2.0)).ln() / 1.0;
        assert_relative_eq!(f, expected, epsilon = 1e-12);
    }
}
