//! Zero curve bootstrapping: normalisation, engines, assembly, and export.
//!
//! The pipeline is fixed regardless of method: raw quotes are normalised to
//! continuously-compounded pillars ([`normalise`]), one of eight engines
//! interpolates or fits zero rates on a uniform tenor grid, and the
//! assembler derives discount factors, forwards, and source tags. Entry
//! points never fail: degenerate inputs yield an empty result that still
//! records the method, currency, and basis convention.
//!
//! ```rust
//! use opencurve::core::BootstrapMethod;
//! use opencurve::curve::bootstrap;
//!
//! let curve = bootstrap(
//!     &[(1.0, 0.045), (2.0, 0.043), (5.0, 0.042), (10.0, 0.041)],
//!     &[(0.25, 0.050), (0.5, 0.049)],
//!     BootstrapMethod::CubicSpline,
//!     "USD",
//! );
//!
//! assert!(!curve.is_empty());
//! assert!(curve.discount_factors.windows(2).all(|w| w[1].df < w[0].df));
//! ```

mod assembler;
mod engines;

pub mod conventions;
pub mod export;
pub mod normalise;

pub use export::{export_csv, CSV_HEADER};

use crate::core::{BootstrapMethod, BootstrapPoint, BootstrapResult};
use crate::curve::conventions::BasisConvention;

/// Bootstraps a curve from par swap quotes and price-implied futures quotes.
///
/// Swaps and futures are `(tenor_years, decimal rate)` pairs; futures rates
/// are the `(100 − price)/100` implied rate. Futures that disagree with the
/// swap interpolation by more than 30 bp are pulled toward it, and a swap
/// always wins a tenor collision. Empty input produces an empty result.
pub fn bootstrap(
    swaps: &[(f64, f64)],
    futures: &[(f64, f64)],
    method: BootstrapMethod,
    currency: &str,
) -> BootstrapResult {
    let convention = BasisConvention::for_currency(currency);

    let mut points = normalise::normalise_swaps(swaps, &convention);
    points.extend(normalise::normalise_futures(futures));
    let input_points = points.clone();

    normalise::reconcile_futures(&mut points);
    let pillars = normalise::dedup_and_sort(points);

    build(method, currency, convention, input_points, pillars)
}

/// Bootstraps a curve from government bond yields.
///
/// Yields are normalised as swap-equivalent rates under the currency
/// convention; every pillar carries bond priority and no futures
/// reconciliation runs. Fewer than two usable bonds produce an empty result.
pub fn bootstrap_bonds(
    bonds: &[(f64, f64)],
    method: BootstrapMethod,
    currency: &str,
) -> BootstrapResult {
    let convention = BasisConvention::for_currency(currency);

    let points = normalise::normalise_bonds(bonds, &convention);
    let input_points = points.clone();
    let pillars = normalise::dedup_and_sort(points);

    if pillars.len() < 2 {
        return empty_result(method, currency, convention, input_points, pillars);
    }

    build(method, currency, convention, input_points, pillars)
}

fn build(
    method: BootstrapMethod,
    currency: &str,
    convention: BasisConvention,
    input_points: Vec<BootstrapPoint>,
    pillars: Vec<BootstrapPoint>,
) -> BootstrapResult {
    match engines::run(method, &pillars) {
        Some(output) => {
            let (discount_factors, curve_points) = assembler::assemble(&pillars, method, &output);
            BootstrapResult {
                method,
                currency: currency.to_string(),
                basis_convention: convention,
                input_points,
                adjusted_points: pillars,
                discount_factors,
                curve_points,
                parameters: output.parameters,
            }
        }
        None => empty_result(method, currency, convention, input_points, pillars),
    }
}

fn empty_result(
    method: BootstrapMethod,
    currency: &str,
    convention: BasisConvention,
    input_points: Vec<BootstrapPoint>,
    adjusted_points: Vec<BootstrapPoint>,
) -> BootstrapResult {
    BootstrapResult {
        method,
        currency: currency.to_string(),
        basis_convention: convention,
        input_points,
        adjusted_points,
        discount_factors: Vec::new(),
        curve_points: Vec::new(),
        parameters: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PointSource;
    use approx::assert_relative_eq;

    #[test]
    fn empty_input_keeps_method_and_convention() {
        let result = bootstrap(&[], &[], BootstrapMethod::Bloomberg, "GBP");
        assert!(result.is_empty());
        assert_eq!(result.method, BootstrapMethod::Bloomberg);
        assert_eq!(result.currency, "GBP");
        assert_eq!(
            result.basis_convention,
            BasisConvention::for_currency("GBP")
        );
        assert!(result.curve_points.is_empty());
        assert!(result.parameters.is_none());
    }

    #[test]
    fn bootstrap_populates_pillar_and_grid_arrays() {
        let result = bootstrap(
            &[(1.0, 0.045), (5.0, 0.042)],
            &[(0.25, 0.05)],
            BootstrapMethod::Linear,
            "USD",
        );

        assert_eq!(result.input_points.len(), 3);
        assert_eq!(result.adjusted_points.len(), 3);
        assert!(result
            .adjusted_points
            .windows(2)
            .all(|w| w[1].tenor > w[0].tenor));
        assert_eq!(result.discount_factors.len(), result.curve_points.len());
        for (df, cp) in result.discount_factors.iter().zip(result.curve_points.iter()) {
            assert_relative_eq!(df.tenor, cp.tenor, epsilon = 1e-15);
            assert_relative_eq!(df.zero_rate, cp.zero_rate, epsilon = 1e-15);
        }
    }

    #[test]
    fn bonds_need_at_least_two_pillars() {
        let one = bootstrap_bonds(&[(5.0, 0.04)], BootstrapMethod::Linear, "USD");
        assert!(one.is_empty());
        assert_eq!(one.input_points.len(), 1);

        let two = bootstrap_bonds(&[(2.0, 0.04), (5.0, 0.042)], BootstrapMethod::Linear, "USD");
        assert!(!two.is_empty());
        assert!(two
            .adjusted_points
            .iter()
            .all(|p| p.source == PointSource::Bond && p.priority == 1));
    }

    #[test]
    fn bond_curve_matches_swap_curve_numerically() {
        let quotes = [(1.0, 0.05), (2.0, 0.048), (5.0, 0.045)];
        let bonds = bootstrap_bonds(&quotes, BootstrapMethod::Linear, "USD");
        let swaps = bootstrap(&quotes, &[], BootstrapMethod::Linear, "USD");

        assert_eq!(bonds.discount_factors.len(), swaps.discount_factors.len());
        for (b, s) in bonds
            .discount_factors
            .iter()
            .zip(swaps.discount_factors.iter())
        {
            assert_relative_eq!(b.df, s.df, epsilon = 1e-12);
            assert_relative_eq!(b.zero_rate, s.zero_rate, epsilon = 1e-12);
        }
    }

    #[test]
    fn unknown_currency_bootstraps_under_usd_convention() {
        let result = bootstrap(&[(1.0, 0.04), (2.0, 0.04)], &[], BootstrapMethod::Linear, "ZZZ");
        assert_eq!(result.basis_convention, BasisConvention::usd());
        assert_eq!(result.currency, "ZZZ");
        assert!(!result.is_empty());
    }
}
