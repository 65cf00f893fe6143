//! OpenCurve is a zero-coupon discount-curve bootstrapping library. It turns
//! mixed sets of market quotes — money-market futures, par interest-rate
//! swaps, or government bond yields — into a dense curve of discount
//! factors, zero rates, and instantaneous forward rates for a given
//! currency.
//!
//! The pipeline has four stages, composed left to right:
//! 1. a compile-time convention book mapping currency codes to
//!    `(day count, compounding, payment frequency)`;
//! 2. an input normaliser that harmonises every quote to continuous
//!    compounding, reconciles futures against the swap curve, and
//!    de-duplicates tenors;
//! 3. one of eight interpolation/parametric engines (piecewise linear,
//!    natural cubic spline, Nelson-Siegel, Bloomberg-style log-discount with
//!    forward smoothing, log-linear and log-cubic discount, linear-forward,
//!    and Hagan-West-flavoured monotonic-convex);
//! 4. a uniform assembler producing the grid of discount factors and
//!    clamped forwards.
//!
//! References used across modules:
//! - Hagan and West (2006), *Interpolation Methods for Curve Construction*.
//! - Nelson and Siegel (1987), parsimonious yield-curve model.
//! - Hull, *Options, Futures, and Other Derivatives*, fixed-income chapters.
//!
//! Design notes:
//! - Entry points never fail. Degenerate inputs (no pillars, a single pillar
//!   on a spline method, fewer than two bonds) produce an empty result that
//!   still records the method, currency, and basis convention; malformed
//!   observations are dropped during normalisation; unknown currency or
//!   method tags fall back to USD and linear.
//! - Everything is a pure value. Bootstraps are synchronous, allocate only
//!   their output arrays, and share no state, so independent calls may run
//!   concurrently without coordination.
//!
//! # Quick Start
//! Bootstrap a USD curve from par swap quotes:
//! ```rust
//! use opencurve::core::BootstrapMethod;
//! use opencurve::curve::bootstrap;
//!
//! let curve = bootstrap(
//!     &[(1.0, 0.045), (2.0, 0.043), (5.0, 0.042), (10.0, 0.041)],
//!     &[],
//!     BootstrapMethod::Linear,
//!     "USD",
//! );
//!
//! assert_eq!(curve.discount_factors.len(), 41);
//! assert!(curve.discount_factors.iter().all(|p| p.df > 0.0 && p.df <= 1.0));
//! ```
//!
//! Mix futures into the short end and export the result:
//! ```rust
//! use opencurve::core::BootstrapMethod;
//! use opencurve::curve::{bootstrap, export_csv};
//!
//! let curve = bootstrap(
//!     &[(2.0, 0.040), (5.0, 0.042), (10.0, 0.041)],
//!     &[(0.25, 0.050), (0.5, 0.049), (0.75, 0.048)],
//!     BootstrapMethod::Bloomberg,
//!     "USD",
//! );
//!
//! let csv = export_csv(&curve);
//! assert!(csv.starts_with("Tenor,Discount Factor,"));
//! ```
//!
//! Query a bootstrapped curve at off-grid tenors:
//! ```rust
//! use opencurve::core::BootstrapMethod;
//! use opencurve::curve::bootstrap;
//!
//! let curve = bootstrap(
//!     &[(1.0, 0.04), (5.0, 0.04)],
//!     &[],
//!     BootstrapMethod::QuantlibLogLinear,
//!     "EUR",
//! );
//!
//! let df = curve.discount_factor(3.14);
//! assert!(df > 0.0 && df < 1.0);
//! assert!(curve.forward_rate(1.0, 2.0) > 0.0);
//! ```

pub mod core;
pub mod curve;
pub mod math;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::core::*;
    pub use crate::curve::conventions::*;
    pub use crate::curve::{bootstrap, bootstrap_bonds, export_csv, CSV_HEADER};
    pub use crate::math::{NaturalCubicSpline, NelsonSiegelParams, SplineError};
}
