//! Numerical kernels backing the bootstrapping engines.

pub mod nelson_siegel;
pub mod spline;

pub use nelson_siegel::{NelsonSiegelParams, LAMBDA_MAX, LAMBDA_MIN};
pub use spline::{NaturalCubicSpline, SplineError};
