//! Nelson-Siegel parametric yield-curve model and its calibration.
//!
//! The model (Nelson and Siegel, 1987) expresses the zero rate as
//! `r(t) = β₀ + β₁·(1 − e^{−λt})/(λt) + β₂·[(1 − e^{−λt})/(λt) − e^{−λt}]`.
//! Calibration minimises a weighted squared error over the pillar set by
//! plain gradient descent; swap pillars carry a higher weight than futures
//! or bond pillars so the long end anchors the fit.

/// Lower bound for the decay parameter during and after calibration.
pub const LAMBDA_MIN: f64 = 0.05;
/// Upper bound for the decay parameter during and after calibration.
pub const LAMBDA_MAX: f64 = 3.0;

const LEARNING_RATE: f64 = 5.0e-5;
const ITERATIONS: usize = 8000;
/// The λ direction is far steeper than the β directions; its gradient is
/// scaled down before the shared learning rate applies.
const LAMBDA_GRADIENT_SCALE: f64 = 0.05;
/// Below this tenor the model evaluates its `t → 0` limit `β₀ + β₁`.
const SHORT_TENOR_LIMIT: f64 = 0.001;

/// Fitted Nelson-Siegel parameters.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NelsonSiegelParams {
    /// Long-run level.
    pub beta0: f64,
    /// Short-end slope.
    pub beta1: f64,
    /// Medium-term hump.
    pub beta2: f64,
    /// Decay rate, kept in `[LAMBDA_MIN, LAMBDA_MAX]`.
    pub lambda: f64,
}

impl NelsonSiegelParams {
    /// Evaluates the model zero rate at tenor `t`.
    pub fn value(&self, t: f64) -> f64 {
        if t <= SHORT_TENOR_LIMIT {
            return self.beta0 + self.beta1;
        }
        let u = self.lambda * t;
        let decay = (-u).exp();
        let slope = (1.0 - decay) / u;
        self.beta0 + self.beta1 * slope + self.beta2 * (slope - decay)
    }
}

/// A calibration observation: `(tenor, target rate, weight)`.
pub type WeightedPoint = (f64, f64, f64);

/// Fits the model to weighted pillar observations by gradient descent.
///
/// `points` must be sorted by tenor; the first and last entries seed the
/// short- and long-end initial guess. An empty slice returns a flat
/// zero-parameter curve.
pub fn fit(points: &[WeightedPoint]) -> NelsonSiegelParams {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return NelsonSiegelParams {
            beta0: 0.0,
            beta1: 0.0,
            beta2: 0.0,
            lambda: 0.5,
        };
    };
    let r_short = first.1;
    let r_long = last.1;

    let r_max = points.iter().map(|p| p.1).fold(f64::MIN, f64::max);
    let r_min = points.iter().map(|p| p.1).fold(f64::MAX, f64::min);

    let mut p = NelsonSiegelParams {
        beta0: r_long,
        beta1: r_short - r_long,
        beta2: (r_max - r_min) * (r_max - r_long).signum(),
        lambda: 0.5,
    };

    for _ in 0..ITERATIONS {
        let mut g0 = 0.0;
        let mut g1 = 0.0;
        let mut g2 = 0.0;
        let mut gl = 0.0;

        for &(t, target, weight) in points {
            if t <= SHORT_TENOR_LIMIT {
                let err = p.beta0 + p.beta1 - target;
                g0 += 2.0 * weight * err;
                g1 += 2.0 * weight * err;
                continue;
            }

            let u = p.lambda * t;
            let decay = (-u).exp();
            let slope = (1.0 - decay) / u;
            let hump = slope - decay;

            let err = p.beta0 + p.beta1 * slope + p.beta2 * hump - target;
            let dslope_dlambda = t * (decay * (u + 1.0) - 1.0) / (u * u);
            let dmodel_dlambda =
                p.beta1 * dslope_dlambda + p.beta2 * (dslope_dlambda + t * decay);

            g0 += 2.0 * weight * err;
            g1 += 2.0 * weight * err * slope;
            g2 += 2.0 * weight * err * hump;
            gl += 2.0 * weight * err * dmodel_dlambda;
        }

        p.beta0 -= LEARNING_RATE * g0;
        p.beta1 -= LEARNING_RATE * g1;
        p.beta2 -= LEARNING_RATE * g2;
        p.lambda -= LEARNING_RATE * LAMBDA_GRADIENT_SCALE * gl;
        p.lambda = p.lambda.clamp(LAMBDA_MIN, LAMBDA_MAX);
    }

    p
}
