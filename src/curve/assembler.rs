//! Uniform post-processing of engine output into the published curve.
//!
//! Whatever the engine, the published grid is assembled the same way:
//! discount factors from the zero rates, instantaneous forwards from
//! adjacent discount factors, and a source tag copied from the nearest
//! pillar when one sits close enough to the grid tenor.

use crate::core::{BootstrapMethod, BootstrapPoint, CurvePoint, DiscountFactor, PointSource};
use crate::curve::engines::EngineOutput;

/// A grid point inherits a pillar's source tag when the pillar lies within
/// this distance in years.
const PILLAR_TAG_TOLERANCE: f64 = 0.01;
/// The Nelson-Siegel curve does not pass through its pillars, so its tagging
/// tolerance is wider.
const NELSON_SIEGEL_TAG_TOLERANCE: f64 = 0.05;

/// Derives the published `(discount factor, curve point)` arrays from engine
/// zero rates.
pub(crate) fn assemble(
    pillars: &[BootstrapPoint],
    method: BootstrapMethod,
    output: &EngineOutput,
) -> (Vec<DiscountFactor>, Vec<CurvePoint>) {
    let tolerance = if method == BootstrapMethod::NelsonSiegel {
        NELSON_SIEGEL_TAG_TOLERANCE
    } else {
        PILLAR_TAG_TOLERANCE
    };

    let mut discount_factors = Vec::with_capacity(output.grid.len());
    let mut curve_points = Vec::with_capacity(output.grid.len());

    let mut prev: Option<(f64, f64)> = None;
    for (&tenor, &rate) in output.grid.iter().zip(output.zero_rates.iter()) {
        let df = (-rate * tenor).exp();
        let forward = match prev {
            None => rate,
            Some((prev_tenor, prev_df)) => -(df / prev_df).ln() / (tenor - prev_tenor),
        };

        discount_factors.push(DiscountFactor {
            tenor,
            df,
            zero_rate: rate,
            forward_rate: Some(forward.max(0.0)),
            source: source_tag(pillars, tenor, tolerance),
        });
        curve_points.push(CurvePoint { tenor, zero_rate: rate });
        prev = Some((tenor, df));
    }

    (discount_factors, curve_points)
}

/// The nearest pillar's source, or `Interpolated` when no pillar is within
/// the tolerance.
fn source_tag(pillars: &[BootstrapPoint], tenor: f64, tolerance: f64) -> PointSource {
    pillars
        .iter()
        .map(|p| (p, (p.tenor - tenor).abs()))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .filter(|(_, distance)| *distance <= tolerance)
        .map(|(p, _)| p.source)
        .unwrap_or(PointSource::Interpolated)
}
