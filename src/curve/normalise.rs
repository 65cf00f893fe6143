//! Input normalisation.
//!
//! Raw observations arrive in three quoting conventions: par swap rates,
//! price-implied futures rates, and bond yields. This module converts all of
//! them to continuously-compounded zero-rate pillars, reconciles futures
//! against the swap curve, and de-duplicates tenors so each engine sees one
//! clean, sorted pillar set. Observations that fail to normalise (NaN rates,
//! non-positive tenors, unparseable maturities) are dropped; the rest
//! proceed.

use chrono::NaiveDate;

use crate::core::{BootstrapPoint, PointSource};
use crate::curve::conventions::{BasisConvention, Compounding};

/// Deviation from the swap-implied rate beyond which a futures pillar is
/// pulled toward the swap curve.
pub(crate) const RECONCILE_TOLERANCE: f64 = 0.003;
/// Weight of the swap-implied rate in the blended replacement.
pub(crate) const RECONCILE_WEIGHT: f64 = 0.7;
/// Floor applied to every pillar tenor.
const MIN_TENOR: f64 = 0.01;
/// Money-market futures accrue over a 3-month period.
const FUTURES_ACCRUAL: f64 = 0.25;

/// Converts a quoted money-market futures price to its implied annualised
/// rate, `(100 − price)/100`.
pub fn rate_from_price(price: f64) -> f64 {
    (100.0 - price) / 100.0
}

/// Converts an annualised decimal rate to the quoted futures price.
pub fn price_from_rate(rate: f64) -> f64 {
    100.0 - 100.0 * rate
}

/// Converts a par swap rate to continuous compounding under the currency
/// convention.
///
/// Sub-annual tenors are treated as money-market quotes regardless of the
/// convention's coupon compounding.
pub fn swap_rate_to_continuous(rate: f64, tenor: f64, convention: &BasisConvention) -> f64 {
    match convention.compounding {
        Compounding::Continuous => rate,
        Compounding::Simple => (1.0 + rate * tenor).ln() / tenor,
        _ if tenor < 1.0 => (1.0 + rate * tenor).ln() / tenor,
        _ => {
            let n = convention.payment_frequency.max(1) as f64;
            n * (1.0 + rate / n).ln()
        }
    }
}

/// Converts a price-implied futures rate to continuous compounding assuming
/// 3-month money-market accrual.
pub fn futures_rate_to_continuous(rate: f64) -> f64 {
    (1.0 + rate * FUTURES_ACCRUAL).ln() / FUTURES_ACCRUAL
}

/// Resolves a futures contract label like `Dec '25` to a tenor in years
/// relative to `today`.
///
/// The contract month resolves to day 15; the two-digit year is read as
/// `2000 + YY`. The tenor is floored at 0.01 so an expiring contract still
/// yields a usable pillar. Returns `None` for labels that do not parse.
pub fn tenor_from_contract_month(label: &str, today: NaiveDate) -> Option<f64> {
    let mut parts = label.split_whitespace();
    let month = month_number(parts.next()?)?;
    let year_token = parts.next()?.trim_start_matches('\'');
    if parts.next().is_some() {
        return None;
    }

    let yy: i32 = year_token.parse().ok()?;
    if !(0..=99).contains(&yy) {
        return None;
    }

    let maturity = NaiveDate::from_ymd_opt(2000 + yy, month, 15)?;
    let tenor = (maturity - today).num_days() as f64 / 365.25;
    Some(tenor.max(MIN_TENOR))
}

/// [`tenor_from_contract_month`] against the current UTC date.
pub fn tenor_from_contract_month_today(label: &str) -> Option<f64> {
    tenor_from_contract_month(label, chrono::Utc::now().date_naive())
}

fn month_number(name: &str) -> Option<u32> {
    let prefix = name.get(..3)?.to_ascii_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

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

fn normalise_with<F>(quotes: &[(f64, f64)], source: PointSource, convert: F) -> Vec<BootstrapPoint>
where
    F: Fn(f64, f64) -> f64,
{
    quotes
        .iter()
        .filter(|(t, r)| t.is_finite() && *t > 0.0 && r.is_finite())
        .map(|&(t, r)| {
            let tenor = t.max(MIN_TENOR);
            pillar(tenor, convert(r, tenor), source)
        })
        .filter(|p| p.rate.is_finite())
        .collect()
}

/// Normalises par swap quotes `(tenor, rate)` to continuous pillars.
pub(crate) fn normalise_swaps(
    swaps: &[(f64, f64)],
    convention: &BasisConvention,
) -> Vec<BootstrapPoint> {
    normalise_with(swaps, PointSource::Swap, |r, t| {
        swap_rate_to_continuous(r, t, convention)
    })
}

/// Normalises price-implied futures quotes `(tenor, rate)` to continuous
/// pillars.
pub(crate) fn normalise_futures(futures: &[(f64, f64)]) -> Vec<BootstrapPoint> {
    normalise_with(futures, PointSource::Futures, |r, _| {
        futures_rate_to_continuous(r)
    })
}

/// Normalises bond yields `(tenor, yield)` as swap-equivalent pillars.
pub(crate) fn normalise_bonds(
    bonds: &[(f64, f64)],
    convention: &BasisConvention,
) -> Vec<BootstrapPoint> {
    normalise_with(bonds, PointSource::Bond, |r, t| {
        swap_rate_to_continuous(r, t, convention)
    })
}

/// Pulls futures pillars toward the swap curve when they disagree by more
/// than [`RECONCILE_TOLERANCE`].
///
/// Requires at least two swap pillars; futures outside the swap tenor span
/// are left untouched. An adjusted pillar keeps its original rate.
pub(crate) fn reconcile_futures(points: &mut [BootstrapPoint]) {
    let mut swaps: Vec<(f64, f64)> = points
        .iter()
        .filter(|p| p.source == PointSource::Swap)
        .map(|p| (p.tenor, p.rate))
        .collect();
    if swaps.len() < 2 {
        return;
    }
    swaps.sort_by(|a, b| a.0.total_cmp(&b.0));

    let span = (swaps[0].0, swaps[swaps.len() - 1].0);
    for p in points.iter_mut().filter(|p| p.source == PointSource::Futures) {
        if p.tenor < span.0 || p.tenor > span.1 {
            continue;
        }

        let hi = swaps.partition_point(|s| s.0 < p.tenor);
        let expected = if hi == 0 {
            swaps[0].1
        } else {
            let (t0, r0) = swaps[hi - 1];
            let (t1, r1) = swaps[hi.min(swaps.len() - 1)];
            if (t1 - t0).abs() <= f64::EPSILON {
                r0
            } else {
                r0 + (r1 - r0) * (p.tenor - t0) / (t1 - t0)
            }
        };

        if (p.rate - expected).abs() > RECONCILE_TOLERANCE {
            p.original_rate = Some(p.rate);
            p.rate = (1.0 - RECONCILE_WEIGHT) * p.rate + RECONCILE_WEIGHT * expected;
            p.adjusted = true;
        }
    }
}

/// De-duplicates pillars at 3-decimal tenor keys (swaps beat futures) and
/// sorts the survivors by tenor.
pub(crate) fn dedup_and_sort(mut points: Vec<BootstrapPoint>) -> Vec<BootstrapPoint> {
    points.sort_by_key(|p| p.priority);

    let mut seen = std::collections::HashSet::new();
    points.retain(|p| seen.insert((p.tenor * 1000.0).round() as i64));

    points.sort_by(|a, b| a.tenor.total_cmp(&b.tenor));
    points
}
