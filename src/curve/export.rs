//! CSV serialisation of a bootstrapped curve.
//!
//! The layout is fixed: one header row, one row per grid point, LF line
//! endings, dot decimal separators, no quoting. Tenors print at 2 decimals,
//! discount factors at 8, rates in percent at 4.

use crate::core::BootstrapResult;

/// The fixed CSV header row.
pub const CSV_HEADER: &str =
    "Tenor,Discount Factor,Zero Rate (%),Forward Rate (%),Source,Day Count,Compounding";

/// Serialises the curve grid to CSV. An empty result produces only the
/// header row.
pub fn export_csv(result: &BootstrapResult) -> String {
    let mut out = String::with_capacity(64 * (result.discount_factors.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');

    for point in &result.discount_factors {
        let forward = match point.forward_rate {
            Some(f) => format!("{:.4}", f * 100.0),
            None => "N/A".to_string(),
        };
        out.push_str(&format!(
            "{:.2},{:.8},{:.4},{},{},{},{}\n",
            point.tenor,
            point.df,
            point.zero_rate * 100.0,
            forward,
            point.source,
            result.basis_convention.day_count,
            result.basis_convention.compounding,
        ));
    }

    out
}
