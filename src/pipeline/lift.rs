//! Lift and cumulative Lift
//!
//! Per-bin lift is part of the shared derivation; this module adds the
//! cumulative view (bins accumulated from the lowest score upward) and the
//! summary statistics reported alongside the lift charts.

use std::cmp::Ordering;

use serde::Serialize;

use super::bins::{ratio, ScorecardBin};
use super::derive::{BinTotals, DerivedTable};

/// Bins with lift above this concentrate risk strongly enough to flag
pub const HIGH_RISK_LIFT: f64 = 3.0;

/// Bins with a midpoint above this score form the low-risk segment
pub const LOW_RISK_MIDPOINT: f64 = 650.0;

/// Running totals after including a bin, accumulated in ascending midpoint order
#[derive(Debug, Clone, Serialize)]
pub struct CumulativeLiftRow {
    pub score_range: String,
    pub midpoint: f64,
    pub cumulative_population: u64,
    pub cumulative_defaults: u64,
    pub cumulative_bad_rate: f64,
    pub cumulative_lift: f64,
    /// Cumulative population as a share of the total, in [0, 1]
    pub cumulative_population_share: f64,
}

/// Headline statistics of the lift analysis
#[derive(Debug, Clone, Serialize)]
pub struct LiftSummary {
    pub total_samples: u64,
    pub total_defaults: u64,
    pub overall_bad_rate: f64,
    pub max_lift: f64,
    /// Number of bins with lift above `HIGH_RISK_LIFT`
    pub high_risk_bins: usize,
    /// Highest default rate (fraction) among bins with midpoint above `LOW_RISK_MIDPOINT`
    pub low_risk_max_default_rate: f64,
    /// Bin holding the largest population, as (score range, midpoint, population)
    pub peak_population_bin: Option<(String, f64, u64)>,
}

/// Accumulate population and defaults over bins sorted by ascending midpoint
pub fn cumulative_lift(bins: &[ScorecardBin], totals: &BinTotals) -> Vec<CumulativeLiftRow> {
    let mut sorted: Vec<&ScorecardBin> = bins.iter().collect();
    sorted.sort_by(|a, b| a.midpoint.partial_cmp(&b.midpoint).unwrap_or(Ordering::Equal));

    let mut population = 0u64;
    let mut defaults = 0u64;

    sorted
        .into_iter()
        .map(|bin| {
            population += bin.population;
            defaults += bin.default_count;
            let bad_rate = ratio(defaults as f64, population as f64);

            CumulativeLiftRow {
                score_range: bin.score_range.clone(),
                midpoint: bin.midpoint,
                cumulative_population: population,
                cumulative_defaults: defaults,
                cumulative_bad_rate: bad_rate,
                cumulative_lift: ratio(bad_rate, totals.overall_bad_rate),
                cumulative_population_share: ratio(population as f64, totals.population as f64),
            }
        })
        .collect()
}

/// Summarise per-bin lift for reporting
pub fn summarize_lift(table: &DerivedTable) -> LiftSummary {
    let max_lift = table.bins.iter().map(|d| d.lift).fold(0.0, f64::max);
    let high_risk_bins = table.bins.iter().filter(|d| d.lift > HIGH_RISK_LIFT).count();
    let low_risk_max_default_rate = table
        .bins
        .iter()
        .filter(|d| d.bin.midpoint > LOW_RISK_MIDPOINT)
        .map(|d| d.bin.default_rate)
        .fold(0.0, f64::max);

    // First bin wins when populations tie
    let peak_population_bin = table
        .bins
        .iter()
        .fold(None::<&ScorecardBin>, |best, d| match best {
            Some(b) if b.population >= d.bin.population => Some(b),
            _ => Some(&d.bin),
        })
        .map(|b| (b.score_range.clone(), b.midpoint, b.population));

    LiftSummary {
        total_samples: table.totals.population,
        total_defaults: table.totals.defaults,
        overall_bad_rate: table.totals.overall_bad_rate,
        max_lift,
        high_risk_bins,
        low_risk_max_default_rate,
        peak_population_bin,
    }
}

/// (midpoint, lift) for bins with positive lift, the series drawn on the lift trend chart
pub fn positive_lift_series(table: &DerivedTable) -> Vec<(f64, f64)> {
    table
        .bins
        .iter()
        .filter(|d| d.lift > 0.0)
        .map(|d| (d.bin.midpoint, d.lift))
        .collect()
}

/// (cumulative population %, cumulative lift) for the cumulative lift curve
pub fn cumulative_lift_series(rows: &[CumulativeLiftRow]) -> Vec<(f64, f64)> {
    rows.iter()
        .map(|r| (r.cumulative_population_share * 100.0, r.cumulative_lift))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::bins::reference_bins;
    use crate::pipeline::derive::derive_bins;

    #[test]
    fn test_reference_lift_first_bin() {
        let table = derive_bins(&reference_bins().unwrap());
        let overall = 1931.0 / 9989.0;
        assert!((table.totals.overall_bad_rate - overall).abs() < 1e-12);
        assert!((table.bins[0].lift - 1.0 / overall).abs() < 1e-9);
    }

    #[test]
    fn test_reference_summary() {
        let table = derive_bins(&reference_bins().unwrap());
        let summary = summarize_lift(&table);
        assert_eq!(summary.total_samples, 9989);
        assert_eq!(summary.total_defaults, 1931);
        assert_eq!(summary.high_risk_bins, 4);
        assert!((summary.max_lift - 5.172_967_374).abs() < 1e-6);
        // 675 is the first midpoint above 650 and carries 0.26%
        assert!((summary.low_risk_max_default_rate - 0.0026).abs() < 1e-12);
        let (label, midpoint, population) = summary.peak_population_bin.unwrap();
        assert_eq!((label.as_str(), midpoint, population), ("550–600", 575.0, 1915));
    }

    #[test]
    fn test_cumulative_lift_ends_at_one() {
        let bins = reference_bins().unwrap();
        let table = derive_bins(&bins);
        let rows = cumulative_lift(&bins, &table.totals);
        let last = rows.last().unwrap();
        assert_eq!(last.cumulative_population, 9989);
        assert_eq!(last.cumulative_defaults, 1931);
        assert!((last.cumulative_lift - 1.0).abs() < 1e-12);
        assert!((last.cumulative_population_share - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cumulative_lift_sorts_by_midpoint() {
        let mut bins = reference_bins().unwrap();
        bins.reverse();
        let table = derive_bins(&bins);
        let rows = cumulative_lift(&bins, &table.totals);
        assert_eq!(rows[0].midpoint, 325.0);
        assert!((rows[0].cumulative_lift - 9989.0 / 1931.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_population_bin_yields_zero() {
        let bins = vec![
            ScorecardBin::new("empty", 1.0, 0, 0),
            ScorecardBin::new("full", 2.0, 10, 5),
        ];
        let table = derive_bins(&bins);
        assert_eq!(table.bins[0].bad_rate, 0.0);
        assert_eq!(table.bins[0].lift, 0.0);

        let rows = cumulative_lift(&bins, &table.totals);
        assert_eq!(rows[0].cumulative_bad_rate, 0.0);
        assert_eq!(rows[0].cumulative_lift, 0.0);
    }

    #[test]
    fn test_positive_lift_series_skips_zero_bins() {
        let table = derive_bins(&reference_bins().unwrap());
        let series = positive_lift_series(&table);
        assert_eq!(series.len(), 8);
        assert!(series.iter().all(|(_, lift)| *lift > 0.0));
    }
}
