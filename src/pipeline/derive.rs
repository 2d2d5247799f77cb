//! Shared cumulative statistics over an ordered bin sequence
//!
//! AUC, KS and Lift all start from the same per-bin derivations: counts of
//! non-defaults, distribution shares, running cumulative fractions and bad
//! rates. They are computed once here and each metric reads the result.

use serde::Serialize;

use super::bins::{ratio, ScorecardBin};

/// Population-wide totals of a bin table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BinTotals {
    pub population: u64,
    pub defaults: u64,
    pub non_defaults: u64,
    /// defaults / population, 0 for an empty table
    pub overall_bad_rate: f64,
}

impl BinTotals {
    pub fn from_bins(bins: &[ScorecardBin]) -> Self {
        let population: u64 = bins.iter().map(|b| b.population).sum();
        let defaults: u64 = bins.iter().map(|b| b.default_count).sum();
        let non_defaults: u64 = bins.iter().map(|b| b.non_default_count()).sum();

        Self {
            population,
            defaults,
            non_defaults,
            overall_bad_rate: ratio(defaults as f64, population as f64),
        }
    }
}

/// A bin together with every statistic derived from its position in the table
#[derive(Debug, Clone, Serialize)]
pub struct DerivedBin {
    #[serde(flatten)]
    pub bin: ScorecardBin,
    pub non_default_count: u64,
    /// Share of all defaults that fall in this bin
    pub default_share: f64,
    /// Share of all non-defaults that fall in this bin
    pub non_default_share: f64,
    pub cumulative_default_fraction: f64,
    pub cumulative_non_default_fraction: f64,
    /// |cumulative_default_fraction - cumulative_non_default_fraction|
    pub separation: f64,
    pub bad_rate: f64,
    pub lift: f64,
}

/// Derived bins in input order plus the totals they were computed against
#[derive(Debug, Clone, Serialize)]
pub struct DerivedTable {
    pub totals: BinTotals,
    pub bins: Vec<DerivedBin>,
}

impl DerivedTable {
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// (midpoint, value) pairs for any derived field, in table order
    pub fn series<F>(&self, value: F) -> Vec<(f64, f64)>
    where
        F: Fn(&DerivedBin) -> f64,
    {
        self.bins.iter().map(|d| (d.bin.midpoint, value(d))).collect()
    }

    /// The original bins, in table order
    pub fn source_bins(&self) -> Vec<ScorecardBin> {
        self.bins.iter().map(|d| d.bin.clone()).collect()
    }
}

/// Derive cumulative statistics for bins already ordered by ascending score
pub fn derive_bins(bins: &[ScorecardBin]) -> DerivedTable {
    let totals = BinTotals::from_bins(bins);

    let mut cumulative_default = 0.0f64;
    let mut cumulative_non_default = 0.0f64;

    let derived = bins
        .iter()
        .map(|bin| {
            let non_default_count = bin.non_default_count();
            let default_share = ratio(bin.default_count as f64, totals.defaults as f64);
            let non_default_share = ratio(non_default_count as f64, totals.non_defaults as f64);

            cumulative_default += default_share;
            cumulative_non_default += non_default_share;

            let bad_rate = bin.bad_rate();

            DerivedBin {
                bin: bin.clone(),
                non_default_count,
                default_share,
                non_default_share,
                cumulative_default_fraction: cumulative_default,
                cumulative_non_default_fraction: cumulative_non_default,
                separation: (cumulative_default - cumulative_non_default).abs(),
                bad_rate,
                lift: ratio(bad_rate, totals.overall_bad_rate),
            }
        })
        .collect();

    DerivedTable {
        totals,
        bins: derived,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::bins::reference_bins;

    #[test]
    fn test_counts_partition_population() {
        let table = derive_bins(&reference_bins().unwrap());
        for d in &table.bins {
            assert_eq!(d.bin.default_count + d.non_default_count, d.bin.population);
        }
        assert_eq!(table.totals.defaults + table.totals.non_defaults, table.totals.population);
    }

    #[test]
    fn test_reference_totals() {
        let table = derive_bins(&reference_bins().unwrap());
        assert_eq!(table.totals.population, 9989);
        assert_eq!(table.totals.defaults, 1931);
        assert_eq!(table.totals.non_defaults, 8058);
    }

    #[test]
    fn test_cumulative_fractions_end_at_one() {
        let table = derive_bins(&reference_bins().unwrap());
        let last = table.bins.last().unwrap();
        assert!((last.cumulative_default_fraction - 1.0).abs() < 1e-9);
        assert!((last.cumulative_non_default_fraction - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fractions_within_unit_interval() {
        let table = derive_bins(&reference_bins().unwrap());
        for d in &table.bins {
            for v in [
                d.default_share,
                d.non_default_share,
                d.cumulative_default_fraction,
                d.cumulative_non_default_fraction,
                d.separation,
                d.bad_rate,
            ] {
                assert!((0.0..=1.0 + 1e-12).contains(&v), "value out of range: {}", v);
            }
        }
    }

    #[test]
    fn test_empty_table() {
        let table = derive_bins(&[]);
        assert!(table.is_empty());
        assert_eq!(table.totals.overall_bad_rate, 0.0);
    }

    #[test]
    fn test_no_defaults_gives_zero_lift() {
        let bins = vec![ScorecardBin::new("a", 1.0, 10, 0), ScorecardBin::new("b", 2.0, 5, 0)];
        let table = derive_bins(&bins);
        assert!(table.bins.iter().all(|d| d.lift == 0.0 && d.default_share == 0.0));
    }
}
