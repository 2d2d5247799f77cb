//! Kolmogorov-Smirnov separation across score bins

use serde::Serialize;

use super::derive::DerivedTable;

/// KS at or above this value is conventionally taken as useful separation
/// for an application scorecard
pub const DEFAULT_KS_THRESHOLD: f64 = 0.2;

/// Location and size of the maximum KS separation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KsSummary {
    /// Maximum |cumulative bad - cumulative good|
    pub max_ks: f64,
    /// Position of the maximising bin in the table
    pub bin_index: usize,
    pub score_range: String,
    pub midpoint: f64,
}

impl KsSummary {
    /// Whether the separation reaches the given threshold
    pub fn is_effective(&self, threshold: f64) -> bool {
        self.max_ks >= threshold
    }
}

/// Find the bin with maximum separation.
///
/// Ties keep the first bin in table order, i.e. the lower score bin.
/// Returns `None` for an empty table.
pub fn compute_ks(table: &DerivedTable) -> Option<KsSummary> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, d) in table.bins.iter().enumerate() {
        match best {
            Some((_, value)) if d.separation <= value => {}
            _ => best = Some((idx, d.separation)),
        }
    }

    best.map(|(idx, max_ks)| {
        let bin = &table.bins[idx].bin;
        KsSummary {
            max_ks,
            bin_index: idx,
            score_range: bin.score_range.clone(),
            midpoint: bin.midpoint,
        }
    })
}

/// Chart series for the KS plot: cumulative bad, cumulative good and separation
pub struct KsSeries {
    pub cumulative_bad: Vec<(f64, f64)>,
    pub cumulative_good: Vec<(f64, f64)>,
    pub separation: Vec<(f64, f64)>,
}

pub fn ks_series(table: &DerivedTable) -> KsSeries {
    KsSeries {
        cumulative_bad: table.series(|d| d.cumulative_default_fraction),
        cumulative_good: table.series(|d| d.cumulative_non_default_fraction),
        separation: table.series(|d| d.separation),
    }
}
