//! Scorecard bin definitions and the embedded reference table
//!
//! A bin table arrives as parallel fields (one vector per attribute). The
//! fields are checked for equal length before any bin is built; that shape
//! check is the only validation performed on the input.

use serde::{Deserialize, Serialize};

use super::error::ScorecardError;

/// A contiguous range of model scores with aggregate outcome counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorecardBin {
    /// Score interval label (e.g. "300–350")
    pub score_range: String,
    /// Representative score for the bin
    pub midpoint: f64,
    /// Number of samples in the bin
    pub population: u64,
    /// Number of defaulted samples in the bin
    pub default_count: u64,
    /// Fraction of the bin that defaulted, used as the predicted score for AUC
    pub default_rate: f64,
}

impl ScorecardBin {
    /// Create a bin whose default rate is derived from its counts
    pub fn new(score_range: impl Into<String>, midpoint: f64, population: u64, default_count: u64) -> Self {
        Self {
            score_range: score_range.into(),
            midpoint,
            population,
            default_count,
            default_rate: ratio(default_count as f64, population as f64),
        }
    }

    /// Replace the derived default rate with a directly supplied fraction
    pub fn with_default_rate(mut self, default_rate: f64) -> Self {
        self.default_rate = default_rate;
        self
    }

    /// Samples in the bin that did not default.
    ///
    /// Saturates at zero when the recorded defaults exceed the population.
    pub fn non_default_count(&self) -> u64 {
        self.population.saturating_sub(self.default_count)
    }

    /// Observed bad rate (defaults / population), 0 for an empty bin
    pub fn bad_rate(&self) -> f64 {
        ratio(self.default_count as f64, self.population as f64)
    }
}

/// Division that yields 0 instead of NaN/inf when the denominator is 0
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Parallel-field definition of a bin table, as written in source or read from a file
#[derive(Debug, Clone, Default)]
pub struct BinColumns {
    pub score_ranges: Vec<String>,
    pub midpoints: Vec<f64>,
    pub populations: Vec<u64>,
    pub default_counts: Vec<u64>,
    /// Default rates in percent (e.g. 31.35). When absent, rates are derived from counts.
    pub default_rates_pct: Option<Vec<f64>>,
}

impl BinColumns {
    /// Field names with their lengths, in definition order
    pub fn field_lengths(&self) -> Vec<(String, usize)> {
        let mut fields = vec![
            ("score_range".to_string(), self.score_ranges.len()),
            ("midpoint".to_string(), self.midpoints.len()),
            ("population".to_string(), self.populations.len()),
            ("default_count".to_string(), self.default_counts.len()),
        ];
        if let Some(rates) = &self.default_rates_pct {
            fields.push(("default_rate_pct".to_string(), rates.len()));
        }
        fields
    }

    /// Validate field lengths and build the ordered bin sequence.
    ///
    /// # Errors
    /// `ScorecardError::DataShape` when any two fields differ in length.
    pub fn into_bins(self) -> Result<Vec<ScorecardBin>, ScorecardError> {
        let fields = self.field_lengths();
        let expected = fields[0].1;
        if fields.iter().any(|(_, len)| *len != expected) {
            return Err(ScorecardError::DataShape { fields });
        }

        let rates = self.default_rates_pct;
        let bins = self
            .score_ranges
            .into_iter()
            .zip(self.midpoints)
            .zip(self.populations)
            .zip(self.default_counts)
            .enumerate()
            .map(|(idx, (((label, midpoint), population), defaults))| {
                let bin = ScorecardBin::new(label, midpoint, population, defaults);
                match &rates {
                    Some(pct) => bin.with_default_rate(pct[idx] / 100.0),
                    None => bin,
                }
            })
            .collect();

        Ok(bins)
    }
}

/// The reference scorecard: 14 bins of 50 points from 300 to 1000
pub fn reference_columns() -> BinColumns {
    BinColumns {
        score_ranges: [
            "300–350", "350–400", "400–450", "450–500", "500–550", "550–600", "600–650",
            "650–700", "700–750", "750–800", "800–850", "850–900", "900–950", "950–1000",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        midpoints: vec![
            325.0, 375.0, 425.0, 475.0, 525.0, 575.0, 625.0, 675.0, 725.0, 775.0, 825.0, 875.0,
            925.0, 975.0,
        ],
        populations: vec![49, 165, 441, 919, 1499, 1915, 1915, 1499, 919, 441, 165, 49, 11, 2],
        default_counts: vec![49, 163, 412, 662, 470, 144, 27, 4, 0, 0, 0, 0, 0, 0],
        default_rates_pct: Some(vec![
            99.78, 98.78, 93.49, 71.90, 31.35, 7.53, 1.43, 0.26, 0.05, 0.01, 0.00, 0.00, 0.00,
            0.00,
        ]),
    }
}

/// The reference scorecard as validated bins
pub fn reference_bins() -> Result<Vec<ScorecardBin>, ScorecardError> {
    reference_columns().into_bins()
}
