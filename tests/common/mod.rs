//! Shared test utilities and fixture generators

#![allow(dead_code)]

use rand::{Rng, SeedableRng};
use scorelens::pipeline::ScorecardBin;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

/// Populations of the reference scorecard
pub const REFERENCE_POPULATIONS: [u64; 14] =
    [49, 165, 441, 919, 1499, 1915, 1915, 1499, 919, 441, 165, 49, 11, 2];

/// Default counts of the reference scorecard
pub const REFERENCE_DEFAULTS: [u64; 14] = [49, 163, 412, 662, 470, 144, 27, 4, 0, 0, 0, 0, 0, 0];

/// Build bins with 50-point ranges starting at 300 and derived default rates
pub fn bins_from_counts(populations: &[u64], defaults: &[u64]) -> Vec<ScorecardBin> {
    populations
        .iter()
        .zip(defaults)
        .enumerate()
        .map(|(i, (&pop, &bad))| {
            let lower = 300 + 50 * i as u64;
            ScorecardBin::new(
                format!("{}–{}", lower, lower + 50),
                lower as f64 + 25.0,
                pop,
                bad,
            )
        })
        .collect()
}

/// Random bin table with a seeded generator.
///
/// Default rates fall as the score rises, so lower bins are riskier.
pub fn create_synthetic_bins(n_bins: usize, seed: u64) -> Vec<ScorecardBin> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..n_bins)
        .map(|i| {
            let population: u64 = rng.gen_range(20..500);
            let risk = 1.0 - (i as f64 + 0.5) / n_bins as f64;
            let defaults = ((population as f64) * risk * rng.gen_range(0.5..1.0)).round() as u64;
            ScorecardBin::new(format!("bin_{}", i), i as f64 * 10.0, population, defaults)
        })
        .collect()
}

/// Write a bin table CSV into a temporary directory
pub fn create_temp_bin_csv(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("bins.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    write!(file, "{}", contents).unwrap();

    (temp_dir, csv_path)
}

/// CSV text for the reference scorecard including the given default rates
pub fn reference_csv() -> String {
    let rates = [
        99.78, 98.78, 93.49, 71.90, 31.35, 7.53, 1.43, 0.26, 0.05, 0.01, 0.00, 0.00, 0.00, 0.00,
    ];
    let mut csv = String::from("score_range,midpoint,population,default_count,default_rate_pct\n");
    for i in 0..14 {
        let lower = 300 + 50 * i;
        csv.push_str(&format!(
            "{}-{},{},{},{},{}\n",
            lower,
            lower + 50,
            lower + 25,
            REFERENCE_POPULATIONS[i],
            REFERENCE_DEFAULTS[i],
            rates[i]
        ));
    }
    csv
}

/// Assert two floats agree within a tolerance
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() < tolerance,
        "expected {} (±{}), got {}",
        expected,
        tolerance,
        actual
    );
}
