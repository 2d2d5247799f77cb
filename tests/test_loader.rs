//! Unit tests for the bin table loader

use polars::prelude::*;
use scorelens::pipeline::{derive_bins, compute_ks, load_bin_table, reference_bins};
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_load_reference_csv_matches_embedded_table() {
    let (_dir, path) = common::create_temp_bin_csv(&common::reference_csv());

    let loaded = load_bin_table(&path).unwrap();
    let embedded = reference_bins().unwrap();

    assert_eq!(loaded.len(), embedded.len());
    for (a, b) in loaded.iter().zip(&embedded) {
        assert_eq!(a.population, b.population);
        assert_eq!(a.default_count, b.default_count);
        assert_eq!(a.midpoint, b.midpoint);
        common::assert_close(a.default_rate, b.default_rate, 1e-12);
    }

    let ks = compute_ks(&derive_bins(&loaded)).unwrap();
    assert_eq!(ks.score_range, "500-550");
}

#[test]
fn test_load_csv_without_rates_derives_them() {
    let (_dir, path) = common::create_temp_bin_csv(
        "score_range,midpoint,population,default_count\n\
         low,10,100,40\n\
         high,20,100,10\n",
    );

    let bins = load_bin_table(&path).unwrap();
    assert_eq!(bins.len(), 2);
    common::assert_close(bins[0].default_rate, 0.4, 1e-12);
    common::assert_close(bins[1].default_rate, 0.1, 1e-12);
}

#[test]
fn test_load_parquet_file() {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("bins.parquet");

    let mut df = df! {
        "score_range" => ["a", "b", "c"],
        "midpoint" => [1.0f64, 2.0, 3.0],
        "population" => [10i64, 20, 30],
        "default_count" => [8i64, 5, 1],
    }
    .unwrap();

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(&mut df).unwrap();

    let bins = load_bin_table(&parquet_path).unwrap();
    assert_eq!(bins.len(), 3);
    assert_eq!(bins[2].population, 30);
}

#[test]
fn test_missing_column_is_reported() {
    let (_dir, path) = common::create_temp_bin_csv("score_range,midpoint,population\na,1,10\n");

    let err = load_bin_table(&path).unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains("default_count"), "got: {}", msg);
}

#[test]
fn test_unsupported_extension() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bins.txt");
    std::fs::write(&path, "irrelevant").unwrap();

    let err = load_bin_table(&path).unwrap_err();
    assert!(err.to_string().contains("Unsupported file format"));
}

#[test]
fn test_nonexistent_file_errors() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing.csv");
    assert!(load_bin_table(&path).is_err());
}

#[test]
fn test_given_rate_percentages_override_counts() {
    let (_dir, path) = common::create_temp_bin_csv(
        "score_range,midpoint,population,default_count,default_rate_pct\n\
         low,10,100,40,35.5\n\
         high,20,100,10,12.25\n",
    );

    let bins = load_bin_table(&path).unwrap();
    common::assert_close(bins[0].default_rate, 0.355, 1e-12);
    common::assert_close(bins[1].default_rate, 0.1225, 1e-12);
    assert_eq!(bins[0].default_count, 40);
}
