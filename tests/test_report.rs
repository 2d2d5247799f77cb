//! Tests for chart rendering and metrics export

use scorelens::pipeline::{
    compute_ks, cumulative_lift, derive_bins, evaluate_auc, reference_bins, summarize_lift,
    RocPoint, ScorecardBin,
};
use scorelens::report::{
    build_export, export_metrics, render_ks_chart, render_lift_chart, render_roc_chart,
    ExportInputs, KS_CHART, LIFT_CHART, ROC_CHART,
};
use tempfile::TempDir;

fn assert_png(path: &std::path::Path) {
    let bytes = std::fs::read(path).unwrap();
    assert!(bytes.len() > 8, "{} is empty", path.display());
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n", "{} is not a PNG", path.display());
}

#[test]
fn test_render_all_charts() {
    let temp_dir = TempDir::new().unwrap();
    let bins = reference_bins().unwrap();
    let table = derive_bins(&bins);

    let auc = evaluate_auc(&bins);
    let roc_path = render_roc_chart(temp_dir.path(), &auc.roc, auc.auc_weighted).unwrap();
    assert_eq!(roc_path, temp_dir.path().join(ROC_CHART.file_name));
    assert_png(&roc_path);

    let ks = compute_ks(&table).unwrap();
    let ks_path = render_ks_chart(temp_dir.path(), &table, &ks).unwrap();
    assert_eq!(ks_path, temp_dir.path().join(KS_CHART.file_name));
    assert_png(&ks_path);

    let cumulative = cumulative_lift(&bins, &table.totals);
    let lift_path = render_lift_chart(temp_dir.path(), &table, &cumulative).unwrap();
    assert_eq!(lift_path, temp_dir.path().join(LIFT_CHART.file_name));
    assert_png(&lift_path);
}

#[test]
fn test_render_into_missing_directory_fails() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("does").join("not").join("exist");
    let auc = evaluate_auc(&reference_bins().unwrap());

    assert!(render_roc_chart(&missing, &auc.roc, auc.auc_weighted).is_err());
}

#[test]
fn test_export_metrics_writes_every_section() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("metrics.json");

    let bins = reference_bins().unwrap();
    let table = derive_bins(&bins);
    let auc = evaluate_auc(&bins);
    let ks = compute_ks(&table);
    let lift = summarize_lift(&table);
    let cumulative = cumulative_lift(&bins, &table.totals);

    let export = build_export(
        &table,
        ExportInputs {
            auc: Some(&auc),
            ks: ks.as_ref(),
            lift: Some(&lift),
            cumulative_lift: &cumulative,
        },
        "reference",
        0.2,
    );
    export_metrics(&export, &output).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["metadata"]["bin_source"], "reference");
    assert_eq!(json["totals"]["population"], 9989);
    assert_eq!(json["auc"]["grade"], "good");
    assert_eq!(json["ks"]["bin_index"], 4);
    assert_eq!(json["lift"]["high_risk_bins"], 4);
    assert_eq!(json["cumulative_lift"].as_array().unwrap().len(), 14);
    assert_eq!(json["bins"].as_array().unwrap().len(), 14);
}

#[test]
fn test_exported_roc_reads_back() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("metrics.json");

    let bins = reference_bins().unwrap();
    let table = derive_bins(&bins);
    let auc = evaluate_auc(&bins);
    let export = build_export(
        &table,
        ExportInputs {
            auc: Some(&auc),
            ..Default::default()
        },
        "reference",
        0.2,
    );
    export_metrics(&export, &output).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert!(json["auc"]["roc"][0]["threshold"].is_null());

    let roc: Vec<RocPoint> = serde_json::from_value(json["auc"]["roc"].clone()).unwrap();
    assert_eq!(roc.len(), auc.roc.len());
    for (read, computed) in roc.iter().zip(&auc.roc) {
        assert_eq!(read.threshold.is_none(), computed.threshold.is_none());
        if let (Some(a), Some(b)) = (read.threshold, computed.threshold) {
            assert!((a - b).abs() < 1e-12);
        }
        assert!((read.fpr - computed.fpr).abs() < 1e-12);
        assert!((read.tpr - computed.tpr).abs() < 1e-12);
    }
}

#[test]
fn test_degenerate_roc_reads_back() {
    // No defaults at all: the curve is the diagonal with open thresholds at both ends
    let bins = vec![
        ScorecardBin::new("a", 1.0, 10, 0),
        ScorecardBin::new("b", 2.0, 20, 0),
    ];
    let auc = evaluate_auc(&bins);
    let text = serde_json::to_string(&auc.roc).unwrap();

    let roc: Vec<RocPoint> = serde_json::from_str(&text).unwrap();
    assert_eq!(roc.len(), 2);
    assert!(roc.iter().all(|p| p.threshold.is_none()));
    assert_eq!((roc[1].fpr, roc[1].tpr), (1.0, 1.0));
}
