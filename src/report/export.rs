//! Metrics export to JSON

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{
    AucReport, BinTotals, CumulativeLiftRow, DerivedBin, DerivedTable, KsSummary, LiftSummary,
};

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct ExportMetadata {
    /// Timestamp of the analysis (RFC 3339)
    pub timestamp: String,
    pub scorelens_version: String,
    /// Bin table file, or "reference" for the embedded table
    pub bin_source: String,
    pub bin_count: usize,
    pub ks_threshold: f64,
}

/// Complete metrics export. Sections for metrics that were not run are omitted.
#[derive(Serialize)]
pub struct MetricsExport<'a> {
    pub metadata: ExportMetadata,
    pub totals: BinTotals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auc: Option<&'a AucReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ks: Option<&'a KsSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lift: Option<&'a LiftSummary>,
    pub bins: &'a [DerivedBin],
    #[serde(skip_serializing_if = "no_rows")]
    pub cumulative_lift: &'a [CumulativeLiftRow],
}

fn no_rows(rows: &&[CumulativeLiftRow]) -> bool {
    rows.is_empty()
}

/// Results gathered during a run, borrowed for export
#[derive(Default)]
pub struct ExportInputs<'a> {
    pub auc: Option<&'a AucReport>,
    pub ks: Option<&'a KsSummary>,
    pub lift: Option<&'a LiftSummary>,
    pub cumulative_lift: &'a [CumulativeLiftRow],
}

/// Assemble the export document
pub fn build_export<'a>(
    table: &'a DerivedTable,
    inputs: ExportInputs<'a>,
    bin_source: &str,
    ks_threshold: f64,
) -> MetricsExport<'a> {
    MetricsExport {
        metadata: ExportMetadata {
            timestamp: Utc::now().to_rfc3339(),
            scorelens_version: env!("CARGO_PKG_VERSION").to_string(),
            bin_source: bin_source.to_string(),
            bin_count: table.len(),
            ks_threshold,
        },
        totals: table.totals,
        auc: inputs.auc,
        ks: inputs.ks,
        lift: inputs.lift,
        bins: &table.bins,
        cumulative_lift: inputs.cumulative_lift,
    }
}

/// Write the export document as pretty-printed JSON
pub fn export_metrics(export: &MetricsExport<'_>, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(export)
        .context("Failed to serialize metrics to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write metrics to {}", output_path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{compute_ks, derive_bins, reference_bins};

    #[test]
    fn test_export_omits_metrics_not_run() {
        let table = derive_bins(&reference_bins().unwrap());
        let ks = compute_ks(&table);
        let export = build_export(
            &table,
            ExportInputs {
                ks: ks.as_ref(),
                ..Default::default()
            },
            "reference",
            0.2,
        );

        let value = serde_json::to_value(&export).unwrap();
        assert!(value.get("auc").is_none());
        assert!(value.get("lift").is_none());
        assert!(value.get("cumulative_lift").is_none());
        assert_eq!(value["ks"]["score_range"], "500–550");
        assert_eq!(value["metadata"]["bin_count"], 14);
        assert_eq!(value["bins"][0]["score_range"], "300–350");
    }
}
