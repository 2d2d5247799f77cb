//! scorelens: Scorecard Discrimination CLI Tool
//!
//! Evaluates a binned credit scorecard with ROC/AUC, Kolmogorov-Smirnov
//! separation and Lift, printing summaries and rendering PNG charts.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use scorelens::cli::Cli;
use scorelens::pipeline::{
    columns_from_frame, compute_ks, cumulative_lift, derive_bins, evaluate_auc, read_bin_frame,
    reference_columns, summarize_lift, BinColumns,
};
use scorelens::report::{
    build_export, display_auc_summary, display_ks_summary, display_lift_summary, export_metrics,
    format_pct, render_ks_chart, render_lift_chart, render_roc_chart, ExportInputs,
};
use scorelens::utils::{
    create_spinner, finish_with_success, print_banner, print_completion, print_config,
    print_field_lengths, print_info, print_step_header, print_success,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let metrics = cli.metrics();
    let bin_source = cli.bin_source();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&bin_source, metrics.label(), &cli.output_dir, cli.ks_threshold);

    // Step 1: Load and validate the bin table
    print_step_header(1, "Load Bin Table");
    let columns: BinColumns = match &cli.bins {
        Some(path) => {
            let spinner = create_spinner("Reading bin table...");
            let df = read_bin_frame(path)?;
            let columns = columns_from_frame(&df)?;
            finish_with_success(&spinner, &format!("Read {}", path.display()));
            columns
        }
        None => reference_columns(),
    };
    print_field_lengths(&columns.field_lengths());
    let bins = columns
        .into_bins()
        .with_context(|| format!("Bin table '{}' failed validation", bin_source))?;
    if bins.is_empty() {
        anyhow::bail!("Bin table '{}' contains no bins", bin_source);
    }
    print_success(&format!("Loaded {} bins", bins.len()));

    // Step 2: Shared cumulative statistics
    print_step_header(2, "Derive Cumulative Statistics");
    let table = derive_bins(&bins);
    println!("\n    {} Population:", style("✧").cyan());
    println!("      Samples: {}", table.totals.population);
    println!("      Defaults: {}", table.totals.defaults);
    println!("      Non-defaults: {}", table.totals.non_defaults);
    println!(
        "      Overall bad rate: {}",
        style(format_pct(table.totals.overall_bad_rate)).yellow()
    );

    if !cli.no_chart {
        std::fs::create_dir_all(&cli.output_dir).with_context(|| {
            format!("Failed to create output directory: {}", cli.output_dir.display())
        })?;
    }

    let mut step = 3;

    let auc_report = if metrics.runs_roc() {
        print_step_header(step, "ROC / AUC");
        step += 1;
        let spinner = create_spinner("Computing AUC...");
        let report = evaluate_auc(&bins);
        finish_with_success(&spinner, "AUC computed");
        display_auc_summary(&report);
        if !cli.no_chart {
            let path = render_roc_chart(&cli.output_dir, &report.roc, report.auc_weighted)?;
            print_success(&format!("Chart saved to {}", path.display()));
        }
        Some(report)
    } else {
        None
    };

    let ks_summary = if metrics.runs_ks() {
        print_step_header(step, "KS Separation");
        step += 1;
        let ks = compute_ks(&table);
        display_ks_summary(&table, ks.as_ref(), cli.ks_threshold);
        if let (false, Some(k)) = (cli.no_chart, ks.as_ref()) {
            let path = render_ks_chart(&cli.output_dir, &table, k)?;
            print_success(&format!("Chart saved to {}", path.display()));
        }
        ks
    } else {
        None
    };

    let (lift_summary, cumulative) = if metrics.runs_lift() {
        print_step_header(step, "Lift Analysis");
        step += 1;
        let summary = summarize_lift(&table);
        let cumulative = cumulative_lift(&bins, &table.totals);
        display_lift_summary(&summary, &table, &cumulative);
        if !cli.no_chart {
            let path = render_lift_chart(&cli.output_dir, &table, &cumulative)?;
            print_success(&format!("Chart saved to {}", path.display()));
        }
        (Some(summary), cumulative)
    } else {
        (None, Vec::new())
    };

    if let Some(export_path) = &cli.export_json {
        print_step_header(step, "Export Metrics");
        let export = build_export(
            &table,
            ExportInputs {
                auc: auc_report.as_ref(),
                ks: ks_summary.as_ref(),
                lift: lift_summary.as_ref(),
                cumulative_lift: &cumulative,
            },
            &bin_source,
            cli.ks_threshold,
        );
        export_metrics(&export, export_path)?;
        print_success(&format!("Metrics saved to {}", export_path.display()));
    }

    if cli.no_chart {
        print_info("Chart rendering skipped (--no-chart)");
    }

    print_completion();

    Ok(())
}
