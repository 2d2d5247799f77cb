//! Console summaries of the computed metrics

use std::cmp::Ordering;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{
    AucGrade, AucReport, CumulativeLiftRow, DerivedBin, DerivedTable, KsSummary, LiftSummary,
};

/// Format a fraction as a percentage with two decimals (0.3135 -> "31.35%")
pub fn format_pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn header(cells: &[&str]) -> Vec<Cell> {
    cells
        .iter()
        .map(|c| Cell::new(c).add_attribute(Attribute::Bold))
        .collect()
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn print_section(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

/// AUC results table: the three AUC routes, Gini and the grade
pub fn auc_table(report: &AucReport) -> Table {
    let mut table = new_table();
    table.set_header(header(&["Metric", "Value"]));

    table.add_row(vec![
        Cell::new("AUC (unweighted)"),
        Cell::new(format!("{:.4}", report.auc_unweighted)),
    ]);
    table.add_row(vec![
        Cell::new("AUC (weighted)"),
        Cell::new(format!("{:.4}", report.auc_weighted)).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("AUC (grouped bins)"),
        Cell::new(format!("{:.4}", report.auc_grouped)),
    ]);
    table.add_row(vec![
        Cell::new("Gini"),
        Cell::new(format!("{:.4}", report.gini)),
    ]);
    table.add_row(vec![
        Cell::new("Samples"),
        Cell::new(report.sample_count),
    ]);

    let color = match report.grade {
        AucGrade::Excellent | AucGrade::Good => Color::Green,
        AucGrade::Fair => Color::Yellow,
        AucGrade::Low | AucGrade::Poor => Color::Red,
    };
    table.add_row(vec![
        Cell::new("Grade"),
        Cell::new(report.grade.description()).fg(color),
    ]);

    table
}

/// Reference AUC bands
pub fn auc_grade_table() -> Table {
    let mut table = new_table();
    table.set_header(header(&["AUC", "Assessment"]));
    for (range, grade) in AucGrade::bands() {
        table.add_row(vec![Cell::new(range), Cell::new(grade.description())]);
    }
    table
}

pub fn display_auc_summary(report: &AucReport) {
    print_section("📈", "ROC / AUC");
    print_indented(&auc_table(report));
    println!();
    println!("      {}", style("AUC reference bands:").dim());
    print_indented(&auc_grade_table());
}

/// Per-bin cumulative bad / good percentages and KS
pub fn ks_table(table: &DerivedTable, ks: Option<&KsSummary>) -> Table {
    let mut out = new_table();
    out.set_header(header(&["Score range", "Midpoint", "Cum bad %", "Cum good %", "KS"]));

    for (idx, d) in table.bins.iter().enumerate() {
        let is_max = ks.map(|k| k.bin_index == idx).unwrap_or(false);
        let ks_cell = Cell::new(format_pct(d.separation)).set_alignment(CellAlignment::Right);
        let ks_cell = if is_max {
            ks_cell.fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            ks_cell
        };
        out.add_row(vec![
            Cell::new(&d.bin.score_range),
            Cell::new(format!("{}", d.bin.midpoint)).set_alignment(CellAlignment::Right),
            Cell::new(format_pct(d.cumulative_default_fraction)).set_alignment(CellAlignment::Right),
            Cell::new(format_pct(d.cumulative_non_default_fraction))
                .set_alignment(CellAlignment::Right),
            ks_cell,
        ]);
    }

    out
}

pub fn display_ks_summary(table: &DerivedTable, ks: Option<&KsSummary>, threshold: f64) {
    print_section("📐", "KS SEPARATION");

    match ks {
        Some(k) => {
            println!(
                "      Maximum KS: {}",
                style(format_pct(k.max_ks)).yellow().bold()
            );
            println!(
                "      Score range: {} (midpoint: {})",
                style(&k.score_range).cyan(),
                k.midpoint
            );
            let verdict = if k.is_effective(threshold) {
                style(format!("effective separation (KS ≥ {})", threshold)).green()
            } else {
                style(format!("weak separation (KS < {})", threshold)).red()
            };
            println!("      {}", verdict);
        }
        None => println!("      {}", style("No bins to evaluate").dim()),
    }

    println!();
    print_indented(&ks_table(table, ks));
}

/// Headline lift statistics
pub fn lift_statistics_table(summary: &LiftSummary) -> Table {
    let mut table = new_table();
    table.set_header(header(&["Statistic", "Value"]));

    table.add_row(vec![Cell::new("Total samples"), Cell::new(summary.total_samples)]);
    table.add_row(vec![Cell::new("Total defaults"), Cell::new(summary.total_defaults)]);
    table.add_row(vec![
        Cell::new("Overall bad rate"),
        Cell::new(format!(
            "{:.4} ({})",
            summary.overall_bad_rate,
            format_pct(summary.overall_bad_rate)
        )),
    ]);
    table.add_row(vec![
        Cell::new("Maximum lift"),
        Cell::new(format!("{:.2}x", summary.max_lift))
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new(format!("Bins with lift > {}", crate::pipeline::HIGH_RISK_LIFT)),
        Cell::new(summary.high_risk_bins),
    ]);
    table.add_row(vec![
        Cell::new(format!(
            "Max default rate (midpoint > {})",
            crate::pipeline::LOW_RISK_MIDPOINT
        )),
        Cell::new(format_pct(summary.low_risk_max_default_rate)),
    ]);
    if let Some((label, _, population)) = &summary.peak_population_bin {
        table.add_row(vec![
            Cell::new("Peak population bin"),
            Cell::new(format!("{} ({})", label, population)),
        ]);
    }

    table
}

/// Per-bin lift next to the cumulative lift accumulated from the lowest score
pub fn lift_table(table: &DerivedTable, cumulative: &[CumulativeLiftRow]) -> Table {
    let mut out = new_table();
    out.set_header(header(&[
        "Score range",
        "Bad rate",
        "Lift",
        "Cum population %",
        "Cum bad rate",
        "Cum lift",
    ]));

    // Cumulative rows run in ascending midpoint order; align the per-bin rows with them
    let mut ordered: Vec<&DerivedBin> = table.bins.iter().collect();
    ordered.sort_by(|a, b| a.bin.midpoint.partial_cmp(&b.bin.midpoint).unwrap_or(Ordering::Equal));

    for (d, c) in ordered.into_iter().zip(cumulative) {
        out.add_row(vec![
            Cell::new(&c.score_range),
            Cell::new(format_pct(d.bad_rate)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}x", d.lift)).set_alignment(CellAlignment::Right),
            Cell::new(format_pct(c.cumulative_population_share)).set_alignment(CellAlignment::Right),
            Cell::new(format_pct(c.cumulative_bad_rate)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}x", c.cumulative_lift)).set_alignment(CellAlignment::Right),
        ]);
    }

    out
}

pub fn display_lift_summary(
    summary: &LiftSummary,
    table: &DerivedTable,
    cumulative: &[CumulativeLiftRow],
) {
    print_section("📊", "LIFT");
    print_indented(&lift_statistics_table(summary));
    println!();
    print_indented(&lift_table(table, cumulative));
}
