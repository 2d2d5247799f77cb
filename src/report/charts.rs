//! PNG chart rendering for the ROC, KS and Lift analyses
//!
//! Every chart is drawn from plain (x, y) sequences produced by the pipeline;
//! nothing here recomputes a metric.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::pipeline::{
    cumulative_lift_series, ks_series, positive_lift_series, CumulativeLiftRow, DerivedTable,
    KsSummary, RocPoint,
};

type DrawResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const FONT: &str = "sans-serif";

const MAIN: RGBColor = RGBColor(0x2E, 0x86, 0xAB);
const ACCENT: RGBColor = RGBColor(0xA2, 0x3B, 0x72);
const NEUTRAL: RGBColor = RGBColor(0xF1, 0x8F, 0x01);
const BAD: RGBColor = RGBColor(0xE7, 0x4C, 0x3C);
const GOOD: RGBColor = RGBColor(0x27, 0xAE, 0x60);
const KS_LINE: RGBColor = RGBColor(0x34, 0x98, 0xDB);
const GUIDE: RGBColor = RGBColor(0x95, 0xA5, 0xA6);

/// Output file name and pixel size of one chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSpec {
    pub file_name: &'static str,
    pub width: u32,
    pub height: u32,
}

impl ChartSpec {
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name)
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

pub const ROC_CHART: ChartSpec = ChartSpec {
    file_name: "roc_curve.png",
    width: 1200,
    height: 900,
};

pub const KS_CHART: ChartSpec = ChartSpec {
    file_name: "ks_separation.png",
    width: 1800,
    height: 1200,
};

pub const LIFT_CHART: ChartSpec = ChartSpec {
    file_name: "lift_analysis.png",
    width: 2400,
    height: 1800,
};

/// Render the ROC curve with the random-guess diagonal
pub fn render_roc_chart(dir: &Path, roc: &[RocPoint], auc: f64) -> Result<PathBuf> {
    let path = ROC_CHART.path_in(dir);
    draw_roc(&path, ROC_CHART.size(), roc, auc)
        .map_err(|e| anyhow!("Failed to render ROC chart {}: {}", path.display(), e))?;
    Ok(path)
}

/// Render cumulative bad/good distributions and the KS curve
pub fn render_ks_chart(dir: &Path, table: &DerivedTable, ks: &KsSummary) -> Result<PathBuf> {
    let path = KS_CHART.path_in(dir);
    draw_ks(&path, KS_CHART.size(), table, ks)
        .map_err(|e| anyhow!("Failed to render KS chart {}: {}", path.display(), e))?;
    Ok(path)
}

/// Render the 2x2 descriptive / lift grid
pub fn render_lift_chart(
    dir: &Path,
    table: &DerivedTable,
    cumulative: &[CumulativeLiftRow],
) -> Result<PathBuf> {
    let path = LIFT_CHART.path_in(dir);
    draw_lift_grid(&path, LIFT_CHART.size(), table, cumulative)
        .map_err(|e| anyhow!("Failed to render lift chart {}: {}", path.display(), e))?;
    Ok(path)
}

/// Upper axis bound with headroom, never collapsing to zero
fn headroom(max: f64, factor: f64) -> f64 {
    if max > 0.0 {
        max * factor
    } else {
        1.0
    }
}

fn draw_roc(path: &Path, size: (u32, u32), roc: &[RocPoint], auc: f64) -> DrawResult<()> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Scorecard ROC curve", (FONT, 36))
        .margin(30)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..1f64, 0f64..1.05f64)?;

    chart
        .configure_mesh()
        .x_desc("False positive rate (FPR)")
        .y_desc("True positive rate (TPR)")
        .axis_desc_style((FONT, 22))
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            roc.iter().map(|p| (p.fpr, p.tpr)),
            MAIN.stroke_width(3),
        ))?
        .label(format!("ROC curve (AUC = {:.4})", auc))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], MAIN.stroke_width(3)));

    chart
        .draw_series(LineSeries::new(
            vec![(0.0, 0.0), (1.0, 1.0)],
            ACCENT.stroke_width(2),
        ))?
        .label("Random guess (AUC = 0.5)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], ACCENT.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .label_font((FONT, 20))
        .background_style(WHITE.mix(0.9))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_ks(path: &Path, size: (u32, u32), table: &DerivedTable, ks: &KsSummary) -> DrawResult<()> {
    let series = ks_series(table);

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let lo = table.bins.iter().map(|d| d.bin.midpoint).fold(f64::INFINITY, f64::min);
    let hi = table.bins.iter().map(|d| d.bin.midpoint).fold(f64::NEG_INFINITY, f64::max);
    let pad = if hi > lo { (hi - lo) / (2.0 * table.len().max(1) as f64) } else { 1.0 };
    let (x_min, x_max) = (lo - pad, hi + pad);

    // High scores are drawn on the left: plot x' = x_min + x_max - x and relabel the axis
    let flip = move |x: f64| x_min + x_max - x;

    let mut chart = ChartBuilder::on(&root)
        .caption("Scorecard KS separation (KS ≥ 0.2 is effective)", (FONT, 40))
        .margin(30)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(x_min..x_max, -0.05f64..1.05f64)?;

    chart
        .configure_mesh()
        .x_desc("Score midpoint")
        .y_desc("Cumulative share / KS")
        .axis_desc_style((FONT, 24))
        .x_label_formatter(&|x| format!("{:.0}", x_min + x_max - x))
        .y_label_formatter(&|y| format!("{:.1}%", y * 100.0))
        .draw()?;

    let flipped = |points: &[(f64, f64)]| -> Vec<(f64, f64)> {
        points.iter().map(|&(x, y)| (flip(x), y)).collect()
    };

    let bad = flipped(&series.cumulative_bad);
    chart
        .draw_series(LineSeries::new(bad.clone(), BAD.stroke_width(3)))?
        .label("Cumulative bad share")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BAD.stroke_width(3)));
    chart.draw_series(bad.iter().map(|&p| Circle::new(p, 6, BAD.filled())))?;

    let good = flipped(&series.cumulative_good);
    chart
        .draw_series(LineSeries::new(good.clone(), GOOD.stroke_width(3)))?
        .label("Cumulative good share")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GOOD.stroke_width(3)));
    chart.draw_series(
        good.iter()
            .map(|&p| EmptyElement::at(p) + Rectangle::new([(-5, -5), (5, 5)], GOOD.filled())),
    )?;

    let separation = flipped(&series.separation);
    chart
        .draw_series(LineSeries::new(separation.clone(), KS_LINE.stroke_width(4)))?
        .label("KS")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], KS_LINE.stroke_width(4)));
    chart.draw_series(
        separation
            .iter()
            .map(|&p| TriangleMarker::new(p, 8, KS_LINE.filled())),
    )?;

    // Guide lines through the maximum
    let max_x = flip(ks.midpoint);
    chart
        .draw_series(LineSeries::new(
            vec![(x_min, ks.max_ks), (x_max, ks.max_ks)],
            GUIDE.stroke_width(2),
        ))?
        .label(format!("Maximum KS: {:.2}%", ks.max_ks * 100.0))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GUIDE.stroke_width(2)));
    chart
        .draw_series(LineSeries::new(
            vec![(max_x, -0.05), (max_x, 1.05)],
            GUIDE.stroke_width(2),
        ))?
        .label(format!("Best cut-off: {}", ks.midpoint))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GUIDE.stroke_width(2)));

    let note = (FONT, 24).into_font().color(&BLACK);
    chart.draw_series(std::iter::once(
        EmptyElement::at((max_x, ks.max_ks))
            + Circle::new((0, 0), 12, RED.filled())
            + Text::new(
                format!("Maximum KS: {:.2}%", ks.max_ks * 100.0),
                (20, 40),
                note.clone(),
            )
            + Text::new(format!("Score range: {}", ks.score_range), (20, 70), note),
    ))?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font((FONT, 22))
        .background_style(WHITE.mix(0.9))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// One bar per bin, labelled on the x axis with `labels`
fn draw_bar_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    title: &str,
    labels: &[String],
    values: &[f64],
    color: RGBColor,
    x_desc: &str,
    y_desc: &str,
) -> DrawResult<()> {
    let n = values.len();
    let y_max = headroom(values.iter().cloned().fold(0.0, f64::max), 1.15);

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 32))
        .margin(25)
        .x_label_area_size(70)
        .y_label_area_size(80)
        .build_cartesian_2d((0usize..n).into_segmented(), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc(x_desc)
        .y_desc(y_desc)
        .axis_desc_style((FONT, 20))
        .draw()?;

    chart.draw_series(values.iter().enumerate().map(|(i, &v)| {
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), v)],
            color.mix(0.8).filled(),
        );
        bar.set_margin(0, 0, 6, 6);
        bar
    }))?;

    Ok(())
}

fn draw_lift_grid(
    path: &Path,
    size: (u32, u32),
    table: &DerivedTable,
    cumulative: &[CumulativeLiftRow],
) -> DrawResult<()> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Scorecard model analysis", (FONT, 48))?;
    let panels = root.split_evenly((2, 2));

    // Default rate by score range
    let ranges: Vec<String> = table.bins.iter().map(|d| d.bin.score_range.clone()).collect();
    let rates_pct: Vec<f64> = table.bins.iter().map(|d| d.bin.default_rate * 100.0).collect();
    draw_bar_panel(
        &panels[0],
        "Default rate by score range",
        &ranges,
        &rates_pct,
        MAIN,
        "Score range",
        "Default rate (%)",
    )?;

    // Population by midpoint, with the peak annotated
    let midpoints: Vec<String> = table.bins.iter().map(|d| format!("{}", d.bin.midpoint)).collect();
    let populations: Vec<f64> = table.bins.iter().map(|d| d.bin.population as f64).collect();
    draw_bar_panel(
        &panels[1],
        "Population by score",
        &midpoints,
        &populations,
        NEUTRAL,
        "Score midpoint",
        "Population",
    )?;
    if let Some((idx, peak)) = populations
        .iter()
        .enumerate()
        .fold(None::<(usize, f64)>, |best, (i, &p)| match best {
            Some((_, b)) if b >= p => best,
            _ => Some((i, p)),
        })
    {
        let label = (FONT, 22).into_font().color(&ACCENT);
        let (w, h) = panels[1].dim_in_pixel();
        let n = populations.len().max(1) as f64;
        let x = (80.0 + (w as f64 - 130.0) * (idx as f64 + 0.5) / n) as i32;
        let y = (h as f64 * 0.18) as i32;
        panels[1].draw(&Text::new(
            format!("Peak: {} ({})", peak as u64, table.bins[idx].bin.score_range),
            (x, y),
            label,
        ))?;
    }

    draw_lift_trend(&panels[2], table)?;
    draw_cumulative_lift(&panels[3], cumulative)?;

    root.present()?;
    Ok(())
}

fn draw_lift_trend(area: &DrawingArea<BitMapBackend<'_>, Shift>, table: &DerivedTable) -> DrawResult<()> {
    let points = positive_lift_series(table);
    let (x_min, x_max) = match (points.first(), points.last()) {
        (Some(first), Some(last)) if last.0 > first.0 => (first.0 - 25.0, last.0 + 25.0),
        (Some(only), _) => (only.0 - 25.0, only.0 + 25.0),
        _ => (0.0, 1.0),
    };
    let y_max = headroom(points.iter().map(|p| p.1).fold(1.0, f64::max), 1.25);

    let mut chart = ChartBuilder::on(area)
        .caption("Lift by score", (FONT, 32))
        .margin(25)
        .x_label_area_size(70)
        .y_label_area_size(80)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Score midpoint")
        .y_desc("Lift")
        .axis_desc_style((FONT, 20))
        .draw()?;

    chart.draw_series(
        AreaSeries::new(points.iter().copied(), 1.0, ACCENT.mix(0.3)).border_style(ACCENT.stroke_width(0)),
    )?;
    chart.draw_series(LineSeries::new(points.iter().copied(), ACCENT.stroke_width(4)))?;
    chart.draw_series(points.iter().map(|&p| {
        EmptyElement::at(p)
            + Circle::new((0, 0), 7, WHITE.filled())
            + Circle::new((0, 0), 7, ACCENT.stroke_width(3))
    }))?;

    chart
        .draw_series(LineSeries::new(vec![(x_min, 1.0), (x_max, 1.0)], GUIDE.stroke_width(2)))?
        .label("Baseline (lift = 1)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GUIDE.stroke_width(2)));

    let tag = (FONT, 20).into_font().color(&BLACK);
    chart.draw_series(points.iter().take(5).map(|&(x, y)| {
        EmptyElement::at((x, y)) + Text::new(format!("{:.1}x", y), (-15, -35), tag.clone())
    }))?;

    chart
        .configure_series_labels()
        .label_font((FONT, 20))
        .background_style(WHITE.mix(0.9))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

fn draw_cumulative_lift(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    cumulative: &[CumulativeLiftRow],
) -> DrawResult<()> {
    let points = cumulative_lift_series(cumulative);
    let y_max = headroom(points.iter().map(|p| p.1).fold(1.0, f64::max), 1.15);

    let mut chart = ChartBuilder::on(area)
        .caption("Cumulative lift", (FONT, 32))
        .margin(25)
        .x_label_area_size(70)
        .y_label_area_size(80)
        .build_cartesian_2d(0f64..100f64, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Cumulative population (%)")
        .y_desc("Cumulative lift")
        .axis_desc_style((FONT, 20))
        .draw()?;

    chart.draw_series(LineSeries::new(points.iter().copied(), MAIN.stroke_width(4)))?;
    chart.draw_series(
        points
            .iter()
            .map(|&p| EmptyElement::at(p) + Rectangle::new([(-4, -4), (4, 4)], MAIN.filled())),
    )?;

    chart
        .draw_series(LineSeries::new(vec![(0.0, 1.0), (100.0, 1.0)], GUIDE.stroke_width(2)))?
        .label("Baseline (lift = 1)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GUIDE.stroke_width(2)));

    chart
        .configure_series_labels()
        .label_font((FONT, 20))
        .background_style(WHITE.mix(0.9))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}
