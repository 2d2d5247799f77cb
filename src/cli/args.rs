//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::pipeline::DEFAULT_KS_THRESHOLD;

/// scorelens - Evaluate scorecard discrimination with ROC/AUC, KS and Lift
#[derive(Parser, Debug)]
#[command(name = "scorelens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Bin table file (CSV or Parquet) with columns score_range, midpoint,
    /// population, default_count and optionally default_rate_pct.
    /// Defaults to the embedded reference scorecard.
    #[arg(short, long, global = true)]
    pub bins: Option<PathBuf>,

    /// Directory where PNG charts are written
    #[arg(short, long, default_value = ".", global = true)]
    pub output_dir: PathBuf,

    /// Skip chart rendering
    #[arg(long, default_value = "false", global = true)]
    pub no_chart: bool,

    /// Write all computed metrics to this JSON file
    #[arg(long, global = true)]
    pub export_json: Option<PathBuf>,

    /// KS value at or above which separation is reported as effective (0.0 to 1.0)
    #[arg(long, default_value_t = DEFAULT_KS_THRESHOLD, value_parser = validate_ks_threshold, global = true)]
    pub ks_threshold: f64,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// ROC curve and AUC from the expanded and grouped bin counts
    Roc,
    /// Kolmogorov-Smirnov separation across score bins
    Ks,
    /// Per-bin and cumulative Lift
    Lift,
    /// Run every metric
    All,
}

impl Commands {
    pub fn runs_roc(&self) -> bool {
        matches!(self, Commands::Roc | Commands::All)
    }

    pub fn runs_ks(&self) -> bool {
        matches!(self, Commands::Ks | Commands::All)
    }

    pub fn runs_lift(&self) -> bool {
        matches!(self, Commands::Lift | Commands::All)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Commands::Roc => "ROC / AUC",
            Commands::Ks => "KS",
            Commands::Lift => "Lift",
            Commands::All => "ROC / AUC, KS, Lift",
        }
    }
}

impl Cli {
    /// Selected metric, running every metric when no subcommand is given
    pub fn metrics(&self) -> Commands {
        self.command.unwrap_or(Commands::All)
    }

    /// Human-readable description of where the bins come from
    pub fn bin_source(&self) -> String {
        self.bins
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "reference".to_string())
    }
}

/// Validator for ks_threshold parameter
fn validate_ks_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..=1.0).contains(&value) {
        Err(format!(
            "ks_threshold must be between 0.0 and 1.0, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}
