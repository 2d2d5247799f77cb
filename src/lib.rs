//! scorelens: Scorecard Discrimination Library
//!
//! Computes ROC/AUC, Kolmogorov-Smirnov separation and Lift for a
//! credit scorecard summarised as score bins with population and
//! default counts.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
