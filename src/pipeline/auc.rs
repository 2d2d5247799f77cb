//! ROC curve and AUC for a binned scorecard
//!
//! Two routes to the same statistic are provided:
//!
//! * sample-level: the bin table is expanded into one labelled sample per
//!   member of the population and AUC is the Mann-Whitney U statistic over
//!   those samples (unweighted and weighted variants);
//! * grouped: AUC and the ROC curve are accumulated directly from the
//!   per-bin (score, defaults, non-defaults) triples without materialising
//!   samples.
//!
//! In both routes the predicted score of a bin is its default rate, so a
//! higher score means a higher predicted risk and defaults are positives.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::bins::ScorecardBin;

/// Scores closer than this are treated as tied
const TIE_TOLERANCE: f64 = 1e-10;

/// AUC reported when the population lacks positives or negatives
const UNDEFINED_AUC: f64 = 0.5;

/// One member of the expanded population
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabeledSample {
    /// Predicted score (the bin's default rate)
    pub score: f64,
    /// True when the sample defaulted
    pub defaulted: bool,
    pub weight: f64,
}

/// A single point on the ROC curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocPoint {
    /// Score threshold: samples scoring at or above it are predicted positive.
    /// `None` marks the unbounded ends of the curve (nothing or everything positive).
    pub threshold: Option<f64>,
    /// False positive rate: FP / (FP + TN)
    pub fpr: f64,
    /// True positive rate: TP / (TP + FN)
    pub tpr: f64,
}

/// Qualitative band for an AUC value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AucGrade {
    Poor,
    Low,
    Fair,
    Good,
    Excellent,
}

impl AucGrade {
    pub fn from_auc(auc: f64) -> Self {
        if auc < 0.50 {
            AucGrade::Poor
        } else if auc < 0.70 {
            AucGrade::Low
        } else if auc < 0.85 {
            AucGrade::Fair
        } else if auc < 0.95 {
            AucGrade::Good
        } else {
            AucGrade::Excellent
        }
    }

    /// Reference bands, in ascending order, as (range label, grade)
    pub fn bands() -> [(&'static str, AucGrade); 4] {
        [
            ("0.50-0.70", AucGrade::Low),
            ("0.70-0.85", AucGrade::Fair),
            ("0.85-0.95", AucGrade::Good),
            ("0.95-1.00", AucGrade::Excellent),
        ]
    }

    pub fn description(&self) -> &'static str {
        match self {
            AucGrade::Poor => "worse than random",
            AucGrade::Low => "low discrimination",
            AucGrade::Fair => "fair discrimination",
            AucGrade::Good => "good discrimination",
            AucGrade::Excellent => "excellent discrimination (rare)",
        }
    }
}

impl std::fmt::Display for AucGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AucGrade::Poor => write!(f, "poor"),
            AucGrade::Low => write!(f, "low"),
            AucGrade::Fair => write!(f, "fair"),
            AucGrade::Good => write!(f, "good"),
            AucGrade::Excellent => write!(f, "excellent"),
        }
    }
}

/// Every AUC figure reported for a bin table
#[derive(Debug, Clone, Serialize)]
pub struct AucReport {
    /// Mann-Whitney AUC over the expanded samples, counting each sample once
    pub auc_unweighted: f64,
    /// Mann-Whitney AUC over the expanded samples using their weights
    pub auc_weighted: f64,
    /// AUC accumulated from grouped bin counts
    pub auc_grouped: f64,
    pub gini: f64,
    pub grade: AucGrade,
    pub sample_count: usize,
    pub roc: Vec<RocPoint>,
}

/// Evaluate every AUC route for a bin table
pub fn evaluate_auc(bins: &[ScorecardBin]) -> AucReport {
    let samples = expand_samples(bins);
    let weighted = auc_weighted(&samples);

    AucReport {
        auc_unweighted: auc_unweighted(&samples),
        auc_weighted: weighted,
        auc_grouped: auc_from_bins(bins),
        gini: gini_from_auc(weighted),
        grade: AucGrade::from_auc(weighted),
        sample_count: samples.len(),
        roc: roc_curve_from_bins(bins),
    }
}

/// Expand a bin table into one labelled sample per population member.
///
/// Each bin emits its defaults first, then its non-defaults, all carrying the
/// bin's default rate as score and a weight of 1.
pub fn expand_samples(bins: &[ScorecardBin]) -> Vec<LabeledSample> {
    let total: u64 = bins.iter().map(|b| b.default_count + b.non_default_count()).sum();
    let mut samples = Vec::with_capacity(total as usize);

    for bin in bins {
        let positive = LabeledSample {
            score: bin.default_rate,
            defaulted: true,
            weight: 1.0,
        };
        let negative = LabeledSample {
            defaulted: false,
            ..positive
        };
        samples.extend(std::iter::repeat(positive).take(bin.default_count as usize));
        samples.extend(std::iter::repeat(negative).take(bin.non_default_count() as usize));
    }

    samples
}

/// Gini coefficient for an AUC value
pub fn gini_from_auc(auc: f64) -> f64 {
    2.0 * auc - 1.0
}

/// Rank-based AUC counting every sample once, ignoring weights
pub fn auc_unweighted(samples: &[LabeledSample]) -> f64 {
    let mut sorted: Vec<(f64, bool)> = samples.iter().map(|s| (s.score, s.defaulted)).collect();
    sorted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    let positives = sorted.iter().filter(|(_, d)| *d).count() as f64;
    let negatives = sorted.len() as f64 - positives;
    if positives == 0.0 || negatives == 0.0 {
        return UNDEFINED_AUC;
    }

    // Sum of 1-based mid-ranks held by positives
    let mut rank_sum_pos = 0.0;
    let n = sorted.len();
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j < n && (sorted[j].0 - sorted[i].0).abs() < TIE_TOLERANCE {
            j += 1;
        }
        let mid_rank = (i + 1 + j) as f64 / 2.0;
        let group_positives = sorted[i..j].iter().filter(|(_, d)| *d).count() as f64;
        rank_sum_pos += mid_rank * group_positives;
        i = j;
    }

    let u = rank_sum_pos - positives * (positives + 1.0) / 2.0;
    (u / (positives * negatives)).clamp(0.0, 1.0)
}

/// Weighted Mann-Whitney AUC: weights are summed where samples would be counted
pub fn auc_weighted(samples: &[LabeledSample]) -> f64 {
    let mut sorted: Vec<&LabeledSample> = samples.iter().collect();
    sorted.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal));

    let total_pos: f64 = sorted.iter().filter(|s| s.defaulted).map(|s| s.weight).sum();
    let total_neg: f64 = sorted.iter().filter(|s| !s.defaulted).map(|s| s.weight).sum();
    if total_pos <= 0.0 || total_neg <= 0.0 {
        return UNDEFINED_AUC;
    }

    let n = sorted.len();
    let mut weighted_rank_sum_pos = 0.0;
    let mut cumulative_weight = 0.0;
    let mut i = 0;

    while i < n {
        let current = sorted[i].score;
        let mut j = i;
        while j < n && (sorted[j].score - current).abs() < TIE_TOLERANCE {
            j += 1;
        }

        let group_weight: f64 = sorted[i..j].iter().map(|s| s.weight).sum();
        // Weighted midpoint of the ranks spanned by the tie group
        let avg_rank = cumulative_weight + group_weight / 2.0;

        let group_pos: f64 = sorted[i..j]
            .iter()
            .filter(|s| s.defaulted)
            .map(|s| s.weight)
            .sum();
        weighted_rank_sum_pos += avg_rank * group_pos;

        cumulative_weight += group_weight;
        i = j;
    }

    let u = weighted_rank_sum_pos - total_pos * total_pos / 2.0;
    (u / (total_pos * total_neg)).clamp(0.0, 1.0)
}

/// (score, positive mass, negative mass) per distinct score, highest score first
fn grouped_counts(bins: &[ScorecardBin]) -> Vec<(f64, f64, f64)> {
    let mut triples: Vec<(f64, f64, f64)> = bins
        .iter()
        .map(|b| (b.default_rate, b.default_count as f64, b.non_default_count() as f64))
        .collect();
    triples.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    let mut groups: Vec<(f64, f64, f64)> = Vec::with_capacity(triples.len());
    for (score, pos, neg) in triples {
        match groups.last_mut() {
            Some(last) if (last.0 - score).abs() < TIE_TOLERANCE => {
                last.1 += pos;
                last.2 += neg;
            }
            _ => groups.push((score, pos, neg)),
        }
    }
    groups
}

/// AUC computed from grouped bin counts.
///
/// Walking scores from high to low, each negative in a group is outranked by
/// every positive already passed and ties half of the positives in its own
/// group.
pub fn auc_from_bins(bins: &[ScorecardBin]) -> f64 {
    let groups = grouped_counts(bins);
    let total_pos: f64 = groups.iter().map(|g| g.1).sum();
    let total_neg: f64 = groups.iter().map(|g| g.2).sum();
    if total_pos <= 0.0 || total_neg <= 0.0 {
        return UNDEFINED_AUC;
    }

    let mut positives_above = 0.0;
    let mut concordant = 0.0;
    for (_, pos, neg) in groups {
        concordant += neg * (positives_above + pos / 2.0);
        positives_above += pos;
    }

    (concordant / (total_pos * total_neg)).clamp(0.0, 1.0)
}

fn diagonal() -> Vec<RocPoint> {
    vec![
        RocPoint {
            threshold: None,
            fpr: 0.0,
            tpr: 0.0,
        },
        RocPoint {
            threshold: None,
            fpr: 1.0,
            tpr: 1.0,
        },
    ]
}

/// Build a ROC curve from (score, positive, negative) groups sorted by descending score
fn sweep(groups: &[(f64, f64, f64)]) -> Vec<RocPoint> {
    let total_pos: f64 = groups.iter().map(|g| g.1).sum();
    let total_neg: f64 = groups.iter().map(|g| g.2).sum();
    if total_pos <= 0.0 || total_neg <= 0.0 {
        return diagonal();
    }

    let mut points = Vec::with_capacity(groups.len() + 1);
    points.push(RocPoint {
        threshold: None,
        fpr: 0.0,
        tpr: 0.0,
    });

    let mut tp = 0.0;
    let mut fp = 0.0;
    for &(score, pos, neg) in groups {
        tp += pos;
        fp += neg;
        points.push(RocPoint {
            threshold: Some(score),
            fpr: fp / total_neg,
            tpr: tp / total_pos,
        });
    }
    points
}

/// ROC curve over expanded samples, sweeping distinct scores in descending order
pub fn roc_curve(samples: &[LabeledSample]) -> Vec<RocPoint> {
    let mut sorted: Vec<&LabeledSample> = samples.iter().collect();
    sorted.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let mut groups: Vec<(f64, f64, f64)> = Vec::new();
    for s in sorted {
        let (pos, neg) = if s.defaulted { (s.weight, 0.0) } else { (0.0, s.weight) };
        match groups.last_mut() {
            Some(last) if (last.0 - s.score).abs() < TIE_TOLERANCE => {
                last.1 += pos;
                last.2 += neg;
            }
            _ => groups.push((s.score, pos, neg)),
        }
    }
    sweep(&groups)
}

/// ROC curve accumulated from grouped bin counts
pub fn roc_curve_from_bins(bins: &[ScorecardBin]) -> Vec<RocPoint> {
    sweep(&grouped_counts(bins))
}

/// Area under a ROC point sequence (trapezoidal rule)
pub fn trapezoidal_auc(points: &[RocPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| (w[1].fpr - w[0].fpr) * (w[1].tpr + w[0].tpr) / 2.0)
        .sum()
}
