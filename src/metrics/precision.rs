//! Detection precision from match counts.
//!
//! The competition metric counts every unmatched ground truth and every unmatched
//! prediction as a miss: `tp / (tp + fp + fn)`. This is not the textbook
//! `tp / (tp + fp)` precision and is intentionally kept in this form.

use serde::{Deserialize, Serialize};

/// True positive, false positive and false negative counts of one matching pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl MatchCounts {
    pub fn new(true_positives: usize, false_positives: usize, false_negatives: usize) -> Self {
        Self {
            true_positives,
            false_positives,
            false_negatives,
        }
    }

    /// Detection precision of these counts, see [`detection_precision`].
    pub fn precision(&self) -> f64 {
        detection_precision(self.true_positives, self.false_positives, self.false_negatives)
    }
}

/// Calculate detection precision `tp / (tp + fp + fn)`.
///
/// An image with no ground truth and no predictions has nothing to get wrong and
/// scores 1.0.
///
/// # Example
///
/// ```
/// use det_score::metrics::precision::detection_precision;
///
/// assert_eq!(detection_precision(1, 0, 1), 0.5);
/// assert_eq!(detection_precision(0, 1, 1), 0.0);
/// assert_eq!(detection_precision(0, 0, 0), 1.0);
/// ```
pub fn detection_precision(tp: usize, fp: usize, fn_: usize) -> f64 {
    let denominator = tp + fp + fn_;
    if denominator == 0 {
        return 1.0;
    }
    tp as f64 / denominator as f64
}

/// Arithmetic mean, 0.0 for an empty slice.
///
/// # Example
///
/// ```
/// use det_score::metrics::precision::mean;
///
/// assert!((mean(&[0.8, 0.9, 0.75, 0.85]) - 0.825).abs() < 1e-10);
/// assert_eq!(mean(&[]), 0.0);
/// ```
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
