//! Statistics collected during a scoring pass.
//!
//! Tracks how many predictions survive the confidence cutoff and how many
//! images carry nothing to score, so a sweep can be sanity checked from logs.

use serde::{Deserialize, Serialize};

/// Counters for one dataset pass at one cutoff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreStats {
    /// Number of image records scored
    pub images: usize,

    /// Number of predictions before the cutoff was applied
    pub total_predictions: usize,

    /// Number of predictions with a score above the cutoff
    pub kept_predictions: usize,

    /// Number of ground-truth boxes across all images
    pub ground_truths: usize,

    /// Images with no ground truth and no kept predictions (scored as perfect)
    pub empty_images: usize,
}

impl ScoreStats {
    /// Create a new `ScoreStats` with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one image: its ground-truth count, and predictions before and after filtering.
    pub fn record_image(&mut self, ground_truths: usize, total: usize, kept: usize) {
        self.images += 1;
        self.ground_truths += ground_truths;
        self.total_predictions += total;
        self.kept_predictions += kept;
        if ground_truths == 0 && kept == 0 {
            self.empty_images += 1;
        }
    }

    /// Predictions removed by the cutoff
    pub fn filtered_predictions(&self) -> usize {
        self.total_predictions.saturating_sub(self.kept_predictions)
    }

    /// Merge counters from another pass (used when reducing parallel results).
    pub fn merge(&mut self, other: &ScoreStats) {
        self.images += other.images;
        self.total_predictions += other.total_predictions;
        self.kept_predictions += other.kept_predictions;
        self.ground_truths += other.ground_truths;
        self.empty_images += other.empty_images;
    }

    /// Get a formatted string summary of the statistics
    pub fn summary_string(&self) -> String {
        format!(
            "ScoreStats {{ images: {}, ground_truths: {}, predictions: {}, kept: {}, filtered: {}, empty: {} }}",
            self.images,
            self.ground_truths,
            self.total_predictions,
            self.kept_predictions,
            self.filtered_predictions(),
            self.empty_images
        )
    }
}
