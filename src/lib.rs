//! # det-score
//!
//! Scoring of object-detection predictions against ground truth with greedy
//! IoU matching, averaged over several IoU thresholds, with a sweep over
//! confidence cutoffs to find the best operating point.
//!
//! The per-image metric is `tp / (tp + fp + fn)` (every unmatched prediction and
//! every unmatched ground truth counts as a miss), averaged over the IoU thresholds
//! 0.50, 0.55, ..., 0.75 and then over images.
//!
//! ## Features
//!
//! - IoU under the inclusive pixel convention for corner or origin+size boxes
//! - Greedy matching in confidence order with a per-image IoU cache shared across thresholds
//! - Dataset scoring at a confidence cutoff, in parallel over images
//! - Cutoff search, in parallel over candidates
//! - Conversion of raw detector output (layout, rescale, clip, sort) into records
//!
//! ## Quick Start
//!
//! ```rust
//! use det_score::evaluator::{calculate_final_score, search_best_cutoff};
//! use det_score::threshold::generate_cutoff_range;
//! use det_score::types::{BoundingBox, ImageRecord, Prediction};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let records = vec![ImageRecord::new(
//!     vec![BoundingBox::new(0.0, 0.0, 10.0, 10.0)],
//!     vec![
//!         Prediction::new([0.0, 0.0, 10.0, 10.0], 0.6),
//!         Prediction::new([40.0, 40.0, 50.0, 50.0], 0.3),
//!     ],
//! )];
//!
//! let score = calculate_final_score(&records, 0.2)?;
//! assert_eq!(score, 0.5);
//!
//! let search = search_best_cutoff(&records, &generate_cutoff_range(0.2, 0.5, 0.01)?)?;
//! assert_eq!(search.best_score, 1.0);
//! # Ok(())
//! # }
//! ```

pub mod adapt;
pub mod cache;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod loader;
pub mod matching;
pub mod metrics;
pub mod scorer;
pub mod stats;
pub mod threshold;
pub mod types;

// Re-export commonly used types and functions
pub use config::{CutoffRange, ScoringConfig};
pub use error::{Result, ScoringError};
pub use evaluator::{calculate_final_score, search_best_cutoff, Evaluator};
pub use scorer::calculate_image_precision;
pub use threshold::{filter_by_confidence, generate_cutoff_range, COMPETITION_IOU_THRESHOLDS};
pub use types::{
    BoundingBox, BoxFormat, CutoffSearch, DatasetScore, ImageRecord, Prediction,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_exports_cover_quick_start() {
        let records = vec![ImageRecord::new(
            vec![BoundingBox::new(0.0, 0.0, 10.0, 10.0)],
            vec![Prediction::new([0.0, 0.0, 10.0, 10.0], 0.6)],
        )];

        let candidates = ScoringConfig::default().cutoff_range.candidates().unwrap();
        assert_eq!(candidates, generate_cutoff_range(0.2, 0.5, 0.01).unwrap());

        let search = search_best_cutoff(&records, &candidates).unwrap();
        assert_eq!(search.best_score, calculate_final_score(&records, 0.2).unwrap());
        assert_eq!(search.best_cutoff, candidates[0]);
    }
}
