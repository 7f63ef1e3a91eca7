//! Scoring configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::threshold::{
    generate_cutoff_range, validate_iou_thresholds, validate_threshold,
    COMPETITION_IOU_THRESHOLDS,
};
use crate::types::BoxFormat;

/// Half-open range of confidence cutoffs `[start, stop)` sampled every `step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutoffRange {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl CutoffRange {
    pub fn new(start: f64, stop: f64, step: f64) -> Self {
        Self { start, stop, step }
    }

    /// Expand into candidate cutoffs.
    pub fn candidates(&self) -> Result<Vec<f64>> {
        generate_cutoff_range(self.start, self.stop, self.step)
    }
}

impl Default for CutoffRange {
    /// 0.20 to 0.50 in steps of 0.01 (30 candidates).
    fn default() -> Self {
        Self::new(0.2, 0.5, 0.01)
    }
}

/// Settings for dataset scoring and cutoff search.
///
/// The default is the competition setup: corner boxes, IoU thresholds
/// 0.50..=0.75 in steps of 0.05, cutoffs 0.20..0.50 in steps of 0.01.
///
/// # Example
///
/// ```
/// use det_score::config::ScoringConfig;
///
/// let config: ScoringConfig = serde_json::from_str(r#"{"iou_thresholds": [0.5]}"#).unwrap();
/// assert_eq!(config.iou_thresholds, vec![0.5]);
/// assert_eq!(config.cutoff_range, ScoringConfig::default().cutoff_range);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub box_format: BoxFormat,
    pub iou_thresholds: Vec<f64>,
    pub cutoff_range: CutoffRange,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            box_format: BoxFormat::Corners,
            iou_thresholds: COMPETITION_IOU_THRESHOLDS.to_vec(),
            cutoff_range: CutoffRange::default(),
        }
    }
}

impl ScoringConfig {
    pub fn with_box_format(mut self, box_format: BoxFormat) -> Self {
        self.box_format = box_format;
        self
    }

    pub fn with_iou_thresholds(mut self, iou_thresholds: Vec<f64>) -> Self {
        self.iou_thresholds = iou_thresholds;
        self
    }

    pub fn with_cutoff_range(mut self, cutoff_range: CutoffRange) -> Self {
        self.cutoff_range = cutoff_range;
        self
    }

    /// Check thresholds and the cutoff range.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ScoringError::InvalidConfiguration`] for an empty threshold
    /// list, values outside [0.0, 1.0], or a malformed cutoff range.
    pub fn validate(&self) -> Result<()> {
        validate_iou_thresholds(&self.iou_thresholds)?;
        validate_threshold(self.cutoff_range.start)?;
        validate_threshold(self.cutoff_range.stop)?;
        self.cutoff_range.candidates().map(|_| ())
    }
}
