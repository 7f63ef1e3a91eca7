//! Per-image precision averaged over IoU thresholds.

use serde::{Deserialize, Serialize};

use crate::cache::IouCache;
use crate::error::{Result, ScoringError};
use crate::matching::match_counts;
use crate::metrics::precision::{mean, MatchCounts};
use crate::threshold::validate_iou_thresholds;
use crate::types::{BoundingBox, BoxFormat, Prediction};

/// Match counts of one image at one IoU threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdCounts {
    pub iou_threshold: f64,
    pub counts: MatchCounts,
    pub precision: f64,
}

/// Calculate an image's precision averaged over `thresholds`.
///
/// One IoU cache is shared by all thresholds; match state starts fresh for each.
///
/// # Arguments
///
/// * `gts` - Ground-truth boxes
/// * `preds` - Predictions sorted by descending confidence
/// * `thresholds` - IoU thresholds, iterated in the given order
/// * `format` - Coordinate convention of all boxes
///
/// # Errors
///
/// * [`ScoringError::InvalidBox`] if any box is malformed
/// * [`ScoringError::UnsortedPredictions`] if scores are not descending
/// * [`ScoringError::InvalidConfiguration`] for an empty or out-of-range threshold list
///
/// # Example
///
/// ```
/// use det_score::scorer::calculate_image_precision;
/// use det_score::types::{BoundingBox, BoxFormat, Prediction};
///
/// let gts = vec![BoundingBox::new(0.0, 0.0, 10.0, 10.0)];
/// let preds = vec![Prediction::new([0.0, 0.0, 10.0, 10.0], 0.9)];
///
/// let precision =
///     calculate_image_precision(&gts, &preds, &[0.5, 0.75], BoxFormat::Corners).unwrap();
/// assert_eq!(precision, 1.0);
/// ```
pub fn calculate_image_precision(
    gts: &[BoundingBox],
    preds: &[Prediction],
    thresholds: &[f64],
    format: BoxFormat,
) -> Result<f64> {
    validate_iou_thresholds(thresholds)?;
    validate_image(gts, preds, format)?;

    Ok(image_precision_unchecked(gts, preds, thresholds, format))
}

/// Per-threshold breakdown of [`calculate_image_precision`].
///
/// # Errors
///
/// Same as [`calculate_image_precision`].
pub fn image_threshold_counts(
    gts: &[BoundingBox],
    preds: &[Prediction],
    thresholds: &[f64],
    format: BoxFormat,
) -> Result<Vec<ThresholdCounts>> {
    validate_iou_thresholds(thresholds)?;
    validate_image(gts, preds, format)?;

    Ok(threshold_counts_unchecked(gts, preds, thresholds, format))
}

/// [`calculate_image_precision`] for input that has already passed
/// [`validate_image`] and threshold validation.
pub(crate) fn image_precision_unchecked(
    gts: &[BoundingBox],
    preds: &[Prediction],
    thresholds: &[f64],
    format: BoxFormat,
) -> f64 {
    let precisions: Vec<f64> = threshold_counts_unchecked(gts, preds, thresholds, format)
        .iter()
        .map(|t| t.precision)
        .collect();

    // Sum then divide: a perfect image scores exactly 1.0.
    mean(&precisions)
}

fn threshold_counts_unchecked(
    gts: &[BoundingBox],
    preds: &[Prediction],
    thresholds: &[f64],
    format: BoxFormat,
) -> Vec<ThresholdCounts> {
    let pred_boxes: Vec<BoundingBox> = preds.iter().map(|p| p.bbox).collect();
    let mut cache = IouCache::new(gts.len(), pred_boxes.len());

    thresholds
        .iter()
        .map(|&iou_threshold| {
            let counts = match_counts(gts, &pred_boxes, iou_threshold, format, &mut cache);
            ThresholdCounts {
                iou_threshold,
                counts,
                precision: counts.precision(),
            }
        })
        .collect()
}

/// Check box geometry, score range and descending-confidence order of one image.
pub(crate) fn validate_image(
    gts: &[BoundingBox],
    preds: &[Prediction],
    format: BoxFormat,
) -> Result<()> {
    for gt in gts {
        gt.validate(format)?;
    }

    for pred in preds {
        pred.bbox.validate(format)?;
        if !(0.0..=1.0).contains(&pred.score) {
            return Err(ScoringError::InvalidConfiguration(format!(
                "Prediction score must be between 0.0 and 1.0, got {}",
                pred.score
            )));
        }
    }

    if let Some(i) = preds.windows(2).position(|w| w[0].score < w[1].score) {
        return Err(ScoringError::UnsortedPredictions(format!(
            "score {} at index {} is followed by {}",
            preds[i].score,
            i,
            preds[i + 1].score
        )));
    }

    Ok(())
}
