//! Intersection over Union (IoU) calculation.

use crate::types::{BoundingBox, BoxFormat};

/// Calculate the Intersection over Union (IoU) between a ground-truth and a predicted box.
///
/// Both boxes are read with `format`; `origin_size` boxes are converted to corners first.
/// Extents are inclusive pixel counts: a box spanning `x_min..=x_max` is
/// `x_max - x_min + 1` pixels wide, for intersection and areas alike.
///
/// # Arguments
///
/// * `gt` - Ground-truth box
/// * `pred` - Predicted box
/// * `format` - Coordinate convention of both boxes
///
/// # Returns
///
/// Returns a value between 0.0 (no overlap) and 1.0 (perfect overlap).
///
/// # Example
///
/// ```
/// use det_score::metrics::iou::calculate_iou;
/// use det_score::types::{BoundingBox, BoxFormat};
///
/// let gt = BoundingBox::new(0.0, 0.0, 9.0, 9.0);
/// let pred = BoundingBox::new(5.0, 5.0, 14.0, 14.0);
/// let iou = calculate_iou(&gt, &pred, BoxFormat::Corners);
/// // 5x5 overlap, two 10x10 boxes: 25 / 175
/// assert!((iou - 25.0 / 175.0).abs() < 1e-12);
/// ```
pub fn calculate_iou(gt: &BoundingBox, pred: &BoundingBox, format: BoxFormat) -> f64 {
    let gt = gt.to_corners(format);
    let pred = pred.to_corners(format);

    let dx = gt.x_max().min(pred.x_max()) - gt.x_min().max(pred.x_min()) + 1.0;
    if dx < 0.0 {
        return 0.0;
    }

    let dy = gt.y_max().min(pred.y_max()) - gt.y_min().max(pred.y_min()) + 1.0;
    if dy < 0.0 {
        return 0.0;
    }

    let overlap_area = dx * dy;
    let union_area = gt.inclusive_area() + pred.inclusive_area() - overlap_area;

    // Degenerate input only; valid boxes always have a union of at least one pixel.
    if union_area <= 0.0 {
        return 0.0;
    }

    overlap_area / union_area
}

/// Calculate the IoU matrix between ground-truth and predicted boxes.
///
/// `result[i][j]` is the IoU between `gts[i]` and `preds[j]`.
///
/// # Example
///
/// ```
/// use det_score::metrics::iou::calculate_iou_matrix;
/// use det_score::types::{BoundingBox, BoxFormat};
///
/// let gts = vec![BoundingBox::new(0.0, 0.0, 10.0, 10.0)];
/// let preds = vec![
///     BoundingBox::new(0.0, 0.0, 10.0, 10.0),
///     BoundingBox::new(50.0, 50.0, 60.0, 60.0),
/// ];
/// let matrix = calculate_iou_matrix(&gts, &preds, BoxFormat::Corners);
/// assert_eq!(matrix.len(), 1);
/// assert_eq!(matrix[0], vec![1.0, 0.0]);
/// ```
pub fn calculate_iou_matrix(
    gts: &[BoundingBox],
    preds: &[BoundingBox],
    format: BoxFormat,
) -> Vec<Vec<f64>> {
    gts.iter()
        .map(|gt| {
            preds
                .iter()
                .map(|pred| calculate_iou(gt, pred, format))
                .collect()
        })
        .collect()
}
