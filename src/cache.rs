//! Per-image IoU cache shared across IoU thresholds.

use crate::metrics::iou::calculate_iou;
use crate::types::{BoundingBox, BoxFormat};

/// Dense `(gt index, prediction index)` matrix of lazily computed IoU values.
///
/// Geometry does not depend on the IoU threshold, so one cache serves every
/// threshold pass of an image. Cells are written at most once.
#[derive(Debug, Clone)]
pub struct IouCache {
    num_preds: usize,
    values: Vec<Option<f64>>,
}

impl IouCache {
    pub fn new(num_gts: usize, num_preds: usize) -> Self {
        Self {
            num_preds,
            values: vec![None; num_gts * num_preds],
        }
    }

    /// Return the cached IoU of `(gt, pred)`, computing and storing it on first access.
    pub fn get_or_compute(
        &mut self,
        gt_index: usize,
        gt: &BoundingBox,
        pred_index: usize,
        pred: &BoundingBox,
        format: BoxFormat,
    ) -> f64 {
        let offset = self.offset(gt_index, pred_index);
        *self.values[offset].get_or_insert_with(|| calculate_iou(gt, pred, format))
    }

    /// Number of cells filled so far.
    pub fn computed(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    fn offset(&self, gt_index: usize, pred_index: usize) -> usize {
        debug_assert!(pred_index < self.num_preds);
        gt_index * self.num_preds + pred_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let cache = IouCache::new(2, 3);
        assert_eq!(cache.computed(), 0);
    }

    #[test]
    fn test_write_once() {
        let gt = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let pred = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let other = BoundingBox::new(100.0, 100.0, 110.0, 110.0);

        let mut cache = IouCache::new(1, 1);
        let first = cache.get_or_compute(0, &gt, 0, &pred, BoxFormat::Corners);
        assert_eq!(first, 1.0);

        // A second lookup returns the stored value even if different boxes are passed.
        let second = cache.get_or_compute(0, &gt, 0, &other, BoxFormat::Corners);
        assert_eq!(second, 1.0);
        assert_eq!(cache.computed(), 1);
    }

    #[test]
    fn test_empty_dimensions() {
        let cache = IouCache::new(0, 5);
        assert_eq!(cache.computed(), 0);
        let cache = IouCache::new(5, 0);
        assert_eq!(cache.computed(), 0);
    }
}
