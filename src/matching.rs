//! Greedy matching of predictions to ground truth for a single image.

use crate::cache::IouCache;
use crate::metrics::precision::MatchCounts;
use crate::types::{BoundingBox, BoxFormat};

/// Which ground-truth boxes have been claimed during one matching pass.
///
/// Created fresh for every IoU threshold; the IoU cache is what carries over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    matched: Vec<bool>,
}

impl MatchState {
    /// All `num_gts` ground-truth boxes start unmatched.
    pub fn new(num_gts: usize) -> Self {
        Self {
            matched: vec![false; num_gts],
        }
    }

    pub fn is_matched(&self, gt_index: usize) -> bool {
        self.matched[gt_index]
    }

    pub fn mark_matched(&mut self, gt_index: usize) {
        self.matched[gt_index] = true;
    }

    pub fn matched_count(&self) -> usize {
        self.matched.iter().filter(|&&m| m).count()
    }

    pub fn unmatched_count(&self) -> usize {
        self.matched.len() - self.matched_count()
    }
}

/// Find the unmatched ground-truth box that best matches `pred`.
///
/// Candidates with an IoU below `threshold` are never matched. Among the rest the
/// highest IoU wins, and on equal IoU the lowest ground-truth index wins.
/// IoU values are read from `cache` or computed into it.
///
/// # Arguments
///
/// * `gts` - Ground-truth boxes of the image
/// * `state` - Match state of the current pass
/// * `pred` - Predicted box
/// * `pred_index` - Index of `pred` in the image's prediction list (cache column)
/// * `threshold` - Minimum IoU to consider a match
/// * `format` - Coordinate convention of the boxes
/// * `cache` - IoU cache of the image
///
/// # Returns
///
/// Index of the matched ground-truth box, or `None` if no candidate meets the threshold.
pub fn find_best_match(
    gts: &[BoundingBox],
    state: &MatchState,
    pred: &BoundingBox,
    pred_index: usize,
    threshold: f64,
    format: BoxFormat,
    cache: &mut IouCache,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (gt_index, gt) in gts.iter().enumerate() {
        if state.is_matched(gt_index) {
            continue;
        }

        let iou = cache.get_or_compute(gt_index, gt, pred_index, pred, format);
        if iou < threshold {
            continue;
        }

        // Strict comparison keeps the first index on ties.
        if best.map_or(true, |(_, best_iou)| iou > best_iou) {
            best = Some((gt_index, iou));
        }
    }

    best.map(|(gt_index, _)| gt_index)
}

/// Greedily match `preds` (descending confidence) against `gts` at one IoU threshold.
///
/// Each prediction claims its best unmatched ground truth (true positive) or
/// becomes a false positive. Ground truths left over are false negatives.
pub fn match_counts(
    gts: &[BoundingBox],
    preds: &[BoundingBox],
    threshold: f64,
    format: BoxFormat,
    cache: &mut IouCache,
) -> MatchCounts {
    let mut state = MatchState::new(gts.len());
    let mut tp = 0;
    let mut fp = 0;

    for (pred_index, pred) in preds.iter().enumerate() {
        match find_best_match(gts, &state, pred, pred_index, threshold, format, cache) {
            Some(gt_index) => {
                tp += 1;
                state.mark_matched(gt_index);
            }
            None => fp += 1,
        }
    }

    MatchCounts::new(tp, fp, state.unmatched_count())
}

/// Detection precision `tp / (tp + fp + fn)` of one image at one IoU threshold.
///
/// # Example
///
/// ```
/// use det_score::cache::IouCache;
/// use det_score::matching::calculate_precision;
/// use det_score::types::{BoundingBox, BoxFormat};
///
/// let gts = vec![
///     BoundingBox::new(0.0, 0.0, 10.0, 10.0),
///     BoundingBox::new(50.0, 50.0, 60.0, 60.0),
/// ];
/// let preds = vec![BoundingBox::new(0.0, 0.0, 10.0, 10.0)];
/// let mut cache = IouCache::new(gts.len(), preds.len());
///
/// let precision = calculate_precision(&gts, &preds, 0.5, BoxFormat::Corners, &mut cache);
/// assert_eq!(precision, 0.5);
/// ```
pub fn calculate_precision(
    gts: &[BoundingBox],
    preds: &[BoundingBox],
    threshold: f64,
    format: BoxFormat,
    cache: &mut IouCache,
) -> f64 {
    match_counts(gts, preds, threshold, format, cache).precision()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(x1: f64, y1: f64, x2: f64, y2: f64) -> BoundingBox {
        BoundingBox::new(x1, y1, x2, y2)
    }

    fn precision(gts: &[BoundingBox], preds: &[BoundingBox], threshold: f64) -> f64 {
        let mut cache = IouCache::new(gts.len(), preds.len());
        calculate_precision(gts, preds, threshold, BoxFormat::Corners, &mut cache)
    }

    #[test]
    fn test_perfect_match() {
        let gts = vec![bbox(0.0, 0.0, 10.0, 10.0)];
        assert_eq!(precision(&gts, &gts, 0.5), 1.0);
    }

    #[test]
    fn test_no_match() {
        let gts = vec![bbox(0.0, 0.0, 10.0, 10.0)];
        let preds = vec![bbox(20.0, 20.0, 30.0, 30.0)];
        assert_eq!(precision(&gts, &preds, 0.5), 0.0);
    }

    #[test]
    fn test_below_threshold_is_false_positive() {
        // Only candidate, but IoU 25/175 < 0.5.
        let gts = vec![bbox(0.0, 0.0, 9.0, 9.0)];
        let preds = vec![bbox(5.0, 5.0, 14.0, 14.0)];
        let mut cache = IouCache::new(1, 1);
        let counts = match_counts(&gts, &preds, 0.5, BoxFormat::Corners, &mut cache);
        assert_eq!(counts, MatchCounts::new(0, 1, 1));
    }

    #[test]
    fn test_first_index_wins_ties() {
        // Two identical ground truths: both have IoU 1.0 with the prediction.
        let gts = vec![bbox(0.0, 0.0, 10.0, 10.0), bbox(0.0, 0.0, 10.0, 10.0)];
        let state = MatchState::new(2);
        let mut cache = IouCache::new(2, 1);
        let best = find_best_match(
            &gts,
            &state,
            &bbox(0.0, 0.0, 10.0, 10.0),
            0,
            0.5,
            BoxFormat::Corners,
            &mut cache,
        );
        assert_eq!(best, Some(0));
    }

    #[test]
    fn test_highest_iou_wins() {
        let gts = vec![bbox(2.0, 0.0, 12.0, 10.0), bbox(0.0, 0.0, 10.0, 10.0)];
        let state = MatchState::new(2);
        let mut cache = IouCache::new(2, 1);
        let best = find_best_match(
            &gts,
            &state,
            &bbox(0.0, 0.0, 10.0, 10.0),
            0,
            0.5,
            BoxFormat::Corners,
            &mut cache,
        );
        assert_eq!(best, Some(1));
    }

    #[test]
    fn test_matched_ground_truth_is_skipped() {
        let gts = vec![bbox(0.0, 0.0, 10.0, 10.0)];
        let mut state = MatchState::new(1);
        state.mark_matched(0);
        let mut cache = IouCache::new(1, 1);
        let best = find_best_match(
            &gts,
            &state,
            &gts[0],
            0,
            0.5,
            BoxFormat::Corners,
            &mut cache,
        );
        assert_eq!(best, None);
        // Matched boxes are not even looked up.
        assert_eq!(cache.computed(), 0);
    }

    #[test]
    fn test_duplicate_prediction_is_false_positive() {
        let gts = vec![bbox(0.0, 0.0, 10.0, 10.0)];
        let preds = vec![bbox(0.0, 0.0, 10.0, 10.0), bbox(0.0, 0.0, 10.0, 10.0)];
        let mut cache = IouCache::new(1, 2);
        let counts = match_counts(&gts, &preds, 0.5, BoxFormat::Corners, &mut cache);
        assert_eq!(counts, MatchCounts::new(1, 1, 0));
        assert_eq!(counts.precision(), 0.5);
    }

    #[test]
    fn test_greedy_order_matters() {
        // The first (most confident) prediction takes the ground truth it overlaps
        // best, even though a later prediction would have matched it perfectly.
        let gts = vec![bbox(0.0, 0.0, 10.0, 10.0)];
        let preds = vec![bbox(1.0, 0.0, 11.0, 10.0), bbox(0.0, 0.0, 10.0, 10.0)];
        let mut cache = IouCache::new(1, 2);
        let counts = match_counts(&gts, &preds, 0.5, BoxFormat::Corners, &mut cache);
        assert_eq!(counts, MatchCounts::new(1, 1, 0));
    }

    #[test]
    fn test_empty_image() {
        assert_eq!(precision(&[], &[], 0.5), 1.0);
    }

    #[test]
    fn test_only_ground_truth() {
        let gts = vec![bbox(0.0, 0.0, 10.0, 10.0)];
        assert_eq!(precision(&gts, &[], 0.5), 0.0);
    }

    #[test]
    fn test_match_state() {
        let mut state = MatchState::new(3);
        assert_eq!(state.unmatched_count(), 3);
        state.mark_matched(1);
        assert!(state.is_matched(1));
        assert!(!state.is_matched(0));
        assert_eq!(state.matched_count(), 1);
        assert_eq!(state.unmatched_count(), 2);
    }
}
