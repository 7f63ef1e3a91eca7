//! Confidence cutoffs and IoU threshold validation.

use crate::error::{Result, ScoringError};
use crate::types::Prediction;

/// IoU thresholds the competition metric averages over.
pub const COMPETITION_IOU_THRESHOLDS: [f64; 6] = [0.5, 0.55, 0.6, 0.65, 0.7, 0.75];

/// Upper bound on the number of candidates a cutoff range may expand to.
pub const MAX_CUTOFF_CANDIDATES: usize = 1_000_000;

/// Keep predictions whose score is strictly above `cutoff`.
///
/// Relative order is preserved, so descending-confidence input stays sorted.
///
/// # Errors
///
/// Returns an error if `cutoff` is not in the valid range [0.0, 1.0].
///
/// # Example
///
/// ```
/// use det_score::threshold::filter_by_confidence;
/// use det_score::types::Prediction;
///
/// let predictions = vec![
///     Prediction::new([0.0, 0.0, 10.0, 10.0], 0.9),
///     Prediction::new([5.0, 5.0, 15.0, 15.0], 0.5),
///     Prediction::new([9.0, 9.0, 19.0, 19.0], 0.3),
/// ];
///
/// let filtered = filter_by_confidence(&predictions, 0.5).unwrap();
/// assert_eq!(filtered.len(), 1);
/// ```
pub fn filter_by_confidence(predictions: &[Prediction], cutoff: f64) -> Result<Vec<Prediction>> {
    validate_threshold(cutoff)?;

    Ok(predictions
        .iter()
        .filter(|p| p.score > cutoff)
        .copied()
        .collect())
}

/// Generate candidate cutoffs `start, start + step, ...` strictly below `stop`.
///
/// Candidates are computed as `start + i * step` rather than accumulated, so
/// `(0.2, 0.5, 0.01)` yields exactly 30 values.
///
/// # Errors
///
/// Returns an error if `start` or `stop` is outside [0.0, 1.0], if `step` is not
/// positive, if `start > stop`, or if the range would expand to more than
/// [`MAX_CUTOFF_CANDIDATES`] values.
///
/// # Example
///
/// ```
/// use det_score::threshold::generate_cutoff_range;
///
/// let cutoffs = generate_cutoff_range(0.2, 0.5, 0.01).unwrap();
/// assert_eq!(cutoffs.len(), 30);
/// assert_eq!(cutoffs[0], 0.2);
/// assert!((cutoffs[29] - 0.49).abs() < 1e-9);
/// ```
pub fn generate_cutoff_range(start: f64, stop: f64, step: f64) -> Result<Vec<f64>> {
    validate_threshold(start)?;
    validate_threshold(stop)?;

    if !(step.is_finite() && step > 0.0) {
        return Err(ScoringError::InvalidConfiguration(format!(
            "Cutoff step must be positive, got {}",
            step
        )));
    }

    if start > stop {
        return Err(ScoringError::InvalidConfiguration(format!(
            "Cutoff start ({}) must be <= stop ({})",
            start, stop
        )));
    }

    // Small slack so that (0.5 - 0.2) / 0.01 rounding just above 30 does not add a candidate.
    let count = ((stop - start) / step - 1e-9).ceil().max(0.0);
    if !count.is_finite() || count > MAX_CUTOFF_CANDIDATES as f64 {
        return Err(ScoringError::InvalidConfiguration(format!(
            "Cutoff step {} over [{}, {}) gives more than {} candidates",
            step, start, stop, MAX_CUTOFF_CANDIDATES
        )));
    }

    let count = count as usize;
    Ok((0..count).map(|i| start + step * i as f64).collect())
}

/// Validate that a threshold or cutoff is in the valid range [0.0, 1.0].
pub fn validate_threshold(threshold: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(ScoringError::InvalidConfiguration(format!(
            "Threshold must be between 0.0 and 1.0, got {}",
            threshold
        )));
    }
    Ok(())
}

/// Validate a non-empty list of IoU thresholds.
pub fn validate_iou_thresholds(thresholds: &[f64]) -> Result<()> {
    if thresholds.is_empty() {
        return Err(ScoringError::InvalidConfiguration(
            "At least one IoU threshold is required".to_string(),
        ));
    }
    thresholds.iter().try_for_each(|&t| validate_threshold(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_is_strict() {
        let predictions = vec![
            Prediction::new([0.0, 0.0, 1.0, 1.0], 0.9),
            Prediction::new([0.0, 0.0, 1.0, 1.0], 0.5),
            Prediction::new([0.0, 0.0, 1.0, 1.0], 0.3),
        ];

        let filtered = filter_by_confidence(&predictions, 0.5).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].score, 0.9);

        let filtered = filter_by_confidence(&predictions, 0.0).unwrap();
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn test_invalid_cutoff() {
        let predictions = vec![];
        assert!(filter_by_confidence(&predictions, 1.5).is_err());
        assert!(filter_by_confidence(&predictions, -0.1).is_err());
        assert!(filter_by_confidence(&predictions, f64::NAN).is_err());
    }

    #[test]
    fn test_generate_cutoff_range() {
        let cutoffs = generate_cutoff_range(0.2, 0.5, 0.01).unwrap();
        assert_eq!(cutoffs.len(), 30);
        assert!((cutoffs[0] - 0.2).abs() < 1e-10);
        assert!((cutoffs[10] - 0.3).abs() < 1e-10);
        assert!(cutoffs.iter().all(|&c| c < 0.5));

        let cutoffs = generate_cutoff_range(0.0, 1.0, 0.25).unwrap();
        assert_eq!(cutoffs, vec![0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_generate_cutoff_range_empty_and_invalid() {
        assert!(generate_cutoff_range(0.3, 0.3, 0.01).unwrap().is_empty());
        assert!(generate_cutoff_range(0.5, 0.2, 0.01).is_err());
        assert!(generate_cutoff_range(0.2, 0.5, 0.0).is_err());
        assert!(generate_cutoff_range(0.2, 1.5, 0.1).is_err());
    }

    #[test]
    fn test_generate_cutoff_range_too_many_candidates() {
        let result = generate_cutoff_range(0.0, 1.0, 1e-300);
        assert!(matches!(result, Err(ScoringError::InvalidConfiguration(_))));

        let result = generate_cutoff_range(0.0, 1.0, 1e-12);
        assert!(matches!(result, Err(ScoringError::InvalidConfiguration(_))));

        let cutoffs = generate_cutoff_range(0.0, 1.0, 1e-5).unwrap();
        assert!(cutoffs.len() <= MAX_CUTOFF_CANDIDATES);
        assert!(cutoffs.iter().all(|&c| c < 1.0));
    }

    #[test]
    fn test_validate_iou_thresholds() {
        assert!(validate_iou_thresholds(&COMPETITION_IOU_THRESHOLDS).is_ok());
        assert!(validate_iou_thresholds(&[]).is_err());
        assert!(validate_iou_thresholds(&[0.5, 1.1]).is_err());
    }
}
