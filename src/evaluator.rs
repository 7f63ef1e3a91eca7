//! Dataset-level scoring and confidence cutoff search.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::ScoringConfig;
use crate::error::{Result, ScoringError};
use crate::metrics::precision::mean;
use crate::scorer::{image_precision_unchecked, validate_image};
use crate::stats::ScoreStats;
use crate::threshold::{filter_by_confidence, validate_threshold};
use crate::types::{CutoffSearch, DatasetScore, ImageRecord};

/// Scores datasets of [`ImageRecord`]s under a [`ScoringConfig`].
///
/// Images are scored in parallel, and so are the cutoffs of a sweep. Results are
/// reduced in input order, so output does not depend on scheduling.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: ScoringConfig,
}

impl Evaluator {
    /// Create an evaluator, validating `config` up front.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::InvalidConfiguration`] if the config is invalid.
    pub fn new(config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Evaluator with the competition defaults.
    pub fn competition() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Precision of one image after dropping predictions scored at or below `cutoff`.
    ///
    /// The whole record is validated before filtering, so a malformed prediction is
    /// reported whatever the cutoff.
    pub fn score_image(&self, record: &ImageRecord, cutoff: f64) -> Result<(f64, ScoreStats)> {
        validate_threshold(cutoff)?;
        self.validate_record(record)?;
        self.score_validated(record, cutoff)
    }

    /// Mean image precision of the dataset at `cutoff`.
    ///
    /// # Errors
    ///
    /// * [`ScoringError::InvalidConfiguration`] if `cutoff` is outside [0.0, 1.0]
    ///   (checked before any image is scored)
    /// * [`ScoringError::EmptyDataset`] if `records` is empty
    /// * Any error of [`Evaluator::score_image`]
    pub fn score_dataset(&self, records: &[ImageRecord], cutoff: f64) -> Result<DatasetScore> {
        validate_threshold(cutoff)?;
        ensure_not_empty(records)?;
        self.validate_records(records)?;

        self.score_pass(records, cutoff)
    }

    /// Score the dataset at every cutoff in `candidates` and keep the best.
    ///
    /// The first candidate reaching the maximum score wins ties.
    ///
    /// # Errors
    ///
    /// * [`ScoringError::InvalidConfiguration`] if `candidates` is empty or any cutoff is
    ///   outside [0.0, 1.0] (checked before any image is scored)
    /// * [`ScoringError::EmptyDataset`] if `records` is empty
    pub fn search_cutoffs(
        &self,
        records: &[ImageRecord],
        candidates: &[f64],
    ) -> Result<CutoffSearch> {
        if candidates.is_empty() {
            return Err(ScoringError::InvalidConfiguration(
                "At least one candidate cutoff is required".to_string(),
            ));
        }
        candidates.iter().try_for_each(|&c| validate_threshold(c))?;
        ensure_not_empty(records)?;
        self.validate_records(records)?;

        let scores: Vec<DatasetScore> = candidates
            .par_iter()
            .map(|&cutoff| self.score_pass(records, cutoff))
            .collect::<Result<Vec<_>>>()?;

        let curve: Vec<(f64, f64)> = scores.iter().map(|s| (s.cutoff, s.score)).collect();

        let (mut best_cutoff, mut best_score) = curve[0];
        for &(cutoff, score) in &curve[1..] {
            if score > best_score {
                best_score = score;
                best_cutoff = cutoff;
            }
        }

        info!(
            "best score {:.4} at cutoff {:.2} over {} candidates, {} images",
            best_score,
            best_cutoff,
            candidates.len(),
            records.len()
        );

        Ok(CutoffSearch {
            best_score,
            best_cutoff,
            curve,
        })
    }

    /// Sweep the configured cutoff range.
    pub fn search(&self, records: &[ImageRecord]) -> Result<CutoffSearch> {
        let candidates = self.config.cutoff_range.candidates()?;
        self.search_cutoffs(records, &candidates)
    }

    fn validate_record(&self, record: &ImageRecord) -> Result<()> {
        validate_image(&record.gt_boxes, &record.predictions, self.config.box_format)
    }

    /// Runs once per call, before any scoring pass. Reports the first bad record.
    fn validate_records(&self, records: &[ImageRecord]) -> Result<()> {
        records
            .iter()
            .try_for_each(|record| self.validate_record(record))
    }

    /// Score a record that has already passed [`Evaluator::validate_record`].
    fn score_validated(&self, record: &ImageRecord, cutoff: f64) -> Result<(f64, ScoreStats)> {
        let kept = filter_by_confidence(&record.predictions, cutoff)?;
        let precision = image_precision_unchecked(
            &record.gt_boxes,
            &kept,
            &self.config.iou_thresholds,
            self.config.box_format,
        );

        let mut stats = ScoreStats::new();
        stats.record_image(record.gt_boxes.len(), record.predictions.len(), kept.len());

        Ok((precision, stats))
    }

    /// One scoring pass over validated records.
    fn score_pass(&self, records: &[ImageRecord], cutoff: f64) -> Result<DatasetScore> {
        let per_image: Vec<(f64, ScoreStats)> = records
            .par_iter()
            .map(|record| self.score_validated(record, cutoff))
            .collect::<Result<Vec<_>>>()?;

        let precisions: Vec<f64> = per_image.iter().map(|(p, _)| *p).collect();
        let mut stats = ScoreStats::new();
        for (_, image_stats) in &per_image {
            stats.merge(image_stats);
        }

        let score = mean(&precisions);
        debug!("cutoff {:.2}: score {:.4} ({})", cutoff, score, stats.summary_string());

        Ok(DatasetScore {
            score,
            cutoff,
            iou_thresholds: self.config.iou_thresholds.clone(),
            stats,
        })
    }
}

/// Mean image precision over the competition IoU thresholds (0.50..=0.75) with
/// corner boxes, keeping predictions with score strictly above `score_threshold`.
///
/// # Example
///
/// ```
/// use det_score::evaluator::calculate_final_score;
/// use det_score::types::{BoundingBox, ImageRecord, Prediction};
///
/// let records = vec![ImageRecord::new(
///     vec![BoundingBox::new(0.0, 0.0, 10.0, 10.0)],
///     vec![Prediction::new([0.0, 0.0, 10.0, 10.0], 0.9)],
/// )];
/// assert_eq!(calculate_final_score(&records, 0.5).unwrap(), 1.0);
/// ```
pub fn calculate_final_score(records: &[ImageRecord], score_threshold: f64) -> Result<f64> {
    Evaluator::competition()
        .score_dataset(records, score_threshold)
        .map(|s| s.score)
}

/// Best [`calculate_final_score`] over `candidate_cutoffs`, first maximum winning ties.
pub fn search_best_cutoff(
    records: &[ImageRecord],
    candidate_cutoffs: &[f64],
) -> Result<CutoffSearch> {
    Evaluator::competition().search_cutoffs(records, candidate_cutoffs)
}

fn ensure_not_empty(records: &[ImageRecord]) -> Result<()> {
    if records.is_empty() {
        return Err(ScoringError::EmptyDataset(
            "No image records to score".to_string(),
        ));
    }
    Ok(())
}
