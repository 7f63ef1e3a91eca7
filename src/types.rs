//! Core data types for boxes, predictions and scoring results.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoringError};
use crate::stats::ScoreStats;

/// Coordinate convention of a [`BoundingBox`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxFormat {
    /// `[x_min, y_min, x_max, y_max]` (Pascal VOC).
    #[default]
    #[serde(alias = "pascal_voc", alias = "xyxy")]
    Corners,
    /// `[x, y, width, height]` (COCO).
    #[serde(alias = "coco", alias = "xywh")]
    OriginSize,
}

/// Four box coordinates. Their meaning depends on the [`BoxFormat`] they are read with.
///
/// Serializes as a plain `[f64; 4]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundingBox {
    pub coords: [f64; 4],
}

impl BoundingBox {
    /// Create a new bounding box from four raw coordinates.
    pub fn new(c0: f64, c1: f64, c2: f64, c3: f64) -> Self {
        Self {
            coords: [c0, c1, c2, c3],
        }
    }

    /// Return this box in `corners` form. `corners` input is returned unchanged.
    pub fn to_corners(&self, format: BoxFormat) -> BoundingBox {
        match format {
            BoxFormat::Corners => *self,
            BoxFormat::OriginSize => {
                let [x, y, w, h] = self.coords;
                BoundingBox::new(x, y, x + w, y + h)
            }
        }
    }

    pub fn x_min(&self) -> f64 {
        self.coords[0]
    }

    pub fn y_min(&self) -> f64 {
        self.coords[1]
    }

    pub fn x_max(&self) -> f64 {
        self.coords[2]
    }

    pub fn y_max(&self) -> f64 {
        self.coords[3]
    }

    /// Area of a `corners` box under the inclusive pixel convention
    /// (`(x_max - x_min + 1) * (y_max - y_min + 1)`).
    pub fn inclusive_area(&self) -> f64 {
        (self.x_max() - self.x_min() + 1.0) * (self.y_max() - self.y_min() + 1.0)
    }

    /// Check that the box can be scored under `format`.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::InvalidBox`] for non-finite coordinates, negative
    /// width/height, or `max < min` once normalized to corners.
    pub fn validate(&self, format: BoxFormat) -> Result<()> {
        if self.coords.iter().any(|c| !c.is_finite()) {
            return Err(ScoringError::InvalidBox(format!(
                "non-finite coordinate in {:?}",
                self.coords
            )));
        }

        if format == BoxFormat::OriginSize && (self.coords[2] < 0.0 || self.coords[3] < 0.0) {
            return Err(ScoringError::InvalidBox(format!(
                "negative width or height in {:?}",
                self.coords
            )));
        }

        let corners = self.to_corners(format);
        if corners.x_max() < corners.x_min() || corners.y_max() < corners.y_min() {
            return Err(ScoringError::InvalidBox(format!(
                "max < min in {:?}",
                corners.coords
            )));
        }

        Ok(())
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(coords: [f64; 4]) -> Self {
        Self { coords }
    }
}

/// A predicted box with its confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub bbox: BoundingBox,
    pub score: f64,
}

impl Prediction {
    pub fn new(bbox: impl Into<BoundingBox>, score: f64) -> Self {
        Self {
            bbox: bbox.into(),
            score,
        }
    }
}

/// Ground truth and predictions for a single image.
///
/// Predictions are expected in descending confidence order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<u64>,
    pub gt_boxes: Vec<BoundingBox>,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

impl ImageRecord {
    pub fn new(gt_boxes: Vec<BoundingBox>, predictions: Vec<Prediction>) -> Self {
        Self {
            image_id: None,
            gt_boxes,
            predictions,
        }
    }

    pub fn with_image_id(mut self, image_id: u64) -> Self {
        self.image_id = Some(image_id);
        self
    }
}

/// Mean precision of a dataset at one score cutoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetScore {
    /// Mean of the per-image precision.
    pub score: f64,
    /// Confidence cutoff predictions had to exceed.
    pub cutoff: f64,
    /// IoU thresholds each image was averaged over.
    pub iou_thresholds: Vec<f64>,
    pub stats: ScoreStats,
}

/// Outcome of a sweep over score cutoffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutoffSearch {
    pub best_score: f64,
    pub best_cutoff: f64,
    /// `(cutoff, score)` for every candidate, in candidate order.
    pub curve: Vec<(f64, f64)>,
}
