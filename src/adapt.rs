//! Pre-processing hook that turns raw model output and targets into [`ImageRecord`]s.
//!
//! The scorer expects corner boxes already in final image scale, predictions in
//! descending confidence order. Detector heads and data loaders rarely produce
//! exactly that: boxes come out as `xywh` or `yxyx`, at the training resolution,
//! and unordered. [`RecordBuilder`] applies the conversion, rescaling, clipping and
//! sorting in one place.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoringError};
use crate::types::{BoundingBox, ImageRecord, Prediction};

/// Bounding box in [x, y, width, height] format
pub type BBoxXYWH = [f64; 4];

/// Bounding box in [x1, y1, x2, y2] format
pub type BBoxXYXY = [f64; 4];

/// Bounding box in [y1, x1, y2, x2] format
pub type BBoxYXYX = [f64; 4];

/// Convert bounding box from [x, y, width, height] to [x1, y1, x2, y2]
///
/// # Examples
///
/// ```
/// # use det_score::adapt::xywh_to_xyxy;
/// assert_eq!(xywh_to_xyxy([10.0, 20.0, 30.0, 40.0]), [10.0, 20.0, 40.0, 60.0]);
/// ```
#[must_use]
pub fn xywh_to_xyxy(bbox: BBoxXYWH) -> BBoxXYXY {
    [bbox[0], bbox[1], bbox[0] + bbox[2], bbox[1] + bbox[3]]
}

/// Convert bounding box from [x1, y1, x2, y2] to [x, y, width, height]
///
/// # Examples
///
/// ```
/// # use det_score::adapt::xyxy_to_xywh;
/// assert_eq!(xyxy_to_xywh([10.0, 20.0, 40.0, 60.0]), [10.0, 20.0, 30.0, 40.0]);
/// ```
#[must_use]
pub fn xyxy_to_xywh(bbox: BBoxXYXY) -> BBoxXYWH {
    [bbox[0], bbox[1], bbox[2] - bbox[0], bbox[3] - bbox[1]]
}

/// Convert bounding box from [y1, x1, y2, x2] to [x1, y1, x2, y2]
///
/// # Examples
///
/// ```
/// # use det_score::adapt::yxyx_to_xyxy;
/// assert_eq!(yxyx_to_xyxy([20.0, 10.0, 60.0, 40.0]), [10.0, 20.0, 40.0, 60.0]);
/// ```
#[must_use]
pub fn yxyx_to_xyxy(bbox: BBoxYXYX) -> BBoxXYXY {
    [bbox[1], bbox[0], bbox[3], bbox[2]]
}

/// Coordinate layout of raw boxes handed to [`RecordBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawLayout {
    #[default]
    Xyxy,
    Xywh,
    Yxyx,
}

impl RawLayout {
    /// Convert a raw box in this layout to `[x1, y1, x2, y2]`.
    pub fn to_xyxy(self, bbox: [f64; 4]) -> BBoxXYXY {
        match self {
            RawLayout::Xyxy => bbox,
            RawLayout::Xywh => xywh_to_xyxy(bbox),
            RawLayout::Yxyx => yxyx_to_xyxy(bbox),
        }
    }
}

/// Rescale corner coordinates, clip them into `[min, max]` and optionally truncate
/// them to whole pixels.
///
/// Always holds a positive scale and a non-empty clip range; deserialization goes
/// through [`RescaleClip::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RescaleClipFields")]
pub struct RescaleClip {
    scale: f64,
    min: f64,
    max: f64,
    truncate: bool,
}

#[derive(Deserialize)]
struct RescaleClipFields {
    scale: f64,
    min: f64,
    max: f64,
    #[serde(default)]
    truncate: bool,
}

impl TryFrom<RescaleClipFields> for RescaleClip {
    type Error = ScoringError;

    fn try_from(fields: RescaleClipFields) -> Result<Self> {
        RescaleClip::new(fields.scale, fields.min, fields.max, fields.truncate)
    }
}

impl RescaleClip {
    /// # Errors
    ///
    /// Returns [`ScoringError::InvalidConfiguration`] if `scale` is not positive or
    /// `min > max`.
    pub fn new(scale: f64, min: f64, max: f64, truncate: bool) -> Result<Self> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ScoringError::InvalidConfiguration(format!(
                "Rescale factor must be positive, got {}",
                scale
            )));
        }
        if !(min <= max) {
            return Err(ScoringError::InvalidConfiguration(format!(
                "Clip range [{}, {}] is empty",
                min, max
            )));
        }
        Ok(Self {
            scale,
            min,
            max,
            truncate,
        })
    }

    /// 512px training resolution back to 1024px images: scale 2, clip to
    /// `[0, 1023]`, whole pixels.
    pub fn competition() -> Self {
        Self {
            scale: 2.0,
            min: 0.0,
            max: 1023.0,
            truncate: true,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Clip range as `(min, max)`.
    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn apply(&self, bbox: BBoxXYXY) -> BBoxXYXY {
        bbox.map(|c| {
            let c = (c * self.scale).clamp(self.min, self.max);
            if self.truncate {
                c.trunc()
            } else {
                c
            }
        })
    }
}

/// Builds [`ImageRecord`]s in corner format from raw boxes and scores.
///
/// # Example
///
/// ```
/// use det_score::adapt::{RawLayout, RecordBuilder};
///
/// let builder = RecordBuilder::new().pred_layout(RawLayout::Xywh);
/// let record = builder
///     .build(
///         &[[0.0, 0.0, 10.0, 10.0]],
///         &[[50.0, 50.0, 5.0, 5.0], [0.0, 0.0, 10.0, 10.0]],
///         &[0.2, 0.9],
///     )
///     .unwrap();
///
/// // Sorted by descending confidence and converted to corners.
/// assert_eq!(record.predictions[0].score, 0.9);
/// assert_eq!(record.predictions[0].bbox.coords, [0.0, 0.0, 10.0, 10.0]);
/// assert_eq!(record.predictions[1].bbox.coords, [50.0, 50.0, 55.0, 55.0]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RecordBuilder {
    gt_layout: RawLayout,
    pred_layout: RawLayout,
    rescale: Option<RescaleClip>,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Targets as `yxyx`, predictions as `xywh`, rescaled with [`RescaleClip::competition`].
    pub fn competition() -> Self {
        Self {
            gt_layout: RawLayout::Yxyx,
            pred_layout: RawLayout::Xywh,
            rescale: Some(RescaleClip::competition()),
        }
    }

    pub fn gt_layout(mut self, layout: RawLayout) -> Self {
        self.gt_layout = layout;
        self
    }

    pub fn pred_layout(mut self, layout: RawLayout) -> Self {
        self.pred_layout = layout;
        self
    }

    pub fn rescale(mut self, rescale: RescaleClip) -> Self {
        self.rescale = Some(rescale);
        self
    }

    /// Build one record. Predictions are stably sorted by descending score.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::LengthMismatch`] if `pred_boxes` and `scores` differ in length.
    pub fn build(
        &self,
        gt_boxes: &[[f64; 4]],
        pred_boxes: &[[f64; 4]],
        scores: &[f64],
    ) -> Result<ImageRecord> {
        if pred_boxes.len() != scores.len() {
            return Err(ScoringError::LengthMismatch(format!(
                "{} predicted boxes but {} scores",
                pred_boxes.len(),
                scores.len()
            )));
        }

        let gt_boxes = gt_boxes
            .iter()
            .map(|&b| self.convert(self.gt_layout, b))
            .collect();

        let mut predictions: Vec<Prediction> = pred_boxes
            .iter()
            .zip(scores)
            .map(|(&b, &score)| Prediction::new(self.convert(self.pred_layout, b), score))
            .collect();
        predictions.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(ImageRecord::new(gt_boxes, predictions))
    }

    fn convert(&self, layout: RawLayout, bbox: [f64; 4]) -> BoundingBox {
        let xyxy = layout.to_xyxy(bbox);
        match &self.rescale {
            Some(rescale) => BoundingBox::from(rescale.apply(xyxy)),
            None => BoundingBox::from(xyxy),
        }
    }
}
