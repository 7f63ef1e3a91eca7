//! Geometry and count-based metrics.

pub mod iou;
pub mod precision;

pub use iou::{calculate_iou, calculate_iou_matrix};
pub use precision::{detection_precision, mean, MatchCounts};
