//! JSON loading utilities for image records and scoring configuration.
//!
//! Records are a JSON array of objects:
//!
//! ```json
//! [
//!   {
//!     "image_id": 1,
//!     "gt_boxes": [[0, 0, 10, 10]],
//!     "predictions": [{"bbox": [0, 0, 10, 10], "score": 0.9}]
//!   }
//! ]
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::debug;

use crate::config::ScoringConfig;
use crate::error::Result;
use crate::types::{BoxFormat, ImageRecord};

/// Load image records from a JSON file, validating boxes under `format`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or holds a malformed box.
///
/// # Example
///
/// ```no_run
/// use det_score::loader::load_records_from_file;
/// use det_score::types::BoxFormat;
///
/// let records = load_records_from_file("validation.json", BoxFormat::Corners).unwrap();
/// println!("Loaded {} images", records.len());
/// ```
pub fn load_records_from_file<P: AsRef<Path>>(
    path: P,
    format: BoxFormat,
) -> Result<Vec<ImageRecord>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let records: Vec<ImageRecord> = serde_json::from_reader(reader)?;

    validate_records(&records, format)?;
    debug!("Loaded {} image records from {}", records.len(), path.display());

    Ok(records)
}

/// Load image records from a JSON string, validating boxes under `format`.
///
/// # Example
///
/// ```
/// use det_score::loader::load_records_from_str;
/// use det_score::types::BoxFormat;
///
/// let json = r#"[{"gt_boxes": [[0, 0, 10, 10]], "predictions": []}]"#;
/// let records = load_records_from_str(json, BoxFormat::Corners).unwrap();
/// assert_eq!(records.len(), 1);
/// ```
pub fn load_records_from_str(json_str: &str, format: BoxFormat) -> Result<Vec<ImageRecord>> {
    let records: Vec<ImageRecord> = serde_json::from_str(json_str)?;
    validate_records(&records, format)?;
    Ok(records)
}

/// Load and validate a [`ScoringConfig`] from a JSON file. Missing fields take defaults.
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> Result<ScoringConfig> {
    let file = File::open(path)?;
    let config: ScoringConfig = serde_json::from_reader(BufReader::new(file))?;
    config.validate()?;
    Ok(config)
}

/// Load and validate a [`ScoringConfig`] from a JSON string. Missing fields take defaults.
pub fn load_config_from_str(json_str: &str) -> Result<ScoringConfig> {
    let config: ScoringConfig = serde_json::from_str(json_str)?;
    config.validate()?;
    Ok(config)
}

/// Check every box of every record. Prediction order is left to the scorer.
fn validate_records(records: &[ImageRecord], format: BoxFormat) -> Result<()> {
    for record in records {
        for gt in &record.gt_boxes {
            gt.validate(format)?;
        }
        for pred in &record.predictions {
            pred.bbox.validate(format)?;
        }
    }
    Ok(())
}
