//! Export preferences.
//!
//! The record is persisted as a single JSON value. Field names are camelCase
//! on disk so records written by older builds keep loading.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::catalog::ImageTypeCatalog;

// =============================================================================
// Constants
// =============================================================================

/// Smallest allowed render scale.
pub const MIN_SCALE: u8 = 1;

/// Largest allowed render scale.
pub const MAX_SCALE: u8 = 5;

/// Rendition type used when nothing has been stored yet.
pub const DEFAULT_RENDITION_TYPE: &str = "png";

// =============================================================================
// Validation
// =============================================================================

/// A correction applied to a record before it is persisted.
///
/// These never block a confirm: the offending value is replaced and the
/// correction is reported so callers can log it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Scale {value} is outside 1..=5, clamped to {clamped}")]
    ScaleOutOfRange { value: i64, clamped: u8 },

    #[error("Rendition type '{value}' is not in the catalog, using '{fallback}'")]
    UnknownRenditionType { value: String, fallback: String },
}

/// Clamp a raw scale value into the allowed range.
///
/// Returns the clamped scale and, when the input was out of range, the
/// correction that was applied.
pub fn checked_scale(value: i64) -> (u8, Option<ValidationError>) {
    let clamped = value.clamp(i64::from(MIN_SCALE), i64::from(MAX_SCALE)) as u8;
    if i64::from(clamped) == value {
        (clamped, None)
    } else {
        (clamped, Some(ValidationError::ScaleOutOfRange { value, clamped }))
    }
}

// =============================================================================
// Preference Record
// =============================================================================

/// Persisted export settings.
///
/// Missing keys in stored JSON take the defaults below, so a loaded record is
/// always fully populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreferenceRecord {
    /// Output file name without extension. Empty means "unset".
    pub filename: String,

    /// Output format identifier, a member of the image type catalog.
    pub rendition_type: String,

    /// Render scale multiplier (1-5).
    #[serde(deserialize_with = "deserialize_scale")]
    pub scale: u8,

    /// Replace an existing output file instead of picking a new name.
    pub overwrite_file: bool,

    /// Suppress the "no output folder" notice. Only the result dialog writes this.
    pub skip_no_folder_message: bool,
}

impl Default for PreferenceRecord {
    fn default() -> Self {
        Self {
            filename: String::new(),
            rendition_type: DEFAULT_RENDITION_TYPE.to_string(),
            scale: MIN_SCALE,
            overwrite_file: false,
            skip_no_folder_message: false,
        }
    }
}

/// Read a stored scale without rejecting the whole record.
///
/// Numbers are clamped into range; anything else falls back to [`MIN_SCALE`].
fn deserialize_scale<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let value = match (raw.as_i64(), raw.as_f64()) {
        (Some(value), _) => value,
        (None, Some(value)) => value.round() as i64,
        (None, None) => {
            tracing::warn!(stored = %raw, "Stored scale is not a number, using default");
            return Ok(MIN_SCALE);
        }
    };

    let (scale, correction) = checked_scale(value);
    if let Some(correction) = correction {
        tracing::warn!(%correction, "Stored scale corrected");
    }
    Ok(scale)
}

impl PreferenceRecord {
    /// Whether a file name has been chosen.
    pub fn has_filename(&self) -> bool {
        !self.filename.trim().is_empty()
    }

    /// Clamp the scale and fall back to the catalog's first type if the
    /// stored one is no longer offered.
    ///
    /// Returns the corrections that were applied (empty when the record was
    /// already valid).
    pub fn validate(&mut self, catalog: &ImageTypeCatalog) -> Vec<ValidationError> {
        let mut corrections = Vec::new();

        let (scale, correction) = checked_scale(i64::from(self.scale));
        self.scale = scale;
        corrections.extend(correction);

        if !catalog.contains(&self.rendition_type) {
            let fallback = catalog.first().to_string();
            corrections.push(ValidationError::UnknownRenditionType {
                value: std::mem::replace(&mut self.rendition_type, fallback.clone()),
                fallback,
            });
        }

        corrections
    }
}

// =============================================================================
// Preview Settings
// =============================================================================

/// Fixed settings used for the low-cost preview render.
///
/// Only the non-form fields of the loaded record survive into the preview
/// settings; everything the user can edit is replaced by these values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewConfig {
    pub filename: String,
    pub scale: u8,
    pub overwrite_file: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            filename: "preview".to_string(),
            scale: MIN_SCALE,
            overwrite_file: true,
        }
    }
}

impl PreviewConfig {
    /// Build the settings record handed to the renderer for a preview.
    pub fn settings_for(
        &self,
        record: &PreferenceRecord,
        catalog: &ImageTypeCatalog,
    ) -> PreferenceRecord {
        PreferenceRecord {
            filename: self.filename.clone(),
            rendition_type: catalog.first().to_string(),
            scale: checked_scale(i64::from(self.scale)).0,
            overwrite_file: self.overwrite_file,
            ..record.clone()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ImageTypeCatalog {
        ImageTypeCatalog::new(["png", "jpg", "svg"]).unwrap()
    }

    #[test]
    fn test_default_record() {
        let record = PreferenceRecord::default();
        assert_eq!(record.filename, "");
        assert_eq!(record.rendition_type, "png");
        assert_eq!(record.scale, 1);
        assert!(!record.overwrite_file);
        assert!(!record.skip_no_folder_message);
        assert!(!record.has_filename());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let record: PreferenceRecord =
            serde_json::from_str(r#"{"filename": "cover", "scale": 3}"#).unwrap();
        assert_eq!(record.filename, "cover");
        assert_eq!(record.scale, 3);
        assert_eq!(record.rendition_type, DEFAULT_RENDITION_TYPE);
        assert!(!record.overwrite_file);
    }

    #[test]
    fn test_serializes_camel_case_keys() {
        let json = serde_json::to_value(PreferenceRecord::default()).unwrap();
        assert!(json.get("renditionType").is_some());
        assert!(json.get("overwriteFile").is_some());
        assert!(json.get("skipNoFolderMessage").is_some());
    }

    #[test]
    fn test_checked_scale() {
        assert_eq!(checked_scale(3), (3, None));
        assert_eq!(
            checked_scale(0),
            (1, Some(ValidationError::ScaleOutOfRange { value: 0, clamped: 1 }))
        );
        assert_eq!(
            checked_scale(42),
            (5, Some(ValidationError::ScaleOutOfRange { value: 42, clamped: 5 }))
        );
        assert_eq!(checked_scale(-7).0, 1);
    }

    #[test]
    fn test_validate_keeps_valid_record() {
        let mut record = PreferenceRecord {
            rendition_type: "svg".to_string(),
            scale: 5,
            ..Default::default()
        };
        assert!(record.validate(&catalog()).is_empty());
        assert_eq!(record.rendition_type, "svg");
        assert_eq!(record.scale, 5);
    }

    #[test]
    fn test_validate_corrects_scale_and_type() {
        let mut record = PreferenceRecord {
            rendition_type: "pdf".to_string(),
            scale: 9,
            ..Default::default()
        };
        let corrections = record.validate(&catalog());

        assert_eq!(record.scale, 5);
        assert_eq!(record.rendition_type, "png");
        assert_eq!(corrections.len(), 2);
        assert!(corrections.contains(&ValidationError::UnknownRenditionType {
            value: "pdf".to_string(),
            fallback: "png".to_string(),
        }));
    }

    #[test]
    fn test_preview_settings_keep_non_form_fields() {
        let record = PreferenceRecord {
            filename: "hero".to_string(),
            rendition_type: "svg".to_string(),
            scale: 4,
            overwrite_file: false,
            skip_no_folder_message: true,
        };
        let preview = PreviewConfig::default().settings_for(&record, &catalog());

        assert_eq!(preview.filename, "preview");
        assert_eq!(preview.rendition_type, "png");
        assert_eq!(preview.scale, 1);
        assert!(preview.overwrite_file);
        assert!(preview.skip_no_folder_message);
    }
}
