//! Editable form state for the export dialog.
//!
//! Each field is a small widget model the session owns directly; presenters
//! read and mutate them through the session instead of looking them up.

use crate::catalog::ImageTypeCatalog;
use crate::config::{
    checked_scale, DialogStrings, PreferenceRecord, ValidationError, MAX_SCALE, MIN_SCALE,
};

// =============================================================================
// Widgets
// =============================================================================

/// Single-line text input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    pub label: String,
    pub placeholder: String,
    value: String,
}

impl TextField {
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Mutable access for immediate-mode text editors.
    pub fn value_mut(&mut self) -> &mut String {
        &mut self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }
}

/// One entry in a [`SelectField`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Drop-down with exactly one selected entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectField {
    pub label: String,
    options: Vec<SelectOption>,
    selected_index: usize,
}

impl SelectField {
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn selected_value(&self) -> &str {
        self.options
            .get(self.selected_index)
            .map(|o| o.value.as_str())
            .unwrap_or_default()
    }

    pub fn selected_label(&self) -> &str {
        self.options
            .get(self.selected_index)
            .map(|o| o.label.as_str())
            .unwrap_or_default()
    }

    /// Select by position. Returns `false` (and keeps the selection) when the
    /// index is out of range.
    pub fn select_index(&mut self, index: usize) -> bool {
        if index < self.options.len() {
            self.selected_index = index;
            true
        } else {
            false
        }
    }

    /// Select by value. Returns `false` when no option has that value.
    pub fn select_value(&mut self, value: &str) -> bool {
        match self.options.iter().position(|o| o.value == value) {
            Some(index) => self.select_index(index),
            None => false,
        }
    }
}

/// Integer slider with an adjacent label showing its current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeField {
    pub label: String,
    pub min: i64,
    pub max: i64,
    pub step: i64,
    value: i64,
    display: String,
}

impl RangeField {
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Text of the value label next to the slider.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Store the raw value reported by the control and refresh the label.
    ///
    /// The value is kept as reported; clamping happens when the form is
    /// submitted.
    pub fn set_value(&mut self, value: i64) {
        self.value = value;
        self.display = value.to_string();
    }
}

/// Boolean toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxField {
    pub label: String,
    checked: bool,
}

impl CheckboxField {
    pub fn new(label: impl Into<String>, checked: bool) -> Self {
        Self {
            label: label.into(),
            checked,
        }
    }

    pub fn checked(&self) -> bool {
        self.checked
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }
}

// =============================================================================
// Form
// =============================================================================

/// Snapshot of the user-editable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    pub filename: String,
    pub rendition_type: String,
    pub scale: i64,
    pub overwrite_file: bool,
}

impl FormValues {
    /// Overlay the form values onto `base` and correct anything outside the
    /// allowed domain.
    ///
    /// Fields the form doesn't show (`skip_no_folder_message`) pass through
    /// from `base` unchanged.
    pub fn overlay(
        self,
        base: &PreferenceRecord,
        catalog: &ImageTypeCatalog,
    ) -> (PreferenceRecord, Vec<ValidationError>) {
        let (scale, scale_correction) = checked_scale(self.scale);

        let mut record = PreferenceRecord {
            filename: self.filename,
            rendition_type: self.rendition_type,
            scale,
            overwrite_file: self.overwrite_file,
            ..base.clone()
        };

        let mut corrections: Vec<ValidationError> = scale_correction.into_iter().collect();
        corrections.extend(record.validate(catalog));
        (record, corrections)
    }
}

/// The export dialog's form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigForm {
    pub filename: TextField,
    pub rendition_type: SelectField,
    pub scale: RangeField,
    pub overwrite_file: CheckboxField,
}

impl ConfigForm {
    /// Build the form pre-populated from `record`.
    ///
    /// The rendition selector is positioned by looking the stored type up in
    /// the catalog; an unknown type selects index 0.
    pub fn from_record(
        record: &PreferenceRecord,
        catalog: &ImageTypeCatalog,
        strings: &DialogStrings,
    ) -> Self {
        let options = catalog
            .list_types()
            .iter()
            .map(|id| SelectOption {
                value: id.clone(),
                label: ImageTypeCatalog::display_name(id),
            })
            .collect();

        let scale = i64::from(record.scale);

        Self {
            filename: TextField {
                label: strings.filename_label().to_string(),
                placeholder: strings.filename_placeholder().to_string(),
                value: record.filename.clone(),
            },
            rendition_type: SelectField {
                label: strings.rendition_type_label().to_string(),
                options,
                selected_index: catalog.resolve_index(&record.rendition_type),
            },
            scale: RangeField {
                label: strings.render_scale_label().to_string(),
                min: i64::from(MIN_SCALE),
                max: i64::from(MAX_SCALE),
                step: 1,
                value: scale,
                display: scale.to_string(),
            },
            overwrite_file: CheckboxField::new(
                strings.overwrite_file_label(),
                record.overwrite_file,
            ),
        }
    }

    /// Read the current value of every field.
    pub fn values(&self) -> FormValues {
        FormValues {
            filename: self.filename.value().to_string(),
            rendition_type: self.rendition_type.selected_value().to_string(),
            scale: self.scale.value(),
            overwrite_file: self.overwrite_file.checked(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ImageTypeCatalog {
        ImageTypeCatalog::new(["png", "jpg", "svg"]).unwrap()
    }

    fn strings() -> DialogStrings {
        DialogStrings::new("Export", "Render", "Cancel")
    }

    fn stored() -> PreferenceRecord {
        PreferenceRecord {
            filename: "hero".to_string(),
            rendition_type: "jpg".to_string(),
            scale: 2,
            overwrite_file: true,
            skip_no_folder_message: true,
        }
    }

    #[test]
    fn test_form_prepopulated_from_record() {
        let form = ConfigForm::from_record(&stored(), &catalog(), &strings());

        assert_eq!(form.filename.value(), "hero");
        assert_eq!(form.filename.label, "File name");
        assert_eq!(form.rendition_type.selected_index(), 1);
        assert_eq!(form.rendition_type.selected_label(), "JPG");
        assert_eq!(form.scale.value(), 2);
        assert_eq!(form.scale.display(), "2");
        assert_eq!((form.scale.min, form.scale.max), (1, 5));
        assert!(form.overwrite_file.checked());
    }

    #[test]
    fn test_unknown_type_selects_first_option() {
        let record = PreferenceRecord {
            rendition_type: "webp".to_string(),
            ..stored()
        };
        let form = ConfigForm::from_record(&record, &catalog(), &strings());

        assert_eq!(form.rendition_type.selected_index(), 0);
        assert_eq!(form.rendition_type.selected_value(), "png");
    }

    #[test]
    fn test_range_label_follows_value() {
        let mut form = ConfigForm::from_record(&stored(), &catalog(), &strings());

        form.scale.set_value(4);
        assert_eq!(form.scale.display(), "4");

        form.scale.set_value(1);
        assert_eq!(form.scale.display(), "1");
    }

    #[test]
    fn test_select_rejects_unknown_entries() {
        let mut form = ConfigForm::from_record(&stored(), &catalog(), &strings());

        assert!(!form.rendition_type.select_index(7));
        assert!(!form.rendition_type.select_value("gif"));
        assert_eq!(form.rendition_type.selected_value(), "jpg");

        assert!(form.rendition_type.select_value("svg"));
        assert_eq!(form.rendition_type.selected_index(), 2);
    }

    #[test]
    fn test_overlay_passes_through_hidden_fields() {
        let mut form = ConfigForm::from_record(&stored(), &catalog(), &strings());
        form.filename.set_value("icon");
        form.overwrite_file.set_checked(false);

        let (record, corrections) = form.values().overlay(&stored(), &catalog());

        assert!(corrections.is_empty());
        assert_eq!(record.filename, "icon");
        assert!(!record.overwrite_file);
        assert!(record.skip_no_folder_message);
    }

    #[test]
    fn test_overlay_clamps_scale() {
        let mut form = ConfigForm::from_record(&stored(), &catalog(), &strings());
        form.scale.set_value(11);

        let (record, corrections) = form.values().overlay(&stored(), &catalog());

        assert_eq!(record.scale, 5);
        assert_eq!(
            corrections,
            vec![ValidationError::ScaleOutOfRange { value: 11, clamped: 5 }]
        );
    }
}
