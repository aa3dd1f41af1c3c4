//! Localized label bundles for the dialogs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Language used when a requested one has no bundle.
pub const FALLBACK_LANGUAGE: &str = "en";

/// Labels for one dialog.
///
/// `h1`, `okButton` and `cancelButton` are required. The form labels fall back
/// to English when missing; `p` and `checkbox` suppress their element instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogStrings {
    pub h1: String,

    /// Result dialogs historically named this key `button`.
    #[serde(alias = "button")]
    pub ok_button: String,

    pub cancel_button: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename_label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename_placeholder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendition_type_label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_scale_label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overwrite_file_label: Option<String>,

    /// Label of the "don't show again" toggle. No label, no toggle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkbox: Option<String>,
}

impl DialogStrings {
    /// Create a bundle with only the required keys set.
    pub fn new(
        h1: impl Into<String>,
        ok_button: impl Into<String>,
        cancel_button: impl Into<String>,
    ) -> Self {
        Self {
            h1: h1.into(),
            ok_button: ok_button.into(),
            cancel_button: cancel_button.into(),
            p: None,
            filename_label: None,
            filename_placeholder: None,
            rendition_type_label: None,
            render_scale_label: None,
            overwrite_file_label: None,
            checkbox: None,
        }
    }

    pub fn with_paragraph(mut self, p: impl Into<String>) -> Self {
        self.p = Some(p.into());
        self
    }

    pub fn with_checkbox(mut self, label: impl Into<String>) -> Self {
        self.checkbox = Some(label.into());
        self
    }

    pub fn filename_label(&self) -> &str {
        self.filename_label.as_deref().unwrap_or("File name")
    }

    pub fn filename_placeholder(&self) -> &str {
        self.filename_placeholder
            .as_deref()
            .unwrap_or("Enter a file name")
    }

    pub fn rendition_type_label(&self) -> &str {
        self.rendition_type_label
            .as_deref()
            .unwrap_or("Image type to render")
    }

    pub fn render_scale_label(&self) -> &str {
        self.render_scale_label.as_deref().unwrap_or("Render scale")
    }

    pub fn overwrite_file_label(&self) -> &str {
        self.overwrite_file_label
            .as_deref()
            .unwrap_or("Overwrite existing file")
    }
}

/// Label bundles keyed by language code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringTable {
    bundles: HashMap<String, DialogStrings>,
}

impl StringTable {
    /// Parse a table from JSON (`{"en": {...}, "de": {...}}`).
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Look up the bundle for a language code.
    ///
    /// Tries the exact code, then its primary subtag (`de-AT` -> `de`), then
    /// [`FALLBACK_LANGUAGE`].
    pub fn for_language(&self, code: &str) -> Option<&DialogStrings> {
        let primary = code.split(['-', '_']).next().unwrap_or(code);

        self.bundles
            .get(code)
            .or_else(|| self.bundles.get(primary))
            .or_else(|| self.bundles.get(FALLBACK_LANGUAGE))
    }

    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.bundles.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_keys_only() {
        let strings: DialogStrings = serde_json::from_str(
            r#"{"h1": "Export", "okButton": "Render", "cancelButton": "Cancel"}"#,
        )
        .unwrap();

        assert_eq!(strings.h1, "Export");
        assert_eq!(strings.filename_label(), "File name");
        assert_eq!(strings.render_scale_label(), "Render scale");
        assert!(strings.checkbox.is_none());
        assert!(strings.p.is_none());
    }

    #[test]
    fn test_missing_required_key_is_rejected() {
        let result = serde_json::from_str::<DialogStrings>(r#"{"h1": "Export"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_button_alias() {
        let strings: DialogStrings = serde_json::from_str(
            r#"{"h1": "Done", "p": "Saved.", "button": "OK", "cancelButton": "Close"}"#,
        )
        .unwrap();
        assert_eq!(strings.ok_button, "OK");
        assert_eq!(strings.p.as_deref(), Some("Saved."));
    }

    #[test]
    fn test_custom_labels_override_defaults() {
        let mut strings = DialogStrings::new("Exportieren", "OK", "Abbrechen");
        strings.filename_label = Some("Dateiname".to_string());
        assert_eq!(strings.filename_label(), "Dateiname");
        assert_eq!(strings.overwrite_file_label(), "Overwrite existing file");
    }

    #[test]
    fn test_language_fallback() {
        let table = StringTable::from_json(
            r#"{
                "en": {"h1": "Export", "okButton": "OK", "cancelButton": "Cancel"},
                "de": {"h1": "Exportieren", "okButton": "OK", "cancelButton": "Abbrechen"}
            }"#,
        )
        .unwrap();

        assert_eq!(table.for_language("de").unwrap().h1, "Exportieren");
        assert_eq!(table.for_language("de-AT").unwrap().h1, "Exportieren");
        assert_eq!(table.for_language("fr").unwrap().h1, "Export");
        assert_eq!(table.languages(), vec!["de", "en"]);
    }

    #[test]
    fn test_empty_table_has_no_bundle() {
        let table = StringTable::default();
        assert!(table.for_language("en").is_none());
    }
}
