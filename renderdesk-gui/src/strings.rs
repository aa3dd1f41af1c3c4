//! Bundled dialog labels.

use anyhow::{Context, Result};
use serde::Deserialize;

use renderdesk_core::{DialogStrings, StringTable};

const BUNDLED: &str = include_str!("../assets/strings.json");

/// Label tables for every dialog the app shows.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStrings {
    export: StringTable,
    no_folder: StringTable,
    export_complete: StringTable,
    export_failed: StringTable,
    #[serde(skip)]
    language: String,
}

impl AppStrings {
    /// Load the bundled tables and pick the language from the environment.
    pub fn bundled() -> Result<Self> {
        let mut strings: Self =
            serde_json::from_str(BUNDLED).context("Bundled strings are malformed")?;
        strings.language = system_language();
        tracing::debug!(language = %strings.language, "Loaded dialog strings");
        Ok(strings)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn export(&self) -> DialogStrings {
        pick(&self.export, &self.language)
    }

    pub fn no_folder(&self) -> DialogStrings {
        pick(&self.no_folder, &self.language)
    }

    pub fn export_complete(&self) -> DialogStrings {
        pick(&self.export_complete, &self.language)
    }

    pub fn export_failed(&self) -> DialogStrings {
        pick(&self.export_failed, &self.language)
    }
}

fn pick(table: &StringTable, language: &str) -> DialogStrings {
    table
        .for_language(language)
        .cloned()
        .unwrap_or_else(|| DialogStrings::new("Renderdesk", "OK", "Cancel"))
}

/// Language code from `LC_ALL`, `LC_MESSAGES` or `LANG` (`de_DE.UTF-8` -> `de_DE`).
fn system_language() -> String {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty() && value != "C" && value != "POSIX")
        .map(|value| language_code(&value))
        .unwrap_or_else(|| renderdesk_core::config::FALLBACK_LANGUAGE.to_string())
}

fn language_code(locale: &str) -> String {
    locale
        .split(['.', '@'])
        .next()
        .unwrap_or(locale)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_strings_parse() {
        let strings: AppStrings = serde_json::from_str(BUNDLED).unwrap();
        for table in [
            &strings.export,
            &strings.no_folder,
            &strings.export_complete,
            &strings.export_failed,
        ] {
            assert_eq!(table.languages(), vec!["de", "en"]);
        }
    }

    #[test]
    fn test_only_no_folder_notice_has_checkbox() {
        let strings: AppStrings = serde_json::from_str(BUNDLED).unwrap();
        assert!(pick(&strings.no_folder, "en").checkbox.is_some());
        assert!(pick(&strings.export_complete, "en").checkbox.is_none());
        assert!(pick(&strings.export_failed, "en").checkbox.is_none());
    }

    #[test]
    fn test_region_falls_back_to_language() {
        let strings: AppStrings = serde_json::from_str(BUNDLED).unwrap();
        assert_eq!(pick(&strings.export, "de_AT").h1, "Exporteinstellungen");
        assert_eq!(pick(&strings.export, "fr_FR").h1, "Export Settings");
    }

    #[test]
    fn test_language_code() {
        assert_eq!(language_code("de_DE.UTF-8"), "de_DE");
        assert_eq!(language_code("en_US"), "en_US");
        assert_eq!(language_code("sr_RS@latin"), "sr_RS");
    }
}
