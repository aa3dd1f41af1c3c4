//! Catalog of output image types.
//!
//! The catalog is fixed for the lifetime of the process. Its order matters:
//! selectors are positioned by index and index 0 is the fallback.

use thiserror::Error;

/// Image types offered when no custom catalog is configured.
pub const DEFAULT_IMAGE_TYPES: &[&str] = &["png", "jpg", "svg", "pdf"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Image type catalog must contain at least one type")]
    Empty,
}

/// Ordered, non-empty list of format identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTypeCatalog {
    types: Vec<String>,
}

impl Default for ImageTypeCatalog {
    fn default() -> Self {
        Self {
            types: DEFAULT_IMAGE_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl ImageTypeCatalog {
    /// Build a catalog from identifiers, keeping their order.
    ///
    /// Duplicates are dropped (first occurrence wins).
    pub fn new<I, S>(types: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for id in types {
            let id = id.into();
            if !unique.contains(&id) {
                unique.push(id);
            }
        }

        if unique.is_empty() {
            return Err(CatalogError::Empty);
        }

        Ok(Self { types: unique })
    }

    /// All identifiers in display order.
    pub fn list_types(&self) -> &[String] {
        &self.types
    }

    /// The first identifier, used as the default selection.
    pub fn first(&self) -> &str {
        // Non-empty by construction.
        &self.types[0]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.types.iter().position(|t| t == id)
    }

    /// Index to select for a stored identifier, falling back to 0.
    pub fn resolve_index(&self, id: &str) -> usize {
        self.index_of(id).unwrap_or(0)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.types.get(index).map(String::as_str)
    }

    /// Label shown in selectors (`"png"` -> `"PNG"`).
    pub fn display_name(id: &str) -> String {
        id.to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = ImageTypeCatalog::default();
        assert_eq!(catalog.list_types(), &["png", "jpg", "svg", "pdf"]);
        assert_eq!(catalog.first(), "png");
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_empty_catalog_is_rejected() {
        let result = ImageTypeCatalog::new(Vec::<String>::new());
        assert_eq!(result, Err(CatalogError::Empty));
    }

    #[test]
    fn test_duplicates_are_dropped() {
        let catalog = ImageTypeCatalog::new(["jpg", "png", "jpg"]).unwrap();
        assert_eq!(catalog.list_types(), &["jpg", "png"]);
    }

    #[test]
    fn test_index_lookup() {
        let catalog = ImageTypeCatalog::new(["png", "jpg", "svg"]).unwrap();
        assert_eq!(catalog.index_of("svg"), Some(2));
        assert_eq!(catalog.index_of("tiff"), None);
        assert_eq!(catalog.resolve_index("jpg"), 1);
        assert_eq!(catalog.resolve_index("tiff"), 0);
        assert_eq!(catalog.get(1), Some("jpg"));
        assert_eq!(catalog.get(3), None);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(ImageTypeCatalog::display_name("svg"), "SVG");
    }
}
