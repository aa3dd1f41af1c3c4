//! Renderer contract.
//!
//! The core never produces final output itself. It only asks a [`Renderer`]
//! for a low-cost preview while the export dialog opens; the caller uses the
//! committed preferences to run the real render.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::PreferenceRecord;

/// Options passed alongside the settings record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Low-fidelity render used only to populate the dialog preview.
    pub preview: bool,
}

impl RenderOptions {
    pub fn preview() -> Self {
        Self { preview: true }
    }

    pub fn final_output() -> Self {
        Self { preview: false }
    }
}

/// Location of a produced file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputFile {
    pub url: String,
    pub native_path: PathBuf,
}

impl OutputFile {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self {
            url: format!("file://{}", path.display()),
            native_path: path.to_path_buf(),
        }
    }
}

/// One artifact produced by a render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rendition {
    pub output_file: OutputFile,
}

impl Rendition {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            output_file: OutputFile::from_path(path),
        }
    }

    pub fn native_path(&self) -> &Path {
        &self.output_file.native_path
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Nothing selected to render")]
    EmptySelection,

    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render failed: {0}")]
    Failed(String),
}

/// Produces output artifacts for a selection.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Whatever the host considers "the thing being exported".
    type Selection: Send + Sync;

    async fn render(
        &self,
        selection: &Self::Selection,
        settings: &PreferenceRecord,
        options: RenderOptions,
    ) -> Result<Vec<Rendition>, RenderError>;
}

/// Result of the preview request made while the export dialog opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    Ready(Rendition),
    /// The dialog is still usable, just without a preview image.
    Unavailable(String),
}

impl Preview {
    pub fn rendition(&self) -> Option<&Rendition> {
        match self {
            Self::Ready(rendition) => Some(rendition),
            Self::Unavailable(_) => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

impl From<Result<Vec<Rendition>, RenderError>> for Preview {
    fn from(result: Result<Vec<Rendition>, RenderError>) -> Self {
        match result {
            Ok(renditions) => renditions
                .into_iter()
                .next()
                .map(Preview::Ready)
                .unwrap_or_else(|| Preview::Unavailable("Renderer produced no output".to_string())),
            Err(e) => Preview::Unavailable(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_file_from_path() {
        let file = OutputFile::from_path("/tmp/out/cover.png");
        assert_eq!(file.url, "file:///tmp/out/cover.png");
        assert_eq!(file.native_path, PathBuf::from("/tmp/out/cover.png"));
    }

    #[test]
    fn test_rendition_serializes_like_host_results() {
        let json = serde_json::to_value(Rendition::new("/tmp/a.png")).unwrap();
        assert_eq!(json["outputFile"]["nativePath"], "/tmp/a.png");
    }

    #[test]
    fn test_preview_from_results() {
        let ready = Preview::from(Ok(vec![Rendition::new("/tmp/p.png")]));
        assert!(ready.is_available());
        assert_eq!(ready.rendition().unwrap().native_path(), Path::new("/tmp/p.png"));

        let empty = Preview::from(Ok(Vec::new()));
        assert!(!empty.is_available());

        let failed = Preview::from(Err(RenderError::EmptySelection));
        assert_eq!(
            failed,
            Preview::Unavailable("Nothing selected to render".to_string())
        );
    }
}
