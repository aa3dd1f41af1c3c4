//! Placeholder artboard renderer.
//!
//! Draws the artboard as a filled frame at the requested scale. Previews go
//! to a scratch directory and are capped in size; final renders go to the
//! chosen output folder. PDF output is not supported.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::{ImageFormat, Rgb, RgbImage};
use renderdesk_core::{PreferenceRecord, RenderError, RenderOptions, Renderer, Rendition};

/// Longest edge of a preview render.
const PREVIEW_MAX_EDGE: u32 = 256;

/// Width of the darker frame drawn around the artboard, before scaling.
const FRAME_WIDTH: u32 = 4;

/// The thing being exported.
#[derive(Debug, Clone, PartialEq)]
pub struct Artboard {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub color: [u8; 3],
}

impl Default for Artboard {
    fn default() -> Self {
        Self {
            name: "Artboard 1".to_string(),
            width: 320,
            height: 200,
            color: [59, 130, 246],
        }
    }
}

/// Selection handed to the renderer.
#[derive(Debug, Clone)]
pub struct ExportSelection {
    pub artboard: Artboard,
    pub output_dir: Option<PathBuf>,
}

pub struct ArtboardRenderer {
    preview_dir: PathBuf,
}

impl ArtboardRenderer {
    pub fn new(preview_dir: PathBuf) -> Self {
        Self { preview_dir }
    }

    /// Renderer writing previews below the system temp directory.
    pub fn with_temp_previews() -> Self {
        Self::new(std::env::temp_dir().join("renderdesk-previews"))
    }
}

#[async_trait]
impl Renderer for ArtboardRenderer {
    type Selection = ExportSelection;

    async fn render(
        &self,
        selection: &ExportSelection,
        settings: &PreferenceRecord,
        options: RenderOptions,
    ) -> Result<Vec<Rendition>, RenderError> {
        let artboard = &selection.artboard;
        if artboard.width == 0 || artboard.height == 0 {
            return Err(RenderError::EmptySelection);
        }

        let extension = match settings.rendition_type.as_str() {
            "png" | "jpg" | "svg" => settings.rendition_type.clone(),
            other => return Err(RenderError::UnsupportedType(other.to_string())),
        };

        let dir = if options.preview {
            self.preview_dir.clone()
        } else {
            selection
                .output_dir
                .clone()
                .ok_or_else(|| RenderError::Failed("No output folder selected".to_string()))?
        };

        let stem = if settings.has_filename() {
            sanitize_file_stem(&settings.filename)
        } else {
            sanitize_file_stem(&artboard.name)
        };

        let (width, height) = scaled_size(artboard, settings.scale, options.preview);
        let artboard = artboard.clone();
        let overwrite = settings.overwrite_file;

        let path = tokio::task::spawn_blocking(move || -> Result<PathBuf, RenderError> {
            std::fs::create_dir_all(&dir)?;
            let path = resolve_output_path(&dir, &stem, &extension, overwrite);
            write_artboard(&artboard, width, height, &extension, &path)?;
            Ok(path)
        })
        .await
        .map_err(|e| RenderError::Failed(e.to_string()))??;

        tracing::debug!(path = %path.display(), preview = options.preview, "Rendered artboard");
        Ok(vec![Rendition::new(path)])
    }
}

/// Output size for a render. Previews are shrunk to fit [`PREVIEW_MAX_EDGE`].
fn scaled_size(artboard: &Artboard, scale: u8, preview: bool) -> (u32, u32) {
    let scale = u32::from(scale.max(1));
    let (w, h) = (artboard.width * scale, artboard.height * scale);
    if !preview || w.max(h) <= PREVIEW_MAX_EDGE {
        return (w, h);
    }
    let ratio = f64::from(PREVIEW_MAX_EDGE) / f64::from(w.max(h));
    (
        ((f64::from(w) * ratio).round() as u32).max(1),
        ((f64::from(h) * ratio).round() as u32).max(1),
    )
}

/// Replace characters that can't appear in file names.
pub fn sanitize_file_stem(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();

    if cleaned.is_empty() {
        "export".to_string()
    } else {
        cleaned
    }
}

/// Pick the output path. Without `overwrite`, an existing file gets a
/// numbered sibling (`cover (1).png`).
pub fn resolve_output_path(dir: &Path, stem: &str, extension: &str, overwrite: bool) -> PathBuf {
    let candidate = dir.join(format!("{stem}.{extension}"));
    if overwrite || !candidate.exists() {
        return candidate;
    }

    (1..)
        .map(|n| dir.join(format!("{stem} ({n}).{extension}")))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

fn write_artboard(
    artboard: &Artboard,
    width: u32,
    height: u32,
    extension: &str,
    path: &Path,
) -> Result<(), RenderError> {
    let [r, g, b] = artboard.color;

    if extension == "svg" {
        let svg = format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
                r##"<rect width="100%" height="100%" fill="#{:02x}{:02x}{:02x}"/></svg>"##,
            ),
            width, height, r, g, b
        );
        std::fs::write(path, svg)?;
        return Ok(());
    }

    let fill = Rgb([r, g, b]);
    let frame = Rgb([r / 2, g / 2, b / 2]);
    let frame_width = (FRAME_WIDTH * width / artboard.width.max(1)).max(1);
    let image = RgbImage::from_fn(width, height, |x, y| {
        let on_frame = x < frame_width
            || y < frame_width
            || x >= width.saturating_sub(frame_width)
            || y >= height.saturating_sub(frame_width);
        if on_frame {
            frame
        } else {
            fill
        }
    });

    let format = if extension == "jpg" {
        ImageFormat::Jpeg
    } else {
        ImageFormat::Png
    };
    image
        .save_with_format(path, format)
        .map_err(|e| RenderError::Failed(e.to_string()))
}
