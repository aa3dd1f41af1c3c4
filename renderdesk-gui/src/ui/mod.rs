//! UI components for Renderdesk.

pub mod artboard;
pub mod export_dialog;
pub mod menu;
pub mod result_dialog;
pub mod status;

// Theme-aware colors for the UI
pub mod colors {
    use eframe::egui::{Color32, Visuals};

    /// Accent blue for primary buttons
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);

    /// Error red
    pub const ERROR: Color32 = Color32::from_rgb(239, 68, 68);

    /// Get muted text color based on theme
    pub fn muted(visuals: &Visuals) -> Color32 {
        if visuals.dark_mode {
            Color32::from_rgb(156, 163, 175)
        } else {
            Color32::from_rgb(100, 100, 110)
        }
    }

    /// Background behind the artboard and the preview thumbnail
    pub fn canvas_bg(visuals: &Visuals) -> Color32 {
        if visuals.dark_mode {
            Color32::from_rgb(30, 30, 35)
        } else {
            Color32::from_rgb(235, 235, 240)
        }
    }

    /// Get border color based on theme
    pub fn border(visuals: &Visuals) -> Color32 {
        if visuals.dark_mode {
            Color32::from_rgb(70, 70, 75)
        } else {
            Color32::from_rgb(200, 200, 210)
        }
    }
}
