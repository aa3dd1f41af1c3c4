//! Status bar at the bottom of the window.

use eframe::egui::{self, RichText};

use crate::app::RenderdeskApp;
use crate::ui::colors;

/// Render the status bar.
pub fn render(app: &RenderdeskApp, ui: &mut egui::Ui) {
    let muted = colors::muted(ui.visuals());

    ui.horizontal(|ui| {
        if let Some((msg, _)) = &app.status_message {
            ui.label(RichText::new(msg).size(11.0).color(muted));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let folder = match &app.output_dir {
                Some(dir) => {
                    let path_str = dir.to_string_lossy();
                    let char_count = path_str.chars().count();
                    if char_count > 50 {
                        let tail: String = path_str.chars().skip(char_count - 47).collect();
                        format!("...{}", tail)
                    } else {
                        path_str.to_string()
                    }
                }
                None => "No output folder".to_string(),
            };
            ui.label(RichText::new(format!("📁 {}", folder)).size(11.0).color(muted));

            ui.separator();
            ui.label(
                RichText::new(format!(
                    "{} x {}",
                    app.artboard.width, app.artboard.height
                ))
                .size(11.0)
                .color(muted),
            );

            ui.separator();
            ui.label(RichText::new(app.strings.language()).size(11.0).color(muted));
        });
    });
}
