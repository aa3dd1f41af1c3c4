//! Top menu bar.

use eframe::egui::{self, RichText};

use crate::app::{ExportState, RenderdeskApp};
use crate::ui::colors;

/// Render the top menu bar.
pub fn render(app: &mut RenderdeskApp, ui: &mut egui::Ui, ctx: &egui::Context) {
    egui::menu::bar(ui, |ui| {
        ui.label(RichText::new("Renderdesk").strong().size(15.0));
        ui.separator();

        ui.menu_button("File", |ui| {
            if ui.button("Choose Output Folder...").clicked() {
                app.open_folder_dialog();
                ui.close_menu();
            }

            if ui
                .add_enabled(!app.export.is_busy(), egui::Button::new("Export..."))
                .clicked()
            {
                app.start_export();
                ui.close_menu();
            }

            ui.separator();

            if ui
                .add_enabled(
                    !app.export.is_busy(),
                    egui::Button::new("Reset Export Preferences"),
                )
                .clicked()
            {
                app.reset_preferences();
                ui.close_menu();
            }

            ui.separator();

            if ui.button("Quit").clicked() {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let busy = match app.export {
                ExportState::Opening => Some("Preparing preview..."),
                ExportState::Submitting => Some("Saving settings..."),
                ExportState::Rendering => Some("Exporting..."),
                ExportState::Idle | ExportState::Open(_) => None,
            };
            if let Some(label) = busy {
                ui.label(RichText::new(label).color(colors::ACCENT).size(12.0));
                ui.spinner();
            }
        });
    });
}
