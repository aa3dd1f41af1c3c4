//! Result notice shown after an export attempt.

use eframe::egui::{self, RichText, Rounding, Vec2};

use renderdesk_core::{CloseAction, HeadingStyle};

use crate::app::RenderdeskApp;
use crate::ui::colors;

/// Render the result notice if one is open.
pub fn render(app: &mut RenderdeskApp, ctx: &egui::Context) {
    let Some(dialog) = app.result_dialog.as_mut() else {
        return;
    };

    let view = dialog.view().clone();
    let mut action: Option<CloseAction> = None;

    egui::Window::new("result_dialog")
        .title_bar(false)
        .collapsible(false)
        .resizable(false)
        .default_width(380.0)
        .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
        .show(ctx, |ui| {
            let muted = colors::muted(ui.visuals());
            ui.spacing_mut().item_spacing = Vec2::new(8.0, 10.0);

            let heading = RichText::new(&view.heading).heading().strong();
            let heading = match view.heading_style {
                HeadingStyle::Error => heading.color(colors::ERROR),
                HeadingStyle::Normal => heading,
            };
            ui.label(heading);

            if let Some(p) = &view.paragraph {
                ui.label(p);
            }

            if let Some(path) = &view.output_path {
                let mut text = path.display().to_string();
                ui.add(
                    egui::TextEdit::singleline(&mut text)
                        .interactive(false)
                        .desired_width(f32::INFINITY)
                        .font(egui::TextStyle::Monospace),
                );
            }

            if let Some(label) = &view.checkbox_label {
                let mut checked = dialog.skip_checked();
                if ui
                    .checkbox(&mut checked, RichText::new(label).color(muted))
                    .changed()
                {
                    // The write is queued; closing doesn't wait for it.
                    let _ = dialog.set_skip_no_folder_message(checked);
                }
            }

            ui.add_space(4.0);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add_sized(
                        Vec2::new(90.0, 28.0),
                        egui::Button::new(RichText::new(&view.ok_label).strong())
                            .fill(colors::ACCENT)
                            .rounding(Rounding::same(8.0)),
                    )
                    .clicked()
                {
                    action = Some(CloseAction::Confirm);
                }
            });
        });

    if action.is_none() && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        action = Some(CloseAction::Dismiss);
    }

    if let Some(action) = action {
        app.close_result_dialog(action);
    }
}
