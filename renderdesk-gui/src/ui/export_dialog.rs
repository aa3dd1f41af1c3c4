//! Export settings dialog.

use eframe::egui::{self, RichText, Rounding, Vec2};

use renderdesk_core::{CloseAction, Preview};

use crate::app::{ExportState, RenderdeskApp};
use crate::ui::colors;

/// Edge length of the preview box.
const PREVIEW_BOX: f32 = 200.0;

/// Render the export dialog, or the "saving" notice while it submits.
pub fn render(app: &mut RenderdeskApp, ctx: &egui::Context) {
    if matches!(app.export, ExportState::Submitting) {
        render_submitting(ctx);
        return;
    }

    let ExportState::Open(session) = &mut app.export else {
        return;
    };

    let strings = session.strings().clone();
    let mut action: Option<CloseAction> = None;

    egui::Window::new(strings.h1.as_str())
        .id(egui::Id::new("export_dialog"))
        .collapsible(false)
        .resizable(false)
        .default_width(460.0)
        .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
        .show(ctx, |ui| {
            let muted = colors::muted(ui.visuals());
            ui.spacing_mut().item_spacing = Vec2::new(8.0, 10.0);

            if let Some(p) = &strings.p {
                ui.label(RichText::new(p).color(muted));
            }

            ui.horizontal_top(|ui| {
                // Preview
                let (rect, _) =
                    ui.allocate_exact_size(Vec2::splat(PREVIEW_BOX), egui::Sense::hover());
                ui.painter()
                    .rect_filled(rect, Rounding::same(6.0), colors::canvas_bg(ui.visuals()));
                match (&app.preview_texture, session.preview()) {
                    (Some(texture), _) => {
                        let size = texture.size_vec2();
                        let fit = (PREVIEW_BOX / size.x).min(PREVIEW_BOX / size.y).min(1.0);
                        let image_rect = egui::Rect::from_center_size(rect.center(), size * fit);
                        ui.painter().image(
                            texture.id(),
                            image_rect,
                            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                            egui::Color32::WHITE,
                        );
                    }
                    (None, Preview::Unavailable(reason)) => {
                        ui.painter().text(
                            rect.center(),
                            egui::Align2::CENTER_CENTER,
                            format!("Preview unavailable\n{}", reason),
                            egui::FontId::proportional(11.0),
                            muted,
                        );
                    }
                    (None, Preview::Ready(_)) => {
                        ui.painter().text(
                            rect.center(),
                            egui::Align2::CENTER_CENTER,
                            "Preview unavailable",
                            egui::FontId::proportional(11.0),
                            muted,
                        );
                    }
                }

                // Form
                ui.vertical(|ui| {
                    let form = session.form_mut();

                    ui.label(&form.filename.label);
                    let placeholder = form.filename.placeholder.clone();
                    let response = ui.add(
                        egui::TextEdit::singleline(form.filename.value_mut())
                            .hint_text(placeholder)
                            .desired_width(220.0),
                    );
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        action = Some(CloseAction::Confirm);
                    }

                    ui.label(&form.rendition_type.label);
                    let options = form.rendition_type.options().to_vec();
                    let selected = form.rendition_type.selected_index();
                    let mut chosen: Option<usize> = None;
                    egui::ComboBox::from_id_salt("rendition_type")
                        .selected_text(form.rendition_type.selected_label())
                        .width(220.0)
                        .show_ui(ui, |ui| {
                            for (index, option) in options.iter().enumerate() {
                                if ui.selectable_label(index == selected, &option.label).clicked() {
                                    chosen = Some(index);
                                }
                            }
                        });
                    // Apply selection after ComboBox closes (avoids borrow conflict)
                    if let Some(index) = chosen {
                        form.rendition_type.select_index(index);
                    }

                    ui.horizontal(|ui| {
                        ui.label(&form.scale.label);
                        ui.label(RichText::new(form.scale.display()).strong());
                    });
                    let mut scale = form.scale.value();
                    if ui
                        .add(
                            egui::Slider::new(&mut scale, form.scale.min..=form.scale.max)
                                .step_by(form.scale.step as f64)
                                .show_value(false),
                        )
                        .changed()
                    {
                        form.scale.set_value(scale);
                    }

                    let mut overwrite = form.overwrite_file.checked();
                    if ui
                        .checkbox(&mut overwrite, form.overwrite_file.label.as_str())
                        .changed()
                    {
                        form.overwrite_file.set_checked(overwrite);
                    }
                });
            });

            ui.add_space(8.0);
            ui.separator();

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add_sized(
                        Vec2::new(100.0, 30.0),
                        egui::Button::new(RichText::new(&strings.ok_button).strong())
                            .fill(colors::ACCENT)
                            .rounding(Rounding::same(8.0)),
                    )
                    .clicked()
                {
                    action = Some(CloseAction::Confirm);
                }

                if ui
                    .add_sized(
                        Vec2::new(100.0, 30.0),
                        egui::Button::new(&strings.cancel_button).rounding(Rounding::same(8.0)),
                    )
                    .clicked()
                {
                    action = Some(CloseAction::Cancel);
                }
            });
        });

    if action.is_none() && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        action = Some(CloseAction::Dismiss);
    }

    if let Some(action) = action {
        app.close_export_dialog(action);
    }
}

/// Shown while the settings save finishes. Offers no way to close.
fn render_submitting(ctx: &egui::Context) {
    egui::Window::new("Saving export settings")
        .id(egui::Id::new("export_dialog"))
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Saving export settings...");
            });
        });
}
