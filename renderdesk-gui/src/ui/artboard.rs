//! Artboard editor in the central panel.

use eframe::egui::{self, Rounding, Stroke, Vec2};

use crate::app::RenderdeskApp;
use crate::ui::colors;

/// Render the artboard properties and a live drawing of it.
pub fn render(app: &mut RenderdeskApp, ui: &mut egui::Ui) {
    let muted = colors::muted(ui.visuals());
    let editable = !app.export.is_busy();

    ui.add_enabled_ui(editable, |ui| {
        ui.horizontal(|ui| {
            ui.label("Name:");
            ui.add(egui::TextEdit::singleline(&mut app.artboard.name).desired_width(180.0));

            ui.separator();
            ui.label("Size:");
            ui.add(
                egui::DragValue::new(&mut app.artboard.width)
                    .range(1..=2000)
                    .suffix(" px"),
            );
            ui.label("x");
            ui.add(
                egui::DragValue::new(&mut app.artboard.height)
                    .range(1..=2000)
                    .suffix(" px"),
            );

            ui.separator();
            ui.label("Fill:");
            ui.color_edit_button_srgb(&mut app.artboard.color);
        });
    });

    ui.add_space(8.0);
    ui.separator();

    let available = ui.available_size();
    let (rect, _) = ui.allocate_exact_size(available, egui::Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, Rounding::ZERO, colors::canvas_bg(ui.visuals()));

    // Fit the artboard into the panel with some margin
    let board = Vec2::new(app.artboard.width as f32, app.artboard.height as f32);
    let fit = ((rect.width() - 48.0) / board.x)
        .min((rect.height() - 48.0) / board.y)
        .clamp(0.05, 1.0);
    let board_rect = egui::Rect::from_center_size(rect.center(), board * fit);

    let [r, g, b] = app.artboard.color;
    painter.rect_filled(board_rect, Rounding::same(2.0), egui::Color32::from_rgb(r, g, b));
    painter.rect_stroke(
        board_rect,
        Rounding::same(2.0),
        Stroke::new(1.0, colors::border(ui.visuals())),
    );
    painter.text(
        board_rect.left_top() - Vec2::new(0.0, 4.0),
        egui::Align2::LEFT_BOTTOM,
        &app.artboard.name,
        egui::FontId::proportional(12.0),
        muted,
    );

    if app.output_dir.is_none() {
        painter.text(
            rect.center_bottom() - Vec2::new(0.0, 12.0),
            egui::Align2::CENTER_BOTTOM,
            "Choose an output folder from the File menu before exporting",
            egui::FontId::proportional(11.0),
            muted,
        );
    }
}
