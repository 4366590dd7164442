use std::path::Path;

use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::color::SetColors;
use crate::data::model::Record;
use crate::data::projection::hover_entries;
use crate::state::AppState;
use crate::ui::{empty_hint, image_source, thumbnail};

/// Enlargement of the hovered image relative to the thumbnail.
const ZOOM: f32 = 2.2;

// ---------------------------------------------------------------------------
// Grid view (central panel)
// ---------------------------------------------------------------------------

/// Render the filtered records as image tiles with hover label popovers.
pub fn grid_view(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        empty_hint(ui);
        return;
    };

    let records = state.visible_records();
    if records.is_empty() {
        ui.label("No images match the current filters.");
        return;
    }

    let thumb = state.config.thumbnail_px;
    let n_cols = state.config.grid_columns.max(1);
    let base_dir = state.opened_path().and_then(|p| p.parent());

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("image_grid")
                .spacing([12.0, 12.0])
                .min_col_width(thumb)
                .show(ui, |ui: &mut Ui| {
                    for (i, rec) in records.iter().enumerate() {
                        tile(ui, rec, &dataset.all_sets, &state.set_colors, thumb, base_dir);
                        if (i + 1) % n_cols == 0 {
                            ui.end_row();
                        }
                    }
                });
        });
}

fn tile(
    ui: &mut Ui,
    rec: &Record,
    all_sets: &[String],
    colors: &SetColors,
    thumb: f32,
    base_dir: Option<&Path>,
) {
    let Some(response) = thumbnail(ui, rec.url.as_deref(), thumb, base_dir) else {
        return;
    };
    response.on_hover_ui(|ui: &mut Ui| {
        ui.horizontal_top(|ui: &mut Ui| {
            if let Some(url) = &rec.url {
                ui.add(
                    egui::Image::new(image_source(url, base_dir))
                        .max_size(egui::vec2(thumb * ZOOM, thumb * ZOOM)),
                );
            }
            ui.vertical(|ui: &mut Ui| label_menu(ui, rec, all_sets, colors));
        });
    });
}

/// Every set the record has values for, one line each.
fn label_menu(ui: &mut Ui, rec: &Record, all_sets: &[String], colors: &SetColors) {
    ui.set_max_width(320.0);
    ui.strong("Labels");

    let entries = hover_entries(rec, all_sets);
    if entries.is_empty() {
        ui.weak("No labels");
        return;
    }
    for (set, values) in entries {
        ui.horizontal_wrapped(|ui: &mut Ui| {
            ui.label(RichText::new(format!("{set}:")).strong().color(colors.color_for(set)));
            ui.label(values);
        });
    }
}
