use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::projection::{PREVIEW_COLUMN, project_rows};
use crate::state::AppState;
use crate::ui::{empty_hint, thumbnail};

const HEADER_HEIGHT: f32 = 24.0;

// ---------------------------------------------------------------------------
// Table view (central panel)
// ---------------------------------------------------------------------------

/// Render the filtered records as a sortable table with thumbnails.
pub fn table_view(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = state.dataset.clone() else {
        empty_hint(ui);
        return;
    };

    let mut projection = project_rows(&state.visible_records(), &dataset.all_sets, state.show_url);
    if projection.rows.is_empty() {
        ui.label("No images match the current filters.");
        return;
    }
    if let Some(sort) = &state.table_sort {
        projection.sort_by(sort);
    }

    let thumb = state.config.thumbnail_px;
    let row_height = thumb + 8.0;
    let base_dir = state
        .opened_path()
        .and_then(|p| p.parent())
        .map(|p| p.to_path_buf());

    let mut table = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::exact(row_height));
    if projection.show_url {
        table = table.column(Column::initial(260.0).at_least(80.0).clip(true));
    }
    table = table.columns(Column::auto().at_least(60.0), dataset.all_sets.len());
    if projection.has_sign_error_column {
        table = table.column(Column::remainder().at_least(120.0));
    }

    let mut clicked: Option<String> = None;
    let sort = state.table_sort.clone();

    table
        .header(HEADER_HEIGHT, |mut header| {
            for name in &projection.columns {
                header.col(|ui: &mut Ui| {
                    if name == PREVIEW_COLUMN {
                        ui.strong(name);
                        return;
                    }
                    let arrow = match &sort {
                        Some(s) if s.column == *name && s.descending => " ⏷",
                        Some(s) if s.column == *name => " ⏶",
                        _ => "",
                    };
                    let mut text = RichText::new(format!("{name}{arrow}")).strong();
                    if dataset.labels_per_set.contains_key(name) {
                        text = text.color(state.set_colors.color_for(name));
                    }
                    if ui.button(text).clicked() {
                        clicked = Some(name.clone());
                    }
                });
            }
        })
        .body(|body| {
            body.rows(row_height, projection.rows.len(), |mut row| {
                let r = &projection.rows[row.index()];
                row.col(|ui: &mut Ui| {
                    thumbnail(ui, r.preview.as_deref(), thumb, base_dir.as_deref());
                });
                if let Some(url) = &r.url {
                    row.col(|ui: &mut Ui| {
                        if !url.is_empty() {
                            ui.hyperlink_to(url, url);
                        }
                    });
                }
                for value in &r.labels {
                    row.col(|ui: &mut Ui| {
                        ui.label(value);
                    });
                }
                if projection.has_sign_error_column {
                    row.col(|ui: &mut Ui| {
                        if let Some(err) = &r.sign_error {
                            ui.label(RichText::new(err).color(Color32::RED));
                        }
                    });
                }
            });
        });

    if let Some(column) = clicked {
        state.cycle_sort(&column);
    }
}
