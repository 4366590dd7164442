use std::path::PathBuf;

use anyhow::Context;
use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, Ui};

use crate::config::{MAX_EXPIRY_HOURS, MIN_EXPIRY_HOURS};
use crate::data::projection::summary_line;
use crate::state::{AppState, ViewMode};

// ---------------------------------------------------------------------------
// Left side panel – view and filter widgets
// ---------------------------------------------------------------------------

/// Render the left panel: view mode, URL expiry and filters.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("View mode");
    ui.horizontal(|ui: &mut Ui| {
        for mode in [ViewMode::Table, ViewMode::Grid] {
            ui.radio_value(&mut state.view_mode, mode, mode.label());
        }
    });
    ui.add_space(4.0);

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Signed URL expiry (h)");
        let response = ui.add(
            DragValue::new(&mut state.expiry_input).range(MIN_EXPIRY_HOURS..=MAX_EXPIRY_HOURS),
        );
        let editing = response.dragged() || response.has_focus();
        if !editing && state.expiry_input != state.config.signed_url_expiry_hours {
            state.set_expiry_hours(state.expiry_input);
        }
    });
    ui.separator();

    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Required sets ----
            ui.strong("Required annotation set(s):")
                .on_hover_text("Images must contain ALL selected sets.");
            if dataset.all_sets.is_empty() {
                ui.weak("This file has no annotation columns.");
            }
            for set in &dataset.all_sets {
                let mut checked = state.filters.is_set_selected(set);
                let text = RichText::new(set).color(state.set_colors.color_for(set));
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_set(set);
                }
            }

            // ---- Required values per selected set (collapsible) ----
            let selected_sets = state.filters.sets_filter.clone();
            for set in &selected_sets {
                let values = dataset.labels_for(set);
                let n_selected = state
                    .filters
                    .selected_labels_per_set
                    .get(set)
                    .map_or(0, Vec::len);
                let header_text = format!("Required values in '{set}' (AND)  ({n_selected}/{})", values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(("values", set))
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        for value in values {
                            let mut checked = state.filters.is_value_selected(set, value);
                            if ui.checkbox(&mut checked, value).changed() {
                                state.toggle_value(set, value);
                            }
                        }
                    });
            }

            if !state.filters.is_empty() {
                ui.separator();
                if ui.small_button("Clear filters").clicked() {
                    state.clear_filters();
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open CSV…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(summary_line(
                state.visible_indices.len(),
                ds.len(),
                ds.all_sets.len(),
            ));
            ui.separator();

            if ds.is_empty() {
                ui.weak("The file has no data rows");
                ui.separator();
            }

            if state.view_mode == ViewMode::Table {
                ui.checkbox(&mut state.show_url, "Show URL column");
                ui.separator();
            }

            let failures = ds.signing_failures();
            if failures > 0 {
                ui.label(
                    RichText::new(format!("{failures} image(s) could not be signed"))
                        .color(Color32::ORANGE),
                );
            }
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open annotated image dataset")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = open_path(state, path) {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

/// Read and load the CSV at `path` into `state`.
pub fn open_path(state: &mut AppState, path: PathBuf) -> anyhow::Result<()> {
    let bytes = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
    let name = path.display().to_string();
    state
        .open_bytes(path, bytes)
        .with_context(|| format!("loading {name}"))?;
    Ok(())
}
