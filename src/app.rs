use eframe::egui;

use crate::config::{CONFIG_KEY, ViewerConfig};
use crate::signing::LazyGcsSigner;
use crate::state::{AppState, VIEW_KEY, ViewMode};
use crate::ui::{grid, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DatasetLensApp {
    pub state: AppState,
}

impl DatasetLensApp {
    /// Restore config and view mode from storage and install the GCS signer.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = ViewerConfig::load(cc.storage);
        let view_param = cc.storage.and_then(|s| s.get_string(VIEW_KEY));
        let view_mode = ViewMode::from_param(view_param.as_deref());
        log::debug!("Starting in {} view with {config:?}", view_mode.as_param());

        Self {
            state: AppState::new(config, view_mode, Box::new(LazyGcsSigner::new())),
        }
    }
}

impl eframe::App for DatasetLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: view mode and filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: table or grid ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view_mode {
            ViewMode::Table => table::table_view(ui, &mut self.state),
            ViewMode::Grid => grid::grid_view(ui, &self.state),
        });
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        storage.set_string(VIEW_KEY, self.state.view_mode.as_param().to_string());
        eframe::set_value(storage, CONFIG_KEY, &self.state.config);
    }
}
