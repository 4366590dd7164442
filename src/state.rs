use std::path::PathBuf;
use std::sync::Arc;

use crate::color::SetColors;
use crate::config::ViewerConfig;
use crate::data::filter::{FilterState, filtered_indices};
use crate::data::loader::{DatasetLoader, LoadError};
use crate::data::model::{LoadedDataset, Record};
use crate::data::projection::TableSort;
use crate::signing::UrlSigner;

/// Storage key for the persisted view mode.
pub const VIEW_KEY: &str = "view";

// ---------------------------------------------------------------------------
// View mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Table,
    Grid,
}

impl ViewMode {
    /// Read the persisted parameter; anything but `grid` means table.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some(p) if p.trim().eq_ignore_ascii_case("grid") => ViewMode::Grid,
            _ => ViewMode::Table,
        }
    }

    pub fn as_param(self) -> &'static str {
        match self {
            ViewMode::Table => "table",
            ViewMode::Grid => "grid",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Table => "Table",
            ViewMode::Grid => "Grid",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The currently opened file, kept so the expiry can be changed later.
struct OpenedFile {
    path: PathBuf,
    bytes: Vec<u8>,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ViewerConfig,

    /// Loaded dataset (None until user opens a file).
    pub dataset: Option<Arc<LoadedDataset>>,

    /// Required sets and values.
    pub filters: FilterState,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    pub view_mode: ViewMode,

    /// Whether the table shows the raw URL column.
    pub show_url: bool,

    /// Active table sort, by column name.
    pub table_sort: Option<TableSort>,

    /// Expiry being edited in the side panel, applied once editing ends.
    pub expiry_input: u32,

    pub set_colors: SetColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    loader: DatasetLoader,
    opened: Option<OpenedFile>,
}

impl AppState {
    pub fn new(config: ViewerConfig, view_mode: ViewMode, signer: Box<dyn UrlSigner>) -> Self {
        Self {
            loader: DatasetLoader::new(config.image_column.clone(), signer),
            dataset: None,
            filters: FilterState::default(),
            visible_indices: Vec::new(),
            view_mode,
            show_url: false,
            table_sort: None,
            expiry_input: config.signed_url_expiry_hours,
            set_colors: SetColors::default(),
            status_message: None,
            config,
            opened: None,
        }
    }

    /// Load `bytes` read from `path`. On failure the previous dataset stays.
    pub fn open_bytes(&mut self, path: PathBuf, bytes: Vec<u8>) -> Result<(), LoadError> {
        let dataset = self
            .loader
            .load(&bytes, self.config.signed_url_expiry_hours)?;
        self.opened = Some(OpenedFile { path, bytes });
        self.set_dataset(dataset);
        Ok(())
    }

    /// Change the signed-URL lifetime and reload the opened file.
    pub fn set_expiry_hours(&mut self, hours: u32) {
        self.config.signed_url_expiry_hours = hours;
        self.config = self.config.clone().sanitized();
        self.expiry_input = self.config.signed_url_expiry_hours;

        let Some(opened) = &self.opened else {
            return;
        };
        match self.loader.load(&opened.bytes, self.config.signed_url_expiry_hours) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Reloading {} failed: {e}", opened.path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a loaded dataset and re-apply the filters that still make sense.
    pub fn set_dataset(&mut self, dataset: Arc<LoadedDataset>) {
        self.filters.retain_known(&dataset);
        self.set_colors = SetColors::new(&dataset.all_sets);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute `visible_indices` after filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.filters);
        }
    }

    pub fn toggle_set(&mut self, set: &str) {
        self.filters.toggle_set(set);
        self.refilter();
    }

    pub fn toggle_value(&mut self, set: &str, value: &str) {
        self.filters.toggle_value(set, value);
        self.refilter();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.refilter();
    }

    /// Header click on `column`: ascending, descending, then unsorted.
    pub fn cycle_sort(&mut self, column: &str) {
        self.table_sort = TableSort::cycle(self.table_sort.as_ref(), column);
    }

    /// Records at `visible_indices`, in input order.
    pub fn visible_records(&self) -> Vec<&Record> {
        match &self.dataset {
            Some(ds) => self
                .visible_indices
                .iter()
                .filter_map(|&i| ds.records.get(i))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn opened_path(&self) -> Option<&PathBuf> {
        self.opened.as_ref().map(|o| &o.path)
    }
}
