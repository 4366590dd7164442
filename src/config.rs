use serde::{Deserialize, Serialize};

use crate::data::loader::DEFAULT_IMAGE_COLUMN;

/// Storage key for the persisted [`ViewerConfig`].
pub const CONFIG_KEY: &str = "config";

pub const MIN_EXPIRY_HOURS: u32 = 1;
/// Signed URLs cannot outlive seven days.
pub const MAX_EXPIRY_HOURS: u32 = 7 * 24;

// ---------------------------------------------------------------------------
// Viewer configuration
// ---------------------------------------------------------------------------

/// User-tunable settings, restored from app storage between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Column holding image paths or URLs; every other column is a label set.
    pub image_column: String,
    /// Lifetime of signed URLs for `gs://` images.
    pub signed_url_expiry_hours: u32,
    /// Thumbnail edge length in points.
    pub thumbnail_px: f32,
    /// Tiles per row in the grid view.
    pub grid_columns: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            image_column: DEFAULT_IMAGE_COLUMN.to_string(),
            signed_url_expiry_hours: 12,
            thumbnail_px: 128.0,
            grid_columns: 4,
        }
    }
}

impl ViewerConfig {
    /// Restore from eframe storage, falling back to defaults.
    pub fn load(storage: Option<&dyn eframe::Storage>) -> Self {
        storage
            .and_then(|s| eframe::get_value::<ViewerConfig>(s, CONFIG_KEY))
            .unwrap_or_default()
            .sanitized()
    }

    /// Clamp values into their usable ranges.
    pub fn sanitized(mut self) -> Self {
        self.signed_url_expiry_hours = self
            .signed_url_expiry_hours
            .clamp(MIN_EXPIRY_HOURS, MAX_EXPIRY_HOURS);
        self.grid_columns = self.grid_columns.max(1);
        if !self.thumbnail_px.is_finite() || self.thumbnail_px < 16.0 {
            self.thumbnail_px = 16.0;
        }
        if self.image_column.trim().is_empty() {
            self.image_column = DEFAULT_IMAGE_COLUMN.to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = ViewerConfig::default();
        assert_eq!(cfg.image_column, "image_path");
        assert_eq!(cfg.signed_url_expiry_hours, 12);
        assert_eq!(cfg.grid_columns, 4);
        assert_eq!(ViewerConfig::load(None), cfg);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: ViewerConfig = serde_json::from_str(r#"{"grid_columns": 6}"#).unwrap();
        assert_eq!(cfg.grid_columns, 6);
        assert_eq!(cfg.image_column, "image_path");
    }

    #[test]
    fn sanitized_clamps_out_of_range_values() {
        let cfg = ViewerConfig {
            image_column: "  ".into(),
            signed_url_expiry_hours: 0,
            thumbnail_px: f32::NAN,
            grid_columns: 0,
        }
        .sanitized();

        assert_eq!(cfg.signed_url_expiry_hours, MIN_EXPIRY_HOURS);
        assert_eq!(cfg.grid_columns, 1);
        assert_eq!(cfg.thumbnail_px, 16.0);
        assert_eq!(cfg.image_column, "image_path");

        let long = ViewerConfig {
            signed_url_expiry_hours: 1000,
            ..ViewerConfig::default()
        }
        .sanitized();
        assert_eq!(long.signed_url_expiry_hours, MAX_EXPIRY_HOURS);
    }
}
