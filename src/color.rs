use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.6);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Set colours: annotation set name → Color32
// ---------------------------------------------------------------------------

/// Gives every annotation set a stable colour so it reads the same in the
/// filter panel, table header and grid popovers.
#[derive(Debug, Clone, Default)]
pub struct SetColors {
    mapping: BTreeMap<String, Color32>,
}

impl SetColors {
    pub fn new(all_sets: &[String]) -> Self {
        let mapping = all_sets
            .iter()
            .cloned()
            .zip(generate_palette(all_sets.len()))
            .collect();
        SetColors { mapping }
    }

    pub fn color_for(&self, set: &str) -> Color32 {
        self.mapping.get(set).copied().unwrap_or(Color32::GRAY)
    }
}
