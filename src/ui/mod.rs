pub mod grid;
pub mod panels;
pub mod table;

use std::path::{Path, PathBuf};

use eframe::egui::{self, Response, Sense, Ui};

/// URI egui's image loaders understand for a record url.
///
/// Anything with a scheme is used as is; plain paths become `file://` URIs,
/// resolved against `base_dir` (the CSV's folder) when relative.
pub fn image_source(url: &str, base_dir: Option<&Path>) -> String {
    if url.contains("://") || url.starts_with("data:") {
        return url.to_string();
    }
    let path = Path::new(url);
    let resolved: PathBuf = match base_dir {
        Some(base) if path.is_relative() => base.join(path),
        _ => path.to_path_buf(),
    };
    format!("file://{}", resolved.display())
}

/// Square thumbnail, or a "No preview" caption when there is no url.
pub fn thumbnail(ui: &mut Ui, url: Option<&str>, size: f32, base_dir: Option<&Path>) -> Option<Response> {
    let Some(url) = url else {
        ui.weak("No preview");
        return None;
    };
    let image = egui::Image::new(image_source(url, base_dir))
        .fit_to_exact_size(egui::vec2(size, size))
        .maintain_aspect_ratio(true)
        .sense(Sense::hover());
    Some(ui.add(image))
}

/// Shown in the central panel until a dataset is opened.
pub fn empty_hint(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading("Open a CSV to browse images  (File → Open CSV…)");
    });
}
