use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use super::cache::{CacheKey, LoadCache};
use super::model::{LabelsBySet, LoadedDataset, Record};
use crate::signing::{CloudUri, UrlSigner};

/// Default name of the column holding image locations.
pub const DEFAULT_IMAGE_COLUMN: &str = "image_path";

/// Cell contents read as "no value", as in the usual dataframe CSV readers.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("CSV must include an '{column}' column with paths or URLs to images")]
    Schema { column: String },
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// Cached entry-point
// ---------------------------------------------------------------------------

/// Loads CSV datasets, memoizing results per (content, expiry).
pub struct DatasetLoader {
    image_column: String,
    signer: Box<dyn UrlSigner>,
    cache: LoadCache,
}

impl DatasetLoader {
    pub fn new(image_column: impl Into<String>, signer: Box<dyn UrlSigner>) -> Self {
        DatasetLoader {
            image_column: image_column.into(),
            signer,
            cache: LoadCache::default(),
        }
    }

    /// Load `bytes`, returning the cached dataset when the same content was
    /// already loaded with the same expiry.
    pub fn load(&mut self, bytes: &[u8], expiry_hours: u32) -> Result<Arc<LoadedDataset>, LoadError> {
        let key = CacheKey::new(bytes, expiry_hours);
        if let Some(hit) = self.cache.get(&key) {
            log::debug!("Dataset cache hit ({} records)", hit.len());
            return Ok(hit);
        }

        let dataset = load_csv_bytes(bytes, &self.image_column, expiry_hours, self.signer.as_ref())?;
        log::info!(
            "Loaded {} records with sets {:?} ({} signing failures)",
            dataset.len(),
            dataset.all_sets,
            dataset.signing_failures()
        );
        let dataset = self.cache.insert(key, dataset);
        log::debug!("{} dataset(s) cached", self.cache.len());
        Ok(dataset)
    }
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Parse CSV bytes into records and derive the set vocabulary.
///
/// Every column except `image_column` is an annotation set. Rows are kept in
/// input order; a failed signature is recorded on the row, never dropped.
pub fn load_csv_bytes(
    bytes: &[u8],
    image_column: &str,
    expiry_hours: u32,
    signer: &dyn UrlSigner,
) -> Result<LoadedDataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers = normalize_headers(reader.headers()?.iter());
    let image_idx = headers
        .iter()
        .position(|h| h == image_column)
        .ok_or_else(|| LoadError::Schema {
            column: image_column.to_string(),
        })?;

    let expiry = Duration::from_secs(u64::from(expiry_hours) * 3600);
    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result?;
        if row.len() > headers.len() {
            log::warn!(
                "CSV row {row_no}: {} cells for {} columns, extra cells ignored",
                row.len(),
                headers.len()
            );
        }

        let (url, sign_error) = resolve_image(row.get(image_idx), expiry, signer);
        if let Some(err) = &sign_error {
            log::warn!("CSV row {row_no}: {err}");
        }

        let mut labels_by_set = LabelsBySet::new();
        for (col_idx, name) in headers.iter().enumerate() {
            if col_idx == image_idx {
                continue;
            }
            let Some(value) = row.get(col_idx).and_then(label_value) else {
                continue;
            };
            labels_by_set.insert(name.clone(), vec![value]);
        }

        records.push(Record {
            url,
            labels_by_set,
            sign_error,
        });
    }

    Ok(LoadedDataset::from_records(records))
}

/// Turn an image cell into `(url, sign_error)`.
fn resolve_image(
    cell: Option<&str>,
    expiry: Duration,
    signer: &dyn UrlSigner,
) -> (Option<String>, Option<String>) {
    let Some(raw) = cell.filter(|c| !is_na(c)) else {
        return (None, None);
    };
    match CloudUri::parse(raw) {
        Some(uri) => match signer.sign(&uri, expiry) {
            Ok(url) => (Some(url), None),
            Err(e) => (None, Some(e.to_string())),
        },
        None => (Some(raw.to_string()), None),
    }
}

/// Trimmed label text, or `None` for NA and blank cells.
///
/// Numeric-looking cells keep their literal text: `007` stays `007`.
fn label_value(cell: &str) -> Option<String> {
    if is_na(cell) {
        return None;
    }
    let value = cell.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn is_na(cell: &str) -> bool {
    NA_TOKENS.contains(&cell)
}

/// Name blank headers `Unnamed: <idx>` and suffix repeats with `.1`, `.2`, …
fn normalize_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut headers: Vec<String> = Vec::new();

    for (idx, name) in raw.enumerate() {
        let base = if name.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            name.to_string()
        };

        let mut candidate = base.clone();
        while headers.contains(&candidate) {
            let n = seen.entry(base.clone()).or_insert(0);
            *n += 1;
            candidate = format!("{base}.{n}");
        }
        headers.push(candidate);
    }

    headers
}
