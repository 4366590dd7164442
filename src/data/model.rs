use std::collections::{BTreeMap, BTreeSet};

// ---------------------------------------------------------------------------
// Record – one row of the CSV
// ---------------------------------------------------------------------------

/// Annotation set name → values observed for it in one record.
pub type LabelsBySet = BTreeMap<String, Vec<String>>;

/// A single image reference with its annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// Renderable image location (already signed for cloud objects).
    pub url: Option<String>,
    /// Dynamic annotation columns: set name → values.
    pub labels_by_set: LabelsBySet,
    /// Why signing the image reference failed, if it did.
    pub sign_error: Option<String>,
}

impl Record {
    /// Values stored for `set`, empty when the set is absent.
    pub fn values(&self, set: &str) -> &[String] {
        self.labels_by_set
            .get(set)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

// ---------------------------------------------------------------------------
// LoadedDataset – records plus derived vocabulary
// ---------------------------------------------------------------------------

/// The full parsed dataset with the set/value vocabulary derived from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedDataset {
    /// All records, in input row order.
    pub records: Vec<Record>,
    /// Sorted names of every set holding at least one value somewhere.
    pub all_sets: Vec<String>,
    /// For each set the sorted distinct values.
    pub labels_per_set: BTreeMap<String, Vec<String>>,
}

impl LoadedDataset {
    /// Build the vocabulary from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut vocabulary: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for rec in &records {
            for (set, values) in &rec.labels_by_set {
                let non_empty = values.iter().filter(|v| !v.is_empty());
                let mut non_empty = non_empty.peekable();
                if non_empty.peek().is_none() {
                    continue;
                }
                vocabulary
                    .entry(set.clone())
                    .or_default()
                    .extend(non_empty.cloned());
            }
        }

        let all_sets = vocabulary.keys().cloned().collect();
        let labels_per_set = vocabulary
            .into_iter()
            .map(|(set, values)| (set, values.into_iter().collect()))
            .collect();

        LoadedDataset {
            records,
            all_sets,
            labels_per_set,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct values known for `set`.
    pub fn labels_for(&self, set: &str) -> &[String] {
        self.labels_per_set
            .get(set)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// How many records carry a signing error.
    pub fn signing_failures(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.sign_error.is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(labels: &[(&str, &[&str])]) -> Record {
        Record {
            url: None,
            labels_by_set: labels
                .iter()
                .map(|(set, vals)| {
                    (set.to_string(), vals.iter().map(|v| v.to_string()).collect())
                })
                .collect(),
            sign_error: None,
        }
    }

    #[test]
    fn vocabulary_is_sorted_and_deduplicated() {
        let ds = LoadedDataset::from_records(vec![
            record(&[("species", &["dog"]), ("color", &["brown"])]),
            record(&[("species", &["cat"])]),
            record(&[("species", &["dog"])]),
        ]);

        assert_eq!(ds.all_sets, vec!["color", "species"]);
        assert_eq!(ds.labels_for("species"), ["cat", "dog"]);
        assert_eq!(ds.labels_for("color"), ["brown"]);
        assert!(ds.labels_for("missing").is_empty());
    }

    #[test]
    fn sets_without_values_are_not_in_vocabulary() {
        let ds = LoadedDataset::from_records(vec![
            record(&[("empty", &[]), ("blank", &[""])]),
            record(&[("species", &["cat"])]),
        ]);

        assert_eq!(ds.all_sets, vec!["species"]);
        assert!(!ds.labels_per_set.contains_key("empty"));
        assert!(!ds.labels_per_set.contains_key("blank"));
    }

    #[test]
    fn counts_signing_failures() {
        let mut failed = record(&[]);
        failed.sign_error = Some("no credentials".into());
        let ds = LoadedDataset::from_records(vec![failed, record(&[])]);

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.signing_failures(), 1);
        assert!(!ds.is_empty());
    }
}
