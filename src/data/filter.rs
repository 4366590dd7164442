use std::collections::BTreeMap;

use super::model::{LoadedDataset, Record};

// ---------------------------------------------------------------------------
// Filter predicate: required sets and required values per set
// ---------------------------------------------------------------------------

/// Conjunctive filter selection.
///
/// A record passes when it holds every set in `sets_filter` and, for each of
/// those sets, every value listed in `selected_labels_per_set`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Sets a record must contain, in selection order.
    pub sets_filter: Vec<String>,
    /// Values a record must contain for a selected set (AND).
    pub selected_labels_per_set: BTreeMap<String, Vec<String>>,
}

impl FilterState {
    /// True when no constraint is active.
    pub fn is_empty(&self) -> bool {
        self.sets_filter.is_empty()
    }

    pub fn is_set_selected(&self, set: &str) -> bool {
        self.sets_filter.iter().any(|s| s == set)
    }

    pub fn is_value_selected(&self, set: &str, value: &str) -> bool {
        self.selected_labels_per_set
            .get(set)
            .is_some_and(|vals| vals.iter().any(|v| v == value))
    }

    /// Add or remove a required set. Removing a set drops its value selection.
    pub fn toggle_set(&mut self, set: &str) {
        if let Some(pos) = self.sets_filter.iter().position(|s| s == set) {
            self.sets_filter.remove(pos);
            self.selected_labels_per_set.remove(set);
        } else {
            self.sets_filter.push(set.to_string());
        }
    }

    /// Add or remove a required value within `set`.
    pub fn toggle_value(&mut self, set: &str, value: &str) {
        let selected = self.selected_labels_per_set.entry(set.to_string()).or_default();
        if let Some(pos) = selected.iter().position(|v| v == value) {
            selected.remove(pos);
            if selected.is_empty() {
                self.selected_labels_per_set.remove(set);
            }
        } else {
            selected.push(value.to_string());
        }
    }

    /// Drop every constraint.
    pub fn clear(&mut self) {
        self.sets_filter.clear();
        self.selected_labels_per_set.clear();
    }

    /// Forget selections that the given dataset has no vocabulary for.
    pub fn retain_known(&mut self, dataset: &LoadedDataset) {
        self.sets_filter
            .retain(|s| dataset.labels_per_set.contains_key(s));
        self.selected_labels_per_set.retain(|set, values| {
            let known = dataset.labels_for(set);
            values.retain(|v| known.contains(v));
            !values.is_empty()
        });
    }

    /// Whether `record` satisfies this selection.
    pub fn matches(&self, record: &Record) -> bool {
        matches(record, &self.sets_filter, &self.selected_labels_per_set)
    }
}

/// Whether `record` holds every set in `sets_filter` together with every
/// required value listed for it.
pub fn matches(
    record: &Record,
    sets_filter: &[String],
    selected_labels_per_set: &BTreeMap<String, Vec<String>>,
) -> bool {
    sets_filter.iter().all(|set| {
        let Some(have) = record.labels_by_set.get(set) else {
            return false;
        };
        selected_labels_per_set
            .get(set)
            .map_or(true, |required| required.iter().all(|v| have.contains(v)))
    })
}

/// Records passing `filter`, in input order.
#[allow(dead_code)] // the UI renders from `filtered_indices`
pub fn filter_all<'a>(records: &'a [Record], filter: &FilterState) -> Vec<&'a Record> {
    records.iter().filter(|rec| filter.matches(rec)).collect()
}

/// Return indices of records that pass the filter.
pub fn filtered_indices(dataset: &LoadedDataset, filter: &FilterState) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| filter.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(labels: &[(&str, &[&str])]) -> Record {
        Record {
            labels_by_set: labels
                .iter()
                .map(|(set, vals)| {
                    (set.to_string(), vals.iter().map(|v| v.to_string()).collect())
                })
                .collect(),
            ..Record::default()
        }
    }

    fn filter(sets: &[&str], values: &[(&str, &[&str])]) -> FilterState {
        FilterState {
            sets_filter: sets.iter().map(|s| s.to_string()).collect(),
            selected_labels_per_set: values
                .iter()
                .map(|(set, vals)| {
                    (set.to_string(), vals.iter().map(|v| v.to_string()).collect())
                })
                .collect(),
        }
    }

    fn sample() -> Vec<Record> {
        vec![
            record(&[("species", &["cat"])]),
            record(&[("species", &["dog"])]),
            record(&[]),
            record(&[("species", &["cat", "kitten"]), ("color", &["black"])]),
        ]
    }

    #[test]
    fn empty_filter_matches_everything() {
        let records = sample();
        assert_eq!(filter_all(&records, &FilterState::default()).len(), records.len());
    }

    #[test]
    fn required_value_selects_only_matching_records() {
        let records = sample()[..3].to_vec();
        let f = filter(&["species"], &[("species", &["cat"])]);

        let hits = filter_all(&records, &f);
        assert_eq!(hits, vec![&records[0]]);
    }

    #[test]
    fn set_without_values_only_requires_presence() {
        let records = sample();
        let f = filter(&["species"], &[]);
        assert_eq!(filtered_indices(&LoadedDataset::from_records(records), &f), vec![0, 1, 3]);
    }

    #[test]
    fn every_required_value_must_be_present() {
        let records = sample();
        let f = filter(&["species"], &[("species", &["cat", "kitten"])]);
        assert_eq!(filter_all(&records, &f), vec![&records[3]]);
    }

    #[test]
    fn clauses_are_conjunctive() {
        let records = sample();
        let f = filter(&["species", "color"], &[]);
        assert_eq!(filter_all(&records, &f), vec![&records[3]]);

        let f = filter(&["species", "color"], &[("color", &["white"])]);
        assert!(filter_all(&records, &f).is_empty());
    }

    #[test]
    fn values_for_unselected_sets_are_ignored() {
        let records = sample();
        let f = filter(&[], &[("species", &["dog"])]);
        assert_eq!(filter_all(&records, &f).len(), records.len());
    }

    #[test]
    fn adding_constraints_never_grows_result() {
        let records = sample();
        let steps = [
            filter(&[], &[]),
            filter(&["species"], &[]),
            filter(&["species"], &[("species", &["cat"])]),
            filter(&["species", "color"], &[("species", &["cat"])]),
            filter(&["species", "color"], &[("species", &["cat", "kitten"])]),
        ];

        let mut previous = records.len();
        for f in &steps {
            let n = filter_all(&records, f).len();
            assert!(n <= previous, "{f:?} grew the result");
            previous = n;
        }
        assert_eq!(previous, 1);
    }

    #[test]
    fn toggling_set_off_drops_its_values() {
        let mut f = FilterState::default();
        f.toggle_set("species");
        f.toggle_value("species", "cat");
        assert!(f.is_set_selected("species"));
        assert!(f.is_value_selected("species", "cat"));

        f.toggle_set("species");
        assert!(f.is_empty());
        assert!(f.selected_labels_per_set.is_empty());
    }

    #[test]
    fn toggling_last_value_removes_entry() {
        let mut f = FilterState::default();
        f.toggle_set("species");
        f.toggle_value("species", "cat");
        f.toggle_value("species", "cat");
        assert!(!f.selected_labels_per_set.contains_key("species"));
        assert!(f.is_set_selected("species"));
    }

    #[test]
    fn retain_known_discards_stale_selection() {
        let dataset = LoadedDataset::from_records(sample());
        let mut f = filter(
            &["species", "habitat"],
            &[("species", &["cat", "wolf"]), ("habitat", &["forest"])],
        );

        f.retain_known(&dataset);
        assert_eq!(f, filter(&["species"], &[("species", &["cat"])]));
    }
}
