use super::model::Record;

pub const PREVIEW_COLUMN: &str = "Preview";
pub const URL_COLUMN: &str = "URL";
pub const SIGN_ERROR_COLUMN: &str = "Signing error";

// ---------------------------------------------------------------------------
// Table rows
// ---------------------------------------------------------------------------

/// One table row derived from a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    /// Image location for the thumbnail, `None` shows "No preview".
    pub preview: Option<String>,
    /// Raw URL text, present only when the URL column is shown.
    pub url: Option<String>,
    /// Comma-joined values, one per projected set (empty when absent).
    pub labels: Vec<String>,
    /// Signing error text, if the record has one.
    pub sign_error: Option<String>,
}

/// Column headers plus rows for the table view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableProjection {
    pub columns: Vec<String>,
    pub rows: Vec<DisplayRow>,
    pub show_url: bool,
    pub has_sign_error_column: bool,
}

/// Project records into table rows.
///
/// Column order: `Preview`, `URL` (when `show_url`), every set in
/// `all_sets`, then `Signing error` when any projected record failed to sign.
pub fn project_rows(records: &[&Record], all_sets: &[String], show_url: bool) -> TableProjection {
    let rows: Vec<DisplayRow> = records
        .iter()
        .map(|rec| DisplayRow {
            preview: rec.url.clone(),
            url: show_url.then(|| rec.url.clone().unwrap_or_default()),
            labels: all_sets.iter().map(|s| rec.values(s).join(", ")).collect(),
            sign_error: rec.sign_error.clone(),
        })
        .collect();

    let has_sign_error_column = rows.iter().any(|r| r.sign_error.is_some());

    let mut columns = vec![PREVIEW_COLUMN.to_string()];
    if show_url {
        columns.push(URL_COLUMN.to_string());
    }
    columns.extend(all_sets.iter().cloned());
    if has_sign_error_column {
        columns.push(SIGN_ERROR_COLUMN.to_string());
    }

    TableProjection {
        columns,
        rows,
        show_url,
        has_sign_error_column,
    }
}

/// Sorting applied to the table, by column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSort {
    pub column: String,
    pub descending: bool,
}

impl TableSort {
    /// Next state after clicking `column`: ascending, descending, then off.
    pub fn cycle(current: Option<&TableSort>, column: &str) -> Option<TableSort> {
        match current {
            Some(s) if s.column == column && !s.descending => Some(TableSort {
                column: column.to_string(),
                descending: true,
            }),
            Some(s) if s.column == column => None,
            _ => Some(TableSort {
                column: column.to_string(),
                descending: false,
            }),
        }
    }
}

impl TableProjection {
    /// Stable sort of the rows by the text of `sort.column`. Unknown columns
    /// leave the order untouched.
    pub fn sort_by(&mut self, sort: &TableSort) {
        let Some(col) = self.columns.iter().position(|c| *c == sort.column) else {
            return;
        };
        let show_url = self.show_url;
        self.rows.sort_by(|a, b| {
            let order = cell_text(a, col, show_url).cmp(cell_text(b, col, show_url));
            if sort.descending { order.reverse() } else { order }
        });
    }
}

/// Text shown in column `col` of `row`.
fn cell_text(row: &DisplayRow, col: usize, show_url: bool) -> &str {
    if col == 0 {
        return row.preview.as_deref().unwrap_or("");
    }
    let mut idx = col - 1;
    if show_url {
        if idx == 0 {
            return row.url.as_deref().unwrap_or("");
        }
        idx -= 1;
    }
    match row.labels.get(idx) {
        Some(value) => value,
        None => row.sign_error.as_deref().unwrap_or(""),
    }
}

// ---------------------------------------------------------------------------
// Grid hover labels and summary
// ---------------------------------------------------------------------------

/// `(set, joined values)` for each set of `all_sets` the record has values for.
pub fn hover_entries<'a>(record: &Record, all_sets: &'a [String]) -> Vec<(&'a str, String)> {
    all_sets
        .iter()
        .filter_map(|set| {
            let values = record.values(set);
            (!values.is_empty()).then(|| (set.as_str(), values.join(", ")))
        })
        .collect()
}

pub fn summary_line(shown: usize, total: usize, n_sets: usize) -> String {
    format!("Images shown: {shown} / {total}  |  Annotation sets: {n_sets}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: Option<&str>, labels: &[(&str, &[&str])], err: Option<&str>) -> Record {
        Record {
            url: url.map(str::to_string),
            labels_by_set: labels
                .iter()
                .map(|(set, vals)| {
                    (set.to_string(), vals.iter().map(|v| v.to_string()).collect())
                })
                .collect(),
            sign_error: err.map(str::to_string),
        }
    }

    fn sets(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn columns_follow_fixed_order() {
        let a = record(Some("a.jpg"), &[("species", &["cat"])], None);
        let b = record(None, &[("color", &["red", "blue"])], Some("denied"));
        let all = sets(&["color", "species"]);

        let table = project_rows(&[&a, &b], &all, true);
        assert_eq!(table.columns, vec!["Preview", "URL", "color", "species", "Signing error"]);

        assert_eq!(table.rows[0].url.as_deref(), Some("a.jpg"));
        assert_eq!(table.rows[0].labels, vec!["", "cat"]);
        assert_eq!(table.rows[0].sign_error, None);

        assert_eq!(table.rows[1].preview, None);
        assert_eq!(table.rows[1].url.as_deref(), Some(""));
        assert_eq!(table.rows[1].labels, vec!["red, blue", ""]);
        assert_eq!(table.rows[1].sign_error.as_deref(), Some("denied"));
    }

    #[test]
    fn optional_columns_are_omitted() {
        let a = record(Some("a.jpg"), &[("species", &["cat"])], None);
        let table = project_rows(&[&a], &sets(&["species"]), false);

        assert_eq!(table.columns, vec!["Preview", "species"]);
        assert!(!table.has_sign_error_column);
        assert_eq!(table.rows[0].url, None);
    }

    #[test]
    fn sign_error_column_only_considers_projected_rows() {
        let ok = record(Some("a.jpg"), &[], None);
        let table = project_rows(&[&ok], &[], false);
        assert_eq!(table.columns, vec!["Preview"]);

        let empty = project_rows(&[], &sets(&["species"]), true);
        assert_eq!(empty.columns, vec!["Preview", "URL", "species"]);
        assert!(empty.rows.is_empty());
    }

    #[test]
    fn hover_entries_skip_absent_sets() {
        let rec = record(Some("a.jpg"), &[("species", &["cat"]), ("pose", &["sitting"])], None);
        let all = sets(&["color", "pose", "species"]);

        assert_eq!(
            hover_entries(&rec, &all),
            vec![("pose", "sitting".to_string()), ("species", "cat".to_string())]
        );
        assert!(hover_entries(&record(None, &[], None), &all).is_empty());
    }

    #[test]
    fn sorts_by_label_column_and_cycles() {
        let a = record(Some("a.jpg"), &[("species", &["dog"])], None);
        let b = record(Some("b.jpg"), &[("species", &["cat"])], None);
        let c = record(Some("c.jpg"), &[], None);
        let mut table = project_rows(&[&a, &b, &c], &sets(&["species"]), true);

        let asc = TableSort::cycle(None, "species").unwrap();
        table.sort_by(&asc);
        let order: Vec<_> = table.rows.iter().map(|r| cell_text(r, 1, true)).collect();
        assert_eq!(order, vec!["c.jpg", "b.jpg", "a.jpg"]);

        let desc = TableSort::cycle(Some(&asc), "species").unwrap();
        assert!(desc.descending);
        table.sort_by(&desc);
        assert_eq!(cell_text(&table.rows[0], 2, true), "dog");

        assert_eq!(TableSort::cycle(Some(&desc), "species"), None);
        assert_eq!(TableSort::cycle(Some(&desc), "URL").map(|s| s.descending), Some(false));
    }

    #[test]
    fn unknown_sort_column_is_ignored() {
        let a = record(Some("b.jpg"), &[], None);
        let b = record(Some("a.jpg"), &[], None);
        let mut table = project_rows(&[&a, &b], &[], false);
        table.sort_by(&TableSort { column: "gone".into(), descending: false });
        assert_eq!(table.rows[0].preview.as_deref(), Some("b.jpg"));
    }

    #[test]
    fn summary_mentions_counts() {
        assert_eq!(summary_line(3, 10, 2), "Images shown: 3 / 10  |  Annotation sets: 2");
    }
}
