use std::collections::BTreeSet;

use super::model::Table;
use super::resolve::{ColumnMap, Concept};

// ---------------------------------------------------------------------------
// Filter selection: what the side panel currently asks for
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Descending,
    Ascending,
}

impl SortOrder {
    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Descending => "Descending",
            SortOrder::Ascending => "Ascending",
        }
    }
}

/// User-driven selection, rebuilt on every control change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    /// Provinces to keep. Empty means "no filter" (show all).
    pub selected_provinces: BTreeSet<String>,
    /// Inclusive `[low, high]` range on the poverty measure, if any.
    pub poverty_range: Option<(f64, f64)>,
    pub sort_order: SortOrder,
    /// Column shown in the distribution view.
    pub distribution_measure: Option<String>,
}

impl FilterSelection {
    /// Everything selected, range spanning the full poverty bounds.
    pub fn initial(table: &Table, columns: &ColumnMap) -> Self {
        let selected_provinces = columns
            .get(Concept::Province)
            .map(|col| (0..table.len()).filter_map(|r| table.text(r, col)).collect())
            .unwrap_or_default();
        FilterSelection {
            selected_provinces,
            poverty_range: poverty_bounds(table, columns),
            sort_order: SortOrder::default(),
            distribution_measure: distribution_measures(table).into_iter().next(),
        }
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Rows of the province table passing the selection, in table order.
///
/// A row passes when:
/// * no provinces are selected, or its name is among the selected ones, and
/// * there is no poverty column or no range, or its poverty value lies in
///   `[low, high]`. A missing value never lies in a range.
pub fn filter_provinces(table: &Table, columns: &ColumnMap, selection: &FilterSelection) -> Table {
    if selection.selected_provinces.is_empty() {
        return table.clone();
    }

    let name_col = columns.get(Concept::Province);
    let range = columns.get(Concept::Poverty).zip(selection.poverty_range);

    table.select_rows(|row| {
        let in_selection = match name_col {
            Some(col) => table
                .text(row, col)
                .is_some_and(|name| selection.selected_provinces.contains(&name)),
            None => true,
        };
        let in_range = match range {
            Some((col, (low, high))) => table
                .numeric(row, col)
                .is_some_and(|v| low <= v && v <= high),
            None => true,
        };
        in_selection && in_range
    })
}

/// Min and max of the poverty measure over `table`, bounding the range
/// control. `None` when the column is missing or holds no numbers.
pub fn poverty_bounds(table: &Table, columns: &ColumnMap) -> Option<(f64, f64)> {
    let col = columns.get(Concept::Poverty)?;
    table
        .numeric_values(col)
        .into_iter()
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Columns offered for the distribution view: everything but the province
/// name column.
pub fn distribution_measures(table: &Table) -> Vec<String> {
    table
        .columns
        .iter()
        .filter(|c| c.as_str() != "PROVINSI")
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testutil::province_table;

    fn two_provinces() -> Table {
        province_table(
            &["PENDUDUK_MISKIN"],
            &[("A", [Some(10.0)]), ("B", [Some(90.0)])],
        )
    }

    fn selection(names: &[&str], range: Option<(f64, f64)>) -> FilterSelection {
        FilterSelection {
            selected_provinces: names.iter().map(|n| n.to_string()).collect(),
            poverty_range: range,
            ..FilterSelection::default()
        }
    }

    #[test]
    fn empty_selection_returns_full_table() {
        let t = two_provinces();
        let cols = ColumnMap::resolve_all(&t.columns);
        let out = filter_provinces(&t, &cols, &selection(&[], Some((0.0, 1.0))));
        assert_eq!(out, t);
    }

    #[test]
    fn selection_and_range_combine() {
        let t = two_provinces();
        let cols = ColumnMap::resolve_all(&t.columns);
        let out = filter_provinces(&t, &cols, &selection(&["A", "B"], Some((0.0, 50.0))));
        assert_eq!(out.len(), 1);
        assert_eq!(out.text(0, "PROVINSI").as_deref(), Some("A"));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let t = province_table(
            &["PENDUDUK_MISKIN"],
            &[
                ("A", [Some(10.0)]),
                ("B", [Some(50.0)]),
                ("C", [Some(50.5)]),
                ("D", [Some(9.99)]),
                ("E", [None]),
            ],
        );
        let cols = ColumnMap::resolve_all(&t.columns);
        let (low, high) = (10.0, 50.0);
        let out = filter_provinces(
            &t,
            &cols,
            &selection(&["A", "B", "C", "D", "E"], Some((low, high))),
        );
        let kept: Vec<_> = (0..out.len())
            .filter_map(|r| out.text(r, "PROVINSI"))
            .collect();
        assert_eq!(kept, vec!["A", "B"]);
        for r in 0..out.len() {
            let v = out.numeric(r, "PENDUDUK_MISKIN").expect("value");
            assert!(low <= v && v <= high);
        }
    }

    #[test]
    fn range_is_vacuous_without_poverty_column() {
        let t = province_table(&["TPT (%)"], &[("A", [Some(3.0)]), ("B", [Some(7.0)])]);
        let cols = ColumnMap::resolve_all(&t.columns);
        let out = filter_provinces(&t, &cols, &selection(&["B"], Some((0.0, 1.0))));
        assert_eq!(out.len(), 1);
        assert_eq!(out.text(0, "PROVINSI").as_deref(), Some("B"));
    }

    #[test]
    fn preserves_row_order() {
        let t = province_table(
            &["PENDUDUK_MISKIN"],
            &[("C", [Some(1.0)]), ("A", [Some(2.0)]), ("B", [Some(3.0)])],
        );
        let cols = ColumnMap::resolve_all(&t.columns);
        let out = filter_provinces(&t, &cols, &selection(&["B", "C"], None));
        assert_eq!(out.rows, vec![t.rows[0].clone(), t.rows[2].clone()]);
    }

    #[test]
    fn bounds_span_numeric_values() {
        let t = province_table(
            &["PENDUDUK_MISKIN"],
            &[("A", [Some(42.0)]), ("B", [None]), ("C", [Some(7.5)])],
        );
        let cols = ColumnMap::resolve_all(&t.columns);
        assert_eq!(poverty_bounds(&t, &cols), Some((7.5, 42.0)));

        let empty = province_table(&["PENDUDUK_MISKIN"], &[]);
        assert_eq!(poverty_bounds(&empty, &cols), None);
    }

    #[test]
    fn initial_selection_shows_everything() {
        let t = two_provinces();
        let cols = ColumnMap::resolve_all(&t.columns);
        let sel = FilterSelection::initial(&t, &cols);
        assert_eq!(sel.selected_provinces.len(), 2);
        assert_eq!(sel.poverty_range, Some((10.0, 90.0)));
        assert_eq!(sel.distribution_measure.as_deref(), Some("PENDUDUK_MISKIN"));
        assert_eq!(filter_provinces(&t, &cols, &sel), t);
    }
}
