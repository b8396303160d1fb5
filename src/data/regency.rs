use std::collections::BTreeSet;

use super::model::{RegencyRecord, Table};
use super::resolve::{ColumnMap, Concept};

/// Rows shown in the regency drill-down.
pub const DEFAULT_REGENCY_LIMIT: usize = 15;

/// Regencies/cities of `province`, poorest first, at most `limit` of them.
///
/// Empty when the owning-province, regency or poverty column cannot be
/// resolved or nothing matches. Rows without a numeric poverty value are
/// left out.
pub fn regency_detail(
    table: &Table,
    columns: &ColumnMap,
    province: &str,
    limit: usize,
) -> Vec<RegencyRecord> {
    let (Some(prov_col), Some(name_col), Some(poverty_col)) = (
        columns.get(Concept::Province),
        columns.get(Concept::Regency),
        columns.get(Concept::Poverty),
    ) else {
        return Vec::new();
    };

    let mut records: Vec<RegencyRecord> = (0..table.len())
        .filter(|&row| table.text(row, prov_col).as_deref() == Some(province))
        .filter_map(|row| {
            Some(RegencyRecord {
                province: province.to_string(),
                name: table.text(row, name_col)?,
                poverty: table.numeric(row, poverty_col)?,
            })
        })
        .collect();

    records.sort_by(|a, b| b.poverty.total_cmp(&a.poverty));
    records.truncate(limit);
    records
}

/// Distinct owning-province names in order of first appearance.
pub fn regency_provinces(table: &Table, columns: &ColumnMap) -> Vec<String> {
    let Some(col) = columns.get(Concept::Province) else {
        return Vec::new();
    };
    let mut seen = BTreeSet::new();
    (0..table.len())
        .filter_map(|row| table.text(row, col))
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn regencies(rows: &[(&str, &str, Option<f64>)]) -> Table {
        let mut t = Table::new(
            "KEMISKINAN_KABKOTA",
            vec!["PROVINSI".into(), "KABUPATEN/KOTA".into(), "PERSEN_MISKIN".into()],
        );
        for (prov, name, poverty) in rows {
            t.push_row(vec![
                CellValue::String(prov.to_string()),
                CellValue::String(name.to_string()),
                poverty.map_or(CellValue::Empty, CellValue::Float),
            ]);
        }
        t
    }

    #[test]
    fn top_fifteen_sorted_descending() {
        let names: Vec<String> = (0..20).map(|i| format!("KAB {i}")).collect();
        let mut rows: Vec<(&str, &str, Option<f64>)> = names
            .iter()
            .enumerate()
            .map(|(i, n)| ("X", n.as_str(), Some(((i * 7) % 20) as f64)))
            .collect();
        rows.push(("Y", "OTHER", Some(99.0)));
        let t = regencies(&rows);
        let cols = ColumnMap::resolve_all(&t.columns);

        let out = regency_detail(&t, &cols, "X", DEFAULT_REGENCY_LIMIT);
        assert_eq!(out.len(), 15);
        assert!(out.windows(2).all(|w| w[0].poverty >= w[1].poverty));
        assert!(out.iter().all(|r| r.province == "X"));
        assert_eq!(out[0].poverty, 19.0);
    }

    #[test]
    fn missing_values_and_other_provinces_are_skipped() {
        let t = regencies(&[
            ("X", "A", Some(3.0)),
            ("X", "B", None),
            ("Y", "C", Some(9.0)),
            ("X", "D", Some(5.0)),
        ]);
        let cols = ColumnMap::resolve_all(&t.columns);
        let names: Vec<_> = regency_detail(&t, &cols, "X", 15)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["D", "A"]);
        assert!(regency_detail(&t, &cols, "Z", 15).is_empty());
    }

    #[test]
    fn unresolved_province_column_yields_nothing() {
        let mut t = Table::new("KEMISKINAN_KABKOTA", vec!["KOTA".into(), "MISKIN".into()]);
        t.push_row(vec![CellValue::String("A".into()), CellValue::Float(1.0)]);
        let cols = ColumnMap::resolve_all(&t.columns);
        assert!(regency_detail(&t, &cols, "A", 15).is_empty());
        assert!(regency_provinces(&t, &cols).is_empty());
    }

    #[test]
    fn provinces_in_first_appearance_order() {
        let t = regencies(&[
            ("JAMBI", "A", Some(1.0)),
            ("ACEH", "B", Some(1.0)),
            ("JAMBI", "C", Some(1.0)),
        ]);
        let cols = ColumnMap::resolve_all(&t.columns);
        assert_eq!(regency_provinces(&t, &cols), vec!["JAMBI", "ACEH"]);
    }
}
