use std::fmt;

use super::resolve::{ColumnMap, Concept};

// ---------------------------------------------------------------------------
// CellValue – a single spreadsheet cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value as read from a workbook sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Empty,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Empty => Ok(()),
        }
    }
}

impl CellValue {
    /// Coerce the value to `f64`.
    ///
    /// Numbers pass through, numeric-looking text is parsed, everything else
    /// (including NaN) is treated as missing.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            CellValue::Float(v) => *v,
            CellValue::Integer(i) => *i as f64,
            CellValue::String(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Bool(_) | CellValue::Empty => return None,
        };
        (!v.is_nan()).then_some(v)
    }

    /// Text form of the value, `None` for empty cells and blank strings.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::String(s) if s.trim().is_empty() => None,
            CellValue::String(s) => Some(s.trim().to_string()),
            other => Some(other.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

// ---------------------------------------------------------------------------
// Table – one sheet of the workbook
// ---------------------------------------------------------------------------

/// Column-named rows of cells. Tables are never mutated once loaded;
/// filtering produces a new table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Sheet name the table was read from.
    pub name: String,
    /// Column names in sheet order.
    pub columns: Vec<String>,
    /// Rows, each exactly `columns.len()` cells wide.
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Table {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the column count.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Empty);
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    pub fn numeric(&self, row: usize, column: &str) -> Option<f64> {
        self.value(row, column)?.as_f64()
    }

    pub fn text(&self, row: usize, column: &str) -> Option<String> {
        self.value(row, column)?.as_text()
    }

    /// Every numeric value of a column, skipping missing cells.
    pub fn numeric_values(&self, column: &str) -> Vec<f64> {
        let Some(idx) = self.column_index(column) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|r| r.get(idx).and_then(CellValue::as_f64))
            .collect()
    }

    /// Copy of the table keeping only rows for which `keep(row_index)` holds,
    /// in original order.
    pub fn select_rows(&self, mut keep: impl FnMut(usize) -> bool) -> Table {
        Table {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .enumerate()
                .filter(|(i, _)| keep(*i))
                .map(|(_, r)| r.clone())
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Typed record views
// ---------------------------------------------------------------------------

/// One province row with its numeric measures.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvinceRecord {
    pub name: String,
    /// Numeric measures in column order, missing values skipped.
    pub measures: Vec<(String, f64)>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl ProvinceRecord {
    /// Build the record for `row`, or `None` when the province name is blank
    /// or the province column cannot be resolved.
    pub fn from_row(table: &Table, columns: &ColumnMap, row: usize) -> Option<Self> {
        let name_col = columns.get(Concept::Province)?;
        let name = table.text(row, name_col)?;
        let measures = table
            .columns
            .iter()
            .filter(|c| c.as_str() != name_col)
            .filter_map(|c| table.numeric(row, c).map(|v| (c.clone(), v)))
            .collect();
        let coord = |concept| columns.get(concept).and_then(|c| table.numeric(row, c));
        Some(ProvinceRecord {
            name,
            measures,
            latitude: coord(Concept::Latitude),
            longitude: coord(Concept::Longitude),
        })
    }

    pub fn measure(&self, column: &str) -> Option<f64> {
        self.measures
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| *v)
    }
}

/// One regency/city row of the regency table.
#[derive(Debug, Clone, PartialEq)]
pub struct RegencyRecord {
    pub province: String,
    pub name: String,
    pub poverty: f64,
}

/// Male/female labour-force participation for one province.
#[derive(Debug, Clone, PartialEq)]
pub struct LaborParticipationRecord {
    pub province: String,
    pub male: f64,
    pub female: f64,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded workbook
// ---------------------------------------------------------------------------

/// The three tables of a successful load with their resolved columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub provinces: Table,
    pub regencies: Table,
    pub labor: Table,
    pub province_columns: ColumnMap,
    pub regency_columns: ColumnMap,
    pub labor_columns: ColumnMap,
}

impl Dataset {
    pub fn new(provinces: Table, regencies: Table, labor: Table) -> Self {
        Dataset {
            province_columns: ColumnMap::resolve_all(&provinces.columns),
            regency_columns: ColumnMap::resolve_all(&regencies.columns),
            labor_columns: ColumnMap::resolve_all(&labor.columns),
            provinces,
            regencies,
            labor,
        }
    }

    /// Province names of the full province table, in row order.
    pub fn province_names(&self) -> Vec<String> {
        let Some(col) = self.province_columns.get(Concept::Province) else {
            return Vec::new();
        };
        (0..self.provinces.len())
            .filter_map(|row| self.provinces.text(row, col))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        let mut t = Table::new(
            "DATA_PROVINSI",
            vec!["PROVINSI".into(), "LAT".into(), "LON".into(), "TPT (%)".into()],
        );
        t.push_row(vec![
            CellValue::String("ACEH".into()),
            CellValue::Float(4.7),
            CellValue::Float(96.7),
            CellValue::String("5.75".into()),
        ]);
        t.push_row(vec![CellValue::String("BALI".into())]);
        t
    }

    #[test]
    fn coerces_numeric_text_and_rejects_rest() {
        assert_eq!(CellValue::String(" 12.5 ".into()).as_f64(), Some(12.5));
        assert_eq!(CellValue::String("n/a".into()).as_f64(), None);
        assert_eq!(CellValue::Float(f64::NAN).as_f64(), None);
        assert_eq!(CellValue::Bool(true).as_f64(), None);
        assert_eq!(CellValue::Integer(3).as_f64(), Some(3.0));
    }

    #[test]
    fn short_rows_are_padded() {
        let t = table();
        assert_eq!(t.rows[1].len(), 4);
        assert!(t.value(1, "LAT").is_some_and(CellValue::is_empty));
    }

    #[test]
    fn select_rows_copies_in_order() {
        let t = table();
        let kept = t.select_rows(|i| i == 1);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept.text(0, "PROVINSI").as_deref(), Some("BALI"));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn province_record_collects_measures() {
        let t = table();
        let columns = ColumnMap::resolve_all(&t.columns);
        let rec = ProvinceRecord::from_row(&t, &columns, 0).expect("record");
        assert_eq!(rec.name, "ACEH");
        assert_eq!(rec.latitude, Some(4.7));
        assert_eq!(rec.longitude, Some(96.7));
        assert_eq!(rec.measure("TPT (%)"), Some(5.75));

        let bare = ProvinceRecord::from_row(&t, &columns, 1).expect("record");
        assert!(bare.measures.is_empty());
        assert_eq!(bare.latitude, None);
    }
}
