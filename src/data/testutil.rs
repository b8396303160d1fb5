//! Workbook and table fixtures shared by the data-layer tests.

use std::path::PathBuf;

use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

use super::model::{CellValue, Table};

#[derive(Debug, Clone)]
pub enum FixtureCell {
    Text(String),
    Number(f64),
    Blank,
}

/// One sheet to write: name, header row and data rows.
#[derive(Debug, Clone)]
pub struct SheetFixture {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<FixtureCell>>,
}

impl SheetFixture {
    pub fn new(name: &str, headers: &[&str]) -> Self {
        SheetFixture {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Add a row made of leading text cells followed by numeric cells.
    pub fn row_mixed(mut self, texts: &[&str], numbers: &[f64]) -> Self {
        let row = texts
            .iter()
            .map(|t| FixtureCell::Text(t.to_string()))
            .chain(numbers.iter().map(|&n| FixtureCell::Number(n)))
            .collect();
        self.rows.push(row);
        self
    }

    pub fn row(mut self, cells: Vec<FixtureCell>) -> Self {
        self.rows.push(cells);
        self
    }
}

/// Write the sheets to `dashboard.xlsx` inside a fresh temp dir.
/// The dir must outlive the returned path.
pub fn write_workbook(sheets: &[SheetFixture]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dashboard.xlsx");
    let mut workbook = Workbook::new();
    for fixture in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(&fixture.name).expect("sheet name");
        for (c, h) in fixture.headers.iter().enumerate() {
            sheet.write_string(0, c as u16, h).expect("header");
        }
        for (r, row) in fixture.rows.iter().enumerate() {
            let r = r as u32 + 1;
            for (c, cell) in row.iter().enumerate() {
                let c = c as u16;
                match cell {
                    FixtureCell::Text(t) => {
                        sheet.write_string(r, c, t).expect("text cell");
                    }
                    FixtureCell::Number(n) => {
                        sheet.write_number(r, c, *n).expect("number cell");
                    }
                    FixtureCell::Blank => {}
                }
            }
        }
    }
    workbook.save(&path).expect("save workbook");
    (dir, path)
}

/// In-memory province table with a `PROVINSI` column followed by numeric
/// columns; `None` leaves a cell empty.
pub fn province_table<const N: usize>(
    measures: &[&str; N],
    rows: &[(&str, [Option<f64>; N])],
) -> Table {
    let mut columns = vec!["PROVINSI".to_string()];
    columns.extend(measures.iter().map(|m| m.to_string()));
    let mut table = Table::new("DATA_PROVINSI", columns);
    for (name, values) in rows {
        let mut row = vec![CellValue::String(name.to_string())];
        row.extend(values.iter().map(|v| match v {
            Some(v) => CellValue::Float(*v),
            None => CellValue::Empty,
        }));
        table.push_row(row);
    }
    table
}
