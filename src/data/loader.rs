use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use calamine::{open_workbook_auto, Data, Range, Reader};
use thiserror::Error;

use super::model::{CellValue, Dataset, Table};
use super::resolve::Concept;

/// Sheet holding one row per province.
pub const PROVINCE_SHEET: &str = "DATA_PROVINSI";
/// Sheet holding poverty per regency/city.
pub const REGENCY_SHEET: &str = "KEMISKINAN_KABKOTA";
/// Sheet holding labour-force participation by sex.
pub const LABOR_SHEET: &str = "TPAK_JENISKELAMIN";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a workbook could not be turned into a [`Dataset`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("source not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("sheet error: {0}")]
    Sheet(String),
    #[error("province data empty")]
    EmptyProvinceData,
    #[error("load error: {0}")]
    Load(String),
}

pub type LoadResult = Result<Arc<Dataset>, LoadError>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read the three dashboard sheets from a workbook.
///
/// Any format calamine understands works (`.xlsx`, `.xlsm`, `.xls`, `.ods`).
/// The regency and labour sheets must exist but may be empty; the province
/// sheet must have at least one data row.
pub fn load(path: &Path) -> Result<Dataset, LoadError> {
    if !path.exists() {
        return Err(LoadError::SourceNotFound(path.to_path_buf()));
    }

    let mut workbook =
        open_workbook_auto(path).map_err(|e| LoadError::Load(e.to_string()))?;
    let sheet_names = workbook.sheet_names();

    let mut read_sheet = |name: &str| -> Result<Table, LoadError> {
        if !sheet_names.iter().any(|s| s == name) {
            return Err(LoadError::Sheet(format!(
                "worksheet '{name}' not found (available: {})",
                sheet_names.join(", ")
            )));
        }
        let range = workbook
            .worksheet_range(name)
            .map_err(|e| LoadError::Sheet(format!("worksheet '{name}': {e}")))?;
        Ok(range_to_table(name, &range))
    };

    let provinces = read_sheet(PROVINCE_SHEET)?;
    let regencies = read_sheet(REGENCY_SHEET)?;
    let labor = read_sheet(LABOR_SHEET)?;

    if provinces.is_empty() {
        return Err(LoadError::EmptyProvinceData);
    }

    let dataset = Dataset::new(provinces, regencies, labor);
    check_province_names(&dataset);
    log::info!(
        "Loaded {} provinces, {} regencies, {} labour rows from {}",
        dataset.provinces.len(),
        dataset.regencies.len(),
        dataset.labor.len(),
        path.display()
    );
    log::debug!("Province columns: {:?}", dataset.provinces.columns);
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Load cache
// ---------------------------------------------------------------------------

/// Memoized loads keyed by source path.
///
/// The first request for a path reads the workbook; every later request gets
/// the stored outcome, success or failure, without touching the file.
#[derive(Debug, Default)]
pub struct LoadCache {
    entries: HashMap<PathBuf, LoadResult>,
}

impl LoadCache {
    pub fn get_or_load(&mut self, path: &Path) -> LoadResult {
        if let Some(hit) = self.entries.get(path) {
            log::debug!("Load cache hit for {}", path.display());
            return hit.clone();
        }
        let result = load(path).map(Arc::new);
        if let Err(e) = &result {
            log::error!("Failed to load {}: {e}", path.display());
        }
        self.entries.insert(path.to_path_buf(), result.clone());
        result
    }

    /// Forget the stored outcome for `path` so the next request re-reads it.
    pub fn invalidate(&mut self, path: &Path) {
        self.entries.remove(path);
    }
}

// ---------------------------------------------------------------------------
// Sheet conversion helpers
// ---------------------------------------------------------------------------

/// First row is the header; fully empty rows are dropped.
fn range_to_table(name: &str, range: &Range<Data>) -> Table {
    let mut rows = range.rows();
    let columns: Vec<String> = match rows.next() {
        Some(header) => header
            .iter()
            .enumerate()
            .map(|(i, cell)| match cell_to_value(cell).as_text() {
                Some(text) => text,
                None => format!("Unnamed: {i}"),
            })
            .collect(),
        None => return Table::new(name, Vec::new()),
    };

    let mut table = Table::new(name, columns);
    for row in rows {
        let values: Vec<CellValue> = row.iter().map(cell_to_value).collect();
        if values.iter().all(CellValue::is_empty) {
            continue;
        }
        table.push_row(values);
    }
    table
}

fn cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}

/// Province names should be present and unique; violations only degrade the
/// dashboard, so they are reported rather than rejected.
fn check_province_names(dataset: &Dataset) {
    let Some(col) = dataset.province_columns.get(Concept::Province) else {
        log::warn!(
            "{PROVINCE_SHEET} has no province column; columns are {:?}",
            dataset.provinces.columns
        );
        return;
    };
    let mut seen = BTreeSet::new();
    for row in 0..dataset.provinces.len() {
        match dataset.provinces.text(row, col) {
            Some(name) => {
                if !seen.insert(name.clone()) {
                    log::warn!("Duplicate province name '{name}' in {PROVINCE_SHEET}");
                }
            }
            None => log::warn!("Blank province name in {PROVINCE_SHEET} row {}", row + 2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testutil::{write_workbook, FixtureCell, SheetFixture};

    fn sample_sheets() -> Vec<SheetFixture> {
        vec![
            SheetFixture::new(PROVINCE_SHEET, &["PROVINSI", "PENDUDUK_MISKIN", "TPT (%)"])
                .row_mixed(&["ACEH"], &[806.8, 5.75])
                .row_mixed(&["BALI"], &[176.9, 2.69]),
            SheetFixture::new(REGENCY_SHEET, &["PROVINSI", "KABUPATEN/KOTA", "KEMISKINAN"])
                .row_mixed(&["ACEH", "SIMEULUE"], &[17.6]),
            SheetFixture::new(LABOR_SHEET, &["PROVINSI", "LAKI-LAKI", "PEREMPUAN"]),
        ]
    }

    #[test]
    fn loads_all_three_sheets() {
        let (_dir, path) = write_workbook(&sample_sheets());
        let ds = load(&path).expect("load");
        assert_eq!(ds.provinces.len(), 2);
        assert_eq!(ds.regencies.len(), 1);
        assert!(ds.labor.is_empty());
        assert_eq!(ds.labor.columns, vec!["PROVINSI", "LAKI-LAKI", "PEREMPUAN"]);
        assert_eq!(ds.provinces.numeric(1, "PENDUDUK_MISKIN"), Some(176.9));
        assert_eq!(ds.province_names(), vec!["ACEH", "BALI"]);
    }

    #[test]
    fn blank_rows_skipped_and_blank_headers_named() {
        let mut sheets = sample_sheets();
        sheets[0] = SheetFixture::new(PROVINCE_SHEET, &["PROVINSI", "", "TPT (%)"])
            .row_mixed(&["ACEH"], &[1.0, 5.75])
            .row(vec![FixtureCell::Blank, FixtureCell::Blank, FixtureCell::Blank])
            .row(vec![
                FixtureCell::Text("BALI".into()),
                FixtureCell::Blank,
                FixtureCell::Number(2.69),
            ]);
        let (_dir, path) = write_workbook(&sheets);
        let ds = load(&path).expect("load");
        assert_eq!(ds.provinces.columns, vec!["PROVINSI", "Unnamed: 1", "TPT (%)"]);
        assert_eq!(ds.province_names(), vec!["ACEH", "BALI"]);
        assert_eq!(ds.provinces.numeric(1, "Unnamed: 1"), None);
    }

    #[test]
    fn missing_source_is_distinct_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.xlsx");
        let err = load(&path).unwrap_err();
        assert_eq!(err, LoadError::SourceNotFound(path.clone()));
        assert!(err.to_string().starts_with("source not found: "));
    }

    #[test]
    fn missing_sheet_is_sheet_error() {
        let mut sheets = sample_sheets();
        sheets.pop();
        let (_dir, path) = write_workbook(&sheets);
        let err = load(&path).unwrap_err();
        assert!(matches!(err, LoadError::Sheet(ref d) if d.contains(LABOR_SHEET)));
        assert!(err.to_string().starts_with("sheet error: "));
    }

    #[test]
    fn header_only_province_sheet_is_empty_data() {
        let mut sheets = sample_sheets();
        sheets[0] = SheetFixture::new(PROVINCE_SHEET, &["PROVINSI", "PENDUDUK_MISKIN"]);
        let (_dir, path) = write_workbook(&sheets);
        assert_eq!(load(&path).unwrap_err(), LoadError::EmptyProvinceData);
    }

    #[test]
    fn corrupt_file_is_load_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"definitely not a zip archive").expect("write");
        let err = load(&path).unwrap_err();
        assert!(matches!(err, LoadError::Load(_)));
        assert!(err.to_string().starts_with("load error: "));
    }

    #[test]
    fn cache_serves_second_call_without_reading() {
        let (_dir, path) = write_workbook(&sample_sheets());
        let mut cache = LoadCache::default();
        let first = cache.get_or_load(&path).expect("first load");
        std::fs::remove_file(&path).expect("remove");
        let second = cache.get_or_load(&path).expect("cached load");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[test]
    fn cache_keeps_failures_until_invalidated() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("later.xlsx");
        let mut cache = LoadCache::default();
        assert!(cache.get_or_load(&path).is_err());

        let (_src_dir, src) = write_workbook(&sample_sheets());
        std::fs::copy(&src, &path).expect("copy");
        assert!(cache.get_or_load(&path).is_err());

        cache.invalidate(&path);
        assert!(cache.get_or_load(&path).is_ok());
    }
}
