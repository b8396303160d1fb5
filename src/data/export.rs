use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::Table;

/// Write `table` as CSV: original headers, empty strings for empty cells.
pub fn write_csv<W: Write>(table: &Table, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(&table.columns)
        .context("writing CSV header")?;
    for (i, row) in table.rows.iter().enumerate() {
        writer
            .write_record(row.iter().map(|cell| cell.to_string()))
            .with_context(|| format!("writing CSV row {i}"))?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

/// Export the filtered view to a CSV file at `path`.
pub fn export_csv(table: &Table, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(table, file)?;
    log::info!("Exported {} rows to {}", table.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    #[test]
    fn writes_header_and_rows() {
        let mut t = Table::new(
            "DATA_PROVINSI",
            vec!["PROVINSI".into(), "TPT (%)".into(), "PENDUDUK_MISKIN".into()],
        );
        t.push_row(vec![
            CellValue::String("DKI JAKARTA".into()),
            CellValue::Float(6.21),
            CellValue::Empty,
        ]);
        t.push_row(vec![
            CellValue::String("JAWA BARAT, X".into()),
            CellValue::Integer(7),
            CellValue::Float(3_890.5),
        ]);

        let mut buf = Vec::new();
        write_csv(&t, &mut buf).expect("csv");
        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(
            text,
            "PROVINSI,TPT (%),PENDUDUK_MISKIN\nDKI JAKARTA,6.21,\n\"JAWA BARAT, X\",7,3890.5\n"
        );
    }

    #[test]
    fn export_to_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("filtered.csv");
        let t = Table::new("DATA_PROVINSI", vec!["PROVINSI".into()]);
        export_csv(&t, &path).expect("export");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "PROVINSI\n");
    }
}
