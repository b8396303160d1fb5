use anyhow::{bail, Result};

use super::model::{LaborParticipationRecord, Table};
use super::resolve::{ColumnMap, Concept};

const REQUIRED: [Concept; 3] = [Concept::Province, Concept::LaborMale, Concept::LaborFemale];

/// Male/female participation per province, in sheet order.
///
/// Rows where either rate is missing or non-numeric are dropped. Fails when
/// a required column cannot be resolved or no row survives.
pub fn labor_participation(table: &Table, columns: &ColumnMap) -> Result<Vec<LaborParticipationRecord>> {
    let missing = columns.missing(&REQUIRED);
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|c| c.label()).collect();
        bail!(
            "required columns not found: {} (available: {})",
            names.join(", "),
            table.columns.join(", ")
        );
    }
    let col = |c| columns.get(c).unwrap_or_default();
    let (prov, male, female) = (
        col(Concept::Province),
        col(Concept::LaborMale),
        col(Concept::LaborFemale),
    );

    let records: Vec<LaborParticipationRecord> = (0..table.len())
        .filter_map(|row| {
            Some(LaborParticipationRecord {
                province: table.text(row, prov)?,
                male: table.numeric(row, male)?,
                female: table.numeric(row, female)?,
            })
        })
        .collect();

    let dropped = table.len() - records.len();
    if dropped > 0 {
        log::debug!("Dropped {dropped} labour rows with missing or non-numeric rates");
    }
    if records.is_empty() {
        bail!("labour participation data is invalid: all values empty or non-numeric");
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn labor(rows: Vec<Vec<CellValue>>) -> Table {
        let mut t = Table::new(
            "TPAK_JENISKELAMIN",
            vec!["PROVINSI".into(), "LAKI-LAKI".into(), "PEREMPUAN".into()],
        );
        for r in rows {
            t.push_row(r);
        }
        t
    }

    fn s(v: &str) -> CellValue {
        CellValue::String(v.into())
    }

    #[test]
    fn coerces_and_drops_bad_rows() {
        let t = labor(vec![
            vec![s("ACEH"), CellValue::Float(82.1), s("54.3")],
            vec![s("BALI"), s("n/a"), CellValue::Float(66.0)],
            vec![s("JAMBI"), CellValue::Integer(84), CellValue::Float(51.5)],
        ]);
        let cols = ColumnMap::resolve_all(&t.columns);
        let out = labor_participation(&t, &cols).expect("records");
        assert_eq!(
            out,
            vec![
                LaborParticipationRecord { province: "ACEH".into(), male: 82.1, female: 54.3 },
                LaborParticipationRecord { province: "JAMBI".into(), male: 84.0, female: 51.5 },
            ]
        );
    }

    #[test]
    fn all_invalid_is_an_error() {
        let t = labor(vec![vec![s("ACEH"), CellValue::Empty, s("x")]]);
        let cols = ColumnMap::resolve_all(&t.columns);
        let err = labor_participation(&t, &cols).unwrap_err();
        assert!(err.to_string().contains("non-numeric"));
    }

    #[test]
    fn missing_column_names_what_is_missing() {
        let t = Table::new("TPAK_JENISKELAMIN", vec!["PROVINSI".into(), "LAKI-LAKI".into()]);
        let cols = ColumnMap::resolve_all(&t.columns);
        let msg = labor_participation(&t, &cols).unwrap_err().to_string();
        assert!(msg.contains("female participation"));
        assert!(msg.contains("PROVINSI, LAKI-LAKI"));
    }
}
