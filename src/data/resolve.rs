use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Concept – a semantic role a column can play
// ---------------------------------------------------------------------------

/// Semantic column roles looked up by keyword in the sheet headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Concept {
    Latitude,
    Longitude,
    Poverty,
    Province,
    Regency,
    UnemploymentRate,
    LaborMale,
    LaborFemale,
}

impl Concept {
    pub const ALL: [Concept; 8] = [
        Concept::Latitude,
        Concept::Longitude,
        Concept::Poverty,
        Concept::Province,
        Concept::Regency,
        Concept::UnemploymentRate,
        Concept::LaborMale,
        Concept::LaborFemale,
    ];

    /// Uppercase substrings tried in priority order.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Concept::Latitude => &["LATITUDE", "LAT"],
            Concept::Longitude => &["LONGITUDE", "LONG", "LON"],
            Concept::Poverty => &["PENDUDUK_MISKIN", "MISKIN", "KEMISKINAN", "POVERTY"],
            Concept::Province => &["PROVINSI", "PROV"],
            Concept::Regency => &["KABUPATEN", "KAB", "KOTA", "REGENCY"],
            Concept::UnemploymentRate => &["TPT", "PENGANGGURAN", "UNEMPLOYMENT"],
            // "MALE" would also match "FEMALE", so it is not a keyword here.
            Concept::LaborMale => &["LAKI-LAKI", "LAKI", "PRIA"],
            Concept::LaborFemale => &["PEREMPUAN", "WANITA", "FEMALE"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Concept::Latitude => "latitude",
            Concept::Longitude => "longitude",
            Concept::Poverty => "poverty",
            Concept::Province => "province",
            Concept::Regency => "regency/city",
            Concept::UnemploymentRate => "unemployment rate",
            Concept::LaborMale => "male participation",
            Concept::LaborFemale => "female participation",
        }
    }
}

/// Find the column playing `concept`.
///
/// Keywords are tried in priority order and, for each, columns in their
/// original order; the first column whose uppercased name contains the
/// keyword wins. `None` means the feature relying on it is unavailable.
pub fn resolve<S: AsRef<str>>(columns: &[S], concept: Concept) -> Option<String> {
    let upper: Vec<String> = columns
        .iter()
        .map(|c| c.as_ref().to_uppercase())
        .collect();
    concept.keywords().iter().find_map(|kw| {
        upper
            .iter()
            .position(|c| c.contains(kw))
            .map(|i| columns[i].as_ref().to_string())
    })
}

// ---------------------------------------------------------------------------
// ColumnMap – every concept resolved once per table
// ---------------------------------------------------------------------------

/// Resolved column names for one table, computed once after loading so that
/// every view agrees on which column plays which role.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMap {
    resolved: BTreeMap<Concept, String>,
}

impl ColumnMap {
    pub fn resolve_all<S: AsRef<str>>(columns: &[S]) -> Self {
        let resolved = Concept::ALL
            .iter()
            .filter_map(|&c| resolve(columns, c).map(|col| (c, col)))
            .collect();
        ColumnMap { resolved }
    }

    pub fn get(&self, concept: Concept) -> Option<&str> {
        self.resolved.get(&concept).map(String::as_str)
    }

    /// Concepts from `wanted` that could not be resolved.
    pub fn missing(&self, wanted: &[Concept]) -> Vec<Concept> {
        wanted
            .iter()
            .copied()
            .filter(|c| !self.resolved.contains_key(c))
            .collect()
    }
}
