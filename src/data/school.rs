use super::model::ProvinceRecord;

/// Header fragments marking school-participation columns.
pub const BRACKET_KEYWORDS: [&str; 5] = ["7-12", "13-15", "16-18", "19-23", "APS"];

/// School-participation values of one province, keyed by column name, in
/// column order. Only present, numeric values are included.
pub fn extract_age_brackets(record: &ProvinceRecord) -> Vec<(String, f64)> {
    record
        .measures
        .iter()
        .filter(|(col, _)| {
            let upper = col.to_uppercase();
            BRACKET_KEYWORDS.iter().any(|kw| upper.contains(kw))
        })
        .cloned()
        .collect()
}
