use super::filter::SortOrder;
use super::model::{ProvinceRecord, Table};
use super::resolve::{ColumnMap, Concept};

/// Bars in the ranked bar charts.
pub const DEFAULT_TOP_N: usize = 10;

// ---------------------------------------------------------------------------
// Ranked bars
// ---------------------------------------------------------------------------

/// `(province, value)` for rows with a numeric `measure`, sorted in `order`
/// and cut to `limit`. Ties keep row order.
pub fn ranked(
    table: &Table,
    columns: &ColumnMap,
    measure: &str,
    order: SortOrder,
    limit: usize,
) -> Vec<(String, f64)> {
    let Some(name_col) = columns.get(Concept::Province) else {
        return Vec::new();
    };
    let mut pairs: Vec<(String, f64)> = (0..table.len())
        .filter_map(|row| Some((table.text(row, name_col)?, table.numeric(row, measure)?)))
        .collect();
    match order {
        SortOrder::Ascending => pairs.sort_by(|a, b| a.1.total_cmp(&b.1)),
        SortOrder::Descending => pairs.sort_by(|a, b| b.1.total_cmp(&a.1)),
    }
    pairs.truncate(limit);
    pairs
}

// ---------------------------------------------------------------------------
// Map bubbles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub province: String,
    pub latitude: f64,
    pub longitude: f64,
    pub poverty: f64,
    pub unemployment_rate: Option<f64>,
}

/// One bubble per province with numeric latitude, longitude and poverty.
pub fn map_points(table: &Table, columns: &ColumnMap) -> Vec<MapPoint> {
    let Some(poverty_col) = columns.get(Concept::Poverty) else {
        return Vec::new();
    };
    let unemployment_col = columns.get(Concept::UnemploymentRate);
    (0..table.len())
        .filter_map(|row| ProvinceRecord::from_row(table, columns, row))
        .filter_map(|rec| {
            Some(MapPoint {
                latitude: rec.latitude?,
                longitude: rec.longitude?,
                poverty: rec.measure(poverty_col)?,
                unemployment_rate: unemployment_col.and_then(|c| rec.measure(c)),
                province: rec.name,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Pie slices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    /// Share of the total, in `[0, 1]`.
    pub fraction: f64,
}

/// Slices for the positive values; nothing when the total is not positive.
pub fn pie_slices(values: &[(String, f64)]) -> Vec<PieSlice> {
    let total: f64 = values.iter().map(|(_, v)| v.max(0.0)).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    values
        .iter()
        .filter(|(_, v)| *v > 0.0)
        .map(|(label, v)| PieSlice {
            label: label.clone(),
            value: *v,
            fraction: v / total,
        })
        .collect()
}
