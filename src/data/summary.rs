use super::model::Table;
use super::resolve::{ColumnMap, Concept};

// ---------------------------------------------------------------------------
// Headline metrics
// ---------------------------------------------------------------------------

/// Headline metrics over the filtered province table. A field is `None`
/// when its column is unresolved or has no numeric values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    pub total_poverty: Option<f64>,
    pub mean_poverty: Option<f64>,
    pub mean_unemployment_rate: Option<f64>,
}

pub fn summarize(table: &Table, columns: &ColumnMap) -> Summary {
    let values = |concept| {
        columns
            .get(concept)
            .map(|col| table.numeric_values(col))
            .unwrap_or_default()
    };
    let poverty = values(Concept::Poverty);
    let unemployment = values(Concept::UnemploymentRate);

    Summary {
        total_poverty: (!poverty.is_empty()).then(|| poverty.iter().sum()),
        mean_poverty: mean(&poverty),
        mean_unemployment_rate: mean(&unemployment),
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// `1,234K`, or `N/A`.
pub fn format_total(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}K", group_thousands(v.round() as i64)),
        None => "N/A".to_string(),
    }
}

/// `12.3K`, or `N/A`.
pub fn format_mean(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.1}K"))
}

/// `4.56%`, or `N/A`.
pub fn format_rate(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}%"))
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if n < 0 {
        out.insert(0, '-');
    }
    out
}

// ---------------------------------------------------------------------------
// Distribution statistics (boxplot)
// ---------------------------------------------------------------------------

/// Five-number summary plus mean, with Tukey whiskers (1.5 × IQR, clamped
/// to the data).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
}

impl BoxStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

        let lower_whisker = sorted.iter().copied().find(|&v| v >= lo_fence).unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= hi_fence)
            .unwrap_or(q3);

        Some(BoxStats {
            count: sorted.len(),
            min: sorted[0],
            q1,
            median,
            q3,
            max: sorted[sorted.len() - 1],
            mean: sorted.iter().sum::<f64>() / sorted.len() as f64,
            lower_whisker,
            upper_whisker,
        })
    }

    /// Values outside the whiskers.
    pub fn outliers(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .copied()
            .filter(|&v| v < self.lower_whisker || v > self.upper_whisker)
            .collect()
    }
}

/// Linear-interpolated quantile of pre-sorted, non-empty data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}
