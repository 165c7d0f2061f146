use std::f64::consts::PI;

use crate::data::model::{PatientRecord, PatientTable};
use crate::error::Result;

/// Composite score columns, in plotting order (left to right).
pub const COMPOSITE_COLUMNS: [&str; 3] = ["Q_GIS", "Qn", "Qn_PMS"];

pub const HISTOGRAM_BINS: usize = 20;

/// Samples along the x range used to draw the density overlay.
pub const DENSITY_POINTS: usize = 200;

// ---------------------------------------------------------------------------
// DistributionSummary
// ---------------------------------------------------------------------------

/// Population values of one composite column plus an optional marker for
/// the selected patient.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionSummary {
    pub column: String,
    pub values: Vec<f64>,
    pub median: f64,
    pub marker_value: Option<f64>,
}

impl DistributionSummary {
    pub fn new(column: &str, values: Vec<f64>, marker_value: Option<f64>) -> Self {
        let median = median(&values);
        DistributionSummary {
            column: column.to_string(),
            values,
            median,
            marker_value,
        }
    }

    pub fn title(&self) -> String {
        format!("Distribution of {} Values", self.column)
    }

    pub fn median_label(&self) -> String {
        format!("Median: {:.2}", self.median)
    }

    pub fn marker_label(&self) -> Option<String> {
        self.marker_value.map(|v| format!("Patient: {v:.2}"))
    }

    pub fn histogram(&self) -> Histogram {
        Histogram::new(&self.values, HISTOGRAM_BINS)
    }

    /// Density curve over the histogram's range, scaled to bar counts.
    pub fn density_curve(&self, histogram: &Histogram) -> Vec<[f64; 2]> {
        let scale = self.values.len() as f64 * histogram.bin_width;
        let end = histogram.end();
        let step = (end - histogram.start) / (DENSITY_POINTS - 1) as f64;
        let grid: Vec<f64> = (0..DENSITY_POINTS)
            .map(|i| histogram.start + i as f64 * step)
            .collect();
        gaussian_kde(&self.values, &grid)
            .map(|density| {
                grid.iter()
                    .zip(density)
                    .map(|(&x, d)| [x, d * scale])
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// One summary per composite column. `selected` only sets the marker; the
/// population values always cover every row.
pub fn compute_distributions(
    table: &PatientTable,
    selected: Option<&PatientRecord>,
) -> Result<[DistributionSummary; 3]> {
    let [q_gis, qn, qn_pms] = COMPOSITE_COLUMNS;
    Ok([
        summarize(table, q_gis, selected)?,
        summarize(table, qn, selected)?,
        summarize(table, qn_pms, selected)?,
    ])
}

fn summarize(
    table: &PatientTable,
    column: &str,
    selected: Option<&PatientRecord>,
) -> Result<DistributionSummary> {
    let values = table.column(column)?;
    let marker_value = match selected {
        Some(row) => row.numeric(column)?,
        None => None,
    };
    Ok(DistributionSummary::new(column, values, marker_value))
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Standard median: middle element, or mean of the two middle elements.
/// NaN for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

fn sample_std(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / (n - 1.0)).sqrt()
}

/// Gaussian kernel density estimate at each grid point, bandwidth by
/// Scott's rule. `None` when fewer than two values or zero spread.
pub fn gaussian_kde(values: &[f64], grid: &[f64]) -> Option<Vec<f64>> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let bandwidth = sample_std(values) * n.powf(-0.2);
    if !bandwidth.is_finite() || bandwidth <= 0.0 {
        return None;
    }
    let norm = 1.0 / (n * bandwidth * (2.0 * PI).sqrt());
    Some(
        grid.iter()
            .map(|&x| {
                let sum: f64 = values
                    .iter()
                    .map(|&v| {
                        let z = (x - v) / bandwidth;
                        (-0.5 * z * z).exp()
                    })
                    .sum();
                sum * norm
            })
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width bins over `[min, max]` of the data.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub start: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn new(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let (start, span) = if values.is_empty() {
            (0.0, 1.0)
        } else if (max - min).abs() < f64::EPSILON {
            (min - 0.5, 1.0)
        } else {
            (min, max - min)
        };
        let bin_width = span / bins as f64;

        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = ((v - start) / bin_width).floor() as usize;
            counts[idx.min(bins - 1)] += 1;
        }

        Histogram {
            start,
            bin_width,
            counts,
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.bin_width * self.counts.len() as f64
    }

    pub fn bin_center(&self, i: usize) -> f64 {
        self.start + (i as f64 + 0.5) * self.bin_width
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;
    use crate::data::model::{FieldValue, PATIENT_ID};
    use crate::error::DashboardError;

    fn table(rows: &[(&str, f64, f64, f64)]) -> PatientTable {
        PatientTable::from_records(
            rows.iter()
                .map(|&(id, q_gis, qn, qn_pms)| {
                    record(&[
                        (PATIENT_ID, FieldValue::Text(id.into())),
                        ("Q_GIS", FieldValue::Float(q_gis)),
                        ("Qn", FieldValue::Float(qn)),
                        ("Qn_PMS", FieldValue::Float(qn_pms)),
                    ])
                })
                .collect(),
        )
    }

    fn sample() -> PatientTable {
        table(&[
            ("A", 0.1, 1.0, 10.0),
            ("B", 0.4, 2.0, 20.0),
            ("C", 0.2, 3.0, 30.0),
            ("D", 0.3, 4.0, 40.0),
        ])
    }

    #[test]
    fn median_even_and_odd() {
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5);
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[7.0]), 7.0);
        assert!(median(&[]).is_nan());
    }

    #[test]
    fn qn_scenario_median() {
        let dists = compute_distributions(&sample(), None).unwrap();
        assert_eq!(dists[1].column, "Qn");
        assert_eq!(dists[1].median, 2.5);
    }

    #[test]
    fn columns_come_in_plot_order() {
        let dists = compute_distributions(&sample(), None).unwrap();
        let names: Vec<&str> = dists.iter().map(|d| d.column.as_str()).collect();
        assert_eq!(names, ["Q_GIS", "Qn", "Qn_PMS"]);
    }

    #[test]
    fn selection_only_adds_a_marker() {
        let t = sample();
        let none = compute_distributions(&t, None).unwrap();
        for id in ["A", "B", "C", "D"] {
            let row = t.row(id).unwrap();
            let with = compute_distributions(&t, Some(row)).unwrap();
            for (a, b) in none.iter().zip(with.iter()) {
                assert_eq!(a.values, b.values);
                assert_eq!(a.median, b.median);
                assert!(a.marker_value.is_none());
                assert!(b.marker_value.is_some());
            }
        }
        let c = compute_distributions(&t, Some(t.row("C").unwrap())).unwrap();
        assert_eq!(c[0].marker_value, Some(0.2));
        assert_eq!(c[2].marker_value, Some(30.0));
    }

    #[test]
    fn repeated_calls_agree() {
        let t = sample();
        let row = t.row("B").unwrap();
        assert_eq!(
            compute_distributions(&t, Some(row)).unwrap(),
            compute_distributions(&t, Some(row)).unwrap()
        );
    }

    #[test]
    fn missing_composite_column_is_reported() {
        let t = PatientTable::from_records(vec![record(&[
            (PATIENT_ID, FieldValue::Text("A".into())),
            ("Qn", FieldValue::Float(1.0)),
        ])]);
        assert_eq!(
            compute_distributions(&t, None).unwrap_err(),
            DashboardError::ColumnNotFound("Q_GIS".into())
        );
    }

    #[test]
    fn labels_use_two_decimals() {
        let summary = DistributionSummary::new("Qn", vec![1.0, 2.0], Some(0.456));
        assert_eq!(summary.title(), "Distribution of Qn Values");
        assert_eq!(summary.median_label(), "Median: 1.50");
        assert_eq!(summary.marker_label().as_deref(), Some("Patient: 0.46"));

        let unmarked = DistributionSummary::new("Qn", vec![1.0], None);
        assert_eq!(unmarked.marker_label(), None);
    }

    #[test]
    fn histogram_has_twenty_bins_covering_all_values() {
        let values: Vec<f64> = (0..100).map(|i| i as f64 / 10.0).collect();
        let h = Histogram::new(&values, HISTOGRAM_BINS);
        assert_eq!(h.counts.len(), 20);
        assert_eq!(h.counts.iter().sum::<usize>(), 100);
        assert_eq!(h.start, 0.0);
        assert!((h.end() - 9.9).abs() < 1e-9);
        assert_eq!(h.counts[19], 5);
    }

    #[test]
    fn constant_column_gets_unit_range() {
        let h = Histogram::new(&[2.0, 2.0, 2.0], 20);
        assert_eq!(h.start, 1.5);
        assert!((h.end() - 2.5).abs() < 1e-12);
        assert_eq!(h.max_count(), 3);
        assert_eq!(h.counts.iter().sum::<usize>(), 3);
    }

    #[test]
    fn kde_is_symmetric_and_peaks_at_centre() {
        let values = [-1.0, 0.0, 1.0];
        let grid = [-2.0, 0.0, 2.0];
        let d = gaussian_kde(&values, &grid).unwrap();
        assert!((d[0] - d[2]).abs() < 1e-12);
        assert!(d[1] > d[0]);
        assert!(d.iter().all(|v| *v > 0.0));
    }

    #[test]
    fn kde_needs_spread() {
        assert!(gaussian_kde(&[1.0], &[1.0]).is_none());
        assert!(gaussian_kde(&[1.0, 1.0], &[1.0]).is_none());
    }

    #[test]
    fn density_curve_spans_histogram() {
        let summary = DistributionSummary::new("Qn", vec![1.0, 2.0, 2.5, 3.0, 4.0], None);
        let h = summary.histogram();
        let curve = summary.density_curve(&h);
        assert_eq!(curve.len(), DENSITY_POINTS);
        assert!((curve[0][0] - h.start).abs() < 1e-12);
        assert!((curve[DENSITY_POINTS - 1][0] - h.end()).abs() < 1e-9);
    }
}
