//! Chart data for the dashboard: debt histogram, usage box plots per
//! resource type, and the correlation matrix of the numeric columns.
//!
//! Pure presentation inputs. Nothing here feeds back into risk scoring.

use crate::{
    record::Record,
    stats::{pearson, quantile_sorted},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const WHISKER_IQR: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub column: String,
    pub bins:   Vec<HistogramBin>,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlot {
    pub resource_type: String,
    pub count:         usize,
    pub min:           f64,
    pub q1:            f64,
    pub median:        f64,
    pub q3:            f64,
    pub max:           f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers:      Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major. None where a column has zero variance.
    pub values:  Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == row)?;
        let j = self.columns.iter().position(|c| c == col)?;
        self.values[i][j]
    }
}

/// Everything the dashboard draws. Independent of the debt threshold,
/// so the shell computes it once per loaded table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visuals {
    pub debt_histogram:     Histogram,
    pub usage_box_plots:    Vec<BoxPlot>,
    pub correlation_matrix: CorrelationMatrix,
}

pub fn build_visuals(records: &[Record], histogram_bins: usize) -> Visuals {
    Visuals {
        debt_histogram:     debt_histogram(records, histogram_bins),
        usage_box_plots:    usage_box_plots(records),
        correlation_matrix: correlation_matrix(records),
    }
}

/// Equal-width bins over total_debt. A zero range collapses to one bin.
pub fn debt_histogram(records: &[Record], bins: usize) -> Histogram {
    let values: Vec<f64> = records.iter().map(|r| r.total_debt).collect();
    histogram("total_debt", &values, bins)
}

fn histogram(column: &str, values: &[f64], bins: usize) -> Histogram {
    let column = column.to_string();
    if values.is_empty() || bins == 0 {
        return Histogram { column, bins: Vec::new() };
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == min {
        return Histogram {
            column,
            bins: vec![HistogramBin { lower: min, upper: max, count: values.len() }],
        };
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in values {
        // The top edge belongs to the last bin.
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count,
        })
        .collect();
    Histogram { column, bins }
}

/// Five-number summary of usage_volume per resource type, sorted by type.
pub fn usage_box_plots(records: &[Record]) -> Vec<BoxPlot> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in records {
        groups.entry(r.resource_type.as_str()).or_default().push(r.usage_volume);
    }

    groups
        .into_iter()
        .filter_map(|(resource_type, mut values)| {
            values.sort_by(f64::total_cmp);
            box_plot(resource_type, &values)
        })
        .collect()
}

fn box_plot(resource_type: &str, sorted: &[f64]) -> Option<BoxPlot> {
    let q1 = quantile_sorted(sorted, 0.25)?;
    let median = quantile_sorted(sorted, 0.5)?;
    let q3 = quantile_sorted(sorted, 0.75)?;
    let iqr = q3 - q1;
    let fence_lo = q1 - WHISKER_IQR * iqr;
    let fence_hi = q3 + WHISKER_IQR * iqr;

    // Whiskers reach the most extreme values still inside the fences.
    let lower_whisker = sorted.iter().copied().find(|v| *v >= fence_lo).unwrap_or(q1);
    let upper_whisker = sorted.iter().rev().copied().find(|v| *v <= fence_hi).unwrap_or(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < fence_lo || *v > fence_hi)
        .collect();

    Some(BoxPlot {
        resource_type: resource_type.to_string(),
        count: sorted.len(),
        min: sorted[0],
        q1,
        median,
        q3,
        max: sorted[sorted.len() - 1],
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

/// Pearson correlation over total_debt, transaction_amount, usage_volume.
pub fn correlation_matrix(records: &[Record]) -> CorrelationMatrix {
    let columns: Vec<&'static str> = match records.first() {
        Some(r) => r.numeric_fields().iter().map(|(name, _)| *name).collect(),
        None => return CorrelationMatrix { columns: Vec::new(), values: Vec::new() },
    };
    let data: Vec<Vec<f64>> = (0..columns.len())
        .map(|i| records.iter().map(|r| r.numeric_fields()[i].1).collect())
        .collect();

    let values = (0..columns.len())
        .map(|i| {
            (0..columns.len())
                .map(|j| pearson(&data[i], &data[j]))
                .collect()
        })
        .collect();

    CorrelationMatrix {
        columns: columns.into_iter().map(String::from).collect(),
        values,
    }
}
