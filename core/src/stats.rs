//! Descriptive statistics shared by the risk scorer and the visualizer.
//!
//! All functions take a borrowed slice and allocate at most one output vec.
//! Population statistics are computed once over the whole slice, never per
//! element.

use crate::error::{RiskError, RiskResult};
use serde::{Deserialize, Serialize};

/// Which denominator the standard deviation uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviationKind {
    /// n − 1 (Bessel-corrected). Matches the dashboard's historical output.
    #[default]
    Sample,
    /// n.
    Population,
}

/// Result of standardizing a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standardized {
    pub scores:     Vec<f64>,
    pub mean:       f64,
    pub std_dev:    f64,
    /// True when the deviation was zero, non-finite, or undefined (n < 2).
    /// Every score is 0.0 in that case.
    pub degenerate: bool,
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(compensated_sum(values.iter().copied()) / values.len() as f64)
}

/// Standard deviation around a precomputed mean.
/// None when the denominator would be zero.
pub fn std_dev(values: &[f64], mean: f64, kind: DeviationKind) -> Option<f64> {
    let n = values.len();
    let denom = match kind {
        DeviationKind::Sample     => n.checked_sub(1)?,
        DeviationKind::Population => n,
    };
    if denom == 0 {
        return None;
    }
    let sq = compensated_sum(values.iter().map(|v| (v - mean) * (v - mean)));
    Some((sq / denom as f64).sqrt())
}

/// (value − mean) / stddev for every value.
///
/// A zero or undefined deviation maps every score to 0.0 so that nothing
/// downstream compares against NaN or ∞. A constant column is detected
/// directly: its rounded mean can sit one ulp off the shared value and
/// leave a spurious tiny deviation.
pub fn standardize(values: &[f64], kind: DeviationKind) -> RiskResult<Standardized> {
    let first = *values
        .first()
        .ok_or_else(|| RiskError::invalid("cannot standardize an empty column"))?;
    if values.iter().all(|v| *v == first) {
        return Ok(Standardized {
            scores: vec![0.0; values.len()],
            mean: first,
            std_dev: 0.0,
            degenerate: true,
        });
    }

    let mean = mean(values).ok_or_else(|| RiskError::invalid("cannot standardize an empty column"))?;
    let std_dev = std_dev(values, mean, kind).unwrap_or(0.0);

    if !std_dev.is_finite() || std_dev == 0.0 {
        return Ok(Standardized {
            scores: vec![0.0; values.len()],
            mean,
            std_dev,
            degenerate: true,
        });
    }

    let scores = values.iter().map(|v| (v - mean) / std_dev).collect();
    Ok(Standardized { scores, mean, std_dev, degenerate: false })
}

/// Neumaier-compensated summation.
/// Keeps the total stable under reordering far better than a naive fold.
pub fn compensated_sum<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let mut sum = 0.0_f64;
    let mut compensation = 0.0_f64;
    for v in values {
        let t = sum + v;
        if sum.abs() >= v.abs() {
            compensation += (sum - t) + v;
        } else {
            compensation += (v - t) + sum;
        }
        sum = t;
    }
    sum + compensation
}

/// Linear-interpolated quantile of an ascending-sorted slice, q in [0, 1].
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Pearson correlation coefficient.
/// None when lengths differ, n < 2, or either column has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mx = mean(xs)?;
    let my = mean(ys)?;
    let cov = compensated_sum(xs.iter().zip(ys).map(|(x, y)| (x - mx) * (y - my)));
    let vx = compensated_sum(xs.iter().map(|x| (x - mx) * (x - mx)));
    let vy = compensated_sum(ys.iter().map(|y| (y - my) * (y - my)));
    if vx == 0.0 || vy == 0.0 {
        return None;
    }
    Some((cov / (vx.sqrt() * vy.sqrt())).clamp(-1.0, 1.0))
}
