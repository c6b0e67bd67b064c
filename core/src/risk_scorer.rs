//! Risk scorer — flags overdue debt and anomalous usage, estimates loss.
//!
//! Per record:
//!   1. usage_z_score      = standardized usage_volume over the whole snapshot
//!   2. is_overdue         = total_debt > threshold   (strict)
//!   3. is_usage_anomalous = |usage_z_score| > 3      (fixed cutoff)
//!   4. is_risk            = is_overdue || is_usage_anomalous
//!   5. estimated_loss     = is_risk ? transaction_amount + total_debt : 0
//!
//! RULES:
//!   - Pure: no I/O, no shared state, input is never mutated.
//!   - Zero or undefined usage deviation scores every record 0.0.

use crate::{
    config::ScoringConfig,
    error::{RiskError, RiskResult},
    record::{Record, ScoredRecord},
    stats::{self, compensated_sum},
    types::{Somoni, USAGE_ANOMALY_CUTOFF},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub threshold:             Somoni,
    pub records:               Vec<ScoredRecord>,
    pub total_loss:            Somoni,
    pub usage_mean:            f64,
    pub usage_std_dev:         f64,
    pub degenerate_statistics: bool,
    pub overdue_count:         usize,
    pub anomalous_count:       usize,
    pub risk_count:            usize,
}

/// Score with the default (sample-deviation) configuration.
pub fn score(records: &[Record], threshold: Somoni) -> RiskResult<RiskReport> {
    score_with(records, threshold, &ScoringConfig::default())
}

pub fn score_with(
    records: &[Record],
    threshold: Somoni,
    config: &ScoringConfig,
) -> RiskResult<RiskReport> {
    validate_threshold(threshold)?;
    validate_records(records)?;

    let usage: Vec<f64> = records.iter().map(|r| r.usage_volume).collect();
    let z = stats::standardize(&usage, config.deviation)?;
    if z.degenerate {
        log::warn!(
            "Usage deviation is degenerate over {} records (std_dev={}); no usage anomalies flagged",
            records.len(),
            z.std_dev
        );
    }

    let scored: Vec<ScoredRecord> = records
        .iter()
        .zip(&z.scores)
        .map(|(record, &usage_z_score)| score_record(record, usage_z_score, threshold))
        .collect();

    let total_loss = compensated_sum(scored.iter().map(|s| s.estimated_loss));
    let overdue_count = scored.iter().filter(|s| s.is_overdue).count();
    let anomalous_count = scored.iter().filter(|s| s.is_usage_anomalous).count();
    let risk_count = scored.iter().filter(|s| s.is_risk).count();

    log::debug!(
        "Scored {} records at threshold {threshold}: {risk_count} at risk, total loss {total_loss:.2}",
        scored.len()
    );

    Ok(RiskReport {
        threshold,
        records: scored,
        total_loss,
        usage_mean: z.mean,
        usage_std_dev: z.std_dev,
        degenerate_statistics: z.degenerate,
        overdue_count,
        anomalous_count,
        risk_count,
    })
}

fn score_record(record: &Record, usage_z_score: f64, threshold: Somoni) -> ScoredRecord {
    let is_overdue = record.total_debt > threshold;
    let is_usage_anomalous = usage_z_score.abs() > USAGE_ANOMALY_CUTOFF;
    let is_risk = is_overdue || is_usage_anomalous;
    let estimated_loss = if is_risk {
        record.transaction_amount + record.total_debt
    } else {
        0.0
    };

    ScoredRecord {
        record: record.clone(),
        usage_z_score,
        is_overdue,
        is_usage_anomalous,
        is_risk,
        estimated_loss,
    }
}

fn validate_threshold(threshold: Somoni) -> RiskResult<()> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(RiskError::invalid(format!(
            "threshold must be a finite non-negative number, got {threshold}"
        )));
    }
    Ok(())
}

fn validate_records(records: &[Record]) -> RiskResult<()> {
    if records.is_empty() {
        return Err(RiskError::invalid("record sequence is empty"));
    }
    for (i, record) in records.iter().enumerate() {
        for (field, value) in record.numeric_fields() {
            if !value.is_finite() {
                return Err(RiskError::invalid(format!(
                    "record {i} (customer {}): {field} is not a finite number ({value})",
                    record.customer_id
                )));
            }
        }
    }
    Ok(())
}
