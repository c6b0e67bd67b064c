//! Risk scorer integration tests: flags, loss totals, degenerate statistics,
//! and input validation.

use utility_risk_core::{
    config::ScoringConfig,
    error::RiskError,
    record::Record,
    risk_scorer::{score, score_with},
    stats::DeviationKind,
};

fn rec(i: usize, debt: f64, tx: f64, usage: f64) -> Record {
    Record {
        customer_id:        format!("C{i:03}"),
        transaction_id:     format!("T{i:04}"),
        resource_type:      "electricity".into(),
        total_debt:         debt,
        transaction_amount: tx,
        usage_volume:       usage,
    }
}

/// One overdue customer, one usage outlier, and a flat background
/// population that contributes no loss.
fn overdue_and_outlier() -> Vec<Record> {
    let mut records = vec![rec(0, 250.0, 50.0, 10.0), rec(1, 50.0, 20.0, 1000.0)];
    records.extend((2..20).map(|i| rec(i, 0.0, 0.0, 10.0)));
    records
}

#[test]
fn overdue_and_usage_outlier_both_count_as_loss() {
    let report = score(&overdue_and_outlier(), 200.0).unwrap();

    let first = &report.records[0];
    assert!(first.is_overdue, "250 > 200 must be overdue");
    assert!(!first.is_usage_anomalous);
    assert!(first.is_risk);
    assert_eq!(first.estimated_loss, 300.0);

    let second = &report.records[1];
    assert!(!second.is_overdue);
    assert!(
        second.usage_z_score > 3.0,
        "Outlier z-score should exceed 3, got {}",
        second.usage_z_score
    );
    assert!(second.is_usage_anomalous);
    assert!(second.is_risk);
    assert_eq!(second.estimated_loss, 70.0);

    assert!((report.total_loss - 370.0).abs() < 1e-9, "total_loss = {}", report.total_loss);
    assert_eq!(report.risk_count, 2);
    assert_eq!(report.overdue_count, 1);
    assert_eq!(report.anomalous_count, 1);
}

#[test]
fn identical_usage_is_degenerate_and_flags_nothing() {
    let records: Vec<Record> = (0..10).map(|i| rec(i, 100.0 + i as f64 * 30.0, 40.0, 55.0)).collect();
    let report = score(&records, 500.0).unwrap();

    assert!(report.degenerate_statistics);
    assert_eq!(report.usage_std_dev, 0.0);
    for r in &report.records {
        assert_eq!(r.usage_z_score, 0.0);
        assert!(!r.is_overdue);
        assert!(!r.is_usage_anomalous);
        assert!(!r.is_risk);
        assert_eq!(r.estimated_loss, 0.0);
    }
    assert_eq!(report.total_loss, 0.0);
}

#[test]
fn identical_inexact_usage_is_degenerate() {
    for (usage, n) in [(0.1, 3), (0.7, 3), (2.675, 5), (123.456, 10)] {
        let records: Vec<Record> = (0..n).map(|i| rec(i, 100.0, 40.0, usage)).collect();
        let report = score(&records, 500.0).unwrap();

        assert!(
            report.degenerate_statistics,
            "usage {usage} x {n} should be degenerate, std_dev = {}",
            report.usage_std_dev
        );
        assert_eq!(report.usage_std_dev, 0.0);
        assert!(report.records.iter().all(|r| r.usage_z_score == 0.0));
        assert_eq!(report.total_loss, 0.0);
    }
}

#[test]
fn single_record_is_scored_without_usage_anomaly() {
    let report = score(&[rec(0, 300.0, 25.0, 9_999.0)], 200.0).unwrap();
    assert!(report.degenerate_statistics);
    assert!(report.records[0].is_overdue);
    assert!(!report.records[0].is_usage_anomalous);
    assert_eq!(report.total_loss, 325.0);
}

#[test]
fn debt_equal_to_threshold_is_not_overdue() {
    let records = vec![rec(0, 200.0, 10.0, 1.0), rec(1, 200.01, 10.0, 2.0)];
    let report = score(&records, 200.0).unwrap();
    assert!(!report.records[0].is_overdue);
    assert!(report.records[1].is_overdue);
}

#[test]
fn zero_threshold_is_accepted() {
    let records = vec![rec(0, 0.0, 10.0, 1.0), rec(1, 0.5, 10.0, 2.0)];
    let report = score(&records, 0.0).unwrap();
    assert!(!report.records[0].is_overdue);
    assert!(report.records[1].is_overdue);
}

#[test]
fn threshold_outside_slider_range_is_still_valid_for_the_scorer() {
    let report = score(&overdue_and_outlier(), 10_000.0).unwrap();
    assert_eq!(report.overdue_count, 0);
    assert_eq!(report.threshold, 10_000.0);
}

#[test]
fn empty_input_is_rejected() {
    let err = score(&[], 200.0).unwrap_err();
    assert!(matches!(err, RiskError::InvalidInput { .. }), "got {err:?}");
}

#[test]
fn invalid_thresholds_are_rejected() {
    let records = overdue_and_outlier();
    for bad in [-1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = score(&records, bad).unwrap_err();
        assert!(
            matches!(err, RiskError::InvalidInput { .. }),
            "threshold {bad} should be rejected, got {err:?}"
        );
    }
}

#[test]
fn non_finite_fields_are_rejected() {
    let mut records = overdue_and_outlier();
    records[3].usage_volume = f64::NAN;
    let err = score(&records, 200.0).unwrap_err();
    match err {
        RiskError::InvalidInput { reason } => {
            assert!(reason.contains("usage_volume"), "reason: {reason}");
            assert!(reason.contains("record 3"), "reason: {reason}");
        }
        other => panic!("expected InvalidInput, got {other:?}"),
    }

    let mut records = overdue_and_outlier();
    records[0].transaction_amount = f64::INFINITY;
    assert!(score(&records, 200.0).is_err());
}

#[test]
fn scoring_does_not_mutate_input() {
    let records = overdue_and_outlier();
    let before = records.clone();
    let _ = score(&records, 200.0).unwrap();
    assert_eq!(records, before);
}

#[test]
fn scored_records_keep_input_order_and_fields() {
    let records = overdue_and_outlier();
    let report = score(&records, 200.0).unwrap();
    assert_eq!(report.records.len(), records.len());
    for (scored, original) in report.records.iter().zip(&records) {
        assert_eq!(&scored.record, original);
    }
}

#[test]
fn sample_deviation_shrinks_population_spread_of_scores() {
    let records: Vec<Record> = (0..8).map(|i| rec(i, 0.0, 0.0, (i * i) as f64)).collect();
    let n = records.len() as f64;

    let sample = score(&records, 200.0).unwrap();
    let population = score_with(
        &records,
        200.0,
        &ScoringConfig { deviation: DeviationKind::Population },
    )
    .unwrap();

    let pop_std = |zs: Vec<f64>| (zs.iter().map(|z| z * z).sum::<f64>() / n).sqrt();
    let s = pop_std(sample.records.iter().map(|r| r.usage_z_score).collect());
    let p = pop_std(population.records.iter().map(|r| r.usage_z_score).collect());

    assert!((p - 1.0).abs() < 1e-12, "population-normalized spread {p}");
    assert!((s - ((n - 1.0) / n).sqrt()).abs() < 1e-12, "sample-normalized spread {s}");
}

#[test]
fn usage_mean_and_deviation_are_reported() {
    let records = vec![rec(0, 0.0, 0.0, 2.0), rec(1, 0.0, 0.0, 4.0), rec(2, 0.0, 0.0, 6.0)];
    let report = score(&records, 200.0).unwrap();
    assert_eq!(report.usage_mean, 4.0);
    assert!((report.usage_std_dev - 2.0).abs() < 1e-12);
    assert!(!report.degenerate_statistics);
}
