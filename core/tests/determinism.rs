//! Two loads of the same sheets, same threshold.
//! They must produce identical merged tables and identical reports.

use std::path::PathBuf;
use utility_risk_core::{config::DashboardConfig, loader, risk_scorer};

fn sample_config() -> DashboardConfig {
    let data_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../data");
    DashboardConfig::load(data_dir).expect("sample config")
}

#[test]
fn same_sheets_produce_identical_reports() {
    let config = sample_config();

    let table_a = loader::load_merged(&config).expect("load a");
    let table_b = loader::load_merged(&config).expect("load b");
    assert_eq!(table_a.records, table_b.records);

    for threshold in [100.0, 200.0, 350.0, 500.0] {
        let a = risk_scorer::score_with(&table_a.records, threshold, &config.scoring).unwrap();
        let b = risk_scorer::score_with(&table_b.records, threshold, &config.scoring).unwrap();
        assert_eq!(a.records.len(), b.records.len());
        for (i, (x, y)) in a.records.iter().zip(&b.records).enumerate() {
            assert_eq!(x, y, "Scored record {i} diverged at threshold {threshold}");
        }
        assert_eq!(a.total_loss.to_bits(), b.total_loss.to_bits());
    }
}
