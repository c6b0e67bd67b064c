//! The dashboard shell — wires loader → visualizer → scorer.
//!
//! The merged table and the visuals are computed once when the dashboard
//! opens. Moving the threshold slider reruns only the risk scorer.

use crate::{
    config::DashboardConfig,
    error::{RiskError, RiskResult},
    loader::{self, MergedTable, SheetSummary},
    record::ScoredRecord,
    risk_scorer::{self, RiskReport},
    types::Somoni,
    visualize::{self, Visuals},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// What the front end shows after every interaction.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardState {
    pub title:                 String,
    pub generated_at:          DateTime<Utc>,
    pub threshold:             Somoni,
    pub threshold_min:         Somoni,
    pub threshold_max:         Somoni,
    pub record_count:          usize,
    pub overdue_count:         usize,
    pub anomalous_count:       usize,
    pub risk_count:            usize,
    pub total_loss:            Somoni,
    pub degenerate_statistics: bool,
    pub sheets:                Vec<SheetSummary>,
    pub preview:               Vec<ScoredRecord>,
}

pub struct Dashboard {
    config:  DashboardConfig,
    table:   MergedTable,
    visuals: Visuals,
    report:  RiskReport,
}

impl Dashboard {
    /// Load the sheets named in `config` and score at the slider default.
    pub fn open(config: DashboardConfig) -> RiskResult<Self> {
        let table = loader::load_merged(&config)?;
        Self::from_table(config, table)
    }

    /// Build from an already-merged table. Used by tests and tooling.
    pub fn from_table(config: DashboardConfig, table: MergedTable) -> RiskResult<Self> {
        let visuals = visualize::build_visuals(&table.records, config.display.histogram_bins);
        let threshold = config.threshold.snap(config.threshold.default_value);
        let report = risk_scorer::score_with(&table.records, threshold, &config.scoring)?;
        log::info!(
            "Dashboard ready: {} records, threshold {threshold}, total loss {:.2}",
            table.records.len(),
            report.total_loss
        );
        Ok(Self { config, table, visuals, report })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn table(&self) -> &MergedTable {
        &self.table
    }

    pub fn visuals(&self) -> &Visuals {
        &self.visuals
    }

    pub fn report(&self) -> &RiskReport {
        &self.report
    }

    pub fn threshold(&self) -> Somoni {
        self.report.threshold
    }

    /// Move the slider. Out-of-range values are clamped to the slider
    /// bounds; non-finite values are rejected and leave the state unchanged.
    /// Returns the threshold actually applied.
    pub fn set_threshold(&mut self, requested: f64) -> RiskResult<Somoni> {
        if !requested.is_finite() {
            return Err(RiskError::invalid(format!(
                "threshold must be a finite number, got {requested}"
            )));
        }
        let slider = &self.config.threshold;
        let applied = slider.snap(requested);
        if applied != requested {
            log::warn!(
                "Threshold {requested} adjusted to {applied} (slider range {}..={}, step {})",
                slider.min_value,
                slider.max_value,
                slider.step_size
            );
        }
        if applied == self.report.threshold {
            return Ok(applied);
        }

        self.report = risk_scorer::score_with(&self.table.records, applied, &self.config.scoring)?;
        Ok(applied)
    }

    pub fn state(&self) -> DashboardState {
        let report = &self.report;
        DashboardState {
            title:                 self.config.display.title.clone(),
            generated_at:          Utc::now(),
            threshold:             report.threshold,
            threshold_min:         self.config.threshold.min_value,
            threshold_max:         self.config.threshold.max_value,
            record_count:          report.records.len(),
            overdue_count:         report.overdue_count,
            anomalous_count:       report.anomalous_count,
            risk_count:            report.risk_count,
            total_loss:            report.total_loss,
            degenerate_statistics: report.degenerate_statistics,
            sheets:                self.table.sheets.clone(),
            preview:               report
                .records
                .iter()
                .take(self.config.display.preview_rows)
                .cloned()
                .collect(),
        }
    }
}
