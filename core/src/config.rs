use crate::{
    error::{RiskError, RiskResult},
    stats::DeviationKind,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File names of the three sheet exports, relative to the data directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetFiles {
    pub customers:    String,
    pub transactions: String,
    pub usage:        String,
}

impl Default for SheetFiles {
    fn default() -> Self {
        Self {
            customers:    "sheets/customers.csv".into(),
            transactions: "sheets/transactions.csv".into(),
            usage:        "sheets/usage.csv".into(),
        }
    }
}

/// The debt-threshold slider exposed by the dashboard shell.
/// Bounds are UI policy; the scorer itself accepts any finite non-negative value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdSlider {
    pub label:         String,
    pub min_value:     f64,
    pub max_value:     f64,
    pub default_value: f64,
    pub step_size:     f64,
}

impl Default for ThresholdSlider {
    fn default() -> Self {
        Self {
            label:         "Debt threshold (somoni)".into(),
            min_value:     100.0,
            max_value:     500.0,
            default_value: 200.0,
            step_size:     1.0,
        }
    }
}

impl ThresholdSlider {
    /// Clamp to [min, max] and snap to the nearest step above min.
    pub fn snap(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min_value, self.max_value);
        if self.step_size <= 0.0 {
            return clamped;
        }
        let steps = ((clamped - self.min_value) / self.step_size).round();
        (self.min_value + steps * self.step_size).min(self.max_value)
    }

    fn validate(&self) -> RiskResult<()> {
        let finite = [self.min_value, self.max_value, self.default_value, self.step_size]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.min_value < 0.0 || self.min_value > self.max_value {
            return Err(RiskError::invalid(format!(
                "threshold slider bounds [{}, {}] are not a finite non-negative range",
                self.min_value, self.max_value
            )));
        }
        if !(self.min_value..=self.max_value).contains(&self.default_value) {
            return Err(RiskError::invalid(format!(
                "threshold default {} outside [{}, {}]",
                self.default_value, self.min_value, self.max_value
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub deviation: DeviationKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub title:          String,
    pub histogram_bins: usize,
    pub preview_rows:   usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title:          "Utility economic-security threat monitoring".into(),
            histogram_bins: 30,
            preview_rows:   5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct DashboardFile {
    #[serde(default)]
    sheets:    SheetFiles,
    #[serde(default)]
    threshold: ThresholdSlider,
    #[serde(default)]
    scoring:   ScoringConfig,
    #[serde(default)]
    display:   DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub data_dir:  PathBuf,
    pub sheets:    SheetFiles,
    pub threshold: ThresholdSlider,
    pub scoring:   ScoringConfig,
    pub display:   DisplayConfig,
}

impl DashboardConfig {
    /// Load from `{data_dir}/config/dashboard.json`.
    /// In tests, use DashboardConfig::default_test().
    pub fn load(data_dir: impl AsRef<Path>) -> RiskResult<Self> {
        let data_dir = data_dir.as_ref();
        let path = data_dir.join("config").join("dashboard.json");
        let content = std::fs::read_to_string(&path).map_err(|source| RiskError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file: DashboardFile = serde_json::from_str(&content)?;

        let config = Self {
            data_dir:  data_dir.to_path_buf(),
            sheets:    file.sheets,
            threshold: file.threshold,
            scoring:   file.scoring,
            display:   file.display,
        };
        config.threshold.validate()?;
        if config.display.histogram_bins == 0 {
            return Err(RiskError::invalid("display.histogram_bins must be at least 1"));
        }
        log::debug!("Loaded dashboard config from {}", path.display());
        Ok(config)
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            data_dir:  PathBuf::from("./data"),
            sheets:    SheetFiles::default(),
            threshold: ThresholdSlider::default(),
            scoring:   ScoringConfig::default(),
            display:   DisplayConfig::default(),
        }
    }

    /// Same defaults, reading sheets from `data_dir`.
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default_test()
        }
    }

    pub fn customers_path(&self) -> PathBuf {
        self.data_dir.join(&self.sheets.customers)
    }

    pub fn transactions_path(&self) -> PathBuf {
        self.data_dir.join(&self.sheets.transactions)
    }

    pub fn usage_path(&self) -> PathBuf {
        self.data_dir.join(&self.sheets.usage)
    }
}
