//! The Record entity — one row of the merged customer/transaction/usage table.

use crate::types::{CustomerId, Somoni};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub customer_id:        CustomerId,
    pub transaction_id:     String,
    pub resource_type:      String,
    pub total_debt:         Somoni,
    pub transaction_amount: Somoni,
    pub usage_volume:       f64,
}

impl Record {
    /// Numeric fields by column name, in correlation-matrix order.
    pub fn numeric_fields(&self) -> [(&'static str, f64); 3] {
        [
            ("total_debt",         self.total_debt),
            ("transaction_amount", self.transaction_amount),
            ("usage_volume",       self.usage_volume),
        ]
    }
}

/// A Record plus the fields derived by the risk scorer.
/// Never persisted — rebuilt on every scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub record:             Record,
    pub usage_z_score:      f64,
    pub is_overdue:         bool,
    pub is_usage_anomalous: bool,
    pub is_risk:            bool,
    pub estimated_loss:     Somoni,
}

// ── Sheet rows ─────────────────────────────────────────────────────
// One struct per input sheet. Header aliases accept the source
// Russian column names as well as the English ones.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRow {
    #[serde(alias = "ID клиента")]
    pub customer_id: CustomerId,
    #[serde(alias = "Общая задолженность (сомони)")]
    pub total_debt:  Somoni,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRow {
    #[serde(alias = "ID транзакции")]
    pub transaction_id: String,
    #[serde(alias = "ID клиента")]
    pub customer_id:    CustomerId,
    #[serde(alias = "Сумма (сомони)")]
    pub amount:         Somoni,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRow {
    #[serde(alias = "ID клиента")]
    pub customer_id:   CustomerId,
    #[serde(alias = "Тип ресурса")]
    pub resource_type: String,
    #[serde(alias = "Объем потребления")]
    pub usage_volume:  f64,
}
