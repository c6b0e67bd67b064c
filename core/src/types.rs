//! Shared primitive types used across the dashboard.

/// Customer identifier — the join key shared by all three sheets.
pub type CustomerId = String;

/// A monetary amount in somoni.
pub type Somoni = f64;

/// The fixed |z| cutoff above which usage counts as anomalous.
pub const USAGE_ANOMALY_CUTOFF: f64 = 3.0;
