//! Utility risk dashboard core.
//!
//! Loads the customer, transaction and resource-usage sheets, merges them,
//! builds chart data, and scores every merged record for debt and usage risk.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod loader;
pub mod record;
pub mod risk_scorer;
pub mod stats;
pub mod store;
pub mod types;
pub mod visualize;
