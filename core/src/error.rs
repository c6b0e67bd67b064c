use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("No rows left after {stage}")]
    EmptyDataset { stage: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl RiskError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        RiskError::InvalidInput { reason: reason.into() }
    }
}

pub type RiskResult<T> = Result<T, RiskError>;
