use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoscaError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("group config error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("invalid target: {0}")]
    InvalidTarget(String),
    #[error("cell already settled: {0}")]
    AlreadyPaid(String),
    #[error("invoice issuance failed: {0}")]
    Issuance(String),
    #[error("issuance result discarded: {0}")]
    StaleIssuance(String),
    #[error("round out of range: {0}")]
    OutOfRange(String),
    #[error("validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, RoscaError>;
