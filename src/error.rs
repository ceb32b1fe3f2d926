use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrScoreError {
    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid change request: {0}")]
    InvalidRequest(String),

    #[error("change request parse error: {0}")]
    RequestParse(String),

    #[error("scoring failed: {0}")]
    ScoringFailure(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("telemetry error: {0}")]
    Telemetry(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PrScoreError>;
