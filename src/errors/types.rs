use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhalanxError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Container error: {0}")]
    Container(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Report serialization error: {0}")]
    Serialization(String),

    #[error("Scan failed: {0}")]
    ScanFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Docker error: {0}")]
    Docker(#[from] bollard::errors::Error),
}

impl PhalanxError {
    /// Process exit code for this error, used by `main`.
    pub fn exit_code(&self) -> i32 {
        match self {
            PhalanxError::Config(_) => 2,
            PhalanxError::Container(_) | PhalanxError::Docker(_) => 3,
            PhalanxError::ScanFailed(_) => 4,
            PhalanxError::InvalidTarget(_) => 5,
            _ => 1,
        }
    }
}
