#[derive(Debug, thiserror::Error)]
pub enum FlowplanError {
    #[error("spreadsheet decode failed: {0}")]
    Decode(String),

    #[error("datasets not ready: missing {0}")]
    NotReady(String),

    #[error("optimization service reported an error: {0}")]
    Service(String),

    #[error("optimization request failed: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
