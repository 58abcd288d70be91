use thiserror::Error;

/// Failures while writing trajectory data
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write trajectory: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode trajectory as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("frame at t = {time} mixes {expected}D and {actual}D positions")]
    MixedDimensions {
        time: f64,
        expected: usize,
        actual: usize,
    },
}
