use thiserror::Error;

/// Errors raised by the fallible surfaces around the engine.
///
/// The engine operations themselves (`init`, `forward`, `train_step`) never fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid shape: {0}")]
    InvalidShape(String),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
