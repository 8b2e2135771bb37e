use mailbuilder_blocks::BlockError;
use thiserror::Error;

/// Errors from loading, saving and inspecting templates
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("Block error: {0}")]
    Block(#[from] BlockError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File not found: {0}")]
    NotFound(String),
}

pub type CommonResult<T> = Result<T, CommonError>;
