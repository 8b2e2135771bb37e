use crate::block::BlockType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlockError {
    #[error("Unknown block type: {0}")]
    UnknownType(String),

    #[error("Block type '{0}' cannot be created on its own")]
    NotStandalone(BlockType),

    #[error("Invalid block overrides: {0}")]
    InvalidOverrides(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type BlockResult<T> = Result<T, BlockError>;
