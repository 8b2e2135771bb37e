//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Block error: {0}")]
    Block(#[from] mailbuilder_blocks::BlockError),

    #[error("Storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Common(#[from] mailbuilder_common::CommonError),

    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Block {0} does not hold an image")]
    NotAnImage(String),
}
