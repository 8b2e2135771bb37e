//! # Block Tree Mutations
//!
//! Semantic operations on an email's block tree.
//!
//! ## Mutation Semantics
//!
//! ### Add
//! - Inserts at the given index (clamped), or appends
//! - Fails if the target column does not exist
//! - Fails if a `columns` block would land inside a column
//!
//! ### Update
//! - Sparse field patch, shallow-merged over the block's JSON form
//! - `id` and `type` are never changed
//!
//! ### Move
//! - Detaches the block, then inserts it at the index of the target
//!   sequence after removal
//! - Moving to the block's own position is a no-op
//!
//! ### Duplicate
//! - Deep copy with fresh block and column ids, inserted right after the
//!   original in the same sequence

use crate::tree::{
    check_nesting, find_block, find_block_mut, insert_block, locate_block, regenerate_ids,
    remove_block, sequence_len,
};
use mailbuilder_blocks::{apply_patch, Block, BlockPatch, BlockType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Semantic mutations of the block tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all_fields = "camelCase")]
pub enum Mutation {
    /// Replace the whole tree
    SetBlocks { blocks: Vec<Block> },

    /// Insert a new block at the top level or into a column
    AddBlock {
        block: Block,
        index: Option<usize>,
        parent_column_id: Option<String>,
    },

    /// Shallow-merge fields into a block
    UpdateBlock { block_id: String, patch: BlockPatch },

    /// Remove a block (and its descendants) from wherever it lives
    DeleteBlock { block_id: String },

    /// Relocate a block
    MoveBlock {
        block_id: String,
        to_index: usize,
        parent_column_id: Option<String>,
    },

    /// Insert a fresh-id copy right after the original
    DuplicateBlock { block_id: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("A {block_type} block cannot be placed inside column {column_id}")]
    InvalidNesting {
        block_type: BlockType,
        column_id: String,
    },

    #[error("Block id already in use: {0}")]
    DuplicateId(String),

    #[error("Invalid patch for {block_id}: {reason}")]
    InvalidPatch { block_id: String, reason: String },

    #[error("Invalid block: {0}")]
    InvalidBlock(String),
}

/// What a successfully applied mutation did to the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// `false` when the tree is unchanged (e.g. a move onto itself)
    pub changed: bool,

    /// Block that should become selected, if any
    pub focus: Option<String>,
}

impl Applied {
    fn changed() -> Self {
        Self {
            changed: true,
            focus: None,
        }
    }

    fn unchanged() -> Self {
        Self {
            changed: false,
            focus: None,
        }
    }

    fn focusing(id: String) -> Self {
        Self {
            changed: true,
            focus: Some(id),
        }
    }
}

impl Mutation {
    /// Short label used as the history entry description
    pub fn description(&self) -> &'static str {
        match self {
            Mutation::SetBlocks { .. } => "Set blocks",
            Mutation::AddBlock { .. } => "Add block",
            Mutation::UpdateBlock { .. } => "Update block",
            Mutation::DeleteBlock { .. } => "Delete block",
            Mutation::MoveBlock { .. } => "Move block",
            Mutation::DuplicateBlock { .. } => "Duplicate block",
        }
    }

    /// Apply mutation to the tree with validation.
    ///
    /// On error the tree may be partially edited; callers apply to a
    /// working copy and discard it on failure.
    pub fn apply(&self, blocks: &mut Vec<Block>) -> Result<Applied, MutationError> {
        self.validate(blocks)?;

        match self {
            Mutation::SetBlocks { blocks: replacement } => {
                *blocks = replacement.clone();
                Ok(Applied::changed())
            }

            Mutation::AddBlock {
                block,
                index,
                parent_column_id,
            } => {
                insert_block(blocks, block.clone(), *index, parent_column_id.as_deref())?;
                Ok(Applied::focusing(block.id.clone()))
            }

            Mutation::UpdateBlock { block_id, patch } => Self::apply_update(blocks, block_id, patch),

            Mutation::DeleteBlock { block_id } => {
                remove_block(blocks, block_id)
                    .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;
                Ok(Applied::changed())
            }

            Mutation::MoveBlock {
                block_id,
                to_index,
                parent_column_id,
            } => Self::apply_move(blocks, block_id, *to_index, parent_column_id.as_deref()),

            Mutation::DuplicateBlock { block_id } => Self::apply_duplicate(blocks, block_id),
        }
    }

    fn apply_update(
        blocks: &mut [Block],
        block_id: &str,
        patch: &BlockPatch,
    ) -> Result<Applied, MutationError> {
        let block = find_block_mut(blocks, block_id)
            .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))?;

        let updated = apply_patch(block, patch).map_err(|e| MutationError::InvalidPatch {
            block_id: block_id.to_string(),
            reason: e.to_string(),
        })?;
        *block = updated;

        Ok(Applied::changed())
    }

    fn apply_move(
        blocks: &mut Vec<Block>,
        block_id: &str,
        to_index: usize,
        parent_column_id: Option<&str>,
    ) -> Result<Applied, MutationError> {
        let from = locate_block(blocks, block_id)
            .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))?;

        let block = remove_block(blocks, block_id)
            .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))?;

        let len = sequence_len(blocks, parent_column_id).ok_or_else(|| {
            MutationError::ColumnNotFound(parent_column_id.unwrap_or_default().to_string())
        })?;
        let at = to_index.min(len);

        if from.parent_column_id.as_deref() == parent_column_id && from.index == at {
            return Ok(Applied::unchanged());
        }

        insert_block(blocks, block, Some(at), parent_column_id)?;
        Ok(Applied::changed())
    }

    fn apply_duplicate(blocks: &mut Vec<Block>, block_id: &str) -> Result<Applied, MutationError> {
        let from = locate_block(blocks, block_id)
            .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))?;
        let original = find_block(blocks, block_id)
            .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))?;

        let mut copy = original.clone();
        regenerate_ids(&mut copy);
        let copy_id = copy.id.clone();

        insert_block(
            blocks,
            copy,
            Some(from.index + 1),
            from.parent_column_id.as_deref(),
        )?;
        Ok(Applied::focusing(copy_id))
    }

    /// Validate without applying
    pub fn validate(&self, blocks: &[Block]) -> Result<(), MutationError> {
        match self {
            Mutation::SetBlocks { .. } => Ok(()),

            Mutation::AddBlock {
                block,
                parent_column_id,
                ..
            } => {
                if find_block(blocks, &block.id).is_some() {
                    return Err(MutationError::DuplicateId(block.id.clone()));
                }
                check_nesting(block, parent_column_id.as_deref())?;
                if sequence_len(blocks, parent_column_id.as_deref()).is_none() {
                    return Err(MutationError::ColumnNotFound(
                        parent_column_id.clone().unwrap_or_default(),
                    ));
                }
                Ok(())
            }

            Mutation::UpdateBlock { block_id, .. }
            | Mutation::DeleteBlock { block_id }
            | Mutation::DuplicateBlock { block_id } => {
                find_block(blocks, block_id)
                    .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;
                Ok(())
            }

            Mutation::MoveBlock {
                block_id,
                parent_column_id,
                ..
            } => {
                let block = find_block(blocks, block_id)
                    .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;
                check_nesting(block, parent_column_id.as_deref())?;
                if sequence_len(blocks, parent_column_id.as_deref()).is_none() {
                    return Err(MutationError::ColumnNotFound(
                        parent_column_id.clone().unwrap_or_default(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Result of applying a mutation through the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationResult {
    /// Store version after the mutation
    pub version: u64,

    /// Whether the tree changed (and a history entry was recorded)
    pub changed: bool,
}
