//! Partial updates expressed as JSON objects.
//!
//! Factories and the store's update path both take a sparse record of
//! fields and shallow-merge it over a block's JSON form: every top-level key
//! in the patch replaces the block's key wholesale. The block's `id` and
//! `type` are never taken from a patch.

use crate::block::Block;
use crate::error::{BlockError, BlockResult};
use serde_json::{Map, Value};

/// Sparse field record, keyed by the block's camelCase JSON field names
pub type BlockPatch = Map<String, Value>;

const PROTECTED_KEYS: [&str; 2] = ["id", "type"];

/// Build a new block from `block` with `patch` shallow-merged over it.
///
/// The input is left untouched; a patch that does not produce a valid block
/// is reported as an error.
pub fn apply_patch(block: &Block, patch: &BlockPatch) -> BlockResult<Block> {
    let mut value = serde_json::to_value(block)?;
    let object = value.as_object_mut().ok_or_else(|| {
        BlockError::InvalidOverrides("block did not serialize to an object".to_string())
    })?;

    for (key, field) in patch {
        if PROTECTED_KEYS.contains(&key.as_str()) {
            continue;
        }
        object.insert(key.clone(), field.clone());
    }

    Ok(serde_json::from_value(value)?)
}

/// Convert an arbitrary JSON value into a patch, rejecting non-objects
pub fn patch_from_value(value: Value) -> BlockResult<BlockPatch> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(BlockError::InvalidOverrides(format!(
            "expected an object, got {}",
            other
        ))),
    }
}
