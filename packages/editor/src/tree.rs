//! Lookups and structural edits over the block tree.
//!
//! Search order is breadth-first at the top level: every top-level block is
//! checked before any column is entered, then each column of each `columns`
//! block is searched recursively.

use crate::mutations::MutationError;
use mailbuilder_blocks::{generate_id, Block, BlockType, Column};
use mailbuilder_common::{walk_block_mut, walk_column_mut, VisitorMut};
use serde::{Deserialize, Serialize};

/// Where a block sits: the sequence that holds it and its index there
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockLocation {
    /// `None` for the top-level sequence
    pub parent_column_id: Option<String>,
    pub index: usize,
}

pub fn find_block<'a>(blocks: &'a [Block], id: &str) -> Option<&'a Block> {
    if let Some(block) = blocks.iter().find(|b| b.id == id) {
        return Some(block);
    }

    for block in blocks {
        for column in block.columns() {
            if let Some(found) = find_block(&column.children, id) {
                return Some(found);
            }
        }
    }

    None
}

pub fn find_block_mut<'a>(blocks: &'a mut [Block], id: &str) -> Option<&'a mut Block> {
    if let Some(pos) = blocks.iter().position(|b| b.id == id) {
        return Some(&mut blocks[pos]);
    }

    for block in blocks.iter_mut() {
        if let Some(columns) = block.columns_mut() {
            for column in columns.iter_mut() {
                if let Some(found) = find_block_mut(&mut column.children, id) {
                    return Some(found);
                }
            }
        }
    }

    None
}

pub fn find_column<'a>(blocks: &'a [Block], column_id: &str) -> Option<&'a Column> {
    for block in blocks {
        for column in block.columns() {
            if column.id == column_id {
                return Some(column);
            }
            if let Some(found) = find_column(&column.children, column_id) {
                return Some(found);
            }
        }
    }

    None
}

pub fn find_column_mut<'a>(blocks: &'a mut [Block], column_id: &str) -> Option<&'a mut Column> {
    for block in blocks.iter_mut() {
        if let Some(columns) = block.columns_mut() {
            for column in columns.iter_mut() {
                if column.id == column_id {
                    return Some(column);
                }
                if let Some(found) = find_column_mut(&mut column.children, column_id) {
                    return Some(found);
                }
            }
        }
    }

    None
}

pub fn locate_block(blocks: &[Block], id: &str) -> Option<BlockLocation> {
    locate_in(blocks, id, None)
}

fn locate_in(blocks: &[Block], id: &str, parent: Option<&str>) -> Option<BlockLocation> {
    if let Some(index) = blocks.iter().position(|b| b.id == id) {
        return Some(BlockLocation {
            parent_column_id: parent.map(str::to_string),
            index,
        });
    }

    for block in blocks {
        for column in block.columns() {
            if let Some(found) = locate_in(&column.children, id, Some(&column.id)) {
                return Some(found);
            }
        }
    }

    None
}

/// Ids from the block up to the root: `[block]` for a top-level block,
/// `[block, column, columns_block]` for a nested one. Empty when absent.
pub fn block_path(blocks: &[Block], id: &str) -> Vec<String> {
    path_in(blocks, id).unwrap_or_default()
}

fn path_in(blocks: &[Block], id: &str) -> Option<Vec<String>> {
    if blocks.iter().any(|b| b.id == id) {
        return Some(vec![id.to_string()]);
    }

    for block in blocks {
        for column in block.columns() {
            if let Some(mut path) = path_in(&column.children, id) {
                path.push(column.id.clone());
                path.push(block.id.clone());
                return Some(path);
            }
        }
    }

    None
}

pub fn contains_block(blocks: &[Block], id: &str) -> bool {
    find_block(blocks, id).is_some()
}

/// Length of a sequence, `None` when the column does not exist
pub fn sequence_len(blocks: &[Block], parent_column_id: Option<&str>) -> Option<usize> {
    match parent_column_id {
        None => Some(blocks.len()),
        Some(column_id) => find_column(blocks, column_id).map(|c| c.children.len()),
    }
}

/// Ids of the blocks in a sequence, in order
pub fn sequence_ids(blocks: &[Block], parent_column_id: Option<&str>) -> Vec<String> {
    let sequence: &[Block] = match parent_column_id {
        None => blocks,
        Some(column_id) => match find_column(blocks, column_id) {
            Some(column) => &column.children,
            None => return Vec::new(),
        },
    };
    sequence.iter().map(|b| b.id.clone()).collect()
}

/// Detach a block from wherever it lives
pub fn remove_block(blocks: &mut Vec<Block>, id: &str) -> Option<Block> {
    if let Some(pos) = blocks.iter().position(|b| b.id == id) {
        return Some(blocks.remove(pos));
    }

    for block in blocks.iter_mut() {
        if let Some(columns) = block.columns_mut() {
            for column in columns.iter_mut() {
                if let Some(removed) = remove_block(&mut column.children, id) {
                    return Some(removed);
                }
            }
        }
    }

    None
}

/// Columns may not hold `columns` blocks
pub fn check_nesting(block: &Block, parent_column_id: Option<&str>) -> Result<(), MutationError> {
    match parent_column_id {
        Some(column_id) if block.is_columns() => Err(MutationError::InvalidNesting {
            block_type: BlockType::Columns,
            column_id: column_id.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Insert into the top level or a column. The index is clamped to the
/// sequence length; `None` appends.
pub fn insert_block(
    blocks: &mut Vec<Block>,
    block: Block,
    index: Option<usize>,
    parent_column_id: Option<&str>,
) -> Result<usize, MutationError> {
    check_nesting(&block, parent_column_id)?;

    let sequence = match parent_column_id {
        None => blocks,
        Some(column_id) => {
            &mut find_column_mut(blocks, column_id)
                .ok_or_else(|| MutationError::ColumnNotFound(column_id.to_string()))?
                .children
        }
    };

    let at = index.unwrap_or(sequence.len()).min(sequence.len());
    sequence.insert(at, block);
    Ok(at)
}

/// Gives a copied subtree fresh ids: the block, its columns and every
/// nested child. Item ids (links, menu and list items) are kept.
struct IdRegenerator;

impl VisitorMut for IdRegenerator {
    fn visit_block_mut(&mut self, block: &mut Block) {
        block.id = generate_id(block.block_type().as_str());
        walk_block_mut(self, block);
    }

    fn visit_column_mut(&mut self, column: &mut Column) {
        column.id = generate_id(BlockType::Column.as_str());
        walk_column_mut(self, column);
    }
}

pub fn regenerate_ids(block: &mut Block) {
    IdRegenerator.visit_block_mut(block);
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailbuilder_blocks::{create_columns, create_text, BlockKind};

    fn text(id: &str) -> Block {
        let mut block = create_text(None).unwrap();
        block.id = id.to_string();
        block
    }

    /// `[a, cols(c1: [x, y], c2: [z]), b]`
    fn sample_tree() -> Vec<Block> {
        let mut cols = create_columns(None).unwrap();
        cols.id = "cols".to_string();
        if let BlockKind::Columns { columns, .. } = &mut cols.kind {
            columns[0].id = "c1".to_string();
            columns[0].children = vec![text("x"), text("y")];
            columns[1].id = "c2".to_string();
            columns[1].children = vec![text("z")];
        }
        vec![text("a"), cols, text("b")]
    }

    #[test]
    fn test_find_nested_and_top_level() {
        let tree = sample_tree();
        assert_eq!(find_block(&tree, "a").unwrap().id, "a");
        assert_eq!(find_block(&tree, "z").unwrap().id, "z");
        assert!(find_block(&tree, "missing").is_none());
        assert_eq!(find_column(&tree, "c2").unwrap().children.len(), 1);
    }

    #[test]
    fn test_locate_and_path() {
        let tree = sample_tree();
        assert_eq!(
            locate_block(&tree, "y"),
            Some(BlockLocation {
                parent_column_id: Some("c1".to_string()),
                index: 1
            })
        );
        assert_eq!(block_path(&tree, "y"), vec!["y", "c1", "cols"]);
        assert_eq!(block_path(&tree, "b"), vec!["b"]);
        assert!(block_path(&tree, "nope").is_empty());
    }

    #[test]
    fn test_remove_nested() {
        let mut tree = sample_tree();
        let removed = remove_block(&mut tree, "x").unwrap();
        assert_eq!(removed.id, "x");
        assert_eq!(sequence_ids(&tree, Some("c1")), vec!["y"]);
    }

    #[test]
    fn test_insert_clamps_index() {
        let mut tree = sample_tree();
        let at = insert_block(&mut tree, text("n"), Some(99), Some("c2")).unwrap();
        assert_eq!(at, 1);
        assert_eq!(sequence_ids(&tree, Some("c2")), vec!["z", "n"]);

        let at = insert_block(&mut tree, text("top"), Some(0), None).unwrap();
        assert_eq!(at, 0);
        assert_eq!(tree[0].id, "top");
    }

    #[test]
    fn test_insert_rejects_columns_in_column() {
        let mut tree = sample_tree();
        let nested = create_columns(None).unwrap();
        let err = insert_block(&mut tree, nested, None, Some("c1")).unwrap_err();
        assert!(matches!(err, MutationError::InvalidNesting { .. }));
        assert_eq!(sequence_len(&tree, Some("c1")), Some(2));
    }

    #[test]
    fn test_insert_into_missing_column() {
        let mut tree = sample_tree();
        let err = insert_block(&mut tree, text("n"), None, Some("ghost")).unwrap_err();
        assert_eq!(err, MutationError::ColumnNotFound("ghost".to_string()));
    }

    #[test]
    fn test_regenerate_ids_reaches_children() {
        let mut cols = sample_tree().remove(1);
        regenerate_ids(&mut cols);

        assert_ne!(cols.id, "cols");
        assert!(cols.id.starts_with("columns_"));
        let columns = cols.columns();
        assert!(columns[0].id.starts_with("column_"));
        assert!(columns[0].children[0].id.starts_with("text_"));
        assert_ne!(columns[0].children[0].id, "x");
    }
}
