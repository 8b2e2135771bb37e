use crate::text_fields::text_fields;
use mailbuilder_blocks::{Block, Column};

/// Visitor pattern for traversing the block tree immutably
///
/// This trait provides default implementations that walk the entire tree:
/// top-level blocks, then each column of a `columns` block, then the
/// column's children. Override specific visit_* methods to perform custom
/// actions on nodes.
pub trait Visitor: Sized {
    fn visit_blocks(&mut self, blocks: &[Block]) {
        walk_blocks(self, blocks);
    }

    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }

    fn visit_column(&mut self, column: &Column) {
        walk_column(self, column);
    }

    fn visit_text(&mut self, _block: &Block, _text: &str) {
        // Leaf, nothing to walk
    }
}

/// Mutable visitor pattern for transforming the block tree
///
/// Similar to Visitor, but provides mutable access to nodes.
pub trait VisitorMut: Sized {
    fn visit_blocks_mut(&mut self, blocks: &mut Vec<Block>) {
        walk_blocks_mut(self, blocks);
    }

    fn visit_block_mut(&mut self, block: &mut Block) {
        walk_block_mut(self, block);
    }

    fn visit_column_mut(&mut self, column: &mut Column) {
        walk_column_mut(self, column);
    }
}

// Default walk implementations for immutable visitor

pub fn walk_blocks<V: Visitor>(visitor: &mut V, blocks: &[Block]) {
    for block in blocks {
        visitor.visit_block(block);
    }
}

pub fn walk_block<V: Visitor>(visitor: &mut V, block: &Block) {
    for text in text_fields(block) {
        visitor.visit_text(block, text);
    }
    for column in block.columns() {
        visitor.visit_column(column);
    }
}

pub fn walk_column<V: Visitor>(visitor: &mut V, column: &Column) {
    visitor.visit_blocks(&column.children);
}

// Default walk implementations for mutable visitor

pub fn walk_blocks_mut<V: VisitorMut>(visitor: &mut V, blocks: &mut Vec<Block>) {
    for block in blocks.iter_mut() {
        visitor.visit_block_mut(block);
    }
}

pub fn walk_block_mut<V: VisitorMut>(visitor: &mut V, block: &mut Block) {
    if let Some(columns) = block.columns_mut() {
        for column in columns.iter_mut() {
            visitor.visit_column_mut(column);
        }
    }
}

pub fn walk_column_mut<V: VisitorMut>(visitor: &mut V, column: &mut Column) {
    visitor.visit_blocks_mut(&mut column.children);
}
