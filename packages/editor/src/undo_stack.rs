//! # Undo/Redo Stack
//!
//! Snapshot history of the block tree.
//!
//! ## Design
//!
//! - Every tree mutation records the tree as it was before the mutation
//! - Undo swaps the live tree with the newest snapshot and moves the live
//!   tree to the redo stack
//! - Redo is the mirror image
//! - New mutations clear the redo stack
//! - The undo side is bounded; the oldest entries are evicted first
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//! let mut blocks = vec![];
//!
//! stack.record(blocks.clone(), "Add block");
//! blocks.push(create_text(None)?);
//!
//! stack.undo(&mut blocks); // blocks is empty again
//! stack.redo(&mut blocks); // and back
//! ```

use mailbuilder_blocks::Block;
use std::collections::VecDeque;

/// Default number of undo levels
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// A tree state plus the label of the mutation that left it
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub blocks: Vec<Block>,
    pub description: Option<String>,
}

/// Undo/redo stack of block tree snapshots
#[derive(Debug, Clone)]
pub struct UndoStack {
    /// Trees before each recorded mutation (most recent last)
    undo_stack: VecDeque<Snapshot>,

    /// Trees that were undone (most recent last)
    redo_stack: Vec<Snapshot>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (50)
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_HISTORY_LIMIT)
    }

    /// Create an undo stack with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    /// Record the tree as it was before a mutation
    pub fn record(&mut self, before: Vec<Block>, description: impl Into<String>) {
        self.undo_stack.push_back(Snapshot {
            blocks: before,
            description: Some(description.into()),
        });

        // Trim if exceeded max levels
        while self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.pop_front();
        }

        // New action invalidates the future
        self.redo_stack.clear();
    }

    /// Restore the most recent snapshot into `blocks`
    pub fn undo(&mut self, blocks: &mut Vec<Block>) -> bool {
        match self.undo_stack.pop_back() {
            Some(snapshot) => {
                let current = std::mem::replace(blocks, snapshot.blocks);
                self.redo_stack.push(Snapshot {
                    blocks: current,
                    description: snapshot.description,
                });
                true
            }
            None => false,
        }
    }

    /// Reapply the most recently undone state into `blocks`
    pub fn redo(&mut self, blocks: &mut Vec<Block>) -> bool {
        match self.redo_stack.pop() {
            Some(snapshot) => {
                let current = std::mem::replace(blocks, snapshot.blocks);
                self.undo_stack.push_back(Snapshot {
                    blocks: current,
                    description: snapshot.description,
                });
                true
            }
            None => false,
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the number of undo levels available
    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of redo levels available
    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Get description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .back()
            .and_then(|snapshot| snapshot.description.as_deref())
    }

    /// Get description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|snapshot| snapshot.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailbuilder_blocks::create_text;

    fn tree(len: usize) -> Vec<Block> {
        (0..len).map(|_| create_text(None).unwrap()).collect()
    }

    #[test]
    fn test_undo_stack_creation() {
        let stack = UndoStack::new();
        assert_eq!(stack.undo_levels(), 0);
        assert_eq!(stack.redo_levels(), 0);
        assert_eq!(stack.max_levels(), 50);
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_record_undo_redo() {
        let mut stack = UndoStack::new();
        let mut blocks = tree(1);
        let before = blocks.clone();

        stack.record(blocks.clone(), "Add block");
        blocks.push(create_text(None).unwrap());
        let after = blocks.clone();

        assert!(stack.undo(&mut blocks));
        assert_eq!(blocks, before);
        assert_eq!(stack.redo_description(), Some("Add block"));

        assert!(stack.redo(&mut blocks));
        assert_eq!(blocks, after);
        assert_eq!(stack.undo_description(), Some("Add block"));
    }

    #[test]
    fn test_undo_on_empty_stack_is_noop() {
        let mut stack = UndoStack::new();
        let mut blocks = tree(2);
        let before = blocks.clone();

        assert!(!stack.undo(&mut blocks));
        assert!(!stack.redo(&mut blocks));
        assert_eq!(blocks, before);
    }

    #[test]
    fn test_new_record_clears_redo() {
        let mut stack = UndoStack::new();
        let mut blocks = tree(0);

        stack.record(blocks.clone(), "first");
        blocks = tree(1);
        stack.undo(&mut blocks);
        assert_eq!(stack.redo_levels(), 1);

        stack.record(blocks.clone(), "second");
        assert_eq!(stack.redo_levels(), 0);
    }

    #[test]
    fn test_max_levels_enforced() {
        let mut stack = UndoStack::with_max_levels(2);
        for i in 0..3 {
            stack.record(tree(i), format!("step {}", i));
        }

        // Should only keep 2 (max levels), the oldest went first
        assert_eq!(stack.undo_levels(), 2);

        let mut blocks = tree(3);
        stack.undo(&mut blocks);
        assert_eq!(blocks.len(), 2);
        stack.undo(&mut blocks);
        assert_eq!(blocks.len(), 1);
        assert!(!stack.can_undo());
    }
}
