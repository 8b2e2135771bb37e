//! # Editor Store
//!
//! The single state container of one editor instance: the block tree, UI
//! state (selection, hover, drag markers, preview settings), global styles,
//! variables and undo history.
//!
//! Tree mutations are applied to a working copy; the previous tree is moved
//! into history only once the mutation has succeeded, so a rejected
//! mutation never leaves a half-edited tree behind. Every state change
//! bumps [`EditorStore::version`] and notifies subscribers.
//!
//! Two calling conventions are offered. [`EditorStore::apply`] is strict and
//! returns a [`MutationError`]. The named methods (`add_block`,
//! `move_block`, ...) are lenient: a miss or a rejected mutation is logged
//! and reported as `false`, and the state is left untouched.

use crate::config::EditorConfig;
use crate::drag::DropPosition;
use crate::mutations::{Applied, Mutation, MutationError, MutationResult};
use crate::tree::{block_path, check_nesting, contains_block, find_block, find_block_mut, locate_block};
use crate::undo_stack::UndoStack;
use mailbuilder_blocks::{
    Block, BlockPatch, BodyStyles, ContainerStyles, EmailData, EmailStyles, HeadingStyles,
    LinkStyles, Variable,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

pub const MIN_ZOOM: u32 = 25;
pub const MAX_ZOOM: u32 = 200;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewMode {
    #[default]
    Desktop,
    Mobile,
}

/// Group-level update of the global styles: each group that is set
/// replaces the current one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailStylesPatch {
    pub body: Option<BodyStyles>,
    pub container: Option<ContainerStyles>,
    pub link: Option<LinkStyles>,
    pub headings: Option<HeadingStyles>,
}

impl EmailStylesPatch {
    pub fn apply_to(self, styles: &mut EmailStyles) {
        if let Some(body) = self.body {
            styles.body = body;
        }
        if let Some(container) = self.container {
            styles.container = container;
        }
        if let Some(link) = self.link {
            styles.link = link;
        }
        if let Some(headings) = self.headings {
            styles.headings = headings;
        }
    }
}

#[derive(Debug, Clone)]
pub struct EditorState {
    pub blocks: Vec<Block>,
    pub selected_block_id: Option<String>,
    pub hovered_block_id: Option<String>,
    pub dragged_block_id: Option<String>,
    pub drop_target_id: Option<String>,
    pub drop_position: Option<DropPosition>,
    pub email_styles: EmailStyles,
    pub variables: Vec<Variable>,
    pub history: UndoStack,
    pub is_dirty: bool,
    pub preview_mode: PreviewMode,
    pub zoom: u32,
    pub show_grid: bool,
}

impl EditorState {
    fn initial(config: &EditorConfig) -> Self {
        Self {
            blocks: Vec::new(),
            selected_block_id: None,
            hovered_block_id: None,
            dragged_block_id: None,
            drop_target_id: None,
            drop_position: None,
            email_styles: EmailStyles::default(),
            variables: Vec::new(),
            history: UndoStack::with_max_levels(config.history_limit),
            is_dirty: false,
            preview_mode: config.preview_mode,
            zoom: config.zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            show_grid: config.show_grid,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}

/// Handle returned by [`EditorStore::subscribe`]
pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(&EditorState)>;

pub struct EditorStore {
    state: EditorState,
    config: EditorConfig,
    version: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
}

impl fmt::Debug for EditorStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorStore")
            .field("version", &self.version)
            .field("blocks", &self.state.blocks.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for EditorStore {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorStore {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            state: EditorState::initial(&config),
            config,
            version: 0,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn blocks(&self) -> &[Block] {
        &self.state.blocks
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Incremented on every state change
    pub fn version(&self) -> u64 {
        self.version
    }

    // ---- subscriptions ----

    /// Register a listener called with the new state after every change
    pub fn subscribe(&mut self, listener: impl FnMut(&EditorState) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        let listener: Listener = Box::new(listener);
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn changed(&mut self) -> u64 {
        self.version += 1;
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.state);
        }
        self.version
    }

    // ---- tree mutations ----

    /// Apply a mutation, recording the previous tree in history.
    ///
    /// A mutation that leaves the tree unchanged (a move onto the block's
    /// own position) records nothing and notifies no one.
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, MutationError> {
        let description = mutation.description();
        self.commit(description, |tree| mutation.apply(tree))
    }

    fn commit<F>(&mut self, description: &'static str, edit: F) -> Result<MutationResult, MutationError>
    where
        F: FnOnce(&mut Vec<Block>) -> Result<Applied, MutationError>,
    {
        let mut next = self.state.blocks.clone();
        let applied = edit(&mut next)?;

        if !applied.changed {
            debug!(description, "mutation left the tree unchanged");
            return Ok(MutationResult {
                version: self.version,
                changed: false,
            });
        }

        let before = std::mem::replace(&mut self.state.blocks, next);
        self.state.history.record(before, description);
        self.state.is_dirty = true;
        if let Some(focus) = applied.focus {
            self.state.selected_block_id = Some(focus);
        }
        self.prune_stale_ids();

        let version = self.changed();
        debug!(description, version, "mutation applied");
        Ok(MutationResult {
            version,
            changed: true,
        })
    }

    fn apply_lenient(&mut self, mutation: Mutation) -> Option<MutationResult> {
        match self.apply(mutation) {
            Ok(result) => Some(result),
            Err(err) => {
                report_rejection(&err);
                None
            }
        }
    }

    /// Replace the whole tree
    pub fn set_blocks(&mut self, blocks: Vec<Block>) -> bool {
        self.apply_lenient(Mutation::SetBlocks { blocks })
            .is_some_and(|r| r.changed)
    }

    /// Insert a block and select it. `index: None` appends.
    pub fn add_block(&mut self, block: Block, index: Option<usize>, parent_column_id: Option<&str>) -> bool {
        self.apply_lenient(Mutation::AddBlock {
            block,
            index,
            parent_column_id: parent_column_id.map(str::to_string),
        })
        .is_some_and(|r| r.changed)
    }

    /// Shallow-merge `patch` into the block
    pub fn update_block(&mut self, block_id: &str, patch: BlockPatch) -> bool {
        self.apply_lenient(Mutation::UpdateBlock {
            block_id: block_id.to_string(),
            patch,
        })
        .is_some_and(|r| r.changed)
    }

    /// Edit a copy of the block in place. The id cannot be changed.
    pub fn update_block_with(&mut self, block_id: &str, edit: impl FnOnce(&mut Block)) -> bool {
        let Some(mut updated) = find_block(&self.state.blocks, block_id).cloned() else {
            debug!(block_id, "update target not found");
            return false;
        };
        edit(&mut updated);
        updated.id = block_id.to_string();

        let result = self.commit("Update block", |tree| {
            let parent = locate_block(tree, block_id).and_then(|l| l.parent_column_id);
            check_nesting(&updated, parent.as_deref())?;
            let target = find_block_mut(tree, block_id)
                .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))?;
            *target = updated;
            Ok(Applied {
                changed: true,
                focus: None,
            })
        });

        match result {
            Ok(result) => result.changed,
            Err(err) => {
                report_rejection(&err);
                false
            }
        }
    }

    /// Remove a block from wherever it lives
    pub fn delete_block(&mut self, block_id: &str) -> bool {
        self.apply_lenient(Mutation::DeleteBlock {
            block_id: block_id.to_string(),
        })
        .is_some_and(|r| r.changed)
    }

    /// Move a block. `to_index` is the position in the target sequence
    /// after the block has been removed from its current one.
    pub fn move_block(&mut self, block_id: &str, to_index: usize, parent_column_id: Option<&str>) -> bool {
        self.apply_lenient(Mutation::MoveBlock {
            block_id: block_id.to_string(),
            to_index,
            parent_column_id: parent_column_id.map(str::to_string),
        })
        .is_some_and(|r| r.changed)
    }

    /// Copy a block next to itself and select the copy. Returns its id.
    pub fn duplicate_block(&mut self, block_id: &str) -> Option<String> {
        self.apply_lenient(Mutation::DuplicateBlock {
            block_id: block_id.to_string(),
        })
        .filter(|r| r.changed)
        .and_then(|_| self.state.selected_block_id.clone())
    }

    // ---- history ----

    pub fn undo(&mut self) -> bool {
        if !self.state.history.undo(&mut self.state.blocks) {
            return false;
        }
        self.state.is_dirty = true;
        self.prune_stale_ids();
        self.changed();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.state.history.redo(&mut self.state.blocks) {
            return false;
        }
        self.state.is_dirty = true;
        self.prune_stale_ids();
        self.changed();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.state.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.state.history.can_redo()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.state.history.undo_description()
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.state.history.redo_description()
    }

    // ---- UI state ----

    /// Select a block, or clear the selection with `None`. Unknown ids are
    /// ignored.
    pub fn select_block(&mut self, block_id: Option<&str>) {
        match block_id {
            Some(id) if !contains_block(&self.state.blocks, id) => {
                debug!(block_id = id, "cannot select missing block");
            }
            _ => {
                self.state.selected_block_id = block_id.map(str::to_string);
                self.changed();
            }
        }
    }

    pub fn hover_block(&mut self, block_id: Option<&str>) {
        let hovered = block_id.map(str::to_string);
        if self.state.hovered_block_id != hovered {
            self.state.hovered_block_id = hovered;
            self.changed();
        }
    }

    /// Drag markers published for the canvas
    pub fn set_drag(
        &mut self,
        dragged_block_id: Option<&str>,
        drop_target_id: Option<&str>,
        drop_position: Option<DropPosition>,
    ) {
        self.state.dragged_block_id = dragged_block_id.map(str::to_string);
        self.state.drop_target_id = drop_target_id.map(str::to_string);
        self.state.drop_position = drop_position;
        self.changed();
    }

    pub fn clear_drag(&mut self) {
        self.set_drag(None, None, None);
    }

    pub fn set_email_styles(&mut self, patch: EmailStylesPatch) {
        patch.apply_to(&mut self.state.email_styles);
        self.state.is_dirty = true;
        self.changed();
    }

    pub fn set_variables(&mut self, variables: Vec<Variable>) {
        self.state.variables = variables;
        self.state.is_dirty = true;
        self.changed();
    }

    /// Insert a variable, replacing any with the same key
    pub fn upsert_variable(&mut self, variable: Variable) {
        match self.state.variables.iter_mut().find(|v| v.key == variable.key) {
            Some(existing) => *existing = variable,
            None => self.state.variables.push(variable),
        }
        self.state.is_dirty = true;
        self.changed();
    }

    pub fn remove_variable(&mut self, key: &str) -> bool {
        let before = self.state.variables.len();
        self.state.variables.retain(|v| v.key != key);
        if self.state.variables.len() == before {
            return false;
        }
        self.state.is_dirty = true;
        self.changed();
        true
    }

    pub fn set_preview_mode(&mut self, mode: PreviewMode) {
        self.state.preview_mode = mode;
        self.changed();
    }

    /// Set the canvas zoom, clamped to 25..=200 percent
    pub fn set_zoom(&mut self, zoom: u32) {
        self.state.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.changed();
    }

    pub fn toggle_grid(&mut self) {
        self.state.show_grid = !self.state.show_grid;
        self.changed();
    }

    pub fn mark_saved(&mut self) {
        self.state.is_dirty = false;
        self.changed();
    }

    /// Replace blocks, styles and variables at once. History is cleared
    /// and the editor starts clean.
    pub fn load_data(&mut self, data: EmailData) {
        self.state.blocks = data.blocks;
        self.state.email_styles = data.styles;
        self.state.variables = data.variables;
        self.state.history.clear();
        self.state.selected_block_id = None;
        self.state.hovered_block_id = None;
        self.state.dragged_block_id = None;
        self.state.drop_target_id = None;
        self.state.drop_position = None;
        self.state.is_dirty = false;
        self.changed();
    }

    /// Snapshot of the persisted parts of the state
    pub fn to_data(&self) -> EmailData {
        EmailData::new(
            self.state.blocks.clone(),
            self.state.email_styles.clone(),
            self.state.variables.clone(),
        )
    }

    /// Back to a fresh editor. Subscribers stay registered.
    pub fn reset(&mut self) {
        self.state = EditorState::initial(&self.config);
        self.changed();
    }

    // ---- queries ----

    pub fn get_block_by_id(&self, block_id: &str) -> Option<&Block> {
        find_block(&self.state.blocks, block_id)
    }

    /// `[block]` for a top-level block, `[block, column, columns_block]`
    /// for a nested one, empty when absent
    pub fn get_block_path(&self, block_id: &str) -> Vec<String> {
        block_path(&self.state.blocks, block_id)
    }

    pub fn selected_block(&self) -> Option<&Block> {
        self.state
            .selected_block_id
            .as_deref()
            .and_then(|id| self.get_block_by_id(id))
    }

    /// Drop ids that no longer point into the tree
    fn prune_stale_ids(&mut self) {
        let blocks = &self.state.blocks;
        for slot in [
            &mut self.state.selected_block_id,
            &mut self.state.hovered_block_id,
            &mut self.state.dragged_block_id,
        ] {
            if slot.as_deref().is_some_and(|id| !contains_block(blocks, id)) {
                *slot = None;
            }
        }
    }
}

fn report_rejection(err: &MutationError) {
    match err {
        MutationError::BlockNotFound(_) | MutationError::ColumnNotFound(_) => {
            debug!(%err, "mutation target not found");
        }
        _ => warn!(%err, "mutation rejected"),
    }
}
