//! # Mailbuilder Editor
//!
//! Editing core for block-based email templates.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ blocks: block model, factories, patches     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: store + history + drag targeting    │
//! │  - Apply mutations with validation          │
//! │  - Snapshot undo/redo                       │
//! │  - Pointer → insertion point                │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ compiler-html: block tree → email HTML      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The block tree is the source of truth**: HTML is always derived
//! 2. **Mutations are atomic**: a rejected mutation leaves state untouched
//! 3. **Stale ids are harmless**: the lenient API turns misses into no-ops
//! 4. **No globals**: every editor owns its store
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mailbuilder_editor::{MailBuilder, EditorConfig};
//! use mailbuilder_blocks::{create_button, create_text};
//!
//! let mut editor = MailBuilder::new(EditorConfig::default());
//! editor.store_mut().add_block(create_text(None)?, None, None);
//! editor.store_mut().add_block(create_button(None)?, Some(0), None);
//!
//! let html = editor.get_html();
//! editor.store_mut().undo();
//! ```

mod config;
pub mod drag;
mod editor;
mod errors;
mod mutations;
pub mod storage;
mod store;
pub mod tree;
mod undo_stack;

pub use config::EditorConfig;
pub use drag::{
    DragEngine, DragFeedback, DragPayload, DropOutcome, DropPosition, DropTarget, FrameRequest, Point,
    Rect,
};
pub use editor::{ExportedHtml, MailBuilder};
pub use errors::EditorError;
pub use mutations::{Applied, Mutation, MutationError, MutationResult};
pub use storage::{MemoryStorage, StorageError, StorageProvider, UploadFile, UploadResult};
pub use store::{
    EditorState, EditorStore, EmailStylesPatch, PreviewMode, SubscriptionId, MAX_ZOOM, MIN_ZOOM,
};
pub use undo_stack::{Snapshot, UndoStack, DEFAULT_HISTORY_LIMIT};
