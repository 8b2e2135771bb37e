//! # Mailbuilder Blocks
//!
//! Data model for the email editor: the block tree, its style records,
//! email-wide settings, template variables and the persisted `EmailData`
//! shape. Blocks are created through the factories in [`factory`], which
//! assign fresh ids and type-appropriate defaults.
//!
//! The tree has exactly two levels: a top-level sequence of blocks, and the
//! children of each column owned by a `columns` block.

pub mod block;
pub mod email;
pub mod error;
pub mod factory;
pub mod id_generator;
pub mod patch;
pub mod style;

pub use block::{Block, BlockKind, BlockType, Column, ColumnTag, ListItem, MenuItem, SocialLink};
pub use email::{
    BodyStyles, ContainerStyles, EmailData, EmailMetadata, EmailStyles, HeadingStyle,
    HeadingStyles, LinkStyles, Variable, EMAIL_DATA_VERSION,
};
pub use error::{BlockError, BlockResult};
pub use factory::*;
pub use id_generator::{generate_id, is_generated_id};
pub use patch::{apply_patch, patch_from_value, BlockPatch};
pub use style::*;
