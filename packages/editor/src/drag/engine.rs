//! # Drag Engine
//!
//! Gesture state machine: `Idle → Dragging → (dropped | cancelled) → Idle`.
//!
//! ## Frame throttling
//!
//! `pointer_move` only records the pointer. The first move after a frame
//! returns [`FrameRequest::Schedule`]; the host requests an animation frame
//! and calls `on_animation_frame`, which resolves the target once no matter
//! how many moves arrived in between.
//!
//! ## Index compensation
//!
//! Targets carry indices into the sequence as it is before the drag. When an
//! existing block moves later within its own sequence, the insertion index
//! drops by one because the block is detached first.

use super::geometry::{BoundsProvider, GeometryCache, Point};
use super::target::{resolve_target, DropPosition, DropTarget};
use crate::mutations::{Mutation, MutationError};
use crate::store::EditorStore;
use crate::tree::{locate_block, sequence_ids, BlockLocation};
use mailbuilder_blocks::{create_block_of, BlockType};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What is being dragged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DragPayload {
    /// A sidebar template
    NewBlock(BlockType),
    /// A block already on the canvas
    Existing { block_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRequest {
    /// Request an animation frame
    Schedule,
    /// A frame is already requested
    Pending,
    /// No drag in progress
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ghost {
    pub label: String,
    pub position: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicator {
    pub element_id: String,
    pub edge: Edge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiblingShift {
    pub block_id: String,
    pub direction: ShiftDirection,
}

/// Visual affordances for the current gesture
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DragFeedback {
    pub ghost: Option<Ghost>,
    pub indicator: Option<Indicator>,
    pub highlighted_column: Option<String>,
    pub empty_canvas_highlight: bool,
    pub shifted: Vec<SiblingShift>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    Added { block_id: String },
    Moved { block_id: String },
    /// Dropped back onto its own position
    Unchanged,
    Rejected(MutationError),
    NoTarget,
}

#[derive(Debug)]
struct Gesture {
    payload: DragPayload,
    label: String,
    /// Where an existing block sat when the drag started
    source: Option<BlockLocation>,
    cache: GeometryCache,
    pointer: Point,
    frame_pending: bool,
    target: Option<DropTarget>,
}

#[derive(Debug, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging(Gesture),
}

#[derive(Debug, Default)]
pub struct DragEngine {
    state: DragState,
    feedback: DragFeedback,
}

impl DragEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn feedback(&self) -> &DragFeedback {
        &self.feedback
    }

    /// Target resolved on the last animation frame
    pub fn current_target(&self) -> Option<&DropTarget> {
        match &self.state {
            DragState::Dragging(gesture) => gesture.target.as_ref(),
            DragState::Idle => None,
        }
    }

    /// Begin a gesture and snapshot geometry.
    ///
    /// Refused while another drag is active, for unknown blocks and for
    /// locked blocks.
    pub fn start(
        &mut self,
        store: &mut EditorStore,
        payload: DragPayload,
        bounds: &dyn BoundsProvider,
        origin: Point,
    ) -> bool {
        if self.is_dragging() {
            warn!("drag start ignored, a drag is already in progress");
            return false;
        }

        let (label, source, excluded) = match &payload {
            DragPayload::NewBlock(BlockType::Column) => {
                warn!("column is not a standalone block");
                return false;
            }
            DragPayload::NewBlock(ty) => (ty.label().to_string(), None, None),
            DragPayload::Existing { block_id } => {
                let Some(block) = store.get_block_by_id(block_id) else {
                    debug!(block_id, "drag start on unknown block");
                    return false;
                };
                if block.is_locked() {
                    debug!(block_id, "locked block cannot be dragged");
                    return false;
                }
                (
                    block.block_type().label().to_string(),
                    locate_block(store.blocks(), block_id),
                    Some(block_id.as_str()),
                )
            }
        };

        let cache = GeometryCache::capture(store.blocks(), bounds, excluded);
        debug!(
            blocks = cache.blocks.len(),
            zones = cache.zones.len(),
            "drag started"
        );

        let dragged_id = excluded.map(str::to_string);
        self.feedback = DragFeedback {
            ghost: Some(Ghost {
                label: label.clone(),
                position: origin,
            }),
            empty_canvas_highlight: cache.is_empty_canvas(),
            ..Default::default()
        };
        self.state = DragState::Dragging(Gesture {
            payload,
            label,
            source,
            cache,
            pointer: origin,
            frame_pending: false,
            target: None,
        });

        store.set_drag(dragged_id.as_deref(), None, None);
        true
    }

    /// Record the pointer; the ghost follows immediately.
    pub fn pointer_move(&mut self, point: Point) -> FrameRequest {
        let DragState::Dragging(gesture) = &mut self.state else {
            return FrameRequest::Ignored;
        };

        gesture.pointer = point;
        if let Some(ghost) = self.feedback.ghost.as_mut() {
            ghost.position = point;
        }

        if gesture.frame_pending {
            FrameRequest::Pending
        } else {
            gesture.frame_pending = true;
            FrameRequest::Schedule
        }
    }

    /// Resolve the target for the latest pointer position
    pub fn on_animation_frame(&mut self, store: &mut EditorStore) {
        let DragState::Dragging(gesture) = &mut self.state else {
            return;
        };
        if !gesture.frame_pending {
            return;
        }
        gesture.frame_pending = false;

        let target = resolve_target(&gesture.cache, gesture.pointer);
        if target == gesture.target {
            return;
        }

        self.feedback = feedback_for(
            store,
            gesture,
            target.as_ref(),
            self.feedback.ghost.take(),
        );
        gesture.target = target;

        let dragged_id = match &gesture.payload {
            DragPayload::Existing { block_id } => Some(block_id.as_str()),
            DragPayload::NewBlock(_) => None,
        };
        let target_ref = gesture.target.as_ref();
        store.set_drag(
            dragged_id,
            target_ref.and_then(|t| t.block_id.as_deref()),
            target_ref.map(|t| t.position),
        );
    }

    /// Finish the gesture and apply the resulting mutation.
    ///
    /// `point` is the release position; without it the last resolved
    /// target is used.
    pub fn drop(&mut self, store: &mut EditorStore, point: Option<Point>) -> DropOutcome {
        let DragState::Dragging(gesture) = std::mem::take(&mut self.state) else {
            return DropOutcome::NoTarget;
        };
        self.feedback = DragFeedback::default();
        store.clear_drag();

        let target = match point {
            Some(point) => resolve_target(&gesture.cache, point),
            None if gesture.frame_pending => resolve_target(&gesture.cache, gesture.pointer),
            None => gesture.target.clone(),
        };
        let Some(target) = target else {
            debug!(label = %gesture.label, "dropped outside any target");
            return DropOutcome::NoTarget;
        };

        let outcome = match gesture.payload {
            DragPayload::NewBlock(ty) => drop_new(store, ty, &target),
            DragPayload::Existing { block_id } => drop_existing(store, block_id, &target),
        };

        match &outcome {
            DropOutcome::Rejected(err) => warn!(%err, "drop rejected"),
            other => debug!(?other, "drop applied"),
        }
        outcome
    }

    /// Abandon the gesture without touching the tree
    pub fn cancel(&mut self, store: &mut EditorStore) {
        if !self.is_dragging() {
            return;
        }
        self.state = DragState::Idle;
        self.feedback = DragFeedback::default();
        store.clear_drag();
        debug!("drag cancelled");
    }

    pub fn pointer_left_viewport(&mut self, store: &mut EditorStore) {
        self.cancel(store);
    }
}

fn drop_new(store: &mut EditorStore, ty: BlockType, target: &DropTarget) -> DropOutcome {
    if let (BlockType::Columns, Some(column_id)) = (ty, target.parent_column_id.as_ref()) {
        return DropOutcome::Rejected(MutationError::InvalidNesting {
            block_type: ty,
            column_id: column_id.clone(),
        });
    }

    let block = match create_block_of(ty, None) {
        Ok(block) => block,
        Err(err) => return DropOutcome::Rejected(MutationError::InvalidBlock(err.to_string())),
    };
    let block_id = block.id.clone();

    match store.apply(Mutation::AddBlock {
        block,
        index: Some(target.insertion_index()),
        parent_column_id: target.parent_column_id.clone(),
    }) {
        Ok(_) => DropOutcome::Added { block_id },
        Err(err) => DropOutcome::Rejected(err),
    }
}

fn drop_existing(store: &mut EditorStore, block_id: String, target: &DropTarget) -> DropOutcome {
    let Some(source) = locate_block(store.blocks(), &block_id) else {
        return DropOutcome::Rejected(MutationError::BlockNotFound(block_id));
    };

    let to_index = compensated_index(&source, target);
    if source.parent_column_id == target.parent_column_id && source.index == to_index {
        return DropOutcome::Unchanged;
    }

    match store.apply(Mutation::MoveBlock {
        block_id: block_id.clone(),
        to_index,
        parent_column_id: target.parent_column_id.clone(),
    }) {
        Ok(result) if result.changed => DropOutcome::Moved { block_id },
        Ok(_) => DropOutcome::Unchanged,
        Err(err) => DropOutcome::Rejected(err),
    }
}

/// Insertion index once the dragged block has been detached
pub fn compensated_index(source: &BlockLocation, target: &DropTarget) -> usize {
    let index = target.insertion_index();
    if source.parent_column_id == target.parent_column_id && source.index < index {
        index - 1
    } else {
        index
    }
}

fn feedback_for(
    store: &EditorStore,
    gesture: &Gesture,
    target: Option<&DropTarget>,
    ghost: Option<Ghost>,
) -> DragFeedback {
    let mut feedback = DragFeedback {
        ghost,
        ..Default::default()
    };
    let Some(target) = target else {
        return feedback;
    };

    feedback.highlighted_column = target.parent_column_id.clone();
    feedback.empty_canvas_highlight = gesture.cache.is_empty_canvas();
    feedback.indicator = match (target.position, &target.block_id) {
        (DropPosition::Before, Some(id)) => Some(Indicator {
            element_id: id.clone(),
            edge: Edge::Top,
        }),
        (DropPosition::After, Some(id)) => Some(Indicator {
            element_id: id.clone(),
            edge: Edge::Bottom,
        }),
        _ => None,
    };

    if let Some(source) = gesture
        .source
        .as_ref()
        .filter(|source| source.parent_column_id == target.parent_column_id)
    {
        let to = compensated_index(source, target);
        let ids = sequence_ids(store.blocks(), source.parent_column_id.as_deref());
        feedback.shifted = ids
            .into_iter()
            .enumerate()
            .filter_map(|(index, block_id)| {
                let direction = if source.index < index && index <= to {
                    ShiftDirection::Up
                } else if to <= index && index < source.index {
                    ShiftDirection::Down
                } else {
                    return None;
                };
                Some(SiblingShift { block_id, direction })
            })
            .collect();
    }

    feedback
}
