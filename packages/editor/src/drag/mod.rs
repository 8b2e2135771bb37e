//! Drag-and-drop targeting for the canvas.

mod engine;
mod geometry;
mod target;

pub use engine::{
    compensated_index, DragEngine, DragFeedback, DragPayload, DropOutcome, Edge, FrameRequest,
    Ghost, Indicator, ShiftDirection, SiblingShift,
};
pub use geometry::{BoundsProvider, CachedBlock, ColumnZone, GeometryCache, Point, Rect};
pub use target::{resolve_target, DropPosition, DropTarget};
