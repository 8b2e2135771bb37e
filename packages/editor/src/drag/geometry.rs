//! Rectangles captured from the rendering surface at drag start.
//!
//! The cache is built once per gesture; pointer moves only read it.

use mailbuilder_blocks::Block;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounds in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Rect {
    pub fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// Edges are inclusive
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }

    pub fn mid_y(&self) -> f64 {
        self.top + self.height() / 2.0
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }
}

/// Where the UI layer currently draws blocks and column drop zones.
///
/// `None` means the entity is not rendered and cannot be targeted.
pub trait BoundsProvider {
    fn block_bounds(&self, block_id: &str) -> Option<Rect>;
    fn column_bounds(&self, column_id: &str) -> Option<Rect>;
}

/// Block and column ids share one namespace, so a single map serves both.
impl BoundsProvider for HashMap<String, Rect> {
    fn block_bounds(&self, block_id: &str) -> Option<Rect> {
        self.get(block_id).copied()
    }

    fn column_bounds(&self, column_id: &str) -> Option<Rect> {
        self.get(column_id).copied()
    }
}

/// A rendered block and its index in the sequence that holds it
#[derive(Debug, Clone, PartialEq)]
pub struct CachedBlock {
    pub id: String,
    pub index: usize,
    pub rect: Rect,
}

/// A column drop zone and the rendered blocks inside it
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnZone {
    pub column_id: String,
    pub parent_block_id: String,
    pub rect: Rect,
    pub children: Vec<CachedBlock>,
    /// Length of the column's sequence, dragged block included
    pub child_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryCache {
    pub blocks: Vec<CachedBlock>,
    pub zones: Vec<ColumnZone>,
    /// Number of top-level blocks in the tree, rendered or not
    pub block_count: usize,
}

impl GeometryCache {
    /// Snapshot bounds for every top-level block and column zone.
    ///
    /// `excluded` (the block being dragged) is left out together with any
    /// zones it owns.
    pub fn capture(blocks: &[Block], bounds: &dyn BoundsProvider, excluded: Option<&str>) -> Self {
        let mut cache = Self {
            block_count: blocks.len(),
            ..Default::default()
        };

        for (index, block) in blocks.iter().enumerate() {
            if Some(block.id.as_str()) == excluded {
                continue;
            }

            if let Some(rect) = bounds.block_bounds(&block.id) {
                cache.blocks.push(CachedBlock {
                    id: block.id.clone(),
                    index,
                    rect,
                });
            }

            for column in block.columns() {
                let Some(rect) = bounds.column_bounds(&column.id) else {
                    continue;
                };

                let children = column
                    .children
                    .iter()
                    .enumerate()
                    .filter(|(_, child)| Some(child.id.as_str()) != excluded)
                    .filter_map(|(index, child)| {
                        bounds.block_bounds(&child.id).map(|rect| CachedBlock {
                            id: child.id.clone(),
                            index,
                            rect,
                        })
                    })
                    .collect();

                cache.zones.push(ColumnZone {
                    column_id: column.id.clone(),
                    parent_block_id: block.id.clone(),
                    rect,
                    children,
                    child_count: column.children.len(),
                });
            }
        }

        cache
    }

    pub fn is_empty_canvas(&self) -> bool {
        self.block_count == 0
    }

    pub fn zone(&self, column_id: &str) -> Option<&ColumnZone> {
        self.zones.iter().find(|zone| zone.column_id == column_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailbuilder_blocks::{create_columns, create_text, BlockKind};

    #[test]
    fn test_rect_contains_edges() {
        let rect = Rect::new(0.0, 100.0, 0.0, 600.0);
        assert!(rect.contains(Point::new(0.0, 0.0)));
        assert!(rect.contains(Point::new(600.0, 100.0)));
        assert!(!rect.contains(Point::new(601.0, 50.0)));
        assert_eq!(rect.mid_y(), 50.0);
    }

    #[test]
    fn test_capture_skips_dragged_and_unrendered() {
        let a = create_text(None).unwrap();
        let b = create_text(None).unwrap();
        let c = create_text(None).unwrap();

        let mut bounds = HashMap::new();
        bounds.insert(a.id.clone(), Rect::new(0.0, 50.0, 0.0, 600.0));
        bounds.insert(b.id.clone(), Rect::new(50.0, 100.0, 0.0, 600.0));

        let cache = GeometryCache::capture(&[a.clone(), b.clone(), c], &bounds, Some(&a.id));

        assert_eq!(cache.block_count, 3);
        assert_eq!(cache.blocks.len(), 1);
        assert_eq!(cache.blocks[0].id, b.id);
        assert_eq!(cache.blocks[0].index, 1);
    }

    #[test]
    fn test_capture_column_zones() {
        let mut columns = create_columns(None).unwrap();
        let child = create_text(None).unwrap();
        let (left_id, right_id) = match &mut columns.kind {
            BlockKind::Columns { columns, .. } => {
                columns[0].children.push(child.clone());
                (columns[0].id.clone(), columns[1].id.clone())
            }
            _ => unreachable!(),
        };

        let mut bounds = HashMap::new();
        bounds.insert(columns.id.clone(), Rect::new(0.0, 200.0, 0.0, 600.0));
        bounds.insert(left_id.clone(), Rect::new(0.0, 200.0, 0.0, 300.0));
        bounds.insert(right_id.clone(), Rect::new(0.0, 200.0, 300.0, 600.0));
        bounds.insert(child.id.clone(), Rect::new(10.0, 60.0, 0.0, 300.0));

        let cache = GeometryCache::capture(&[columns], &bounds, None);

        assert_eq!(cache.zones.len(), 2);
        let left = cache.zone(&left_id).unwrap();
        assert_eq!(left.children.len(), 1);
        assert_eq!(left.child_count, 1);
        assert!(cache.zone(&right_id).unwrap().children.is_empty());
    }
}
