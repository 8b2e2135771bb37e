//! Pointer position → insertion point.
//!
//! Column zones are tested before top-level blocks since they sit inside
//! the canvas. Within a sequence the midpoint rule applies: above a
//! candidate's vertical midpoint means before it, below the last midpoint
//! means after the last candidate.

use super::geometry::{CachedBlock, GeometryCache, Point};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPosition {
    Before,
    After,
    /// Into an empty column or the empty canvas
    Inside,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropTarget {
    /// Candidate block, or the column id for an empty-column target.
    /// `None` on the empty canvas.
    pub block_id: Option<String>,
    /// Index of `block_id` in its sequence (dragged block included)
    pub index: usize,
    pub position: DropPosition,
    pub parent_column_id: Option<String>,
}

impl DropTarget {
    /// Index in the target sequence before the dragged block is detached
    pub fn insertion_index(&self) -> usize {
        match self.position {
            DropPosition::After => self.index + 1,
            DropPosition::Before | DropPosition::Inside => self.index,
        }
    }
}

pub fn resolve_target(cache: &GeometryCache, point: Point) -> Option<DropTarget> {
    if cache.is_empty_canvas() {
        return Some(DropTarget {
            block_id: None,
            index: 0,
            position: DropPosition::Inside,
            parent_column_id: None,
        });
    }

    if let Some(zone) = cache.zones.iter().find(|zone| zone.rect.contains(point)) {
        let column_id = Some(zone.column_id.clone());

        return Some(match midpoint(&zone.children, point) {
            Some(mut target) => {
                target.parent_column_id = column_id;
                target
            }
            None => DropTarget {
                block_id: column_id.clone(),
                index: zone.child_count,
                position: DropPosition::Inside,
                parent_column_id: column_id,
            },
        });
    }

    midpoint(&cache.blocks, point)
}

fn midpoint(candidates: &[CachedBlock], point: Point) -> Option<DropTarget> {
    if let Some(above) = candidates.iter().find(|c| point.y < c.rect.mid_y()) {
        return Some(DropTarget {
            block_id: Some(above.id.clone()),
            index: above.index,
            position: DropPosition::Before,
            parent_column_id: None,
        });
    }

    candidates.last().map(|last| DropTarget {
        block_id: Some(last.id.clone()),
        index: last.index,
        position: DropPosition::After,
        parent_column_id: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::geometry::{ColumnZone, Rect};

    fn cached(id: &str, index: usize, top: f64, bottom: f64) -> CachedBlock {
        CachedBlock {
            id: id.to_string(),
            index,
            rect: Rect::new(top, bottom, 0.0, 600.0),
        }
    }

    fn three_blocks() -> GeometryCache {
        GeometryCache {
            blocks: vec![
                cached("a", 0, 0.0, 100.0),
                cached("b", 1, 100.0, 200.0),
                cached("c", 2, 200.0, 300.0),
            ],
            zones: vec![],
            block_count: 3,
        }
    }

    #[test]
    fn test_above_midpoint_is_before() {
        let target = resolve_target(&three_blocks(), Point::new(10.0, 120.0)).unwrap();
        assert_eq!(target.block_id.as_deref(), Some("b"));
        assert_eq!(target.position, DropPosition::Before);
        assert_eq!(target.insertion_index(), 1);
    }

    #[test]
    fn test_lower_half_targets_next_block() {
        let target = resolve_target(&three_blocks(), Point::new(10.0, 80.0)).unwrap();
        assert_eq!(target.block_id.as_deref(), Some("b"));
        assert_eq!(target.position, DropPosition::Before);
    }

    #[test]
    fn test_below_last_midpoint_is_after_last() {
        let target = resolve_target(&three_blocks(), Point::new(10.0, 290.0)).unwrap();
        assert_eq!(target.block_id.as_deref(), Some("c"));
        assert_eq!(target.position, DropPosition::After);
        assert_eq!(target.insertion_index(), 3);

        let far_below = resolve_target(&three_blocks(), Point::new(10.0, 900.0)).unwrap();
        assert_eq!(far_below, target);
    }

    #[test]
    fn test_empty_canvas() {
        let target = resolve_target(&GeometryCache::default(), Point::new(0.0, 0.0)).unwrap();
        assert_eq!(target.block_id, None);
        assert_eq!(target.position, DropPosition::Inside);
        assert_eq!(target.insertion_index(), 0);
    }

    #[test]
    fn test_no_candidates_on_non_empty_canvas() {
        let cache = GeometryCache {
            block_count: 1,
            ..Default::default()
        };
        assert_eq!(resolve_target(&cache, Point::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_column_zone_takes_precedence() {
        let mut cache = three_blocks();
        cache.zones.push(ColumnZone {
            column_id: "col-1".to_string(),
            parent_block_id: "b".to_string(),
            rect: Rect::new(100.0, 200.0, 0.0, 300.0),
            children: vec![cached("x", 0, 110.0, 150.0)],
            child_count: 1,
        });

        let inside = resolve_target(&cache, Point::new(50.0, 120.0)).unwrap();
        assert_eq!(inside.parent_column_id.as_deref(), Some("col-1"));
        assert_eq!(inside.block_id.as_deref(), Some("x"));
        assert_eq!(inside.position, DropPosition::Before);

        let past_children = resolve_target(&cache, Point::new(50.0, 190.0)).unwrap();
        assert_eq!(past_children.position, DropPosition::After);
        assert_eq!(past_children.insertion_index(), 1);

        // Right half of the row is outside the zone
        let outside = resolve_target(&cache, Point::new(400.0, 120.0)).unwrap();
        assert_eq!(outside.parent_column_id, None);
        assert_eq!(outside.block_id.as_deref(), Some("b"));
    }

    #[test]
    fn test_empty_column_targets_end() {
        let mut cache = three_blocks();
        cache.zones.push(ColumnZone {
            column_id: "col-2".to_string(),
            parent_block_id: "b".to_string(),
            rect: Rect::new(100.0, 200.0, 300.0, 600.0),
            children: vec![],
            child_count: 0,
        });

        let target = resolve_target(&cache, Point::new(450.0, 150.0)).unwrap();
        assert_eq!(target.block_id.as_deref(), Some("col-2"));
        assert_eq!(target.position, DropPosition::Inside);
        assert_eq!(target.parent_column_id.as_deref(), Some("col-2"));
        assert_eq!(target.insertion_index(), 0);
    }
}
