//! Spatial hash for static tile layers
//!
//! Tile layers flagged with `use_spatial_hash` bucket their boxes into a
//! uniform grid so overlap queries only look at nearby tiles instead of the
//! whole layer.

use std::collections::HashMap;
use std::rc::Rc;

use super::aabb::Aabb;

pub struct SpatialHash {
    pub cell_size: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl SpatialHash {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    /// Register `id` in every cell the box touches
    pub fn insert(&mut self, id: usize, bounds: &Aabb) {
        let (x0, y0, x1, y1) = self.cell_range(bounds);
        for ix in x0..=x1 {
            for iy in y0..=y1 {
                self.cells.entry((ix, iy)).or_default().push(id);
            }
        }
    }

    fn cell_key(&self, x: f32, y: f32) -> (i32, i32) {
        (
            (x / self.cell_size).floor() as i32,
            (y / self.cell_size).floor() as i32,
        )
    }

    fn cell_range(&self, bounds: &Aabb) -> (i32, i32, i32, i32) {
        let (x0, y0) = self.cell_key(bounds.left(), bounds.bottom());
        let (x1, y1) = self.cell_key(bounds.right(), bounds.top());
        (x0, y0, x1, y1)
    }

    /// Ids whose cells intersect `bounds`, sorted and deduplicated.
    /// Candidates only: callers still run the exact overlap test.
    pub fn query(&self, bounds: &Aabb) -> Vec<usize> {
        let (x0, y0, x1, y1) = self.cell_range(bounds);
        let mut result = Vec::new();
        for ix in x0..=x1 {
            for iy in y0..=y1 {
                if let Some(ids) = self.cells.get(&(ix, iy)) {
                    result.extend_from_slice(ids);
                }
            }
        }
        result.sort_unstable();
        result.dedup();
        result
    }
}

/// Immovable collision boxes (platforms and crates), optionally indexed
#[derive(Clone)]
pub struct StaticGeometry {
    boxes: Vec<Aabb>,
    cell_size: f32,
    index: Option<Rc<SpatialHash>>,
}

impl StaticGeometry {
    pub fn new(boxes: Vec<Aabb>, use_spatial_hash: bool, cell_size: f32) -> Self {
        let index = if use_spatial_hash && cell_size > 0.0 {
            let mut hash = SpatialHash::new(cell_size);
            for (id, b) in boxes.iter().enumerate() {
                hash.insert(id, b);
            }
            Some(Rc::new(hash))
        } else {
            None
        };
        Self {
            boxes,
            cell_size,
            index,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), false, 0.0)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn is_indexed(&self) -> bool {
        self.index.is_some()
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn boxes(&self) -> &[Aabb] {
        &self.boxes
    }

    /// Boxes that strictly overlap `area`
    pub fn overlapping(&self, area: &Aabb) -> Vec<Aabb> {
        match &self.index {
            Some(hash) => hash
                .query(area)
                .into_iter()
                .map(|id| self.boxes[id])
                .filter(|b| b.overlaps(area))
                .collect(),
            None => self.boxes.iter().copied().filter(|b| b.overlaps(area)).collect(),
        }
    }

    pub fn any_overlap(&self, area: &Aabb) -> bool {
        match &self.index {
            Some(hash) => hash.query(area).into_iter().any(|id| self.boxes[id].overlaps(area)),
            None => self.boxes.iter().any(|b| b.overlaps(area)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::math::vec2;

    fn tile(x: f32, y: f32) -> Aabb {
        Aabb::new(vec2(x, y), vec2(64.0, 64.0))
    }

    #[test]
    fn test_query_finds_neighbours_only() {
        let mut hash = SpatialHash::new(64.0);
        hash.insert(0, &tile(32.0, 32.0));
        hash.insert(1, &tile(1000.0, 32.0));

        let probe = Aabb::new(vec2(40.0, 40.0), vec2(10.0, 10.0));
        let found = hash.query(&probe);
        assert!(found.contains(&0));
        assert!(!found.contains(&1));
    }

    #[test]
    fn test_query_deduplicates_multi_cell_boxes() {
        let mut hash = SpatialHash::new(32.0);
        // 64px tile spans a 3x3 block of 32px cells at these edges
        hash.insert(7, &tile(32.0, 32.0));
        let probe = Aabb::new(vec2(32.0, 32.0), vec2(60.0, 60.0));
        assert_eq!(hash.query(&probe), vec![7]);
    }

    #[test]
    fn test_indexed_and_linear_agree() {
        let boxes: Vec<Aabb> = (0..20).map(|i| tile(32.0 + 64.0 * i as f32, 32.0)).collect();
        let indexed = StaticGeometry::new(boxes.clone(), true, 64.0);
        let linear = StaticGeometry::new(boxes, false, 64.0);
        assert!(indexed.is_indexed());
        assert!(!linear.is_indexed());

        let probe = Aabb::new(vec2(300.0, 60.0), vec2(48.0, 96.0));
        assert_eq!(indexed.overlapping(&probe), linear.overlapping(&probe));
        assert_eq!(indexed.any_overlap(&probe), linear.any_overlap(&probe));
        assert!(indexed.any_overlap(&probe));
    }

    #[test]
    fn test_negative_coordinates() {
        let geometry = StaticGeometry::new(vec![tile(-100.0, -100.0)], true, 64.0);
        let probe = Aabb::new(vec2(-90.0, -90.0), vec2(4.0, 4.0));
        assert!(geometry.any_overlap(&probe));
    }
}
