//! Collision shapes and broad-phase spatial index
//!
//! Every collidable entity registers one [`Shape`] under a typed [`ColliderKey`]
//! (entity kind + pool id). Queries return ids of one kind; the caller resolves
//! them through the matching pool, so nothing is ever downcast out of the index.
//!
//! The index is a uniform grid. Each shape is bucketed into every cell its
//! bounding box touches, and a query only tests shapes sharing a cell with the
//! query's bounding box before running the exact overlap test.

use std::collections::{BTreeMap, HashMap};

use glam::Vec2;

use super::pool::EntityId;

/// Grid cell edge length; roughly two large meteors across
pub const GRID_CELL_SIZE: f32 = 128.0;

/// Which pool a collider belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColliderKind {
    Player,
    Shield,
    Meteor,
    Alien,
    Laser,
    AlienLaser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColliderKey {
    pub kind: ColliderKind,
    pub id: EntityId,
}

impl ColliderKey {
    pub const fn new(kind: ColliderKind, id: EntityId) -> Self {
        Self { kind, id }
    }
}

/// Collision geometry in screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { center: Vec2, radius: f32 },
    /// Axis-aligned rectangle
    Rect { min: Vec2, max: Vec2 },
}

impl Shape {
    pub fn circle(center: Vec2, radius: f32) -> Self {
        Shape::Circle { center, radius }
    }

    /// Bounding rectangle of a `size` sprite centered at `center` and rotated by `rotation`
    pub fn rotated_rect(center: Vec2, size: Vec2, rotation: f32) -> Self {
        let (sin, cos) = rotation.sin_cos();
        let half = size * 0.5;
        let extent = Vec2::new(
            half.x * cos.abs() + half.y * sin.abs(),
            half.x * sin.abs() + half.y * cos.abs(),
        );
        Shape::Rect {
            min: center - extent,
            max: center + extent,
        }
    }

    /// Bounding box as (min, max)
    pub fn bounds(&self) -> (Vec2, Vec2) {
        match *self {
            Shape::Circle { center, radius } => {
                (center - Vec2::splat(radius), center + Vec2::splat(radius))
            }
            Shape::Rect { min, max } => (min, max),
        }
    }

    /// Exact overlap test. Touching edges count as overlap.
    pub fn intersects(&self, other: &Shape) -> bool {
        match (*self, *other) {
            (Shape::Circle { center: a, radius: ra }, Shape::Circle { center: b, radius: rb }) => {
                a.distance_squared(b) <= (ra + rb) * (ra + rb)
            }
            (Shape::Circle { center, radius }, Shape::Rect { min, max })
            | (Shape::Rect { min, max }, Shape::Circle { center, radius }) => {
                let closest = center.clamp(min, max);
                center.distance_squared(closest) <= radius * radius
            }
            (Shape::Rect { min: amin, max: amax }, Shape::Rect { min: bmin, max: bmax }) => {
                amin.x <= bmax.x && bmin.x <= amax.x && amin.y <= bmax.y && bmin.y <= amax.y
            }
        }
    }
}

/// Inclusive cell range covered by a shape's bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellSpan {
    min: (i32, i32),
    max: (i32, i32),
}

impl CellSpan {
    fn of(shape: &Shape) -> Self {
        let (min, max) = shape.bounds();
        Self {
            min: world_to_cell(min),
            max: world_to_cell(max),
        }
    }

    fn cells(self) -> impl Iterator<Item = (i32, i32)> {
        (self.min.0..=self.max.0).flat_map(move |x| (self.min.1..=self.max.1).map(move |y| (x, y)))
    }
}

fn world_to_cell(pos: Vec2) -> (i32, i32) {
    (
        (pos.x / GRID_CELL_SIZE).floor() as i32,
        (pos.y / GRID_CELL_SIZE).floor() as i32,
    )
}

#[derive(Debug, Clone)]
struct Entry {
    shape: Shape,
    span: CellSpan,
}

/// Broad-phase index over every collidable entity in a play session
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    entries: BTreeMap<ColliderKey, Entry>,
    cells: HashMap<(i32, i32), Vec<ColliderKey>>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or move a collider
    pub fn insert(&mut self, key: ColliderKey, shape: Shape) {
        let span = CellSpan::of(&shape);
        if let Some(entry) = self.entries.get_mut(&key) {
            let old_span = entry.span;
            entry.shape = shape;
            entry.span = span;
            if old_span != span {
                Self::unbucket(&mut self.cells, key, old_span);
                Self::bucket(&mut self.cells, key, span);
            }
            return;
        }
        self.entries.insert(key, Entry { shape, span });
        Self::bucket(&mut self.cells, key, span);
    }

    pub fn remove(&mut self, key: ColliderKey) -> bool {
        match self.entries.remove(&key) {
            Some(entry) => {
                Self::unbucket(&mut self.cells, key, entry.span);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cells.clear();
    }

    pub fn shape(&self, key: ColliderKey) -> Option<&Shape> {
        self.entries.get(&key).map(|e| &e.shape)
    }

    pub fn contains(&self, key: ColliderKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_kind(&self, kind: ColliderKind) -> usize {
        self.entries.keys().filter(|k| k.kind == kind).count()
    }

    /// Ids of every `kind` collider overlapping `shape`, ascending
    pub fn query(&self, shape: &Shape, kind: ColliderKind) -> Vec<EntityId> {
        let mut hits: Vec<EntityId> = Vec::new();
        for cell in CellSpan::of(shape).cells() {
            let Some(keys) = self.cells.get(&cell) else {
                continue;
            };
            for key in keys {
                if key.kind != kind || hits.contains(&key.id) {
                    continue;
                }
                if let Some(entry) = self.entries.get(key) {
                    if entry.shape.intersects(shape) {
                        hits.push(key.id);
                    }
                }
            }
        }
        hits.sort_unstable();
        hits
    }

    /// Ids of every `kind` collider overlapping the collider registered under `key`
    pub fn overlapping(&self, key: ColliderKey, kind: ColliderKind) -> Vec<EntityId> {
        match self.shape(key) {
            Some(shape) => {
                let shape = *shape;
                let mut hits = self.query(&shape, kind);
                if kind == key.kind {
                    hits.retain(|&id| id != key.id);
                }
                hits
            }
            None => Vec::new(),
        }
    }

    /// True if `shape` overlaps any collider of the given kinds
    pub fn any_overlap(&self, shape: &Shape, kinds: &[ColliderKind]) -> bool {
        kinds.iter().any(|&kind| !self.query(shape, kind).is_empty())
    }

    fn bucket(cells: &mut HashMap<(i32, i32), Vec<ColliderKey>>, key: ColliderKey, span: CellSpan) {
        for cell in span.cells() {
            cells.entry(cell).or_default().push(key);
        }
    }

    fn unbucket(
        cells: &mut HashMap<(i32, i32), Vec<ColliderKey>>,
        key: ColliderKey,
        span: CellSpan,
    ) {
        for cell in span.cells() {
            if let Some(keys) = cells.get_mut(&cell) {
                keys.retain(|k| *k != key);
                if keys.is_empty() {
                    cells.remove(&cell);
                }
            }
        }
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(kind: ColliderKind, id: EntityId) -> ColliderKey {
        ColliderKey::new(kind, id)
    }

    #[test]
    fn test_circle_circle() {
        let a = Shape::circle(Vec2::new(0.0, 0.0), 10.0);
        assert!(a.intersects(&Shape::circle(Vec2::new(15.0, 0.0), 5.0)));
        assert!(!a.intersects(&Shape::circle(Vec2::new(16.0, 0.0), 5.0)));
    }

    #[test]
    fn test_circle_rect() {
        let rect = Shape::Rect {
            min: Vec2::new(10.0, 10.0),
            max: Vec2::new(20.0, 40.0),
        };
        assert!(rect.intersects(&Shape::circle(Vec2::new(5.0, 20.0), 5.0)));
        assert!(!rect.intersects(&Shape::circle(Vec2::new(5.0, 5.0), 5.0)));
        assert!(Shape::circle(Vec2::new(15.0, 25.0), 1.0).intersects(&rect));
    }

    #[test]
    fn test_rotated_rect_bounds() {
        let upright = Shape::rotated_rect(Vec2::ZERO, Vec2::new(10.0, 40.0), 0.0);
        assert_eq!(upright.bounds(), (Vec2::new(-5.0, -20.0), Vec2::new(5.0, 20.0)));

        let sideways =
            Shape::rotated_rect(Vec2::ZERO, Vec2::new(10.0, 40.0), std::f32::consts::FRAC_PI_2);
        let (min, max) = sideways.bounds();
        assert!((min.x + 20.0).abs() < 1e-4 && (max.y - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_query_filters_by_kind() {
        let mut index = SpatialIndex::new();
        index.insert(key(ColliderKind::Meteor, 1), Shape::circle(Vec2::new(100.0, 100.0), 20.0));
        index.insert(key(ColliderKind::Alien, 2), Shape::circle(Vec2::new(110.0, 100.0), 20.0));
        index.insert(key(ColliderKind::Meteor, 3), Shape::circle(Vec2::new(900.0, 500.0), 20.0));

        let probe = Shape::circle(Vec2::new(105.0, 100.0), 5.0);
        assert_eq!(index.query(&probe, ColliderKind::Meteor), vec![1]);
        assert_eq!(index.query(&probe, ColliderKind::Alien), vec![2]);
        assert!(index.query(&probe, ColliderKind::Laser).is_empty());
    }

    #[test]
    fn test_shape_spanning_cells_found_once() {
        let mut index = SpatialIndex::new();
        // Straddles the cell boundary at x = 128
        index.insert(key(ColliderKind::Meteor, 7), Shape::circle(Vec2::new(128.0, 60.0), 30.0));
        let probe = Shape::Rect {
            min: Vec2::new(100.0, 40.0),
            max: Vec2::new(160.0, 80.0),
        };
        assert_eq!(index.query(&probe, ColliderKind::Meteor), vec![7]);
    }

    #[test]
    fn test_move_and_remove() {
        let mut index = SpatialIndex::new();
        let k = key(ColliderKind::Laser, 4);
        index.insert(k, Shape::circle(Vec2::new(10.0, 10.0), 2.0));
        index.insert(k, Shape::circle(Vec2::new(1000.0, 600.0), 2.0));

        let old_spot = Shape::circle(Vec2::new(10.0, 10.0), 5.0);
        let new_spot = Shape::circle(Vec2::new(1000.0, 600.0), 5.0);
        assert!(index.query(&old_spot, ColliderKind::Laser).is_empty());
        assert_eq!(index.query(&new_spot, ColliderKind::Laser), vec![4]);

        assert!(index.remove(k));
        assert!(!index.remove(k));
        assert!(index.is_empty());
    }

    #[test]
    fn test_overlapping_excludes_self() {
        let mut index = SpatialIndex::new();
        index.insert(key(ColliderKind::Meteor, 1), Shape::circle(Vec2::new(50.0, 50.0), 10.0));
        index.insert(key(ColliderKind::Meteor, 2), Shape::circle(Vec2::new(60.0, 50.0), 10.0));
        assert_eq!(index.overlapping(key(ColliderKind::Meteor, 1), ColliderKind::Meteor), vec![2]);
    }

    #[test]
    fn test_reflect_velocity() {
        // Moving right, hits a wall whose normal points left
        let velocity = Vec2::new(100.0, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }
}
