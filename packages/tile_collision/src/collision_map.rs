//! Occupancy grids that bodies collide against.

use tile_grid::TileLayer;
use vek::*;


/// A fixed-size grid of uniform cells, each either passable or occupied.
///
/// `is_occupied` must be pure for the duration of a collision query, since the
/// resolver may sample overlapping cell ranges more than once. It must answer
/// `false` for any coordinate outside `0..width` by `0..height`, although the
/// resolver never asks about such cells itself.
pub trait CollisionMap {
    /// Number of grid columns.
    fn width(&self) -> u32;

    /// Number of grid rows.
    fn height(&self) -> u32;

    /// World units per column.
    fn tile_width(&self) -> f32;

    /// World units per row.
    fn tile_height(&self) -> f32;

    /// Whether the cell at `(col, row)` blocks movement.
    fn is_occupied(&self, col: i64, row: i64) -> bool;

    fn tile_size(&self) -> Extent2<f32> {
        Extent2::new(self.tile_width(), self.tile_height())
    }

    /// Size of the whole grid in world units.
    fn world_size(&self) -> Extent2<f32> {
        Extent2::new(
            self.width() as f32 * self.tile_width(),
            self.height() as f32 * self.tile_height(),
        )
    }

    /// Whether `(col, row)` is a cell of the grid.
    fn in_bounds(&self, col: i64, row: i64) -> bool {
        col >= 0
            && row >= 0
            && col < self.width() as i64
            && row < self.height() as i64
    }
}

impl<'a, M: CollisionMap + ?Sized> CollisionMap for &'a M {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn tile_width(&self) -> f32 {
        (**self).tile_width()
    }

    fn tile_height(&self) -> f32 {
        (**self).tile_height()
    }

    fn is_occupied(&self, col: i64, row: i64) -> bool {
        (**self).is_occupied(col, row)
    }
}


/// Collision map backed by a tile layer, where any cell holding a tile is
/// occupied.
#[derive(Debug, Copy, Clone)]
pub struct TileLayerCollisionMap<'a> {
    pub layer: &'a TileLayer,
}

impl<'a> TileLayerCollisionMap<'a> {
    pub fn new(layer: &'a TileLayer) -> Self {
        TileLayerCollisionMap { layer }
    }
}

impl<'a> CollisionMap for TileLayerCollisionMap<'a> {
    fn width(&self) -> u32 {
        self.layer.size().w
    }

    fn height(&self) -> u32 {
        self.layer.size().h
    }

    fn tile_width(&self) -> f32 {
        self.layer.tile_size.w
    }

    fn tile_height(&self) -> f32 {
        self.layer.tile_size.h
    }

    fn is_occupied(&self, col: i64, row: i64) -> bool {
        self.layer.is_occupied([col, row])
    }
}

/// Collision map with nothing in it, for levels without a collision layer.
#[derive(Debug, Copy, Clone, Default)]
pub struct NoCollisions;

impl CollisionMap for NoCollisions {
    fn width(&self) -> u32 {
        10
    }

    fn height(&self) -> u32 {
        10
    }

    fn tile_width(&self) -> f32 {
        10.0
    }

    fn tile_height(&self) -> f32 {
        10.0
    }

    fn is_occupied(&self, _: i64, _: i64) -> bool {
        false
    }
}


#[test]
fn test_tile_layer_adapter() {
    let layer = TileLayer::from_rows(
        &[
            "#.",
            ".#",
        ],
        Extent2::new(64.0, 32.0),
    );
    let map = TileLayerCollisionMap::new(&layer);
    assert_eq!(map.width(), 2);
    assert_eq!(map.height(), 2);
    assert_eq!(map.tile_size(), Extent2::new(64.0, 32.0));
    assert_eq!(map.world_size(), Extent2::new(128.0, 64.0));
    assert!(map.is_occupied(1, 0));
    assert!(map.is_occupied(0, 1));
    assert!(!map.is_occupied(0, 0));
    assert!(!map.is_occupied(2, 0));
    assert!(!map.is_occupied(-1, 1));
    assert!(map.in_bounds(1, 1));
    assert!(!map.in_bounds(1, 2));
}

#[test]
fn test_no_collisions() {
    let map = NoCollisions;
    assert_eq!(map.world_size(), Extent2::new(100.0, 100.0));
    for col in -1..11 {
        for row in -1..11 {
            assert!(!map.is_occupied(col, row));
        }
    }
}
