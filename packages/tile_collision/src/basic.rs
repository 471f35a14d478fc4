//! Axis-separated collision of a moving box against a tile grid.
//!
//! The movement is resolved one axis at a time, X then Y. For each axis the
//! columns (or rows) the box's leading edge sweeps through are scanned
//! nearest-first, and the first occupied cell the swept box overlaps stops
//! the movement on that axis, snapping the box flush against it. This cannot
//! tunnel through thin walls, at the cost of sometimes letting a diagonal move
//! cut the corner of a concave junction.
//!
//! Everything is computed in world units. Tile edges are taken as `c * tw`
//! rather than accumulated, so snapped positions are exact multiples of the
//! tile size minus the box size, and an unblocked axis lands exactly on its
//! target.

use crate::{
    collision_map::CollisionMap,
    flags::CollisionFlags,
};
use tile_grid::{
    AXES,
    Axis,
    Face,
    Pole,
    Sign,
};
use vek::*;


/// Outcome of resolving one movement against a collision map.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Resolved {
    /// Furthest safe position, in world units.
    pub pos: Vec2<f32>,
    /// Sides of the body that were blocked.
    pub flags: CollisionFlags,
}

/// Axis-separated collision resolver with reusable scratch space.
///
/// The candidate cell buffer is cleared at the start of every axis pass, so a
/// single value can serve any number of queries, but it must not be shared
/// between threads mid-query. Callers who don't care about the allocation can
/// use the free function `resolve` instead.
#[derive(Debug, Clone, Default)]
pub struct BasicCollision {
    cells: Vec<Vec2<i64>>,
}

impl BasicCollision {
    pub fn new() -> Self {
        BasicCollision::default()
    }

    /// Move a box of extent `ext` from `pos` towards `target` through `map`,
    /// all in world units.
    ///
    /// Panics if the map's tile size or `ext` is not finite and positive.
    pub fn resolve<M: CollisionMap>(
        &mut self,
        map: &M,
        pos: Vec2<f32>,
        target: Vec2<f32>,
        ext: Extent2<f32>,
    ) -> Resolved {
        let tile_size = map.tile_size();
        assert_sizes(tile_size, ext);

        // the box only moves when snapped. an unblocked axis keeps its start
        // position here and takes the target at the end.
        let mut body = Body {
            min: pos,
            ext: Vec2::new(ext.w, ext.h),
        };
        let mut vel = target - pos;
        let mut flags = CollisionFlags::NONE;

        for axis in AXES {
            if let Some(face) = self.resolve_axis(map, &mut body, &mut vel, axis) {
                flags.set(face, true);
            }
        }

        let blocked = Vec2::new(flags.blocked_x(), flags.blocked_y());
        Resolved {
            pos: Vec2::new(
                if blocked.x { body.min.x } else { target.x },
                if blocked.y { body.min.y } else { target.y },
            ),
            flags,
        }
    }

    // sweep `body` along `axis` by that axis's component of `vel`. upon
    // hitting a tile, snaps `body` flush against it, zeroes the velocity on
    // this axis, and returns the face of the body that was blocked.
    fn resolve_axis<M: CollisionMap>(
        &mut self,
        map: &M,
        body: &mut Body,
        vel: &mut Vec2<f32>,
        axis: Axis,
    ) -> Option<Face> {
        let a = axis as usize;
        let b = axis.other() as usize;
        let axis_vel = vel[a];
        let pole = Pole::from_sign(Sign::of_f32(axis_vel))?;

        let tile_size = map.tile_size();
        let tile_size = Vec2::new(tile_size.w, tile_size.h);
        let (along_len, across_len) = match axis {
            Axis::X => (map.width(), map.height()),
            Axis::Y => (map.height(), map.width()),
        };

        // the leading edge before and after the move, and the trailing edge
        let (leading, trailing) = match pole {
            Pole::Pos => (body.max(a), body.min[a]),
            Pole::Neg => (body.min[a], body.max(a)),
        };
        let dest = leading + axis_vel;

        // scan from the leading edge's current cell to the cell it moves into
        let along = (
            (leading / tile_size[a]).floor() as i64,
            (dest / tile_size[a]).floor() as i64,
        );
        let across = (
            (body.min[b] / tile_size[b]).floor() as i64,
            (body.max(b) / tile_size[b]).floor() as i64,
        );
        self.gather_cells(map, axis, pole, (along, along_len), (across, across_len));

        let (body_min_b, body_max_b) = (body.min[b], body.max(b));
        let cell = self.cells
            .iter()
            .copied()
            .find(|cell| {
                let (tile_min, tile_max) = tile_range(cell[a], tile_size[a]);
                let (tile_min_b, tile_max_b) = tile_range(cell[b], tile_size[b]);
                let overlaps_across = tile_min_b < body_max_b && tile_max_b > body_min_b;
                // strict overlap of the interval swept along this axis
                let overlaps_along = match pole {
                    Pole::Pos => tile_min < dest && tile_max > trailing,
                    Pole::Neg => tile_max > dest && tile_min < trailing,
                };
                overlaps_across && overlaps_along
            })?;

        let (tile_min, tile_max) = tile_range(cell[a], tile_size[a]);
        body.min[a] = match pole {
            Pole::Pos => tile_min - body.ext[a],
            Pole::Neg => tile_max,
        };
        vel[a] = 0.0;

        let face = Face::from_axis_pole(axis, pole);
        trace!(?face, ?cell, "movement blocked");
        Some(face)
    }

    // rebuild the candidate list from the occupied cells in the scan window,
    // nearest-first along `axis` in the direction of `pole`. cells outside
    // the map are skipped without asking the map about them.
    fn gather_cells<M: CollisionMap>(
        &mut self,
        map: &M,
        axis: Axis,
        pole: Pole,
        (along, along_len): ((i64, i64), u32),
        (across, across_len): ((i64, i64), u32),
    ) {
        self.cells.clear();

        let (along_min, along_max) = match clamp_range(along, along_len) {
            Some(range) => range,
            None => return,
        };
        let (across_min, across_max) = match clamp_range(across, across_len) {
            Some(range) => range,
            None => return,
        };

        for i in 0..=(along_max - along_min) {
            let a = match pole {
                Pole::Pos => along_min + i,
                Pole::Neg => along_max - i,
            };
            for b in across_min..=across_max {
                let cell = match axis {
                    Axis::X => Vec2::new(a, b),
                    Axis::Y => Vec2::new(b, a),
                };
                if map.is_occupied(cell.x, cell.y) {
                    self.cells.push(cell);
                }
            }
        }
    }
}

// box being resolved, in world units
#[derive(Debug, Copy, Clone)]
struct Body {
    min: Vec2<f32>,
    ext: Vec2<f32>,
}

impl Body {
    fn max(self, i: usize) -> f32 {
        self.min[i] + self.ext[i]
    }
}

/// Move a box of extent `ext` from `pos` towards `target` through `map`,
/// allocating fresh scratch space.
///
/// ```
/// use tile_collision::prelude::*;
/// use tile_grid::TileLayer;
/// use vek::*;
///
/// let layer = TileLayer::from_rows(&[".#"], Extent2::new(64.0, 64.0));
/// let map = TileLayerCollisionMap::new(&layer);
///
/// let resolved = resolve(
///     &map,
///     Vec2::new(0.0, 0.0),
///     Vec2::new(40.0, 0.0),
///     Extent2::new(32.0, 32.0),
/// );
/// assert_eq!(resolved.pos, Vec2::new(32.0, 0.0));
/// assert!(resolved.flags.right);
/// ```
pub fn resolve<M: CollisionMap>(
    map: &M,
    pos: Vec2<f32>,
    target: Vec2<f32>,
    ext: Extent2<f32>,
) -> Resolved {
    BasicCollision::new().resolve(map, pos, target, ext)
}

fn is_positive(n: f32) -> bool {
    n.is_finite() && n > 0.0
}

/// Panic unless the tile size and the moving box's extent are both finite and
/// positive.
pub(crate) fn assert_sizes(tile_size: Extent2<f32>, ext: Extent2<f32>) {
    assert!(
        is_positive(tile_size.w) && is_positive(tile_size.h),
        "collision map tile size must be positive, got {:?}", tile_size,
    );
    assert!(
        is_positive(ext.w) && is_positive(ext.h),
        "collision body extent must be positive, got {:?}", ext,
    );
}

// world-space edges of cell `c` along an axis with tiles `len` long
fn tile_range(c: i64, len: f32) -> (f32, f32) {
    (c as f32 * len, (c + 1) as f32 * len)
}

// intersect the inclusive range between the two ends with `0..len`
fn clamp_range((a, b): (i64, i64), len: u32) -> Option<(i64, i64)> {
    let min = i64::min(a, b).max(0);
    let max = i64::max(a, b).min(len as i64 - 1);
    if min <= max {
        Some((min, max))
    } else {
        None
    }
}


#[cfg(test)]
use crate::collision_map::{
    NoCollisions,
    TileLayerCollisionMap,
};
#[cfg(test)]
use tile_grid::TileLayer;

#[cfg(test)]
fn layer_64(rows: &[&str]) -> TileLayer {
    TileLayer::from_rows(rows, Extent2::new(64.0, 64.0))
}

#[cfg(test)]
const BODY_32: Extent2<f32> = Extent2 { w: 32.0, h: 32.0 };

/// Collision map which fails the test if asked about a cell outside the grid.
#[cfg(test)]
struct StrictMap<'a>(TileLayerCollisionMap<'a>);

#[cfg(test)]
impl<'a> CollisionMap for StrictMap<'a> {
    fn width(&self) -> u32 {
        self.0.width()
    }

    fn height(&self) -> u32 {
        self.0.height()
    }

    fn tile_width(&self) -> f32 {
        self.0.tile_width()
    }

    fn tile_height(&self) -> f32 {
        self.0.tile_height()
    }

    fn is_occupied(&self, col: i64, row: i64) -> bool {
        assert!(self.0.in_bounds(col, row), "queried out of range cell ({}, {})", col, row);
        self.0.is_occupied(col, row)
    }
}

#[test]
fn test_unblocked_movement_reaches_target() {
    let moves = [
        ((5.0, 5.0), (17.5, -3.0), (3.0, 4.0)),
        ((0.0, 0.0), (250.0, 250.0), (10.0, 10.0)),
        ((-40.0, 12.0), (-80.0, 13.0), (0.5, 100.0)),
        ((90.0, 90.0), (0.0, 0.0), (1.0, 1.0)),
        ((0.1, 0.7), (3.3, -2.9), (1.5, 2.5)),
        ((12.34, 56.78), (12.35, 98.76), (0.3, 0.7)),
    ];
    for ((x, y), (tx, ty), (w, h)) in moves {
        let resolved = resolve(
            &NoCollisions,
            Vec2::new(x, y),
            Vec2::new(tx, ty),
            Extent2::new(w, h),
        );
        assert_eq!(resolved.pos, Vec2::new(tx, ty));
        assert_eq!(resolved.flags, CollisionFlags::NONE);
    }
}

#[test]
fn test_cannot_penetrate_wall_to_the_right() {
    let layer = layer_64(&[".#"]);
    let map = TileLayerCollisionMap::new(&layer);
    let resolved = resolve(&map, Vec2::new(0.0, 0.0), Vec2::new(40.0, 0.0), BODY_32);
    assert!(resolved.flags.right);
    assert!(!resolved.flags.left && !resolved.flags.blocked_y());
    assert!(resolved.pos.x <= 64.0 - 32.0);
    assert_eq!(resolved.pos, Vec2::new(32.0, 0.0));
}

#[test]
fn test_axes_resolve_independently() {
    let layer = layer_64(&[
        "..#.",
        "..#.",
        "..#.",
        "..#.",
    ]);
    let map = TileLayerCollisionMap::new(&layer);

    // blocked on X, free to fall on Y
    let resolved = resolve(&map, Vec2::new(90.0, 100.0), Vec2::new(100.0, 90.0), BODY_32);
    assert_eq!(resolved.pos, Vec2::new(96.0, 90.0));
    assert_eq!(resolved.flags, CollisionFlags::from_face(Face::PosX));

    // blocked on Y by a floor, free to move on X
    let layer = layer_64(&[
        "....",
        "....",
        "####",
    ]);
    let map = TileLayerCollisionMap::new(&layer);
    let resolved = resolve(&map, Vec2::new(10.0, 70.0), Vec2::new(30.0, 50.0), BODY_32);
    assert_eq!(resolved.pos, Vec2::new(30.0, 64.0));
    assert_eq!(resolved.flags, CollisionFlags::from_face(Face::NegY));
}

#[test]
fn test_ground_landing() {
    let layer = layer_64(&[
        "....",
        "....",
        "####",
    ]);
    let map = TileLayerCollisionMap::new(&layer);
    let mut resolver = BasicCollision::new();

    let landed = resolver.resolve(&map, Vec2::new(70.0, 80.0), Vec2::new(70.0, 50.0), BODY_32);
    assert_eq!(landed.pos, Vec2::new(70.0, 64.0));
    assert!(landed.flags.down);
    assert!(!landed.flags.up && !landed.flags.blocked_x());

    // resting there with no vertical velocity collides with nothing
    let rest = resolver.resolve(&map, landed.pos, landed.pos, BODY_32);
    assert_eq!(rest.pos, landed.pos);
    assert_eq!(rest.flags, CollisionFlags::NONE);

    // walking along the floor collides with nothing either
    let walk = resolver.resolve(&map, landed.pos, landed.pos + Vec2::new(20.0, 0.0), BODY_32);
    assert_eq!(walk.pos, Vec2::new(90.0, 64.0));
    assert_eq!(walk.flags, CollisionFlags::NONE);

    // gravity pulling into the floor keeps it grounded
    let pulled = resolver.resolve(&map, landed.pos, landed.pos - Vec2::new(0.0, 4.0), BODY_32);
    assert_eq!(pulled.pos, landed.pos);
    assert!(pulled.flags.down);
}

#[test]
fn test_ceiling_bump() {
    let layer = layer_64(&[
        "###",
        "...",
        "...",
    ]);
    let map = TileLayerCollisionMap::new(&layer);
    let resolved = resolve(&map, Vec2::new(64.0, 64.0), Vec2::new(64.0, 120.0), BODY_32);
    assert_eq!(resolved.pos, Vec2::new(64.0, 128.0 - 32.0));
    assert_eq!(resolved.flags, CollisionFlags::from_face(Face::PosY));
}

#[test]
fn test_flush_contact_symmetry() {
    // wall at column 1, approached from the right
    let layer = layer_64(&[
        "....",
        ".#..",
        "....",
    ]);
    let map = TileLayerCollisionMap::new(&layer);
    let resolved = resolve(&map, Vec2::new(150.0, 64.0), Vec2::new(100.0, 64.0), BODY_32);
    assert_eq!(resolved.pos, Vec2::new((1.0 + 1.0) * 64.0, 64.0));
    assert_eq!(resolved.flags, CollisionFlags::from_face(Face::NegX));

    // wall at column 3, approached from the left
    let layer = layer_64(&[
        ".....",
        "...#.",
        ".....",
    ]);
    let map = TileLayerCollisionMap::new(&layer);
    let resolved = resolve(&map, Vec2::new(100.0, 64.0), Vec2::new(170.0, 64.0), BODY_32);
    assert_eq!(resolved.pos, Vec2::new(3.0 * 64.0 - 32.0, 64.0));
    assert_eq!(resolved.flags, CollisionFlags::from_face(Face::PosX));
}

#[test]
fn test_idempotent_at_rest() {
    let layer = layer_64(&[
        "#.##",
        ".###",
        "##.#",
    ]);
    let map = TileLayerCollisionMap::new(&layer);
    let mut resolver = BasicCollision::new();
    for pos in [
        Vec2::new(0.0, 0.0),
        Vec2::new(64.0, 128.0),
        Vec2::new(100.0, 30.0),
        Vec2::new(-50.0, 500.0),
    ] {
        for _ in 0..3 {
            let resolved = resolver.resolve(&map, pos, pos, BODY_32);
            assert_eq!(resolved.pos, pos);
            assert_eq!(resolved.flags, CollisionFlags::NONE);
        }
    }
}

#[test]
fn test_fast_body_does_not_tunnel() {
    let layer = layer_64(&["..#....."]);
    let map = TileLayerCollisionMap::new(&layer);
    let resolved = resolve(&map, Vec2::new(0.0, 0.0), Vec2::new(300.0, 0.0), BODY_32);
    assert_eq!(resolved.pos, Vec2::new(96.0, 0.0));
    assert!(resolved.flags.right);

    let resolved = resolve(&map, Vec2::new(480.0, 0.0), Vec2::new(-1.0e30, 0.0), BODY_32);
    assert_eq!(resolved.pos, Vec2::new(192.0, 0.0));
    assert!(resolved.flags.left);

    for target in [-1.0e9, -1.0e12, -1.0e20] {
        let resolved = resolve(&map, Vec2::new(480.0, 0.0), Vec2::new(target, 0.0), BODY_32);
        assert_eq!(resolved.pos, Vec2::new(192.0, 0.0));
        assert_eq!(resolved.flags, CollisionFlags::from_face(Face::NegX));
    }
    for target in [1.0e9, 1.0e12, 1.0e30] {
        let resolved = resolve(&map, Vec2::zero(), Vec2::new(target, 0.0), BODY_32);
        assert_eq!(resolved.pos, Vec2::new(96.0, 0.0));
        assert_eq!(resolved.flags, CollisionFlags::from_face(Face::PosX));
    }
}

#[test]
fn test_flush_snap_is_exact_for_any_tile_size() {
    // right: c * tw - w
    for (tile, width, c) in [(10.0, 9.0, 1), (12.0, 11.0, 2), (10.0, 3.3, 4), (12.0, 7.1, 3)] {
        let mut row = ".".repeat(c as usize);
        row.push('#');
        let layer = TileLayer::from_rows(&[row], Extent2::new(tile, tile));
        let map = TileLayerCollisionMap::new(&layer);
        let resolved = resolve(&map, Vec2::zero(), Vec2::new(c as f32 * tile + 5.0, 0.0), Extent2::new(width, 1.0));
        assert_eq!(resolved.pos.x, c as f32 * tile - width);
        assert!(resolved.flags.right);
    }

    // left: (c + 1) * tw
    let layer = TileLayer::from_rows(&["#..."], Extent2::new(10.0, 10.0));
    let map = TileLayerCollisionMap::new(&layer);
    let resolved = resolve(&map, Vec2::new(25.0, 0.0), Vec2::new(3.0, 0.0), Extent2::new(9.0, 9.0));
    assert_eq!(resolved.pos, Vec2::new(10.0, 0.0));
    assert!(resolved.flags.left);

    // up: r * th - h
    let layer = TileLayer::from_rows(&["#", ".", "."], Extent2::new(12.0, 12.0));
    let map = TileLayerCollisionMap::new(&layer);
    let resolved = resolve(&map, Vec2::new(0.0, 0.5), Vec2::new(0.0, 30.0), Extent2::new(5.0, 11.0));
    assert_eq!(resolved.pos, Vec2::new(0.0, 2.0 * 12.0 - 11.0));
    assert!(resolved.flags.up);

    // down: (r + 1) * th
    let layer = TileLayer::from_rows(&[".", ".", "#"], Extent2::new(12.0, 12.0));
    let map = TileLayerCollisionMap::new(&layer);
    let resolved = resolve(&map, Vec2::new(0.1, 30.3), Vec2::new(2.3, 0.7), Extent2::new(5.0, 5.0));
    assert_eq!(resolved.pos, Vec2::new(2.3, 12.0));
    assert!(resolved.flags.down && !resolved.flags.blocked_x());
}

#[test]
fn test_nearest_wall_wins() {
    let layer = layer_64(&[
        "#...#..",
        "...#...",
    ]);
    let map = TileLayerCollisionMap::new(&layer);
    let resolved = resolve(&map, Vec2::new(64.0, 32.0), Vec2::new(400.0, 32.0), BODY_32);
    assert_eq!(resolved.pos, Vec2::new(3.0 * 64.0 - 32.0, 32.0));
    assert!(resolved.flags.right);
}

#[test]
fn test_outside_grid_is_empty() {
    let layer = layer_64(&[
        "###",
        "###",
        "###",
    ]);
    let map = StrictMap(TileLayerCollisionMap::new(&layer));
    let mut resolver = BasicCollision::new();

    let resolved = resolver.resolve(&map, Vec2::new(-100.0, -100.0), Vec2::new(-50.0, -200.0), BODY_32);
    assert_eq!(resolved.pos, Vec2::new(-50.0, -200.0));
    assert_eq!(resolved.flags, CollisionFlags::NONE);

    let resolved = resolver.resolve(&map, Vec2::new(300.0, 500.0), Vec2::new(1.0e30, 1.0e30), BODY_32);
    assert_eq!(resolved.flags, CollisionFlags::NONE);

    // entering the grid from off its left edge
    let resolved = resolver.resolve(&map, Vec2::new(-64.0, 0.0), Vec2::new(-10.0, 0.0), BODY_32);
    assert_eq!(resolved.pos, Vec2::new(-32.0, 0.0));
    assert_eq!(resolved.flags, CollisionFlags::from_face(Face::PosX));

    // dropping onto the grid from above
    let resolved = resolver.resolve(&map, Vec2::new(64.0, 200.0), Vec2::new(64.0, 100.0), BODY_32);
    assert_eq!(resolved.pos, Vec2::new(64.0, 192.0));
    assert_eq!(resolved.flags, CollisionFlags::from_face(Face::NegY));
}

#[test]
#[should_panic]
fn test_zero_tile_size_panics() {
    let layer = TileLayer::from_rows(&["#"], Extent2::new(0.0, 64.0));
    let map = TileLayerCollisionMap::new(&layer);
    resolve(&map, Vec2::zero(), Vec2::new(1.0, 1.0), BODY_32);
}

#[test]
#[should_panic]
fn test_negative_extent_panics() {
    resolve(&NoCollisions, Vec2::zero(), Vec2::new(1.0, 1.0), Extent2::new(-1.0, 4.0));
}
